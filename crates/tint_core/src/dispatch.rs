//! Main-thread task queue
//!
//! State owned by the UI thread is only ever mutated by tasks drained from a
//! [`MainQueue`]. Any thread may post through a [`QueueHandle`]; posting never
//! blocks and never runs the task inline, so a poster cannot observe the
//! effect of its own task until the owning thread drains the queue.

use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, ThreadId};

/// Unit of work executed against the queue's state
pub type Task<S> = Box<dyn FnOnce(&mut S) + Send>;

/// Hook invoked after every post, used to wake the host event loop
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Receiving side of the queue, owned by the main thread
pub struct MainQueue<S> {
    sender: Sender<Task<S>>,
    receiver: Receiver<Task<S>>,
    main_thread: ThreadId,
    waker: Option<Waker>,
}

impl<S> MainQueue<S> {
    /// Create a queue bound to the calling thread
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            main_thread: thread::current().id(),
            waker: None,
        }
    }

    /// Create a queue that calls `waker` whenever a task is posted
    ///
    /// Hosts use this to nudge their event loop (for example through an
    /// event-loop proxy) so pending work is drained promptly.
    pub fn with_waker<F>(waker: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            waker: Some(Arc::new(waker)),
            ..Self::new()
        }
    }

    pub fn handle(&self) -> QueueHandle<S> {
        QueueHandle {
            sender: self.sender.clone(),
            main_thread: self.main_thread,
            waker: self.waker.clone(),
        }
    }

    pub fn main_thread(&self) -> ThreadId {
        self.main_thread
    }

    pub fn is_main_thread(&self) -> bool {
        thread::current().id() == self.main_thread
    }

    /// Number of tasks waiting to run
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Run queued tasks in FIFO order until the queue is empty
    ///
    /// Tasks posted while draining are run in the same call.
    pub fn run_pending(&self, state: &mut S) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task(state);
            ran += 1;
        }
        if ran > 0 {
            tracing::trace!(ran, "drained main queue");
        }
        ran
    }
}

impl<S> Default for MainQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Posting side of a [`MainQueue`]; cheap to clone and shareable across threads
pub struct QueueHandle<S> {
    sender: Sender<Task<S>>,
    main_thread: ThreadId,
    waker: Option<Waker>,
}

impl<S> QueueHandle<S> {
    /// Enqueue `task` to run on the main thread
    ///
    /// If the queue has been dropped the task is discarded.
    pub fn post<F>(&self, task: F)
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        if self.sender.send(Box::new(task)).is_err() {
            tracing::debug!("main queue closed, dropping task");
            return;
        }
        if let Some(waker) = &self.waker {
            waker();
        }
    }

    pub fn is_main_thread(&self) -> bool {
        thread::current().id() == self.main_thread
    }
}

impl<S> Clone for QueueHandle<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            main_thread: self.main_thread,
            waker: self.waker.clone(),
        }
    }
}
