//! Tint Platform Abstraction
//!
//! The contract between the appearance engine and a host windowing system.
//! A host implements [`Platform`] and [`Window`] over its native window type;
//! the engine only ever reads and writes per-window override styles, attaches
//! windows to scenes, and asks whether the application is backgrounded.
//!
//! With the `headless` feature (on by default) the [`headless`] module
//! provides an in-memory backend that simulates the operating system's
//! appearance, for tests and demos.

pub mod error;
#[cfg(feature = "headless")]
pub mod headless;
pub mod window;

pub use error::{PlatformError, Result};
pub use window::{
    ApplicationState, InterfaceStyle, Platform, SceneId, SystemEvent, Window, WindowConfig,
};

#[cfg(feature = "headless")]
pub use headless::{HeadlessPlatform, HeadlessWindow};
