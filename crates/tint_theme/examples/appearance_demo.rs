//! Appearance Demo
//!
//! Drives the appearance engine against the headless platform: a window and
//! a themed label follow the simulated system appearance, then a manual
//! choice takes over.
//!
//! Run with:
//! `RUST_LOG=debug cargo run -p tint_theme --example appearance_demo [config.toml]`

use std::sync::{Arc, Mutex};
use tint_platform::{HeadlessPlatform, InterfaceStyle, SystemEvent, Window};
use tint_theme::{AppearanceConfig, AppearanceRuntime, Result, Themed};
use tracing_subscriber::EnvFilter;

struct Label {
    color: Mutex<u32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => AppearanceConfig::load(path)?,
        None => AppearanceConfig::default(),
    };
    tracing::info!(?config, "starting appearance demo");

    let platform = Arc::new(HeadlessPlatform::new());
    let mut runtime = AppearanceRuntime::from_config(platform.clone(), &config);
    let appearance = runtime.handle();

    let window: Arc<dyn Window> = platform.window(None);
    appearance.register_window(&window);

    let label = Arc::new(Label {
        color: Mutex::new(0),
    });
    appearance.bind(
        &label,
        "text_color",
        Themed::new(0x1C1C1E_u32, 0xF2F2F7),
        |label, color| {
            if let Ok(mut current) = label.color.lock() {
                *current = *color;
            }
        },
    );
    runtime.run_pending();
    report("initial", &window, &label, appearance.light());

    platform.set_system_style(InterfaceStyle::Dark);
    runtime.handle_system_event(SystemEvent::TraitsDidChange);
    runtime.run_pending();
    report("system dark", &window, &label, appearance.light());

    appearance.set_sync(false);
    appearance.set_light(true);
    runtime.run_pending();
    report("manual light", &window, &label, appearance.light());

    // sync is off, so the still-dark system is ignored
    runtime.handle_system_event(SystemEvent::DidBecomeActive);
    runtime.run_pending();
    report("system ignored", &window, &label, appearance.light());

    Ok(())
}

fn report(stage: &str, window: &Arc<dyn Window>, label: &Label, light: bool) {
    let color = label.color.lock().map(|color| *color).unwrap_or_default();
    tracing::info!(
        stage,
        light,
        window = %window.override_style(),
        color = %format!("#{color:06X}"),
        "appearance"
    );
}
