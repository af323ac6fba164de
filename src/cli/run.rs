//! Run command: hotkey listener and session driver

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use shorthand::config::Config;
use shorthand::delivery::{DeliveryEngine, SystemClipboard};
use shorthand::hotkey::HotkeyRegistration;
use shorthand::platform::{self, DialogView, NativePlatform};
use shorthand::runtime::{Driver, spawn_hotkey_forwarder};
use shorthand::session::Coordinator;

use super::{client_from, registry_from};

/// Register the hotkey and serve sessions until the process is stopped
pub fn run_command(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let registry = registry_from(&config, config_path);

    let client = client_from(&config);
    if client.is_available() {
        info!("Inference server reachable at {}", client.base_url());
    } else {
        warn!(
            "Inference server at {} is not reachable; prompts will fail until it is running",
            client.base_url()
        );
    }

    let native = Arc::new(NativePlatform::new());
    let delivery = DeliveryEngine::new(
        native.clone(),
        native.clone(),
        Arc::new(SystemClipboard::new()),
        registry.clone(),
        config.delivery_timing(),
    );

    let driver = Driver::new(
        Coordinator::new(config.coordinator_options()),
        Arc::new(client),
        Arc::new(delivery),
        Arc::new(DialogView::new(config.allow_unsafe)),
    );

    let registration = HotkeyRegistration::register(&config.hotkey)
        .with_context(|| format!("Check the hotkey setting in {}", config_path.display()))?;
    spawn_hotkey_forwarder(registration.id(), native, registry, driver.sender());

    println!(
        "Shorthand is running. Press {} over a terminal window (Ctrl+C to quit).",
        registration.binding()
    );

    platform::run_event_loop(driver);
    drop(registration);
    Ok(())
}
