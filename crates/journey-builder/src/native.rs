#![cfg(not(target_arch = "wasm32"))]

use crate::{config, create_app};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    // A subscriber may already be installed by an embedding process.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Entry point used by the native executable.
pub fn run() -> eframe::Result<()> {
    init_tracing();
    let config = config::load();
    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Journey Builder",
        native_options,
        Box::new(|cc| Ok(Box::new(create_app(cc, config)))),
    )
}
