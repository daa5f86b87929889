//! Spatial Viewer Web - GLB/USDZ preview and AR launcher
//!
//! Builds the page around an embedded `<model-viewer>` element and keeps it in
//! sync with the state held by `spatial-core`.

mod app;
mod error;
mod loader;
mod object_url;
mod viewer;

use spatial_core::AppConfig;
use wasm_bindgen::prelude::*;

/// Entry point for WASM module
#[wasm_bindgen(start)]
pub fn main() {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    let settings = AppConfig::builtin();

    let level = settings
        .app
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(level)
            .build(),
    );

    if let Err(e) = app::run(settings) {
        tracing::error!("Failed to start page: {}", e);
    }
}
