//! # pulse-wasm
//!
//! WebAssembly module for the Pulse landing page.
//! Runs the hero image-sequence player on a `<canvas>` and mounts the
//! page's promo widgets.

pub mod canvas;
mod fetch;
pub mod host;
pub mod landing;
mod logging;

use pulse_core::{PulseConfig, PulseError};
use wasm_bindgen::prelude::*;

pub use canvas::CanvasSurface;
pub use host::Hero;

pub(crate) fn to_js(e: PulseError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Module start: panic hook and console logging.
#[wasm_bindgen(start)]
pub fn start() {
    logging::init("info");
}

/// Parse an optional JSON config; `None` means all defaults.
pub fn parse_config(config_json: Option<String>) -> Result<PulseConfig, JsValue> {
    match config_json {
        Some(json) => PulseConfig::from_json_str(&json).map_err(to_js),
        None => Ok(PulseConfig::default()),
    }
}

/// Mount the hero and the promo widgets once the DOM is ready.
///
/// Throws if the config is invalid. A page without the hero canvas is not
/// an error: the hero is simply not started.
#[wasm_bindgen]
pub fn mount(config_json: Option<String>) -> Result<(), JsValue> {
    let config = parse_config(config_json)?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() != "loading" {
        return mount_now(&config);
    }
    let callback = Closure::once_into_js(move || {
        if let Err(e) = mount_now(&config) {
            tracing::warn!("mount failed: {:?}", e);
        }
    });
    document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())?;
    Ok(())
}

fn mount_now(config: &PulseConfig) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    if Hero::mount(&window, &config.hero)?.is_some() {
        tracing::info!("hero started on #{}", config.hero.canvas_id);
    }
    landing::mount(&window, &document, &config.promo)
}

/// Get the version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
