//! One-time loading of the `<model-viewer>` module script
//!
//! The element may be attached before or after the script finishes; the
//! browser upgrades it in place once the custom element is defined.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlElement;

use crate::error::{document, window, WebError};

const ELEMENT_NAME: &str = "model-viewer";

/// Start loading the component script in the background
pub fn spawn_component_load(script_url: String) {
    wasm_bindgen_futures::spawn_local(async move {
        match load_component(&script_url).await {
            Ok(true) => tracing::info!(url = %script_url, "Viewer component loaded"),
            Ok(false) => tracing::debug!("Viewer component already defined"),
            Err(e) => tracing::error!("{}", e),
        }
    });
}

/// Inject the module script unless the element is already defined.
///
/// Returns `true` when the script was injected and loaded.
async fn load_component(script_url: &str) -> Result<bool, WebError> {
    let registry = window()?.custom_elements();
    if !registry.get(ELEMENT_NAME).is_undefined() {
        return Ok(false);
    }

    let document = document()?;
    let script: HtmlElement = document
        .create_element("script")?
        .dyn_into()
        .map_err(|_| WebError::Dom("script is not an HtmlElement".to_string()))?;
    script.set_attribute("type", "module")?;
    script.set_attribute("src", script_url)?;

    let loaded = js_sys::Promise::new(&mut |resolve, reject| {
        script.set_onload(Some(&resolve));
        script.set_onerror(Some(&reject));
    });

    let head = document.head().ok_or(WebError::MissingElement("head"))?;
    head.append_child(&script)?;

    JsFuture::from(loaded)
        .await
        .map_err(|e| WebError::ScriptLoad {
            url: script_url.to_string(),
            reason: format!("{:?}", e),
        })?;
    Ok(true)
}
