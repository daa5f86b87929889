//! Errors raised while driving the DOM

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("No window object")]
    NoWindow,
    #[error("No document object")]
    NoDocument,
    #[error("No document {0}")]
    MissingElement(&'static str),
    #[error("DOM call failed: {0}")]
    Dom(String),
    #[error("Failed to load component script {url}: {reason}")]
    ScriptLoad { url: String, reason: String },
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        WebError::Dom(format!("{:?}", value))
    }
}

pub fn window() -> Result<web_sys::Window, WebError> {
    web_sys::window().ok_or(WebError::NoWindow)
}

pub fn document() -> Result<web_sys::Document, WebError> {
    window()?.document().ok_or(WebError::NoDocument)
}
