// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised at the JavaScript boundary.

use alloc::string::{String, ToString};

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures of the browser backend.
#[derive(Debug, Error)]
pub enum WebError {
    /// No global `window` (e.g. running inside a worker).
    #[error("no global `window`")]
    NoWindow,
    /// The window has no document.
    #[error("window has no document")]
    NoDocument,
    /// The settings object could not be parsed.
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
    /// The settings value could not be turned into JSON.
    #[error("settings are not serializable: {0}")]
    Unserializable(String),
    /// The browser refused to construct an `IntersectionObserver`.
    #[error("IntersectionObserver construction failed: {0}")]
    Observer(String),
}

impl WebError {
    /// Wraps a thrown JavaScript value as an observer failure.
    pub(crate) fn observer(thrown: &JsValue) -> Self {
        Self::Observer(describe(thrown))
    }
}

/// Best-effort message for a thrown JavaScript value.
pub(crate) fn describe(thrown: &JsValue) -> String {
    thrown
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(thrown, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| "unknown error".to_string())
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
