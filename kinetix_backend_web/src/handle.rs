// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JavaScript entry points.
//!
//! ```js
//! const k = kinetix({ threshold: 0.3, once: true });
//! k.disable();
//! k.enable();
//! k.reset({ animation: "fade" });
//! k.update();
//! ```

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use core::cell::RefCell;

use js_sys::{Function, JSON, Reflect};
use kinetix_core::config::{ConfigPatch, Disabled, ProbeError};
use kinetix_core::controller::Kinetix;
use kinetix_core::trace::TraceSink;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::console::ConsoleSink;
use crate::dom::{DomHost, Shared};
use crate::error::{WebError, describe};

/// Parses a JSON settings object. Keys are camelCase (`rootMargin`,
/// `enterEventName`, ...); unknown keys are ignored.
pub fn parse_settings(json: &str) -> Result<ConfigPatch<Element>, WebError> {
    let patch: ConfigPatch<()> = serde_json::from_str(json)?;
    Ok(patch.retarget())
}

/// Reads a settings value passed from JavaScript.
///
/// `undefined` and `null` mean no settings. Plain fields go through
/// [`parse_settings`]; an element `root` and a function `disabled` are
/// picked up directly since JSON cannot carry them.
fn settings_from_js(settings: &JsValue) -> Result<ConfigPatch<Element>, WebError> {
    if settings.is_undefined() || settings.is_null() {
        return Ok(ConfigPatch::default());
    }
    let json = JSON::stringify(settings)
        .map_err(|thrown| WebError::Unserializable(describe(&thrown)))?
        .as_string()
        .unwrap_or_default();
    let mut patch = parse_settings(&json)?;

    if let Ok(root) = Reflect::get(settings, &"root".into()) {
        match root.dyn_into::<Element>() {
            Ok(root) => patch.root = Some(Some(root)),
            Err(other) if other.is_null() => patch.root = Some(None),
            Err(_) => {}
        }
    }
    if let Ok(disabled) = Reflect::get(settings, &"disabled".into())
        && let Ok(probe) = disabled.dyn_into::<Function>()
    {
        patch.disabled = Some(Disabled::predicate(move || {
            probe
                .call0(&JsValue::NULL)
                .map(|v| v.is_truthy())
                .map_err(|thrown| ProbeError::new(describe(&thrown)))
        }));
    }
    Ok(patch)
}

/// Handle returned to JavaScript by [`kinetix`].
#[wasm_bindgen]
pub struct KinetixHandle {
    shared: Shared,
}

impl core::fmt::Debug for KinetixHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.shared.try_borrow().map(|kinetix| kinetix.state()).ok();
        f.debug_struct("KinetixHandle")
            .field("state", &state)
            .finish_non_exhaustive()
    }
}

impl KinetixHandle {
    /// Creates a controller on the current document and starts it with
    /// `patch`.
    pub fn start(
        patch: ConfigPatch<Element>,
        sink: Option<Box<dyn TraceSink>>,
    ) -> Result<Self, WebError> {
        let window = web_sys::window().ok_or(WebError::NoWindow)?;
        let document = window.document().ok_or(WebError::NoDocument)?;
        let shared: Shared = Rc::new_cyclic(|weak| {
            let kinetix = Kinetix::new(DomHost::new(document, weak.clone()));
            RefCell::new(match sink {
                Some(sink) => kinetix.with_boxed_sink(sink),
                None => kinetix,
            })
        });
        shared.borrow_mut().start(patch);
        Ok(Self { shared })
    }

    /// The shared controller.
    #[must_use]
    pub fn controller(&self) -> &Shared {
        &self.shared
    }
}

#[wasm_bindgen]
impl KinetixHandle {
    /// Subscribes (again) and removes the disabled marker.
    pub fn enable(&self) {
        self.shared.borrow_mut().enable();
    }

    /// Tears the subscription down and sets the disabled marker.
    pub fn disable(&self) {
        self.shared.borrow_mut().disable();
    }

    /// Forgets every element, merges `settings` and enables again.
    pub fn reset(&self, settings: JsValue) -> Result<(), JsValue> {
        let patch = settings_from_js(&settings)?;
        self.shared.borrow_mut().reset(patch);
        Ok(())
    }

    /// Subscribes elements added since the last discovery.
    pub fn update(&self) {
        self.shared.borrow_mut().update();
    }

    /// Whether the current settings ask for animations to be off.
    #[wasm_bindgen(js_name = isDisabled)]
    pub fn is_disabled(&self) -> bool {
        self.shared.borrow_mut().is_disabled()
    }
}

/// Starts kinetix on the current document.
#[wasm_bindgen]
pub fn kinetix(settings: JsValue) -> Result<KinetixHandle, JsValue> {
    let patch = settings_from_js(&settings)?;
    Ok(KinetixHandle::start(patch, None)?)
}

/// Like [`kinetix`], but logs the pipeline to the console (requires the
/// `trace` feature).
#[wasm_bindgen(js_name = kinetixDebug)]
pub fn kinetix_debug(settings: JsValue) -> Result<KinetixHandle, JsValue> {
    let patch = settings_from_js(&settings)?;
    let handle = KinetixHandle::start(patch, Some(Box::new(ConsoleSink)))?;
    web_sys::console::debug_1(&format!("kinetix: started, {handle:?}").into());
    Ok(handle)
}
