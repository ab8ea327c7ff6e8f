// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web demo: a long column of cards that slide in and out while scrolling.
//!
//! Builds the page from Rust, then starts the controller through
//! [`KinetixHandle::start`]. Card 3 carries `data-animation-once` and stays
//! visible after its first entrance; every other card repeats. With the
//! `trace` feature the pipeline is logged to the browser console.
//!
//! Build with: `wasm-pack build --target web demos/web_scroll`
//!
//! Then serve `demos/web_scroll/` and open `index.html` in a browser.

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::boxed::Box;
use alloc::format;

use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use kinetix_backend_web::{KinetixHandle, ONCE_ATTR};
use kinetix_core::config::ConfigPatch;
use kinetix_core::trace::TraceSink;

const CARD_COUNT: usize = 12;
const ONCE_CARD: usize = 3;

const CARD_COLORS: [&str; 4] = [
    "rgba(242, 67, 54, 0.9)",
    "rgba(77, 176, 80, 0.9)",
    "rgba(33, 150, 243, 0.9)",
    "rgba(255, 194, 8, 0.9)",
];

/// Entry point, called automatically by `wasm_bindgen(start)`.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no global window")?;
    let document = window.document().ok_or("no document")?;
    let body = document.body().ok_or("no body")?;

    body.append_child(&spacer(&document)?.into())?;
    for i in 0..CARD_COUNT {
        body.append_child(&card(&document, i)?.into())?;
    }
    body.append_child(&spacer(&document)?.into())?;

    let patch = ConfigPatch {
        threshold: Some(0.3),
        root_margin: Some("0px".into()),
        ..ConfigPatch::default()
    };
    let handle = KinetixHandle::start(patch, sink())?;

    // The page lives as long as the document; so does the controller.
    core::mem::forget(handle);
    Ok(())
}

#[cfg(feature = "trace")]
fn sink() -> Option<Box<dyn TraceSink>> {
    Some(Box::new(kinetix_backend_web::ConsoleSink))
}

#[cfg(not(feature = "trace"))]
fn sink() -> Option<Box<dyn TraceSink>> {
    None
}

/// One viewport of empty space, so the first card starts below the fold.
fn spacer(doc: &Document) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = doc.create_element("div")?.unchecked_into();
    el.style().set_property("height", "100vh")?;
    Ok(el)
}

fn card(doc: &Document, i: usize) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = doc.create_element("section")?.unchecked_into();
    el.set_class_name("kinetix");
    el.set_text_content(Some(&format!("Card {}", i + 1)));
    if i == ONCE_CARD {
        el.set_attribute(ONCE_ATTR, "")?;
    }
    let s = el.style();
    s.set_property("height", "240px")?;
    s.set_property("margin", "120px auto")?;
    s.set_property("max-width", "480px")?;
    s.set_property("border-radius", "12px")?;
    s.set_property("background", CARD_COLORS[i % CARD_COLORS.len()])?;
    s.set_property("opacity", "0")?;
    s.set_property("transform", "translateY(200%)")?;
    s.set_property("transition", "transform 0.6s ease, opacity 0.6s ease")?;
    Ok(el)
}
