// Copyright 2026 the Kinetix Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and JSON-lines output for kinetix diagnostics.
//!
//! This crate provides [`TraceSink`](kinetix_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`jsonl::JsonLinesSink`]: one JSON object per event, for piping into
//!   `jq` or loading into a notebook.

pub mod jsonl;
pub mod pretty;
