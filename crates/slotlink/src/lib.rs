// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 slotlink contributors

//! # slotlink — typed bindings to host-managed external data slots
//!
//! A host runtime owns a registry of named, dynamically typed data slots,
//! reachable only through host read/write functions. This crate is the
//! typed binding layer over that registry, in two directions:
//!
//! - **Consume** an existing slot: look it up, verify its declared kind
//!   against the static type, then read and write through the host
//!   ([`FoundSlot`]).
//! - **Publish** a new slot backed by client-owned storage: register a
//!   table of accessor callbacks the host invokes, at its own timing, to
//!   read and write that storage ([`OwnedSlot`]).
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//! use slotlink::mock::{HostValue, MemoryHost};
//! use slotlink::{FoundSlot, OwnedSlot};
//!
//! let host = Arc::new(MemoryHost::new());
//!
//! // Publish a slot backed by our own storage.
//! let mut fuel = OwnedSlot::<f32>::with_value(host.clone(), 67.5);
//! fuel.register("demo/fuel_qty", true).unwrap();
//!
//! // Another party consumes it through the host.
//! host.insert("demo/engine_count", HostValue::Int(2), false);
//! let engines = FoundSlot::<i32>::find(host.clone(), "demo/engine_count").unwrap();
//! assert_eq!(engines.get().unwrap(), 2);
//!
//! let gauge = FoundSlot::<f32>::find(host, "demo/fuel_qty").unwrap();
//! assert_eq!(gauge.get().unwrap(), 67.5);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |                       Client code                             |
//! |        FoundSlot<T> (consume)   OwnedSlot<T> (publish)        |
//! +---------------------------------------------------------------+
//! |  kind: closed type taxonomy  |  window: offset/max transfers  |
//! +---------------------------------------------------------------+
//! |            SlotHost trait (adapter to the runtime)            |
//! +---------------------------------------------------------------+
//! |        Host runtime: slot registry, callback scheduling       |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Supported types
//!
//! | Static type | [`ValueKind`] |
//! |-------------|---------------|
//! | `i32` | `Integer` |
//! | `f32` | `Float32` |
//! | `f64` | `Float64` |
//! | `Vec<i32>` | `IntegerArray` |
//! | `Vec<f32>` | `Float32Array` |
//! | `String` | `ByteString` |
//!
//! The set is closed by a sealed trait: any other type parameter is a
//! compile error.
//!
//! ## Threading
//!
//! The host may invoke published accessor callbacks from its own threads,
//! interleaved with local access. Publisher storage is mutex-guarded for
//! the duration of every access on either side. Consumer read-modify-write
//! helpers are two host calls and are not atomic against other writers.

#![warn(missing_docs)]

mod consumer;
mod error;
mod handle;
mod host;
mod kind;
pub mod mock;
mod publisher;
pub mod window;

pub use consumer::FoundSlot;
pub use error::{BindError, RegisterError, SlotError};
pub use handle::SlotHandle;
pub use host::{
    AccessorTable, Locator, ScalarRead, ScalarWrite, SlotHost, WindowRead, WindowWrite,
};
pub use kind::{kind_of, ArrayValue, NumericValue, RawKind, SlotValue, ValueKind};
pub use publisher::OwnedSlot;

#[cfg(test)]
mod tests;
