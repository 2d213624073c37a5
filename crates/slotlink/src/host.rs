// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 slotlink contributors

//! The host boundary: the contract this crate consumes from the external
//! runtime that owns the slot registry.
//!
//! The registry itself lives in the host and is scheduled by it; this
//! module only names the surface. [`SlotHost`] is the function set a real
//! runtime adapter implements; [`AccessorTable`] is what a publisher hands
//! the host so the host can read and write publisher-owned storage at its
//! own pace, possibly from its own threads.
//!
//! The original C surface carried an opaque context pointer through every
//! callback; here the callbacks are boxed closures and the context is
//! whatever they capture, so the host never sees a raw pointer.

use crate::kind::{RawKind, ValueKind};

/// Opaque handle identifying a bound slot, meaningful only to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locator(u64);

impl Locator {
    /// Wraps a host-assigned raw handle value.
    pub fn new(raw: u64) -> Self {
        Locator(raw)
    }

    /// The raw handle value.
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Scalar read callback: returns the current stored value.
pub type ScalarRead<T> = Box<dyn Fn() -> T + Send + Sync>;

/// Scalar write callback: overwrites the stored value.
pub type ScalarWrite<T> = Box<dyn Fn(T) + Send + Sync>;

/// Windowed read callback.
///
/// `None` destination is a length probe. Semantics are those of
/// [`crate::window::read_window`] (or the byte variant, which additionally
/// NUL-terminates and requires the spare byte).
pub type WindowRead<T> = Box<dyn Fn(Option<&mut [T]>, usize, usize) -> usize + Send + Sync>;

/// Windowed write callback; returns the number of elements stored.
///
/// Semantics are those of [`crate::window::write_window`].
pub type WindowWrite<T> = Box<dyn Fn(&[T], usize, usize) -> usize + Send + Sync>;

/// The callback set a publisher registers with the host.
///
/// Exactly the entries matching the slot's declared kind are populated:
/// one scalar pair for scalar kinds, one windowed pair for array and
/// byte-string kinds. Everything else stays `None` and a host must treat
/// missing entries as unsupported operations on that slot.
#[derive(Default)]
pub struct AccessorTable {
    /// Integer scalar read.
    pub read_int: Option<ScalarRead<i32>>,
    /// Integer scalar write.
    pub write_int: Option<ScalarWrite<i32>>,
    /// 32-bit float scalar read.
    pub read_float: Option<ScalarRead<f32>>,
    /// 32-bit float scalar write.
    pub write_float: Option<ScalarWrite<f32>>,
    /// 64-bit float scalar read.
    pub read_double: Option<ScalarRead<f64>>,
    /// 64-bit float scalar write.
    pub write_double: Option<ScalarWrite<f64>>,
    /// Integer-array windowed read.
    pub read_int_window: Option<WindowRead<i32>>,
    /// Integer-array windowed write.
    pub write_int_window: Option<WindowWrite<i32>>,
    /// Float-array windowed read.
    pub read_float_window: Option<WindowRead<f32>>,
    /// Float-array windowed write.
    pub write_float_window: Option<WindowWrite<f32>>,
    /// Byte-string windowed read (NUL-terminating).
    pub read_bytes: Option<WindowRead<u8>>,
    /// Byte-string windowed write.
    pub write_bytes: Option<WindowWrite<u8>>,
}

impl std::fmt::Debug for AccessorTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut set: Vec<&str> = Vec::new();
        if self.read_int.is_some() {
            set.push("read_int");
        }
        if self.write_int.is_some() {
            set.push("write_int");
        }
        if self.read_float.is_some() {
            set.push("read_float");
        }
        if self.write_float.is_some() {
            set.push("write_float");
        }
        if self.read_double.is_some() {
            set.push("read_double");
        }
        if self.write_double.is_some() {
            set.push("write_double");
        }
        if self.read_int_window.is_some() {
            set.push("read_int_window");
        }
        if self.write_int_window.is_some() {
            set.push("write_int_window");
        }
        if self.read_float_window.is_some() {
            set.push("read_float_window");
        }
        if self.write_float_window.is_some() {
            set.push("write_float_window");
        }
        if self.read_bytes.is_some() {
            set.push("read_bytes");
        }
        if self.write_bytes.is_some() {
            set.push("write_bytes");
        }
        f.debug_struct("AccessorTable").field("entries", &set).finish()
    }
}

/// Host registry surface.
///
/// Implementations adapt a concrete external runtime. All operations are
/// synchronous, bounded-time calls; the host may invoke registered
/// accessor callbacks from any thread at any time, including interleaved
/// with these calls.
pub trait SlotHost: Send + Sync {
    /// Looks up an existing slot by name.
    fn lookup(&self, name: &str) -> Option<Locator>;

    /// Queries the kind bitmask the host declares for a slot.
    fn query_kind(&self, locator: Locator) -> RawKind;

    /// Queries whether the host allows writes to a slot.
    fn query_writable(&self, locator: Locator) -> bool;

    /// Reads an integer scalar slot.
    fn read_int(&self, locator: Locator) -> i32;
    /// Writes an integer scalar slot.
    fn write_int(&self, locator: Locator, value: i32);
    /// Reads a 32-bit float scalar slot.
    fn read_float(&self, locator: Locator) -> f32;
    /// Writes a 32-bit float scalar slot.
    fn write_float(&self, locator: Locator, value: f32);
    /// Reads a 64-bit float scalar slot.
    fn read_double(&self, locator: Locator) -> f64;
    /// Writes a 64-bit float scalar slot.
    fn write_double(&self, locator: Locator, value: f64);

    /// Windowed read of an integer-array slot; `None` destination probes
    /// the current length.
    fn read_int_window(
        &self,
        locator: Locator,
        dst: Option<&mut [i32]>,
        offset: usize,
        max: usize,
    ) -> usize;
    /// Windowed write of an integer-array slot.
    fn write_int_window(&self, locator: Locator, src: &[i32], offset: usize, count: usize) -> usize;
    /// Windowed read of a float-array slot.
    fn read_float_window(
        &self,
        locator: Locator,
        dst: Option<&mut [f32]>,
        offset: usize,
        max: usize,
    ) -> usize;
    /// Windowed write of a float-array slot.
    fn write_float_window(&self, locator: Locator, src: &[f32], offset: usize, count: usize)
        -> usize;
    /// Windowed read of a byte-string slot. With a destination buffer the
    /// host NUL-terminates after the copied window, so the buffer needs one
    /// spare byte beyond the window.
    fn read_bytes(&self, locator: Locator, dst: Option<&mut [u8]>, offset: usize, max: usize)
        -> usize;
    /// Windowed write of a byte-string slot; the source carries content
    /// only, no terminator.
    fn write_bytes(&self, locator: Locator, src: &[u8], offset: usize, count: usize) -> usize;

    /// Installs a published slot: name, declared kind, writability, and the
    /// kind-matched accessor callbacks. Returns the locator identifying the
    /// registration.
    fn register_slot(
        &self,
        name: &str,
        kind: ValueKind,
        writable: bool,
        accessors: AccessorTable,
    ) -> Locator;

    /// Removes a published slot registration.
    fn unregister_slot(&self, locator: Locator);
}
