// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 slotlink contributors

//! The closed type taxonomy.
//!
//! Six static types map to six slot kinds, totally and injectively:
//! `i32`, `f32`, `f64`, `Vec<i32>`, `Vec<f32>`, `String`. The mapping is
//! closed by a sealed trait — using any other type as a slot parameter is
//! a compile error, never a runtime check.
//!
//! The per-kind host protocol (which scalar call to make, how to probe and
//! bulk-read an array, how a byte string is terminated) lives on the trait
//! impls here, so every call site dispatches through one place instead of
//! re-deriving type checks.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::host::{AccessorTable, Locator, SlotHost};
use crate::window;

/// Semantic kind of a slot value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// 32-bit signed integer scalar (`i32`).
    Integer,
    /// 32-bit float scalar (`f32`).
    Float32,
    /// 64-bit float scalar (`f64`).
    Float64,
    /// Integer array (`Vec<i32>`).
    IntegerArray,
    /// 32-bit float array (`Vec<f32>`).
    Float32Array,
    /// Byte string (`String`).
    ByteString,
}

impl ValueKind {
    /// Name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "Integer",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
            Self::IntegerArray => "IntegerArray",
            Self::Float32Array => "Float32Array",
            Self::ByteString => "ByteString",
        }
    }

    /// True for the three scalar kinds.
    pub fn is_scalar(self) -> bool {
        matches!(self, Self::Integer | Self::Float32 | Self::Float64)
    }

    /// True for the two element-array kinds (byte strings not included).
    pub fn is_array(self) -> bool {
        matches!(self, Self::IntegerArray | Self::Float32Array)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind bitmask as reported by the host registry.
///
/// Hosts declare slot kinds as a bitfield; a slot may carry several bits
/// when the host reserves the right to choose the representation. In
/// particular `Integer|Float32|Float64` is accepted for any of the three
/// numeric static types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawKind(pub u32);

impl RawKind {
    /// No kind information.
    pub const UNKNOWN: RawKind = RawKind(0);
    /// Integer scalar bit.
    pub const INTEGER: RawKind = RawKind(1);
    /// 32-bit float scalar bit.
    pub const FLOAT32: RawKind = RawKind(2);
    /// 64-bit float scalar bit.
    pub const FLOAT64: RawKind = RawKind(4);
    /// Float-array bit.
    pub const FLOAT32_ARRAY: RawKind = RawKind(8);
    /// Integer-array bit.
    pub const INTEGER_ARRAY: RawKind = RawKind(16);
    /// Byte-string bit.
    pub const BYTE_STRING: RawKind = RawKind(32);
    /// Composite numeric mask: host-chosen numeric representation.
    pub const NUMERIC: RawKind = RawKind(1 | 2 | 4);

    const DEFINED_BITS: u32 = 0x3f;

    /// Exact bitmask for one kind.
    pub fn of(kind: ValueKind) -> RawKind {
        match kind {
            ValueKind::Integer => Self::INTEGER,
            ValueKind::Float32 => Self::FLOAT32,
            ValueKind::Float64 => Self::FLOAT64,
            ValueKind::Float32Array => Self::FLOAT32_ARRAY,
            ValueKind::IntegerArray => Self::INTEGER_ARRAY,
            ValueKind::ByteString => Self::BYTE_STRING,
        }
    }

    /// True when no defined kind bit is set.
    pub fn is_unknown(self) -> bool {
        self.0 & Self::DEFINED_BITS == 0
    }

    /// True when this declared mask is compatible with `kind`.
    pub fn accepts(self, kind: ValueKind) -> bool {
        self.0 & Self::of(kind).0 != 0
    }
}

impl fmt::Display for RawKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("Unknown");
        }
        const NAMES: [(u32, &str); 6] = [
            (1, "Integer"),
            (2, "Float32"),
            (4, "Float64"),
            (8, "Float32Array"),
            (16, "IntegerArray"),
            (32, "ByteString"),
        ];
        let mut first = true;
        for (bit, name) in NAMES {
            if self.0 & bit != 0 {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        let undefined = self.0 & !Self::DEFINED_BITS;
        if undefined != 0 {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "Undefined(0x{:x})", undefined)?;
        }
        Ok(())
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for Vec<i32> {}
    impl Sealed for Vec<f32> {}
    impl Sealed for String {}
}

/// A static type usable as a slot value.
///
/// Sealed: exactly `i32`, `f32`, `f64`, `Vec<i32>`, `Vec<f32>`, and
/// `String` implement it. The hidden methods carry the kind-specific host
/// protocol used by [`FoundSlot`](crate::FoundSlot) and
/// [`OwnedSlot`](crate::OwnedSlot).
pub trait SlotValue: sealed::Sealed + Clone + Default + Send + Sync + 'static {
    /// The kind corresponding to this static type.
    const KIND: ValueKind;

    /// Full read through host accessor functions.
    #[doc(hidden)]
    fn read_slot(host: &dyn SlotHost, locator: Locator) -> Self;

    /// Full write through host accessor functions.
    #[doc(hidden)]
    fn write_slot(host: &dyn SlotHost, locator: Locator, value: &Self);

    /// Builds the kind-matched accessor table over shared storage.
    #[doc(hidden)]
    fn accessors(storage: &Arc<Mutex<Self>>) -> AccessorTable;

    /// Registration-time storage check; arrays reject zero capacity.
    #[doc(hidden)]
    fn capacity_ok(&self) -> bool {
        true
    }
}

/// Returns the unique [`ValueKind`] for a supported static type.
pub fn kind_of<T: SlotValue>() -> ValueKind {
    T::KIND
}

/// Scalar numeric slot types (`i32`, `f32`, `f64`).
///
/// Powers the read-modify-write arithmetic helpers.
pub trait NumericValue:
    SlotValue
    + Copy
    + PartialOrd
    + std::ops::Add<Output = Self>
    + std::ops::Sub<Output = Self>
    + std::ops::Mul<Output = Self>
    + std::ops::Div<Output = Self>
{
    /// Multiplicative identity, used by increment/decrement.
    const ONE: Self;
}

impl NumericValue for i32 {
    const ONE: i32 = 1;
}

impl NumericValue for f32 {
    const ONE: f32 = 1.0;
}

impl NumericValue for f64 {
    const ONE: f64 = 1.0;
}

/// Element-array slot types (`Vec<i32>`, `Vec<f32>`).
pub trait ArrayValue: SlotValue {
    /// Element type of the array.
    type Elem: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static;

    /// Storage sized to `len` default elements.
    #[doc(hidden)]
    fn filled(len: usize) -> Self;

    /// Borrow the elements.
    #[doc(hidden)]
    fn as_slice(&self) -> &[Self::Elem];

    /// Borrow the elements mutably.
    #[doc(hidden)]
    fn as_mut_slice(&mut self) -> &mut [Self::Elem];

    /// Zero-length probe of the host slot's current length.
    #[doc(hidden)]
    fn probe_len(host: &dyn SlotHost, locator: Locator) -> usize;

    /// Single-element windowed read at `index`; bounds checked by the caller.
    #[doc(hidden)]
    fn read_elem(host: &dyn SlotHost, locator: Locator, index: usize) -> Self::Elem;
}

impl SlotValue for i32 {
    const KIND: ValueKind = ValueKind::Integer;

    fn read_slot(host: &dyn SlotHost, locator: Locator) -> Self {
        host.read_int(locator)
    }

    fn write_slot(host: &dyn SlotHost, locator: Locator, value: &Self) {
        host.write_int(locator, *value);
    }

    fn accessors(storage: &Arc<Mutex<Self>>) -> AccessorTable {
        let read = storage.clone();
        let write = storage.clone();
        AccessorTable {
            read_int: Some(Box::new(move || *read.lock())),
            write_int: Some(Box::new(move |v| *write.lock() = v)),
            ..AccessorTable::default()
        }
    }
}

impl SlotValue for f32 {
    const KIND: ValueKind = ValueKind::Float32;

    fn read_slot(host: &dyn SlotHost, locator: Locator) -> Self {
        host.read_float(locator)
    }

    fn write_slot(host: &dyn SlotHost, locator: Locator, value: &Self) {
        host.write_float(locator, *value);
    }

    fn accessors(storage: &Arc<Mutex<Self>>) -> AccessorTable {
        let read = storage.clone();
        let write = storage.clone();
        AccessorTable {
            read_float: Some(Box::new(move || *read.lock())),
            write_float: Some(Box::new(move |v| *write.lock() = v)),
            ..AccessorTable::default()
        }
    }
}

impl SlotValue for f64 {
    const KIND: ValueKind = ValueKind::Float64;

    fn read_slot(host: &dyn SlotHost, locator: Locator) -> Self {
        host.read_double(locator)
    }

    fn write_slot(host: &dyn SlotHost, locator: Locator, value: &Self) {
        host.write_double(locator, *value);
    }

    fn accessors(storage: &Arc<Mutex<Self>>) -> AccessorTable {
        let read = storage.clone();
        let write = storage.clone();
        AccessorTable {
            read_double: Some(Box::new(move || *read.lock())),
            write_double: Some(Box::new(move |v| *write.lock() = v)),
            ..AccessorTable::default()
        }
    }
}

impl SlotValue for Vec<i32> {
    const KIND: ValueKind = ValueKind::IntegerArray;

    fn read_slot(host: &dyn SlotHost, locator: Locator) -> Self {
        // Length is probed fresh, then one bulk read covers the slot. The
        // host may resize between the two calls, so trust the copy count.
        let len = host.read_int_window(locator, None, 0, 0);
        let mut out = vec![0; len];
        let n = host.read_int_window(locator, Some(&mut out[..]), 0, len);
        out.truncate(n);
        out
    }

    fn write_slot(host: &dyn SlotHost, locator: Locator, value: &Self) {
        host.write_int_window(locator, value, 0, value.len());
    }

    fn accessors(storage: &Arc<Mutex<Self>>) -> AccessorTable {
        let read = storage.clone();
        let write = storage.clone();
        AccessorTable {
            read_int_window: Some(Box::new(move |dst: Option<&mut [i32]>, offset, max| {
                window::read_window(read.lock().as_slice(), dst, offset, max)
            })),
            write_int_window: Some(Box::new(move |src: &[i32], offset, count| {
                window::write_window(&mut *write.lock(), src, offset, count)
            })),
            ..AccessorTable::default()
        }
    }

    fn capacity_ok(&self) -> bool {
        !self.is_empty()
    }
}

impl SlotValue for Vec<f32> {
    const KIND: ValueKind = ValueKind::Float32Array;

    fn read_slot(host: &dyn SlotHost, locator: Locator) -> Self {
        let len = host.read_float_window(locator, None, 0, 0);
        let mut out = vec![0.0; len];
        let n = host.read_float_window(locator, Some(&mut out[..]), 0, len);
        out.truncate(n);
        out
    }

    fn write_slot(host: &dyn SlotHost, locator: Locator, value: &Self) {
        host.write_float_window(locator, value, 0, value.len());
    }

    fn accessors(storage: &Arc<Mutex<Self>>) -> AccessorTable {
        let read = storage.clone();
        let write = storage.clone();
        AccessorTable {
            read_float_window: Some(Box::new(move |dst: Option<&mut [f32]>, offset, max| {
                window::read_window(read.lock().as_slice(), dst, offset, max)
            })),
            write_float_window: Some(Box::new(move |src: &[f32], offset, count| {
                window::write_window(&mut *write.lock(), src, offset, count)
            })),
            ..AccessorTable::default()
        }
    }

    fn capacity_ok(&self) -> bool {
        !self.is_empty()
    }
}

impl ArrayValue for Vec<i32> {
    type Elem = i32;

    fn filled(len: usize) -> Self {
        vec![0; len]
    }

    fn as_slice(&self) -> &[i32] {
        self
    }

    fn as_mut_slice(&mut self) -> &mut [i32] {
        self
    }

    fn probe_len(host: &dyn SlotHost, locator: Locator) -> usize {
        host.read_int_window(locator, None, 0, 0)
    }

    fn read_elem(host: &dyn SlotHost, locator: Locator, index: usize) -> i32 {
        let mut buf = [0i32; 1];
        host.read_int_window(locator, Some(&mut buf[..]), index, 1);
        buf[0]
    }
}

impl ArrayValue for Vec<f32> {
    type Elem = f32;

    fn filled(len: usize) -> Self {
        vec![0.0; len]
    }

    fn as_slice(&self) -> &[f32] {
        self
    }

    fn as_mut_slice(&mut self) -> &mut [f32] {
        self
    }

    fn probe_len(host: &dyn SlotHost, locator: Locator) -> usize {
        host.read_float_window(locator, None, 0, 0)
    }

    fn read_elem(host: &dyn SlotHost, locator: Locator, index: usize) -> f32 {
        let mut buf = [0.0f32; 1];
        host.read_float_window(locator, Some(&mut buf[..]), index, 1);
        buf[0]
    }
}

impl SlotValue for String {
    const KIND: ValueKind = ValueKind::ByteString;

    fn read_slot(host: &dyn SlotHost, locator: Locator) -> Self {
        let len = host.read_bytes(locator, None, 0, 0);
        if len == 0 {
            return String::new();
        }
        // One spare byte beyond the window for the terminator the host
        // writes; terminate again ourselves rather than trusting it.
        let mut buf = vec![0u8; len + 1];
        host.read_bytes(locator, Some(&mut buf[..]), 0, len);
        buf[len] = 0;
        let end = buf.iter().position(|&b| b == 0).unwrap_or(len);
        String::from_utf8_lossy(&buf[..end]).into_owned()
    }

    fn write_slot(host: &dyn SlotHost, locator: Locator, value: &Self) {
        // Content only; a terminator is never part of the semantic value.
        host.write_bytes(locator, value.as_bytes(), 0, value.len());
    }

    fn accessors(storage: &Arc<Mutex<Self>>) -> AccessorTable {
        let read = storage.clone();
        let write = storage.clone();
        AccessorTable {
            read_bytes: Some(Box::new(move |dst: Option<&mut [u8]>, offset, max| {
                window::read_bytes_window(read.lock().as_bytes(), dst, offset, max)
            })),
            write_bytes: Some(Box::new(move |src: &[u8], offset, count| {
                let mut guard = write.lock();
                let mut bytes = guard.clone().into_bytes();
                let n = window::write_window(&mut bytes, src, offset, count);
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                *guard = String::from_utf8_lossy(&bytes[..end]).into_owned();
                n
            })),
            ..AccessorTable::default()
        }
    }
}
