// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 slotlink contributors

//! In-memory host registry for tests and development.
//!
//! [`MemoryHost`] implements [`SlotHost`] without an external runtime:
//! host-owned slots are seeded with [`insert`](MemoryHost::insert) for
//! consumer-side tests, and published slots dispatch straight into the
//! registered accessor tables, so a consumer and a publisher wired to the
//! same `MemoryHost` exercise the full callback path.
//!
//! Windowed reads of seeded slots go through [`crate::window`], the same
//! routine publisher callbacks use, so probe and termination semantics
//! cannot drift between the two sides. Writes to seeded slots model host
//! storage: arrays are fixed-size and written in place at the requested
//! offset, byte content is resizable and replaced outright.
//!
//! Writes are performed unconditionally; writability enforcement is the
//! binding layer's job and hosts are only queried for the flag.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::host::{AccessorTable, Locator, SlotHost};
use crate::kind::{RawKind, ValueKind};
use crate::window;

/// A host-owned slot value, seeded by tests.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    /// Integer scalar.
    Int(i32),
    /// 32-bit float scalar.
    Float(f32),
    /// 64-bit float scalar.
    Double(f64),
    /// Integer array.
    IntArray(Vec<i32>),
    /// Float array.
    FloatArray(Vec<f32>),
    /// Byte string, stored without terminator.
    Bytes(Vec<u8>),
}

/// Host-style in-place array write: `count` elements from the front of
/// `src` land at `offset` in the fixed-size host array, clipped to it.
fn write_in_place<T: Copy>(storage: &mut [T], src: &[T], offset: usize, count: usize) -> usize {
    if offset >= storage.len() {
        return 0;
    }
    let n = count.min(src.len()).min(storage.len() - offset);
    storage[offset..offset + n].copy_from_slice(&src[..n]);
    n
}

impl HostValue {
    fn raw_kind(&self) -> RawKind {
        match self {
            Self::Int(_) => RawKind::INTEGER,
            Self::Float(_) => RawKind::FLOAT32,
            Self::Double(_) => RawKind::FLOAT64,
            Self::IntArray(_) => RawKind::INTEGER_ARRAY,
            Self::FloatArray(_) => RawKind::FLOAT32_ARRAY,
            Self::Bytes(_) => RawKind::BYTE_STRING,
        }
    }
}

enum Entry {
    Owned {
        value: HostValue,
        writable: bool,
        /// Override for the declared kind, for exercising composite and
        /// undefined host reports.
        reported: Option<RawKind>,
    },
    Published {
        kind: ValueKind,
        writable: bool,
        accessors: AccessorTable,
    },
}

#[derive(Default)]
struct Registry {
    by_id: HashMap<u64, Entry>,
    by_name: HashMap<String, u64>,
}

/// In-memory [`SlotHost`] implementation.
pub struct MemoryHost {
    registry: RwLock<Registry>,
    next_id: AtomicU64,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Creates an empty registry.
    pub fn new() -> Self {
        MemoryHost {
            registry: RwLock::new(Registry::default()),
            next_id: AtomicU64::new(1),
        }
    }

    fn allocate(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn install(&self, name: &str, entry: Entry) -> Locator {
        let id = self.allocate();
        let mut registry = self.registry.write();
        if let Some(old) = registry.by_name.insert(name.to_string(), id) {
            registry.by_id.remove(&old);
        }
        registry.by_id.insert(id, entry);
        Locator::new(id)
    }

    /// Seeds a host-owned slot.
    pub fn insert(&self, name: &str, value: HostValue, writable: bool) -> Locator {
        self.install(
            name,
            Entry::Owned {
                value,
                writable,
                reported: None,
            },
        )
    }

    /// Seeds a host-owned slot that declares `reported` as its kind
    /// regardless of the stored value, e.g. the numeric composite mask or
    /// an undefined bit pattern.
    pub fn insert_reported(
        &self,
        name: &str,
        value: HostValue,
        writable: bool,
        reported: RawKind,
    ) -> Locator {
        self.install(
            name,
            Entry::Owned {
                value,
                writable,
                reported: Some(reported),
            },
        )
    }

    /// Number of live slots, owned and published.
    pub fn slot_count(&self) -> usize {
        self.registry.read().by_id.len()
    }
}

impl SlotHost for MemoryHost {
    fn lookup(&self, name: &str) -> Option<Locator> {
        self.registry.read().by_name.get(name).copied().map(Locator::new)
    }

    fn query_kind(&self, locator: Locator) -> RawKind {
        match self.registry.read().by_id.get(&locator.raw()) {
            Some(Entry::Owned { value, reported, .. }) => {
                reported.unwrap_or_else(|| value.raw_kind())
            }
            Some(Entry::Published { kind, .. }) => RawKind::of(*kind),
            None => RawKind::UNKNOWN,
        }
    }

    fn query_writable(&self, locator: Locator) -> bool {
        match self.registry.read().by_id.get(&locator.raw()) {
            Some(Entry::Owned { writable, .. }) => *writable,
            Some(Entry::Published { writable, .. }) => *writable,
            None => false,
        }
    }

    fn read_int(&self, locator: Locator) -> i32 {
        match self.registry.read().by_id.get(&locator.raw()) {
            Some(Entry::Owned {
                value: HostValue::Int(v),
                ..
            }) => *v,
            Some(Entry::Published { accessors, .. }) => {
                accessors.read_int.as_ref().map_or(0, |f| f())
            }
            _ => 0,
        }
    }

    fn write_int(&self, locator: Locator, new: i32) {
        match self.registry.write().by_id.get_mut(&locator.raw()) {
            Some(Entry::Owned {
                value: HostValue::Int(v),
                ..
            }) => *v = new,
            Some(Entry::Published { accessors, .. }) => {
                if let Some(f) = &accessors.write_int {
                    f(new);
                }
            }
            _ => {}
        }
    }

    fn read_float(&self, locator: Locator) -> f32 {
        match self.registry.read().by_id.get(&locator.raw()) {
            Some(Entry::Owned {
                value: HostValue::Float(v),
                ..
            }) => *v,
            Some(Entry::Published { accessors, .. }) => {
                accessors.read_float.as_ref().map_or(0.0, |f| f())
            }
            _ => 0.0,
        }
    }

    fn write_float(&self, locator: Locator, new: f32) {
        match self.registry.write().by_id.get_mut(&locator.raw()) {
            Some(Entry::Owned {
                value: HostValue::Float(v),
                ..
            }) => *v = new,
            Some(Entry::Published { accessors, .. }) => {
                if let Some(f) = &accessors.write_float {
                    f(new);
                }
            }
            _ => {}
        }
    }

    fn read_double(&self, locator: Locator) -> f64 {
        match self.registry.read().by_id.get(&locator.raw()) {
            Some(Entry::Owned {
                value: HostValue::Double(v),
                ..
            }) => *v,
            Some(Entry::Published { accessors, .. }) => {
                accessors.read_double.as_ref().map_or(0.0, |f| f())
            }
            _ => 0.0,
        }
    }

    fn write_double(&self, locator: Locator, new: f64) {
        match self.registry.write().by_id.get_mut(&locator.raw()) {
            Some(Entry::Owned {
                value: HostValue::Double(v),
                ..
            }) => *v = new,
            Some(Entry::Published { accessors, .. }) => {
                if let Some(f) = &accessors.write_double {
                    f(new);
                }
            }
            _ => {}
        }
    }

    fn read_int_window(
        &self,
        locator: Locator,
        dst: Option<&mut [i32]>,
        offset: usize,
        max: usize,
    ) -> usize {
        match self.registry.read().by_id.get(&locator.raw()) {
            Some(Entry::Owned {
                value: HostValue::IntArray(v),
                ..
            }) => window::read_window(v, dst, offset, max),
            Some(Entry::Published { accessors, .. }) => accessors
                .read_int_window
                .as_ref()
                .map_or(0, |f| f(dst, offset, max)),
            _ => 0,
        }
    }

    fn write_int_window(&self, locator: Locator, src: &[i32], offset: usize, count: usize) -> usize {
        match self.registry.write().by_id.get_mut(&locator.raw()) {
            Some(Entry::Owned {
                value: HostValue::IntArray(v),
                ..
            }) => write_in_place(v, src, offset, count),
            Some(Entry::Published { accessors, .. }) => accessors
                .write_int_window
                .as_ref()
                .map_or(0, |f| f(src, offset, count)),
            _ => 0,
        }
    }

    fn read_float_window(
        &self,
        locator: Locator,
        dst: Option<&mut [f32]>,
        offset: usize,
        max: usize,
    ) -> usize {
        match self.registry.read().by_id.get(&locator.raw()) {
            Some(Entry::Owned {
                value: HostValue::FloatArray(v),
                ..
            }) => window::read_window(v, dst, offset, max),
            Some(Entry::Published { accessors, .. }) => accessors
                .read_float_window
                .as_ref()
                .map_or(0, |f| f(dst, offset, max)),
            _ => 0,
        }
    }

    fn write_float_window(
        &self,
        locator: Locator,
        src: &[f32],
        offset: usize,
        count: usize,
    ) -> usize {
        match self.registry.write().by_id.get_mut(&locator.raw()) {
            Some(Entry::Owned {
                value: HostValue::FloatArray(v),
                ..
            }) => write_in_place(v, src, offset, count),
            Some(Entry::Published { accessors, .. }) => accessors
                .write_float_window
                .as_ref()
                .map_or(0, |f| f(src, offset, count)),
            _ => 0,
        }
    }

    fn read_bytes(
        &self,
        locator: Locator,
        dst: Option<&mut [u8]>,
        offset: usize,
        max: usize,
    ) -> usize {
        match self.registry.read().by_id.get(&locator.raw()) {
            Some(Entry::Owned {
                value: HostValue::Bytes(v),
                ..
            }) => window::read_bytes_window(v, dst, offset, max),
            Some(Entry::Published { accessors, .. }) => accessors
                .read_bytes
                .as_ref()
                .map_or(0, |f| f(dst, offset, max)),
            _ => 0,
        }
    }

    fn write_bytes(&self, locator: Locator, src: &[u8], offset: usize, count: usize) -> usize {
        match self.registry.write().by_id.get_mut(&locator.raw()) {
            Some(Entry::Owned {
                value: HostValue::Bytes(v),
                ..
            }) => {
                // Resizable host string storage: content is replaced.
                if offset >= src.len() {
                    return 0;
                }
                let n = count.min(src.len() - offset);
                v.clear();
                v.extend_from_slice(&src[offset..offset + n]);
                n
            }
            Some(Entry::Published { accessors, .. }) => accessors
                .write_bytes
                .as_ref()
                .map_or(0, |f| f(src, offset, count)),
            _ => 0,
        }
    }

    fn register_slot(
        &self,
        name: &str,
        kind: ValueKind,
        writable: bool,
        accessors: AccessorTable,
    ) -> Locator {
        log::debug!("[mock] registering {} as {}", name, kind);
        self.install(
            name,
            Entry::Published {
                kind,
                writable,
                accessors,
            },
        )
    }

    fn unregister_slot(&self, locator: Locator) {
        let mut registry = self.registry.write();
        if registry.by_id.remove(&locator.raw()).is_some() {
            registry.by_name.retain(|_, id| *id != locator.raw());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_kind_queries() {
        let host = MemoryHost::new();
        let loc = host.insert("t/int", HostValue::Int(5), true);
        assert_eq!(host.lookup("t/int"), Some(loc));
        assert_eq!(host.lookup("t/missing"), None);
        assert_eq!(host.query_kind(loc), RawKind::INTEGER);
        assert!(host.query_writable(loc));
    }

    #[test]
    fn test_reported_kind_override() {
        let host = MemoryHost::new();
        let loc = host.insert_reported("t/num", HostValue::Float(1.5), false, RawKind::NUMERIC);
        assert_eq!(host.query_kind(loc), RawKind::NUMERIC);
    }

    #[test]
    fn test_owned_scalar_round_trip() {
        let host = MemoryHost::new();
        let loc = host.insert("t/d", HostValue::Double(0.25), true);
        assert_eq!(host.read_double(loc), 0.25);
        host.write_double(loc, 0.5);
        assert_eq!(host.read_double(loc), 0.5);
        // Kind-mismatched access reads as zero, like a null host accessor.
        assert_eq!(host.read_int(loc), 0);
    }

    #[test]
    fn test_owned_windows_share_transfer_semantics() {
        let host = MemoryHost::new();
        let loc = host.insert("t/arr", HostValue::IntArray((0..10).collect()), true);
        assert_eq!(host.read_int_window(loc, None, 0, 0), 10);
        let mut dst = [0i32; 4];
        assert_eq!(host.read_int_window(loc, Some(&mut dst[..]), 3, 4), 4);
        assert_eq!(dst, [3, 4, 5, 6]);
    }

    #[test]
    fn test_byte_write_offset_past_source_stores_nothing() {
        let host = MemoryHost::new();
        let loc = host.insert("t/s", HostValue::Bytes(b"abc".to_vec()), true);
        assert_eq!(host.write_bytes(loc, b"xy", 5, 3), 0);
        // Content is untouched.
        let mut dst = [0u8; 4];
        assert_eq!(host.read_bytes(loc, Some(&mut dst[..]), 0, 3), 3);
        assert_eq!(&dst[..3], b"abc");
    }

    #[test]
    fn test_name_replacement_drops_old_entry() {
        let host = MemoryHost::new();
        let first = host.insert("t/x", HostValue::Int(1), true);
        let second = host.insert("t/x", HostValue::Int(2), true);
        assert_ne!(first, second);
        assert_eq!(host.lookup("t/x"), Some(second));
        assert_eq!(host.query_kind(first), RawKind::UNKNOWN);
        assert_eq!(host.slot_count(), 1);
    }

    #[test]
    fn test_unregister_is_idempotent_host_side() {
        let host = MemoryHost::new();
        let loc = host.register_slot("t/p", ValueKind::Integer, false, AccessorTable::default());
        host.unregister_slot(loc);
        host.unregister_slot(loc);
        assert_eq!(host.lookup("t/p"), None);
    }
}
