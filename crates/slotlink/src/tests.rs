// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 slotlink contributors

//! Integration tests: both lifecycles wired through the in-memory host.

use std::sync::Arc;

use crate::mock::{HostValue, MemoryHost};
use crate::{
    BindError, FoundSlot, OwnedSlot, RawKind, RegisterError, SlotError, SlotHost, ValueKind,
};

fn host() -> Arc<MemoryHost> {
    Arc::new(MemoryHost::new())
}

// ============================================================================
// Binding and verification
// ============================================================================

#[test]
fn test_bind_verifies_declared_kind() {
    let host = host();
    host.insert("t/int", HostValue::Int(3), true);

    let err = FoundSlot::<f64>::find(host.clone(), "t/int").unwrap_err();
    assert_eq!(
        err,
        BindError::TypeMismatch {
            expected: ValueKind::Float64,
            actual: RawKind::INTEGER,
        }
    );

    // The matching static type binds fine.
    let slot = FoundSlot::<i32>::find(host, "t/int").unwrap();
    assert!(slot.bound());
    assert_eq!(slot.get().unwrap(), 3);
}

#[test]
fn test_bind_rejects_unknown_kind() {
    let host = host();
    host.insert_reported("t/odd", HostValue::Int(1), true, RawKind(0x40));
    let err = FoundSlot::<i32>::find(host, "t/odd").unwrap_err();
    assert_eq!(err, BindError::UnknownKind(RawKind(0x40)));
}

#[test]
fn test_numeric_composite_binds_all_numeric_types() {
    let host = host();
    host.insert_reported("t/num", HostValue::Double(0.25), true, RawKind::NUMERIC);

    assert!(FoundSlot::<i32>::find(host.clone(), "t/num").is_ok());
    assert!(FoundSlot::<f32>::find(host.clone(), "t/num").is_ok());
    let as_double = FoundSlot::<f64>::find(host.clone(), "t/num").unwrap();
    assert_eq!(as_double.get().unwrap(), 0.25);

    // The handle keeps the host's full declaration, not just the match.
    assert_eq!(as_double.declared_kind(), ValueKind::Float64);
    assert_eq!(as_double.host_kind(), Some(RawKind::NUMERIC));

    // The relaxation is numeric-only.
    let err = FoundSlot::<String>::find(host, "t/num").unwrap_err();
    assert!(matches!(err, BindError::TypeMismatch { .. }));
}

#[test]
fn test_lookup_failure_is_non_fatal() {
    let host = host();
    let mut slot = FoundSlot::<i32>::unbound(host);

    let err = slot.bind("t/absent").unwrap_err();
    assert_eq!(err, BindError::NotFound("t/absent".to_string()));

    // Handle stays usable; everything reports Unbound until a bind succeeds.
    assert!(!slot.bound());
    assert_eq!(slot.get(), Err(SlotError::Unbound));
    assert_eq!(slot.set(&1), Err(SlotError::Unbound));
}

#[test]
fn test_bind_retry_succeeds_once_slot_appears() {
    let host = host();
    let mut slot = FoundSlot::<i32>::unbound(host.clone());
    assert!(slot.bind("t/late").is_err());

    host.insert("t/late", HostValue::Int(4), true);
    slot.bind("t/late").unwrap();
    assert!(slot.bound());
    assert_eq!(slot.get().unwrap(), 4);
}

#[test]
#[should_panic(expected = "already bound")]
fn test_rebind_of_bound_handle_panics() {
    let host = host();
    host.insert("t/a", HostValue::Int(1), true);
    host.insert("t/b", HostValue::Int(2), false);

    let mut slot = FoundSlot::<i32>::find(host, "t/a").unwrap();
    let _ = slot.bind("t/b");
}

#[test]
fn test_bind_rejects_invalid_names() {
    let host = host();
    for bad in ["", "two words", "tab\there"] {
        let err = FoundSlot::<i32>::find(host.clone(), bad).unwrap_err();
        assert_eq!(err, BindError::InvalidName(bad.to_string()));
    }
}

// ============================================================================
// Consumer access
// ============================================================================

#[test]
fn test_scalar_round_trip() {
    let host = host();
    host.insert("t/f", HostValue::Float(1.5), true);
    let slot = FoundSlot::<f32>::find(host, "t/f").unwrap();
    assert!(slot.writable());
    slot.set(&2.5).unwrap();
    assert_eq!(slot.get().unwrap(), 2.5);
}

#[test]
fn test_read_only_slot_rejects_writes() {
    let host = host();
    host.insert("t/ro", HostValue::Int(9), false);
    let slot = FoundSlot::<i32>::find(host, "t/ro").unwrap();
    assert!(!slot.writable());
    assert_eq!(slot.set(&1), Err(SlotError::NotWritable));
    assert_eq!(slot.add_assign(1), Err(SlotError::NotWritable));
    // Reads still work.
    assert_eq!(slot.get().unwrap(), 9);
}

#[test]
fn test_consumer_arithmetic_sequence() {
    let host = host();
    host.insert("t/count", HostValue::Int(5), true);
    let slot = FoundSlot::<i32>::find(host, "t/count").unwrap();

    slot.set(&0).unwrap();
    slot.increment().unwrap();
    assert_eq!(slot.get().unwrap(), 1);
    slot.decrement().unwrap();
    assert_eq!(slot.get().unwrap(), 0);
    slot.add_assign(99).unwrap();
    assert_eq!(slot.get().unwrap(), 99);
    slot.mul_assign(8).unwrap();
    assert_eq!(slot.get().unwrap(), 792);
    slot.div_assign(3).unwrap();
    assert_eq!(slot.get().unwrap(), 264);
    slot.sub_assign(70).unwrap();
    assert_eq!(slot.get().unwrap(), 194);
}

#[test]
fn test_array_bulk_and_indexed_reads() {
    let host = host();
    host.insert("t/arr", HostValue::IntArray((0..10).collect()), true);
    let slot = FoundSlot::<Vec<i32>>::find(host, "t/arr").unwrap();

    assert_eq!(slot.len().unwrap(), 10);
    assert_eq!(slot.get().unwrap(), (0..10).collect::<Vec<i32>>());

    for i in 0..10 {
        assert_eq!(slot.get_index(i).unwrap(), i as i32);
    }
    assert_eq!(
        slot.get_index(10),
        Err(SlotError::OutOfRange {
            index: 10,
            length: 10
        })
    );
}

#[test]
fn test_array_write_full_buffer() {
    let host = host();
    host.insert("t/arr", HostValue::FloatArray(vec![0.0; 4]), true);
    let slot = FoundSlot::<Vec<f32>>::find(host, "t/arr").unwrap();
    slot.set(&vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(slot.get().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_string_read_never_trusts_host_termination() {
    let host = host();
    // Seeded without any terminator byte.
    host.insert("t/s", HostValue::Bytes(b"hello".to_vec()), true);
    let slot = FoundSlot::<String>::find(host.clone(), "t/s").unwrap();
    assert_eq!(slot.get().unwrap(), "hello");

    // Embedded NUL truncates the semantic content.
    host.insert("t/nul", HostValue::Bytes(b"ab\0cd".to_vec()), true);
    let slot = FoundSlot::<String>::find(host, "t/nul").unwrap();
    assert_eq!(slot.get().unwrap(), "ab");
}

#[test]
fn test_string_append_on_resizable_host_storage() {
    let host = host();
    host.insert("t/s", HostValue::Bytes(b"abc".to_vec()), true);
    let slot = FoundSlot::<String>::find(host, "t/s").unwrap();
    slot.append("def").unwrap();
    assert_eq!(slot.get().unwrap(), "abcdef");
}

// ============================================================================
// Publisher lifecycle
// ============================================================================

#[test]
fn test_publish_and_consume_scalar() {
    let host = host();
    let mut fuel = OwnedSlot::<f32>::with_value(host.clone(), 67.5);
    fuel.register("t/fuel", true).unwrap();
    assert!(fuel.registered());
    assert_eq!(fuel.name(), "t/fuel");
    assert!(fuel.writable());

    let gauge = FoundSlot::<f32>::find(host, "t/fuel").unwrap();
    assert_eq!(gauge.get().unwrap(), 67.5);

    // Local write is visible through the host's next callback read.
    fuel.set(12.25);
    assert_eq!(gauge.get().unwrap(), 12.25);

    // Host-side write lands in local storage.
    gauge.set(&50.0).unwrap();
    assert_eq!(fuel.value(), 50.0);
}

#[test]
fn test_publisher_local_view_without_host_traffic() {
    let host = host();
    let counter = OwnedSlot::<i32>::with_value(host, 10);
    // Never registered: local accessors are fully functional.
    counter.increment();
    counter.add_assign(4);
    counter.mul_assign(2);
    assert_eq!(counter.value(), 30);
    counter.div_assign(3);
    counter.sub_assign(9);
    counter.decrement();
    assert_eq!(counter.value(), 0);
}

#[test]
fn test_register_validates_name() {
    let host = host();
    let mut slot = OwnedSlot::<i32>::new(host);
    assert_eq!(
        slot.register("two words", false),
        Err(RegisterError::InvalidName("two words".to_string()))
    );
    assert!(!slot.registered());
}

#[test]
fn test_array_registration_rejects_zero_capacity() {
    let host = host();
    let mut arr = OwnedSlot::<Vec<i32>>::array(host, 0);
    assert_eq!(arr.register("t/arr", true), Err(RegisterError::InvalidCapacity));
    assert!(!arr.registered());
}

#[test]
#[should_panic(expected = "already registered")]
fn test_double_registration_panics() {
    let host = host();
    let mut slot = OwnedSlot::<i32>::new(host);
    slot.register("t/once", false).unwrap();
    let _ = slot.register("t/twice", false);
}

#[test]
fn test_unregister_is_idempotent() {
    let host = host();
    let mut slot = OwnedSlot::<i32>::new(host.clone());

    // Safe before any registration.
    slot.unregister();

    slot.register("t/x", false).unwrap();
    slot.unregister();
    assert!(!slot.registered());
    assert_eq!(host.lookup("t/x"), None);

    // Second call is a no-op.
    slot.unregister();
}

#[test]
fn test_drop_releases_registration() {
    let host = host();
    {
        let mut slot = OwnedSlot::<i32>::new(host.clone());
        slot.register("t/transient", false).unwrap();
        assert!(host.lookup("t/transient").is_some());
    }
    assert_eq!(host.lookup("t/transient"), None);
}

// ============================================================================
// Published arrays and byte strings
// ============================================================================

#[test]
fn test_published_array_capacity_boundary() {
    let host = host();
    let mut arr = OwnedSlot::<Vec<i32>>::array(host, 25);
    arr.register("t/arr25", true).unwrap();

    arr.set_index(24, 56).unwrap();
    assert_eq!(arr.get_index(24).unwrap(), 56);
    assert_eq!(
        arr.set_index(25, 1),
        Err(SlotError::OutOfRange {
            index: 25,
            length: 25
        })
    );
    assert_eq!(arr.len(), 25);
}

#[test]
fn test_publish_and_consume_array() {
    let host = host();
    let mut data = OwnedSlot::<Vec<i32>>::array(host.clone(), 5);
    data.register("t/data", true).unwrap();
    for i in 0..5 {
        data.set_index(i, i as i32).unwrap();
    }

    let view = FoundSlot::<Vec<i32>>::find(host, "t/data").unwrap();
    assert_eq!(view.len().unwrap(), 5);
    assert_eq!(view.get().unwrap(), vec![0, 1, 2, 3, 4]);
    assert_eq!(view.get_index(4).unwrap(), 4);

    view.set(&vec![9, 8, 7, 6, 5]).unwrap();
    assert_eq!(data.value(), vec![9, 8, 7, 6, 5]);
}

#[test]
fn test_published_byte_string_windows() {
    let host = host();
    let mut text =
        OwnedSlot::<String>::with_value(host.clone(), "abcdefghijklmnopqrstuvwxyz".to_string());
    text.register("t/alpha", true).unwrap();
    let locator = host.lookup("t/alpha").unwrap();

    // Length probe reports the 26-byte content.
    assert_eq!(host.read_bytes(locator, None, 0, 0), 26);

    // Windowed read: ten bytes plus the forced terminator at index 10.
    let mut dst = [0xffu8; 11];
    let n = host.read_bytes(locator, Some(&mut dst[..]), 0, 10);
    assert_eq!(n, 10);
    assert_eq!(&dst[..10], b"abcdefghij");
    assert_eq!(dst[10], 0);
}

#[test]
fn test_published_string_consumed_whole() {
    let host = host();
    let mut text = OwnedSlot::<String>::with_value(host.clone(), "climb".to_string());
    text.register("t/phase", true).unwrap();

    let view = FoundSlot::<String>::find(host, "t/phase").unwrap();
    assert_eq!(view.get().unwrap(), "climb");

    // Local growth is visible to the next host read.
    text.append("ing");
    assert_eq!(view.get().unwrap(), "climbing");
}

#[test]
fn test_host_write_cannot_grow_published_string() {
    let host = host();
    let mut text = OwnedSlot::<String>::with_value(host.clone(), "abcdef".to_string());
    text.register("t/short", true).unwrap();

    // The window is computed against the storage's pre-write length, so a
    // longer host write is clipped to it.
    let view = FoundSlot::<String>::find(host, "t/short").unwrap();
    view.set(&"ABCDEFGHIJ".to_string()).unwrap();
    assert_eq!(text.value(), "ABCDEF");
    assert_eq!(text.content_len(), 6);
}

#[test]
fn test_published_string_host_write_round_trip() {
    let host = host();
    let mut text = OwnedSlot::<String>::with_value(host.clone(), "xxxxxx".to_string());
    text.register("t/six", true).unwrap();

    let view = FoundSlot::<String>::find(host, "t/six").unwrap();
    view.set(&"abcdef".to_string()).unwrap();
    assert_eq!(text.value(), "abcdef");
    assert_eq!(view.get().unwrap(), "abcdef");
}
