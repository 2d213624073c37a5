// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 slotlink contributors

//! Publisher lifecycle: expose client-owned storage as a named host slot.
//!
//! Registration hands the host a table of accessor callbacks, exactly the
//! entries matching the slot's kind. The host invokes them from its own
//! execution context and its own timing — possibly from another thread —
//! so the storage is guarded by a mutex held for the duration of every
//! local accessor and every callback body.
//!
//! The registration is torn down exactly once, idempotently: either by an
//! explicit [`OwnedSlot::unregister`] or on drop, always before the
//! storage itself is freed.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{RegisterError, SlotError};
use crate::handle::{slot_name_is_valid, SlotHandle};
use crate::host::SlotHost;
use crate::kind::{ArrayValue, NumericValue, RawKind, SlotValue};

/// A published slot backed by storage this object owns.
///
/// Local accessors ([`value`](Self::value), [`set`](Self::set), the
/// arithmetic helpers) act directly on the storage and are always
/// consistent with the last local write, independent of whether the host
/// has called back yet.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use slotlink::mock::MemoryHost;
/// use slotlink::OwnedSlot;
///
/// let host = Arc::new(MemoryHost::new());
/// let mut gear = OwnedSlot::<i32>::with_value(host.clone(), 1);
/// gear.register("demo/gear_down", true).unwrap();
///
/// gear.set(0);
/// assert_eq!(gear.value(), 0);
/// gear.unregister();
/// gear.unregister(); // idempotent
/// ```
pub struct OwnedSlot<T: SlotValue> {
    host: Arc<dyn SlotHost>,
    handle: SlotHandle,
    storage: Arc<Mutex<T>>,
}

impl<T: SlotValue> OwnedSlot<T> {
    /// Creates an unregistered slot with default-valued storage.
    pub fn new(host: Arc<dyn SlotHost>) -> Self {
        Self::with_value(host, T::default())
    }

    /// Creates an unregistered slot with the given initial value.
    pub fn with_value(host: Arc<dyn SlotHost>, value: T) -> Self {
        OwnedSlot {
            host,
            handle: SlotHandle::empty(T::KIND),
            storage: Arc::new(Mutex::new(value)),
        }
    }

    /// Registers this slot with the host under `name`.
    ///
    /// Validates the name, rejects zero-capacity array storage, and
    /// installs the kind-matched accessor callbacks. Registering an
    /// already-registered slot is a programming error and panics.
    pub fn register(&mut self, name: &str, writable: bool) -> Result<(), RegisterError> {
        assert!(
            !self.handle.bound,
            "slot {:?} is already registered",
            self.handle.name
        );
        if !slot_name_is_valid(name) {
            return Err(RegisterError::InvalidName(name.to_string()));
        }
        if !self.storage.lock().capacity_ok() {
            return Err(RegisterError::InvalidCapacity);
        }

        let table = T::accessors(&self.storage);
        let locator = self.host.register_slot(name, T::KIND, writable, table);
        self.handle.name = name.to_string();
        self.handle.locator = Some(locator);
        self.handle.host_kind = Some(RawKind::of(T::KIND));
        self.handle.writable = writable;
        self.handle.bound = true;
        log::debug!(
            "[create] registered {} as {} (writable={})",
            name,
            T::KIND,
            writable
        );
        Ok(())
    }

    /// Whether this slot is currently registered with the host.
    pub fn registered(&self) -> bool {
        self.handle.bound()
    }

    /// The name this slot was registered under.
    pub fn name(&self) -> &str {
        self.handle.name()
    }

    /// Whether the host was told to allow external writes.
    pub fn writable(&self) -> bool {
        self.handle.writable()
    }

    /// Binding metadata.
    pub fn handle(&self) -> &SlotHandle {
        &self.handle
    }

    /// Removes the host registration. Idempotent: safe to call when never
    /// registered or already unregistered. Also runs on drop.
    pub fn unregister(&mut self) {
        if let Some(locator) = self.handle.locator.take() {
            self.host.unregister_slot(locator);
            self.handle.bound = false;
            log::debug!("[create] unregistered {}", self.handle.name);
        }
    }

    /// Snapshot of the local storage.
    pub fn value(&self) -> T {
        self.storage.lock().clone()
    }

    /// Overwrites the local storage.
    pub fn set(&self, value: T) {
        *self.storage.lock() = value;
    }
}

/// Arithmetic on local storage. Unlike the consumer helpers these are
/// atomic: the storage lock is held across the read and the write.
impl<T: NumericValue> OwnedSlot<T> {
    /// `storage = storage + rhs`.
    pub fn add_assign(&self, rhs: T) {
        let mut guard = self.storage.lock();
        *guard = *guard + rhs;
    }

    /// `storage = storage - rhs`.
    pub fn sub_assign(&self, rhs: T) {
        let mut guard = self.storage.lock();
        *guard = *guard - rhs;
    }

    /// `storage = storage * rhs`.
    pub fn mul_assign(&self, rhs: T) {
        let mut guard = self.storage.lock();
        *guard = *guard * rhs;
    }

    /// `storage = storage / rhs`.
    pub fn div_assign(&self, rhs: T) {
        let mut guard = self.storage.lock();
        *guard = *guard / rhs;
    }

    /// `storage = storage + 1`.
    pub fn increment(&self) {
        self.add_assign(T::ONE);
    }

    /// `storage = storage - 1`.
    pub fn decrement(&self) {
        self.sub_assign(T::ONE);
    }
}

impl<T: ArrayValue> OwnedSlot<T> {
    /// Creates an unregistered array slot with `capacity` default-valued
    /// elements. A zero capacity is reported at registration time as
    /// [`RegisterError::InvalidCapacity`].
    pub fn array(host: Arc<dyn SlotHost>, capacity: usize) -> Self {
        Self::with_value(host, T::filled(capacity))
    }

    /// Current storage length.
    pub fn len(&self) -> usize {
        self.storage.lock().as_slice().len()
    }

    /// True when the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads element `index` from local storage.
    pub fn get_index(&self, index: usize) -> Result<T::Elem, SlotError> {
        let guard = self.storage.lock();
        let slice = guard.as_slice();
        match slice.get(index) {
            Some(elem) => Ok(*elem),
            None => Err(SlotError::OutOfRange {
                index,
                length: slice.len(),
            }),
        }
    }

    /// Writes element `index` in local storage.
    pub fn set_index(&self, index: usize, value: T::Elem) -> Result<(), SlotError> {
        let mut guard = self.storage.lock();
        let slice = guard.as_mut_slice();
        let length = slice.len();
        match slice.get_mut(index) {
            Some(elem) => {
                *elem = value;
                Ok(())
            }
            None => Err(SlotError::OutOfRange { index, length }),
        }
    }
}

impl OwnedSlot<String> {
    /// Appends to the local string content under one lock acquisition.
    pub fn append(&self, suffix: &str) {
        self.storage.lock().push_str(suffix);
    }

    /// Current content length in bytes.
    pub fn content_len(&self) -> usize {
        self.storage.lock().len()
    }
}

impl<T: SlotValue> Drop for OwnedSlot<T> {
    fn drop(&mut self) {
        self.unregister();
    }
}

impl<T: SlotValue> std::fmt::Debug for OwnedSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnedSlot")
            .field("name", &self.handle.name())
            .field("kind", &T::KIND)
            .field("registered", &self.handle.bound())
            .field("writable", &self.handle.writable())
            .finish()
    }
}
