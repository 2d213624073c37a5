// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 slotlink contributors

//! Consumer lifecycle: bind to an existing host slot and access it through
//! host read/write functions.
//!
//! Binding verifies the host-declared kind against the static type up
//! front, so a kind mismatch is a bind-time error, never a surprise at
//! first access. Lookup failure is non-fatal by default: [`FoundSlot::bind`]
//! returns the error but leaves the handle usable, reporting
//! `bound() == false` and failing accessors with [`SlotError::Unbound`].
//! [`FoundSlot::find`] is the strict variant for callers that need lookup
//! to be fatal.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{BindError, SlotError};
use crate::handle::{slot_name_is_valid, SlotHandle};
use crate::host::SlotHost;
use crate::kind::{ArrayValue, NumericValue, SlotValue};

/// A typed view of an existing host-owned slot.
///
/// The slot's storage belongs to the host; this handle holds only the
/// binding metadata and delegates every access to host functions.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use slotlink::mock::{HostValue, MemoryHost};
/// use slotlink::FoundSlot;
///
/// let host = Arc::new(MemoryHost::new());
/// host.insert("demo/count", HostValue::Int(7), true);
///
/// let count = FoundSlot::<i32>::find(host, "demo/count").unwrap();
/// assert_eq!(count.get().unwrap(), 7);
/// count.set(&8).unwrap();
/// assert_eq!(count.get().unwrap(), 8);
/// ```
pub struct FoundSlot<T: SlotValue> {
    host: Arc<dyn SlotHost>,
    handle: SlotHandle,
    _kind: PhantomData<T>,
}

impl<T: SlotValue> FoundSlot<T> {
    /// Creates an unbound handle; every accessor fails with
    /// [`SlotError::Unbound`] until [`bind`](Self::bind) succeeds.
    pub fn unbound(host: Arc<dyn SlotHost>) -> Self {
        FoundSlot {
            host,
            handle: SlotHandle::empty(T::KIND),
            _kind: PhantomData,
        }
    }

    /// Looks up `name` and verifies it, failing the construction on any
    /// bind error (strict mode).
    pub fn find(host: Arc<dyn SlotHost>, name: &str) -> Result<Self, BindError> {
        let mut slot = Self::unbound(host);
        slot.bind(name)?;
        Ok(slot)
    }

    /// Binds this handle to the host slot named `name`.
    ///
    /// Verification order: name convention, lookup, declared kind against
    /// the static type, writability query. On [`BindError::NotFound`] the
    /// handle stays usable and unbound, so a caller may poll
    /// [`bound`](Self::bound) instead of propagating; retrying `bind`
    /// after any failed attempt is fine.
    ///
    /// A handle binds at most once for its lifetime. Calling `bind` on an
    /// already-bound handle is a programming error and panics.
    pub fn bind(&mut self, name: &str) -> Result<(), BindError> {
        assert!(
            !self.handle.bound,
            "slot {:?} is already bound",
            self.handle.name
        );
        if !slot_name_is_valid(name) {
            return Err(BindError::InvalidName(name.to_string()));
        }
        self.handle.name = name.to_string();

        let locator = match self.host.lookup(name) {
            Some(locator) => locator,
            None => {
                log::debug!("[find] slot not found: {}", name);
                return Err(BindError::NotFound(name.to_string()));
            }
        };

        let raw = self.host.query_kind(locator);
        if raw.is_unknown() {
            return Err(BindError::UnknownKind(raw));
        }
        if !raw.accepts(T::KIND) {
            log::debug!(
                "[find] kind mismatch on {}: expected {}, host declared {}",
                name,
                T::KIND,
                raw
            );
            return Err(BindError::TypeMismatch {
                expected: T::KIND,
                actual: raw,
            });
        }

        self.handle.writable = self.host.query_writable(locator);
        self.handle.locator = Some(locator);
        self.handle.host_kind = Some(raw);
        self.handle.bound = true;
        log::debug!(
            "[find] bound {} as {} (writable={})",
            name,
            T::KIND,
            self.handle.writable
        );
        Ok(())
    }

    /// Whether this handle is bound to a slot.
    pub fn bound(&self) -> bool {
        self.handle.bound()
    }

    /// Whether the host allows writes to the bound slot.
    pub fn writable(&self) -> bool {
        self.handle.writable()
    }

    /// The name this handle was bound (or last attempted to bind) to.
    pub fn name(&self) -> &str {
        self.handle.name()
    }

    /// Declared kind of the slot, fixed by the static type.
    pub fn declared_kind(&self) -> crate::ValueKind {
        self.handle.declared_kind()
    }

    /// Kind bitmask the host actually declared, retained at bind time.
    /// `None` until bound. Differs from [`declared_kind`](Self::declared_kind)
    /// when the host reported a composite mask the static type matched.
    pub fn host_kind(&self) -> Option<crate::RawKind> {
        self.handle.host_kind()
    }

    /// Binding metadata.
    pub fn handle(&self) -> &SlotHandle {
        &self.handle
    }

    /// Reads the current value from the host.
    ///
    /// Arrays are probed for their current length and read in one bulk
    /// call; byte strings are read with a spare terminator byte and
    /// terminated locally regardless of what the host wrote.
    pub fn get(&self) -> Result<T, SlotError> {
        let locator = self.handle.require_bound()?;
        Ok(T::read_slot(&*self.host, locator))
    }

    /// Writes a value to the host slot.
    ///
    /// Arrays and byte strings are written as one full-buffer window at
    /// offset zero; byte strings are written length-only, without a
    /// terminator byte.
    pub fn set(&self, value: &T) -> Result<(), SlotError> {
        let locator = self.handle.require_bound()?;
        self.handle.require_writable()?;
        T::write_slot(&*self.host, locator, value);
        Ok(())
    }
}

/// Read-modify-write arithmetic for numeric slots.
///
/// Each helper is a host read followed by a host write and is **not**
/// atomic with respect to other writers of the same slot; interleaved host
/// mutation between the two calls is lost.
impl<T: NumericValue> FoundSlot<T> {
    /// `slot = slot + rhs`.
    pub fn add_assign(&self, rhs: T) -> Result<(), SlotError> {
        self.set(&(self.get()? + rhs))
    }

    /// `slot = slot - rhs`.
    pub fn sub_assign(&self, rhs: T) -> Result<(), SlotError> {
        self.set(&(self.get()? - rhs))
    }

    /// `slot = slot * rhs`.
    pub fn mul_assign(&self, rhs: T) -> Result<(), SlotError> {
        self.set(&(self.get()? * rhs))
    }

    /// `slot = slot / rhs`.
    pub fn div_assign(&self, rhs: T) -> Result<(), SlotError> {
        self.set(&(self.get()? / rhs))
    }

    /// `slot = slot + 1`.
    pub fn increment(&self) -> Result<(), SlotError> {
        self.add_assign(T::ONE)
    }

    /// `slot = slot - 1`.
    pub fn decrement(&self) -> Result<(), SlotError> {
        self.sub_assign(T::ONE)
    }
}

impl<T: ArrayValue> FoundSlot<T> {
    /// Current length of the host array, re-queried on every call — the
    /// host slot may change size between calls.
    pub fn len(&self) -> Result<usize, SlotError> {
        let locator = self.handle.require_bound()?;
        Ok(T::probe_len(&*self.host, locator))
    }

    /// True when the host array is currently empty.
    pub fn is_empty(&self) -> Result<bool, SlotError> {
        Ok(self.len()? == 0)
    }

    /// Reads element `index`, re-checking the current length first.
    pub fn get_index(&self, index: usize) -> Result<T::Elem, SlotError> {
        let locator = self.handle.require_bound()?;
        let length = T::probe_len(&*self.host, locator);
        if index >= length {
            return Err(SlotError::OutOfRange { index, length });
        }
        Ok(T::read_elem(&*self.host, locator, index))
    }
}

impl FoundSlot<String> {
    /// Appends `suffix` to the slot content (read-modify-write; the same
    /// atomicity caveat as the numeric helpers applies).
    pub fn append(&self, suffix: &str) -> Result<(), SlotError> {
        let mut value = self.get()?;
        value.push_str(suffix);
        self.set(&value)
    }
}

impl<T: SlotValue> std::fmt::Debug for FoundSlot<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoundSlot")
            .field("name", &self.handle.name())
            .field("kind", &T::KIND)
            .field("bound", &self.handle.bound())
            .field("writable", &self.handle.writable())
            .finish()
    }
}
