// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 slotlink contributors

//! Shared representation of a bound slot.

use crate::error::SlotError;
use crate::host::Locator;
use crate::kind::{RawKind, ValueKind};

/// Metadata for one slot binding, shared by both lifecycles.
///
/// A handle is created empty and bound at most once, for its lifetime, to
/// exactly one slot. `declared_kind` never changes after binding.
#[derive(Debug, Clone)]
pub struct SlotHandle {
    pub(crate) name: String,
    pub(crate) locator: Option<Locator>,
    pub(crate) declared_kind: ValueKind,
    pub(crate) host_kind: Option<RawKind>,
    pub(crate) writable: bool,
    pub(crate) bound: bool,
}

impl SlotHandle {
    pub(crate) fn empty(declared_kind: ValueKind) -> Self {
        SlotHandle {
            name: String::new(),
            locator: None,
            declared_kind,
            host_kind: None,
            writable: false,
            bound: false,
        }
    }

    /// Slot name; empty until a bind or registration was attempted.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Host-side locator, if bound.
    pub fn locator(&self) -> Option<Locator> {
        self.locator
    }

    /// Declared kind of the slot.
    pub fn declared_kind(&self) -> ValueKind {
        self.declared_kind
    }

    /// Kind bitmask the host declared at bind time, if bound. May carry
    /// more bits than `declared_kind` when the host reported a composite
    /// mask.
    pub fn host_kind(&self) -> Option<RawKind> {
        self.host_kind
    }

    /// Whether the slot accepts writes.
    pub fn writable(&self) -> bool {
        self.writable
    }

    /// Whether lookup or registration has succeeded.
    pub fn bound(&self) -> bool {
        self.bound
    }

    pub(crate) fn require_bound(&self) -> Result<Locator, SlotError> {
        match self.locator {
            Some(locator) if self.bound => Ok(locator),
            _ => Err(SlotError::Unbound),
        }
    }

    pub(crate) fn require_writable(&self) -> Result<(), SlotError> {
        if self.writable {
            Ok(())
        } else {
            Err(SlotError::NotWritable)
        }
    }
}

/// Host naming convention: non-empty, no whitespace anywhere.
pub(crate) fn slot_name_is_valid(name: &str) -> bool {
    !name.is_empty() && !name.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_validation() {
        assert!(slot_name_is_valid("sim/cockpit/autopilot_mode"));
        assert!(slot_name_is_valid("a"));
        assert!(!slot_name_is_valid(""));
        assert!(!slot_name_is_valid("two words"));
        assert!(!slot_name_is_valid("tab\tseparated"));
        assert!(!slot_name_is_valid("trailing "));
    }

    #[test]
    fn test_empty_handle_rejects_access() {
        let handle = SlotHandle::empty(ValueKind::Integer);
        assert!(!handle.bound());
        assert_eq!(handle.require_bound(), Err(SlotError::Unbound));
        assert_eq!(handle.require_writable(), Err(SlotError::NotWritable));
    }
}
