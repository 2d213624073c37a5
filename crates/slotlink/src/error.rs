// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 slotlink contributors

//! Error types for slot binding, registration, and access.
//!
//! Binding and registration failures are recoverable results: a caller may
//! keep an unbound handle around and poll [`bound()`](crate::FoundSlot::bound)
//! instead of propagating. Precondition violations that indicate a
//! programming error (window bounds, double registration) panic instead —
//! see [`crate::window`].

use std::fmt;

use crate::kind::{RawKind, ValueKind};

/// Errors from binding a consumer to an existing host slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// Slot name is empty or contains whitespace.
    InvalidName(String),
    /// The host registry has no slot with this name.
    NotFound(String),
    /// The host-declared kind does not correspond to the requested static type.
    TypeMismatch {
        /// Kind implied by the static type argument.
        expected: ValueKind,
        /// Kind bitmask reported by the host.
        actual: RawKind,
    },
    /// The host reported a kind outside the defined set.
    UnknownKind(RawKind),
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName(name) => {
                write!(f, "invalid slot name {:?}: must be non-empty with no whitespace", name)
            }
            Self::NotFound(name) => write!(f, "slot not found: {}", name),
            Self::TypeMismatch { expected, actual } => {
                write!(f, "slot kind mismatch: expected {}, host declared {}", expected, actual)
            }
            Self::UnknownKind(raw) => write!(f, "host declared an unknown slot kind: {}", raw),
        }
    }
}

impl std::error::Error for BindError {}

/// Errors from publishing a new slot backed by client-owned storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    /// Slot name is empty or contains whitespace.
    InvalidName(String),
    /// Array storage was registered with zero capacity.
    InvalidCapacity,
}

impl fmt::Display for RegisterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName(name) => {
                write!(f, "invalid slot name {:?}: must be non-empty with no whitespace", name)
            }
            Self::InvalidCapacity => write!(f, "array slot capacity must be greater than zero"),
        }
    }
}

impl std::error::Error for RegisterError {}

/// Errors from accessing a slot through an existing handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// Operation attempted before a successful bind or registration.
    Unbound,
    /// Write attempted on a slot the host reports as read-only.
    NotWritable,
    /// Array index at or past the current slot length.
    OutOfRange {
        /// Requested element index.
        index: usize,
        /// Slot length at the time of the call.
        length: usize,
    },
}

impl fmt::Display for SlotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbound => write!(f, "slot is not bound"),
            Self::NotWritable => write!(f, "slot is not writable"),
            Self::OutOfRange { index, length } => {
                write!(f, "array index out of range: {} >= {}", index, length)
            }
        }
    }
}

impl std::error::Error for SlotError {}
