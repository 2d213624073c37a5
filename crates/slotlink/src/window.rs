// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 slotlink contributors

//! Windowed transfer: the shared offset/max copy algorithm for array and
//! byte-string slots.
//!
//! Both lifecycles funnel through these three functions — the consumer's
//! bulk and indexed reads, every publisher window callback, and the mock
//! host's seeded slots — so the bounds and termination logic exists exactly
//! once.
//!
//! A request is `(offset, max)` against the storage's *current* logical
//! length `len`, re-read at the moment of the call:
//!
//! - `dst = None` is a length probe: the current length is returned and no
//!   buffer is touched.
//! - Otherwise the copied window is `[offset, offset + upper)` where
//!   `upper = min(max, len - offset)` when `max > 0`, and `len - offset`
//!   (everything from `offset`) when `max == 0`.
//!
//! Violating a precondition (`offset > len`, an undersized buffer) is a
//! programming error and halts with a panic rather than returning a value.
//! Offsets are `usize`, so negative offsets cannot be expressed.

/// Computes the window size for a `(offset, max)` request against `len`
/// elements, panicking on an impossible offset.
fn upper_limit(len: usize, offset: usize, max: usize) -> usize {
    assert!(
        offset <= len,
        "window offset {} exceeds storage length {}",
        offset,
        len
    );
    let avail = len - offset;
    if max > 0 {
        max.min(avail)
    } else {
        avail
    }
}

/// Windowed read of element storage.
///
/// With `dst = None` this is a length probe: returns `storage.len()` and
/// performs no other validation. Otherwise copies the requested window into
/// the front of `dst` and returns the number of elements copied. `dst` must
/// hold at least the window.
pub fn read_window<T: Copy>(storage: &[T], dst: Option<&mut [T]>, offset: usize, max: usize) -> usize {
    let dst = match dst {
        None => return storage.len(),
        Some(dst) => dst,
    };

    let upper = upper_limit(storage.len(), offset, max);
    assert!(
        dst.len() >= upper,
        "window destination holds {} elements, need {}",
        dst.len(),
        upper
    );

    dst[..upper].copy_from_slice(&storage[offset..offset + upper]);
    upper
}

/// Windowed read of byte-string storage.
///
/// Identical to [`read_window`] except that a NUL terminator is always
/// written at `dst[upper]` after the copied content, regardless of what the
/// content holds. The caller must therefore size `dst` with one spare byte
/// beyond the requested window; an undersized destination panics.
pub fn read_bytes_window(storage: &[u8], dst: Option<&mut [u8]>, offset: usize, max: usize) -> usize {
    let dst = match dst {
        None => return storage.len(),
        Some(dst) => dst,
    };

    let upper = upper_limit(storage.len(), offset, max);
    assert!(
        dst.len() >= upper + 1,
        "byte window destination holds {} bytes, need {} plus a terminator",
        dst.len(),
        upper
    );

    dst[..upper].copy_from_slice(&storage[offset..offset + upper]);
    dst[upper] = 0;
    upper
}

/// Windowed write into element storage.
///
/// Computes the window against the storage's current length, reads the
/// source starting at `offset` *within the source*, and replaces the
/// storage content with exactly that window. A partial window can shrink
/// the storage but never grow it past its pre-write length. Returns the
/// number of elements stored. The source must cover the window.
pub fn write_window<T: Copy>(storage: &mut Vec<T>, src: &[T], offset: usize, max: usize) -> usize {
    let upper = upper_limit(storage.len(), offset, max);
    assert!(
        src.len() >= offset + upper,
        "window source holds {} elements, need {}",
        src.len(),
        offset + upper
    );

    storage.clear();
    storage.extend_from_slice(&src[offset..offset + upper]);
    upper
}
