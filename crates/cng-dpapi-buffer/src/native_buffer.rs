// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! NativeBuffer - scoped ownership of a native allocation.
//!
//! The guard is consumed by [`NativeBuffer::into_secret`], so once the
//! contents are copied and the allocation released there is no handle left
//! to read or release it again.

use core::ptr::NonNull;

use cng_dpapi_sys::{FreeFn, RawBuffer};

use crate::secret_bytes::SecretBytes;

/// Guard over a buffer allocated by the native library.
///
/// Dropping the guard releases the allocation through its paired deallocator.
pub struct NativeBuffer {
    ptr: NonNull<u8>,
    len: usize,
    free: FreeFn,
}

impl NativeBuffer {
    /// Takes charge of `raw`.
    ///
    /// Returns `None` when there is nothing to own: a null address or a
    /// reported length of zero. No release is attempted in either case.
    ///
    /// # Safety
    ///
    /// - `raw` must come from a native call that reported success.
    /// - A non-null `raw.ptr` must be valid for reads of `raw.len` bytes and
    ///   allocated by the allocator `free` belongs to.
    /// - Nothing else may release `raw.ptr`.
    pub unsafe fn from_raw(raw: RawBuffer, free: FreeFn) -> Option<Self> {
        let Some(ptr) = NonNull::new(raw.ptr) else {
            if raw.len != 0 {
                tracing::warn!(len = raw.len, "native call reported a length with a null buffer");
            }
            return None;
        };

        if raw.len == 0 {
            tracing::debug!("native call returned a zero-length buffer, nothing to release");
            return None;
        }

        Some(Self {
            ptr,
            len: raw.len as usize,
            free,
        })
    }

    /// Length of the native allocation in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: empty buffers are never wrapped.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copies the contents into a [`SecretBytes`] and releases the allocation.
    pub fn into_secret(self) -> SecretBytes {
        self.into_secret_with(|native| native.to_vec())
    }

    pub(crate) fn into_secret_with<F>(self, copy: F) -> SecretBytes
    where
        F: FnOnce(&[u8]) -> Vec<u8>,
    {
        // Safety: guaranteed by `from_raw`; the allocation is alive until `self` drops.
        let native = unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) };

        // If `copy` unwinds, `self` is dropped during unwinding and still releases.
        SecretBytes::from_vec(copy(native))
    }
}

impl Drop for NativeBuffer {
    fn drop(&mut self) {
        unsafe { (self.free)(self.ptr.as_ptr().cast()) }
    }
}

impl core::fmt::Debug for NativeBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NativeBuffer")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

/// Moves the contents of a native output buffer into runtime-owned memory.
///
/// A null address or a zero length yields empty [`SecretBytes`] and no
/// release. Otherwise exactly `raw.len` bytes are copied and `free` is
/// invoked on the address exactly once.
///
/// # Safety
///
/// Same contract as [`NativeBuffer::from_raw`].
pub unsafe fn take_ownership(raw: RawBuffer, free: FreeFn) -> SecretBytes {
    match unsafe { NativeBuffer::from_raw(raw, free) } {
        Some(buffer) => buffer.into_secret(),
        None => SecretBytes::default(),
    }
}
