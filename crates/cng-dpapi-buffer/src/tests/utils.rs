// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test utilities for cng-dpapi-buffer.

use core::ffi::c_void;
use core::sync::atomic::{AtomicUsize, Ordering};

use cng_dpapi_sys::RawBuffer;

static RELEASES: AtomicUsize = AtomicUsize::new(0);

/// Deallocator that counts calls before handing the pointer to libc.
pub unsafe extern "C" fn counting_free(ptr: *mut c_void) {
    RELEASES.fetch_add(1, Ordering::SeqCst);
    unsafe { libc::free(ptr) }
}

/// Deallocator that only counts. For memory libc does not own.
pub unsafe extern "C" fn counting_noop_free(_ptr: *mut c_void) {
    RELEASES.fetch_add(1, Ordering::SeqCst);
}

pub fn reset_releases() {
    RELEASES.store(0, Ordering::SeqCst);
}

pub fn releases() -> usize {
    RELEASES.load(Ordering::SeqCst)
}

/// Copies `bytes` into a fresh `malloc` allocation, as the native library would.
pub fn malloc_copy_of(bytes: &[u8]) -> RawBuffer {
    let ptr = unsafe { libc::malloc(bytes.len().max(1)) } as *mut u8;
    assert!(!ptr.is_null(), "malloc failed");

    unsafe { core::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr, bytes.len()) };

    RawBuffer {
        ptr,
        len: bytes.len() as u32,
    }
}
