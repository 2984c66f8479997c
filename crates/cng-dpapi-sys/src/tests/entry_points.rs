// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Adapter tests against in-process entry points.
//!
//! The stand-ins report "slots not zero-initialized" as status 99 so the
//! assertion happens on the Rust side.

use core::ffi::{CStr, c_char, c_void};
use core::ptr;

use crate::entry_points::{EntryPoints, NativeContext, ProtectionDescriptorHandle};

const DIRTY_SLOTS: u32 = 99;
const CONTEXT_PRESENT: u32 = 7;

static HANDLE_MARKER: u8 = 0;

unsafe extern "C" fn create(
    descriptor_string: *const c_char,
    flags: u32,
    descriptor: *mut ProtectionDescriptorHandle,
) -> u32 {
    unsafe {
        if !(*descriptor).is_null() {
            return DIRTY_SLOTS;
        }
        if CStr::from_ptr(descriptor_string).to_bytes() != b"LOCAL=user" {
            return 1;
        }
        *descriptor = &HANDLE_MARKER as *const u8 as *mut c_void;
    }

    flags
}

unsafe extern "C" fn protect(
    descriptor: ProtectionDescriptorHandle,
    data: *const u8,
    data_size: u32,
    out: *mut *mut u8,
    out_size: *mut u32,
    _server: *const c_char,
    _domain: *const c_char,
    _username: *const c_char,
) -> u32 {
    unsafe {
        if !(*out).is_null() || *out_size != 0 {
            return DIRTY_SLOTS;
        }
        if descriptor != &HANDLE_MARKER as *const u8 as *mut c_void {
            return 2;
        }
        *out = data as *mut u8;
        *out_size = data_size;
    }

    0
}

unsafe extern "C" fn unprotect(
    _data: *const u8,
    _data_size: u32,
    out: *mut *mut u8,
    out_size: *mut u32,
    server: *const c_char,
    domain: *const c_char,
    username: *const c_char,
) -> u32 {
    unsafe {
        if !(*out).is_null() || *out_size != 0 {
            return DIRTY_SLOTS;
        }
    }

    if server.is_null() && domain.is_null() && username.is_null() {
        0
    } else {
        CONTEXT_PRESENT
    }
}

unsafe extern "C" fn never_free(_ptr: *mut c_void) {}

fn entry_points() -> EntryPoints {
    EntryPoints {
        create_protection_descriptor: create,
        protect_secret: protect,
        unprotect_secret: unprotect,
        free: never_free,
    }
}

#[test]
fn test_create_descriptor_returns_handle_and_status() {
    let (status, handle) = unsafe { entry_points().create_descriptor(c"LOCAL=user", 0) };

    assert_eq!(status, 0);
    assert_eq!(handle, &HANDLE_MARKER as *const u8 as *mut c_void);
}

#[test]
fn test_create_descriptor_forwards_flags_verbatim() {
    let (status, _) = unsafe { entry_points().create_descriptor(c"LOCAL=user", 42) };

    assert_eq!(status, 42);
}

#[test]
fn test_protect_zero_initializes_output_slots() {
    let data = [1u8, 2, 3];
    let handle = &HANDLE_MARKER as *const u8 as *mut c_void;

    let (status, out) = unsafe {
        entry_points().protect(handle, data.as_ptr(), data.len() as u32, NativeContext::null())
    };

    assert_eq!(status, 0);
    assert_eq!(out.ptr as *const u8, data.as_ptr());
    assert_eq!(out.len, 3);
}

#[test]
fn test_unprotect_passes_null_context() {
    let (status, out) = unsafe { entry_points().unprotect(ptr::null(), 0, NativeContext::default()) };

    assert_eq!(status, 0);
    assert!(out.ptr.is_null());
    assert_eq!(out.len, 0);
}

#[test]
fn test_unprotect_passes_present_context() {
    let context = NativeContext {
        server: c"".as_ptr(),
        ..NativeContext::null()
    };

    let (status, _) = unsafe { entry_points().unprotect(ptr::null(), 0, context) };

    assert_eq!(status, CONTEXT_PRESENT);
}
