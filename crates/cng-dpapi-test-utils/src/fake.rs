// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Fake entry points with the native library's C ABI.
//!
//! Protected blob layout: `MAGIC (4) || descriptor id (u32 LE) || payload ^ MASK`.

use core::ffi::{CStr, c_char, c_void};
use core::sync::atomic::{AtomicU32, Ordering};

use cng_dpapi_sys::{EntryPoints, NativeStatus, ProtectionDescriptorHandle};

use crate::recorder::{
    FakeOperation, count_call, count_release, forced_status, record_context, record_descriptor,
    zero_length_enabled,
};

/// Returned by unprotect for blobs the fake did not produce.
pub const NTE_BAD_DATA: NativeStatus = 0x8009_0005;
/// Returned by protect for a null descriptor handle.
pub const NTE_INVALID_HANDLE: NativeStatus = 0x8009_0026;
/// Returned for an empty descriptor string or a null data pointer.
pub const NTE_INVALID_PARAMETER: NativeStatus = 0x8009_0027;

/// Address written into output slots on forced failures. Never dereferenceable.
pub const POISONED_OUTPUT: usize = 0xDEAD_BEE0;

const POISONED_LEN: u32 = 0xFFFF;
const MAGIC: [u8; 4] = *b"NCPT";
const HEADER_LEN: usize = 8;
const MASK: u8 = 0x5A;

static NEXT_DESCRIPTOR_ID: AtomicU32 = AtomicU32::new(1);
static ZERO_LENGTH_SENTINEL: u8 = 0;

struct FakeDescriptor {
    id: u32,
}

/// Entry points backed by the fake library.
pub fn fake_entry_points() -> EntryPoints {
    EntryPoints {
        create_protection_descriptor: fake_create_protection_descriptor,
        protect_secret: fake_protect_secret,
        unprotect_secret: fake_unprotect_secret,
        free: fake_free,
    }
}

fn zero_length_sentinel() -> *mut u8 {
    &ZERO_LENGTH_SENTINEL as *const u8 as *mut u8
}

/// # Safety
///
/// `out` and `out_size` must be valid for writes.
unsafe fn poison(out: *mut *mut u8, out_size: *mut u32) {
    unsafe {
        *out = POISONED_OUTPUT as *mut u8;
        *out_size = POISONED_LEN;
    }
}

/// Writes `bytes` into a fresh `malloc` allocation behind the output slots.
///
/// # Safety
///
/// `out` and `out_size` must be valid for writes.
unsafe fn emit(bytes: &[u8], out: *mut *mut u8, out_size: *mut u32) -> NativeStatus {
    if zero_length_enabled() {
        unsafe {
            *out = zero_length_sentinel();
            *out_size = 0;
        }
        return 0;
    }

    if bytes.is_empty() {
        unsafe {
            *out = core::ptr::null_mut();
            *out_size = 0;
        }
        return 0;
    }

    let ptr = unsafe { libc::malloc(bytes.len()) } as *mut u8;
    if ptr.is_null() {
        return NTE_INVALID_PARAMETER;
    }

    unsafe {
        core::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr, bytes.len());
        *out = ptr;
        *out_size = bytes.len() as u32;
    }

    0
}

/// # Safety
///
/// `data` must be valid for reads of `data_size` bytes when `data_size > 0`.
unsafe fn input<'a>(data: *const u8, data_size: u32) -> Option<&'a [u8]> {
    if data_size == 0 {
        return Some(&[]);
    }
    if data.is_null() {
        return None;
    }

    Some(unsafe { core::slice::from_raw_parts(data, data_size as usize) })
}

unsafe extern "C" fn fake_create_protection_descriptor(
    descriptor_string: *const c_char,
    flags: u32,
    descriptor: *mut ProtectionDescriptorHandle,
) -> NativeStatus {
    count_call();

    let forced = forced_status(FakeOperation::CreateProtectionDescriptor);
    if forced != 0 {
        unsafe { *descriptor = POISONED_OUTPUT as ProtectionDescriptorHandle };
        return forced;
    }

    if descriptor_string.is_null() {
        return NTE_INVALID_PARAMETER;
    }

    let rule = unsafe { CStr::from_ptr(descriptor_string) }
        .to_string_lossy()
        .into_owned();
    if rule.is_empty() {
        return NTE_INVALID_PARAMETER;
    }

    record_descriptor(rule, flags);

    let id = NEXT_DESCRIPTOR_ID.fetch_add(1, Ordering::SeqCst);
    unsafe { *descriptor = Box::into_raw(Box::new(FakeDescriptor { id })).cast() };

    0
}

unsafe extern "C" fn fake_protect_secret(
    descriptor: ProtectionDescriptorHandle,
    data: *const u8,
    data_size: u32,
    encrypted_data: *mut *mut u8,
    encrypted_data_size: *mut u32,
    server: *const c_char,
    domain: *const c_char,
    username: *const c_char,
) -> NativeStatus {
    count_call();
    unsafe { record_context(server, domain, username) };

    let forced = forced_status(FakeOperation::Protect);
    if forced != 0 {
        unsafe { poison(encrypted_data, encrypted_data_size) };
        return forced;
    }

    if descriptor.is_null() {
        return NTE_INVALID_HANDLE;
    }
    let id = unsafe { (*descriptor.cast::<FakeDescriptor>()).id };

    let Some(plaintext) = (unsafe { input(data, data_size) }) else {
        return NTE_INVALID_PARAMETER;
    };

    let mut blob = Vec::with_capacity(HEADER_LEN + plaintext.len());
    blob.extend_from_slice(&MAGIC);
    blob.extend_from_slice(&id.to_le_bytes());
    blob.extend(plaintext.iter().map(|b| b ^ MASK));

    unsafe { emit(&blob, encrypted_data, encrypted_data_size) }
}

unsafe extern "C" fn fake_unprotect_secret(
    data: *const u8,
    data_size: u32,
    unpacked_data: *mut *mut u8,
    unpacked_data_size: *mut u32,
    server: *const c_char,
    domain: *const c_char,
    username: *const c_char,
) -> NativeStatus {
    count_call();
    unsafe { record_context(server, domain, username) };

    let forced = forced_status(FakeOperation::Unprotect);
    if forced != 0 {
        unsafe { poison(unpacked_data, unpacked_data_size) };
        return forced;
    }

    let Some(blob) = (unsafe { input(data, data_size) }) else {
        return NTE_INVALID_PARAMETER;
    };

    if blob.len() < HEADER_LEN || blob[..MAGIC.len()] != MAGIC {
        return NTE_BAD_DATA;
    }

    let plaintext: Vec<u8> = blob[HEADER_LEN..].iter().map(|b| b ^ MASK).collect();

    unsafe { emit(&plaintext, unpacked_data, unpacked_data_size) }
}

unsafe extern "C" fn fake_free(ptr: *mut c_void) {
    count_release();

    let ptr = ptr.cast::<u8>();
    if ptr.is_null() || ptr == zero_length_sentinel() || ptr as usize == POISONED_OUTPUT {
        return;
    }

    unsafe { libc::free(ptr.cast()) }
}
