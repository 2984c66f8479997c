// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Native entry point signatures and their type-safe invocation.

use core::ffi::{CStr, c_char, c_void};
use core::ptr;

/// Raw status returned by every native entry point.
pub type NativeStatus = u32;

/// Opaque `ProtectionDescriptor_p` owned by the native library.
pub type ProtectionDescriptorHandle = *mut c_void;

/// `uint32_t ncrypt_create_protection_descriptor(const char*, uint32_t, ProtectionDescriptor_p*)`
pub type CreateProtectionDescriptorFn = unsafe extern "C" fn(
    descriptor_string: *const c_char,
    flags: u32,
    descriptor: *mut ProtectionDescriptorHandle,
) -> NativeStatus;

/// `uint32_t ncrypt_protect_secret(ProtectionDescriptor_p, const uint8_t*, uint32_t, uint8_t**, uint32_t*, const char*, const char*, const char*)`
pub type ProtectSecretFn = unsafe extern "C" fn(
    descriptor: ProtectionDescriptorHandle,
    data: *const u8,
    data_size: u32,
    encrypted_data: *mut *mut u8,
    encrypted_data_size: *mut u32,
    server: *const c_char,
    domain: *const c_char,
    username: *const c_char,
) -> NativeStatus;

/// `uint32_t ncrypt_unprotect_secret(const uint8_t*, uint32_t, uint8_t**, uint32_t*, const char*, const char*, const char*)`
pub type UnprotectSecretFn = unsafe extern "C" fn(
    data: *const u8,
    data_size: u32,
    unpacked_data: *mut *mut u8,
    unpacked_data_size: *mut u32,
    server: *const c_char,
    domain: *const c_char,
    username: *const c_char,
) -> NativeStatus;

/// Deallocator paired with the native library's allocator.
pub type FreeFn = unsafe extern "C" fn(ptr: *mut c_void);

/// Symbol name of the descriptor constructor.
pub const CREATE_PROTECTION_DESCRIPTOR_SYMBOL: &CStr = c"ncrypt_create_protection_descriptor";
/// Symbol name of the protect entry point.
pub const PROTECT_SECRET_SYMBOL: &CStr = c"ncrypt_protect_secret";
/// Symbol name of the unprotect entry point.
pub const UNPROTECT_SECRET_SYMBOL: &CStr = c"ncrypt_unprotect_secret";

/// Output buffer slots as written by the native side.
///
/// Meaningful only when the accompanying status is a success.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RawBuffer {
    /// Address of the native allocation, or null.
    pub ptr: *mut u8,
    /// Length reported by the native side.
    pub len: u32,
}

/// Nullable `server`, `domain` and `username` arguments.
///
/// The pointers must stay valid for the duration of the call they are passed to.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct NativeContext {
    /// `const char* server`
    pub server: *const c_char,
    /// `const char* domain`
    pub domain: *const c_char,
    /// `const char* username`
    pub username: *const c_char,
}

impl NativeContext {
    /// All three arguments null.
    pub const fn null() -> Self {
        Self {
            server: ptr::null(),
            domain: ptr::null(),
            username: ptr::null(),
        }
    }
}

impl Default for NativeContext {
    fn default() -> Self {
        Self::null()
    }
}

/// Resolved native entry points.
///
/// Every field is a real function pointer; there is no unresolved state.
#[derive(Debug, Clone, Copy)]
pub struct EntryPoints {
    /// `ncrypt_create_protection_descriptor`
    pub create_protection_descriptor: CreateProtectionDescriptorFn,
    /// `ncrypt_protect_secret`
    pub protect_secret: ProtectSecretFn,
    /// `ncrypt_unprotect_secret`
    pub unprotect_secret: UnprotectSecretFn,
    /// Deallocator for buffers produced by the two calls above.
    pub free: FreeFn,
}

impl EntryPoints {
    /// Calls `ncrypt_create_protection_descriptor`.
    ///
    /// The handle slot starts out null and is returned exactly as the native side left it.
    ///
    /// # Safety
    ///
    /// The entry points must implement the documented C contract.
    pub unsafe fn create_descriptor(
        &self,
        descriptor_string: &CStr,
        flags: u32,
    ) -> (NativeStatus, ProtectionDescriptorHandle) {
        let mut handle: ProtectionDescriptorHandle = ptr::null_mut();

        let status = unsafe {
            (self.create_protection_descriptor)(descriptor_string.as_ptr(), flags, &mut handle)
        };

        (status, handle)
    }

    /// Calls `ncrypt_protect_secret`.
    ///
    /// # Safety
    ///
    /// - `descriptor` must be a handle produced by this library's
    ///   `create_descriptor`.
    /// - `data` must be valid for reads of `data_size` bytes.
    /// - The pointers in `context` must be null or point to NUL-terminated strings.
    pub unsafe fn protect(
        &self,
        descriptor: ProtectionDescriptorHandle,
        data: *const u8,
        data_size: u32,
        context: NativeContext,
    ) -> (NativeStatus, RawBuffer) {
        let mut out = RawBuffer {
            ptr: ptr::null_mut(),
            len: 0,
        };

        let status = unsafe {
            (self.protect_secret)(
                descriptor,
                data,
                data_size,
                &mut out.ptr,
                &mut out.len,
                context.server,
                context.domain,
                context.username,
            )
        };

        (status, out)
    }

    /// Calls `ncrypt_unprotect_secret`.
    ///
    /// # Safety
    ///
    /// - `data` must be valid for reads of `data_size` bytes.
    /// - The pointers in `context` must be null or point to NUL-terminated strings.
    pub unsafe fn unprotect(
        &self,
        data: *const u8,
        data_size: u32,
        context: NativeContext,
    ) -> (NativeStatus, RawBuffer) {
        let mut out = RawBuffer {
            ptr: ptr::null_mut(),
            len: 0,
        };

        let status = unsafe {
            (self.unprotect_secret)(
                data,
                data_size,
                &mut out.ptr,
                &mut out.len,
                context.server,
                context.domain,
                context.username,
            )
        };

        (status, out)
    }
}
