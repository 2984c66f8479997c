// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Conversion of Rust inputs into native call arguments.
//!
//! Absent context strings become null pointers. `Some("")` becomes a
//! non-null pointer to an empty NUL-terminated string; the native library
//! may treat the two differently.

use core::ptr;
use std::ffi::CString;

use cng_dpapi_sys::NativeContext;

use crate::error::MarshalError;

/// Optional identity strings passed through to protect/unprotect.
///
/// ```rust
/// use cng_dpapi::ProtectionContext;
///
/// let context = ProtectionContext::new().server("dc01.example.com").username("alice");
///
/// assert_eq!(context.server, Some("dc01.example.com"));
/// assert_eq!(context.domain, None);
/// ```
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ProtectionContext<'a> {
    /// `server`, null when `None`.
    pub server: Option<&'a str>,
    /// `domain`, null when `None`.
    pub domain: Option<&'a str>,
    /// `username`, null when `None`.
    pub username: Option<&'a str>,
}

impl<'a> ProtectionContext<'a> {
    /// No context: all three arguments null.
    pub const fn new() -> Self {
        Self {
            server: None,
            domain: None,
            username: None,
        }
    }

    /// Sets `server`.
    pub fn server(mut self, server: impl Into<Option<&'a str>>) -> Self {
        self.server = server.into();
        self
    }

    /// Sets `domain`.
    pub fn domain(mut self, domain: impl Into<Option<&'a str>>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Sets `username`.
    pub fn username(mut self, username: impl Into<Option<&'a str>>) -> Self {
        self.username = username.into();
        self
    }
}

/// Owned, NUL-terminated copies of a [`ProtectionContext`].
///
/// Pointers from [`as_native`](Self::as_native) borrow from `self`.
#[derive(Debug)]
pub(crate) struct MarshaledContext {
    server: Option<CString>,
    domain: Option<CString>,
    username: Option<CString>,
}

impl MarshaledContext {
    pub(crate) fn new(context: &ProtectionContext<'_>) -> Result<Self, MarshalError> {
        Ok(Self {
            server: optional_c_string("server", context.server)?,
            domain: optional_c_string("domain", context.domain)?,
            username: optional_c_string("username", context.username)?,
        })
    }

    /// Raw arguments. `self` must outlive the native call they are passed to.
    pub(crate) fn as_native(&self) -> NativeContext {
        NativeContext {
            server: as_nullable_ptr(&self.server),
            domain: as_nullable_ptr(&self.domain),
            username: as_nullable_ptr(&self.username),
        }
    }
}

fn as_nullable_ptr(value: &Option<CString>) -> *const core::ffi::c_char {
    value.as_ref().map_or(ptr::null(), |s| s.as_ptr())
}

/// UTF-8 `value` as a NUL-terminated string.
pub(crate) fn c_string(parameter: &'static str, value: &str) -> Result<CString, MarshalError> {
    CString::new(value).map_err(|e| MarshalError::InteriorNul {
        parameter,
        position: e.nul_position(),
    })
}

pub(crate) fn optional_c_string(
    parameter: &'static str,
    value: Option<&str>,
) -> Result<Option<CString>, MarshalError> {
    value.map(|v| c_string(parameter, v)).transpose()
}

/// Byte length as the native `uint32_t` size argument.
pub(crate) fn native_len(parameter: &'static str, len: usize) -> Result<u32, MarshalError> {
    u32::try_from(len).map_err(|_| MarshalError::TooLarge { parameter, len })
}
