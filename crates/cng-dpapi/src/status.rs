// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Native status translation.

use core::fmt;

use cng_dpapi_sys::NativeStatus;

use crate::error::ProtectionError;

/// The three public operations, as reported in [`ProtectionError`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Operation {
    /// `createProtectionDescriptor`
    CreateProtectionDescriptor,
    /// `protect`
    Protect,
    /// `unprotect`
    Unprotect,
}

impl Operation {
    /// Stable operation name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateProtectionDescriptor => "createProtectionDescriptor",
            Self::Protect => "protect",
            Self::Unprotect => "unprotect",
        }
    }

    /// Status the native entry point behind this operation uses for success.
    pub const fn success_status(self) -> NativeStatus {
        match self {
            Self::CreateProtectionDescriptor | Self::Protect | Self::Unprotect => 0,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<&str> for Operation {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Maps a native status to `Ok(())` or a [`ProtectionError`] carrying the raw code.
///
/// Must run before any output slot of the call is touched.
#[inline]
pub fn translate(status: NativeStatus, operation: Operation) -> Result<(), ProtectionError> {
    if status == operation.success_status() {
        return Ok(());
    }

    Err(ProtectionError {
        operation,
        code: status,
    })
}
