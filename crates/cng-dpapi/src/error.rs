// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for cng-dpapi.
use thiserror::Error;

use cng_dpapi_sys::{LoadError, NativeStatus};

use crate::status::Operation;

/// A native call returned a nonzero status.
///
/// The code is carried verbatim. Its meaning is defined by the native
/// library version in use; no translation is attempted.
#[derive(Debug, Error, Clone, Copy, Eq, PartialEq)]
#[error("native '{operation}' failed with status {code} ({code:#010x})")]
pub struct ProtectionError {
    /// Operation whose native call failed.
    pub operation: Operation,
    /// Raw native status.
    pub code: NativeStatus,
}

/// An input could not be represented for the native call.
///
/// Always raised before any native call is made.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum MarshalError {
    /// A string parameter contains a NUL byte.
    #[error("{parameter} contains a NUL byte at position {position}")]
    InteriorNul {
        /// Parameter name.
        parameter: &'static str,
        /// Byte offset of the first NUL.
        position: usize,
    },

    /// A byte parameter is longer than a native `uint32_t` length.
    #[error("{parameter} is {len} bytes, larger than the native length limit")]
    TooLarge {
        /// Parameter name.
        parameter: &'static str,
        /// Actual length in bytes.
        len: usize,
    },
}

/// Errors surfaced by the secret-protection API.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum DpapiError {
    /// The native library or one of its entry points could not be resolved.
    #[error("native library unavailable: {0}")]
    NativeUnavailable(#[from] LoadError),

    /// The native library reported a failure.
    #[error(transparent)]
    Protection(#[from] ProtectionError),

    /// An input was rejected before reaching the native library.
    #[error(transparent)]
    Marshal(#[from] MarshalError),

    /// The descriptor was created by a different library instance.
    #[error("protection descriptor was created by a different library instance")]
    ForeignDescriptor,
}

impl DpapiError {
    /// The native failure, if this error is one.
    pub fn protection(&self) -> Option<&ProtectionError> {
        match self {
            Self::Protection(e) => Some(e),
            _ => None,
        }
    }
}
