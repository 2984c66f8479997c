// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # cng_dpapi
//!
//! Safe Rust access to a native CNG DPAPI-NG secret-protection library.
//!
//! All cryptography happens inside the native library. This crate is the
//! boundary: it resolves the entry points once, marshals inputs, translates
//! native status codes into typed errors and moves native output buffers
//! into runtime-owned memory, releasing each exactly once.
//!
//! ## Operations
//!
//! - [`CngDpapi::create_protection_descriptor`]: descriptor rule string to an
//!   opaque [`ProtectionDescriptor`] token.
//! - [`CngDpapi::protect`]: plaintext to protected blob.
//! - [`CngDpapi::unprotect`]: protected blob back to plaintext.
//!
//! Each accepts optional `server`, `domain` and `username` through
//! [`ProtectionContext`]. `None` reaches the native side as a null pointer,
//! never as an empty string.
//!
//! ## Errors
//!
//! - [`DpapiError::NativeUnavailable`]: library or symbol missing. Reported
//!   by [`CngDpapi::load`] / [`init`], never at call time.
//! - [`DpapiError::Protection`]: nonzero native status, carried verbatim
//!   with the failing [`Operation`].
//! - [`DpapiError::Marshal`]: input not representable; no native call made.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cng_dpapi::{LibraryConfig, ProtectionContext};
//!
//! fn run() -> Result<(), cng_dpapi::DpapiError> {
//!     let dpapi = cng_dpapi::init(&LibraryConfig::from_env())?;
//!
//!     let descriptor = dpapi.create_protection_descriptor("LOCAL=user")?;
//!     let context = ProtectionContext::new();
//!
//!     let blob = dpapi.protect(&descriptor, b"database password", &context)?;
//!     let plaintext = dpapi.unprotect(blob.as_bytes(), &context)?;
//!
//!     assert_eq!(plaintext.as_bytes(), b"database password");
//!     Ok(())
//! }
//! ```
//!
//! ## Descriptor lifetime
//!
//! The native library has no descriptor release entry point. See
//! [`ProtectionDescriptor`].

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod client;
mod descriptor;
mod error;
mod global;
mod marshal;
mod status;

pub use client::CngDpapi;
pub use descriptor::{DescriptorFlags, ProtectionDescriptor};
pub use error::{DpapiError, MarshalError, ProtectionError};
pub use global::{
    create_protection_descriptor, create_protection_descriptor_with_flags, global, init,
    init_with_entry_points, protect, unprotect,
};
pub use marshal::ProtectionContext;
pub use status::{Operation, translate};

pub use cng_dpapi_buffer::SecretBytes;
pub use cng_dpapi_sys::{EntryPoints, LibraryConfig, LoadError, NativeStatus};
