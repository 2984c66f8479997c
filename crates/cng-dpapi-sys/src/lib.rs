// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Raw bindings to the CNG DPAPI-NG native library.
//!
//! This crate does no interpretation of native results. It only:
//!
//! - declares the fixed signatures of the three `ncrypt_*` entry points and
//!   the paired deallocation primitive ([`EntryPoints`]),
//! - resolves those symbols once, at load time ([`NativeLibrary`]),
//! - invokes them with zero-initialized output slots and hands back the raw
//!   status together with whatever the native side wrote.
//!
//! Status codes, buffer ownership and handle wrapping are the caller's
//! business (see the `cng-dpapi` crate).
//!
//! # Loading
//!
//! ```rust,no_run
//! use cng_dpapi_sys::{LibraryConfig, NativeLibrary};
//!
//! let config = LibraryConfig::from_env();
//! match NativeLibrary::load(&config) {
//!     Ok(library) => println!("loaded {}", library.path()),
//!     Err(e) => eprintln!("native library unavailable: {e}"),
//! }
//! ```
//!
//! A loaded library always carries fully resolved function pointers, so a
//! missing symbol is reported by [`NativeLibrary::load`] and never at the
//! first call site.

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod config;
mod entry_points;
mod error;
mod library;

pub use config::{FREE_SYMBOL_ENV, LIBRARY_ENV, LibraryConfig, default_library_name};
pub use entry_points::{
    CREATE_PROTECTION_DESCRIPTOR_SYMBOL, CreateProtectionDescriptorFn, EntryPoints, FreeFn,
    NativeContext, NativeStatus, PROTECT_SECRET_SYMBOL, ProtectSecretFn,
    ProtectionDescriptorHandle, RawBuffer, UNPROTECT_SECRET_SYMBOL, UnprotectSecretFn,
};
pub use error::LoadError;
pub use library::NativeLibrary;
