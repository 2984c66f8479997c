// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Process-wide instance with explicit, one-time initialization.
//!
//! Nothing is loaded implicitly. Callers run [`init`] and handle
//! `NativeUnavailable` before using the module-level operations. A failed
//! [`init`] caches nothing and may be retried; a successful one is final.

use std::sync::OnceLock;

use cng_dpapi_buffer::SecretBytes;
use cng_dpapi_sys::{EntryPoints, LibraryConfig, LoadError};

use crate::client::CngDpapi;
use crate::descriptor::{DescriptorFlags, ProtectionDescriptor};
use crate::error::DpapiError;
use crate::marshal::ProtectionContext;

static INSTANCE: OnceLock<CngDpapi> = OnceLock::new();

/// Loads the native library into the process-wide instance.
///
/// Returns the existing instance if one is already initialized; `config` is
/// ignored in that case.
pub fn init(config: &LibraryConfig) -> Result<&'static CngDpapi, DpapiError> {
    if let Some(instance) = INSTANCE.get() {
        tracing::debug!("native library already initialized");
        return Ok(instance);
    }

    let loaded = CngDpapi::load(config)?;

    Ok(INSTANCE.get_or_init(|| loaded))
}

/// Installs already-resolved entry points as the process-wide instance.
///
/// Returns the existing instance if one is already initialized.
///
/// # Safety
///
/// Same contract as [`CngDpapi::from_entry_points`].
pub unsafe fn init_with_entry_points(entry_points: EntryPoints) -> &'static CngDpapi {
    INSTANCE.get_or_init(|| unsafe { CngDpapi::from_entry_points(entry_points) })
}

/// The process-wide instance.
///
/// Fails with `NativeUnavailable(NotInitialized)` until [`init`] succeeds.
pub fn global() -> Result<&'static CngDpapi, DpapiError> {
    INSTANCE
        .get()
        .ok_or(DpapiError::NativeUnavailable(LoadError::NotInitialized))
}

/// [`CngDpapi::create_protection_descriptor`] on the process-wide instance.
pub fn create_protection_descriptor(
    descriptor: &str,
) -> Result<ProtectionDescriptor<'static>, DpapiError> {
    global()?.create_protection_descriptor(descriptor)
}

/// [`CngDpapi::create_protection_descriptor_with_flags`] on the process-wide instance.
pub fn create_protection_descriptor_with_flags(
    descriptor: &str,
    flags: DescriptorFlags,
) -> Result<ProtectionDescriptor<'static>, DpapiError> {
    global()?.create_protection_descriptor_with_flags(descriptor, flags)
}

/// [`CngDpapi::protect`] on the process-wide instance.
pub fn protect(
    descriptor: &ProtectionDescriptor<'_>,
    plaintext: &[u8],
    context: &ProtectionContext<'_>,
) -> Result<SecretBytes, DpapiError> {
    global()?.protect(descriptor, plaintext, context)
}

/// [`CngDpapi::unprotect`] on the process-wide instance.
pub fn unprotect(
    ciphertext: &[u8],
    context: &ProtectionContext<'_>,
) -> Result<SecretBytes, DpapiError> {
    global()?.unprotect(ciphertext, context)
}
