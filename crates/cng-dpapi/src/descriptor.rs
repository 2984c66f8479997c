// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Protection descriptor handles.

use core::fmt;

use cng_dpapi_sys::ProtectionDescriptorHandle;

use crate::client::CngDpapi;

/// Flags forwarded verbatim to `ncrypt_create_protection_descriptor`.
///
/// Defaults to `0`, the native library's default behavior.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct DescriptorFlags(u32);

impl DescriptorFlags {
    /// No flags.
    pub const NONE: Self = Self(0);

    /// Wraps raw native flag bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw native flag bits.
    pub const fn bits(self) -> u32 {
        self.0
    }
}

/// Opaque token for a native protection descriptor.
///
/// Produced by [`CngDpapi::create_protection_descriptor`] and borrowed by
/// [`CngDpapi::protect`]. It cannot be cloned, inspected or outlive the
/// library instance that created it.
///
/// # Resource growth
///
/// The native library exposes no release entry point for descriptors, so
/// dropping this token frees nothing on the native side. Create descriptors
/// once and reuse them; creating one per call grows native memory for the
/// lifetime of the process.
pub struct ProtectionDescriptor<'lib> {
    handle: ProtectionDescriptorHandle,
    owner: &'lib CngDpapi,
}

impl<'lib> ProtectionDescriptor<'lib> {
    pub(crate) fn new(handle: ProtectionDescriptorHandle, owner: &'lib CngDpapi) -> Self {
        if handle.is_null() {
            tracing::warn!("native library reported success with a null descriptor handle");
        }

        Self { handle, owner }
    }

    pub(crate) fn handle(&self) -> ProtectionDescriptorHandle {
        self.handle
    }

    pub(crate) fn belongs_to(&self, library: &CngDpapi) -> bool {
        core::ptr::eq(self.owner, library)
    }
}

// Safety: the handle is only ever passed back to the native library, which
// owns the descriptor. Concurrent use is not allowed (no Sync).
unsafe impl Send for ProtectionDescriptor<'_> {}

impl fmt::Debug for ProtectionDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtectionDescriptor").finish_non_exhaustive()
    }
}
