// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! CngDpapi - the secret-protection operations.
//!
//! Every operation runs the same sequence:
//!
//! 1. marshal inputs (no native call on failure),
//! 2. invoke the entry point,
//! 3. translate the status (output slots untouched on failure),
//! 4. take ownership of the output.

use cng_dpapi_buffer::{SecretBytes, take_ownership};
use cng_dpapi_sys::{EntryPoints, LibraryConfig, NativeLibrary, NativeStatus, RawBuffer};

use crate::descriptor::{DescriptorFlags, ProtectionDescriptor};
use crate::error::DpapiError;
use crate::marshal::{self, MarshaledContext, ProtectionContext};
use crate::status::{self, Operation};

enum Backend {
    Loaded(NativeLibrary),
    Linked(EntryPoints),
}

/// Handle to a resolved native secret-protection library.
///
/// Calls are synchronous and run on the calling thread. `CngDpapi` is
/// `Send + Sync` on the assumption that the native library accepts
/// concurrent calls with distinct arguments.
pub struct CngDpapi {
    backend: Backend,
}

impl CngDpapi {
    /// Loads the native library described by `config`.
    pub fn load(config: &LibraryConfig) -> Result<Self, DpapiError> {
        let library = NativeLibrary::load(config).inspect_err(|e| {
            tracing::warn!(library = config.library(), error = %e, "native library unavailable");
        })?;

        Ok(Self {
            backend: Backend::Loaded(library),
        })
    }

    /// Uses already-resolved entry points (statically linked or in-process).
    ///
    /// # Safety
    ///
    /// The entry points must implement the native library's C contract, and
    /// `free` must release buffers produced by `protect_secret` and
    /// `unprotect_secret`.
    pub unsafe fn from_entry_points(entry_points: EntryPoints) -> Self {
        Self {
            backend: Backend::Linked(entry_points),
        }
    }

    fn entry_points(&self) -> &EntryPoints {
        match &self.backend {
            Backend::Loaded(library) => library.entry_points(),
            Backend::Linked(entry_points) => entry_points,
        }
    }

    /// Creates a protection descriptor with default flags (`0`).
    pub fn create_protection_descriptor(
        &self,
        descriptor: &str,
    ) -> Result<ProtectionDescriptor<'_>, DpapiError> {
        self.create_protection_descriptor_with_flags(descriptor, DescriptorFlags::default())
    }

    /// Creates a protection descriptor from a descriptor rule string.
    pub fn create_protection_descriptor_with_flags(
        &self,
        descriptor: &str,
        flags: DescriptorFlags,
    ) -> Result<ProtectionDescriptor<'_>, DpapiError> {
        let descriptor_string = marshal::c_string("descriptor", descriptor)?;

        tracing::debug!(
            operation = %Operation::CreateProtectionDescriptor,
            flags = flags.bits(),
            "invoking native library"
        );

        // Safety: entry points are resolved and follow the C contract.
        let (status, handle) =
            unsafe { self.entry_points().create_descriptor(&descriptor_string, flags.bits()) };

        check(status, Operation::CreateProtectionDescriptor)?;

        Ok(ProtectionDescriptor::new(handle, self))
    }

    /// Protects `plaintext` under `descriptor`.
    pub fn protect(
        &self,
        descriptor: &ProtectionDescriptor<'_>,
        plaintext: &[u8],
        context: &ProtectionContext<'_>,
    ) -> Result<SecretBytes, DpapiError> {
        let data_size = marshal::native_len("plaintext", plaintext.len())?;
        let context = MarshaledContext::new(context)?;

        if !descriptor.belongs_to(self) {
            return Err(DpapiError::ForeignDescriptor);
        }

        tracing::debug!(operation = %Operation::Protect, len = plaintext.len(), "invoking native library");

        // Safety: `plaintext` is valid for `data_size` bytes, `context` outlives
        // the call and `descriptor` was produced by these entry points.
        let (status, out) = unsafe {
            self.entry_points().protect(
                descriptor.handle(),
                plaintext.as_ptr(),
                data_size,
                context.as_native(),
            )
        };

        self.take_output(status, out, Operation::Protect)
    }

    /// Recovers the plaintext of a blob produced by [`protect`](Self::protect).
    pub fn unprotect(
        &self,
        ciphertext: &[u8],
        context: &ProtectionContext<'_>,
    ) -> Result<SecretBytes, DpapiError> {
        let data_size = marshal::native_len("ciphertext", ciphertext.len())?;
        let context = MarshaledContext::new(context)?;

        tracing::debug!(operation = %Operation::Unprotect, len = ciphertext.len(), "invoking native library");

        // Safety: `ciphertext` is valid for `data_size` bytes and `context`
        // outlives the call.
        let (status, out) = unsafe {
            self.entry_points()
                .unprotect(ciphertext.as_ptr(), data_size, context.as_native())
        };

        self.take_output(status, out, Operation::Unprotect)
    }

    fn take_output(
        &self,
        status: NativeStatus,
        out: RawBuffer,
        operation: Operation,
    ) -> Result<SecretBytes, DpapiError> {
        check(status, operation)?;

        // Safety: the call succeeded, so `out` describes a buffer from the
        // allocator `free` belongs to, owned by nobody else.
        let secret = unsafe { take_ownership(out, self.entry_points().free) };

        tracing::debug!(operation = %operation, len = secret.len(), "native output transferred");

        Ok(secret)
    }
}

impl core::fmt::Debug for CngDpapi {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut debug = f.debug_struct("CngDpapi");

        match &self.backend {
            Backend::Loaded(library) => debug.field("library", &library.path()),
            Backend::Linked(_) => debug.field("library", &"<linked>"),
        };

        debug.finish()
    }
}

fn check(status: NativeStatus, operation: Operation) -> Result<(), DpapiError> {
    status::translate(status, operation).map_err(|e| {
        tracing::warn!(operation = %operation, code = e.code, "native call failed");
        DpapiError::from(e)
    })
}
