// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! One-shot resolution of the native library and its entry points.

use crate::config::LibraryConfig;
use crate::entry_points::EntryPoints;
use crate::error::LoadError;

/// A loaded native library with every entry point resolved.
///
/// The library stays mapped until this value is dropped.
pub struct NativeLibrary {
    path: String,
    entry_points: EntryPoints,
    #[cfg(unix)]
    _handle: unix::DlHandle,
}

impl NativeLibrary {
    /// Loads the configured library and resolves all entry points.
    ///
    /// Fails without side effects if the library cannot be opened or any
    /// required symbol is absent.
    #[cfg(unix)]
    pub fn load(config: &LibraryConfig) -> Result<Self, LoadError> {
        let handle = unix::DlHandle::open(config.library())?;
        let entry_points = unix::resolve(&handle, config)?;

        tracing::debug!(library = config.library(), "native library loaded");

        Ok(Self {
            path: config.library().to_owned(),
            entry_points,
            _handle: handle,
        })
    }

    /// Dynamic loading is only implemented for Unix targets.
    #[cfg(not(unix))]
    pub fn load(config: &LibraryConfig) -> Result<Self, LoadError> {
        let _ = config;
        Err(LoadError::Unsupported)
    }

    /// Path or name the library was loaded from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resolved entry points. Valid for as long as `self` is alive.
    pub fn entry_points(&self) -> &EntryPoints {
        &self.entry_points
    }
}

// Safety: the dl handle is only used again by dlclose in Drop.
unsafe impl Send for NativeLibrary {}
unsafe impl Sync for NativeLibrary {}

impl core::fmt::Debug for NativeLibrary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NativeLibrary")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(unix)]
mod unix {
    use core::ffi::{CStr, c_void};
    use core::ptr::NonNull;
    use std::ffi::CString;

    use crate::config::LibraryConfig;
    use crate::entry_points::{
        CREATE_PROTECTION_DESCRIPTOR_SYMBOL, CreateProtectionDescriptorFn, EntryPoints, FreeFn,
        PROTECT_SECRET_SYMBOL, ProtectSecretFn, UNPROTECT_SECRET_SYMBOL, UnprotectSecretFn,
    };
    use crate::error::LoadError;

    pub(super) struct DlHandle(NonNull<c_void>);

    impl DlHandle {
        pub(super) fn open(library: &str) -> Result<Self, LoadError> {
            let path = CString::new(library).map_err(|_| LoadError::InvalidName(library.to_owned()))?;

            let raw = unsafe { libc::dlopen(path.as_ptr(), libc::RTLD_NOW | libc::RTLD_LOCAL) };

            match NonNull::new(raw) {
                Some(handle) => Ok(Self(handle)),
                None => Err(LoadError::LibraryNotFound {
                    path: library.to_owned(),
                    reason: last_error(),
                }),
            }
        }

        fn symbol(&self, name: &CStr) -> Result<NonNull<c_void>, LoadError> {
            let raw = unsafe { libc::dlsym(self.0.as_ptr(), name.as_ptr()) };

            NonNull::new(raw).ok_or_else(|| LoadError::SymbolMissing {
                symbol: name.to_string_lossy().into_owned(),
            })
        }
    }

    impl Drop for DlHandle {
        fn drop(&mut self) {
            unsafe {
                libc::dlclose(self.0.as_ptr());
            }
        }
    }

    pub(super) fn resolve(handle: &DlHandle, config: &LibraryConfig) -> Result<EntryPoints, LoadError> {
        let create = handle.symbol(CREATE_PROTECTION_DESCRIPTOR_SYMBOL)?;
        let protect = handle.symbol(PROTECT_SECRET_SYMBOL)?;
        let unprotect = handle.symbol(UNPROTECT_SECRET_SYMBOL)?;

        let free: FreeFn = match config.free_symbol() {
            Some(name) => {
                let name = CString::new(name).map_err(|_| LoadError::InvalidName(name.to_owned()))?;
                let sym = handle.symbol(&name)?;
                unsafe { core::mem::transmute::<*mut c_void, FreeFn>(sym.as_ptr()) }
            }
            None => libc::free,
        };

        // Safety: the symbols are the documented C entry points; their
        // signatures are fixed by the native library's header.
        unsafe {
            Ok(EntryPoints {
                create_protection_descriptor: core::mem::transmute::<
                    *mut c_void,
                    CreateProtectionDescriptorFn,
                >(create.as_ptr()),
                protect_secret: core::mem::transmute::<*mut c_void, ProtectSecretFn>(protect.as_ptr()),
                unprotect_secret: core::mem::transmute::<*mut c_void, UnprotectSecretFn>(
                    unprotect.as_ptr(),
                ),
                free,
            })
        }
    }

    fn last_error() -> String {
        let raw = unsafe { libc::dlerror() };

        if raw.is_null() {
            return String::from("unknown dynamic loader error");
        }

        unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned()
    }
}
