// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for cng-dpapi-sys.
use thiserror::Error;

/// Reasons the native library could not be made available.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum LoadError {
    /// `dlopen` refused the configured library.
    #[error("could not load native library '{path}': {reason}")]
    LibraryNotFound {
        /// Library path or name that was passed to the loader.
        path: String,
        /// Loader diagnostic (`dlerror`).
        reason: String,
    },

    /// The library loaded but does not export a required entry point.
    #[error("native library does not export '{symbol}'")]
    SymbolMissing {
        /// Name of the unresolved symbol.
        symbol: String,
    },

    /// A configured path or symbol name contains an interior NUL byte.
    #[error("'{0}' cannot be passed to the dynamic loader")]
    InvalidName(String),

    /// Dynamic loading is not implemented for this target.
    #[error("dynamic loading of the native library is not supported on this platform")]
    Unsupported,

    /// No library has been loaded yet.
    #[error("native library has not been initialized")]
    NotInitialized,
}
