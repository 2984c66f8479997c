// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Native library location and deallocator selection.

/// Environment variable overriding the library path or name.
pub const LIBRARY_ENV: &str = "CNG_DPAPI_LIBRARY";

/// Environment variable naming a library-exported deallocator to use instead of the C runtime `free`.
pub const FREE_SYMBOL_ENV: &str = "CNG_DPAPI_FREE_SYMBOL";

/// Platform default name of the native library.
pub const fn default_library_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "ncrypt.dll"
    } else if cfg!(target_os = "macos") {
        "libncrypt.dylib"
    } else {
        "libcng-dpapi.so.0"
    }
}

/// Where to find the native library and how to release its buffers.
///
/// Buffers returned by the native library are released with the C runtime
/// `free` unless `free_symbol` names a deallocator exported by the library
/// itself. Both must belong to the allocator family the library uses.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LibraryConfig {
    library: String,
    free_symbol: Option<String>,
}

impl LibraryConfig {
    /// Creates a configuration for the library at `library` (path or soname).
    pub fn new(library: impl Into<String>) -> Self {
        Self {
            library: library.into(),
            free_symbol: None,
        }
    }

    /// Releases native buffers through `symbol`, resolved from the library.
    pub fn with_free_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.free_symbol = Some(symbol.into());
        self
    }

    /// Builds a configuration from [`LIBRARY_ENV`] and [`FREE_SYMBOL_ENV`],
    /// falling back to the platform defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let mut config = match non_empty(LIBRARY_ENV) {
            Some(library) => Self::new(library),
            None => Self::default(),
        };
        config.free_symbol = non_empty(FREE_SYMBOL_ENV);

        config
    }

    /// Library path or name handed to the loader.
    pub fn library(&self) -> &str {
        &self.library
    }

    /// Library-exported deallocator, if one was configured.
    pub fn free_symbol(&self) -> Option<&str> {
        self.free_symbol.as_deref()
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self::new(default_library_name())
    }
}
