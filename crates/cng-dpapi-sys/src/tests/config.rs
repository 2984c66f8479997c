// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::config::{FREE_SYMBOL_ENV, LIBRARY_ENV, LibraryConfig, default_library_name};

#[test]
fn test_default_uses_platform_library_name() {
    let config = LibraryConfig::default();

    assert_eq!(config.library(), default_library_name());
    assert_eq!(config.free_symbol(), None);
}

#[cfg(target_os = "linux")]
#[test]
fn test_default_library_name_on_linux() {
    assert_eq!(default_library_name(), "libcng-dpapi.so.0");
}

#[test]
fn test_with_free_symbol() {
    let config = LibraryConfig::new("/opt/ncrypt/libcng-dpapi.so").with_free_symbol("ncrypt_free");

    assert_eq!(config.library(), "/opt/ncrypt/libcng-dpapi.so");
    assert_eq!(config.free_symbol(), Some("ncrypt_free"));
}

#[test]
fn test_from_lookup_reads_both_variables() {
    let config = LibraryConfig::from_lookup(|key| match key {
        LIBRARY_ENV => Some("/tmp/libfake.so".to_string()),
        FREE_SYMBOL_ENV => Some("fake_free".to_string()),
        _ => None,
    });

    assert_eq!(config.library(), "/tmp/libfake.so");
    assert_eq!(config.free_symbol(), Some("fake_free"));
}

#[test]
fn test_from_lookup_falls_back_to_defaults() {
    let config = LibraryConfig::from_lookup(|_| None);

    assert_eq!(config, LibraryConfig::default());
}

#[test]
fn test_from_lookup_ignores_empty_values() {
    let config = LibraryConfig::from_lookup(|_| Some(String::new()));

    assert_eq!(config, LibraryConfig::default());
}
