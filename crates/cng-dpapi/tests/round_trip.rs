// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! unprotect(protect(p)) == p over arbitrary plaintexts and contexts.

use proptest::prelude::*;

use cng_dpapi::{CngDpapi, ProtectionContext};
use cng_dpapi_test_utils::{fake_entry_points, releases, reset};

fn identity() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-zA-Z0-9._-]{0,24}")
}

proptest! {
    #[test]
    fn roundtrip_arbitrary_plaintext(
        plaintext in proptest::collection::vec(any::<u8>(), 0..=512),
        server in identity(),
        domain in identity(),
        username in identity(),
    ) {
        reset();
        let dpapi = unsafe { CngDpapi::from_entry_points(fake_entry_points()) };
        let descriptor = dpapi
            .create_protection_descriptor("LOCAL=user")
            .expect("Failed to create_protection_descriptor(..)");
        let context = ProtectionContext::new()
            .server(server.as_deref())
            .domain(domain.as_deref())
            .username(username.as_deref());

        let blob = dpapi
            .protect(&descriptor, &plaintext, &context)
            .expect("Failed to protect(..)");
        let recovered = dpapi
            .unprotect(blob.as_bytes(), &context)
            .expect("Failed to unprotect(..)");

        prop_assert_eq!(recovered.as_bytes(), plaintext.as_slice());

        // One release for the blob, one more only if the plaintext was non-empty.
        let expected_releases = if plaintext.is_empty() { 1 } else { 2 };
        prop_assert_eq!(releases(), expected_releases);
    }
}
