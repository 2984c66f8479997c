// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Test utilities for cng-dpapi crates.
//!
//! Provides an in-process fake of the native library behind the exact C ABI
//! of the real entry points, plus process-wide recorders to observe what
//! crossed the boundary. The recorders are global: tests using them must be
//! serialized (`#[serial(fake_native)]`) and call [`reset`] first.
//!
//! The fake "protects" by prefixing a header and XOR-masking the payload. It
//! is not encryption.
//!
//! ## License
//!
//! GPL-3.0-only

mod fake;
mod recorder;

pub use fake::{
    NTE_BAD_DATA, NTE_INVALID_HANDLE, NTE_INVALID_PARAMETER, POISONED_OUTPUT, fake_entry_points,
};
pub use recorder::{
    FakeOperation, RecordedContext, force_status, last_context, last_descriptor_string,
    last_flags, native_calls, releases, reset, zero_length_outputs,
};
