// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Ownership transfer for buffers allocated by the native library.
//!
//! A successful `ncrypt_protect_secret` / `ncrypt_unprotect_secret` call hands
//! back a pointer and a length. The memory belongs to the native allocator
//! and must be released through the paired deallocator exactly once.
//!
//! # Types
//!
//! - [`NativeBuffer`]: guard over a native allocation. Releases it on drop,
//!   including when the copy out of it unwinds.
//! - [`SecretBytes`]: runtime-owned, zeroize-on-drop copy of the contents.
//!
//! # Example
//!
//! ```rust
//! use cng_dpapi_buffer::take_ownership;
//! use cng_dpapi_sys::RawBuffer;
//!
//! unsafe extern "C" fn no_release(_ptr: *mut core::ffi::c_void) {}
//!
//! // A null address means nothing was allocated: empty result, no release.
//! let raw = RawBuffer { ptr: core::ptr::null_mut(), len: 0 };
//! let secret = unsafe { take_ownership(raw, no_release) };
//!
//! assert!(secret.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod native_buffer;
mod secret_bytes;

pub use native_buffer::{NativeBuffer, take_ownership};
pub use secret_bytes::SecretBytes;
