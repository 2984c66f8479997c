// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Global recorders and knobs shared by the fake entry points.

use core::ffi::{CStr, c_char};
use core::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Native entry point selector for [`force_status`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FakeOperation {
    /// `ncrypt_create_protection_descriptor`
    CreateProtectionDescriptor,
    /// `ncrypt_protect_secret`
    Protect,
    /// `ncrypt_unprotect_secret`
    Unprotect,
}

/// `server`/`domain`/`username` as seen by the native side. `None` is a null pointer.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct RecordedContext {
    pub server: Option<String>,
    pub domain: Option<String>,
    pub username: Option<String>,
}

#[derive(Default)]
struct Recorded {
    context: Option<RecordedContext>,
    descriptor_string: Option<String>,
    flags: Option<u32>,
}

static RECORDED: Mutex<Recorded> = Mutex::new(Recorded {
    context: None,
    descriptor_string: None,
    flags: None,
});

static NATIVE_CALLS: AtomicUsize = AtomicUsize::new(0);
static RELEASES: AtomicUsize = AtomicUsize::new(0);
static ZERO_LENGTH_OUTPUTS: AtomicBool = AtomicBool::new(false);

static FORCED_CREATE: AtomicU32 = AtomicU32::new(0);
static FORCED_PROTECT: AtomicU32 = AtomicU32::new(0);
static FORCED_UNPROTECT: AtomicU32 = AtomicU32::new(0);

fn recorded() -> MutexGuard<'static, Recorded> {
    // Never panic across the C boundary.
    RECORDED.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn forced_slot(operation: FakeOperation) -> &'static AtomicU32 {
    match operation {
        FakeOperation::CreateProtectionDescriptor => &FORCED_CREATE,
        FakeOperation::Protect => &FORCED_PROTECT,
        FakeOperation::Unprotect => &FORCED_UNPROTECT,
    }
}

/// Clears every recorder and knob.
pub fn reset() {
    *recorded() = Recorded::default();
    NATIVE_CALLS.store(0, Ordering::SeqCst);
    RELEASES.store(0, Ordering::SeqCst);
    ZERO_LENGTH_OUTPUTS.store(false, Ordering::SeqCst);
    FORCED_CREATE.store(0, Ordering::SeqCst);
    FORCED_PROTECT.store(0, Ordering::SeqCst);
    FORCED_UNPROTECT.store(0, Ordering::SeqCst);
}

/// Makes `operation` return `status` until reset. `0` restores normal behavior.
///
/// A forced failure writes [`POISONED_OUTPUT`](crate::POISONED_OUTPUT) into the output slots.
pub fn force_status(operation: FakeOperation, status: u32) {
    forced_slot(operation).store(status, Ordering::SeqCst);
}

/// Makes protect/unprotect succeed with a non-null, zero-length output.
pub fn zero_length_outputs(enabled: bool) {
    ZERO_LENGTH_OUTPUTS.store(enabled, Ordering::SeqCst);
}

/// Number of native entry point invocations since the last reset.
pub fn native_calls() -> usize {
    NATIVE_CALLS.load(Ordering::SeqCst)
}

/// Number of deallocator invocations since the last reset.
pub fn releases() -> usize {
    RELEASES.load(Ordering::SeqCst)
}

/// Context arguments of the latest protect/unprotect call.
pub fn last_context() -> Option<RecordedContext> {
    recorded().context.clone()
}

/// Descriptor string of the latest descriptor creation.
pub fn last_descriptor_string() -> Option<String> {
    recorded().descriptor_string.clone()
}

/// Flags of the latest descriptor creation.
pub fn last_flags() -> Option<u32> {
    recorded().flags
}

pub(crate) fn forced_status(operation: FakeOperation) -> u32 {
    forced_slot(operation).load(Ordering::SeqCst)
}

pub(crate) fn zero_length_enabled() -> bool {
    ZERO_LENGTH_OUTPUTS.load(Ordering::SeqCst)
}

pub(crate) fn count_call() {
    NATIVE_CALLS.fetch_add(1, Ordering::SeqCst);
}

pub(crate) fn count_release() {
    RELEASES.fetch_add(1, Ordering::SeqCst);
}

/// # Safety
///
/// Each pointer must be null or point to a NUL-terminated string.
pub(crate) unsafe fn record_context(
    server: *const c_char,
    domain: *const c_char,
    username: *const c_char,
) {
    let context = unsafe {
        RecordedContext {
            server: optional_string(server),
            domain: optional_string(domain),
            username: optional_string(username),
        }
    };

    recorded().context = Some(context);
}

pub(crate) fn record_descriptor(descriptor_string: String, flags: u32) {
    let mut recorded = recorded();
    recorded.descriptor_string = Some(descriptor_string);
    recorded.flags = Some(flags);
}

/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string.
pub(crate) unsafe fn optional_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }

    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}
