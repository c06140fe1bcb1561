//! Synchronization primitives used by the hash table.
//!
//! `loom` replaces the standard primitives when the `loom` feature is enabled so that the
//! coordination protocol can be model-checked.

#[cfg(not(feature = "loom"))]
pub(crate) use std::sync::atomic::{AtomicU64, AtomicUsize};
#[cfg(not(feature = "loom"))]
pub(crate) use std::sync::{Condvar, Mutex, MutexGuard};

#[cfg(feature = "loom")]
pub(crate) use loom::sync::atomic::{AtomicU64, AtomicUsize};
#[cfg(feature = "loom")]
pub(crate) use loom::sync::{Condvar, Mutex, MutexGuard};

use std::sync::{LockResult, PoisonError};

/// Recovers the guard from a poisoned lock.
///
/// Chains are structurally valid whenever their lock is released, including when a reader
/// closure panics while holding it, so poisoning carries no information for the table.
#[inline]
pub(crate) fn recover<G>(result: LockResult<G>) -> G {
    result.unwrap_or_else(PoisonError::into_inner)
}
