use super::bucket_array::BucketArray;
use super::chain::Chain;
use crate::sync::{recover, AtomicU64, Condvar, Mutex, MutexGuard};
use std::mem::{self, ManuallyDrop};
use std::ops::{Deref, DerefMut};
use std::sync::atomic::Ordering::Relaxed;
use tracing::{debug, trace};

/// [`Coordinator`] serializes bucket access against resizing.
///
/// ## Locking protocol
///
/// Every bucket access passes through the global lock: the accessor locks the global lock,
/// locks the bucket in the current [`BucketArray`], registers itself as active, and releases
/// the global lock while keeping the bucket locked. On release, the bucket lock is unlocked
/// first, then the accessor deregisters itself.
///
/// A resize holds the global lock from start to finish. New accessors block on the global lock,
/// therefore the number of active accessors can only decrease while the resizer waits for it to
/// reach zero; once it does, no reference into the current [`BucketArray`] exists outside the
/// resizer and the array can be replaced.
///
/// Lock order is always global lock, bucket lock, active counter lock. A thread holding a
/// bucket lock never waits for the global lock.
pub(crate) struct Coordinator<K, V> {
    /// The global coordination lock; it owns the current generation of the bucket array.
    table: Mutex<Box<BucketArray<K, V>>>,

    /// The total number of bucket accesses.
    num_operations: AtomicU64,

    /// The number of accessors holding a bucket lock.
    active: Mutex<usize>,

    /// Signaled by the last accessor leaving.
    quiescent: Condvar,
}

/// [`BucketGuard`] grants exclusive access to a single [`Chain`].
///
/// Dropping it releases the bucket lock and then deregisters the access.
pub(crate) struct BucketGuard<'c, K, V> {
    chain: ManuallyDrop<MutexGuard<'c, Chain<K, V>>>,
    coordinator: &'c Coordinator<K, V>,
}

/// [`Resized`] describes a completed resize.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Resized {
    pub(crate) old_capacity: usize,
    pub(crate) new_capacity: usize,
    pub(crate) relocated: usize,
}

impl<K, V> Coordinator<K, V> {
    /// Creates a new [`Coordinator`] owning an empty [`BucketArray`] of `capacity` buckets.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            table: Mutex::new(Box::new(BucketArray::new(capacity))),
            num_operations: AtomicU64::new(0),
            active: Mutex::new(0),
            quiescent: Condvar::new(),
        }
    }

    /// Locks the bucket that the hash value maps to in the current [`BucketArray`].
    pub(crate) fn lock_bucket(&self, hash: u64) -> BucketGuard<'_, K, V> {
        let table = recover(self.table.lock());
        let array_ptr: *const BucketArray<K, V> = &**table;

        // SAFETY: the array is only replaced by `resize_if` while it holds the global lock and
        // no accessor is active; the returned guard stays registered as active until dropped.
        let array = unsafe { &*array_ptr };
        let index = array.calculate_bucket_index(hash);
        let chain = recover(array.bucket(index).lock());
        self.num_operations.fetch_add(1, Relaxed);
        *recover(self.active.lock()) += 1;
        drop(table);

        BucketGuard {
            chain: ManuallyDrop::new(chain),
            coordinator: self,
        }
    }

    /// Returns the number of buckets in the current [`BucketArray`].
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        recover(self.table.lock()).len()
    }

    /// Returns the total number of bucket accesses so far.
    #[inline]
    pub(crate) fn num_operations(&self) -> u64 {
        self.num_operations.load(Relaxed)
    }

    /// Runs `f` on the current [`BucketArray`] while no other thread can access any bucket.
    pub(crate) fn with_exclusive_access<R, F: FnOnce(&BucketArray<K, V>) -> R>(&self, f: F) -> R {
        let table = recover(self.table.lock());
        self.wait_for_quiescence();
        f(&table)
    }

    /// Doubles the capacity if `grow` returns `true` for the current capacity.
    ///
    /// The global lock is held while `grow` is evaluated and throughout the resize. The calling
    /// thread must not hold a [`BucketGuard`], otherwise it waits for itself forever.
    pub(crate) fn resize_if<F: FnOnce(usize) -> bool>(&self, grow: F) -> Option<Resized> {
        let mut table = recover(self.table.lock());
        let old_capacity = table.len();
        if !grow(old_capacity) {
            return None;
        }
        let new_capacity = old_capacity.checked_mul(2)?;

        debug!(old_capacity, new_capacity, "resizing");
        self.wait_for_quiescence();

        let old_array = mem::replace(&mut *table, Box::new(BucketArray::new(new_capacity)));
        let relocated = (*old_array).relocate_into(&mut **table);
        drop(table);

        Some(Resized {
            old_capacity,
            new_capacity,
            relocated,
        })
    }

    /// Blocks until no accessor holds a bucket lock.
    ///
    /// The caller must hold the global lock so that no new accessor can register.
    fn wait_for_quiescence(&self) {
        let mut active = recover(self.active.lock());
        if *active != 0 {
            trace!(active = *active, "waiting for quiescence");
        }
        while *active != 0 {
            active = recover(self.quiescent.wait(active));
        }
    }

    /// Deregisters an accessor, waking up the resizer if it was the last one.
    fn leave(&self) {
        let mut active = recover(self.active.lock());
        debug_assert_ne!(*active, 0);
        *active -= 1;
        if *active == 0 {
            self.quiescent.notify_one();
        }
    }
}

impl<K, V> Deref for BucketGuard<'_, K, V> {
    type Target = Chain<K, V>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.chain
    }
}

impl<K, V> DerefMut for BucketGuard<'_, K, V> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.chain
    }
}

impl<K, V> Drop for BucketGuard<'_, K, V> {
    #[inline]
    fn drop(&mut self) {
        // SAFETY: `chain` is never used after this point.
        unsafe {
            ManuallyDrop::drop(&mut self.chain);
        }
        self.coordinator.leave();
    }
}
