use super::chain::Chain;
use crate::sync::{recover, Mutex};

/// [`BucketArray`] is a fixed-size array of buckets, each guarded by its own lock.
///
/// The lock and the chain it protects are a single value, so a bucket cannot be reached
/// without holding its lock.
pub(crate) struct BucketArray<K, V> {
    buckets: Box<[Mutex<Chain<K, V>>]>,
}

impl<K, V> BucketArray<K, V> {
    /// Creates a new [`BucketArray`] with `capacity` empty buckets.
    ///
    /// `capacity` must be positive.
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert_ne!(capacity, 0);
        let buckets = (0..capacity)
            .map(|_| Mutex::new(Chain::new()))
            .collect();
        Self { buckets }
    }

    /// Returns the number of buckets.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Calculates the bucket index for the hash value.
    #[allow(clippy::cast_possible_truncation)] // The remainder is below `len`.
    #[inline]
    pub(crate) fn calculate_bucket_index(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    /// Returns a reference to the bucket at the given position.
    #[inline]
    pub(crate) fn bucket(&self, index: usize) -> &Mutex<Chain<K, V>> {
        &self.buckets[index]
    }

    /// Moves every entry of `self` into `target`, consuming `self`.
    ///
    /// Entries are relinked, not copied. Returns the number of relocated entries.
    pub(crate) fn relocate_into(self, target: &mut BucketArray<K, V>) -> usize {
        let mut relocated = 0;
        for bucket in self.buckets.into_vec() {
            let mut chain = recover(bucket.into_inner());
            while let Some(entry) = chain.pop_front() {
                let index = target.calculate_bucket_index(entry.hash);
                recover(target.buckets[index].lock()).push_front(entry);
                relocated += 1;
            }
        }
        relocated
    }
}
