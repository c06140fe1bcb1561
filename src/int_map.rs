//! [`IntMap`] maps `i32` keys to `i32` values and reports absence with a sentinel value.

use super::hasher::IdentityBuildHasher;
use super::HashMap;
use std::fmt;

/// The value returned by [`IntMap`] when a key is absent.
pub const SENTINEL: i32 = i32::MAX;

/// Concurrent `i32` to `i32` map with sentinel return values.
///
/// Keys are placed in bucket `(key as u32) % capacity`, negative keys included.
///
/// # Ambiguity of [`SENTINEL`]
///
/// [`IntMap::get`], [`IntMap::put`], and [`IntMap::delete`] return [`SENTINEL`] when the key
/// is absent, which cannot be told apart from a stored value equal to [`SENTINEL`]. The
/// `*_checked` variants return `Option<i32>` instead; [`HashMap`] has no such ambiguity.
///
/// # Examples
///
/// ```
/// use quiescent::{IntMap, SENTINEL};
///
/// let map = IntMap::new(4);
/// assert_eq!(map.put(1, 10), SENTINEL);
/// assert_eq!(map.put(5, 20), SENTINEL);
/// assert_eq!(map.get(1), 10);
/// assert_eq!(map.get(5), 20);
/// assert_eq!(map.put(1, 99), 10);
/// assert_eq!(map.delete(5), 20);
/// assert_eq!(map.get(5), SENTINEL);
/// assert_eq!(map.len(), 1);
/// ```
pub struct IntMap {
    inner: HashMap<i32, i32, IdentityBuildHasher>,
}

impl IntMap {
    /// Creates an empty [`IntMap`] with `capacity` buckets.
    ///
    /// A zero capacity is raised to `1`.
    #[inline]
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: HashMap::with_capacity_and_hasher(capacity, IdentityBuildHasher),
        }
    }

    /// Returns the value associated with the key, or [`SENTINEL`] if the key is absent.
    #[inline]
    pub fn get(&self, key: i32) -> i32 {
        self.get_checked(key).unwrap_or(SENTINEL)
    }

    /// Associates the value with the key, and returns the previous value or [`SENTINEL`] if
    /// the key was new.
    #[inline]
    pub fn put(&self, key: i32, value: i32) -> i32 {
        self.put_checked(key, value).unwrap_or(SENTINEL)
    }

    /// Removes the key, and returns the removed value or [`SENTINEL`] if the key was absent.
    #[inline]
    pub fn delete(&self, key: i32) -> i32 {
        self.delete_checked(key).unwrap_or(SENTINEL)
    }

    /// Returns the value associated with the key.
    #[inline]
    pub fn get_checked(&self, key: i32) -> Option<i32> {
        self.inner.get(&key)
    }

    /// Associates the value with the key, and returns the previous value.
    #[inline]
    pub fn put_checked(&self, key: i32, value: i32) -> Option<i32> {
        self.inner.put(key, value)
    }

    /// Removes the key, and returns the removed value.
    #[inline]
    pub fn delete_checked(&self, key: i32) -> Option<i32> {
        self.inner.remove(&key)
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the [`IntMap`] is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of buckets.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Returns the number of bucket accesses performed so far.
    #[inline]
    pub fn num_operations(&self) -> u64 {
        self.inner.num_operations()
    }

    /// Writes the contents of every bucket; see [`HashMap::dump`].
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::IntMap;
    ///
    /// let map = IntMap::new(4);
    /// map.put(1, 10);
    /// map.put(5, 20);
    ///
    /// let mut dump = String::new();
    /// map.dump(&mut dump).unwrap();
    /// assert_eq!(dump, "[0] -> \n[1] -> (5,20) -> (1,10)\n[2] -> \n[3] -> \n");
    /// ```
    #[inline]
    pub fn dump<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        self.inner.dump(out)
    }
}

impl fmt::Debug for IntMap {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}
