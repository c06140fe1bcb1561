//! [`HashMap`] is a concurrent hash map with per-bucket locking.

use super::config::{Config, DEFAULT_CAPACITY};
use super::error::Result;
use super::hash_table::chain::{Chain, Entry};
use super::hash_table::coordinator::{Coordinator, Resized};
use super::sync::{recover, AtomicUsize};
use equivalent::Equivalent;
use std::collections::hash_map::RandomState;
use std::fmt::{self, Debug};
use std::hash::{BuildHasher, Hash};
use std::mem;
use std::sync::atomic::Ordering::Relaxed;
use tracing::debug;

/// Concurrent resizable hash map.
///
/// [`HashMap`] is an array of buckets where each bucket is a singly linked list of entries
/// guarded by its own lock. Operations on keys in different buckets run in parallel; the
/// capacity doubles once the load factor reaches the configured maximum, `0.75` by default.
///
/// ## Locking behavior
///
/// ### Entry access
///
/// Each read/write access to an entry is serialized by the lock of the bucket containing the
/// entry. Before locking a bucket, every access briefly passes through a map-wide coordination
/// lock and registers itself as active; the coordination lock is released as soon as the bucket
/// is locked.
///
/// ### Resize
///
/// Resizing is blocking. The resizing thread holds the coordination lock, waits until no access
/// is active, relinks every entry into a bucket array twice as large, and then releases the
/// coordination lock. Entries are moved, never cloned, and no entry is ever reachable through
/// two bucket arrays.
///
/// ### Re-entrancy
///
/// Closures passed to [`HashMap::read`] and [`HashMap::update`] run while a bucket is locked;
/// they must not access the same [`HashMap`], otherwise the thread may deadlock.
///
/// ## Capacity
///
/// The capacity never shrinks. The capacity is the number of buckets, and the bucket index of a
/// key is its hash value modulo the capacity.
pub struct HashMap<K, V, H = RandomState>
where
    H: BuildHasher,
{
    coordinator: Coordinator<K, V>,
    len: AtomicUsize,
    max_load_factor: f64,
    build_hasher: H,
}

impl<K, V, H> HashMap<K, V, H>
where
    H: BuildHasher,
{
    /// Creates an empty [`HashMap`] with the given [`BuildHasher`].
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::HashMap;
    /// use std::collections::hash_map::RandomState;
    ///
    /// let hashmap: HashMap<u64, u32, RandomState> = HashMap::with_hasher(RandomState::new());
    /// assert_eq!(hashmap.capacity(), 16);
    /// ```
    #[inline]
    pub fn with_hasher(build_hasher: H) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, build_hasher)
    }

    /// Creates an empty [`HashMap`] with the specified capacity and [`BuildHasher`].
    ///
    /// A zero capacity is raised to `1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::HashMap;
    /// use std::collections::hash_map::RandomState;
    ///
    /// let hashmap: HashMap<u64, u32, RandomState> =
    ///     HashMap::with_capacity_and_hasher(1000, RandomState::new());
    ///
    /// let result = hashmap.capacity();
    /// assert_eq!(result, 1000);
    /// ```
    #[inline]
    pub fn with_capacity_and_hasher(capacity: usize, build_hasher: H) -> Self {
        let config = Config::default().with_initial_capacity(capacity.max(1));
        Self::from_valid_config(config, build_hasher)
    }

    /// Creates an empty [`HashMap`] with the specified [`Config`] and [`BuildHasher`].
    ///
    /// # Errors
    ///
    /// Returns an error if the [`Config`] is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::{Config, Error, HashMap};
    /// use std::collections::hash_map::RandomState;
    ///
    /// let config = Config::default().with_initial_capacity(0);
    /// let result: Result<HashMap<u64, u32>, Error> =
    ///     HashMap::with_config_and_hasher(config, RandomState::new());
    /// assert_eq!(result.err(), Some(Error::ZeroCapacity));
    /// ```
    #[inline]
    pub fn with_config_and_hasher(config: Config, build_hasher: H) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config, build_hasher))
    }

    /// Returns the number of entries in the [`HashMap`].
    ///
    /// The value is exact when no other thread is modifying the [`HashMap`].
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::HashMap;
    ///
    /// let hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// assert!(hashmap.put(1, 0).is_none());
    /// assert_eq!(hashmap.len(), 1);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Relaxed)
    }

    /// Returns `true` if the [`HashMap`] is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::HashMap;
    ///
    /// let hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// assert!(hashmap.is_empty());
    /// assert!(hashmap.put(1, 0).is_none());
    /// assert!(!hashmap.is_empty());
    /// ```
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of buckets.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::HashMap;
    ///
    /// let hashmap: HashMap<u64, u32> = HashMap::with_capacity(4);
    /// assert_eq!(hashmap.capacity(), 4);
    ///
    /// for k in 0..3 {
    ///     assert!(hashmap.put(k, 0).is_none());
    /// }
    /// assert_eq!(hashmap.capacity(), 8);
    /// ```
    #[inline]
    pub fn capacity(&self) -> usize {
        self.coordinator.capacity()
    }

    /// Returns the current load factor, `len / capacity`.
    #[allow(clippy::cast_precision_loss)]
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Returns the number of bucket accesses performed so far.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::HashMap;
    ///
    /// let hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// assert!(hashmap.put(1, 0).is_none());
    /// assert_eq!(hashmap.get(&1), Some(0));
    /// assert_eq!(hashmap.num_operations(), 2);
    /// ```
    #[inline]
    pub fn num_operations(&self) -> u64 {
        self.coordinator.num_operations()
    }

    /// Returns a reference to the [`BuildHasher`].
    #[inline]
    pub fn hasher(&self) -> &H {
        &self.build_hasher
    }

    /// Visits every bucket in ascending index order while no other thread can access the
    /// [`HashMap`].
    pub(crate) fn scan<E, F: FnMut(usize, &Chain<K, V>) -> std::result::Result<(), E>>(
        &self,
        mut f: F,
    ) -> std::result::Result<(), E> {
        self.coordinator.with_exclusive_access(|array| {
            for index in 0..array.len() {
                let chain = recover(array.bucket(index).lock());
                f(index, &*chain)?;
            }
            Ok(())
        })
    }

    fn from_valid_config(config: Config, build_hasher: H) -> Self {
        Self {
            coordinator: Coordinator::new(config.initial_capacity),
            len: AtomicUsize::new(0),
            max_load_factor: config.max_load_factor,
            build_hasher,
        }
    }
}

impl<K, V, H> HashMap<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher,
{
    /// Reads the value associated with the key.
    ///
    /// Returns `None` if the key does not exist. The reader runs while the bucket is locked.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::HashMap;
    ///
    /// let hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// assert!(hashmap.read(&1, |_, v| *v).is_none());
    /// assert!(hashmap.put(1, 10).is_none());
    /// assert_eq!(hashmap.read(&1, |_, v| *v), Some(10));
    /// ```
    #[inline]
    pub fn read<Q, R, F: FnOnce(&K, &V) -> R>(&self, key: &Q, reader: F) -> Option<R>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let chain = self.coordinator.lock_bucket(self.hash(key));
        chain
            .search(key)
            .map(|entry| reader(&entry.key, &entry.value))
    }

    /// Returns a clone of the value associated with the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::HashMap;
    ///
    /// let hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// assert!(hashmap.get(&1).is_none());
    /// assert!(hashmap.put(1, 10).is_none());
    /// assert_eq!(hashmap.get(&1), Some(10));
    /// ```
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        Q: Equivalent<K> + Hash + ?Sized,
        V: Clone,
    {
        self.read(key, |_, v| v.clone())
    }

    /// Returns `true` if the [`HashMap`] contains a value for the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::HashMap;
    ///
    /// let hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// assert!(!hashmap.contains(&1));
    /// assert!(hashmap.put(1, 0).is_none());
    /// assert!(hashmap.contains(&1));
    /// ```
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        self.read(key, |_, _| ()).is_some()
    }

    /// Associates the value with the key.
    ///
    /// Returns the previous value if the key existed, in which case the value is overwritten in
    /// place. Otherwise a new entry is linked in, and the [`HashMap`] doubles its capacity if
    /// the load factor reaches the configured maximum.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::HashMap;
    ///
    /// let hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// assert_eq!(hashmap.put(1, 0), None);
    /// assert_eq!(hashmap.put(1, 1), Some(0));
    /// assert_eq!(hashmap.get(&1), Some(1));
    /// ```
    #[inline]
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let hash = self.hash(&key);
        {
            let mut chain = self.coordinator.lock_bucket(hash);
            if let Some(entry) = chain.search_mut(&key) {
                return Some(mem::replace(&mut entry.value, value));
            }
            chain.push_front(Entry::new(hash, key, value));
            self.len.fetch_add(1, Relaxed);
        }
        self.try_grow();
        None
    }

    /// Updates the value associated with the key in place.
    ///
    /// Returns `None` if the key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::HashMap;
    ///
    /// let hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// assert!(hashmap.update(&1, |_, v| *v += 1).is_none());
    /// assert!(hashmap.put(1, 0).is_none());
    /// assert_eq!(hashmap.update(&1, |_, v| { *v += 1; *v }), Some(1));
    /// ```
    #[inline]
    pub fn update<Q, R, F: FnOnce(&K, &mut V) -> R>(&self, key: &Q, updater: F) -> Option<R>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let mut chain = self.coordinator.lock_bucket(self.hash(key));
        chain
            .search_mut(key)
            .map(|entry| updater(&entry.key, &mut entry.value))
    }

    /// Removes the key and returns the value that was associated with it.
    ///
    /// Returns `None` if the key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::HashMap;
    ///
    /// let hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// assert!(hashmap.remove(&1).is_none());
    /// assert!(hashmap.put(1, 0).is_none());
    /// assert_eq!(hashmap.remove(&1), Some(0));
    /// assert!(hashmap.get(&1).is_none());
    /// ```
    #[inline]
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        Q: Equivalent<K> + Hash + ?Sized,
    {
        let mut chain = self.coordinator.lock_bucket(self.hash(key));
        let entry = chain.remove(key)?;
        self.len.fetch_sub(1, Relaxed);
        drop(chain);
        Some(entry.value)
    }

    /// Writes the contents of every bucket, one line per bucket in ascending index order, each
    /// chain from head to tail.
    ///
    /// The [`HashMap`] is inaccessible to other threads while it is being written.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::{HashMap, IdentityBuildHasher};
    ///
    /// let hashmap: HashMap<u64, u32, IdentityBuildHasher> =
    ///     HashMap::with_capacity_and_hasher(2, IdentityBuildHasher);
    /// assert!(hashmap.put(1, 10).is_none());
    ///
    /// let mut dump = String::new();
    /// hashmap.dump(&mut dump).unwrap();
    /// assert_eq!(dump, "[0] -> \n[1] -> (1,10)\n");
    /// ```
    pub fn dump<W: fmt::Write>(&self, out: &mut W) -> fmt::Result
    where
        K: Debug,
        V: Debug,
    {
        self.scan(|index, chain| {
            write!(out, "[{index}] -> ")?;
            for (position, entry) in chain.iter().enumerate() {
                if position != 0 {
                    out.write_str(" -> ")?;
                }
                write!(out, "({:?},{:?})", entry.key, entry.value)?;
            }
            out.write_char('\n')
        })
    }

    /// Doubles the capacity if the load factor has reached the maximum.
    #[allow(clippy::cast_precision_loss)]
    fn try_grow(&self) {
        let resized = self.coordinator.resize_if(|capacity| {
            self.len.load(Relaxed) as f64 / capacity as f64 >= self.max_load_factor
        });
        if let Some(Resized {
            old_capacity,
            new_capacity,
            relocated,
        }) = resized
        {
            debug!(old_capacity, new_capacity, relocated, "resized");
        }
    }

    /// Returns the hash value of the key.
    #[inline]
    fn hash<Q>(&self, key: &Q) -> u64
    where
        Q: Hash + ?Sized,
    {
        self.build_hasher.hash_one(key)
    }
}

impl<K, V> HashMap<K, V, RandomState> {
    /// Creates an empty default [`HashMap`].
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::HashMap;
    ///
    /// let hashmap: HashMap<u64, u32> = HashMap::new();
    ///
    /// let result = hashmap.capacity();
    /// assert_eq!(result, 16);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty [`HashMap`] with the specified capacity.
    ///
    /// A zero capacity is raised to `1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::HashMap;
    ///
    /// let hashmap: HashMap<u64, u32> = HashMap::with_capacity(1000);
    ///
    /// let result = hashmap.capacity();
    /// assert_eq!(result, 1000);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }

    /// Creates an empty [`HashMap`] with the specified [`Config`].
    ///
    /// # Errors
    ///
    /// Returns an error if the [`Config`] is invalid.
    #[inline]
    pub fn with_config(config: Config) -> Result<Self> {
        Self::with_config_and_hasher(config, RandomState::new())
    }
}

impl<K, V, H> Default for HashMap<K, V, H>
where
    H: BuildHasher + Default,
{
    /// Creates an empty default [`HashMap`].
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::HashMap;
    ///
    /// let hashmap: HashMap<u64, u32> = HashMap::default();
    ///
    /// let result = hashmap.capacity();
    /// assert_eq!(result, 16);
    /// ```
    #[inline]
    fn default() -> Self {
        Self::with_hasher(H::default())
    }
}

impl<K, V, H> Debug for HashMap<K, V, H>
where
    K: Debug,
    V: Debug,
    H: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_map();
        self.scan(|_, chain| {
            d.entries(chain.iter().map(|entry| (&entry.key, &entry.value)));
            Ok(())
        })?;
        d.finish()
    }
}

impl<K, V, H> Extend<(K, V)> for HashMap<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher,
{
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, H> FromIterator<(K, V)> for HashMap<K, V, H>
where
    K: Eq + Hash,
    H: BuildHasher + Default,
{
    #[inline]
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let capacity = (lower.saturating_add(lower / 3) + 1).max(DEFAULT_CAPACITY);
        let mut hashmap = Self::with_capacity_and_hasher(capacity, H::default());
        hashmap.extend(iter);
        hashmap
    }
}
