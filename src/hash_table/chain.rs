use equivalent::Equivalent;

/// [`Entry`] is a single key-value pair in a [`Chain`].
///
/// The hash value of the key is kept alongside so that relocating the entry into a larger
/// [`BucketArray`](super::bucket_array::BucketArray) does not require hashing the key again.
pub(crate) struct Entry<K, V> {
    pub(crate) hash: u64,
    pub(crate) key: K,
    pub(crate) value: V,
    next: Link<K, V>,
}

type Link<K, V> = Option<Box<Entry<K, V>>>;

/// [`Chain`] is the singly linked list of entries sharing a bucket.
///
/// A [`Chain`] owns its entries; moving an entry between chains moves the [`Box`].
pub(crate) struct Chain<K, V> {
    head: Link<K, V>,
}

/// Head-to-tail iterator over the entries of a [`Chain`].
pub(crate) struct Iter<'c, K, V> {
    current: Option<&'c Entry<K, V>>,
}

impl<K, V> Entry<K, V> {
    /// Creates a new unlinked [`Entry`].
    #[inline]
    pub(crate) fn new(hash: u64, key: K, value: V) -> Box<Self> {
        Box::new(Self {
            hash,
            key,
            value,
            next: None,
        })
    }
}

impl<K, V> Chain<K, V> {
    /// Creates an empty [`Chain`].
    #[inline]
    pub(crate) const fn new() -> Self {
        Self { head: None }
    }

    /// Returns `true` if the [`Chain`] has no entries.
    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the number of entries.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.iter().count()
    }

    /// Links the entry in as the new head.
    #[inline]
    pub(crate) fn push_front(&mut self, mut entry: Box<Entry<K, V>>) {
        debug_assert!(entry.next.is_none());
        entry.next = self.head.take();
        self.head = Some(entry);
    }

    /// Unlinks the head entry.
    #[inline]
    pub(crate) fn pop_front(&mut self) -> Option<Box<Entry<K, V>>> {
        let mut entry = self.head.take()?;
        self.head = entry.next.take();
        Some(entry)
    }

    /// Returns an iterator over the entries from head to tail.
    #[inline]
    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            current: self.head.as_deref(),
        }
    }
}

impl<K: Eq, V> Chain<K, V> {
    /// Searches for an entry associated with the key.
    #[inline]
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<&Entry<K, V>>
    where
        Q: Equivalent<K> + ?Sized,
    {
        self.iter().find(|entry| key.equivalent(&entry.key))
    }

    /// Searches for an entry associated with the key for modification.
    #[inline]
    pub(crate) fn search_mut<Q>(&mut self, key: &Q) -> Option<&mut Entry<K, V>>
    where
        Q: Equivalent<K> + ?Sized,
    {
        let mut current = self.head.as_deref_mut();
        while let Some(entry) = current {
            if key.equivalent(&entry.key) {
                return Some(entry);
            }
            current = entry.next.as_deref_mut();
        }
        None
    }

    /// Unlinks the entry associated with the key.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<Box<Entry<K, V>>>
    where
        Q: Equivalent<K> + ?Sized,
    {
        // `link` trails the entry under inspection, so unlinking is a single assignment whether
        // the match is the head or further down the chain.
        let mut link = &mut self.head;
        while link
            .as_ref()
            .is_some_and(|entry| !key.equivalent(&entry.key))
        {
            link = &mut link.as_mut()?.next;
        }
        let mut removed = link.take()?;
        *link = removed.next.take();
        Some(removed)
    }
}

impl<K, V> Drop for Chain<K, V> {
    fn drop(&mut self) {
        // Unlinks entries one by one to keep recursion out of long chains.
        while self.pop_front().is_some() {}
    }
}

impl<'c, K, V> Iterator for Iter<'c, K, V> {
    type Item = &'c Entry<K, V>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.current?;
        self.current = entry.next.as_deref();
        Some(entry)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn chain_of(keys: &[u64]) -> Chain<u64, u64> {
        let mut chain = Chain::new();
        for &k in keys {
            chain.push_front(Entry::new(k, k, k * 10));
        }
        chain
    }

    fn keys(chain: &Chain<u64, u64>) -> Vec<u64> {
        chain.iter().map(|entry| entry.key).collect()
    }

    #[test]
    fn push_front_order() {
        let chain = chain_of(&[1, 2, 3]);
        assert_eq!(keys(&chain), vec![3, 2, 1]);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.search(&2).map(|e| e.value), Some(20));
        assert!(chain.search(&4).is_none());
    }

    #[test]
    fn remove_head_middle_tail() {
        let mut chain = chain_of(&[1, 2, 3, 4]);
        assert!(chain.remove(&5).is_none());
        assert_eq!(chain.remove(&4).map(|e| e.value), Some(40));
        assert_eq!(keys(&chain), vec![3, 2, 1]);
        assert_eq!(chain.remove(&2).map(|e| e.value), Some(20));
        assert_eq!(keys(&chain), vec![3, 1]);
        assert_eq!(chain.remove(&1).map(|e| e.value), Some(10));
        assert_eq!(keys(&chain), vec![3]);
        assert_eq!(chain.remove(&3).map(|e| e.value), Some(30));
        assert!(chain.is_empty());
        assert!(chain.remove(&3).is_none());
    }

    #[test]
    fn removed_entry_is_unlinked() {
        let mut chain = chain_of(&[1, 2]);
        let removed = chain.remove(&2).unwrap();
        let mut other = Chain::new();
        other.push_front(removed);
        assert_eq!(keys(&other), vec![2]);
        assert_eq!(keys(&chain), vec![1]);
    }

    #[test]
    fn search_mut() {
        let mut chain = chain_of(&[1, 2, 3]);
        chain.search_mut(&1).unwrap().value = 7;
        assert_eq!(chain.search(&1).map(|e| e.value), Some(7));
        assert!(chain.search_mut(&9).is_none());
    }

    #[test]
    fn long_chain_drop() {
        let mut chain = Chain::new();
        for k in 0..1_000_000_u64 {
            chain.push_front(Entry::new(k, k, k));
        }
        drop(chain);
    }
}
