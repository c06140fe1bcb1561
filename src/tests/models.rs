use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::{Arc, Mutex};

use loom::model::Builder;
use loom::thread::spawn;

use crate::{HashMap, IdentityBuildHasher};

#[derive(Debug)]
struct A(usize, Arc<AtomicUsize>);
impl A {
    fn new(d: usize, c: Arc<AtomicUsize>) -> Self {
        c.fetch_add(1, Relaxed);
        Self(d, c)
    }
}
impl Drop for A {
    fn drop(&mut self) {
        self.1.fetch_sub(1, Relaxed);
    }
}

static SERIALIZER: Mutex<()> = Mutex::new(());

// Checks if pre-existing keys stay visible while another thread triggers a resize.
#[test]
fn hashmap_resize_visibility() {
    let _guard = SERIALIZER.lock().unwrap();

    let mut model_builder_resize_visibility = Builder::new();
    model_builder_resize_visibility.max_threads = 2;
    model_builder_resize_visibility.max_branches = 1_048_576;
    model_builder_resize_visibility.check(|| {
        let hashmap: Arc<HashMap<usize, usize, IdentityBuildHasher>> =
            Arc::new(HashMap::with_capacity_and_hasher(2, IdentityBuildHasher));
        assert!(hashmap.put(0, 0).is_none());
        assert_eq!(hashmap.capacity(), 2);

        let hashmap_clone = hashmap.clone();
        let thread_put = spawn(move || {
            assert!(hashmap_clone.put(1, 1).is_none());
            assert_eq!(hashmap_clone.capacity(), 4);
        });
        assert_eq!(hashmap.get(&0), Some(0));
        assert!(thread_put.join().is_ok());

        assert_eq!(hashmap.get(&0), Some(0));
        assert_eq!(hashmap.get(&1), Some(1));
        assert_eq!(hashmap.len(), 2);
    });
}

// Checks if concurrent insertions of the same key leave a single entry.
#[test]
fn hashmap_key_uniqueness() {
    let _guard = SERIALIZER.lock().unwrap();

    let mut model_builder_key_uniqueness = Builder::new();
    model_builder_key_uniqueness.max_threads = 2;
    model_builder_key_uniqueness.max_branches = 1_048_576;
    model_builder_key_uniqueness.check(|| {
        let hashmap: Arc<HashMap<usize, usize, IdentityBuildHasher>> =
            Arc::new(HashMap::with_capacity_and_hasher(4, IdentityBuildHasher));
        let hashmap_clone = hashmap.clone();
        let thread_put = spawn(move || hashmap_clone.put(7, 1));
        let result = hashmap.put(7, 2);
        let result_clone = thread_put.join().unwrap();

        assert!(result.is_none() != result_clone.is_none());
        assert_eq!(hashmap.len(), 1);
        let value = hashmap.get(&7).unwrap();
        if result.is_none() {
            assert_eq!((value, result_clone), (1, Some(2)));
        } else {
            assert_eq!((value, result), (2, Some(1)));
        }
    });
}

// Checks if entries are dropped exactly once across put, remove, and resize.
#[test]
fn hashmap_put_remove_same_bucket() {
    let _guard = SERIALIZER.lock().unwrap();

    let mut model_builder_put_remove = Builder::new();
    model_builder_put_remove.max_threads = 2;
    model_builder_put_remove.max_branches = 1_048_576;
    model_builder_put_remove.check(|| {
        let cnt = Arc::new(AtomicUsize::new(0));
        let hashmap: Arc<HashMap<usize, A, IdentityBuildHasher>> =
            Arc::new(HashMap::with_capacity_and_hasher(2, IdentityBuildHasher));
        assert!(hashmap.put(0, A::new(0, cnt.clone())).is_none());

        let hashmap_clone = hashmap.clone();
        let cnt_clone = cnt.clone();
        let thread_put = spawn(move || {
            assert!(hashmap_clone.put(2, A::new(2, cnt_clone)).is_none());
        });
        let removed = hashmap.remove(&0);
        assert_eq!(removed.as_ref().map(|a| a.0), Some(0));
        drop(removed);
        assert!(thread_put.join().is_ok());

        assert_eq!(hashmap.len(), 1);
        assert_eq!(hashmap.read(&2, |_, a| a.0), Some(2));
        assert_eq!(cnt.load(Relaxed), 1);
        drop(hashmap);
        assert_eq!(cnt.load(Relaxed), 0);
    });
}
