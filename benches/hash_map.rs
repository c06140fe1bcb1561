use criterion::{criterion_group, criterion_main, Criterion};
use quiescent::{HashMap, IntMap, SENTINEL};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

fn put_cold(c: &mut Criterion) {
    c.bench_function("HashMap: put, cold", |b| {
        b.iter_custom(|iters| {
            let hashmap: HashMap<u64, u64> = HashMap::default();
            let start = Instant::now();
            for i in 0..iters {
                assert!(hashmap.put(i, i).is_none());
            }
            start.elapsed()
        })
    });
}

fn put_warmed_up(c: &mut Criterion) {
    c.bench_function("HashMap: put, warmed up", |b| {
        b.iter_custom(|iters| {
            let hashmap: HashMap<u64, u64> = HashMap::with_capacity(iters as usize * 2);
            let start = Instant::now();
            for i in 0..iters {
                assert!(hashmap.put(i, i).is_none());
            }
            start.elapsed()
        })
    });
}

fn read(c: &mut Criterion) {
    c.bench_function("HashMap: read", |b| {
        b.iter_custom(|iters| {
            let hashmap: HashMap<u64, u64> = HashMap::with_capacity(iters as usize * 2);
            for i in 0..iters {
                assert!(hashmap.put(i, i).is_none());
            }
            let start = Instant::now();
            for i in 0..iters {
                assert_eq!(hashmap.read(&i, |_, v| *v == i), Some(true));
            }
            start.elapsed()
        })
    });
}

fn remove(c: &mut Criterion) {
    c.bench_function("HashMap: remove", |b| {
        b.iter_custom(|iters| {
            let hashmap: HashMap<u64, u64> = HashMap::with_capacity(iters as usize * 2);
            for i in 0..iters {
                assert!(hashmap.put(i, i).is_none());
            }
            let start = Instant::now();
            for i in 0..iters {
                assert_eq!(hashmap.remove(&i), Some(i));
            }
            start.elapsed()
        })
    });
}

fn put_tail_latency(c: &mut Criterion) {
    c.bench_function("HashMap: put_tail_latency", move |b| {
        b.iter_custom(|iters| {
            let mut duration = Duration::default();
            for _ in 0..iters {
                let hashmap: HashMap<u64, u64> = HashMap::default();
                let mut max_duration = Duration::default();
                for key in 0..262_144 {
                    let start = Instant::now();
                    assert!(hashmap.put(key, key).is_none());
                    max_duration = max_duration.max(start.elapsed());
                }
                duration += max_duration;
            }
            duration
        })
    });
}

fn int_map_put_multi_threaded(c: &mut Criterion) {
    let num_threads = 4;
    c.bench_function("IntMap: put, multi-threaded", move |b| {
        b.iter_custom(|iters| {
            let map = Arc::new(IntMap::new(16));
            let barrier = Arc::new(Barrier::new(num_threads + 1));
            let threads: Vec<_> = (0..num_threads)
                .map(|thread_id| {
                    let map = map.clone();
                    let barrier = barrier.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        for i in 0..iters as i32 {
                            let k = i.wrapping_mul(num_threads as i32) + thread_id as i32;
                            assert_eq!(map.put(k, i), SENTINEL);
                        }
                    })
                })
                .collect();
            let start = Instant::now();
            barrier.wait();
            for thread in threads {
                assert!(thread.join().is_ok());
            }
            start.elapsed()
        })
    });
}

criterion_group!(
    hash_map,
    put_cold,
    put_tail_latency,
    put_warmed_up,
    read,
    remove,
    int_map_put_multi_threaded
);
criterion_main!(hash_map);
