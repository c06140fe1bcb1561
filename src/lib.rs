//! Concurrent resizable hash map with per-bucket locking.
//!
//! # quiescent::HashMap
//! A concurrent hash map whose buckets are individually locked chains of entries. The map
//! doubles its capacity once the load factor reaches a threshold; a resize waits until no
//! thread is inside a bucket, then relinks every entry into the larger bucket array.
//!
//! # quiescent::IntMap
//! An `i32` to `i32` map on top of [`HashMap`] that reports missing keys with a sentinel value.

mod config;
pub use config::{Config, DEFAULT_CAPACITY, DEFAULT_MAX_LOAD_FACTOR};

mod error;
pub use error::{Error, Result};

pub mod hash_map;
pub use hash_map::HashMap;

mod hasher;
pub use hasher::{IdentityBuildHasher, IdentityHasher};

pub mod int_map;
pub use int_map::{IntMap, SENTINEL};

pub use equivalent::Equivalent;

mod hash_table;
mod sync;
