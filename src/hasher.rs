//! [`IdentityBuildHasher`] maps integer keys onto themselves.

use std::hash::{BuildHasher, Hasher};

/// [`IdentityHasher`] returns integer keys unchanged.
///
/// Signed integers are reinterpreted as their unsigned counterpart before being widened, so a
/// negative `i32` key `k` hashes to `k as u32`, and a bucket index computed from it is never
/// negative. Only a lone integer write is kept as is; byte slices and every write after the
/// first are folded into the state with a multiplicative hash, so strings and composite keys
/// spread across buckets.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityHasher {
    value: u64,
    written: bool,
}

impl IdentityHasher {
    #[inline]
    fn fold(&mut self, i: u64) {
        self.value = if self.written {
            self.value.wrapping_mul(31).wrapping_add(i)
        } else {
            i
        };
        self.written = true;
    }
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)] // Reinterpretation.
impl Hasher for IdentityHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.value
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.value = self.value.wrapping_mul(31).wrapping_add(u64::from(byte));
        }
        self.written = true;
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.fold(u64::from(i));
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.fold(u64::from(i));
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.fold(u64::from(i));
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.fold(i);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.fold(i as u64);
    }

    #[inline]
    fn write_i8(&mut self, i: i8) {
        self.write_u8(i as u8);
    }

    #[inline]
    fn write_i16(&mut self, i: i16) {
        self.write_u16(i as u16);
    }

    #[inline]
    fn write_i32(&mut self, i: i32) {
        self.write_u32(i as u32);
    }

    #[inline]
    fn write_i64(&mut self, i: i64) {
        self.write_u64(i as u64);
    }

    #[inline]
    fn write_isize(&mut self, i: isize) {
        self.write_usize(i as usize);
    }
}

/// [`BuildHasher`] for [`IdentityHasher`].
///
/// # Examples
///
/// ```
/// use quiescent::{HashMap, IdentityBuildHasher};
///
/// let hashmap: HashMap<i32, i32, IdentityBuildHasher> =
///     HashMap::with_capacity_and_hasher(4, IdentityBuildHasher);
/// assert!(hashmap.put(-1, 1).is_none());
/// assert_eq!(hashmap.get(&-1), Some(1));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityBuildHasher;

impl BuildHasher for IdentityBuildHasher {
    type Hasher = IdentityHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        IdentityHasher::default()
    }
}
