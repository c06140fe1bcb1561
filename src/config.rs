//! [`Config`] holds the tunables of a [`HashMap`](crate::HashMap).

use crate::error::{Error, Result};

/// The capacity used by [`HashMap::new`](crate::HashMap::new) and [`Config::default`].
pub const DEFAULT_CAPACITY: usize = 16;

/// The load factor at which a [`HashMap`](crate::HashMap) doubles its capacity by default.
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// [`HashMap`](crate::HashMap) configuration.
///
/// # Examples
///
/// ```
/// use quiescent::{Config, HashMap};
///
/// let config = Config::default()
///     .with_initial_capacity(4)
///     .with_max_load_factor(1.0);
/// let hashmap: HashMap<u64, u64> = HashMap::with_config(config).unwrap();
/// assert_eq!(hashmap.capacity(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Number of buckets allocated on construction.
    pub initial_capacity: usize,

    /// The map doubles its capacity once `len / capacity` reaches this value.
    pub max_load_factor: f64,
}

impl Config {
    /// Sets the initial number of buckets.
    #[inline]
    #[must_use]
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the load factor that triggers a resize.
    #[inline]
    #[must_use]
    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    /// Checks that the configuration describes a usable map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroCapacity`] if `initial_capacity` is zero, and
    /// [`Error::InvalidLoadFactor`] if `max_load_factor` is not finite or not positive.
    ///
    /// # Examples
    ///
    /// ```
    /// use quiescent::{Config, Error};
    ///
    /// assert!(Config::default().validate().is_ok());
    /// assert_eq!(
    ///     Config::default().with_initial_capacity(0).validate(),
    ///     Err(Error::ZeroCapacity)
    /// );
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        if !self.max_load_factor.is_finite() || self.max_load_factor <= 0.0 {
            return Err(Error::InvalidLoadFactor(self.max_load_factor));
        }
        Ok(())
    }
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}
