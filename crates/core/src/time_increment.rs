use std::{fmt, ops::Deref};

use thiserror::Error;
use uom::{
    Conversion,
    si::{f64::Time, time},
};

/// Default simulated duration of one tick, in seconds.
pub const DEFAULT_TIME_STEP_S: f64 = 0.01;

/// A unit-safe, finite and strictly positive duration of one simulation tick.
///
/// `TimeIncrement` is the `dt` that maps a tick index onto simulated time:
/// tick `n` happens at `n * dt`.
/// It wraps a [`Time`] value while enforcing that the duration is finite and
/// strictly greater than zero, so `n * dt` is always finite and monotonic.
///
/// # Construction
///
/// ```
/// use sonolux_core::TimeIncrement;
/// use uom::si::time::millisecond;
///
/// let dt = TimeIncrement::from_secs(0.01).unwrap();
/// assert_eq!(dt.to_string(), "0.01 s");
///
/// assert!(TimeIncrement::new::<millisecond>(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeIncrement(Time);

/// Error type returned when constructing an invalid [`TimeIncrement`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TimeIncrementError {
    #[error("time increment must be greater than zero, got {0} s")]
    NotPositive(f64),
    #[error("time increment must be finite, got {0} s")]
    NotFinite(f64),
}

impl TimeIncrement {
    /// Constructs a `TimeIncrement` from a numeric value and unit.
    ///
    /// # Errors
    ///
    /// Returns [`TimeIncrementError`] if `value` is zero, negative or not finite.
    pub fn new<U>(value: f64) -> Result<Self, TimeIncrementError>
    where
        U: time::Unit + Conversion<f64, T = f64>,
    {
        Self::from_time(Time::new::<U>(value))
    }

    /// Constructs a `TimeIncrement` from a duration in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`TimeIncrementError`] if `seconds` is zero, negative or not finite.
    pub fn from_secs(seconds: f64) -> Result<Self, TimeIncrementError> {
        Self::new::<time::second>(seconds)
    }

    /// Constructs a `TimeIncrement` from an existing [`Time`] value.
    ///
    /// # Errors
    ///
    /// Returns [`TimeIncrementError`] if the time is zero, negative or not finite.
    pub fn from_time(time: Time) -> Result<Self, TimeIncrementError> {
        let seconds = time.get::<time::second>();
        if !seconds.is_finite() {
            Err(TimeIncrementError::NotFinite(seconds))
        } else if seconds > 0.0 {
            Ok(Self(time))
        } else {
            Err(TimeIncrementError::NotPositive(seconds))
        }
    }

    /// Returns the simulated time at which tick `tick` takes place.
    #[must_use]
    pub fn elapsed(&self, tick: u64) -> Time {
        // Exact for any realistic tick count (below 2^53).
        #[allow(clippy::cast_precision_loss)]
        let ticks = tick as f64;
        self.0 * ticks
    }

    /// Returns the increment in seconds.
    #[must_use]
    pub fn as_secs(&self) -> f64 {
        self.0.get::<time::second>()
    }

    /// Consumes the `TimeIncrement` and returns the underlying [`Time`] value.
    #[must_use]
    pub fn into_inner(self) -> Time {
        self.0
    }
}

/// Defaults to [`DEFAULT_TIME_STEP_S`].
impl Default for TimeIncrement {
    fn default() -> Self {
        Self(Time::new::<time::second>(DEFAULT_TIME_STEP_S))
    }
}

impl TryFrom<Time> for TimeIncrement {
    type Error = TimeIncrementError;
    fn try_from(t: Time) -> Result<Self, Self::Error> {
        Self::from_time(t)
    }
}

impl Deref for TimeIncrement {
    type Target = Time;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for TimeIncrement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} s", self.as_secs())
    }
}
