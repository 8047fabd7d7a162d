use std::{fs, num::NonZeroUsize, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use sonolux_core::{
    BubbleIntegrator, ConstantsError, DEFAULT_TIME_STEP_S, DriveParameters, ModelConstants,
    ParameterValues, TimeIncrement, TimeIncrementError,
};
use thiserror::Error;

/// Session and scheduler settings, loadable from TOML.
///
/// Every key is optional; missing keys take the defaults below.
///
/// ```toml
/// capacity = 1000         # samples kept in the window
/// tick_period_ms = 16     # scheduler cadence (~60 Hz)
/// time_step_s = 0.01      # simulated seconds per tick
///
/// [parameters]
/// frequency_hz = 26500.0
/// ambient_pressure_atm = 1.5
/// initial_radius_microns = 4.5
/// baseline_temperature_k = 300.0
///
/// [model]
/// amplitude_factor = 0.4
/// collapse_threshold = 0.7
/// ```
///
/// The default `time_step_s` of 0.01 s is a whole number of drive periods at
/// every frequency on a 100 Hz grid, so each tick samples the same point of
/// the cycle and the default session stays in `Expansion` at `rv = 1`. Use a
/// step such as `1 / (40 * frequency_hz)` for a resolved waveform; see
/// [`SessionConfig::is_aliased`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "SessionConfig::default_capacity")]
    pub capacity: usize,
    #[serde(default = "SessionConfig::default_tick_period_ms")]
    pub tick_period_ms: u64,
    #[serde(default = "SessionConfig::default_time_step_s")]
    pub time_step_s: f64,
    #[serde(default)]
    pub parameters: ParameterValues,
    #[serde(default)]
    pub model: ModelConstants,
}

/// Errors that can occur while loading or validating a [`SessionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("capacity must be greater than zero")]
    ZeroCapacity,

    #[error("tick period must be greater than zero")]
    ZeroTickPeriod,

    #[error("invalid time step: {0}")]
    TimeStep(#[from] TimeIncrementError),

    #[error("invalid model constants: {0}")]
    Model(#[from] ConstantsError),
}

impl SessionConfig {
    fn default_capacity() -> usize {
        1000
    }
    fn default_tick_period_ms() -> u64 {
        16
    }
    fn default_time_step_s() -> f64 {
        DEFAULT_TIME_STEP_S
    }

    /// Parses a config from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the text is not valid TOML for this
    /// struct or if validation fails.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks every setting that could make the session misbehave.
    ///
    /// Drive parameters are not checked here; they are clamped on use.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.capacity()?;
        self.tick_period()?;
        self.time_step()?;
        self.model.validate()?;
        Ok(())
    }

    /// Returns the buffer capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] if `capacity` is zero.
    pub fn capacity(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.capacity).ok_or(ConfigError::ZeroCapacity)
    }

    /// Returns the wall-clock period between scheduler ticks.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTickPeriod`] if `tick_period_ms` is zero.
    pub fn tick_period(&self) -> Result<Duration, ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        Ok(Duration::from_millis(self.tick_period_ms))
    }

    /// Returns the simulated duration of one tick.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TimeStep`] if `time_step_s` is not finite and positive.
    pub fn time_step(&self) -> Result<TimeIncrement, ConfigError> {
        Ok(TimeIncrement::from_secs(self.time_step_s)?)
    }

    /// Builds the integrator described by `time_step_s` and `model`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the time step or the model constants are invalid.
    pub fn integrator(&self) -> Result<BubbleIntegrator, ConfigError> {
        Ok(BubbleIntegrator::new(self.time_step()?, self.model)?)
    }

    /// Returns true when every tick lands on a zero crossing of the drive.
    ///
    /// This happens when `2 * frequency_hz * time_step_s` is a whole number,
    /// which includes the default step at the default frequency.
    #[must_use]
    pub fn is_aliased(&self) -> bool {
        let half_cycles = 2.0 * self.drive_parameters().values().frequency_hz * self.time_step_s;
        (half_cycles - half_cycles.round()).abs() <= 1e-9 * half_cycles.max(1.0)
    }

    /// Returns the initial drive parameters, clamped into range.
    #[must_use]
    pub fn drive_parameters(&self) -> DriveParameters {
        DriveParameters::from_values(self.parameters)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: Self::default_capacity(),
            tick_period_ms: Self::default_tick_period_ms(),
            time_step_s: Self::default_time_step_s(),
            parameters: ParameterValues::default(),
            model: ModelConstants::default(),
        }
    }
}
