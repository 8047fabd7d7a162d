//! Shared fixtures for the workspace integration tests.

use std::{
    fs, io,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    process,
    sync::atomic::{AtomicUsize, Ordering},
};

use sonolux_core::{BubbleIntegrator, DriveParameters, Parameter, TimeIncrement};
use sonolux_session::Session;

/// The reference drive frequency used across scenarios.
pub const SCENARIO_FREQUENCY_HZ: f64 = 26_500.0;

/// Drive parameters of the documented reference scenario.
#[must_use]
pub fn scenario_parameters() -> DriveParameters {
    let mut params = DriveParameters::default();
    params.set(Parameter::Frequency, SCENARIO_FREQUENCY_HZ);
    params.set(Parameter::AmbientPressure, 1.5);
    params.set(Parameter::InitialRadius, 4.5);
    params.set(Parameter::BaselineTemperature, 300.0);
    params
}

/// An idle session whose time step resolves `ticks_per_period` samples per
/// drive period at the scenario frequency.
///
/// # Panics
///
/// Panics if `ticks_per_period` or `capacity` is zero.
#[must_use]
pub fn resolved_session(ticks_per_period: u32, capacity: usize) -> Session {
    let dt = TimeIncrement::from_secs(1.0 / (f64::from(ticks_per_period) * SCENARIO_FREQUENCY_HZ))
        .expect("positive time step");
    Session::new(
        BubbleIntegrator::with_time_step(dt),
        scenario_parameters(),
        NonZeroUsize::new(capacity).expect("non-zero capacity"),
    )
}

/// A TOML file under the system temp dir, removed on drop.
#[derive(Debug)]
pub struct TempConfig {
    path: PathBuf,
}

impl TempConfig {
    /// Writes `contents` to a fresh file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn new(contents: &str) -> io::Result<Self> {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!("sonolux-{}-{n}.toml", process::id()));
        fs::write(&path, contents)?;
        Ok(Self { path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempConfig {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
