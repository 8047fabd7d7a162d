use std::{io::Write, num::NonZeroUsize};

use sonolux_core::{
    Adjustment, BubbleIntegrator, DriveParameters, Integrator, Parameter, Sample, SampleRecord,
    UnknownParameter,
};
use tracing::{debug, info, trace, warn};

use crate::{ConfigError, SampleBuffer, SessionConfig};

/// Whether the scheduler's ticks currently advance the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Running,
}

/// Owns the run/pause/reset lifecycle, the tick counter and the sample window.
///
/// A `Session` is the only writer of its tick index and buffer.
/// Drive parameters are written through [`Session::set_parameter`] and read by
/// the integrator as a single copy per tick, so a tick never observes a
/// partially applied write.
///
/// ```text
/// Idle --start()--> Running --pause()--> Idle
///   ^                  |
///   +----- reset() ----+   (reset is valid from any state)
/// ```
///
/// # Example
///
/// ```
/// use sonolux_session::Session;
///
/// let mut session = Session::default();
/// assert!(session.tick().is_none(), "idle sessions do not advance");
///
/// session.start();
/// session.step_n(3);
/// assert_eq!(session.tick_index(), 3);
/// assert_eq!(session.len(), 3);
///
/// session.reset();
/// assert!(session.latest().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Session<I = BubbleIntegrator> {
    integrator: I,
    parameters: DriveParameters,
    status: Status,
    tick_index: u64,
    buffer: SampleBuffer,
}

impl<I: Integrator> Session<I> {
    /// Creates an idle session with an empty buffer and a zero tick index.
    #[must_use]
    pub fn new(integrator: I, parameters: DriveParameters, capacity: NonZeroUsize) -> Self {
        Self {
            integrator,
            parameters,
            status: Status::Idle,
            tick_index: 0,
            buffer: SampleBuffer::new(capacity),
        }
    }

    /// Starts advancing on scheduler ticks. No-op if already running.
    pub fn start(&mut self) {
        if self.status == Status::Running {
            return;
        }
        self.status = Status::Running;
        info!(tick = self.tick_index, "session started");
    }

    /// Stops advancing on scheduler ticks. No-op if already idle.
    pub fn pause(&mut self) {
        if self.status == Status::Idle {
            return;
        }
        self.status = Status::Idle;
        info!(tick = self.tick_index, "session paused");
    }

    /// Returns to `Idle` with an empty buffer and a zero tick index.
    ///
    /// Drive parameters are left untouched.
    pub fn reset(&mut self) {
        if self.status == Status::Idle && self.tick_index == 0 && self.buffer.is_empty() {
            return;
        }
        info!(tick = self.tick_index, samples = self.buffer.len(), "session reset");
        self.status = Status::Idle;
        self.tick_index = 0;
        self.buffer.clear();
    }

    /// Writes one drive parameter in its display unit.
    ///
    /// Out-of-range values are clamped to the nearest bound and NaN is
    /// ignored; neither is an error.
    pub fn set_parameter(&mut self, parameter: Parameter, value: f64) -> Adjustment {
        let adjustment = self.parameters.set(parameter, value);
        match adjustment {
            Adjustment::Accepted(stored) => debug!(%parameter, stored, "parameter set"),
            Adjustment::Clamped { requested, stored } => {
                debug!(%parameter, requested, stored, "parameter clamped into range");
            }
            Adjustment::Ignored { kept } => {
                warn!(%parameter, kept, "ignored NaN parameter write");
            }
        }
        adjustment
    }

    /// Writes a drive parameter identified by name, e.g. `"frequencyHz"`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownParameter`] if `name` does not identify a parameter.
    pub fn set_parameter_by_name(
        &mut self,
        name: &str,
        value: f64,
    ) -> Result<Adjustment, UnknownParameter> {
        let parameter = name.parse()?;
        Ok(self.set_parameter(parameter, value))
    }

    /// Replaces all drive parameters at once.
    pub fn set_parameters(&mut self, parameters: DriveParameters) {
        self.parameters = parameters;
        debug!(?parameters, "parameters replaced");
    }

    /// Advances one tick if running.
    ///
    /// Computes the sample for the current tick index, appends it to the
    /// buffer (evicting the oldest sample when full) and increments the index.
    /// The first sample after a reset is tick 0.
    /// Returns `None` without side effects while idle.
    pub fn tick(&mut self) -> Option<Sample> {
        if self.status != Status::Running {
            return None;
        }

        let parameters = self.parameters;
        let sample = self.integrator.compute(self.tick_index, &parameters);
        self.buffer.push(sample);
        trace!(tick = self.tick_index, phase = %sample.phase, "sample appended");

        self.tick_index = self.tick_index.saturating_add(1);
        Some(sample)
    }

    /// Runs up to `n` ticks and returns how many produced a sample.
    pub fn step_n(&mut self, n: usize) -> usize {
        (0..n).map_while(|_| self.tick()).count()
    }

    /// Returns the most recent sample, or `None` if the buffer is empty.
    #[must_use]
    pub fn latest(&self) -> Option<Sample> {
        self.buffer.latest().copied()
    }

    /// Returns a snapshot of the buffered samples, oldest first.
    #[must_use]
    pub fn window(&self) -> Vec<Sample> {
        self.buffer.to_vec()
    }

    /// Iterates over the buffered samples without copying them.
    pub fn iter_window(&self) -> impl DoubleEndedIterator<Item = &Sample> + ExactSizeIterator {
        self.buffer.iter()
    }

    /// Returns the window in display units, for renderers and exports.
    #[must_use]
    pub fn records(&self) -> Vec<SampleRecord> {
        self.buffer.iter().map(Sample::record).collect()
    }

    /// Writes the window as a JSON array of [`SampleRecord`]s.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying writer fails.
    pub fn export_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer(writer, &self.records())
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == Status::Running
    }

    /// Returns the index of the next tick to be computed.
    #[must_use]
    pub fn tick_index(&self) -> u64 {
        self.tick_index
    }

    #[must_use]
    pub fn parameters(&self) -> DriveParameters {
        self.parameters
    }

    #[must_use]
    pub fn integrator(&self) -> &I {
        &self.integrator
    }

    #[must_use]
    pub fn capacity(&self) -> NonZeroUsize {
        self.buffer.capacity()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Session<BubbleIntegrator> {
    /// Creates an idle session from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
        if config.is_aliased() {
            debug!(
                time_step_s = config.time_step_s,
                frequency_hz = config.parameters.frequency_hz,
                "time step aliases the drive, every tick samples rv = 1"
            );
        }
        Ok(Self::new(
            config.integrator()?,
            config.drive_parameters(),
            config.capacity()?,
        ))
    }
}

impl Default for Session<BubbleIntegrator> {
    fn default() -> Self {
        let config = SessionConfig::default();
        Self::new(
            BubbleIntegrator::default(),
            config.drive_parameters(),
            NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use sonolux_core::{Phase, TimeIncrement};
    use uom::si::{frequency::hertz, time::second};

    fn session(capacity: usize) -> Session {
        Session::new(
            BubbleIntegrator::default(),
            DriveParameters::default(),
            NonZeroUsize::new(capacity).unwrap(),
        )
    }

    #[test]
    fn starts_idle_and_empty() {
        let session = Session::default();
        assert_eq!(session.status(), Status::Idle);
        assert_eq!(session.tick_index(), 0);
        assert!(session.is_empty());
        assert!(session.latest().is_none());
        assert_eq!(session.capacity().get(), 1000);
    }

    #[test]
    fn tick_is_a_no_op_while_idle() {
        let mut session = session(10);
        assert!(session.tick().is_none());
        assert_eq!(session.tick_index(), 0);
        assert!(session.is_empty());
    }

    #[test]
    fn start_and_pause_toggle_running() {
        let mut session = session(10);

        session.start();
        session.start();
        assert!(session.is_running());

        session.pause();
        session.pause();
        assert!(!session.is_running());
    }

    #[test]
    fn first_sample_is_tick_zero() {
        let mut session = session(10);
        session.start();

        let sample = session.tick().unwrap();

        assert_relative_eq!(sample.time.get::<second>(), 0.0);
        assert_eq!(session.tick_index(), 1);
        assert_eq!(session.latest(), Some(sample));
    }

    #[test]
    fn pause_freezes_tick_index_and_buffer() {
        let mut session = session(10);
        session.start();
        session.step_n(4);
        session.pause();

        assert_eq!(session.step_n(5), 0);
        assert_eq!(session.tick_index(), 4);
        assert_eq!(session.len(), 4);

        session.start();
        session.tick();
        assert_eq!(session.tick_index(), 5);
    }

    #[test]
    fn window_is_bounded_and_oldest_is_tick_k() {
        let capacity = 8;
        let k = 5;
        let mut session = session(capacity);
        session.start();

        session.step_n(capacity + k);

        let window = session.window();
        assert_eq!(window.len(), capacity);
        assert_relative_eq!(
            window[0].time.get::<second>(),
            0.01 * k as f64,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            window[capacity - 1].time.get::<second>(),
            0.01 * (capacity + k - 1) as f64,
            epsilon = 1e-12
        );
    }

    #[test]
    fn reset_clears_history_but_keeps_parameters() {
        let mut session = session(10);
        session.set_parameter(Parameter::Frequency, 33_000.0);
        session.start();
        session.step_n(3);

        session.reset();

        assert_eq!(session.status(), Status::Idle);
        assert_eq!(session.tick_index(), 0);
        assert!(session.latest().is_none());
        assert!(session.window().is_empty());
        assert_relative_eq!(session.parameters().frequency().get::<hertz>(), 33_000.0);
    }

    #[test]
    fn set_parameter_clamps_to_upper_bound() {
        let mut session = session(10);
        let adjustment = session.set_parameter_by_name("frequencyHz", 100_000.0).unwrap();

        assert_relative_eq!(adjustment.stored(), 40_000.0);
        assert_relative_eq!(session.parameters().frequency().get::<hertz>(), 40_000.0);
    }

    #[test]
    fn set_parameter_by_unknown_name_fails() {
        let mut session = session(10);
        assert!(session.set_parameter_by_name("viscosity", 1.0).is_err());
    }

    #[test]
    fn parameter_writes_apply_from_the_next_tick() {
        let dt = TimeIncrement::from_secs(1.0 / (4.0 * 20_000.0)).unwrap();
        let mut session = Session::new(
            BubbleIntegrator::with_time_step(dt),
            DriveParameters::default(),
            NonZeroUsize::new(10).unwrap(),
        );
        session.set_parameter(Parameter::Frequency, 20_000.0);
        session.start();

        session.step_n(3);
        let unchanged = session.integrator().compute(3, &session.parameters());
        assert_eq!(unchanged.phase, Phase::Collapse);

        session.set_parameter(Parameter::Frequency, 40_000.0);
        let sample = session.tick().unwrap();

        // Tick 3 at 40 kHz sits at 3/2 of a period, back at rest.
        assert_eq!(sample.phase, Phase::Expansion);
        assert_relative_eq!(
            sample.radius.get::<uom::si::length::micrometer>(),
            4.5,
            epsilon = 1e-6
        );
    }

    #[test]
    fn resolved_time_step_walks_phases_in_order() {
        let frequency_hz = 26_500.0;
        let dt = TimeIncrement::from_secs(1.0 / (64.0 * frequency_hz)).unwrap();
        let mut session = Session::new(
            BubbleIntegrator::with_time_step(dt),
            DriveParameters::default(),
            NonZeroUsize::new(256).unwrap(),
        );
        session.start();
        session.step_n(256);

        let mut phases: Vec<Phase> = session.iter_window().map(|s| s.phase).collect();
        phases.dedup();

        for pair in phases.windows(2) {
            assert_eq!(pair[1], pair[0].next());
        }
        assert!(phases.len() >= 3 * 4);
    }

    #[test]
    fn export_json_writes_records() {
        let mut session = session(4);
        session.start();
        session.step_n(2);

        let mut out = Vec::new();
        session.export_json(&mut out).unwrap();

        let records: Vec<SampleRecord> = serde_json::from_slice(&out).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records, session.records());

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"phase\":\"expansion\""));
    }

    #[test]
    fn export_json_is_lossless() {
        let dt = TimeIncrement::from_secs(1.0 / (8.0 * 26_500.0)).unwrap();
        let mut session = Session::new(
            BubbleIntegrator::with_time_step(dt),
            DriveParameters::default(),
            NonZeroUsize::new(16).unwrap(),
        );
        session.start();
        session.step_n(8);

        let mut out = Vec::new();
        session.export_json(&mut out).unwrap();
        let records: Vec<SampleRecord> = serde_json::from_slice(&out).unwrap();

        // Tick 3 lands on 1.4150943396226417e-5 s, which a lossy parser rounds.
        assert_eq!(records[3].time_s, session.records()[3].time_s);
        assert_eq!(records, session.records());
    }

    #[test]
    fn set_parameters_replaces_every_field() {
        let mut session = session(4);
        let replacement = DriveParameters::from_values(sonolux_core::ParameterValues {
            frequency_hz: 38_000.0,
            ambient_pressure_atm: 2.0,
            initial_radius_microns: 8.0,
            baseline_temperature_k: 310.0,
        });

        session.set_parameters(replacement);

        assert_eq!(session.parameters(), replacement);
        session.start();
        let sample = session.tick().unwrap();
        assert_eq!(sample, session.integrator().compute(0, &replacement));
    }
}
