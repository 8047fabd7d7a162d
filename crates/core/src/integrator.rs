//! The closed-form bubble integrator.
//!
//! Each sample is recomputed from `(t, parameters)` alone. The radius follows a
//! sinusoidal proxy of Rayleigh-Plesset dynamics,
//!
//! ```text
//! rv(t) = 1 + A sin(2π f t)
//! ```
//!
//! and temperature, pressure and light intensity are power laws of `1 / rv`.
//! No state is carried between ticks, so there is no drift to accumulate and
//! any tick can be evaluated independently of the others.
//!
//! This is not a solution of the Rayleigh-Plesset equation. Physical
//! accuracy would require a stateful ODE integrator instead.

use std::f64::consts::TAU;

use uom::si::{
    f64::{Length, Pressure, ThermodynamicTemperature, Time},
    frequency::hertz,
    length::micrometer,
    pressure::atmosphere,
    thermodynamic_temperature::kelvin,
    time::second,
};

use crate::{ConstantsError, DriveParameters, ModelConstants, Phase, Sample, TimeIncrement};

/// Maps a tick index and the drive parameters onto one [`Sample`].
///
/// Implementations must be pure and total: the same inputs always produce the
/// same sample, and every in-range input produces a finite, clamped sample.
pub trait Integrator {
    /// The simulated duration of one tick.
    fn time_step(&self) -> TimeIncrement;

    /// Computes the sample for tick `tick` under `params`.
    fn compute(&self, tick: u64, params: &DriveParameters) -> Sample;
}

/// The default [`Integrator`]: a sinusoidal radius proxy with phase-dependent
/// power laws for temperature, an inverse power law for pressure and a
/// thresholded light ramp.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BubbleIntegrator {
    time_step: TimeIncrement,
    constants: ModelConstants,
}

impl BubbleIntegrator {
    /// Creates an integrator with the given tick duration and model constants.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstantsError`] if `constants` fails validation.
    pub fn new(time_step: TimeIncrement, constants: ModelConstants) -> Result<Self, ConstantsError> {
        constants.validate()?;
        Ok(Self {
            time_step,
            constants,
        })
    }

    /// Creates an integrator with the default model constants.
    #[must_use]
    pub fn with_time_step(time_step: TimeIncrement) -> Self {
        Self {
            time_step,
            constants: ModelConstants::default(),
        }
    }

    /// Returns the model constants in use.
    #[must_use]
    pub fn constants(&self) -> &ModelConstants {
        &self.constants
    }

    /// Returns the floored radius variation at `time`.
    #[must_use]
    pub fn radius_variation(&self, time: Time, params: &DriveParameters) -> f64 {
        let (radius_variation, _) = self.oscillation(time, params);
        radius_variation
    }

    /// Evaluates the model at an arbitrary simulated time.
    ///
    /// [`Integrator::compute`] is `sample_at(tick * dt)`.
    #[must_use]
    pub fn sample_at(&self, time: Time, params: &DriveParameters) -> Sample {
        let (radius_variation, rebounding) = self.oscillation(time, params);
        self.sample_from_variation(time, radius_variation, rebounding, params)
    }

    /// Returns `(rv, rebounding)` at `time`, with `rv` already floored.
    fn oscillation(&self, time: Time, params: &DriveParameters) -> (f64, bool) {
        let omega = TAU * params.frequency().get::<hertz>();
        let angle = omega * time.get::<second>();

        let raw = 1.0 + self.constants.amplitude_factor * angle.sin();
        let rebounding = angle.cos() > 0.0;

        (floor_variation(raw, self.constants.radius_variation_floor), rebounding)
    }

    fn sample_from_variation(
        &self,
        time: Time,
        radius_variation: f64,
        rebounding: bool,
        params: &DriveParameters,
    ) -> Sample {
        let c = &self.constants;

        // Applied again so no caller can feed a zero or negative base into `powf`.
        let rv = floor_variation(radius_variation, c.radius_variation_floor);
        let phase = Phase::classify(rv, rebounding, c);
        let compression = rv.recip();

        let exponent = match phase {
            Phase::Collapse => c.collapse_exponent,
            Phase::Emission => c.emission_exponent,
            Phase::Expansion => c.expansion_exponent,
        };

        let baseline_k = params.baseline_temperature().get::<kelvin>();
        let temperature_k = clamp_finite(
            baseline_k * compression.powf(exponent),
            baseline_k,
            c.max_temperature_k,
        );

        let pressure_atm = clamp_finite(
            params.ambient_pressure().get::<atmosphere>() * compression.powf(c.pressure_exponent),
            0.0,
            c.max_pressure_atm,
        );

        Sample {
            time,
            radius: Length::new::<micrometer>(params.initial_radius().get::<micrometer>() * rv),
            temperature: ThermodynamicTemperature::new::<kelvin>(temperature_k),
            pressure: Pressure::new::<atmosphere>(pressure_atm),
            light_intensity: light_intensity(temperature_k, c),
            phase,
        }
    }
}

impl Integrator for BubbleIntegrator {
    fn time_step(&self) -> TimeIncrement {
        self.time_step
    }

    fn compute(&self, tick: u64, params: &DriveParameters) -> Sample {
        self.sample_at(self.time_step.elapsed(tick), params)
    }
}

/// Normalized light intensity for a temperature in kelvin.
///
/// Exactly zero at or below the emission temperature, then a power-law ramp
/// over `light_span_k` capped at one.
#[must_use]
#[allow(clippy::neg_cmp_op_on_partial_ord)]
pub fn light_intensity(temperature_k: f64, constants: &ModelConstants) -> f64 {
    // Negated so that NaN also yields zero.
    if !(temperature_k > constants.emission_temperature_k) {
        return 0.0;
    }
    let ramp = (temperature_k - constants.emission_temperature_k) / constants.light_span_k;
    clamp_finite(ramp.powf(constants.light_exponent), 0.0, 1.0)
}

fn floor_variation(radius_variation: f64, floor: f64) -> f64 {
    if radius_variation.is_nan() {
        floor
    } else {
        radius_variation.max(floor)
    }
}

/// Clamps into `[min, max]`, mapping NaN onto `min`.
fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}
