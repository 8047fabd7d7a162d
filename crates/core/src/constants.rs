//! Tunable constants of the closed-form bubble model.
//!
//! None of these values are physically derived. They shape a sinusoidal
//! proxy of Rayleigh-Plesset dynamics so that the rendered trace has a
//! believable collapse, a temperature spike and a light flash. Renderers key
//! colors off the phase thresholds, so they are named here rather than inlined.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Depth of the radius oscillation: `rv = 1 + AMPLITUDE_FACTOR * sin(ωt)`.
pub const AMPLITUDE_FACTOR: f64 = 0.4;

/// Smallest allowed [`AMPLITUDE_FACTOR`].
pub const MIN_AMPLITUDE_FACTOR: f64 = 0.3;

/// Largest allowed [`AMPLITUDE_FACTOR`].
pub const MAX_AMPLITUDE_FACTOR: f64 = 0.4;

/// Radius variation below which the bubble is always in `Collapse`.
pub const COLLAPSE_THRESHOLD: f64 = 0.7;

/// Radius variation at and above which the bubble is in `Expansion`.
///
/// The band `[COLLAPSE_THRESHOLD, EXPANSION_THRESHOLD)` is `Collapse` while the
/// wall moves inward and `Emission` while it rebounds.
pub const EXPANSION_THRESHOLD: f64 = 0.8;

/// Lower bound applied to the radius variation before any division or power.
pub const RADIUS_VARIATION_FLOOR: f64 = 0.01;

/// Temperature exponent `k` during `Collapse`.
pub const COLLAPSE_EXPONENT: f64 = 10.0;

/// Temperature exponent `k` during `Emission`.
pub const EMISSION_EXPONENT: f64 = 6.0;

/// Temperature exponent `k` during `Expansion`.
pub const EXPANSION_EXPONENT: f64 = 1.0;

/// Exponent of the inverse power law relating pressure to radius variation.
pub const PRESSURE_EXPONENT: f64 = 3.0;

/// Temperature (K) above which the bubble emits light.
pub const EMISSION_TEMPERATURE_K: f64 = 10_000.0;

/// Temperature span (K) above [`EMISSION_TEMPERATURE_K`] that maps onto full intensity.
pub const LIGHT_SPAN_K: f64 = 100_000.0;

/// Power-law exponent of the light ramp.
pub const LIGHT_EXPONENT: f64 = 2.0;

/// Upper clamp for sample temperatures (K).
pub const MAX_TEMPERATURE_K: f64 = 2_000_000.0;

/// Upper clamp for sample pressures (atm).
pub const MAX_PRESSURE_ATM: f64 = 2_000.0;

/// The full set of model constants used by a [`BubbleIntegrator`].
///
/// `Default` yields the named module constants.
/// Fields missing from a deserialized table fall back to those defaults.
///
/// [`BubbleIntegrator`]: crate::BubbleIntegrator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConstants {
    pub amplitude_factor: f64,
    pub collapse_threshold: f64,
    pub expansion_threshold: f64,
    pub radius_variation_floor: f64,
    pub collapse_exponent: f64,
    pub emission_exponent: f64,
    pub expansion_exponent: f64,
    pub pressure_exponent: f64,
    pub emission_temperature_k: f64,
    pub light_span_k: f64,
    pub light_exponent: f64,
    pub max_temperature_k: f64,
    pub max_pressure_atm: f64,
}

/// Error returned when a [`ModelConstants`] value cannot drive the model safely.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConstantsError {
    #[error("`{name}` must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    #[error("`{name}` must be greater than zero, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("amplitude factor must lie in [0.3, 0.4], got {0}")]
    AmplitudeOutOfRange(f64),

    #[error(
        "thresholds must satisfy 0 < floor ({floor}) < collapse ({collapse}) < expansion ({expansion}) < 1"
    )]
    ThresholdOrder {
        floor: f64,
        collapse: f64,
        expansion: f64,
    },

    #[error("collapse exponent ({collapse}) must exceed emission exponent ({emission})")]
    ExponentOrder { collapse: f64, emission: f64 },

    #[error("emission temperature {0} K must lie below the temperature clamp")]
    EmissionAboveClamp(f64),
}

impl Default for ModelConstants {
    fn default() -> Self {
        Self {
            amplitude_factor: AMPLITUDE_FACTOR,
            collapse_threshold: COLLAPSE_THRESHOLD,
            expansion_threshold: EXPANSION_THRESHOLD,
            radius_variation_floor: RADIUS_VARIATION_FLOOR,
            collapse_exponent: COLLAPSE_EXPONENT,
            emission_exponent: EMISSION_EXPONENT,
            expansion_exponent: EXPANSION_EXPONENT,
            pressure_exponent: PRESSURE_EXPONENT,
            emission_temperature_k: EMISSION_TEMPERATURE_K,
            light_span_k: LIGHT_SPAN_K,
            light_exponent: LIGHT_EXPONENT,
            max_temperature_k: MAX_TEMPERATURE_K,
            max_pressure_atm: MAX_PRESSURE_ATM,
        }
    }
}

impl ModelConstants {
    /// Validates that the constants keep every sample finite and well ordered.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstantsError`] describing the first violated rule.
    pub fn validate(&self) -> Result<(), ConstantsError> {
        for (name, value) in self.named() {
            if !value.is_finite() {
                return Err(ConstantsError::NotFinite { name, value });
            }
        }

        for (name, value) in [
            ("collapse_exponent", self.collapse_exponent),
            ("emission_exponent", self.emission_exponent),
            ("expansion_exponent", self.expansion_exponent),
            ("pressure_exponent", self.pressure_exponent),
            ("emission_temperature_k", self.emission_temperature_k),
            ("light_span_k", self.light_span_k),
            ("light_exponent", self.light_exponent),
            ("max_temperature_k", self.max_temperature_k),
            ("max_pressure_atm", self.max_pressure_atm),
        ] {
            if value <= 0.0 {
                return Err(ConstantsError::NotPositive { name, value });
            }
        }

        if !(MIN_AMPLITUDE_FACTOR..=MAX_AMPLITUDE_FACTOR).contains(&self.amplitude_factor) {
            return Err(ConstantsError::AmplitudeOutOfRange(self.amplitude_factor));
        }

        let ordered = 0.0 < self.radius_variation_floor
            && self.radius_variation_floor < self.collapse_threshold
            && self.collapse_threshold < self.expansion_threshold
            && self.expansion_threshold < 1.0;
        if !ordered {
            return Err(ConstantsError::ThresholdOrder {
                floor: self.radius_variation_floor,
                collapse: self.collapse_threshold,
                expansion: self.expansion_threshold,
            });
        }

        if self.collapse_exponent <= self.emission_exponent {
            return Err(ConstantsError::ExponentOrder {
                collapse: self.collapse_exponent,
                emission: self.emission_exponent,
            });
        }

        if self.emission_temperature_k >= self.max_temperature_k {
            return Err(ConstantsError::EmissionAboveClamp(
                self.emission_temperature_k,
            ));
        }

        Ok(())
    }

    fn named(&self) -> [(&'static str, f64); 13] {
        [
            ("amplitude_factor", self.amplitude_factor),
            ("collapse_threshold", self.collapse_threshold),
            ("expansion_threshold", self.expansion_threshold),
            ("radius_variation_floor", self.radius_variation_floor),
            ("collapse_exponent", self.collapse_exponent),
            ("emission_exponent", self.emission_exponent),
            ("expansion_exponent", self.expansion_exponent),
            ("pressure_exponent", self.pressure_exponent),
            ("emission_temperature_k", self.emission_temperature_k),
            ("light_span_k", self.light_span_k),
            ("light_exponent", self.light_exponent),
            ("max_temperature_k", self.max_temperature_k),
            ("max_pressure_atm", self.max_pressure_atm),
        ]
    }
}
