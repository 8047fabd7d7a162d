//! Operator-controlled drive parameters and their valid ranges.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uom::si::{
    f64::{Frequency, Length, Pressure, ThermodynamicTemperature},
    frequency::hertz,
    length::micrometer,
    pressure::atmosphere,
    thermodynamic_temperature::kelvin,
};

/// One of the four drive parameters an operator may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Acoustic drive frequency, in Hz.
    Frequency,
    /// Baseline liquid pressure, in atm.
    AmbientPressure,
    /// Equilibrium bubble radius, in µm.
    InitialRadius,
    /// Resting temperature, in K.
    BaselineTemperature,
}

/// Static description of a [`Parameter`] for operator-facing layers.
///
/// Values are expressed in the parameter's display unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterDescriptor {
    pub name: &'static str,
    pub unit: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

/// Error returned when a parameter name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown parameter `{0}`")]
pub struct UnknownParameter(pub String);

impl Parameter {
    /// All parameters, in display order.
    pub const ALL: [Parameter; 4] = [
        Parameter::Frequency,
        Parameter::AmbientPressure,
        Parameter::InitialRadius,
        Parameter::BaselineTemperature,
    ];

    /// Returns the range, default and slider step of this parameter.
    #[must_use]
    pub const fn descriptor(self) -> ParameterDescriptor {
        match self {
            Parameter::Frequency => ParameterDescriptor {
                name: "frequencyHz",
                unit: "Hz",
                min: 20_000.0,
                max: 40_000.0,
                default: 26_500.0,
                step: 100.0,
            },
            Parameter::AmbientPressure => ParameterDescriptor {
                name: "ambientPressureAtm",
                unit: "atm",
                min: 1.0,
                max: 3.0,
                default: 1.5,
                step: 0.1,
            },
            Parameter::InitialRadius => ParameterDescriptor {
                name: "initialRadiusMicrons",
                unit: "µm",
                min: 2.0,
                max: 10.0,
                default: 4.5,
                step: 0.1,
            },
            Parameter::BaselineTemperature => ParameterDescriptor {
                name: "baselineTemperatureK",
                unit: "K",
                min: 273.15,
                max: 373.15,
                default: 300.0,
                step: 1.0,
            },
        }
    }

    /// Returns the camelCase name used by operator-facing layers.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Clamps `value` into this parameter's range.
    ///
    /// Returns `None` for NaN, which has no nearest bound.
    #[must_use]
    pub fn clamp(self, value: f64) -> Option<f64> {
        if value.is_nan() {
            return None;
        }
        let ParameterDescriptor { min, max, .. } = self.descriptor();
        Some(value.clamp(min, max))
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses both the camelCase names and their snake_case equivalents.
impl FromStr for Parameter {
    type Err = UnknownParameter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frequencyHz" | "frequency_hz" => Ok(Parameter::Frequency),
            "ambientPressureAtm" | "ambient_pressure_atm" => Ok(Parameter::AmbientPressure),
            "initialRadiusMicrons" | "initial_radius_microns" => Ok(Parameter::InitialRadius),
            "baselineTemperatureK" | "baseline_temperature_k" => {
                Ok(Parameter::BaselineTemperature)
            }
            other => Err(UnknownParameter(other.to_owned())),
        }
    }
}

/// The outcome of writing a parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    /// The requested value was in range and stored as is.
    Accepted(f64),
    /// The requested value was out of range; the nearest bound was stored.
    Clamped { requested: f64, stored: f64 },
    /// The requested value was NaN; the previous value was kept.
    Ignored { kept: f64 },
}

impl Adjustment {
    /// Returns the value held by the parameter after the write.
    #[must_use]
    pub fn stored(&self) -> f64 {
        match *self {
            Adjustment::Accepted(value) => value,
            Adjustment::Clamped { stored, .. } => stored,
            Adjustment::Ignored { kept } => kept,
        }
    }
}

/// Drive parameters as plain numbers in display units.
///
/// This is the serializable form used by configuration files and readouts.
/// Missing fields fall back to the parameter defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterValues {
    pub frequency_hz: f64,
    pub ambient_pressure_atm: f64,
    pub initial_radius_microns: f64,
    pub baseline_temperature_k: f64,
}

impl Default for ParameterValues {
    fn default() -> Self {
        Self {
            frequency_hz: Parameter::Frequency.descriptor().default,
            ambient_pressure_atm: Parameter::AmbientPressure.descriptor().default,
            initial_radius_microns: Parameter::InitialRadius.descriptor().default,
            baseline_temperature_k: Parameter::BaselineTemperature.descriptor().default,
        }
    }
}

/// The drive parameters read by the integrator on every tick.
///
/// Every field is guaranteed to lie within its documented range: values are
/// clamped on construction and on every write, and NaN writes are ignored.
/// `DriveParameters` is `Copy`, so a tick works on its own snapshot.
///
/// # Example
///
/// ```
/// use sonolux_core::{DriveParameters, Parameter};
/// use uom::si::frequency::hertz;
///
/// let mut params = DriveParameters::default();
/// params.set(Parameter::Frequency, 100_000.0);
/// assert_eq!(params.frequency().get::<hertz>(), 40_000.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveParameters {
    frequency: Frequency,
    ambient_pressure: Pressure,
    initial_radius: Length,
    baseline_temperature: ThermodynamicTemperature,
}

impl DriveParameters {
    /// Creates drive parameters from uom quantities, clamping each into range.
    ///
    /// A NaN quantity is replaced by that parameter's default.
    #[must_use]
    pub fn new(
        frequency: Frequency,
        ambient_pressure: Pressure,
        initial_radius: Length,
        baseline_temperature: ThermodynamicTemperature,
    ) -> Self {
        Self::from_values(ParameterValues {
            frequency_hz: frequency.get::<hertz>(),
            ambient_pressure_atm: ambient_pressure.get::<atmosphere>(),
            initial_radius_microns: initial_radius.get::<micrometer>(),
            baseline_temperature_k: baseline_temperature.get::<kelvin>(),
        })
    }

    /// Creates drive parameters from display-unit values, clamping each into range.
    ///
    /// A NaN value is replaced by that parameter's default.
    #[must_use]
    pub fn from_values(values: ParameterValues) -> Self {
        let mut params = Self::default();
        params.set(Parameter::Frequency, values.frequency_hz);
        params.set(Parameter::AmbientPressure, values.ambient_pressure_atm);
        params.set(Parameter::InitialRadius, values.initial_radius_microns);
        params.set(Parameter::BaselineTemperature, values.baseline_temperature_k);
        params
    }

    /// Writes one parameter in its display unit, clamping to the valid range.
    #[allow(clippy::float_cmp)]
    pub fn set(&mut self, parameter: Parameter, value: f64) -> Adjustment {
        let Some(stored) = parameter.clamp(value) else {
            return Adjustment::Ignored {
                kept: self.get(parameter),
            };
        };

        match parameter {
            Parameter::Frequency => self.frequency = Frequency::new::<hertz>(stored),
            Parameter::AmbientPressure => {
                self.ambient_pressure = Pressure::new::<atmosphere>(stored);
            }
            Parameter::InitialRadius => self.initial_radius = Length::new::<micrometer>(stored),
            Parameter::BaselineTemperature => {
                self.baseline_temperature = ThermodynamicTemperature::new::<kelvin>(stored);
            }
        }

        // `clamp` returns the input unchanged when it is already in range.
        if stored == value {
            Adjustment::Accepted(stored)
        } else {
            Adjustment::Clamped {
                requested: value,
                stored,
            }
        }
    }

    /// Reads one parameter in its display unit.
    #[must_use]
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Frequency => self.frequency.get::<hertz>(),
            Parameter::AmbientPressure => self.ambient_pressure.get::<atmosphere>(),
            Parameter::InitialRadius => self.initial_radius.get::<micrometer>(),
            Parameter::BaselineTemperature => self.baseline_temperature.get::<kelvin>(),
        }
    }

    /// Returns all parameters in display units.
    #[must_use]
    pub fn values(&self) -> ParameterValues {
        ParameterValues {
            frequency_hz: self.get(Parameter::Frequency),
            ambient_pressure_atm: self.get(Parameter::AmbientPressure),
            initial_radius_microns: self.get(Parameter::InitialRadius),
            baseline_temperature_k: self.get(Parameter::BaselineTemperature),
        }
    }

    #[must_use]
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    #[must_use]
    pub fn ambient_pressure(&self) -> Pressure {
        self.ambient_pressure
    }

    #[must_use]
    pub fn initial_radius(&self) -> Length {
        self.initial_radius
    }

    #[must_use]
    pub fn baseline_temperature(&self) -> ThermodynamicTemperature {
        self.baseline_temperature
    }
}

impl Default for DriveParameters {
    fn default() -> Self {
        let values = ParameterValues::default();
        Self {
            frequency: Frequency::new::<hertz>(values.frequency_hz),
            ambient_pressure: Pressure::new::<atmosphere>(values.ambient_pressure_atm),
            initial_radius: Length::new::<micrometer>(values.initial_radius_microns),
            baseline_temperature: ThermodynamicTemperature::new::<kelvin>(
                values.baseline_temperature_k,
            ),
        }
    }
}

impl From<ParameterValues> for DriveParameters {
    fn from(values: ParameterValues) -> Self {
        Self::from_values(values)
    }
}
