use serde::{Deserialize, Serialize};
use uom::si::{
    f64::{Length, Pressure, ThermodynamicTemperature, Time},
    length::micrometer,
    pressure::atmosphere,
    thermodynamic_temperature::kelvin,
    time::second,
};

use crate::Phase;

/// The physical state of the bubble at one tick.
///
/// A `Sample` is produced once per tick and never modified.
/// Every field is finite and lies within its clamp range:
///
/// - `radius` is strictly positive,
/// - `temperature` lies in `[baseline, MAX_TEMPERATURE_K]`,
/// - `pressure` lies in `[0, MAX_PRESSURE_ATM]`,
/// - `light_intensity` lies in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: Time,
    pub radius: Length,
    pub temperature: ThermodynamicTemperature,
    pub pressure: Pressure,
    pub light_intensity: f64,
    pub phase: Phase,
}

impl Sample {
    /// Returns the light intensity as a percentage, as shown in readouts.
    #[must_use]
    pub fn light_percent(&self) -> f64 {
        self.light_intensity * 100.0
    }

    /// Converts the sample into its plain, serializable form.
    #[must_use]
    pub fn record(&self) -> SampleRecord {
        SampleRecord {
            time_s: self.time.get::<second>(),
            radius_um: self.radius.get::<micrometer>(),
            temperature_k: self.temperature.get::<kelvin>(),
            pressure_atm: self.pressure.get::<atmosphere>(),
            light_intensity: self.light_intensity,
            phase: self.phase,
        }
    }
}

/// A [`Sample`] in display units, for renderers and exports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub time_s: f64,
    pub radius_um: f64,
    pub temperature_k: f64,
    pub pressure_atm: f64,
    pub light_intensity: f64,
    pub phase: Phase,
}

impl From<Sample> for SampleRecord {
    fn from(sample: Sample) -> Self {
        sample.record()
    }
}
