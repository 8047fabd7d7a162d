//! Closed-form bubble-dynamics engine for a sonoluminescence visualization.
//!
//! This crate maps a tick index and a set of operator-controlled drive
//! parameters onto one physical sample of an oscillating bubble:
//!
//! - [`DriveParameters`]: frequency, ambient pressure, initial radius and
//!   baseline temperature, always clamped to their documented ranges
//! - [`Integrator`] / [`BubbleIntegrator`]: the pure, total per-tick model
//! - [`Sample`] / [`SampleRecord`]: the produced state and its plain,
//!   serializable form
//! - [`Phase`]: `Expansion`, `Collapse` or `Emission`
//! - [`ModelConstants`]: the tunable thresholds and exponents, see [`constants`]
//! - [`TimeIncrement`]: the simulated duration of one tick

pub mod constants;
mod integrator;
mod parameters;
mod phase;
mod sample;
mod time_increment;

pub use constants::{ConstantsError, ModelConstants};
pub use integrator::{BubbleIntegrator, Integrator, light_intensity};
pub use parameters::{
    Adjustment, DriveParameters, Parameter, ParameterDescriptor, ParameterValues,
    UnknownParameter,
};
pub use phase::Phase;
pub use sample::{Sample, SampleRecord};
pub use time_increment::{DEFAULT_TIME_STEP_S, TimeIncrement, TimeIncrementError};
