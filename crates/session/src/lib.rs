//! Simulation session for the sonolux bubble engine.
//!
//! A [`Session`] owns the run/pause/reset lifecycle, the tick counter and a
//! bounded [`SampleBuffer`] of recent samples produced by an
//! [`Integrator`](sonolux_core::Integrator). A [`SessionHandle`] shares one
//! session between threads, and a [`Scheduler`] drives it at a fixed
//! wall-clock period.
//!
//! # Example
//!
//! ```no_run
//! use std::{thread, time::Duration};
//!
//! use sonolux_core::Parameter;
//! use sonolux_session::{Scheduler, SessionConfig, SessionHandle, Session};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SessionConfig::default();
//! let handle = SessionHandle::new(Session::from_config(&config)?);
//! let _scheduler = Scheduler::spawn(handle.clone(), config.tick_period()?)?;
//!
//! handle.set_parameter(Parameter::Frequency, 30_000.0);
//! handle.start();
//! thread::sleep(Duration::from_millis(100));
//!
//! if let Some(sample) = handle.latest() {
//!     println!("{:?} at {:.1}% light", sample.phase, sample.light_percent());
//! }
//! # Ok(())
//! # }
//! ```

mod buffer;
mod config;
mod handle;
mod scheduler;
mod session;

pub use buffer::SampleBuffer;
pub use config::{ConfigError, SessionConfig};
pub use handle::SessionHandle;
pub use scheduler::Scheduler;
pub use session::{Session, Status};
