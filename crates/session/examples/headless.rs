//! Runs a session headlessly and prints one cycle of samples.
//!
//! ```sh
//! RUST_LOG=sonolux_session=debug cargo run -p sonolux-session --example headless [config.toml]
//! ```

use std::{env, error::Error, io, thread, time::Duration};

use sonolux_core::{Integrator, Parameter};
use sonolux_session::{Scheduler, Session, SessionConfig, SessionHandle};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match env::args().nth(1) {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig {
            // 40 ticks per drive period resolves the waveform.
            time_step_s: 1.0 / (40.0 * 26_500.0),
            ..SessionConfig::default()
        },
    };

    let handle = SessionHandle::new(Session::from_config(&config)?);
    let scheduler = Scheduler::spawn(handle.clone(), config.tick_period()?)?;

    handle.set_parameter(Parameter::AmbientPressure, 2.0);
    handle.start();
    thread::sleep(Duration::from_millis(40 * config.tick_period_ms));
    handle.pause();
    drop(scheduler);

    let dt = handle.with(|session| session.integrator().time_step());
    println!("{} ticks of {dt}", handle.tick_index());
    for record in handle.records() {
        println!(
            "{:>12.3e} s  r={:>6.3} µm  T={:>10.1} K  P={:>8.3} atm  light={:>5.3}  {}",
            record.time_s,
            record.radius_um,
            record.temperature_k,
            record.pressure_atm,
            record.light_intensity,
            record.phase,
        );
    }

    handle.export_json(io::stdout().lock())?;
    println!();
    Ok(())
}
