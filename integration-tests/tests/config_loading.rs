use std::time::Duration;

use approx::assert_relative_eq;
use integration_tests::TempConfig;
use sonolux_core::Integrator;
use sonolux_session::{ConfigError, Session, SessionConfig};
use uom::si::{frequency::hertz, length::micrometer};

#[test]
fn session_is_built_from_a_config_file() {
    let file = TempConfig::new(
        r#"
        capacity = 64
        tick_period_ms = 8
        time_step_s = 1e-6

        [parameters]
        frequency_hz = 30000.0
        initial_radius_microns = 12.0
        "#,
    )
    .unwrap();

    let config = SessionConfig::load(file.path()).unwrap();
    assert_eq!(config.tick_period().unwrap(), Duration::from_millis(8));

    let mut session = Session::from_config(&config).unwrap();
    assert_eq!(session.capacity().get(), 64);
    assert_relative_eq!(session.integrator().time_step().as_secs(), 1e-6);
    assert_relative_eq!(session.parameters().frequency().get::<hertz>(), 30_000.0);
    // Clamped on load.
    assert_relative_eq!(
        session.parameters().initial_radius().get::<micrometer>(),
        10.0,
        max_relative = 1e-12
    );

    session.start();
    session.step_n(100);
    assert_eq!(session.len(), 64);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = SessionConfig::load("/nonexistent/sonolux.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn invalid_file_reports_the_first_problem() {
    let file = TempConfig::new("capacity = 0\ntick_period_ms = 0").unwrap();
    let err = SessionConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ZeroCapacity));
    assert_eq!(err.to_string(), "capacity must be greater than zero");
}
