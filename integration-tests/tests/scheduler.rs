use std::{thread, time::Duration};

use integration_tests::{SCENARIO_FREQUENCY_HZ, resolved_session, scenario_parameters};
use sonolux_core::{Integrator, Parameter};
use sonolux_session::{Scheduler, SessionHandle, Status};
use uom::si::time::second;

const PERIOD: Duration = Duration::from_millis(2);

#[test]
fn scheduler_advances_a_running_session() {
    let handle = SessionHandle::default();
    let mut scheduler = Scheduler::spawn(handle.clone(), PERIOD).unwrap();

    handle.start();
    thread::sleep(Duration::from_millis(60));
    handle.pause();
    let paused = handle.tick_index();
    assert!(paused > 0);
    assert_eq!(handle.len() as u64, paused.min(1000));

    thread::sleep(Duration::from_millis(30));
    assert_eq!(handle.tick_index(), paused);
    assert_eq!(handle.status(), Status::Idle);

    scheduler.stop();
}

#[test]
fn every_tick_sees_one_stored_frequency() {
    let session = resolved_session(40, 1000);
    let dt = session.integrator().time_step().as_secs();
    let integrator = *session.integrator();
    let handle = SessionHandle::new(session);
    let _scheduler = Scheduler::spawn(handle.clone(), PERIOD).unwrap();
    handle.start();

    let written: Vec<f64> = (0..200).map(|i| 20_000.0 + f64::from(i) * 100.0).collect();
    let writer = {
        let handle = handle.clone();
        let written = written.clone();
        thread::spawn(move || {
            for frequency_hz in written {
                handle.set_parameter(Parameter::Frequency, frequency_hz);
                thread::sleep(Duration::from_micros(200));
            }
        })
    };
    writer.join().unwrap();
    thread::sleep(Duration::from_millis(20));
    handle.pause();

    let candidates: Vec<_> = std::iter::once(SCENARIO_FREQUENCY_HZ)
        .chain(written)
        .map(|frequency_hz| {
            let mut params = scenario_parameters();
            params.set(Parameter::Frequency, frequency_hz);
            params
        })
        .collect();

    let window = handle.window();
    assert!(!window.is_empty());
    for sample in window {
        let tick = (sample.time.get::<second>() / dt).round() as u64;
        assert!(
            candidates
                .iter()
                .any(|params| integrator.compute(tick, params) == sample),
            "tick {tick} matches no stored frequency"
        );
    }
}

#[test]
fn dropping_the_scheduler_stops_ticking() {
    let handle = SessionHandle::default();
    handle.start();
    {
        let _scheduler = Scheduler::spawn(handle.clone(), PERIOD).unwrap();
        thread::sleep(Duration::from_millis(20));
    }
    let stopped = handle.tick_index();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(handle.tick_index(), stopped);
    assert!(handle.is_running());
}
