use std::{io::Write, sync::Arc};

use parking_lot::Mutex;
use sonolux_core::{
    Adjustment, BubbleIntegrator, DriveParameters, Integrator, Parameter, Sample, SampleRecord,
    UnknownParameter,
};

use crate::{Session, Status};

/// A cloneable, thread-safe handle to a shared [`Session`].
///
/// Each method takes the lock exactly once. A parameter write therefore lands
/// entirely between two ticks, and readers see a consistent snapshot.
#[derive(Debug)]
pub struct SessionHandle<I = BubbleIntegrator> {
    inner: Arc<Mutex<Session<I>>>,
}

impl<I> Clone for SessionHandle<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I: Integrator> SessionHandle<I> {
    #[must_use]
    pub fn new(session: Session<I>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Runs `f` with exclusive access to the session.
    ///
    /// The lock is held for the whole call and is not reentrant. Calling any
    /// method of this handle, or of a clone of it, from inside `f` deadlocks;
    /// use the `&mut Session` argument instead.
    pub fn with<R>(&self, f: impl FnOnce(&mut Session<I>) -> R) -> R {
        f(&mut self.inner.lock())
    }

    pub fn start(&self) {
        self.inner.lock().start();
    }

    pub fn pause(&self) {
        self.inner.lock().pause();
    }

    pub fn reset(&self) {
        self.inner.lock().reset();
    }

    pub fn tick(&self) -> Option<Sample> {
        self.inner.lock().tick()
    }

    pub fn set_parameter(&self, parameter: Parameter, value: f64) -> Adjustment {
        self.inner.lock().set_parameter(parameter, value)
    }

    /// # Errors
    ///
    /// Returns [`UnknownParameter`] if `name` does not identify a parameter.
    pub fn set_parameter_by_name(
        &self,
        name: &str,
        value: f64,
    ) -> Result<Adjustment, UnknownParameter> {
        self.inner.lock().set_parameter_by_name(name, value)
    }

    #[must_use]
    pub fn latest(&self) -> Option<Sample> {
        self.inner.lock().latest()
    }

    /// Copies the current window, oldest first.
    #[must_use]
    pub fn window(&self) -> Vec<Sample> {
        self.inner.lock().window()
    }

    #[must_use]
    pub fn records(&self) -> Vec<SampleRecord> {
        self.inner.lock().records()
    }

    /// Writes the window as JSON.
    ///
    /// The records are copied out first so the lock is not held during I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the writer fails.
    pub fn export_json<W: Write>(&self, writer: W) -> serde_json::Result<()> {
        let records = self.records();
        serde_json::to_writer(writer, &records)
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.inner.lock().status()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.lock().is_running()
    }

    #[must_use]
    pub fn tick_index(&self) -> u64 {
        self.inner.lock().tick_index()
    }

    #[must_use]
    pub fn parameters(&self) -> DriveParameters {
        self.inner.lock().parameters()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl<I: Integrator> From<Session<I>> for SessionHandle<I> {
    fn from(session: Session<I>) -> Self {
        Self::new(session)
    }
}

impl Default for SessionHandle<BubbleIntegrator> {
    fn default() -> Self {
        Self::new(Session::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::thread;

    use approx::assert_relative_eq;

    #[test]
    fn clones_share_one_session() {
        let handle = SessionHandle::default();
        let other = handle.clone();

        handle.start();
        other.tick();
        other.tick();

        assert_eq!(handle.tick_index(), 2);
        assert_eq!(handle.window().len(), 2);
    }

    #[test]
    fn writes_from_other_threads_are_visible() {
        let handle = SessionHandle::default();
        let writer = handle.clone();

        thread::spawn(move || {
            writer.set_parameter(Parameter::AmbientPressure, 2.5);
        })
        .join()
        .unwrap();

        assert_relative_eq!(
            handle.parameters().values().ambient_pressure_atm,
            2.5,
            max_relative = 1e-12
        );
    }

    #[test]
    fn concurrent_ticks_never_duplicate_an_index() {
        let handle = SessionHandle::default();
        handle.start();

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let handle = handle.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        handle.tick();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(handle.tick_index(), 400);
        assert_eq!(handle.len(), 400);

        let window = handle.window();
        for pair in window.windows(2) {
            assert!(pair[1].time > pair[0].time);
        }
    }

    #[test]
    fn with_gives_exclusive_access() {
        let handle = SessionHandle::default();
        let ticks = handle.with(|session| {
            session.start();
            session.step_n(5)
        });
        assert_eq!(ticks, 5);
        assert_eq!(handle.status(), Status::Running);
    }

    #[test]
    fn with_holds_the_lock_for_the_whole_call() {
        let handle = SessionHandle::default();
        let other = handle.clone();

        let locked_inside = handle.with(|_| other.inner.try_lock().is_none());

        assert!(locked_inside);
        assert!(other.inner.try_lock().is_some());
    }
}
