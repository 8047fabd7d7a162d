use std::{
    io,
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, Sender, bounded, select, tick};
use sonolux_core::Integrator;
use tracing::{debug, info, warn};

use crate::SessionHandle;

const THREAD_NAME: &str = "sonolux-scheduler";

/// Drives a [`SessionHandle`] at a fixed wall-clock period on its own thread.
///
/// The scheduler ticks regardless of the session's status; an idle session
/// simply ignores the tick. Missed periods are dropped rather than replayed.
/// Dropping the scheduler stops the thread and waits for it.
#[derive(Debug)]
pub struct Scheduler {
    shutdown: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
    period: Duration,
}

impl Scheduler {
    /// Spawns the scheduler thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn<I>(handle: SessionHandle<I>, period: Duration) -> io::Result<Self>
    where
        I: Integrator + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = bounded(1);
        let worker = thread::Builder::new()
            .name(THREAD_NAME.to_owned())
            .spawn(move || run(&handle, period, &shutdown_rx))?;

        info!(?period, "scheduler started");
        Ok(Self {
            shutdown: Some(shutdown_tx),
            worker: Some(worker),
            period,
        })
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Signals the thread to exit and joins it. Idempotent.
    pub fn stop(&mut self) {
        // Dropping the sender disconnects the channel, which wakes `select!`.
        drop(self.shutdown.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("scheduler thread panicked");
            } else {
                info!("scheduler stopped");
            }
        }
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<I: Integrator>(handle: &SessionHandle<I>, period: Duration, shutdown: &Receiver<()>) {
    let ticker = tick(period);
    loop {
        select! {
            recv(ticker) -> _ => {
                let started = Instant::now();
                let sample = handle.tick();
                let elapsed = started.elapsed();

                if elapsed > period {
                    warn!(?elapsed, ?period, "tick overran its period");
                } else if let Some(sample) = sample {
                    debug!(phase = %sample.phase, ?elapsed, "tick");
                }
            }
            recv(shutdown) -> _ => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::Session;

    #[test]
    fn ticks_only_while_running() {
        let handle = SessionHandle::new(Session::default());
        let mut scheduler = Scheduler::spawn(handle.clone(), Duration::from_millis(1)).unwrap();

        thread::sleep(Duration::from_millis(20));
        assert_eq!(handle.tick_index(), 0);

        handle.start();
        thread::sleep(Duration::from_millis(50));
        assert!(handle.tick_index() > 0);

        scheduler.stop();
        let frozen = handle.tick_index();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(handle.tick_index(), frozen);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut scheduler =
            Scheduler::spawn(SessionHandle::default(), Duration::from_millis(5)).unwrap();
        scheduler.stop();
        scheduler.stop();
        assert_eq!(scheduler.period(), Duration::from_millis(5));
    }
}
