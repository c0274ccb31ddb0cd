//! Countdown task engine: a worker-thread progress loop whose UI effects
//! are applied on the foreground thread through a [`ScreenBinding`].

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, TryRecvError};
use thiserror::Error;
use tracing::{debug, info};

use crate::binding::ScreenBinding;

/// Result string surfaced when a countdown completes.
pub const FINISHED_RESULT: &str = "Finished!";

/// Wall-clock pause between countdown steps in the shipped app.
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_secs(1);

const EVENT_QUEUE_CAPACITY: usize = 256;

/// Events produced by the worker thread, drained and applied on the
/// foreground thread in production order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    Progress(u8),
    Finished(String),
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("countdown worker thread panicked")]
    WorkerPanicked,
}

/// Percent-complete values for a countdown with `max` steps, one per step,
/// using integer division at every step. The last value is always 100.
pub fn progress_percentages(max: u32) -> impl Iterator<Item = u8> {
    (1..=max).map(move |step| ((step * 100) / max) as u8)
}

/// A single countdown run: shows the progress indicator, counts `1..=max`
/// on a worker thread with one interval of sleep per step, then surfaces
/// [`FINISHED_RESULT`].
///
/// Whether those UI effects can outlive the screen is decided entirely by
/// the binding the task is constructed with.
pub struct CountdownTask {
    binding: ScreenBinding,
    max: u32,
    step_interval: Duration,
}

impl CountdownTask {
    pub fn new(binding: ScreenBinding, max: u32) -> Self {
        debug_assert!(max > 0, "countdown bound must be positive");
        Self {
            binding,
            max,
            step_interval: DEFAULT_STEP_INTERVAL,
        }
    }

    /// Overrides the per-step pause. The shipped app keeps the default.
    pub fn with_step_interval(mut self, interval: Duration) -> Self {
        self.step_interval = interval;
        self
    }

    /// Runs the pre-execute step on the calling (foreground) thread, then
    /// spawns the worker. All later UI effects flow through the binding as
    /// the returned handle's events are drained.
    pub fn execute(self) -> RunningTask {
        let Self {
            binding,
            max,
            step_interval,
        } = self;

        info!(binding = binding.label(), max, "starting countdown task");
        binding.with_screen(|screen| screen.set_indicator_visible(true));

        let (event_tx, events) = bounded(EVENT_QUEUE_CAPACITY);
        let worker = thread::spawn(move || {
            for (index, percent) in progress_percentages(max).enumerate() {
                debug!(step = index + 1, percent, "countdown step");
                // The foreground receiver may already be gone; the
                // countdown keeps running either way.
                let _ = event_tx.send(TaskEvent::Progress(percent));
                thread::sleep(step_interval);
            }
            let _ = event_tx.send(TaskEvent::Finished(FINISHED_RESULT.to_string()));
        });

        RunningTask {
            binding,
            events,
            worker,
            finished: false,
        }
    }
}

/// Handle to an executing countdown, held by the foreground thread.
///
/// Dropping the handle releases its binding, and with it any owning
/// reference to the screen. The worker itself is never cancelled; it runs
/// to natural completion and its unreceived events are discarded.
pub struct RunningTask {
    binding: ScreenBinding,
    events: Receiver<TaskEvent>,
    worker: JoinHandle<()>,
    finished: bool,
}

impl RunningTask {
    /// Applies every event the worker has produced so far without
    /// blocking. Returns true once the final result has been applied.
    pub fn pump(&mut self) -> bool {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.apply(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.finished
    }

    /// Blocks for the next event, applies it, and returns it. `None` once
    /// the worker has hung up.
    pub fn next_event(&mut self) -> Option<TaskEvent> {
        let event = self.events.recv().ok()?;
        self.apply(event.clone());
        Some(event)
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Waits for the worker thread to exit.
    pub fn join(self) -> Result<(), TaskError> {
        let Self { worker, .. } = self;
        worker.join().map_err(|_| TaskError::WorkerPanicked)
    }

    fn apply(&mut self, event: TaskEvent) {
        match event {
            TaskEvent::Progress(percent) => {
                self.binding
                    .with_screen(|screen| screen.set_progress(percent));
            }
            TaskEvent::Finished(result) => {
                info!(binding = self.binding.label(), result = %result, "countdown finished");
                self.binding.with_screen(|screen| {
                    screen.show_notice(result);
                    screen.set_progress(0);
                    screen.set_indicator_visible(false);
                });
                self.finished = true;
            }
        }
    }
}
