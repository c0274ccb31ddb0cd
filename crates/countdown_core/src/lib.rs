//! Screen-controller state and the countdown task engine for the desktop
//! demo: a screen exposes mutable UI fields, a background task counts to a
//! bound on a worker thread, and a [`ScreenBinding`] decides whether the
//! task's UI updates keep the screen alive (owning) or silently stop once
//! the screen is gone (weak).

pub mod binding;
pub mod screen;
pub mod task;

pub use binding::ScreenBinding;
pub use screen::{CompletionNotice, ScreenSnapshot, ScreenState};
pub use task::{CountdownTask, RunningTask, TaskError, TaskEvent, DEFAULT_STEP_INTERVAL};
