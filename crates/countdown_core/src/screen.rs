//! Mutable UI state for the single demo screen.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Visible state owned by the screen controller, shared as
/// `Arc<ScreenState>`.
///
/// Only the foreground thread mutates these fields; task bindings reach
/// them through shared references, so they live behind a small
/// interior-mutability cell. The `finishing` flag is the teardown marker
/// that weak bindings consult before touching anything else.
pub struct ScreenState {
    ui: Mutex<UiFields>,
    finishing: AtomicBool,
}

struct UiFields {
    progress: u8,
    indicator_visible: bool,
    notice: Option<CompletionNotice>,
}

/// Transient notification shown when a countdown completes.
#[derive(Debug, Clone)]
pub struct CompletionNotice {
    pub text: String,
    pub shown_at: Instant,
}

/// Point-in-time copy of the screen's visible state, taken once per frame
/// for rendering.
#[derive(Debug, Clone)]
pub struct ScreenSnapshot {
    pub progress: u8,
    pub indicator_visible: bool,
    pub notice: Option<CompletionNotice>,
}

impl ScreenState {
    pub fn new() -> Self {
        Self {
            ui: Mutex::new(UiFields {
                progress: 0,
                indicator_visible: false,
                notice: None,
            }),
            finishing: AtomicBool::new(false),
        }
    }

    fn ui(&self) -> MutexGuard<'_, UiFields> {
        self.ui.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_progress(&self, percent: u8) {
        self.ui().progress = percent.min(100);
    }

    pub fn set_indicator_visible(&self, visible: bool) {
        self.ui().indicator_visible = visible;
    }

    pub fn show_notice(&self, text: impl Into<String>) {
        self.ui().notice = Some(CompletionNotice {
            text: text.into(),
            shown_at: Instant::now(),
        });
    }

    pub fn dismiss_notice(&self) {
        self.ui().notice = None;
    }

    pub fn snapshot(&self) -> ScreenSnapshot {
        let ui = self.ui();
        ScreenSnapshot {
            progress: ui.progress,
            indicator_visible: ui.indicator_visible,
            notice: ui.notice.clone(),
        }
    }

    /// Marks the screen as tearing down. Weak bindings stop applying UI
    /// updates from this point on, even while the allocation is still
    /// reachable.
    pub fn begin_teardown(&self) {
        self.finishing.store(true, Ordering::Release);
    }

    pub fn is_finishing(&self) -> bool {
        self.finishing.load(Ordering::Acquire)
    }
}

impl Default for ScreenState {
    fn default() -> Self {
        Self::new()
    }
}
