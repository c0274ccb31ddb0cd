//! Owning and weak back-references from a running task to its screen.

use std::sync::{Arc, Weak};

use crate::screen::ScreenState;

/// How a background task reaches back to the screen that launched it.
///
/// The caller picks the variant at the construction site, so the ownership
/// consequence is visible where the task is created. An [`Owning`] binding
/// keeps the screen alive for as long as the task handle exists; a
/// [`Weak`] binding re-resolves the screen before every use and lets it be
/// reclaimed at any time.
///
/// [`Owning`]: ScreenBinding::Owning
/// [`Weak`]: ScreenBinding::Weak
pub enum ScreenBinding {
    /// Holds the screen alive for the task's whole run. This is the leak
    /// under demonstration: every dereference is unconditional and the
    /// screen's `finishing` state is never consulted.
    Owning(Arc<ScreenState>),
    /// Non-owning back-reference, upgraded and liveness-checked at each
    /// use.
    Weak(Weak<ScreenState>),
}

impl ScreenBinding {
    pub fn owning(screen: &Arc<ScreenState>) -> Self {
        Self::Owning(Arc::clone(screen))
    }

    pub fn weak(screen: &Arc<ScreenState>) -> Self {
        Self::Weak(Arc::downgrade(screen))
    }

    /// Runs `apply` against the screen if this binding can and should
    /// reach it.
    ///
    /// Owning bindings always apply. Weak bindings skip silently when the
    /// screen has been reclaimed or reports that it is tearing down; the
    /// skipped update is dropped, never retried.
    pub fn with_screen(&self, apply: impl FnOnce(&ScreenState)) {
        match self {
            Self::Owning(screen) => apply(screen),
            Self::Weak(weak) => match weak.upgrade() {
                Some(screen) if !screen.is_finishing() => apply(&screen),
                Some(_) => {
                    tracing::debug!("screen is tearing down; dropping ui update");
                }
                None => {
                    tracing::debug!("screen already reclaimed; dropping ui update");
                }
            },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Owning(_) => "owning",
            Self::Weak(_) => "weak",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::ScreenBinding;
    use crate::screen::ScreenState;

    #[test]
    fn weak_binding_applies_while_screen_is_live() {
        let screen = Arc::new(ScreenState::new());
        let binding = ScreenBinding::weak(&screen);

        binding.with_screen(|screen| screen.set_progress(30));
        assert_eq!(screen.snapshot().progress, 30);
    }

    #[test]
    fn weak_binding_skips_once_screen_is_reclaimed() {
        let screen = Arc::new(ScreenState::new());
        let binding = ScreenBinding::weak(&screen);
        drop(screen);

        let mut applied = false;
        binding.with_screen(|_| applied = true);
        assert!(!applied);
    }

    #[test]
    fn weak_binding_skips_while_screen_is_finishing() {
        let screen = Arc::new(ScreenState::new());
        let binding = ScreenBinding::weak(&screen);
        screen.begin_teardown();

        binding.with_screen(|screen| screen.set_progress(70));
        assert_eq!(screen.snapshot().progress, 0);
    }

    #[test]
    fn owning_binding_never_consults_the_teardown_marker() {
        let screen = Arc::new(ScreenState::new());
        let binding = ScreenBinding::owning(&screen);
        screen.begin_teardown();

        binding.with_screen(|screen| screen.set_progress(70));
        assert_eq!(screen.snapshot().progress, 70);
    }

    #[test]
    fn owning_binding_keeps_screen_alive_after_last_outside_owner_drops() {
        let screen = Arc::new(ScreenState::new());
        let probe = Arc::downgrade(&screen);
        let binding = ScreenBinding::owning(&screen);
        drop(screen);

        // The binding alone retains the allocation and can still mutate it.
        assert!(probe.upgrade().is_some());
        binding.with_screen(|screen| screen.set_progress(90));
        assert_eq!(probe.upgrade().map(|screen| screen.snapshot().progress), Some(90));

        drop(binding);
        assert!(probe.upgrade().is_none());
    }
}
