// crates/worldmap-core/src/deferred.rs

//! "Wait until visible, then run once", as an explicit state machine.
//!
//! ```text
//!   Pending ──visible──▶ Initialized
//!      │  ▲                  │
//!      └──┘ hidden           └── any signal: stays Initialized
//! ```
//!
//! There is exactly one transition, so initialization can never run twice.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitState {
    #[default]
    Pending,
    Initialized,
}

#[derive(Debug, Default)]
pub struct DeferredInit {
    state: InitState,
}

impl DeferredInit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InitState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == InitState::Pending
    }

    /// Feeds a visibility signal. Returns `true` exactly once: on the first
    /// visible signal while pending.
    pub fn on_visibility(&mut self, visible: bool) -> bool {
        match (self.state, visible) {
            (InitState::Pending, true) => {
                self.state = InitState::Initialized;
                true
            }
            _ => false,
        }
    }

    /// Takes the transition without a visibility signal (eager mode).
    pub fn force(&mut self) -> bool {
        self.on_visibility(true)
    }
}

/// Handle on whatever watches the host view's visibility (an
/// `IntersectionObserver` in a browser).
pub trait VisibilityObserver {
    /// Stops delivering signals. Must tolerate repeated calls.
    fn disconnect(&mut self);
}

impl<T: VisibilityObserver + ?Sized> VisibilityObserver for Box<T> {
    fn disconnect(&mut self) {
        (**self).disconnect()
    }
}

/// Observer for hosts that have nothing to disconnect.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoObserver;

impl VisibilityObserver for NoObserver {
    fn disconnect(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_first_visible_signal_fires() {
        let mut d = DeferredInit::new();
        assert!(!d.on_visibility(false));
        assert!(d.is_pending());
        assert!(d.on_visibility(true));
        assert_eq!(d.state(), InitState::Initialized);
        assert!(!d.on_visibility(true));
        assert!(!d.on_visibility(false));
        assert!(!d.force());
    }
}
