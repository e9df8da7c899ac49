//! Exclusive press arbitration
//!
//! The arbiter records which single widget currently owns the press. It never
//! touches widgets itself: widgets claim the slot when they press and give it
//! back when they release.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Handle to a widget registered with a [`crate::ButtonPad`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WidgetId(pub usize);

impl WidgetId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Single source of truth for "who is pressed"
///
/// The slot is a non-owning reference: the widget may already be gone by
/// the time somebody asks, callers must tolerate that.
#[derive(Debug, Default)]
pub struct PressArbiter {
    active: Option<WidgetId>,
    stale_claims: u64,
}

impl PressArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `widget` as the press owner.
    ///
    /// The previous owner must already have released. If it hasn't, the
    /// anomaly is logged and counted; the previous widget is left alone.
    pub fn claim(&mut self, widget: WidgetId) {
        if let Some(prev) = self.active
            && prev != widget
        {
            warn!("press claimed by {} while {} still holds it", widget, prev);
            self.stale_claims += 1;
        }
        debug!("arbiter: {} claims press", widget);
        self.active = Some(widget);
    }

    /// Clear the slot if `widget` holds it. Returns true if the slot was cleared.
    ///
    /// Stale or duplicate releases are silent no-ops.
    pub fn release(&mut self, widget: WidgetId) -> bool {
        if self.active == Some(widget) {
            debug!("arbiter: {} gives up press", widget);
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Current press owner
    pub fn current(&self) -> Option<WidgetId> {
        self.active
    }

    pub fn is_held_by(&self, widget: WidgetId) -> bool {
        self.active == Some(widget)
    }

    /// Number of claims that arrived while another widget still held the slot
    pub fn stale_claims(&self) -> u64 {
        self.stale_claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_and_release() {
        let mut arbiter = PressArbiter::new();
        assert_eq!(arbiter.current(), None);

        arbiter.claim(WidgetId(1));
        assert_eq!(arbiter.current(), Some(WidgetId(1)));
        assert!(arbiter.is_held_by(WidgetId(1)));

        assert!(arbiter.release(WidgetId(1)));
        assert_eq!(arbiter.current(), None);
    }

    #[test]
    fn test_release_by_non_holder_is_noop() {
        let mut arbiter = PressArbiter::new();
        arbiter.claim(WidgetId(1));

        assert!(!arbiter.release(WidgetId(2)));
        assert_eq!(arbiter.current(), Some(WidgetId(1)));

        assert!(arbiter.release(WidgetId(1)));
        assert!(!arbiter.release(WidgetId(1)));
    }

    #[test]
    fn test_stale_claim_is_flagged() {
        let mut arbiter = PressArbiter::new();
        arbiter.claim(WidgetId(1));
        arbiter.claim(WidgetId(1));
        assert_eq!(arbiter.stale_claims(), 0);

        arbiter.claim(WidgetId(2));
        assert_eq!(arbiter.stale_claims(), 1);
        assert_eq!(arbiter.current(), Some(WidgetId(2)));
    }

    #[test]
    fn test_widget_id_display() {
        assert_eq!(WidgetId(3).to_string(), "#3");
    }
}
