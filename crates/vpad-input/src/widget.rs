//! Virtual button widget
//!
//! One on-screen button. The widget owns its local pressed flag and reacts to
//! pointer events; everything shared between buttons goes through the
//! [`PressArbiter`] carried in a [`Dispatch`] context.
//!
//! Down and enter need the current press holder alongside the target, so only
//! [`ButtonPad`](crate::ButtonPad) can deliver them:
//!
//! ```compile_fail
//! use vpad_input::mock::MockSink;
//! use vpad_input::{ButtonIdentity, Dispatch, PressArbiter, VirtualButton, WidgetId};
//!
//! let mut arbiter = PressArbiter::new();
//! let mut sink = MockSink::new();
//! let mut jump = VirtualButton::new("jump", ButtonIdentity::action("Jump"));
//! let mut ctx = Dispatch { arbiter: &mut arbiter, sink: &mut sink };
//! jump.on_pointer_down(WidgetId(0), None, &mut ctx);
//! ```

use crate::arbiter::{PressArbiter, WidgetId};
use crate::identity::ButtonIdentity;
use crate::sink::{InputSink, VisualFeedback};
use std::fmt;
use tracing::{debug, warn};

/// Shared state a widget needs while handling an event
pub struct Dispatch<'a> {
    pub arbiter: &'a mut PressArbiter,
    pub sink: &'a mut dyn InputSink,
}

/// A single on-screen button
pub struct VirtualButton {
    name: String,
    identity: ButtonIdentity,
    pressed: bool,
    active: bool,
    feedback: Option<Box<dyn VisualFeedback>>,
}

impl fmt::Debug for VirtualButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualButton")
            .field("name", &self.name)
            .field("identity", &self.identity)
            .field("pressed", &self.pressed)
            .field("active", &self.active)
            .field("feedback", &self.feedback.is_some())
            .finish()
    }
}

impl VirtualButton {
    pub fn new(name: impl Into<String>, identity: ButtonIdentity) -> Self {
        Self {
            name: name.into(),
            identity,
            pressed: false,
            active: true,
            feedback: None,
        }
    }

    /// Attach a cosmetic toggle handle
    pub fn with_feedback(mut self, feedback: Box<dyn VisualFeedback>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identity(&self) -> &ButtonIdentity {
        &self.identity
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Inactive widgets are hidden and ignore pointer events
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn has_feedback(&self) -> bool {
        self.feedback.is_some()
    }

    /// Contact went down on this widget.
    ///
    /// With a single contact another widget can only still hold the press if
    /// its up was lost; it is released before this widget presses. `holder` is
    /// that widget, or `None` when it no longer exists.
    pub(crate) fn on_pointer_down(
        &mut self,
        id: WidgetId,
        holder: Option<&mut VirtualButton>,
        ctx: &mut Dispatch<'_>,
    ) -> bool {
        if !self.active {
            return false;
        }
        if let Some(owner) = ctx.arbiter.current()
            && owner != id
        {
            debug!("{} pressed while {} holds the press", self.name, owner);
            release_holder(owner, holder, ctx);
        }
        self.press(id, ctx)
    }

    pub fn on_pointer_up(&mut self, id: WidgetId, ctx: &mut Dispatch<'_>) -> bool {
        self.release(id, ctx)
    }

    /// Drag-to-slide handoff.
    ///
    /// `holder` is the widget the arbiter currently names, when it is not this
    /// one, or `None` when that widget no longer exists. Its release is fully applied before this widget presses, so the pad
    /// passes through "nobody pressed" and never through "two pressed".
    pub(crate) fn on_pointer_enter(
        &mut self,
        id: WidgetId,
        holder: Option<&mut VirtualButton>,
        ctx: &mut Dispatch<'_>,
    ) -> bool {
        if !self.active {
            return false;
        }

        let Some(owner) = ctx.arbiter.current() else {
            debug!("{} entered with no press in flight", self.name);
            return false;
        };
        if owner == id {
            debug!("{} entered while already holding the press", self.name);
            return false;
        }

        debug!("handoff {} -> {}", owner, self.name);
        release_holder(owner, holder, ctx);
        self.press(id, ctx)
    }

    /// Pointer left this widget's region.
    ///
    /// When the pointer went straight into another registered widget, that
    /// widget's enter handler performs the transfer and nothing happens here.
    pub fn on_pointer_exit(
        &mut self,
        id: WidgetId,
        still_inside_another_widget: bool,
        ctx: &mut Dispatch<'_>,
    ) -> bool {
        if still_inside_another_widget {
            return false;
        }
        self.release(id, ctx)
    }

    /// Re-assert a held direction; axis consumers may reset to neutral each poll
    pub fn tick(&self, sink: &mut dyn InputSink) {
        if !self.pressed {
            return;
        }
        if let ButtonIdentity::Directional { dx, dy } = self.identity {
            sink.set_directional_axis(dx, dy);
        }
    }

    /// Hide the widget. A held press is released first.
    pub fn on_deactivate(&mut self, id: WidgetId, ctx: &mut Dispatch<'_>) -> bool {
        let released = self.release(id, ctx);
        self.active = false;
        released
    }

    pub fn on_activate(&mut self) {
        self.active = true;
    }

    pub(crate) fn press(&mut self, id: WidgetId, ctx: &mut Dispatch<'_>) -> bool {
        if self.pressed {
            return false;
        }

        self.pressed = true;
        ctx.arbiter.claim(id);

        match &self.identity {
            ButtonIdentity::Action { token } if token.is_empty() => {
                debug!("{} pressed with empty token", self.name);
            }
            ButtonIdentity::Action { token } => ctx.sink.press(token),
            ButtonIdentity::Directional { dx, dy } => ctx.sink.set_directional_axis(*dx, *dy),
        }

        if let Some(feedback) = self.feedback.as_mut() {
            feedback.set_pressed_visual(true);
        }
        true
    }

    pub(crate) fn release(&mut self, id: WidgetId, ctx: &mut Dispatch<'_>) -> bool {
        if !self.pressed {
            return false;
        }

        self.pressed = false;
        ctx.arbiter.release(id);

        match &self.identity {
            ButtonIdentity::Action { token } if token.is_empty() => {
                debug!("{} released with empty token", self.name);
            }
            ButtonIdentity::Action { token } => ctx.sink.release(token),
            // Zero explicitly so a fallback axis source can take over
            ButtonIdentity::Directional { .. } => ctx.sink.set_directional_axis(0.0, 0.0),
        }

        if let Some(feedback) = self.feedback.as_mut() {
            feedback.set_pressed_visual(false);
        }
        true
    }
}

/// Release the widget the arbiter names. A holder that no longer exists
/// only has its slot cleared.
fn release_holder(owner: WidgetId, holder: Option<&mut VirtualButton>, ctx: &mut Dispatch<'_>) {
    match holder {
        Some(prev) => {
            prev.release(owner, ctx);
        }
        None => {
            warn!("press holder {} is gone, clearing slot", owner);
            ctx.arbiter.release(owner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockFeedback, MockSink, SinkEvent};

    fn ctx<'a>(arbiter: &'a mut PressArbiter, sink: &'a mut MockSink) -> Dispatch<'a> {
        Dispatch { arbiter, sink }
    }

    #[test]
    fn test_press_is_idempotent() {
        let mut arbiter = PressArbiter::new();
        let mut sink = MockSink::new();
        let mut jump = VirtualButton::new("jump", ButtonIdentity::action("Jump"));

        let mut c = ctx(&mut arbiter, &mut sink);
        assert!(jump.on_pointer_down(WidgetId(0), None, &mut c));
        assert!(!jump.on_pointer_down(WidgetId(0), None, &mut c));

        assert_eq!(sink.events(), vec![SinkEvent::Press("Jump".into())]);
        assert_eq!(arbiter.current(), Some(WidgetId(0)));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut arbiter = PressArbiter::new();
        let mut sink = MockSink::new();
        let mut jump = VirtualButton::new("jump", ButtonIdentity::action("Jump"));

        let mut c = ctx(&mut arbiter, &mut sink);
        assert!(!jump.on_pointer_up(WidgetId(0), &mut c));
        jump.on_pointer_down(WidgetId(0), None, &mut c);
        assert!(jump.on_pointer_up(WidgetId(0), &mut c));
        assert!(!jump.on_pointer_up(WidgetId(0), &mut c));

        assert_eq!(
            sink.events(),
            vec![
                SinkEvent::Press("Jump".into()),
                SinkEvent::Release("Jump".into())
            ]
        );
        assert_eq!(arbiter.current(), None);
    }

    #[test]
    fn test_empty_token_tracks_state_only() {
        let mut arbiter = PressArbiter::new();
        let mut sink = MockSink::new();
        let mut inert = VirtualButton::new("inert", ButtonIdentity::action(""));

        let mut c = ctx(&mut arbiter, &mut sink);
        assert!(inert.on_pointer_down(WidgetId(4), None, &mut c));
        assert!(inert.is_pressed());
        assert_eq!(c.arbiter.current(), Some(WidgetId(4)));
        assert!(inert.on_pointer_up(WidgetId(4), &mut c));

        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_directional_release_zeroes_axis_once() {
        let mut arbiter = PressArbiter::new();
        let mut sink = MockSink::new();
        let mut left = VirtualButton::new("left", ButtonIdentity::directional(-1.0, 0.0));

        let mut c = ctx(&mut arbiter, &mut sink);
        left.on_pointer_down(WidgetId(0), None, &mut c);
        left.on_pointer_up(WidgetId(0), &mut c);
        left.on_pointer_up(WidgetId(0), &mut c);

        assert_eq!(
            sink.events(),
            vec![SinkEvent::Axis(-1.0, 0.0), SinkEvent::Axis(0.0, 0.0)]
        );
    }

    #[test]
    fn test_tick_reasserts_held_direction() {
        let mut arbiter = PressArbiter::new();
        let mut sink = MockSink::new();
        let mut up = VirtualButton::new("up", ButtonIdentity::directional(0.0, 1.0));
        let jump = VirtualButton::new("jump", ButtonIdentity::action("Jump"));

        up.tick(&mut sink);
        assert!(sink.events().is_empty());

        up.on_pointer_down(WidgetId(0), None, &mut ctx(&mut arbiter, &mut sink));
        up.tick(&mut sink);
        up.tick(&mut sink);
        jump.tick(&mut sink);

        assert_eq!(sink.events(), vec![SinkEvent::Axis(0.0, 1.0); 3]);
    }

    #[test]
    fn test_handoff_releases_holder_first() {
        let mut arbiter = PressArbiter::new();
        let mut sink = MockSink::new();
        let mut a = VirtualButton::new("a", ButtonIdentity::action("A"));
        let mut b = VirtualButton::new("b", ButtonIdentity::action("B"));

        let mut c = ctx(&mut arbiter, &mut sink);
        a.on_pointer_down(WidgetId(0), None, &mut c);
        assert!(b.on_pointer_enter(WidgetId(1), Some(&mut a), &mut c));

        assert!(!a.is_pressed());
        assert!(b.is_pressed());
        assert_eq!(arbiter.current(), Some(WidgetId(1)));
        assert_eq!(arbiter.stale_claims(), 0);
        assert_eq!(
            sink.events(),
            vec![
                SinkEvent::Press("A".into()),
                SinkEvent::Release("A".into()),
                SinkEvent::Press("B".into())
            ]
        );
    }

    #[test]
    fn test_down_releases_stale_holder() {
        let mut arbiter = PressArbiter::new();
        let mut sink = MockSink::new();
        let mut left = VirtualButton::new("left", ButtonIdentity::directional(-1.0, 0.0));
        let mut jump = VirtualButton::new("jump", ButtonIdentity::action("Jump"));

        let mut c = ctx(&mut arbiter, &mut sink);
        left.on_pointer_down(WidgetId(0), None, &mut c);
        assert!(jump.on_pointer_down(WidgetId(1), Some(&mut left), &mut c));

        assert!(!left.is_pressed());
        assert_eq!(arbiter.current(), Some(WidgetId(1)));
        assert_eq!(
            sink.events(),
            vec![
                SinkEvent::Axis(-1.0, 0.0),
                SinkEvent::Axis(0.0, 0.0),
                SinkEvent::Press("Jump".into())
            ]
        );
    }

    #[test]
    fn test_enter_with_missing_holder_clears_slot() {
        let mut arbiter = PressArbiter::new();
        let mut sink = MockSink::new();
        let mut b = VirtualButton::new("b", ButtonIdentity::action("B"));

        arbiter.claim(WidgetId(7));
        assert!(b.on_pointer_enter(WidgetId(1), None, &mut ctx(&mut arbiter, &mut sink)));
        assert_eq!(arbiter.current(), Some(WidgetId(1)));
        assert_eq!(arbiter.stale_claims(), 0);
    }

    #[test]
    fn test_enter_without_press_in_flight_is_noop() {
        let mut arbiter = PressArbiter::new();
        let mut sink = MockSink::new();
        let mut b = VirtualButton::new("b", ButtonIdentity::action("B"));

        assert!(!b.on_pointer_enter(WidgetId(1), None, &mut ctx(&mut arbiter, &mut sink)));
        assert!(!b.is_pressed());
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_enter_while_self_active_is_noop() {
        let mut arbiter = PressArbiter::new();
        let mut sink = MockSink::new();
        let mut b = VirtualButton::new("b", ButtonIdentity::action("B"));

        let mut c = ctx(&mut arbiter, &mut sink);
        b.on_pointer_down(WidgetId(1), None, &mut c);
        assert!(!b.on_pointer_enter(WidgetId(1), None, &mut c));
        assert!(b.is_pressed());
        assert_eq!(sink.events(), vec![SinkEvent::Press("B".into())]);
    }

    #[test]
    fn test_exit_into_other_widget_does_not_release() {
        let mut arbiter = PressArbiter::new();
        let mut sink = MockSink::new();
        let mut a = VirtualButton::new("a", ButtonIdentity::action("A"));

        let mut c = ctx(&mut arbiter, &mut sink);
        a.on_pointer_down(WidgetId(0), None, &mut c);
        assert!(!a.on_pointer_exit(WidgetId(0), true, &mut c));
        assert!(a.is_pressed());
        assert!(a.on_pointer_exit(WidgetId(0), false, &mut c));
        assert!(!a.is_pressed());
    }

    #[test]
    fn test_feedback_follows_logical_state() {
        let mut arbiter = PressArbiter::new();
        let mut sink = MockSink::new();
        let feedback = MockFeedback::new();
        let mut a = VirtualButton::new("a", ButtonIdentity::action("A"))
            .with_feedback(Box::new(feedback.clone()));

        let mut c = ctx(&mut arbiter, &mut sink);
        a.on_pointer_down(WidgetId(0), None, &mut c);
        a.on_pointer_down(WidgetId(0), None, &mut c);
        a.on_pointer_up(WidgetId(0), &mut c);

        assert_eq!(feedback.history(), vec![true, false]);
        assert!(!feedback.is_lit());
    }

    #[test]
    fn test_deactivate_releases_and_ignores_events() {
        let mut arbiter = PressArbiter::new();
        let mut sink = MockSink::new();
        let mut left = VirtualButton::new("left", ButtonIdentity::directional(-1.0, 0.0));

        let mut c = ctx(&mut arbiter, &mut sink);
        left.on_pointer_down(WidgetId(0), None, &mut c);
        assert!(left.on_deactivate(WidgetId(0), &mut c));
        assert!(!left.is_active());
        assert!(!left.on_pointer_down(WidgetId(0), None, &mut c));

        left.on_activate();
        assert!(left.on_pointer_down(WidgetId(0), None, &mut c));

        assert_eq!(
            sink.events(),
            vec![
                SinkEvent::Axis(-1.0, 0.0),
                SinkEvent::Axis(0.0, 0.0),
                SinkEvent::Axis(-1.0, 0.0)
            ]
        );
    }
}
