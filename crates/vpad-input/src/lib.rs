//! Virtual button dispatch
//!
//! On-screen touch controls for a 2D action game: d-pad segments and action
//! buttons that turn pointer gestures into press/release and directional axis
//! signals for the game's input layer.
//!
//! At most one button is pressed at any time. Sliding the contact from one
//! button into another hands the press over without lifting: the old button is
//! fully released before the new one presses.
//!
//! # Example
//!
//! ```
//! use vpad_input::{ButtonIdentity, ButtonPad, Point, PointerRouter, Region, TracingSink};
//!
//! let mut pad = ButtonPad::new(TracingSink::new());
//! let mut router = PointerRouter::new();
//!
//! let left = pad.add_button("left", ButtonIdentity::directional(-1.0, 0.0)).unwrap();
//! let right = pad.add_button("right", ButtonIdentity::directional(1.0, 0.0)).unwrap();
//! router.set_region(left, Region::new(0.0, 0.0, 64.0, 64.0));
//! router.set_region(right, Region::new(64.0, 0.0, 64.0, 64.0));
//!
//! pad.dispatch_all(router.contact_down(Point::new(10.0, 10.0)));
//! pad.dispatch_all(router.contact_move(Point::new(80.0, 10.0)));
//! assert_eq!(pad.current(), Some(right));
//! assert_eq!(pad.sink().axis(), (1.0, 0.0));
//! ```

pub mod arbiter;
pub mod identity;
pub mod mock;
pub mod pad;
pub mod router;
pub mod sink;
pub mod widget;

pub use arbiter::{PressArbiter, WidgetId};
pub use identity::ButtonIdentity;
pub use pad::{ButtonPad, PadError, PointerEvent};
pub use router::{Point, PointerRouter, Region};
pub use sink::{InputSink, TracingSink, VisualFeedback};
pub use widget::{Dispatch, VirtualButton};

/// Pad Result type
pub type Result<T> = std::result::Result<T, PadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<ButtonPad<TracingSink>>();
        assert_send::<ButtonPad<mock::MockSink>>();
    }
}
