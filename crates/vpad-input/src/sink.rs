//! Collaborator ports
//!
//! The dispatch core never talks to the game or the renderer directly. Signals
//! go out through an [`InputSink`]; cosmetic state goes out through an optional
//! [`VisualFeedback`] handle per button.

use tracing::info;

/// Receiver of logical button signals (the input aggregation layer)
///
/// Calls are fire-and-forget and must not block.
pub trait InputSink {
    /// An action button went down
    fn press(&mut self, token: &str);

    /// An action button went up
    fn release(&mut self, token: &str);

    /// Assert the directional axis. `(0.0, 0.0)` hands the axis back to
    /// whatever fallback source the aggregation layer polls.
    fn set_directional_axis(&mut self, x: f32, y: f32);
}

impl<T: InputSink + ?Sized> InputSink for &mut T {
    fn press(&mut self, token: &str) {
        (**self).press(token);
    }

    fn release(&mut self, token: &str) {
        (**self).release(token);
    }

    fn set_directional_axis(&mut self, x: f32, y: f32) {
        (**self).set_directional_axis(x, y);
    }
}

impl<T: InputSink + ?Sized> InputSink for Box<T> {
    fn press(&mut self, token: &str) {
        (**self).press(token);
    }

    fn release(&mut self, token: &str) {
        (**self).release(token);
    }

    fn set_directional_axis(&mut self, x: f32, y: f32) {
        (**self).set_directional_axis(x, y);
    }
}

/// Per-button cosmetic toggle, invoked whenever the logical press state changes
pub trait VisualFeedback: Send {
    fn set_pressed_visual(&mut self, pressed: bool);
}

/// Sink that logs every signal and keeps the last asserted axis
#[derive(Debug, Default)]
pub struct TracingSink {
    axis: (f32, f32),
    held: Vec<String>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last asserted axis value
    pub fn axis(&self) -> (f32, f32) {
        self.axis
    }

    /// Action tokens currently held down
    pub fn held(&self) -> &[String] {
        &self.held
    }
}

impl InputSink for TracingSink {
    fn press(&mut self, token: &str) {
        info!("press {}", token);
        if !self.held.iter().any(|t| t == token) {
            self.held.push(token.to_string());
        }
    }

    fn release(&mut self, token: &str) {
        info!("release {}", token);
        self.held.retain(|t| t != token);
    }

    fn set_directional_axis(&mut self, x: f32, y: f32) {
        if self.axis != (x, y) {
            info!("axis ({}, {})", x, y);
        }
        self.axis = (x, y);
    }
}
