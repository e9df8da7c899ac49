//! Mock collaborators for testing without a game or renderer
//!
//! Both mocks share their log through `Arc<RwLock<..>>`, so a clone handed to a
//! pad or widget can be observed through the clone kept by the test.
//!
//! # Usage
//!
//! ```
//! use vpad_input::mock::{MockSink, SinkEvent};
//! use vpad_input::{ButtonIdentity, ButtonPad, PointerEvent};
//!
//! let sink = MockSink::new();
//! let mut pad = ButtonPad::new(sink.clone());
//! let jump = pad.add_button("jump", ButtonIdentity::action("Jump")).unwrap();
//!
//! pad.dispatch(PointerEvent::Down(jump));
//! assert_eq!(sink.events(), vec![SinkEvent::Press("Jump".into())]);
//! ```

use crate::sink::{InputSink, VisualFeedback};
use std::sync::{Arc, RwLock};

/// A signal observed by [`MockSink`]
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Press(String),
    Release(String),
    Axis(f32, f32),
}

/// Recording input sink
#[derive(Debug, Clone, Default)]
pub struct MockSink {
    log: Arc<RwLock<Vec<SinkEvent>>>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, in emission order
    pub fn events(&self) -> Vec<SinkEvent> {
        self.log.read().map(|log| log.clone()).unwrap_or_default()
    }

    /// Drain the log
    pub fn take(&self) -> Vec<SinkEvent> {
        self.log
            .write()
            .map(|mut log| std::mem::take(&mut *log))
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut log) = self.log.write() {
            log.clear();
        }
    }

    /// Last axis value asserted, `(0.0, 0.0)` if none
    pub fn last_axis(&self) -> (f32, f32) {
        self.log
            .read()
            .ok()
            .and_then(|log| {
                log.iter().rev().find_map(|e| match e {
                    SinkEvent::Axis(x, y) => Some((*x, *y)),
                    _ => None,
                })
            })
            .unwrap_or((0.0, 0.0))
    }

    fn record(&self, event: SinkEvent) {
        if let Ok(mut log) = self.log.write() {
            log.push(event);
        }
    }
}

impl InputSink for MockSink {
    fn press(&mut self, token: &str) {
        self.record(SinkEvent::Press(token.to_string()));
    }

    fn release(&mut self, token: &str) {
        self.record(SinkEvent::Release(token.to_string()));
    }

    fn set_directional_axis(&mut self, x: f32, y: f32) {
        self.record(SinkEvent::Axis(x, y));
    }
}

/// Recording visual toggle
#[derive(Debug, Clone, Default)]
pub struct MockFeedback {
    history: Arc<RwLock<Vec<bool>>>,
}

impl MockFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every toggle received, in order
    pub fn history(&self) -> Vec<bool> {
        self.history.read().map(|h| h.clone()).unwrap_or_default()
    }

    /// Whether the button is currently drawn pressed
    pub fn is_lit(&self) -> bool {
        self.history
            .read()
            .map(|h| h.last().copied().unwrap_or(false))
            .unwrap_or(false)
    }
}

impl VisualFeedback for MockFeedback {
    fn set_pressed_visual(&mut self, pressed: bool) {
        if let Ok(mut history) = self.history.write() {
            history.push(pressed);
        }
    }
}
