//! Gesture scripts
//!
//! A script is a list of contact samples and ticks, replayed through a
//! [`PointerRouter`] into a [`ButtonPad`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use vpad_input::{ButtonPad, InputSink, Point, PointerRouter};

/// One scripted step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    Cancel,
    Tick {
        #[serde(default = "default_ticks")]
        count: u32,
    },
}

fn default_ticks() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureScript {
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl GestureScript {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Invalid script {}", path.display()))
    }

    /// Slide left to right on the d-pad, slide off into empty space, then tap jump.
    /// Coordinates match the default layout.
    pub fn builtin() -> Self {
        Self {
            steps: vec![
                Step::Down { x: 40.0, y: 272.0 },
                Step::Tick { count: 2 },
                Step::Move { x: 136.0, y: 272.0 },
                Step::Tick { count: 2 },
                Step::Move { x: 300.0, y: 100.0 },
                Step::Up { x: 300.0, y: 100.0 },
                Step::Down { x: 592.0, y: 296.0 },
                Step::Up { x: 592.0, y: 296.0 },
            ],
        }
    }
}

/// Replay `script`, returning the simulated time spent ticking
pub fn replay<S: InputSink>(
    script: &GestureScript,
    pad: &mut ButtonPad<S>,
    router: &mut PointerRouter,
    tick_interval: Duration,
) -> Duration {
    let mut elapsed = Duration::ZERO;

    for step in &script.steps {
        let events = match *step {
            Step::Down { x, y } => router.contact_down(Point::new(x, y)),
            Step::Move { x, y } => router.contact_move(Point::new(x, y)),
            Step::Up { x, y } => router.contact_up(Point::new(x, y)),
            Step::Cancel => router.contact_cancel(),
            Step::Tick { count } => {
                for _ in 0..count {
                    pad.tick();
                    elapsed += tick_interval;
                }
                debug!("t={:?}", elapsed);
                continue;
            }
        };

        debug!("{:?} -> {:?}", step, events);
        pad.dispatch_all(events);
    }

    elapsed
}
