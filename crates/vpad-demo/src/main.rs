//! vpad demo
//!
//! Loads a touch-control layout, replays a gesture script through it and logs
//! every signal the game would receive.
//!
//! Usage: `vpad-demo [layout.toml] [script.toml]`
//!
//! Without a layout the system/user configuration (or the built-in default) is
//! used; without a script the built-in slide-and-tap gesture is replayed.

mod script;

use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, Registry, reload};
use vpad_config::PadConfig;
use vpad_input::{
    ButtonPad, InputSink, PadError, PointerRouter, TracingSink, VirtualButton, VisualFeedback,
};

use script::GestureScript;

/// Visual toggle that only logs; the demo has nothing to draw
struct LogFeedback {
    name: String,
}

impl VisualFeedback for LogFeedback {
    fn set_pressed_visual(&mut self, pressed: bool) {
        debug!("[{}] {}", self.name, if pressed { "lit" } else { "dim" });
    }
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

fn main() -> Result<()> {
    let log_handle = setup_logging();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match args.first() {
        Some(path) => PadConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load layout {}", path))?,
        None => PadConfig::load_default().context("Failed to load layout")?,
    };

    if let Some(handle) = &log_handle {
        apply_log_level(handle, &config.dispatch.log_level);
    }

    let gesture = match args.get(1) {
        Some(path) => GestureScript::load(Path::new(path))?,
        None => GestureScript::builtin(),
    };

    let (mut pad, mut router) = build_pad(&config, TracingSink::new())?;
    info!(
        "Layout ready: {} buttons, {} steps to replay",
        pad.len(),
        gesture.steps.len()
    );

    let elapsed = script::replay(
        &gesture,
        &mut pad,
        &mut router,
        config.dispatch.tick_interval(),
    );

    let pressed = pad.pressed();
    if pressed.len() > 1 {
        bail!("more than one button pressed: {:?}", pressed);
    }

    let holder = pad
        .current()
        .and_then(|id| pad.widget(id))
        .map(|w| w.name().to_string());
    info!(
        "Replay finished after {:?} of ticks: holder={:?} axis={:?} held={:?}",
        elapsed,
        holder,
        pad.sink().axis(),
        pad.sink().held()
    );
    if pad.arbiter().stale_claims() > 0 {
        info!("Stale arbiter claims: {}", pad.arbiter().stale_claims());
    }

    Ok(())
}

/// Setup logging to console.
///
/// `RUST_LOG` wins when set. Otherwise logging starts at `info` and the returned
/// handle lets the layout's level replace it once the layout is loaded.
fn setup_logging() -> Option<FilterHandle> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let (filter, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new("info"), false),
    };
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();

    (!from_env).then_some(handle)
}

/// Swap the active filter for the layout's configured level
fn apply_log_level(handle: &FilterHandle, level: &str) -> bool {
    let filter = match EnvFilter::try_new(level) {
        Ok(filter) => filter,
        Err(e) => {
            warn!("Invalid log level {:?} in layout, keeping info: {}", level, e);
            return false;
        }
    };
    match handle.reload(filter) {
        Ok(()) => {
            debug!("Log level set to {}", level);
            true
        }
        Err(e) => {
            warn!("Failed to apply log level {}: {}", level, e);
            false
        }
    }
}

/// Register every configured button with a pad and its region with a router
fn build_pad<S: InputSink>(
    config: &PadConfig,
    sink: S,
) -> Result<(ButtonPad<S>, PointerRouter), PadError> {
    let mut pad = ButtonPad::new(sink);
    let mut router = PointerRouter::new();

    for button in &config.buttons {
        let mut widget = VirtualButton::new(&button.name, button.identity.clone());
        if button.feedback {
            widget = widget.with_feedback(Box::new(LogFeedback {
                name: button.name.clone(),
            }));
        }
        let id = pad.add(widget)?;
        router.set_region(id, button.region);
    }

    Ok((pad, router))
}
