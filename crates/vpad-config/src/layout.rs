//! Button layout configuration
//!
//! Each `[[buttons]]` entry names a button, says what it means and where it
//! sits on screen.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use vpad_input::{ButtonIdentity, Region};

use crate::ConfigError;

/// One on-screen button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonConfig {
    /// Unique button name
    pub name: String,
    /// `kind = "action"` with `token`, or `kind = "directional"` with `dx`/`dy`
    #[serde(flatten)]
    pub identity: ButtonIdentity,
    /// Drive a visual toggle for this button
    #[serde(default = "default_true")]
    pub feedback: bool,
    /// Hit region in screen coordinates
    pub region: Region,
}

fn default_true() -> bool {
    true
}

impl ButtonConfig {
    pub fn action(name: &str, token: &str, region: Region) -> Self {
        Self {
            name: name.to_string(),
            identity: ButtonIdentity::action(token),
            feedback: true,
            region,
        }
    }

    pub fn directional(name: &str, dx: f32, dy: f32, region: Region) -> Self {
        Self {
            name: name.to_string(),
            identity: ButtonIdentity::directional(dx, dy),
            feedback: true,
            region,
        }
    }
}

/// Default layout: a four-way d-pad on the left, Jump and Attack on the right
/// of a 640x360 reference screen
pub fn default_buttons() -> Vec<ButtonConfig> {
    vec![
        ButtonConfig::directional("left", -1.0, 0.0, Region::new(16.0, 248.0, 48.0, 48.0)),
        ButtonConfig::directional("right", 1.0, 0.0, Region::new(112.0, 248.0, 48.0, 48.0)),
        ButtonConfig::directional("up", 0.0, 1.0, Region::new(64.0, 200.0, 48.0, 48.0)),
        ButtonConfig::directional("down", 0.0, -1.0, Region::new(64.0, 296.0, 48.0, 48.0)),
        ButtonConfig::action("jump", "Jump", Region::new(560.0, 264.0, 64.0, 64.0)),
        ButtonConfig::action("attack", "Attack", Region::new(480.0, 280.0, 64.0, 64.0)),
    ]
}

/// Reject layouts the pad cannot use; log the merely odd ones
pub fn validate_buttons(buttons: &[ButtonConfig], axis_epsilon: f32) -> Result<(), ConfigError> {
    let mut names = HashSet::new();

    for button in buttons {
        if button.name.is_empty() {
            return Err(ConfigError::Invalid("button with empty name".to_string()));
        }
        if !names.insert(button.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "duplicate button name: {}",
                button.name
            )));
        }
        if !button.identity.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "button {} has a non-finite direction",
                button.name
            )));
        }
        if !button.region.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "button {} has an empty or non-finite region",
                button.name
            )));
        }

        match &button.identity {
            ButtonIdentity::Action { token } if token.is_empty() => {
                tracing::warn!("Button {} has an empty token and will not reach the game", button.name);
            }
            ButtonIdentity::Directional { .. } if !button.identity.is_near_unit(axis_epsilon) => {
                tracing::warn!("Button {} direction is not unit length", button.name);
            }
            _ => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::capture_warnings;

    #[test]
    fn test_default_layout_is_valid() {
        let buttons = default_buttons();
        assert_eq!(buttons.len(), 6);
        assert!(validate_buttons(&buttons, 0.05).is_ok());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut buttons = default_buttons();
        buttons.push(ButtonConfig::action("jump", "Jump2", Region::new(0.0, 0.0, 1.0, 1.0)));
        let err = validate_buttons(&buttons, 0.05).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_empty_region_rejected() {
        let buttons = vec![ButtonConfig::action("a", "A", Region::new(0.0, 0.0, 0.0, 10.0))];
        assert!(validate_buttons(&buttons, 0.05).is_err());
    }

    #[test]
    fn test_degenerate_entries_allowed() {
        let buttons = vec![
            ButtonConfig::action("inert", "", Region::new(0.0, 0.0, 10.0, 10.0)),
            ButtonConfig::directional("still", 0.0, 0.0, Region::new(10.0, 0.0, 10.0, 10.0)),
        ];
        let (result, logs) = capture_warnings(|| validate_buttons(&buttons, 0.05));
        assert!(result.is_ok());
        assert!(logs.contains("Button inert has an empty token"));
        assert!(logs.contains("Button still direction is not unit length"));
    }

    #[test]
    fn test_default_layout_logs_nothing() {
        let buttons = default_buttons();
        let (result, logs) = capture_warnings(|| validate_buttons(&buttons, 0.05));
        assert!(result.is_ok());
        assert!(logs.is_empty(), "unexpected warnings: {}", logs);
    }

    #[test]
    fn test_parse_button_table() {
        let button: ButtonConfig = toml::from_str(
            r#"
name = "left"
kind = "directional"
dx = -1
dy = 0
region = { x = 0, y = 0, width = 48, height = 48 }
"#,
        )
        .unwrap();
        assert_eq!(button.identity, ButtonIdentity::directional(-1.0, 0.0));
        assert!(button.feedback);
        assert_eq!(button.region.width, 48.0);
    }
}
