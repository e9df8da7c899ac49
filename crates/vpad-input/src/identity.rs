//! Button identities
//!
//! What a virtual button means to the game: a named action or a direction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic payload of a virtual button
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ButtonIdentity {
    /// Named action forwarded to the sink as press/release.
    /// An empty token is accepted but never reaches the sink.
    Action { token: String },
    /// Direction asserted on the sink's axis while held
    Directional { dx: f32, dy: f32 },
}

impl ButtonIdentity {
    pub fn action(token: impl Into<String>) -> Self {
        ButtonIdentity::Action {
            token: token.into(),
        }
    }

    pub fn directional(dx: f32, dy: f32) -> Self {
        ButtonIdentity::Directional { dx, dy }
    }

    /// Check if this identity drives the directional axis
    pub fn is_directional(&self) -> bool {
        matches!(self, ButtonIdentity::Directional { .. })
    }

    /// Action token, if any. Empty tokens are reported as `None`.
    pub fn token(&self) -> Option<&str> {
        match self {
            ButtonIdentity::Action { token } if !token.is_empty() => Some(token),
            _ => None,
        }
    }

    /// Direction vector, if any
    pub fn direction(&self) -> Option<(f32, f32)> {
        match self {
            ButtonIdentity::Directional { dx, dy } => Some((*dx, *dy)),
            ButtonIdentity::Action { .. } => None,
        }
    }

    /// Identities that would poison the sink (NaN or infinite axes) are invalid.
    /// Empty tokens and zero vectors are degenerate but valid.
    pub fn is_valid(&self) -> bool {
        match self {
            ButtonIdentity::Action { .. } => true,
            ButtonIdentity::Directional { dx, dy } => dx.is_finite() && dy.is_finite(),
        }
    }

    /// Check if a directional vector is within `epsilon` of unit length
    pub fn is_near_unit(&self, epsilon: f32) -> bool {
        match self {
            ButtonIdentity::Directional { dx, dy } => {
                ((dx * dx + dy * dy).sqrt() - 1.0).abs() <= epsilon
            }
            ButtonIdentity::Action { .. } => true,
        }
    }
}

impl fmt::Display for ButtonIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ButtonIdentity::Action { token } => write!(f, "action({:?})", token),
            ButtonIdentity::Directional { dx, dy } => write!(f, "dir({}, {})", dx, dy),
        }
    }
}
