//! Bar visibility state machine.
//!
//! Two states, one pure transition function.  The
//! [`AutoHider`](crate::driver::AutoHider) owns the single live value and
//! is responsible for acting on changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether the bar is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityState {
    #[default]
    Visible,
    Hidden,
}

impl VisibilityState {
    /// Compute the next state.
    ///
    /// Precedence, highest first:
    ///
    /// 1. cursor approaching the bar → `Visible`
    /// 2. a window overlapping the bar → `Hidden`
    /// 3. otherwise → `Visible`
    ///
    /// `cursor_approaches` must have been computed against `self`, not
    /// against the candidate next state.
    pub fn next(self, cursor_approaches: bool, window_overlaps: bool) -> Self {
        if cursor_approaches {
            VisibilityState::Visible
        } else if window_overlaps {
            VisibilityState::Hidden
        } else {
            VisibilityState::Visible
        }
    }
}

impl fmt::Display for VisibilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisibilityState::Visible => write!(f, "visible"),
            VisibilityState::Hidden => write!(f, "hidden"),
        }
    }
}

/// Error returned when a string does not name a [`VisibilityState`].
#[derive(Debug, thiserror::Error)]
#[error("invalid visibility state: {0:?} (expected 1/visible or 0/hidden)")]
pub struct ParseStateError(String);

impl FromStr for VisibilityState {
    type Err = ParseStateError;

    /// Accepts `"1"` / `"visible"` and `"0"` / `"hidden"`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "visible" => Ok(VisibilityState::Visible),
            "0" | "hidden" => Ok(VisibilityState::Hidden),
            _ => Err(ParseStateError(s.to_string())),
        }
    }
}
