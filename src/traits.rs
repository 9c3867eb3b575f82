//! Core traits that decouple the decision engine from any specific
//! compositor or bar.
//!
//! The [`AutoHider`](crate::driver::AutoHider) only depends on these
//! abstractions; concrete backends live in [`hyprland`](crate::hyprland)
//! and [`waybar`](crate::waybar), and tests plug in recorders.

use crate::snapshot::{Client, CursorPosition, Monitor};

/// Read-only view of the compositor's state.
///
/// Each call is a fresh query; implementations must not cache between
/// calls.
pub trait Compositor {
    /// The error type produced by this compositor.
    type Error: std::error::Error + Send + 'static;

    /// All monitors with their global rectangles.
    fn monitors(&self) -> Result<Vec<Monitor>, Self::Error>;

    /// All windows, mapped or not.
    fn clients(&self) -> Result<Vec<Client>, Self::Error>;

    /// The active workspace id of each monitor.
    fn active_workspace_ids(&self) -> Result<Vec<i64>, Self::Error>;

    /// Current cursor position in global coordinates.
    fn cursor_position(&self) -> Result<CursorPosition, Self::Error>;
}

/// Control over the bar process.
pub trait BarControl {
    /// The error type produced by this bar.
    type Error: std::error::Error + Send + 'static;

    /// Whether at least one bar process is alive.
    fn is_running(&self) -> Result<bool, Self::Error>;

    /// Flip the bar between shown and hidden.
    ///
    /// Fire-and-forget: there is no way to learn which state the bar
    /// ended up in.
    fn toggle(&self) -> Result<(), Self::Error>;
}
