//! Compositor state types shared by every component.
//!
//! A [`Snapshot`] is a point-in-time read of monitors, clients, active
//! workspaces and the cursor.  It is captured once per tick through the
//! [`Compositor`] trait and dropped right after evaluation.

use crate::traits::Compositor;

/// A workspace as reported by the compositor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub id: i64,
    pub name: String,
}

/// A monitor rectangle in global desktop coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monitor {
    pub id: i64,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Monitor {
    /// Whether `point` lies inside this monitor.
    ///
    /// Both edges are inclusive, so a point on the seam between two
    /// adjacent monitors belongs to both.
    pub fn contains(&self, point: CursorPosition) -> bool {
        let end_x = self.x.saturating_add(self.width);
        let end_y = self.y.saturating_add(self.height);
        (self.x..=end_x).contains(&point.x) && (self.y..=end_y).contains(&point.y)
    }
}

/// A window known to the compositor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    /// Opaque compositor handle (e.g. `"0x55d1c0a3b2f0"`).
    pub address: String,
    pub mapped: bool,
    pub hidden: bool,
    /// Fullscreen mode; `0` means not fullscreen.
    pub fullscreen: i32,
    /// Top-left corner `(x, y)`.
    pub position: (i32, i32),
    /// `(width, height)`.
    pub size: (i32, i32),
    pub workspace: Workspace,
    /// Id of the [`Monitor`] the client lives on.
    pub monitor: i64,
}

/// Cursor location in global desktop coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub x: i32,
    pub y: i32,
}

/// Everything the evaluators need for one tick.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub monitors: Vec<Monitor>,
    /// Active workspace id of every monitor.
    pub active_workspaces: Vec<i64>,
    pub clients: Vec<Client>,
    pub cursor: CursorPosition,
}

impl Snapshot {
    /// Query all four pieces of state from `compositor`.
    pub fn capture<C: Compositor>(compositor: &C) -> Result<Self, C::Error> {
        Ok(Self {
            monitors: compositor.monitors()?,
            active_workspaces: compositor.active_workspace_ids()?,
            clients: compositor.clients()?,
            cursor: compositor.cursor_position()?,
        })
    }
}
