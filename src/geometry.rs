//! Pure predicates deciding whether the bar is covered or wanted.
//!
//! Nothing here talks to the compositor; every function works on values
//! taken from a [`Snapshot`](crate::snapshot::Snapshot) plus the
//! [`Config`].  The bar is assumed to span the full width of the top edge,
//! so only vertical extents are compared.

use crate::config::Config;
use crate::snapshot::{Client, CursorPosition, Monitor};
use crate::state::VisibilityState;

/// Whether `client` intrudes into the bar's band.
///
/// The band is `[0, bar_height + height_threshold)`.  Unmapped, hidden
/// and fullscreen clients never count, nor do clients on monitors outside
/// the allow-list or on workspaces that are not currently shown.
pub fn overlaps(client: &Client, active_workspaces: &[i64], config: &Config) -> bool {
    if !client.mapped || client.hidden || client.fullscreen != 0 {
        return false;
    }
    if !config.allows_monitor(client.monitor) {
        return false;
    }
    if !active_workspaces.contains(&client.workspace.id) {
        return false;
    }

    let (_, y) = client.position;
    let (_, h) = client.size;
    y < config.band_bottom() && y.saturating_add(h) > 0
}

/// Whether any client overlaps the bar.  Stops at the first hit.
pub fn window_overlaps_bar(
    clients: &[Client],
    active_workspaces: &[i64],
    config: &Config,
) -> bool {
    clients
        .iter()
        .any(|c| overlaps(c, active_workspaces, config))
}

/// Id of the first monitor containing `cursor`.
pub fn monitor_at(monitors: &[Monitor], cursor: CursorPosition) -> Option<i64> {
    monitors.iter().find(|m| m.contains(cursor)).map(|m| m.id)
}

/// Whether the cursor is close enough to the top edge to reveal the bar.
///
/// While the bar is visible the cursor keeps it open anywhere within the
/// bar's height; while hidden only the very top row (`y <= 0`) counts.
/// A cursor outside every monitor, or on a monitor without the bar, never
/// approaches.
pub fn cursor_approaches_bar(
    cursor: CursorPosition,
    monitors: &[Monitor],
    current: VisibilityState,
    config: &Config,
) -> bool {
    let Some(monitor) = monitor_at(monitors, cursor) else {
        return false;
    };
    if !config.allows_monitor(monitor) {
        return false;
    }

    let offset = match current {
        VisibilityState::Visible => config.bar_height,
        VisibilityState::Hidden => 0,
    };
    cursor.y <= offset
}
