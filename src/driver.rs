//! The poll loop that ties the compositor, the evaluators and the bar
//! together.
//!
//! [`AutoHider`] owns the authoritative [`VisibilityState`].  Every tick it
//! captures a fresh [`Snapshot`], asks the [`geometry`] predicates what is
//! going on, feeds the answers to [`VisibilityState::next`] and toggles the
//! bar only when the state actually changes.

use crate::config::Config;
use crate::geometry;
use crate::snapshot::Snapshot;
use crate::state::VisibilityState;
use crate::traits::{BarControl, Compositor};
use log::{debug, info, warn};

/// Possible errors from the driver.
#[derive(Debug, thiserror::Error)]
pub enum AutoHideError {
    /// The compositor could not be queried.
    #[error("compositor error: {0}")]
    Compositor(String),
    /// The bar could not be probed.
    #[error("bar error: {0}")]
    Bar(String),
    /// No bar process was found during preflight.
    #[error("bar process {0:?} is not running")]
    BarNotRunning(String),
}

/// Drives bar visibility from compositor state.
///
/// Generic over [`Compositor`] and [`BarControl`], so tests can run it
/// against synthetic desktops.
///
/// ```ignore
/// let mut hider = AutoHider::new(HyprlandCompositor::new(), SignalBar::new("waybar"), config);
/// hider.preflight()?;
/// hider.run();
/// ```
pub struct AutoHider<C: Compositor, B: BarControl> {
    compositor: C,
    bar: B,
    config: Config,
    state: VisibilityState,
}

impl<C: Compositor, B: BarControl> AutoHider<C, B> {
    /// Create a driver starting in `config.initial_state`.
    pub fn new(compositor: C, bar: B, config: Config) -> Self {
        let state = config.initial_state;
        Self {
            compositor,
            bar,
            config,
            state,
        }
    }

    /// Current visibility state.
    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// Check that both collaborators are reachable before entering the
    /// loop.
    pub fn preflight(&self) -> Result<(), AutoHideError> {
        let monitors = self
            .compositor
            .monitors()
            .map_err(|e| AutoHideError::Compositor(e.to_string()))?;
        info!("compositor reachable, {} monitor(s)", monitors.len());

        let running = self
            .bar
            .is_running()
            .map_err(|e| AutoHideError::Bar(e.to_string()))?;
        if !running {
            return Err(AutoHideError::BarNotRunning(self.config.process_name.clone()));
        }
        Ok(())
    }

    /// Run one decision cycle.
    ///
    /// Returns `true` if the bar was toggled.  A failed toggle is logged
    /// and the new state is committed anyway; the next tick re-derives
    /// everything from a fresh snapshot.
    pub fn tick(&mut self) -> Result<bool, AutoHideError> {
        let snapshot = Snapshot::capture(&self.compositor)
            .map_err(|e| AutoHideError::Compositor(e.to_string()))?;
        Ok(self.apply(&snapshot))
    }

    /// Evaluate `snapshot` against the current state and toggle on change.
    pub fn apply(&mut self, snapshot: &Snapshot) -> bool {
        let cursor_approaches = geometry::cursor_approaches_bar(
            snapshot.cursor,
            &snapshot.monitors,
            self.state,
            &self.config,
        );
        let window_overlaps = geometry::window_overlaps_bar(
            &snapshot.clients,
            &snapshot.active_workspaces,
            &self.config,
        );

        let next = self.state.next(cursor_approaches, window_overlaps);
        debug!(
            "cursor_approaches={} window_overlaps={} state={} -> {}",
            cursor_approaches, window_overlaps, self.state, next
        );
        if next == self.state {
            return false;
        }

        info!("bar {} -> {}", self.state, next);
        if let Err(e) = self.bar.toggle() {
            warn!("failed to toggle bar: {}", e);
        }
        self.state = next;
        true
    }

    /// Poll forever at the configured interval.
    pub fn run(&mut self) -> ! {
        let interval = self.config.refresh_interval();
        info!("polling every {:?}, bar starts {}", interval, self.state);
        loop {
            if let Err(e) = self.tick() {
                warn!("skipping tick: {}", e);
            }
            std::thread::sleep(interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Client, CursorPosition, Monitor, Workspace};
    use std::cell::{Cell, RefCell};

    //  Test doubles

    /// A compositor whose state the test mutates between ticks.
    #[derive(Debug)]
    struct FakeDesktop {
        monitors: Vec<Monitor>,
        active: Vec<i64>,
        clients: RefCell<Vec<Client>>,
        cursor: Cell<CursorPosition>,
        offline: Cell<bool>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("fake desktop offline")]
    struct Offline;

    impl FakeDesktop {
        fn new() -> Self {
            Self {
                monitors: vec![
                    Monitor {
                        id: 0,
                        x: 0,
                        y: 0,
                        width: 2560,
                        height: 1440,
                    },
                    Monitor {
                        id: 1,
                        x: 2560,
                        y: 0,
                        width: 1920,
                        height: 1080,
                    },
                ],
                active: vec![1, 2],
                clients: RefCell::new(Vec::new()),
                cursor: Cell::new(CursorPosition { x: 1280, y: 720 }),
                offline: Cell::new(false),
            }
        }

        fn check(&self) -> Result<(), Offline> {
            if self.offline.get() {
                Err(Offline)
            } else {
                Ok(())
            }
        }
    }

    impl Compositor for FakeDesktop {
        type Error = Offline;

        fn monitors(&self) -> Result<Vec<Monitor>, Offline> {
            self.check()?;
            Ok(self.monitors.clone())
        }

        fn clients(&self) -> Result<Vec<Client>, Offline> {
            self.check()?;
            Ok(self.clients.borrow().clone())
        }

        fn active_workspace_ids(&self) -> Result<Vec<i64>, Offline> {
            self.check()?;
            Ok(self.active.clone())
        }

        fn cursor_position(&self) -> Result<CursorPosition, Offline> {
            self.check()?;
            Ok(self.cursor.get())
        }
    }

    /// A bar that counts toggles and can be told to fail.
    #[derive(Debug, Default)]
    struct RecorderBar {
        toggles: Cell<usize>,
        failing: Cell<bool>,
        absent: bool,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("recorder bar error")]
    struct RecorderErr;

    impl BarControl for RecorderBar {
        type Error = RecorderErr;

        fn is_running(&self) -> Result<bool, RecorderErr> {
            Ok(!self.absent)
        }

        fn toggle(&self) -> Result<(), RecorderErr> {
            self.toggles.set(self.toggles.get() + 1);
            if self.failing.get() {
                Err(RecorderErr)
            } else {
                Ok(())
            }
        }
    }

    fn window(y: i32, h: i32, monitor: i64, workspace: i64) -> Client {
        Client {
            address: format!("0x{:x}", 0x1000 + y),
            mapped: true,
            hidden: false,
            fullscreen: 0,
            position: (0, y),
            size: (1000, h),
            workspace: Workspace {
                id: workspace,
                name: workspace.to_string(),
            },
            monitor,
        }
    }

    fn make_hider(config: Config) -> AutoHider<FakeDesktop, RecorderBar> {
        AutoHider::new(FakeDesktop::new(), RecorderBar::default(), config)
    }

    //  Lifecycle

    #[test]
    fn starts_in_configured_state() {
        let h = make_hider(Config {
            initial_state: VisibilityState::Hidden,
            ..Config::default()
        });
        assert_eq!(h.state(), VisibilityState::Hidden);
        assert_eq!(h.bar.toggles.get(), 0);
    }

    #[test]
    fn preflight_passes_when_everything_is_up() {
        assert!(make_hider(Config::default()).preflight().is_ok());
    }

    #[test]
    fn preflight_fails_without_compositor() {
        let h = make_hider(Config::default());
        h.compositor.offline.set(true);
        assert!(matches!(h.preflight(), Err(AutoHideError::Compositor(_))));
    }

    #[test]
    fn preflight_fails_without_bar() {
        let bar = RecorderBar {
            absent: true,
            ..RecorderBar::default()
        };
        let h = AutoHider::new(FakeDesktop::new(), bar, Config::default());
        assert!(matches!(h.preflight(), Err(AutoHideError::BarNotRunning(name)) if name == "waybar"));
    }

    //  Ticks

    #[test]
    fn quiet_desktop_never_toggles() {
        let mut h = make_hider(Config::default());
        for _ in 0..10 {
            assert!(!h.tick().unwrap());
        }
        assert_eq!(h.state(), VisibilityState::Visible);
        assert_eq!(h.bar.toggles.get(), 0);
    }

    #[test]
    fn overlapping_window_hides_once() {
        let mut h = make_hider(Config::default());
        h.compositor.clients.borrow_mut().push(window(10, 30, 0, 1));

        assert!(h.tick().unwrap());
        assert_eq!(h.state(), VisibilityState::Hidden);
        assert_eq!(h.bar.toggles.get(), 1);

        // Unchanged decision on later ticks must not re-toggle.
        for _ in 0..5 {
            assert!(!h.tick().unwrap());
        }
        assert_eq!(h.bar.toggles.get(), 1);
    }

    #[test]
    fn window_leaving_reveals_bar() {
        let mut h = make_hider(Config::default());
        h.compositor.clients.borrow_mut().push(window(10, 30, 0, 1));
        h.tick().unwrap();

        h.compositor.clients.borrow_mut().clear();
        assert!(h.tick().unwrap());
        assert_eq!(h.state(), VisibilityState::Visible);
        assert_eq!(h.bar.toggles.get(), 2);
    }

    #[test]
    fn cursor_at_top_reveals_then_holds_within_bar() {
        let mut h = make_hider(Config::default());
        h.compositor.clients.borrow_mut().push(window(10, 30, 0, 1));
        h.tick().unwrap();
        assert_eq!(h.state(), VisibilityState::Hidden);

        // Near the top but not on the edge: stays hidden.
        h.compositor.cursor.set(CursorPosition { x: 500, y: 5 });
        assert!(!h.tick().unwrap());
        assert_eq!(h.state(), VisibilityState::Hidden);

        // Touching the edge reveals despite the overlapping window.
        h.compositor.cursor.set(CursorPosition { x: 500, y: 0 });
        assert!(h.tick().unwrap());
        assert_eq!(h.state(), VisibilityState::Visible);

        // Moving down inside the bar keeps it open.
        h.compositor.cursor.set(CursorPosition { x: 500, y: 50 });
        assert!(!h.tick().unwrap());
        assert_eq!(h.state(), VisibilityState::Visible);

        // Leaving the bar hides it again.
        h.compositor.cursor.set(CursorPosition { x: 500, y: 51 });
        assert!(h.tick().unwrap());
        assert_eq!(h.state(), VisibilityState::Hidden);
        assert_eq!(h.bar.toggles.get(), 3);
    }

    #[test]
    fn window_on_excluded_monitor_is_ignored() {
        let mut h = make_hider(Config {
            monitors: vec![1],
            ..Config::default()
        });
        h.compositor.clients.borrow_mut().push(window(10, 30, 0, 1));
        assert!(!h.tick().unwrap());
        assert_eq!(h.state(), VisibilityState::Visible);
    }

    #[test]
    fn window_on_background_workspace_is_ignored() {
        let mut h = make_hider(Config::default());
        h.compositor.clients.borrow_mut().push(window(10, 30, 0, 5));
        assert!(!h.tick().unwrap());
        assert_eq!(h.bar.toggles.get(), 0);
    }

    #[test]
    fn failed_toggle_still_commits_state() {
        let mut h = make_hider(Config::default());
        h.bar.failing.set(true);
        h.compositor.clients.borrow_mut().push(window(10, 30, 0, 1));

        assert!(h.tick().unwrap());
        assert_eq!(h.state(), VisibilityState::Hidden);
        assert!(!h.tick().unwrap());
        assert_eq!(h.bar.toggles.get(), 1);
    }

    #[test]
    fn offline_compositor_leaves_state_alone() {
        let mut h = make_hider(Config::default());
        h.compositor.offline.set(true);
        assert!(matches!(h.tick(), Err(AutoHideError::Compositor(_))));
        assert_eq!(h.state(), VisibilityState::Visible);
        assert_eq!(h.bar.toggles.get(), 0);
    }

    #[test]
    fn hidden_start_with_clear_desktop_reveals() {
        let mut h = make_hider(Config {
            initial_state: VisibilityState::Hidden,
            ..Config::default()
        });
        assert!(h.tick().unwrap());
        assert_eq!(h.state(), VisibilityState::Visible);
        assert_eq!(h.bar.toggles.get(), 1);
    }
}
