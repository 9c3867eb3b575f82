//! **waybar-autohide** — hides the status bar while a window covers it.
//!
//! The daemon polls the compositor at a fixed interval.  When a visible
//! window reaches into the bar's band at the top of the screen the bar is
//! hidden; pushing the cursor against the top edge brings it back, and it
//! stays up while the cursor remains over it.
//!
//! # Architecture
//!
//! The decision engine is pure and compositor-agnostic:
//!
//! * [`snapshot`] — the monitor / client / workspace / cursor values read
//!   each tick.
//! * [`geometry`] — the window-overlap and cursor-proximity predicates.
//! * [`state`] — the two-state [`VisibilityState`](state::VisibilityState)
//!   machine.
//! * [`driver`] — the [`AutoHider`](driver::AutoHider) poll loop.
//!
//! It reaches the outside world through two traits in [`traits`]:
//! [`Compositor`](traits::Compositor), implemented over Hyprland IPC in
//! [`hyprland`], and [`BarControl`](traits::BarControl), implemented by
//! signalling the bar process in [`waybar`].

pub mod config;
pub mod driver;
pub mod geometry;
pub mod hyprland;
pub mod snapshot;
pub mod state;
pub mod traits;
pub mod waybar;
