//! Entry point for the **waybar-autohide** daemon.
//!
//! Builds the configuration, checks that Hyprland and the bar are
//! reachable and then polls forever.

use log::{error, info};
use std::path::PathBuf;
use waybar_autohide::config::{self, Config};
use waybar_autohide::driver::AutoHider;
use waybar_autohide::hyprland::compositor::HyprlandCompositor;
use waybar_autohide::waybar::SignalBar;

/// Resolve the config directory (`$XDG_CONFIG_HOME/waybar-autohide`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("waybar-autohide")
}

/// Defaults, then the JSON file, then the environment.
fn load_config() -> Result<Config, config::ConfigError> {
    let explicit = config::config_arg(std::env::args().skip(1));
    config::resolve(
        explicit.as_deref(),
        &config_dir().join("config.json"),
        |key| std::env::var(key).ok(),
    )
}

fn main() {
    env_logger::init();

    let config = match load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!(
        "bar height {}px (+{}px threshold), monitors: {}",
        config.bar_height,
        config.height_threshold,
        if config.monitors.is_empty() {
            "all".to_string()
        } else {
            format!("{:?}", config.monitors)
        }
    );

    let bar = SignalBar::new(config.process_name.clone());
    let mut hider = AutoHider::new(HyprlandCompositor::new(), bar, config);

    if let Err(e) = hider.preflight() {
        error!("{}", e);
        std::process::exit(1);
    }

    hider.run();
}
