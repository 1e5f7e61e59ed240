// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::bus;
use crate::mirror::MirrorStepPolicy;
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::error;

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow system theme (dark or light based on system setting)
    #[default]
    System,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl AppTheme {
    pub const ALL: [AppTheme; 3] = [AppTheme::System, AppTheme::Dark, AppTheme::Light];

    /// Get the COSMIC theme for this app theme preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::System => "System",
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Host prefix completed with the robot id for physical robots
    pub bus_host_prefix: String,
    /// Bus port
    pub bus_port: u16,
    /// Screenshot directory; `None` uses `~/vision_calib/screenshots`
    pub screenshot_dir: Option<PathBuf>,
    /// How a step that does not divide the maximum distance is treated
    pub mirror_step_policy: MirrorStepPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            bus_host_prefix: bus::ROBOT_HOST_PREFIX.to_string(),
            bus_port: bus::DEFAULT_PORT,
            screenshot_dir: None,
            mirror_step_policy: MirrorStepPolicy::default(),
        }
    }
}

impl Config {
    /// Open the config store of `app_id`, falling back to defaults
    pub fn load(app_id: &str) -> (Option<cosmic_config::Config>, Config) {
        match cosmic_config::Config::new(app_id, Self::VERSION) {
            Ok(handler) => {
                let config = match Self::get_entry(&handler) {
                    Ok(config) => config,
                    Err((errors, config)) => {
                        error!(?errors, "Errors loading config");
                        config
                    }
                };
                (Some(handler), config)
            }
            Err(err) => {
                error!(%err, "Failed to create config handler");
                (None, Config::default())
            }
        }
    }

    pub fn screenshot_dir(&self) -> PathBuf {
        self.screenshot_dir
            .clone()
            .unwrap_or_else(crate::storage::default_screenshot_dir)
    }
}
