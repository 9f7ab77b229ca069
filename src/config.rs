// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::CameraBackendType;
use crate::constants::{DEFAULT_DEVICE_PATH, display, timing};
use crate::controls::SliderValues;
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::error;

/// Deployment profile
///
/// Bundles the values that differ between a desktop webcam and a small
/// embedded board such as a Raspberry Pi with a camera module.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize, clap::ValueEnum,
)]
pub enum Profile {
    /// Desktop webcam: lazy startup, native-size preview
    #[default]
    Desktop,
    /// Embedded board: refuse to start without a camera, small fixed preview
    Embedded,
}

/// What to do when no camera backend opens at startup
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StartupPolicy {
    /// Print a diagnostic and exit with status 1
    Strict,
    /// Start anyway; every tick finds no frame
    Lazy,
}

/// Per-profile behaviour
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileSettings {
    pub startup: StartupPolicy,
    pub tick_interval: Duration,
    /// Fixed preview size, `None` shows frames at native size
    pub display_size: Option<(u32, u32)>,
    /// Show a black frame when a tick reads nothing
    pub placeholder_on_miss: bool,
    pub slider_defaults: SliderValues,
}

impl Profile {
    pub fn settings(&self) -> ProfileSettings {
        match self {
            Profile::Desktop => ProfileSettings {
                startup: StartupPolicy::Lazy,
                tick_interval: Duration::from_millis(timing::DESKTOP_TICK_MS),
                display_size: None,
                placeholder_on_miss: false,
                slider_defaults: SliderValues {
                    brightness: 255.0,
                    contrast: 92.0,
                    exposure: -1.9,
                },
            },
            Profile::Embedded => ProfileSettings {
                startup: StartupPolicy::Strict,
                tick_interval: Duration::from_millis(timing::EMBEDDED_TICK_MS),
                display_size: Some((display::EMBEDDED_WIDTH, display::EMBEDDED_HEIGHT)),
                placeholder_on_miss: true,
                slider_defaults: SliderValues {
                    brightness: 128.0,
                    contrast: 32.0,
                    exposure: -4.0,
                },
            },
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Profile::Desktop => write!(f, "desktop"),
            Profile::Embedded => write!(f, "embedded"),
        }
    }
}

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Deployment profile
    pub profile: Profile,
    /// Camera backends in open order
    pub backends: Vec<CameraBackendType>,
    /// Device node used for V4L2 source and controls
    pub device_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            backends: CameraBackendType::DEFAULT_ORDER.to_vec(),
            device_path: DEFAULT_DEVICE_PATH.to_string(),
        }
    }
}

impl Config {
    /// Load the persisted configuration, falling back to defaults
    pub fn load(app_id: &str) -> Self {
        match cosmic_config::Config::new(app_id, Self::VERSION) {
            Ok(handler) => match Self::get_entry(&handler) {
                Ok(config) => config,
                Err((errors, config)) => {
                    error!(?errors, "Errors loading config");
                    config
                }
            },
            Err(err) => {
                error!(%err, "Failed to create config handler");
                Self::default()
            }
        }
    }

    /// Apply per-run overrides from the command line
    pub fn with_overrides(
        mut self,
        profile: Option<Profile>,
        backends: &[CameraBackendType],
        device_path: Option<&str>,
    ) -> Self {
        if let Some(profile) = profile {
            self.profile = profile;
        }
        if !backends.is_empty() {
            self.backends = backends.to_vec();
        }
        if let Some(device_path) = device_path {
            self.device_path = device_path.to_string();
        }
        self
    }

    pub fn profile_settings(&self) -> ProfileSettings {
        self.profile.settings()
    }
}
