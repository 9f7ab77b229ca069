// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use snapcam::backends::camera::CameraBackendType;
use snapcam::config::{Config, Profile, StartupPolicy};
use snapcam::constants::DEFAULT_DEVICE_PATH;
use std::time::Duration;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.profile, Profile::Desktop);
    assert_eq!(config.backends, CameraBackendType::DEFAULT_ORDER.to_vec());
    assert_eq!(config.device_path, DEFAULT_DEVICE_PATH);
}

#[test]
fn test_overrides_replace_values() {
    let config = Config::default().with_overrides(
        Some(Profile::Embedded),
        &[CameraBackendType::Libcamera, CameraBackendType::Auto],
        Some("/dev/video2"),
    );

    assert_eq!(config.profile, Profile::Embedded);
    assert_eq!(
        config.backends,
        vec![CameraBackendType::Libcamera, CameraBackendType::Auto]
    );
    assert_eq!(config.device_path, "/dev/video2");
}

#[test]
fn test_empty_overrides_keep_values() {
    let config = Config::default().with_overrides(None, &[], None);
    assert_eq!(config, Config::default());
}

#[test]
fn test_desktop_profile() {
    let settings = Profile::Desktop.settings();

    assert_eq!(settings.startup, StartupPolicy::Lazy);
    assert_eq!(settings.tick_interval, Duration::from_millis(10));
    assert_eq!(settings.display_size, None);
    assert!(!settings.placeholder_on_miss);
    assert_eq!(settings.slider_defaults.brightness, 255.0);
    assert_eq!(settings.slider_defaults.contrast, 92.0);
    assert_eq!(settings.slider_defaults.exposure, -1.9);
}

#[test]
fn test_embedded_profile() {
    let settings = Profile::Embedded.settings();

    assert_eq!(settings.startup, StartupPolicy::Strict);
    assert_eq!(settings.tick_interval, Duration::from_millis(30));
    assert_eq!(settings.display_size, Some((480, 360)));
    assert!(settings.placeholder_on_miss);
    assert_eq!(settings.slider_defaults.brightness, 128.0);
    assert_eq!(settings.slider_defaults.contrast, 32.0);
    assert_eq!(settings.slider_defaults.exposure, -4.0);
}
