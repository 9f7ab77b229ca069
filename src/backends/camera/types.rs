// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use super::v4l2_controls;
use serde::{Deserialize, Serialize};

/// Camera capture backend
///
/// Each variant is a different GStreamer source element in front of the same
/// conversion chain. Backends are tried in a configurable order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum CameraBackendType {
    /// Video4Linux2 device node (`v4l2src`), works for most USB webcams
    #[value(name = "v4l2")]
    V4l2,
    /// PipeWire camera portal (`pipewiresrc`)
    #[value(name = "pipewire")]
    PipeWire,
    /// libcamera stack, e.g. Raspberry Pi camera modules (`libcamerasrc`)
    #[value(name = "libcamera")]
    Libcamera,
    /// Whatever GStreamer picks (`autovideosrc`)
    #[value(name = "auto")]
    Auto,
}

impl CameraBackendType {
    /// Default open order: platform capture API, desktop default, any available
    pub const DEFAULT_ORDER: [CameraBackendType; 4] = [
        CameraBackendType::V4l2,
        CameraBackendType::PipeWire,
        CameraBackendType::Libcamera,
        CameraBackendType::Auto,
    ];

    /// GStreamer source fragment for this backend
    pub fn source_element(&self, device_path: &str) -> String {
        match self {
            CameraBackendType::V4l2 => format!("v4l2src device=\"{}\"", device_path),
            CameraBackendType::PipeWire => "pipewiresrc".to_string(),
            CameraBackendType::Libcamera => "libcamerasrc".to_string(),
            CameraBackendType::Auto => "autovideosrc".to_string(),
        }
    }
}

impl std::fmt::Display for CameraBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraBackendType::V4l2 => write!(f, "V4L2"),
            CameraBackendType::PipeWire => write!(f, "PipeWire"),
            CameraBackendType::Libcamera => write!(f, "libcamera"),
            CameraBackendType::Auto => write!(f, "auto"),
        }
    }
}

/// Adjustable camera property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraProperty {
    Brightness,
    Contrast,
    /// Exposure compensation in EV
    Exposure,
}

impl CameraProperty {
    pub const ALL: [CameraProperty; 3] = [
        CameraProperty::Brightness,
        CameraProperty::Contrast,
        CameraProperty::Exposure,
    ];

    /// Preferred V4L2 control for this property
    pub fn driver_control(&self) -> DriverControl {
        match self {
            CameraProperty::Brightness => DriverControl::Brightness,
            CameraProperty::Contrast => DriverControl::Contrast,
            CameraProperty::Exposure => DriverControl::ExposureBias,
        }
    }

    /// Pick the control to drive on a device
    ///
    /// Exposure falls back to the absolute exposure time when the device has
    /// no EV bias control, as is common for UVC webcams. If neither is
    /// reported the preferred control is kept.
    pub fn resolve_control(&self, is_supported: impl Fn(u32) -> bool) -> DriverControl {
        let preferred = self.driver_control();
        if is_supported(preferred.id()) {
            return preferred;
        }
        match self {
            CameraProperty::Exposure if is_supported(DriverControl::ExposureAbsolute.id()) => {
                DriverControl::ExposureAbsolute
            }
            _ => preferred,
        }
    }
}

/// V4L2 control a property is written to, with its unit conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverControl {
    Brightness,
    Contrast,
    /// EV bias in 0.001 EV steps
    ExposureBias,
    /// Exposure time in 100 µs steps
    ExposureAbsolute,
}

/// 100 µs units per second
const EXPOSURE_UNITS_PER_SEC: f64 = 10_000.0;

impl DriverControl {
    pub fn id(&self) -> u32 {
        match self {
            DriverControl::Brightness => v4l2_controls::V4L2_CID_BRIGHTNESS,
            DriverControl::Contrast => v4l2_controls::V4L2_CID_CONTRAST,
            DriverControl::ExposureBias => v4l2_controls::V4L2_CID_AUTO_EXPOSURE_BIAS,
            DriverControl::ExposureAbsolute => v4l2_controls::V4L2_CID_EXPOSURE_ABSOLUTE,
        }
    }

    /// Convert a slider value to the driver's integer units
    ///
    /// For the absolute exposure time the slider value `ev` is read as an
    /// exposure of `2^ev` seconds, so -4 is 1/16 s (625 units).
    pub fn to_driver_value(&self, value: f64) -> i32 {
        match self {
            DriverControl::ExposureBias => (value * 1000.0).round() as i32,
            DriverControl::ExposureAbsolute => {
                (value.exp2() * EXPOSURE_UNITS_PER_SEC).round().max(1.0) as i32
            }
            _ => value.round() as i32,
        }
    }

    /// Inverse of [`Self::to_driver_value`]
    pub fn from_driver_value(&self, raw: i32) -> f64 {
        match self {
            DriverControl::ExposureBias => raw as f64 / 1000.0,
            DriverControl::ExposureAbsolute => {
                (raw.max(1) as f64 / EXPOSURE_UNITS_PER_SEC).log2()
            }
            _ => raw as f64,
        }
    }
}

impl std::fmt::Display for DriverControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DriverControl::Brightness => write!(f, "brightness"),
            DriverControl::Contrast => write!(f, "contrast"),
            DriverControl::ExposureBias => write!(f, "auto_exposure_bias"),
            DriverControl::ExposureAbsolute => write!(f, "exposure_time_absolute"),
        }
    }
}

impl std::fmt::Display for CameraProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraProperty::Brightness => write!(f, "brightness"),
            CameraProperty::Contrast => write!(f, "contrast"),
            CameraProperty::Exposure => write!(f, "exposure"),
        }
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors raised while building or driving a capture pipeline
#[derive(Debug, Clone)]
pub enum BackendError {
    /// GStreamer or a required element is not available
    NotAvailable(String),
    /// Failed to initialize backend
    InitializationFailed(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}
