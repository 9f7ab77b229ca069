// SPDX-License-Identifier: GPL-3.0-only

//! Brightness, contrast and exposure sliders
//!
//! Each slider is one-way: moving it forwards the value to the camera and
//! nothing is ever read back. The widget's bounds are the only validation.

use crate::backends::camera::{CameraProperty, CameraSource};
use crate::errors::CameraError;
use tracing::warn;

/// Slider bounds and step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderRange {
    /// Bounds for a property's slider
    pub const fn of(property: CameraProperty) -> Self {
        match property {
            CameraProperty::Brightness => Self {
                min: 0.0,
                max: 255.0,
                step: 1.0,
            },
            CameraProperty::Contrast => Self {
                min: 0.0,
                max: 127.0,
                step: 1.0,
            },
            CameraProperty::Exposure => Self {
                min: -8.0,
                max: 8.0,
                step: 0.1,
            },
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Current slider positions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderValues {
    pub brightness: f64,
    pub contrast: f64,
    pub exposure: f64,
}

impl SliderValues {
    pub fn get(&self, property: CameraProperty) -> f64 {
        match property {
            CameraProperty::Brightness => self.brightness,
            CameraProperty::Contrast => self.contrast,
            CameraProperty::Exposure => self.exposure,
        }
    }

    pub fn set(&mut self, property: CameraProperty, value: f64) {
        match property {
            CameraProperty::Brightness => self.brightness = value,
            CameraProperty::Contrast => self.contrast = value,
            CameraProperty::Exposure => self.exposure = value,
        }
    }
}

/// Slider state plus the setter calls behind it
#[derive(Debug, Clone)]
pub struct SettingsPanel {
    values: SliderValues,
}

impl SettingsPanel {
    pub fn new(defaults: SliderValues) -> Self {
        Self { values: defaults }
    }

    pub fn value(&self, property: CameraProperty) -> f64 {
        self.values.get(property)
    }

    /// Record the new position and pass it to the camera unchanged
    pub fn on_change(
        &mut self,
        camera: &mut dyn CameraSource,
        property: CameraProperty,
        value: f64,
    ) -> Result<(), CameraError> {
        self.values.set(property, value);
        camera.set_property(property, value)
    }

    /// Push every slider's current position to the camera
    ///
    /// Used once at startup so the device matches what the sliders show.
    /// Failures are logged per property.
    pub fn apply_all(&self, camera: &mut dyn CameraSource) {
        for property in CameraProperty::ALL {
            if let Err(e) = camera.set_property(property, self.values.get(property)) {
                warn!(%property, error = %e, "Failed to apply initial slider value");
            }
        }
    }
}
