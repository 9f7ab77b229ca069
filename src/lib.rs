// SPDX-License-Identifier: MPL-2.0

//! SnapCam - a live webcam preview with photo and video capture
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: COSMIC application, preview widget and controls
//! - [`backends`]: Camera sources and V4L2 driver controls
//! - [`media`]: Frames and preview conversion
//! - [`pipelines`]: Photo encoding and video recording
//! - [`capture`]: Photo / toggle-record controller
//! - [`controls`]: Brightness, contrast and exposure sliders
//! - [`session`]: Poll loop tick and shutdown ordering
//! - [`config`]: Deployment profile and persisted settings
//! - [`storage`]: Output file naming
//!
//! # Example
//!
//! ```ignore
//! // This is a GUI application, typically run via:
//! // snapcam --profile embedded
//! ```

pub mod app;
pub mod backends;
pub mod capture;
pub mod config;
pub mod constants;
pub mod controls;
pub mod errors;
pub mod i18n;
pub mod media;
pub mod pipelines;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use backends::camera::{CameraBackendType, CameraProperty, CameraSource};
pub use capture::{CaptureController, RecordingState};
pub use config::{Config, Profile, ProfileSettings, StartupPolicy};
pub use controls::{SettingsPanel, SliderRange, SliderValues};
pub use errors::AppError;
pub use session::{Session, TickOutcome};
