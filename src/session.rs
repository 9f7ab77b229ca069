// SPDX-License-Identifier: GPL-3.0-only

//! Camera session: poll loop tick and teardown
//!
//! A [`Session`] owns the open camera and the capture controller. The GUI and
//! the CLI both drive it the same way: call [`Session::tick`] on a fixed
//! interval, forward button presses, and call [`Session::shutdown`] once
//! before exiting.

use crate::backends::camera::{CameraSource, GstCamera, open_camera};
use crate::capture::CaptureController;
use crate::config::{Config, ProfileSettings, StartupPolicy};
use crate::constants::{display, timing};
use crate::errors::CameraError;
use crate::media::frame::PreviewImage;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Result of one poll tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// A new frame, ready for display
    Frame(PreviewImage),
    /// No frame this tick; show this instead
    Placeholder(PreviewImage),
    /// No frame this tick; keep the previous preview
    Skipped,
    /// The session has been shut down
    Inactive,
}

pub struct Session {
    camera: Box<dyn CameraSource>,
    capture: CaptureController,
    settings: ProfileSettings,
    shut_down: bool,
    ticks: u64,
}

impl Session {
    pub fn new(
        camera: Box<dyn CameraSource>,
        capture: CaptureController,
        settings: ProfileSettings,
    ) -> Self {
        Self {
            camera,
            capture,
            settings,
            shut_down: false,
            ticks: 0,
        }
    }

    /// Open the configured camera and honour the profile's startup policy
    ///
    /// Under [`StartupPolicy::Strict`] a missing camera is an error. Under
    /// [`StartupPolicy::Lazy`] the session starts with a closed handle.
    pub fn open(config: &Config, output_dir: impl Into<PathBuf>) -> Result<Self, CameraError> {
        let settings = config.profile_settings();
        let camera: Box<dyn CameraSource> =
            match open_camera(&config.backends, &config.device_path) {
                Ok(camera) => Box::new(camera),
                Err(e) if settings.startup == StartupPolicy::Lazy => {
                    warn!(error = %e, "Starting without a camera");
                    Box::new(GstCamera::closed(&config.device_path))
                }
                Err(e) => return Err(e),
            };

        Ok(Self::new(camera, CaptureController::new(output_dir), settings))
    }

    pub fn settings(&self) -> &ProfileSettings {
        &self.settings
    }

    pub fn camera(&self) -> &dyn CameraSource {
        &*self.camera
    }

    pub fn camera_mut(&mut self) -> &mut dyn CameraSource {
        &mut *self.camera
    }

    pub fn capture(&self) -> &CaptureController {
        &self.capture
    }

    pub fn is_recording(&self) -> bool {
        self.capture.is_recording()
    }

    /// Read one frame, record it if recording, and produce the next preview
    ///
    /// Never fails: a recording write error is logged and the frame is still
    /// shown.
    pub fn tick(&mut self) -> TickOutcome {
        if self.shut_down {
            return TickOutcome::Inactive;
        }
        self.ticks += 1;

        let Some(frame) = self.camera.read() else {
            if self.ticks % timing::FRAME_LOG_INTERVAL == 0 {
                debug!(ticks = self.ticks, "No frame available");
            }
            if !self.settings.placeholder_on_miss {
                return TickOutcome::Skipped;
            }
            let (width, height) = self
                .settings
                .display_size
                .unwrap_or((display::EMBEDDED_WIDTH, display::EMBEDDED_HEIGHT));
            return TickOutcome::Placeholder(PreviewImage::placeholder(width, height));
        };

        if let Err(e) = self.capture.record_frame(&frame) {
            warn!(error = %e, "Dropped frame from recording");
        }

        TickOutcome::Frame(PreviewImage::from_frame(&frame, self.settings.display_size))
    }

    pub fn take_photo(&mut self) -> Option<PathBuf> {
        if self.shut_down {
            return None;
        }
        self.capture.take_photo(&mut *self.camera)
    }

    pub fn toggle_record(&mut self) -> bool {
        if self.shut_down {
            return false;
        }
        self.capture.toggle_record(&*self.camera)
    }

    pub fn stop_recording(&mut self) -> Option<PathBuf> {
        self.capture.stop_recording()
    }

    /// Stop any recording, then release the camera
    ///
    /// Only the first call has any effect.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        if let Some(path) = self.capture.stop_recording() {
            info!(path = %path.display(), "Recording finalized on shutdown");
        }
        self.camera.release();
        info!(ticks = self.ticks, "Session closed");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("backend", &self.camera.backend())
            .field("capture", &self.capture)
            .field("shut_down", &self.shut_down)
            .field("ticks", &self.ticks)
            .finish()
    }
}
