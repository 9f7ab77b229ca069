// SPDX-License-Identifier: GPL-3.0-only

//! Photo and video capture controller
//!
//! Owns the recording state machine. Each call to
//! [`CaptureController::toggle_record`] flips between [`RecordingState::Idle`]
//! and [`RecordingState::Recording`]; nothing else starts a recording.

use crate::backends::camera::CameraSource;
use crate::constants::RECORDING_FPS;
use crate::errors::{PhotoError, RecordingError};
use crate::media::frame::Frame;
use crate::pipelines::photo::save_photo;
use crate::pipelines::video::{AviSinkFactory, RecordingSpec, VideoSink, VideoSinkFactory};
use crate::storage;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Recording state
#[derive(Default)]
pub enum RecordingState {
    /// Not recording
    #[default]
    Idle,
    /// Recording in progress
    Recording {
        started_at: Instant,
        path: PathBuf,
        /// `None` when the output could not be opened
        sink: Option<Box<dyn VideoSink>>,
        frames: u64,
    },
}

impl std::fmt::Debug for RecordingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordingState::Idle => write!(f, "Idle"),
            RecordingState::Recording {
                path, sink, frames, ..
            } => f
                .debug_struct("Recording")
                .field("path", path)
                .field("has_sink", &sink.is_some())
                .field("frames", frames)
                .finish(),
        }
    }
}

impl RecordingState {
    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingState::Recording { .. })
    }

    /// Get elapsed recording duration
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            RecordingState::Recording { started_at, .. } => Some(started_at.elapsed()),
            RecordingState::Idle => None,
        }
    }

    /// Frames appended to the current recording
    pub fn frames(&self) -> u64 {
        match self {
            RecordingState::Recording { frames, .. } => *frames,
            RecordingState::Idle => 0,
        }
    }
}

/// Photo capture and toggle recording
pub struct CaptureController {
    output_dir: PathBuf,
    fps: u32,
    factory: Box<dyn VideoSinkFactory>,
    recording: RecordingState,
}

impl CaptureController {
    /// Controller writing AVI recordings into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self::with_factory(output_dir, Box::new(AviSinkFactory))
    }

    /// Controller with a custom video sink
    pub fn with_factory(output_dir: impl Into<PathBuf>, factory: Box<dyn VideoSinkFactory>) -> Self {
        Self {
            output_dir: output_dir.into(),
            fps: RECORDING_FPS,
            factory,
            recording: RecordingState::Idle,
        }
    }

    pub fn recording(&self) -> &RecordingState {
        &self.recording
    }

    pub fn is_recording(&self) -> bool {
        self.recording.is_recording()
    }

    /// Read one frame and save it as `photo_<ts>.png`
    ///
    /// Returns the written path. A missing frame or a failed write is logged
    /// and yields `None`.
    pub fn take_photo(&mut self, camera: &mut dyn CameraSource) -> Option<PathBuf> {
        let Some(frame) = camera.read() else {
            info!("{}", PhotoError::NoFrameAvailable);
            return None;
        };

        let path = storage::photo_path(&self.output_dir, storage::unix_timestamp());
        match save_photo(&frame, &path) {
            Ok(()) => Some(path),
            Err(e) => {
                error!(error = %e, path = %path.display(), "Failed to save photo");
                None
            }
        }
    }

    /// Start recording when idle, stop when recording
    ///
    /// Returns whether a recording is active afterwards.
    pub fn toggle_record(&mut self, camera: &dyn CameraSource) -> bool {
        if self.is_recording() {
            self.stop_recording();
            return false;
        }

        let path = storage::video_path(&self.output_dir, storage::unix_timestamp());
        let sink = match camera.dimensions() {
            Some((width, height)) => {
                let spec = RecordingSpec {
                    path: path.clone(),
                    width,
                    height,
                    fps: self.fps,
                };
                match self.factory.create(&spec) {
                    Ok(sink) => Some(sink),
                    Err(e) => {
                        error!(error = %e, path = %path.display(), "Failed to open video output");
                        None
                    }
                }
            }
            None => {
                warn!(error = %RecordingError::UnknownDimensions, "Recording without output");
                None
            }
        };

        info!(path = %path.display(), "Recording started");
        self.recording = RecordingState::Recording {
            started_at: Instant::now(),
            path,
            sink,
            frames: 0,
        };
        true
    }

    /// Append a frame to the active recording
    ///
    /// A no-op while idle, or while recording without an open output.
    pub fn record_frame(&mut self, frame: &Frame) -> Result<(), RecordingError> {
        if let RecordingState::Recording {
            sink: Some(sink),
            frames,
            ..
        } = &mut self.recording
        {
            sink.push_frame(frame)?;
            *frames += 1;
        }
        Ok(())
    }

    /// Finalize the active recording
    ///
    /// Returns the written file, or `None` when nothing was recording or the
    /// output could not be finalized.
    pub fn stop_recording(&mut self) -> Option<PathBuf> {
        let RecordingState::Recording {
            started_at,
            path,
            sink,
            frames,
        } = std::mem::take(&mut self.recording)
        else {
            return None;
        };

        let duration = started_at.elapsed();
        let Some(sink) = sink else {
            info!(path = %path.display(), "Recording stopped without output");
            return None;
        };

        match sink.finish() {
            Ok(path) => {
                info!(
                    path = %path.display(),
                    frames,
                    duration_secs = duration.as_secs_f64(),
                    "Recording stopped"
                );
                Some(path)
            }
            Err(e) => {
                error!(error = %e, path = %path.display(), "Failed to finalize recording");
                None
            }
        }
    }
}

impl std::fmt::Debug for CaptureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureController")
            .field("output_dir", &self.output_dir)
            .field("fps", &self.fps)
            .field("recording", &self.recording)
            .finish()
    }
}
