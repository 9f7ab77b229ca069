// SPDX-License-Identifier: MPL-2.0

//! Video recording pipeline
//!
//! Recording is frame-driven: every poll tick that produces a frame pushes it
//! into the active [`VideoSink`]. The container is finalized only when the
//! sink is finished, so dropping a sink without finishing it may leave a
//! truncated file.

pub mod recorder;

pub use recorder::{AviRecorder, AviSinkFactory};

use crate::errors::RecordingError;
use crate::media::frame::Frame;
use std::path::PathBuf;

/// Parameters for a new recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingSpec {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

/// An open video file accepting frames
pub trait VideoSink: Send {
    /// Append one frame
    fn push_frame(&mut self, frame: &Frame) -> Result<(), RecordingError>;

    /// Flush and close the file
    fn finish(self: Box<Self>) -> Result<PathBuf, RecordingError>;
}

/// Creates sinks for new recordings
pub trait VideoSinkFactory: Send {
    fn create(&self, spec: &RecordingSpec) -> Result<Box<dyn VideoSink>, RecordingError>;
}
