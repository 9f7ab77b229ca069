// SPDX-License-Identifier: MPL-2.0

//! AVI recorder
//!
//! ```text
//! appsrc (RGB) ! videoconvert ! jpegenc ! avimux ! filesink
//! ```
//!
//! Buffers are timestamped from their index at the recording frame rate, not
//! from the wall clock, so playback speed follows the nominal rate even when
//! the poll loop delivers frames faster or slower.

use super::{RecordingSpec, VideoSink, VideoSinkFactory};
use crate::constants::timing;
use crate::errors::RecordingError;
use crate::media::frame::Frame;
use gstreamer::prelude::*;
use gstreamer_app::AppSrc;
use gstreamer_video::{VideoFormat, VideoInfo};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Recording into an MJPEG-in-AVI file
pub struct AviRecorder {
    pipeline: gstreamer::Pipeline,
    appsrc: AppSrc,
    file_path: PathBuf,
    width: u32,
    height: u32,
    fps: u32,
    frames_pushed: u64,
}

fn make_element(factory: &str) -> Result<gstreamer::Element, RecordingError> {
    gstreamer::ElementFactory::make(factory)
        .build()
        .map_err(|e| RecordingError::StartFailed(format!("Failed to create {}: {}", factory, e)))
}

impl AviRecorder {
    /// Build the pipeline and open the output file
    pub fn start(spec: &RecordingSpec) -> Result<Self, RecordingError> {
        if spec.width == 0 || spec.height == 0 {
            return Err(RecordingError::UnknownDimensions);
        }
        let fps = spec.fps.max(1);
        gstreamer::init().map_err(|e| RecordingError::StartFailed(e.to_string()))?;

        info!(
            path = %spec.path.display(),
            width = spec.width,
            height = spec.height,
            fps,
            "Starting video recording"
        );

        let pipeline = gstreamer::Pipeline::new();

        let appsrc = make_element("appsrc")?
            .downcast::<AppSrc>()
            .map_err(|_| RecordingError::StartFailed("Failed to downcast to AppSrc".into()))?;
        let convert = make_element("videoconvert")?;
        let encoder = make_element("jpegenc")?;
        let muxer = make_element("avimux")?;
        let filesink = make_element("filesink")?;

        let caps = VideoInfo::builder(VideoFormat::Rgb, spec.width, spec.height)
            .fps(gstreamer::Fraction::new(fps as i32, 1))
            .build()
            .and_then(|info| info.to_caps())
            .map_err(|e| RecordingError::StartFailed(format!("Invalid caps: {}", e)))?;

        appsrc.set_caps(Some(&caps));
        appsrc.set_format(gstreamer::Format::Time);
        appsrc.set_is_live(false);

        filesink.set_property("location", spec.path.to_string_lossy().to_string());

        pipeline
            .add_many([appsrc.upcast_ref(), &convert, &encoder, &muxer, &filesink])
            .map_err(|e| RecordingError::StartFailed(format!("Failed to add elements: {}", e)))?;
        gstreamer::Element::link_many([appsrc.upcast_ref(), &convert, &encoder, &muxer, &filesink])
            .map_err(|e| RecordingError::StartFailed(format!("Failed to link elements: {}", e)))?;

        // filesink opens its location on READY -> PAUSED, so an unwritable
        // path fails right here
        if let Err(e) = pipeline.set_state(gstreamer::State::Playing) {
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(RecordingError::StartFailed(format!(
                "Failed to start recording: {}",
                e
            )));
        }

        Ok(Self {
            pipeline,
            appsrc,
            file_path: spec.path.clone(),
            width: spec.width,
            height: spec.height,
            fps,
            frames_pushed: 0,
        })
    }

    fn timestamp(&self, index: u64) -> gstreamer::ClockTime {
        gstreamer::ClockTime::from_nseconds(index * 1_000_000_000 / self.fps as u64)
    }
}

impl VideoSink for AviRecorder {
    fn push_frame(&mut self, frame: &Frame) -> Result<(), RecordingError> {
        let frame = frame.resized(self.width, self.height);

        let mut buffer = gstreamer::Buffer::from_slice(frame.data.clone());
        {
            let buffer_ref = buffer
                .get_mut()
                .ok_or_else(|| RecordingError::WriteFailed("Buffer is not writable".into()))?;
            buffer_ref.set_pts(self.timestamp(self.frames_pushed));
            buffer_ref.set_duration(
                self.timestamp(self.frames_pushed + 1) - self.timestamp(self.frames_pushed),
            );
        }

        self.appsrc
            .push_buffer(buffer)
            .map_err(|e| RecordingError::WriteFailed(format!("Failed to push frame: {:?}", e)))?;

        self.frames_pushed += 1;
        if self.frames_pushed % timing::FRAME_LOG_INTERVAL == 0 {
            debug!(frames = self.frames_pushed, "Recording frames pushed");
        }
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<PathBuf, RecordingError> {
        info!(frames = self.frames_pushed, "Stopping video recording");

        if let Err(e) = self.appsrc.end_of_stream() {
            warn!(?e, "Failed to send EOS to recording");
        }

        // Wait for avimux to write its index before tearing down
        if let Some(bus) = self.pipeline.bus() {
            match bus.timed_pop_filtered(
                gstreamer::ClockTime::from_seconds(timing::EOS_TIMEOUT_SECS),
                &[gstreamer::MessageType::Eos, gstreamer::MessageType::Error],
            ) {
                Some(msg) => {
                    if let gstreamer::MessageView::Error(err) = msg.view() {
                        error!(
                            error = %err.error(),
                            debug = ?err.debug(),
                            source = ?err.src().map(|s| s.name()),
                            "GStreamer error while finalizing recording"
                        );
                    }
                }
                None => warn!("Timed out waiting for end of recording"),
            }
        }

        self.pipeline
            .set_state(gstreamer::State::Null)
            .map_err(|e| RecordingError::StopFailed(format!("Failed to stop pipeline: {}", e)))?;

        info!(path = %self.file_path.display(), "Recording saved");
        Ok(self.file_path.clone())
    }
}

impl Drop for AviRecorder {
    fn drop(&mut self) {
        let _ = self.pipeline.set_state(gstreamer::State::Null);
    }
}

/// Opens [`AviRecorder`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct AviSinkFactory;

impl VideoSinkFactory for AviSinkFactory {
    fn create(&self, spec: &RecordingSpec) -> Result<Box<dyn VideoSink>, RecordingError> {
        Ok(Box::new(AviRecorder::start(spec)?))
    }
}
