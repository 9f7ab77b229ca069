// SPDX-License-Identifier: MPL-2.0

//! GStreamer capture pipeline
//!
//! Every backend shares one pipeline shape, only the source element differs:
//!
//! ```text
//! <source> ! videoconvert ! video/x-raw,format=RGB ! appsink
//! ```
//!
//! Frames are pulled from the appsink on demand, one per poll tick, rather
//! than pushed through a callback. The appsink keeps only the newest buffer
//! so a slow UI never sees stale frames.

use super::CameraSource;
use super::types::{
    BackendError, BackendResult, CameraBackendType, CameraProperty, DriverControl,
};
use super::v4l2_controls;
use crate::constants::timing;
use crate::errors::CameraError;
use crate::media::frame::{CHANNELS, Frame};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use tracing::{debug, info, warn};

/// Running capture pipeline
struct Capture {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
}

impl Capture {
    fn stop(self) {
        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            warn!(error = %e, "Failed to stop capture pipeline");
            return;
        }
        let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::STOP_TIMEOUT_SECS,
        ));
        debug!(?result, ?state, "Capture pipeline stopped");
    }
}

/// Camera handle backed by a GStreamer pipeline
pub struct GstCamera {
    backend: Option<CameraBackendType>,
    device_path: String,
    capture: Option<Capture>,
    last_dimensions: Option<(u32, u32)>,
    frames_read: u64,
    exposure_control: DriverControl,
    manual_exposure: bool,
}

impl GstCamera {
    /// Build and start the capture pipeline for `backend`
    ///
    /// Succeeds only once the pipeline has reached PLAYING, i.e. the device
    /// is actually open and streaming.
    pub fn open(backend: CameraBackendType, device_path: &str) -> BackendResult<Self> {
        gstreamer::init().map_err(|e| BackendError::NotAvailable(e.to_string()))?;

        let description = pipeline_description(backend, device_path);
        info!(%backend, pipeline = %description, "Opening camera");

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?
            .downcast::<gstreamer::Pipeline>()
            .map_err(|_| {
                BackendError::InitializationFailed("Launch line is not a pipeline".to_string())
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| BackendError::InitializationFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| {
                BackendError::InitializationFailed("Failed to cast appsink".to_string())
            })?;

        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", 1u32);
        appsink.set_property("drop", true);

        if let Err(e) = pipeline.set_state(gstreamer::State::Playing) {
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(BackendError::InitializationFailed(format!(
                "Failed to start pipeline: {}",
                e
            )));
        }

        let (result, state, _) = pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        if result.is_err() || state != gstreamer::State::Playing {
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(BackendError::InitializationFailed(format!(
                "{} pipeline did not reach PLAYING (state {:?})",
                backend, state
            )));
        }

        let exposure_control = match control_device(Some(backend), device_path) {
            Ok(device) => CameraProperty::Exposure
                .resolve_control(|id| v4l2_controls::is_supported(device, id)),
            Err(_) => CameraProperty::Exposure.driver_control(),
        };
        info!(%backend, %exposure_control, "Camera open");

        Ok(Self {
            backend: Some(backend),
            device_path: device_path.to_string(),
            capture: Some(Capture { pipeline, appsink }),
            last_dimensions: None,
            frames_read: 0,
            exposure_control,
            manual_exposure: false,
        })
    }

    /// A handle that never opened; every read fails
    pub fn closed(device_path: &str) -> Self {
        Self {
            backend: None,
            device_path: device_path.to_string(),
            capture: None,
            last_dimensions: None,
            frames_read: 0,
            exposure_control: CameraProperty::Exposure.driver_control(),
            manual_exposure: false,
        }
    }

    /// Control written for `property` on this device
    pub fn driver_control(&self, property: CameraProperty) -> DriverControl {
        match property {
            CameraProperty::Exposure => self.exposure_control,
            _ => property.driver_control(),
        }
    }

    /// Device node that receives control ioctls for the open backend
    fn controls_device(&self) -> Result<&str, CameraError> {
        let backend = self.capture.as_ref().and(self.backend);
        control_device(backend, &self.device_path)
    }

    fn negotiated_dimensions(&self) -> Option<(u32, u32)> {
        let capture = self.capture.as_ref()?;
        let caps = capture.appsink.static_pad("sink")?.current_caps()?;
        let info = VideoInfo::from_caps(&caps).ok()?;
        Some((info.width(), info.height()))
    }
}

/// Launch line for a backend
pub fn pipeline_description(backend: CameraBackendType, device_path: &str) -> String {
    format!(
        "{} ! videoconvert ! video/x-raw,format=RGB ! appsink name=sink",
        backend.source_element(device_path)
    )
}

/// Device node behind `backend`'s controls
///
/// Only `v4l2src` is bound to the configured node. The other sources pick
/// their own camera, so `device_path` may be a different device or none.
fn control_device(
    backend: Option<CameraBackendType>,
    device_path: &str,
) -> Result<&str, CameraError> {
    match backend {
        None => Err(CameraError::NotOpen),
        Some(CameraBackendType::V4l2) => Ok(device_path),
        Some(other) => Err(CameraError::NoControls(other)),
    }
}

/// Copy a sample into a packed RGB frame, dropping any row padding
fn frame_from_sample(sample: &gstreamer::Sample) -> Option<Frame> {
    let caps = sample.caps()?;
    let info = VideoInfo::from_caps(caps).ok()?;
    let buffer = sample.buffer()?;
    if buffer.flags().contains(gstreamer::BufferFlags::CORRUPTED) {
        return None;
    }
    let map = buffer.map_readable().ok()?;

    let width = info.width();
    let height = info.height();
    let stride = info.stride()[0] as usize;
    let row_len = width as usize * CHANNELS;
    let src = map.as_slice();

    let mut data = Vec::with_capacity(row_len * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        data.extend_from_slice(src.get(start..start + row_len)?);
    }

    Frame::new(width, height, data)
}

impl CameraSource for GstCamera {
    fn backend(&self) -> Option<CameraBackendType> {
        self.backend
    }

    fn is_open(&self) -> bool {
        self.capture.is_some()
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        self.negotiated_dimensions().or(self.last_dimensions)
    }

    fn read(&mut self) -> Option<Frame> {
        let capture = self.capture.as_ref()?;
        let sample = capture
            .appsink
            .try_pull_sample(gstreamer::ClockTime::from_mseconds(timing::READ_TIMEOUT_MS))?;
        let frame = frame_from_sample(&sample)?;

        self.frames_read += 1;
        self.last_dimensions = Some(frame.dimensions());
        if self.frames_read % timing::FRAME_LOG_INTERVAL == 0 {
            debug!(
                frames = self.frames_read,
                width = frame.width,
                height = frame.height,
                "Camera frames read"
            );
        }
        Some(frame)
    }

    fn set_property(&mut self, property: CameraProperty, value: f64) -> Result<(), CameraError> {
        let device = self.controls_device()?.to_string();
        let control = self.driver_control(property);
        let raw = control.to_driver_value(value);

        // Exposure time is ignored while auto exposure is on
        if control == DriverControl::ExposureAbsolute && !self.manual_exposure {
            v4l2_controls::set_control(
                &device,
                v4l2_controls::V4L2_CID_EXPOSURE_AUTO,
                v4l2_controls::V4L2_EXPOSURE_MANUAL,
            )
            .map_err(CameraError::Control)?;
            self.manual_exposure = true;
        }

        debug!(%property, %control, value, raw, %device, "Setting camera property");
        v4l2_controls::set_control(&device, control.id(), raw).map_err(CameraError::Control)
    }

    fn get_property(&self, property: CameraProperty) -> Option<f64> {
        let device = self.controls_device().ok()?;
        let control = self.driver_control(property);
        v4l2_controls::get_control(device, control.id()).map(|raw| control.from_driver_value(raw))
    }

    fn release(&mut self) {
        if let Some(capture) = self.capture.take() {
            info!(backend = ?self.backend, frames = self.frames_read, "Releasing camera");
            capture.stop();
        }
    }
}

impl Drop for GstCamera {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_description() {
        assert_eq!(
            pipeline_description(CameraBackendType::Libcamera, "/dev/video0"),
            "libcamerasrc ! videoconvert ! video/x-raw,format=RGB ! appsink name=sink"
        );
    }

    #[test]
    fn test_closed_handle_never_reads() {
        let mut camera = GstCamera::closed("/dev/video0");
        assert!(!camera.is_open());
        assert!(camera.read().is_none());
        assert!(camera.dimensions().is_none());
        assert_eq!(
            camera.set_property(CameraProperty::Brightness, 10.0),
            Err(CameraError::NotOpen)
        );
        assert_eq!(camera.get_property(CameraProperty::Brightness), None);
        camera.release();
        camera.release();
        assert!(!camera.is_open());
    }

    #[test]
    fn test_controls_only_target_v4l2_node() {
        assert_eq!(
            control_device(Some(CameraBackendType::V4l2), "/dev/video0"),
            Ok("/dev/video0")
        );
        for backend in [
            CameraBackendType::PipeWire,
            CameraBackendType::Libcamera,
            CameraBackendType::Auto,
        ] {
            assert_eq!(
                control_device(Some(backend), "/dev/video0"),
                Err(CameraError::NoControls(backend))
            );
        }
        assert_eq!(control_device(None, "/dev/video0"), Err(CameraError::NotOpen));
    }

    #[test]
    fn test_closed_handle_uses_preferred_controls() {
        let camera = GstCamera::closed("/dev/video0");
        assert_eq!(
            camera.driver_control(CameraProperty::Exposure),
            DriverControl::ExposureBias
        );
        assert_eq!(
            camera.driver_control(CameraProperty::Contrast),
            DriverControl::Contrast
        );
    }

    #[test]
    fn test_frame_from_sample_drops_row_padding() {
        gstreamer::init().unwrap();

        // 3 RGB pixels are 9 bytes, padded to a 12 byte stride
        let info = VideoInfo::builder(gstreamer_video::VideoFormat::Rgb, 3, 2)
            .build()
            .unwrap();
        assert_eq!(info.stride()[0], 12);
        assert_eq!(info.size(), 24);
        let caps = info.to_caps().unwrap();

        let mut data = Vec::new();
        for row in 0..2u8 {
            data.extend((0..9).map(|i| row * 9 + i + 1));
            data.extend([0xEE; 3]);
        }
        let buffer = gstreamer::Buffer::from_mut_slice(data);
        let sample = gstreamer::Sample::builder()
            .buffer(&buffer)
            .caps(&caps)
            .build();

        let frame = frame_from_sample(&sample).unwrap();
        assert_eq!(frame.dimensions(), (3, 2));
        assert_eq!(frame.data.len(), 18);
        assert!(!frame.data.contains(&0xEE));
        assert_eq!(frame.data[9], 10);
        assert_eq!(&frame.data[..], &(1..=18).collect::<Vec<u8>>()[..]);
    }

    #[test]
    fn test_frame_from_sample_skips_corrupted() {
        gstreamer::init().unwrap();

        let caps = VideoInfo::builder(gstreamer_video::VideoFormat::Rgb, 4, 1)
            .build()
            .unwrap()
            .to_caps()
            .unwrap();
        let mut buffer = gstreamer::Buffer::from_mut_slice(vec![0u8; 12]);
        buffer
            .get_mut()
            .unwrap()
            .set_flags(gstreamer::BufferFlags::CORRUPTED);
        let sample = gstreamer::Sample::builder()
            .buffer(&buffer)
            .caps(&caps)
            .build();

        assert!(frame_from_sample(&sample).is_none());
    }
}
