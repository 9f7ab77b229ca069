// SPDX-License-Identifier: MPL-2.0

//! Camera source abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │  Session / Poll Loop│
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CameraSource Trait │  ← read / set_property / release
//! └──────────┬──────────┘
//!            │
//!            ▼
//!     ┌────────────┐
//!     │ GstCamera  │  ← v4l2src | pipewiresrc | libcamerasrc | autovideosrc
//!     └────────────┘
//! ```
//!
//! Opening walks an ordered list of backends and keeps the first one that
//! actually streams.

pub mod pipeline;
pub mod types;
pub mod v4l2_controls;

pub use pipeline::GstCamera;
pub use types::*;

use crate::errors::CameraError;
use crate::media::frame::Frame;
use tracing::{info, warn};

/// A live video input
///
/// Implementations must tolerate every call after [`CameraSource::release`]:
/// reads return `None` and releasing again is a no-op.
pub trait CameraSource: Send {
    /// Backend that opened this source, `None` if it never opened
    fn backend(&self) -> Option<CameraBackendType>;

    /// Whether the device is held and streaming
    fn is_open(&self) -> bool;

    /// Native frame size, if known yet
    fn dimensions(&self) -> Option<(u32, u32)>;

    /// Pull the most recent frame; `None` when nothing is available this tick
    fn read(&mut self) -> Option<Frame>;

    /// Forward a value to the device unchanged
    fn set_property(&mut self, property: CameraProperty, value: f64) -> Result<(), CameraError>;

    /// Current device value, if the device reports one
    fn get_property(&self, property: CameraProperty) -> Option<f64>;

    /// Give the device back to the system
    fn release(&mut self);
}

/// Try `candidates` in order and return the first source that opens
///
/// Failed attempts are logged and skipped. An empty list or a list where
/// every backend fails yields [`CameraError::NoDeviceAvailable`].
pub fn open_first<C, F>(candidates: &[CameraBackendType], mut opener: F) -> Result<C, CameraError>
where
    F: FnMut(CameraBackendType) -> BackendResult<C>,
{
    for &backend in candidates {
        match opener(backend) {
            Ok(camera) => {
                info!(%backend, "Camera backend selected");
                return Ok(camera);
            }
            Err(e) => {
                warn!(%backend, error = %e, "Camera backend failed to open");
            }
        }
    }
    Err(CameraError::NoDeviceAvailable)
}

/// Open the default device through the first working GStreamer backend
pub fn open_camera(
    candidates: &[CameraBackendType],
    device_path: &str,
) -> Result<GstCamera, CameraError> {
    open_first(candidates, |backend| GstCamera::open(backend, device_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_success_wins() {
        let mut tried = Vec::new();
        let result = open_first(&CameraBackendType::DEFAULT_ORDER, |backend| {
            tried.push(backend);
            match backend {
                CameraBackendType::Libcamera => Ok(backend),
                _ => Err(BackendError::NotAvailable("no device".into())),
            }
        });

        assert_eq!(result, Ok(CameraBackendType::Libcamera));
        assert_eq!(
            tried,
            vec![
                CameraBackendType::V4l2,
                CameraBackendType::PipeWire,
                CameraBackendType::Libcamera,
            ]
        );
    }

    #[test]
    fn test_stops_after_success() {
        let mut attempts = 0;
        let result = open_first(&CameraBackendType::DEFAULT_ORDER, |backend| {
            attempts += 1;
            Ok::<_, BackendError>(backend)
        });
        assert_eq!(result, Ok(CameraBackendType::V4l2));
        assert_eq!(attempts, 1);
    }

    #[test]
    fn test_all_fail() {
        let result: Result<(), _> = open_first(&CameraBackendType::DEFAULT_ORDER, |_| {
            Err(BackendError::InitializationFailed("busy".into()))
        });
        assert_eq!(result, Err(CameraError::NoDeviceAvailable));
    }

    #[test]
    fn test_empty_candidates() {
        let result: Result<(), _> = open_first(&[], |_| Ok(()));
        assert_eq!(result, Err(CameraError::NoDeviceAvailable));
    }
}
