// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for camera capture
//!
//! # Modules
//!
//! - [`camera`]: Camera sources built on GStreamer, with V4L2 controls

pub mod camera;
