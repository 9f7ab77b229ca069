// SPDX-License-Identifier: GPL-3.0-only

//! Photo encoding
//!
//! A photo is the frame exactly as read from the camera, lossless, with no
//! filtering or scaling applied.

use crate::errors::PhotoError;
use crate::media::frame::Frame;
use image::ImageFormat;
use std::path::Path;
use tracing::{debug, info};

/// Encode `frame` as PNG at `path`, overwriting any existing file
pub fn save_photo(frame: &Frame, path: &Path) -> Result<(), PhotoError> {
    debug!(
        width = frame.width,
        height = frame.height,
        path = %path.display(),
        "Encoding photo"
    );

    frame
        .to_rgb_image()
        .save_with_format(path, ImageFormat::Png)?;

    info!(path = %path.display(), "Photo saved");
    Ok(())
}
