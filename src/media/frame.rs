// SPDX-License-Identifier: GPL-3.0-only

//! Camera frames and preview conversion
//!
//! A [`Frame`] is one tightly packed RGB24 snapshot read from the camera. It is
//! shared by reference count so the preview and an active recording can both
//! consume the same tick's frame without copying.

use image::RgbImage;
use image::imageops::{self, FilterType};
use std::sync::Arc;

/// Bytes per pixel of a [`Frame`]
pub const CHANNELS: usize = 3;

/// Immutable RGB24 frame (`height × width × 3`, row-major, no padding)
#[derive(Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Arc<[u8]>,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl Frame {
    /// Wrap packed RGB24 data, returning `None` if the length does not match
    pub fn new(width: u32, height: u32, data: impl Into<Arc<[u8]>>) -> Option<Self> {
        let data = data.into();
        if data.len() != expected_len(width, height) {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// A solid black frame
    pub fn black(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: Arc::from(vec![0u8; expected_len(width, height)]),
        }
    }

    /// Dimensions as a tuple
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Copy into an `image` buffer for encoding or scaling
    pub fn to_rgb_image(&self) -> RgbImage {
        // Length is validated on construction
        RgbImage::from_raw(self.width, self.height, self.data.to_vec())
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }

    /// Scale to exactly `width × height` (aspect ratio is not preserved)
    pub fn resized(&self, width: u32, height: u32) -> Frame {
        if self.dimensions() == (width, height) {
            return self.clone();
        }
        let scaled = imageops::resize(&self.to_rgb_image(), width, height, FilterType::Triangle);
        Frame {
            width,
            height,
            data: Arc::from(scaled.into_raw()),
        }
    }

    /// Expand RGB to RGBA for the display widget
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for pixel in self.data.chunks_exact(CHANNELS) {
            rgba.extend_from_slice(pixel);
            rgba.push(u8::MAX);
        }
        rgba
    }
}

/// RGBA image ready to hand to the preview widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl PreviewImage {
    /// Convert a frame, scaling it first when a display size is fixed
    pub fn from_frame(frame: &Frame, display_size: Option<(u32, u32)>) -> Self {
        let frame = match display_size {
            Some((width, height)) => frame.resized(width, height),
            None => frame.clone(),
        };
        Self {
            width: frame.width,
            height: frame.height,
            rgba: frame.to_rgba(),
        }
    }

    /// Black placeholder shown when no frame could be read
    pub fn placeholder(width: u32, height: u32) -> Self {
        Self::from_frame(&Frame::black(width, height), None)
    }
}

fn expected_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Frame {
        let data: Vec<u8> = (0..width * height)
            .flat_map(|i| [(i % 256) as u8, 0, 255])
            .collect();
        Frame::new(width, height, data).unwrap()
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        assert!(Frame::new(2, 2, vec![0u8; 11]).is_none());
        assert!(Frame::new(2, 2, vec![0u8; 12]).is_some());
    }

    #[test]
    fn test_resize_to_display_size() {
        let frame = gradient(640, 480);
        let scaled = frame.resized(480, 360);
        assert_eq!(scaled.dimensions(), (480, 360));
        assert_eq!(scaled.data.len(), 480 * 360 * CHANNELS);
    }

    #[test]
    fn test_resize_same_size_shares_data() {
        let frame = gradient(4, 4);
        let same = frame.resized(4, 4);
        assert!(Arc::ptr_eq(&frame.data, &same.data));
    }

    #[test]
    fn test_rgba_conversion_keeps_channel_order() {
        let frame = Frame::new(1, 1, vec![10u8, 20, 30]).unwrap();
        assert_eq!(frame.to_rgba(), vec![10, 20, 30, 255]);
    }

    #[test]
    fn test_placeholder_is_opaque_black() {
        let preview = PreviewImage::placeholder(3, 2);
        assert_eq!((preview.width, preview.height), (3, 2));
        assert!(
            preview
                .rgba
                .chunks_exact(4)
                .all(|px| px == [0, 0, 0, 255])
        );
    }

    #[test]
    fn test_preview_without_display_size_keeps_dimensions() {
        let preview = PreviewImage::from_frame(&gradient(8, 6), None);
        assert_eq!((preview.width, preview.height), (8, 6));
        assert_eq!(preview.rgba.len(), 8 * 6 * 4);
    }
}
