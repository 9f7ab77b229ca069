// SPDX-License-Identifier: MPL-2.0

//! Media types shared by capture, preview and recording

pub mod frame;

pub use frame::{Frame, PreviewImage};
