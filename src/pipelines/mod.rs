// SPDX-License-Identifier: MPL-2.0

//! Capture output pipelines
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Camera Frame │ ──▶ │  Photo Pipeline   │ ──▶ │   PNG File   │
//! │   (RGB24)    │     │  - image encoder  │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//!
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Camera Frame │ ──▶ │  Video Pipeline   │ ──▶ │   AVI File   │
//! │   (RGB24)    │     │  - appsrc         │     │              │
//! │  every tick  │     │  - jpegenc        │     │              │
//! │              │     │  - avimux         │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`photo`]: Single-frame PNG encoding
//! - [`video`]: Frame-by-frame AVI recording

pub mod photo;
pub mod video;
