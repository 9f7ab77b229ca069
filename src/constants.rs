// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Application ID in RDNN format, also the config namespace
pub const APP_ID: &str = "io.github.snapcam.SnapCam";

/// Frame rate written into every recording, independent of the preview rate
pub const RECORDING_FPS: u32 = 20;

/// Device node used for driver controls when none is configured
pub const DEFAULT_DEVICE_PATH: &str = "/dev/video0";

/// Diagnostic printed when the strict startup check finds no camera
pub const NO_CAMERA_MESSAGE: &str =
    "Error: Unable to access the camera. Try running 'libcamera-hello' to check camera status.";

/// Pipeline timing
pub mod timing {
    /// Seconds to wait for a capture pipeline to reach PLAYING
    pub const START_TIMEOUT_SECS: u64 = 5;
    /// Seconds to wait for a pipeline to reach NULL
    pub const STOP_TIMEOUT_SECS: u64 = 2;
    /// Seconds to wait for the muxer to finish after end-of-stream
    pub const EOS_TIMEOUT_SECS: u64 = 5;
    /// Upper bound for a single frame read
    pub const READ_TIMEOUT_MS: u64 = 5;
    /// Preview tick interval on desktops
    pub const DESKTOP_TICK_MS: u64 = 10;
    /// Preview tick interval on embedded boards
    pub const EMBEDDED_TICK_MS: u64 = 30;
    /// Camera warm-up before a CLI photo is taken
    pub const PHOTO_WARMUP_MS: u64 = 500;
    /// Give up on a CLI photo after this long
    pub const PHOTO_TIMEOUT_SECS: u64 = 5;
    /// Log frame statistics every N frames
    pub const FRAME_LOG_INTERVAL: u64 = 300;
}

/// Preview display geometry
pub mod display {
    /// Fixed preview width on embedded boards
    pub const EMBEDDED_WIDTH: u32 = 480;
    /// Fixed preview height on embedded boards
    pub const EMBEDDED_HEIGHT: u32 = 360;
}

/// Output file naming
pub mod files {
    pub const PHOTO_PREFIX: &str = "photo";
    pub const PHOTO_EXTENSION: &str = "png";
    pub const VIDEO_PREFIX: &str = "video";
    pub const VIDEO_EXTENSION: &str = "avi";
}

/// UI layout
pub mod ui {
    /// Width of the controls column
    pub const CONTROLS_WIDTH: f32 = 220.0;
    /// Padding around the controls column
    pub const CONTROLS_PADDING: u16 = 10;
    /// Vertical gap between controls
    pub const CONTROL_SPACING: u16 = 4;
    /// Minimum window size
    pub const MIN_WINDOW_WIDTH: f32 = 360.0;
    pub const MIN_WINDOW_HEIGHT: f32 = 180.0;
}
