// SPDX-License-Identifier: MPL-2.0

//! Output file naming for photos and videos
//!
//! Files are named by the Unix timestamp (seconds) at which they are created.
//! Two captures within the same second share a name; the later one overwrites
//! the earlier.

use crate::constants::files;
use std::path::{Path, PathBuf};

/// Current time as whole seconds since the Unix epoch
pub fn unix_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// `photo_<timestamp>.png` inside `dir`
pub fn photo_path(dir: &Path, timestamp: i64) -> PathBuf {
    dir.join(format!(
        "{}_{}.{}",
        files::PHOTO_PREFIX,
        timestamp,
        files::PHOTO_EXTENSION
    ))
}

/// `video_<timestamp>.avi` inside `dir`
pub fn video_path(dir: &Path, timestamp: i64) -> PathBuf {
    dir.join(format!(
        "{}_{}.{}",
        files::VIDEO_PREFIX,
        timestamp,
        files::VIDEO_EXTENSION
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_path_format() {
        let path = photo_path(Path::new("."), 1_700_000_000);
        assert_eq!(path, Path::new("./photo_1700000000.png"));
    }

    #[test]
    fn test_video_path_format() {
        let path = video_path(Path::new("/tmp"), 42);
        assert_eq!(path, Path::new("/tmp/video_42.avi"));
    }

    #[test]
    fn test_same_second_collides() {
        let dir = Path::new("out");
        assert_eq!(photo_path(dir, 7), photo_path(dir, 7));
    }

    #[test]
    fn test_timestamp_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(unix_timestamp() > 1_577_836_800);
    }
}
