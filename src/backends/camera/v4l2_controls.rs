// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera control interface
//!
//! Thin ioctl wrappers used to pass slider values straight to the driver.
//! Nothing here validates ranges: the driver clamps or rejects out-of-range
//! values on its own.

use std::fs::File;
use std::os::unix::io::AsRawFd;
use tracing::{debug, warn};

const V4L2_CTRL_CLASS_USER: u32 = 0x00980000;
const V4L2_CTRL_CLASS_CAMERA: u32 = 0x009a0000;

const V4L2_CID_BASE: u32 = V4L2_CTRL_CLASS_USER | 0x900;
const V4L2_CID_CAMERA_CLASS_BASE: u32 = V4L2_CTRL_CLASS_CAMERA | 0x900;

/// Brightness control
pub const V4L2_CID_BRIGHTNESS: u32 = V4L2_CID_BASE;
/// Contrast control
pub const V4L2_CID_CONTRAST: u32 = V4L2_CID_BASE + 1;
/// Auto exposure mode (menu)
pub const V4L2_CID_EXPOSURE_AUTO: u32 = V4L2_CID_CAMERA_CLASS_BASE + 1;
/// Exposure time in 100 µs units
pub const V4L2_CID_EXPOSURE_ABSOLUTE: u32 = V4L2_CID_CAMERA_CLASS_BASE + 2;
/// Exposure compensation (EV bias) in 0.001 EV units
pub const V4L2_CID_AUTO_EXPOSURE_BIAS: u32 = V4L2_CID_CAMERA_CLASS_BASE + 19;

/// `V4L2_CID_EXPOSURE_AUTO` value for fully manual exposure
pub const V4L2_EXPOSURE_MANUAL: i32 = 1;

const V4L2_CTRL_FLAG_DISABLED: u32 = 0x0001;

// (dir << 30) | (size << 16) | ('V' << 8) | nr
/// Get control value (v4l2_control: 8 bytes)
const VIDIOC_G_CTRL: libc::c_ulong = 0xC008561B;
/// Set control value (v4l2_control: 8 bytes)
const VIDIOC_S_CTRL: libc::c_ulong = 0xC008561C;
/// Query control info (v4l2_queryctrl: 68 bytes)
const VIDIOC_QUERYCTRL: libc::c_ulong = 0xC0445624;

// Kernel ABI layouts; some fields are only written for the ioctl
#[repr(C)]
#[allow(dead_code)]
struct V4l2Control {
    id: u32,
    value: i32,
}

#[repr(C)]
#[allow(dead_code)]
struct V4l2Queryctrl {
    id: u32,
    ctrl_type: u32,
    name: [u8; 32],
    minimum: i32,
    maximum: i32,
    step: i32,
    default_value: i32,
    flags: u32,
    reserved: [u32; 2],
}

/// Range of a V4L2 control
#[derive(Debug, Clone)]
pub struct ControlInfo {
    pub minimum: i32,
    pub maximum: i32,
    pub default_value: i32,
    pub flags: u32,
}

impl ControlInfo {
    /// Check if control is disabled
    pub fn is_disabled(&self) -> bool {
        self.flags & V4L2_CTRL_FLAG_DISABLED != 0
    }
}

/// Query if a control exists and get its information
pub fn query_control(device_path: &str, control_id: u32) -> Option<ControlInfo> {
    let file = File::open(device_path).ok()?;
    let fd = file.as_raw_fd();

    let mut qctrl = V4l2Queryctrl {
        id: control_id,
        ctrl_type: 0,
        name: [0; 32],
        minimum: 0,
        maximum: 0,
        step: 0,
        default_value: 0,
        flags: 0,
        reserved: [0; 2],
    };

    let result = unsafe { libc::ioctl(fd, VIDIOC_QUERYCTRL, &mut qctrl as *mut V4l2Queryctrl) };

    if result < 0 {
        return None;
    }

    Some(ControlInfo {
        minimum: qctrl.minimum,
        maximum: qctrl.maximum,
        default_value: qctrl.default_value,
        flags: qctrl.flags,
    })
}

/// Whether the device exposes an enabled control with this id
pub fn is_supported(device_path: &str, control_id: u32) -> bool {
    query_control(device_path, control_id).is_some_and(|info| !info.is_disabled())
}

/// Get current value of a control
pub fn get_control(device_path: &str, control_id: u32) -> Option<i32> {
    let file = File::open(device_path).ok()?;
    let fd = file.as_raw_fd();

    let mut ctrl = V4l2Control {
        id: control_id,
        value: 0,
    };

    let result = unsafe { libc::ioctl(fd, VIDIOC_G_CTRL, &mut ctrl as *mut V4l2Control) };

    if result < 0 {
        debug!(device_path, control_id, "Failed to get V4L2 control");
        return None;
    }

    Some(ctrl.value)
}

/// Set value of a control
pub fn set_control(device_path: &str, control_id: u32, value: i32) -> Result<(), String> {
    let file = File::open(device_path).map_err(|e| format!("Failed to open device: {}", e))?;
    let fd = file.as_raw_fd();

    let mut ctrl = V4l2Control {
        id: control_id,
        value,
    };

    let result = unsafe { libc::ioctl(fd, VIDIOC_S_CTRL, &mut ctrl as *mut V4l2Control) };

    if result < 0 {
        let errno = std::io::Error::last_os_error();
        warn!(
            device_path,
            control_id,
            value,
            ?errno,
            "Failed to set V4L2 control"
        );
        return Err(format!("Failed to set control: {}", errno));
    }

    if ctrl.value != value {
        debug!(
            device_path,
            control_id,
            requested = value,
            actual = ctrl.value,
            "V4L2 control value was clamped"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_id_values() {
        assert_eq!(V4L2_CID_BRIGHTNESS, 0x00980900);
        assert_eq!(V4L2_CID_CONTRAST, 0x00980901);
        assert_eq!(V4L2_CID_EXPOSURE_AUTO, 0x009a0901);
        assert_eq!(V4L2_CID_EXPOSURE_ABSOLUTE, 0x009a0902);
        assert_eq!(V4L2_CID_AUTO_EXPOSURE_BIAS, 0x009a0913);
    }

    #[test]
    fn test_disabled_flag() {
        let mut info = ControlInfo {
            minimum: 3,
            maximum: 2047,
            default_value: 250,
            flags: 0,
        };
        assert!(!info.is_disabled());
        info.flags = V4L2_CTRL_FLAG_DISABLED;
        assert!(info.is_disabled());
    }

    #[test]
    fn test_missing_device_is_an_error() {
        assert!(get_control("/nonexistent/video99", V4L2_CID_BRIGHTNESS).is_none());
        assert!(set_control("/nonexistent/video99", V4L2_CID_BRIGHTNESS, 1).is_err());
        assert!(query_control("/nonexistent/video99", V4L2_CID_CONTRAST).is_none());
        assert!(!is_supported("/nonexistent/video99", V4L2_CID_AUTO_EXPOSURE_BIAS));
    }
}
