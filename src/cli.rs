// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! These drive the same [`Session`] as the GUI, on a plain sleep loop in
//! place of the window's timer subscription.

use snapcam::backends::camera::v4l2_controls;
use snapcam::backends::camera::{CameraBackendType, CameraProperty, CameraSource, GstCamera};
use snapcam::config::Config;
use snapcam::constants::timing;
use snapcam::errors::{AppError, CameraError, PhotoError, RecordingError};
use snapcam::session::{Session, TickOutcome};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Open the configured camera, failing if none is available
fn open_session(config: &Config, output_dir: &Path) -> Result<Session, AppError> {
    let session = Session::open(config, output_dir)?;
    if !session.camera().is_open() {
        return Err(CameraError::NoDeviceAvailable.into());
    }
    Ok(session)
}

/// Tick until the camera delivers a frame or `timeout` passes
fn wait_for_frame(session: &mut Session, timeout: Duration) -> bool {
    let start = Instant::now();
    let tick = session.settings().tick_interval;
    while start.elapsed() < timeout {
        if let TickOutcome::Frame(_) = session.tick() {
            return true;
        }
        std::thread::sleep(tick);
    }
    false
}

/// Take a photo
pub fn take_photo(config: &Config, output_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(config, output_dir)?;
    println!(
        "Using camera backend: {}",
        describe_backend(session.camera().backend())
    );

    // Let auto exposure settle
    std::thread::sleep(Duration::from_millis(timing::PHOTO_WARMUP_MS));

    let deadline = Instant::now() + Duration::from_secs(timing::PHOTO_TIMEOUT_SECS);
    let tick = session.settings().tick_interval;
    let saved = loop {
        if let Some(path) = session.take_photo() {
            break Some(path);
        }
        if Instant::now() >= deadline {
            break None;
        }
        std::thread::sleep(tick);
    };
    session.shutdown();

    match saved {
        Some(path) => {
            println!("Photo saved: {}", path.display());
            Ok(())
        }
        None => Err(AppError::from(PhotoError::NoFrameAvailable).into()),
    }
}

/// Record a video for `duration` seconds or until Ctrl+C
pub fn record_video(
    config: &Config,
    output_dir: &Path,
    duration: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(config, output_dir)?;
    println!(
        "Using camera backend: {}",
        describe_backend(session.camera().backend())
    );

    if !wait_for_frame(
        &mut session,
        Duration::from_secs(timing::PHOTO_TIMEOUT_SECS),
    ) {
        return Err(AppError::from(PhotoError::NoFrameAvailable).into());
    }

    // Set up Ctrl+C handler
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::SeqCst);
    })?;

    session.toggle_record();
    println!("Recording... Press Ctrl+C to stop early.");

    let start = Instant::now();
    let target_duration = Duration::from_secs(duration);
    let tick = session.settings().tick_interval;

    while start.elapsed() < target_duration {
        if stop_flag.load(Ordering::SeqCst) {
            println!();
            println!("Stopping early...");
            break;
        }
        session.tick();
        std::thread::sleep(tick);
    }

    let frames = session.capture().recording().frames();
    let elapsed = session.capture().recording().elapsed().unwrap_or_default();
    let saved = session.stop_recording();
    session.shutdown();

    match saved {
        Some(path) => {
            println!(
                "Video saved: {} ({} frames in {:.1}s)",
                path.display(),
                frames,
                elapsed.as_secs_f64()
            );
            Ok(())
        }
        None => Err(AppError::from(RecordingError::StopFailed(
            "no file was written".to_string(),
        ))
        .into()),
    }
}

/// Try every configured backend and report which open
pub fn list_backends(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;

    println!("Camera backends (in open order):");
    println!();
    for &backend in &config.backends {
        match GstCamera::open(backend, &config.device_path) {
            Ok(mut camera) => {
                let size = camera
                    .dimensions()
                    .map(|(w, h)| format!("{}x{}", w, h))
                    .unwrap_or_else(|| "unknown size".to_string());
                println!("  [ok]     {} ({})", backend, size);
                for property in CameraProperty::ALL {
                    let current = camera
                        .get_property(property)
                        .map(|value| format!("{:.2}", value))
                        .unwrap_or_else(|| "n/a".to_string());
                    println!(
                        "             {:<10} = {} via {}",
                        property.to_string(),
                        current,
                        camera.driver_control(property)
                    );
                }
                camera.release();
            }
            Err(e) => println!("  [failed] {}: {}", backend, e),
        }
    }

    println!();
    println!("Controls on {}:", config.device_path);
    for property in CameraProperty::ALL {
        let control = property
            .resolve_control(|id| v4l2_controls::is_supported(&config.device_path, id));
        match v4l2_controls::query_control(&config.device_path, control.id()) {
            Some(info) if !info.is_disabled() => println!(
                "  {:<10} {} .. {} (default {}) via {}",
                property.to_string(),
                control.from_driver_value(info.minimum),
                control.from_driver_value(info.maximum),
                control.from_driver_value(info.default_value),
                control,
            ),
            Some(_) => println!("  {:<10} disabled ({})", property.to_string(), control),
            None => println!("  {:<10} not supported ({})", property.to_string(), control),
        }
    }

    Ok(())
}

fn describe_backend(backend: Option<CameraBackendType>) -> String {
    backend
        .map(|b| b.to_string())
        .unwrap_or_else(|| "none".to_string())
}
