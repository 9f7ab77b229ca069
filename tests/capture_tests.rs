// SPDX-License-Identifier: MPL-2.0

//! Integration tests for photo capture and toggle recording

mod common;

use common::{Event, FakeCamera, FakeSinkFactory, Journal};
use snapcam::capture::CaptureController;
use snapcam::constants::RECORDING_FPS;
use snapcam::media::Frame;

fn controller(dir: &std::path::Path, journal: &Journal) -> CaptureController {
    CaptureController::with_factory(dir, FakeSinkFactory::new(journal).boxed())
}

fn files_in(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_toggle_alternates() {
    let dir = tempfile::tempdir().unwrap();
    let journal = Journal::default();
    let camera = FakeCamera::new(640, 480, &journal);
    let mut capture = controller(dir.path(), &journal);

    for press in 1..=6 {
        let recording = capture.toggle_record(&camera);
        assert_eq!(recording, press % 2 == 1, "press {}", press);
        assert_eq!(capture.is_recording(), recording);
    }
}

#[test]
fn test_recording_opens_sink_with_camera_size() {
    let dir = tempfile::tempdir().unwrap();
    let journal = Journal::default();
    let camera = FakeCamera::new(640, 480, &journal);
    let mut capture = controller(dir.path(), &journal);

    capture.toggle_record(&camera);

    let opened: Vec<_> = journal
        .events()
        .into_iter()
        .filter_map(|e| match e {
            Event::SinkOpened(spec) => Some(spec),
            _ => None,
        })
        .collect();
    assert_eq!(opened.len(), 1);
    let spec = &opened[0];
    assert_eq!((spec.width, spec.height, spec.fps), (640, 480, RECORDING_FPS));
    assert_eq!(spec.path.parent(), Some(dir.path()));
    let name = spec.path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("video_") && name.ends_with(".avi"), "{}", name);
}

#[test]
fn test_stop_returns_recorded_file() {
    let dir = tempfile::tempdir().unwrap();
    let journal = Journal::default();
    let camera = FakeCamera::new(320, 240, &journal);
    let mut capture = controller(dir.path(), &journal);

    capture.toggle_record(&camera);
    capture.record_frame(&Frame::black(320, 240)).unwrap();
    capture.record_frame(&Frame::black(320, 240)).unwrap();
    assert_eq!(capture.recording().frames(), 2);

    let path = capture.stop_recording().expect("recording should produce a file");
    assert!(journal.events().contains(&Event::SinkFinished(path)));
    assert!(!capture.is_recording());
    assert_eq!(capture.stop_recording(), None);
}

#[test]
fn test_nothing_recorded_while_idle() {
    let dir = tempfile::tempdir().unwrap();
    let journal = Journal::default();
    let mut capture = controller(dir.path(), &journal);

    capture.record_frame(&Frame::black(8, 8)).unwrap();
    capture.record_frame(&Frame::black(8, 8)).unwrap();

    assert_eq!(journal.sink_frames(), 0);
    assert_eq!(capture.recording().frames(), 0);
}

#[test]
fn test_failed_sink_still_alternates() {
    let dir = tempfile::tempdir().unwrap();
    let journal = Journal::default();
    let camera = FakeCamera::new(640, 480, &journal);
    let mut capture =
        CaptureController::with_factory(dir.path(), FakeSinkFactory::failing(&journal).boxed());

    assert!(capture.toggle_record(&camera));
    assert!(capture.is_recording());
    capture.record_frame(&Frame::black(640, 480)).unwrap();
    assert_eq!(journal.sink_frames(), 0);

    assert!(!capture.toggle_record(&camera));
    assert!(!capture.is_recording());
}

#[test]
fn test_unknown_size_records_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let journal = Journal::default();
    let camera = FakeCamera::silent(&journal);
    let mut capture = controller(dir.path(), &journal);

    assert!(capture.toggle_record(&camera));
    assert_eq!(journal.count(|e| matches!(e, Event::SinkOpened(_))), 0);
    assert_eq!(capture.stop_recording(), None);
}

#[test]
fn test_photo_without_frame_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let journal = Journal::default();
    let mut camera = FakeCamera::new(64, 48, &journal).with_script(&[false]);
    let mut capture = controller(dir.path(), &journal);

    assert_eq!(capture.take_photo(&mut camera), None);
    assert!(files_in(dir.path()).is_empty());
    assert_eq!(journal.count(|e| matches!(e, Event::Read { .. })), 1);
}

#[test]
fn test_photo_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    let journal = Journal::default();
    let mut camera = FakeCamera::new(64, 48, &journal);
    let mut capture = controller(dir.path(), &journal);

    let path = capture.take_photo(&mut camera).expect("photo should be saved");

    let files = files_in(dir.path());
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("photo_") && files[0].ends_with(".png"));
    let decoded = image::open(&path).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 48));
}

#[test]
fn test_photo_does_not_affect_recording() {
    let dir = tempfile::tempdir().unwrap();
    let journal = Journal::default();
    let mut camera = FakeCamera::new(32, 24, &journal);
    let mut capture = controller(dir.path(), &journal);

    capture.toggle_record(&camera);
    capture.take_photo(&mut camera);

    assert!(capture.is_recording());
    assert_eq!(journal.sink_frames(), 0);
}

#[test]
fn test_elapsed_only_while_recording() {
    let dir = tempfile::tempdir().unwrap();
    let journal = Journal::default();
    let camera = FakeCamera::new(640, 480, &journal);
    let mut capture = controller(dir.path(), &journal);

    assert_eq!(capture.recording().elapsed(), None);
    capture.toggle_record(&camera);
    assert!(capture.recording().elapsed().is_some());
    capture.toggle_record(&camera);
    assert_eq!(capture.recording().elapsed(), None);
}
