// SPDX-License-Identifier: MPL-2.0

//! In-memory camera and video sink used by the integration tests

#![allow(dead_code)]

use snapcam::backends::camera::{CameraBackendType, CameraProperty, CameraSource};
use snapcam::errors::{CameraError, RecordingError};
use snapcam::media::Frame;
use snapcam::pipelines::video::{RecordingSpec, VideoSink, VideoSinkFactory};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Side effects observed by the fakes, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Read { delivered: bool },
    SetProperty(CameraProperty, f64),
    Release,
    SinkOpened(RecordingSpec),
    SinkFrame { width: u32, height: u32 },
    SinkFinished(PathBuf),
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Event>>>);

impl Journal {
    pub fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }

    pub fn releases(&self) -> usize {
        self.count(|e| matches!(e, Event::Release))
    }

    pub fn sink_frames(&self) -> usize {
        self.count(|e| matches!(e, Event::SinkFrame { .. }))
    }

    pub fn frames_delivered(&self) -> usize {
        self.count(|e| matches!(e, Event::Read { delivered: true }))
    }

    pub fn property_calls(&self) -> Vec<(CameraProperty, f64)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::SetProperty(p, v) => Some((p, v)),
                _ => None,
            })
            .collect()
    }
}

/// Scripted camera
///
/// Each read pops the next scripted result; once the script runs out every
/// read yields a frame of `width × height`, or nothing if `width` is zero.
pub struct FakeCamera {
    width: u32,
    height: u32,
    script: VecDeque<bool>,
    open: bool,
    journal: Journal,
}

impl FakeCamera {
    pub fn new(width: u32, height: u32, journal: &Journal) -> Self {
        Self {
            width,
            height,
            script: VecDeque::new(),
            open: true,
            journal: journal.clone(),
        }
    }

    /// A camera that is open but never produces a frame
    pub fn silent(journal: &Journal) -> Self {
        Self::new(0, 0, journal)
    }

    /// Upcoming reads: `true` delivers a frame, `false` delivers nothing
    pub fn with_script(mut self, script: &[bool]) -> Self {
        self.script = script.iter().copied().collect();
        self
    }

    pub fn boxed(self) -> Box<dyn CameraSource> {
        Box::new(self)
    }
}

impl CameraSource for FakeCamera {
    fn backend(&self) -> Option<CameraBackendType> {
        self.open.then_some(CameraBackendType::V4l2)
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        (self.open && self.width > 0).then_some((self.width, self.height))
    }

    fn read(&mut self) -> Option<Frame> {
        let scripted = self.script.pop_front().unwrap_or(self.width > 0);
        let frame = (self.open && scripted && self.width > 0)
            .then(|| Frame::black(self.width, self.height));
        self.journal.push(Event::Read {
            delivered: frame.is_some(),
        });
        frame
    }

    fn set_property(&mut self, property: CameraProperty, value: f64) -> Result<(), CameraError> {
        if !self.open {
            return Err(CameraError::NotOpen);
        }
        self.journal.push(Event::SetProperty(property, value));
        Ok(())
    }

    fn get_property(&self, _property: CameraProperty) -> Option<f64> {
        None
    }

    fn release(&mut self) {
        if self.open {
            self.open = false;
            self.journal.push(Event::Release);
        }
    }
}

pub struct FakeSink {
    path: PathBuf,
    journal: Journal,
}

impl VideoSink for FakeSink {
    fn push_frame(&mut self, frame: &Frame) -> Result<(), RecordingError> {
        self.journal.push(Event::SinkFrame {
            width: frame.width,
            height: frame.height,
        });
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<PathBuf, RecordingError> {
        self.journal.push(Event::SinkFinished(self.path.clone()));
        Ok(self.path.clone())
    }
}

pub struct FakeSinkFactory {
    journal: Journal,
    fail: bool,
}

impl FakeSinkFactory {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            fail: false,
        }
    }

    /// A factory whose sinks never open
    pub fn failing(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            fail: true,
        }
    }

    pub fn boxed(self) -> Box<dyn VideoSinkFactory> {
        Box::new(self)
    }
}

impl VideoSinkFactory for FakeSinkFactory {
    fn create(&self, spec: &RecordingSpec) -> Result<Box<dyn VideoSink>, RecordingError> {
        if self.fail {
            return Err(RecordingError::StartFailed("encoder unavailable".into()));
        }
        self.journal.push(Event::SinkOpened(spec.clone()));
        Ok(Box::new(FakeSink {
            path: spec.path.clone(),
            journal: self.journal.clone(),
        }))
    }
}
