// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::backends::camera::CameraProperty;
use crate::config::{Config, ProfileSettings};
use crate::controls::SettingsPanel;
use crate::session::Session;
use cosmic::widget;
use std::path::PathBuf;

/// Startup data handed to the application
pub struct AppFlags {
    pub config: Config,
    pub session: Session,
}

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Effective configuration (persisted values plus command line overrides)
    pub config: Config,
    pub profile: ProfileSettings,
    /// Camera, capture controller and shutdown ordering
    pub session: Session,
    pub settings_panel: SettingsPanel,
    /// Last image shown in the preview area
    pub preview: Option<widget::image::Handle>,
    /// Most recently written file
    pub status: Option<PathBuf>,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    /// Poll loop tick
    Tick,
    /// "Take Photo" pressed
    TakePhoto,
    /// "Record Video" / "Stop Recording" pressed
    ToggleRecording,
    /// A slider moved
    SliderChanged(CameraProperty, f64),
    /// The main window is about to close
    WindowCloseRequested,
}
