// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling

use crate::app::state::{AppModel, Message};
use crate::backends::camera::CameraProperty;
use crate::media::frame::PreviewImage;
use crate::session::TickOutcome;
use cosmic::Task;
use cosmic::widget;
use tracing::{info, warn};

impl AppModel {
    /// Main message handler
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            Message::Tick => self.handle_tick(),
            Message::TakePhoto => self.handle_take_photo(),
            Message::ToggleRecording => self.handle_toggle_recording(),
            Message::SliderChanged(property, value) => self.handle_slider_changed(property, value),
            Message::WindowCloseRequested => self.handle_close_requested(),
        }
    }

    fn handle_tick(&mut self) -> Task<cosmic::Action<Message>> {
        match self.session.tick() {
            TickOutcome::Frame(image) | TickOutcome::Placeholder(image) => {
                self.preview = Some(preview_handle(image));
            }
            TickOutcome::Skipped | TickOutcome::Inactive => {}
        }
        Task::none()
    }

    fn handle_take_photo(&mut self) -> Task<cosmic::Action<Message>> {
        if let Some(path) = self.session.take_photo() {
            self.status = Some(path);
        }
        Task::none()
    }

    fn handle_toggle_recording(&mut self) -> Task<cosmic::Action<Message>> {
        if self.session.is_recording() {
            if let Some(path) = self.session.stop_recording() {
                self.status = Some(path);
            }
        } else {
            self.session.toggle_record();
        }
        Task::none()
    }

    fn handle_slider_changed(
        &mut self,
        property: CameraProperty,
        value: f64,
    ) -> Task<cosmic::Action<Message>> {
        if let Err(e) = self
            .settings_panel
            .on_change(self.session.camera_mut(), property, value)
        {
            warn!(%property, value, error = %e, "Failed to apply slider value");
        }
        Task::none()
    }

    fn handle_close_requested(&mut self) -> Task<cosmic::Action<Message>> {
        info!("Window close requested");
        self.session.shutdown();
        cosmic::iced::exit()
    }
}

fn preview_handle(image: PreviewImage) -> widget::image::Handle {
    widget::image::Handle::from_rgba(image.width, image.height, image.rgba)
}
