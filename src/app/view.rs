// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! A single row: the camera preview on the left, buttons and sliders on the
//! right.

use crate::app::state::{AppModel, Message};
use crate::backends::camera::CameraProperty;
use crate::constants::ui;
use crate::controls::SliderRange;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, ContentFit, Length};
use cosmic::widget;

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        widget::row()
            .push(self.build_preview())
            .push(self.build_controls())
            .spacing(ui::CONTROL_SPACING)
            .padding(ui::CONTROLS_PADDING)
            .into()
    }

    fn preview_size(&self) -> (Length, Length) {
        match self.profile.display_size {
            Some((width, height)) => (
                Length::Fixed(width as f32),
                Length::Fixed(height as f32),
            ),
            None => (Length::Fill, Length::Fill),
        }
    }

    fn build_preview(&self) -> Element<'_, Message> {
        let (width, height) = self.preview_size();

        let content: Element<'_, Message> = match &self.preview {
            Some(handle) => widget::image::Image::new(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(width)
                .height(height)
                .into(),
            None => widget::text::body(fl!("no-signal")).into(),
        };

        widget::container(content)
            .center_x(width)
            .center_y(height)
            .style(|_theme| widget::container::Style {
                background: Some(Background::Color(Color::BLACK)),
                text_color: Some(Color::WHITE),
                ..Default::default()
            })
            .into()
    }

    fn build_controls(&self) -> Element<'_, Message> {
        let record_label = if self.session.is_recording() {
            fl!("stop-recording")
        } else {
            fl!("record-video")
        };

        let record_button = if self.session.is_recording() {
            widget::button::destructive(record_label)
        } else {
            widget::button::standard(record_label)
        };

        let mut column = widget::column()
            .push(widget::button::suggested(fl!("take-photo")).on_press(Message::TakePhoto))
            .push(record_button.on_press(Message::ToggleRecording))
            .spacing(ui::CONTROL_SPACING)
            .width(Length::Fixed(ui::CONTROLS_WIDTH));

        for property in CameraProperty::ALL {
            column = column.push(self.build_slider(property));
        }

        if let Some(path) = &self.status {
            column = column.push(widget::text::caption(
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            ));
        }

        column.into()
    }

    fn build_slider(&self, property: CameraProperty) -> Element<'_, Message> {
        let range = SliderRange::of(property);
        let value = self.settings_panel.value(property);
        let label = match property {
            CameraProperty::Brightness => fl!("brightness"),
            CameraProperty::Contrast => fl!("contrast"),
            CameraProperty::Exposure => fl!("exposure"),
        };
        let value_text = match property {
            CameraProperty::Exposure => format!("{:.1}", value),
            _ => format!("{:.0}", value),
        };

        widget::column()
            .push(
                widget::row()
                    .push(widget::text::body(label).width(Length::Fill))
                    .push(widget::text::body(value_text))
                    .align_y(Alignment::Center),
            )
            .push(
                widget::slider(range.min..=range.max, value, move |v| {
                    Message::SliderChanged(property, v)
                })
                .step(range.step)
                .width(Length::Fill),
            )
            .spacing(2)
            .into()
    }
}
