// SPDX-License-Identifier: MPL-2.0

//! Main application module
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, AppFlags)
//! - `view`: Preview and control column rendering
//! - `update`: Message handling
//!
//! The camera is opened before the window exists and handed in through
//! [`AppFlags`]; a missing camera under the strict startup policy never
//! reaches this module.

mod state;
mod update;
mod view;

use crate::controls::SettingsPanel;
use crate::fl;
use cosmic::iced::{Subscription, window};
use cosmic::widget;
use cosmic::{Element, Task};
use futures::SinkExt;
pub use state::{AppFlags, AppModel, Message};
use tracing::{debug, info};

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = AppFlags;

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = crate::constants::APP_ID;

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with the opened session.
    fn init(core: cosmic::Core, flags: Self::Flags) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let AppFlags { config, mut session } = flags;

        let profile = *session.settings();
        let settings_panel = SettingsPanel::new(profile.slider_defaults);
        // Bring the device in line with the initial slider positions
        settings_panel.apply_all(session.camera_mut());

        info!(
            profile = %config.profile,
            backend = ?session.camera().backend(),
            tick_ms = profile.tick_interval.as_millis() as u64,
            "Application started"
        );

        let app = AppModel {
            core,
            config,
            profile,
            session,
            settings_panel,
            preview: None,
            status: None,
        };

        (app, Task::none())
    }

    /// Elements to pack at the start of the header bar.
    fn header_start(&self) -> Vec<Element<'_, Self::Message>> {
        vec![widget::text::heading(fl!("app-title")).into()]
    }

    /// Stop recording and release the camera before the window goes away.
    fn on_close_requested(&self, _id: window::Id) -> Option<Self::Message> {
        Some(Message::WindowCloseRequested)
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Poll loop: one `Tick` per interval for as long as the application runs.
    fn subscription(&self) -> Subscription<Self::Message> {
        let tick_interval = self.profile.tick_interval;

        Subscription::run_with_id(
            ("poll-loop", tick_interval),
            cosmic::iced::stream::channel(1, move |mut output| async move {
                debug!(?tick_interval, "Poll loop started");
                let mut interval = tokio::time::interval(tick_interval);
                interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

                loop {
                    interval.tick().await;
                    if output.send(Message::Tick).await.is_err() {
                        debug!("Poll loop receiver closed");
                        break;
                    }
                }
            }),
        )
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}
