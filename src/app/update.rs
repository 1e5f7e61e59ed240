// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function routes every message to a handler method.
//!
//! # Handler Modules
//!
//! - `handlers::session`: Calibration input forwarded to the session, effects turned into tasks
//! - `handlers::bus`: Connection, reconnection and the startup configuration request
//! - `handlers::system`: URLs, context pages, screenshots and settings

use crate::app::state::{AppModel, Message};
use crate::session::{Event, ModeToggle};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),
            Message::CloseDialog => {
                self.mirror_error = None;
                Task::none()
            }

            // ===== Calibration =====
            Message::CameraFrame(frame) => self.dispatch(Event::FrameArrived(frame)),
            Message::Tick(timer) => self.dispatch(Event::Tick(timer)),
            Message::ToggleCalibration => {
                self.dispatch(Event::ModeToggled(ModeToggle::Calibration))
            }
            Message::SetDrawing(drawing) => {
                self.dispatch(Event::ModeToggled(ModeToggle::Drawing(drawing)))
            }
            Message::SetDrawOverlay(enabled) => {
                self.dispatch(Event::ModeToggled(ModeToggle::DrawOverlay(enabled)))
            }
            Message::Edit(edit) => self.dispatch(Event::ConfigEdited(edit)),
            Message::Action(action) => self.dispatch(Event::Action(action)),
            Message::Shortcut(shortcut) => self.dispatch(Event::Shortcut(shortcut)),

            // ===== Bus =====
            Message::BusConnected(result) => self.handle_bus_connected(result),
            Message::BusClosed => self.handle_bus_closed(),
            Message::Reconnect => self.connect_bus(),
            Message::ConfigRetrieved(result) => self.dispatch(Event::ConfigRetrieved(result)),

            // ===== System =====
            Message::ScreenshotSaved(result) => self.handle_screenshot_saved(result),
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::SetAppTheme(index) => self.handle_set_app_theme(index),
            Message::SetMirrorStepPolicy(index) => self.handle_set_mirror_step_policy(index),
        }
    }
}
