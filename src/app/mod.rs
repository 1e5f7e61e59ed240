// SPDX-License-Identifier: GPL-3.0-only

//! Calibration window
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, BusStatus)
//! - `update`: Message routing
//! - `handlers`: Bus lifecycle, session bridge, settings and system handlers
//! - `view`: Preview and control panel
//! - `settings`: Settings drawer UI
//!
//! Controller logic lives in [`crate::session`]; this module only translates
//! widget messages into session events and session effects into tasks.

mod handlers;
pub mod settings;
mod state;
mod update;
mod view;

use crate::config::Config;
use crate::constants::timing;
use crate::fl;
use crate::messages::{AcquisitionMode, ImageFrame, Label};
use crate::mirror::MirrorStepPolicy;
use crate::session::{ActiveTimer, CalibrationSession, Shortcut};
use cosmic::app::context_drawer;
use cosmic::iced::{Subscription, event, keyboard};
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use state::{AppModel, BusStatus, ContextPage, Flags, Message};
use tracing::{info, warn};

const REPOSITORY: &str = "https://github.com/minhoteam/vision-calib";
const APP_ICON: &[u8] =
    include_bytes!("../../resources/icons/hicolor/scalable/apps/io.github.minhoteam.VisionCalib.svg");

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Robot selection from the command line.
    type Flags = Flags;

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.minhoteam.VisionCalib";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(core: cosmic::Core, flags: Self::Flags) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_svg_bytes(APP_ICON))
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        let (config_handler, config) = Config::load(Self::APP_ID);

        let target = flags.target;
        let session = CalibrationSession::new(config.mirror_step_policy);
        let display = session.display().clone();
        info!(robot_id = target.robot_id, deployment = ?target.deployment, "Starting calibration window");

        let mut app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            config_handler,
            target,
            topics: target.topics(),
            node_name: target.node_name(),
            bus: None,
            bus_status: BusStatus::default(),
            bus_epoch: 0,
            preview: widget::image::Handle::from_rgba(
                display.width(),
                display.height(),
                crate::frame::to_rgba(&display),
            ),
            preview_generation: session.display_generation(),
            session,
            mirror_error: None,
            last_screenshot: None,
            label_options: Label::ALL
                .iter()
                .map(|label| label.display_name().to_string())
                .collect(),
            acquisition_options: AcquisitionMode::ALL
                .iter()
                .map(|mode| mode.display_name().to_string())
                .collect(),
            theme_options: crate::config::AppTheme::ALL
                .iter()
                .map(|theme| theme.display_name().to_string())
                .collect(),
            step_policy_options: MirrorStepPolicy::ALL
                .iter()
                .map(|policy| policy.display_name().to_string())
                .collect(),
        };

        let connect_task = app.connect_bus();

        (app, connect_task)
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("preferences-system-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Settings))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
            ContextPage::Settings => self.settings_view(),
        })
    }

    /// Blocking error dialog for a refused distance table
    fn dialog(&self) -> Option<Element<'_, Self::Message>> {
        let error = self.mirror_error.as_ref()?;

        Some(
            widget::dialog()
                .title(fl!("bad-distances-title"))
                .body(error.to_string())
                .primary_action(
                    widget::button::suggested(fl!("ok")).on_press(Message::CloseDialog),
                )
                .into(),
        )
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        use cosmic::iced::futures::SinkExt;

        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        // Exactly one periodic task runs, chosen by the calibration flag
        let timer_sub = match self.session.mode().active_timer() {
            ActiveTimer::Threshold => cosmic::iced::time::every(timing::THRESHOLD_INTERVAL)
                .map(|_| Message::Tick(ActiveTimer::Threshold)),
            ActiveTimer::Interaction => cosmic::iced::time::every(timing::INTERACTION_INTERVAL)
                .map(|_| Message::Tick(ActiveTimer::Interaction)),
        };

        // Keys typed into a focused widget are already captured
        let keyboard_sub = event::listen_with(|event, status, _window| match event {
            cosmic::iced::Event::Keyboard(keyboard::Event::KeyPressed {
                key: keyboard::Key::Character(key),
                modifiers,
                ..
            }) if status == event::Status::Ignored && modifiers.is_empty() => {
                Shortcut::from_key(key.as_str()).map(Message::Shortcut)
            }
            _ => None,
        });

        let camera_sub = match &self.bus {
            Some(bus) if self.bus_status.is_connected() => {
                let bus = bus.clone();
                let topic = self.topics.camera.clone();

                Subscription::run_with_id(
                    ("camera", self.bus_epoch),
                    cosmic::iced::stream::channel(1, move |mut output| async move {
                        // Depth one: a slow UI only ever sees the newest frame
                        let mut frames = match bus.subscribe::<ImageFrame>(&topic, 1) {
                            Ok(frames) => frames,
                            Err(err) => {
                                warn!(error = %err, topic = %topic, "Camera subscription failed");
                                let _ = output.send(Message::BusClosed).await;
                                return;
                            }
                        };
                        info!(topic = %frames.topic(), "Camera subscription started");

                        let mut frame_count = 0u64;
                        while let Some(next) = frames.recv().await {
                            match next {
                                Ok(frame) => {
                                    frame_count += 1;
                                    if frame_count % 30 == 0 {
                                        info!(
                                            frame = frame_count,
                                            width = frame.width,
                                            height = frame.height,
                                            "Received camera frame"
                                        );
                                    }
                                    if output.send(Message::CameraFrame(frame)).await.is_err() {
                                        info!("Output channel closed - camera subscription cancelled");
                                        return;
                                    }
                                }
                                Err(err) => warn!(error = %err, "Undecodable camera message"),
                            }
                        }

                        info!("Camera stream ended");
                        let _ = output.send(Message::BusClosed).await;
                    }),
                )
            }
            _ => Subscription::none(),
        };

        Subscription::batch([config_sub, timer_sub, keyboard_sub, camera_sub])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}
