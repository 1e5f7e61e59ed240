// SPDX-License-Identifier: GPL-3.0-only

//! Bridge between the COSMIC runtime and the calibration session

use crate::app::state::{AppModel, Message};
use crate::session::{Effect, Event, Outbound};
use crate::storage;
use cosmic::Task;
use cosmic::widget::image::Handle;
use tracing::{debug, info, warn};

impl AppModel {
    /// Feed one event to the session and carry out what it asks for
    pub(crate) fn dispatch(&mut self, event: Event) -> Task<cosmic::Action<Message>> {
        let effects = self.session.dispatch(event);
        let task = self.apply_effects(effects);
        self.refresh_preview();
        task
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) -> Task<cosmic::Action<Message>> {
        let mut tasks = Vec::new();

        for effect in effects {
            match effect {
                Effect::Publish(outbound) => self.publish(&outbound),
                Effect::MirrorRejected(err) => self.mirror_error = Some(err),
                Effect::SaveScreenshot(frame) => {
                    let dir = self.config.screenshot_dir();
                    tasks.push(Task::perform(
                        storage::save_screenshot_async(frame, dir),
                        |result| cosmic::Action::App(Message::ScreenshotSaved(result)),
                    ));
                }
            }
        }

        Task::batch(tasks)
    }

    fn publish(&self, outbound: &Outbound) {
        let Some(bus) = &self.bus else {
            warn!(topic = outbound.topic(&self.topics), "Not connected, message dropped");
            return;
        };

        match outbound.publish(bus, &self.topics) {
            Ok(()) => match outbound {
                Outbound::ImageRequest(request) => debug!(?request, "Image request sent"),
                Outbound::Mirror(_) => info!("Mirror configuration sent"),
                Outbound::Vision(_) => info!("Vision configuration sent"),
                Outbound::Image(_) => info!("Image configuration sent"),
            },
            Err(err) => {
                warn!(topic = outbound.topic(&self.topics), error = %err, "Publish failed")
            }
        }
    }

    /// Rebuild the preview handle when the session shows something new
    fn refresh_preview(&mut self) {
        let generation = self.session.display_generation();
        if generation == self.preview_generation {
            return;
        }

        let display = self.session.display();
        self.preview = Handle::from_rgba(
            display.width(),
            display.height(),
            crate::frame::to_rgba(display),
        );
        self.preview_generation = generation;
    }
}
