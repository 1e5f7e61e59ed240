// SPDX-License-Identifier: GPL-3.0-only

//! Navigation, screenshots and settings handlers

use crate::app::state::{AppModel, ContextPage, Message};
use crate::config::AppTheme;
use crate::errors::AppResult;
use crate::mirror::MirrorStepPolicy;
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use std::path::PathBuf;
use tracing::{error, info};

impl AppModel {
    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    pub(crate) fn handle_screenshot_saved(
        &mut self,
        result: AppResult<PathBuf>,
    ) -> Task<cosmic::Action<Message>> {
        match result {
            Ok(path) => {
                info!(path = %path.display(), "Screenshot saved");
                self.last_screenshot = Some(path);
            }
            Err(err) => error!(error = %err, "Failed to save screenshot"),
        }
        Task::none()
    }

    pub(crate) fn handle_update_config(
        &mut self,
        config: crate::config::Config,
    ) -> Task<cosmic::Action<Message>> {
        info!("UpdateConfig received");
        self.session.set_step_policy(config.mirror_step_policy);
        self.config = config;
        Task::none()
    }

    pub(crate) fn handle_set_app_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let Some(&app_theme) = AppTheme::ALL.get(index) else {
            return Task::none();
        };

        info!(?app_theme, "Setting application theme");
        self.config.app_theme = app_theme;
        self.save_config("app theme");

        cosmic::command::set_theme(app_theme.theme())
    }

    pub(crate) fn handle_set_mirror_step_policy(
        &mut self,
        index: usize,
    ) -> Task<cosmic::Action<Message>> {
        let Some(&policy) = MirrorStepPolicy::ALL.get(index) else {
            return Task::none();
        };

        info!(?policy, "Setting mirror step policy");
        self.config.mirror_step_policy = policy;
        self.session.set_step_policy(policy);
        self.save_config("mirror step policy");
        Task::none()
    }

    fn save_config(&self, what: &str) {
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, setting = what, "Failed to save setting");
        }
    }
}
