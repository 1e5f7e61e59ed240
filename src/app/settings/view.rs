// SPDX-License-Identifier: GPL-3.0-only

//! Settings drawer view

use crate::app::state::{AppModel, ContextPage, Message};
use crate::config::AppTheme;
use crate::constants::app_info;
use crate::fl;
use crate::mirror::MirrorStepPolicy;
use cosmic::Element;
use cosmic::app::context_drawer;
use cosmic::widget;

impl AppModel {
    /// Create the settings view for the context drawer
    ///
    /// Shows the theme, the mirror step policy and where this instance
    /// connects to.
    pub fn settings_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let theme_index = AppTheme::ALL
            .iter()
            .position(|theme| *theme == self.config.app_theme);
        let theme_dropdown =
            widget::dropdown(&self.theme_options, theme_index, Message::SetAppTheme);

        let policy_index = MirrorStepPolicy::ALL
            .iter()
            .position(|policy| *policy == self.config.mirror_step_policy);
        let policy_dropdown = widget::dropdown(
            &self.step_policy_options,
            policy_index,
            Message::SetMirrorStepPolicy,
        );

        let address = self
            .target
            .bus_address(&self.config.bus_host_prefix, self.config.bus_port);

        let settings_column: Element<'_, Message> = widget::column()
            .push(widget::text(fl!("theme")).size(16).font(cosmic::font::bold()))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(theme_dropdown)
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::text(fl!("mirror-step-policy"))
                    .size(16)
                    .font(cosmic::font::bold()),
            )
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(policy_dropdown)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(widget::text(fl!("connection")).size(16).font(cosmic::font::bold()))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(widget::text(fl!("bus-address", address = address.to_string())).size(12))
            .push(widget::text(fl!("node-name", node = self.node_name.as_str())).size(12))
            .push(
                widget::text(fl!(
                    "screenshot-dir",
                    path = self.config.screenshot_dir().display().to_string()
                ))
                .size(12),
            )
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::text(fl!("version", version = app_info::version()))
                    .size(12)
                    .class(cosmic::theme::Text::Accent),
            )
            .spacing(0)
            .into();

        context_drawer::context_drawer(
            settings_column,
            Message::ToggleContextPage(ContextPage::Settings),
        )
        .title(fl!("settings"))
    }
}
