// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! Preview on the left, control panel on the right.

use crate::app::state::{AppModel, BusStatus, Message};
use crate::constants::{limits, ui};
use crate::fl;
use crate::messages::{Bound, Channel};
use crate::session::{Action, ConfigEdit, Indicator, SyncState};
use cosmic::Element;
use cosmic::iced::{Alignment, Color, ContentFit, Length};
use cosmic::widget;
use std::ops::RangeInclusive;

const IDLE_COLOR: Color = Color::from_rgb(0.85, 0.2, 0.2);
const CALIBRATING_COLOR: Color = Color::from_rgb(0.2, 0.7, 0.3);

impl AppModel {
    pub fn view(&self) -> Element<'_, Message> {
        let preview = widget::container(
            widget::image(self.preview.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill);

        let spacing = cosmic::theme::spacing();
        let panel = widget::column()
            .push(self.status_section())
            .push(widget::divider::horizontal::default())
            .push(self.acquisition_section())
            .push(widget::divider::horizontal::default())
            .push(self.mode_section())
            .push(widget::divider::horizontal::default())
            .push(self.label_section())
            .push(widget::divider::horizontal::default())
            .push(self.mirror_section())
            .push(widget::divider::horizontal::default())
            .push(self.image_section())
            .spacing(spacing.space_s)
            .padding(spacing.space_s);

        widget::row()
            .push(preview)
            .push(
                widget::scrollable(panel)
                    .width(Length::Fixed(ui::PANEL_WIDTH))
                    .height(Length::Fill),
            )
            .into()
    }

    fn status_section(&self) -> Element<'_, Message> {
        let color = match self.session.mode().indicator() {
            Indicator::Idle => IDLE_COLOR,
            Indicator::Calibrating => CALIBRATING_COLOR,
        };

        let robot = widget::text(fl!("calibration-for-robot", robot = self.target.robot_id))
            .size(16)
            .font(cosmic::font::bold())
            .class(cosmic::theme::Text::Color(color));

        let bus = match &self.bus_status {
            BusStatus::Connecting => widget::text(fl!("bus-connecting")).size(12),
            BusStatus::Connected => widget::text(fl!("bus-connected")).size(12),
            BusStatus::Offline(reason) => widget::text(fl!("bus-offline", reason = reason.as_str()))
                .size(12)
                .class(cosmic::theme::Text::Color(IDLE_COLOR)),
        };

        let mut column = widget::column().push(robot).push(bus).spacing(4);

        if self.session.sync_state() == SyncState::Unsynchronized {
            column = column.push(widget::text(fl!("unsynchronized")).size(12));
        }

        if !self.bus_status.is_connected() && !matches!(self.bus_status, BusStatus::Connecting) {
            column = column.push(widget::button::standard(fl!("reconnect")).on_press(Message::Reconnect));
        }

        column.into()
    }

    fn acquisition_section(&self) -> Element<'_, Message> {
        let controls = self.session.controls();

        let mode_dropdown = widget::dropdown(
            &self.acquisition_options,
            Some(controls.acquisition_mode.index()),
            |index| Message::Edit(ConfigEdit::AcquisitionMode(index)),
        );

        let frequency = widget::row()
            .push(widget::text(fl!("frequency")).width(Length::Fill))
            .push(
                widget::button::standard("-")
                    .on_press(Message::Edit(ConfigEdit::Frequency(controls.frequency.saturating_sub(1)))),
            )
            .push(
                widget::text(controls.frequency.to_string())
                    .width(Length::Fixed(ui::VALUE_WIDTH))
                    .align_x(Alignment::Center),
            )
            .push(
                widget::button::standard("+")
                    .on_press(Message::Edit(ConfigEdit::Frequency(controls.frequency.saturating_add(1)))),
            )
            .spacing(ui::CONTROL_SPACING)
            .align_y(Alignment::Center);

        let buttons = widget::row()
            .push(widget::button::suggested(fl!("grab")).on_press(Message::Action(Action::Grab)))
            .push(widget::button::standard(fl!("stop")).on_press(Message::Action(Action::Stop)))
            .push(
                widget::button::standard(fl!("screenshot"))
                    .on_press(Message::Action(Action::Screenshot)),
            )
            .spacing(ui::CONTROL_SPACING);

        let mut column = widget::column()
            .push(section_title(fl!("acquisition")))
            .push(mode_dropdown)
            .push(
                widget::checkbox(fl!("continuous"), controls.is_multiple)
                    .on_toggle(|multiple| Message::Edit(ConfigEdit::Multiple(multiple))),
            )
            .push(frequency)
            .push(buttons)
            .spacing(ui::CONTROL_SPACING);

        if let Some(path) = &self.last_screenshot {
            column = column.push(
                widget::text(fl!("screenshot-saved", path = path.display().to_string()))
                    .size(11)
                    .class(cosmic::theme::Text::Accent),
            );
        }

        column.into()
    }

    fn mode_section(&self) -> Element<'_, Message> {
        let mode = self.session.mode();

        widget::column()
            .push(section_title(fl!("modes")))
            .push(
                widget::row()
                    .push(widget::text(fl!("calibration-mode")).width(Length::Fill))
                    .push(widget::toggler(mode.calibrating).on_toggle(|_| Message::ToggleCalibration))
                    .align_y(Alignment::Center),
            )
            .push(widget::checkbox(fl!("draw-mode"), mode.drawing).on_toggle(Message::SetDrawing))
            .push(
                widget::checkbox(fl!("draw-center"), mode.draw_overlay)
                    .on_toggle(Message::SetDrawOverlay),
            )
            .spacing(ui::CONTROL_SPACING)
            .into()
    }

    fn label_section(&self) -> Element<'_, Message> {
        let label = self.session.active_label();
        let label_dropdown = widget::dropdown(
            &self.label_options,
            Some(self.session.controls().label.index()),
            |index| Message::Edit(ConfigEdit::Label(index)),
        );

        let mut column = widget::column()
            .push(section_title(fl!("label-thresholds")))
            .push(label_dropdown)
            .spacing(ui::CONTROL_SPACING);

        for (channel, name) in [
            (Channel::Hue, "H"),
            (Channel::Saturation, "S"),
            (Channel::Value, "V"),
        ] {
            let range = label.range(channel);
            for (bound, suffix) in [(Bound::Min, "min"), (Bound::Max, "max")] {
                column = column.push(slider_row(
                    format!("{} {}", name, suffix),
                    i32::from(range.get(bound)),
                    i32::from(limits::HSV_MIN)..=i32::from(limits::HSV_MAX),
                    move |value| {
                        Message::Edit(ConfigEdit::Threshold {
                            channel,
                            bound,
                            value: to_u8(value),
                        })
                    },
                ));
            }
        }

        column
            .push(
                widget::button::standard(fl!("send-vision"))
                    .on_press(Message::Action(Action::SendVision)),
            )
            .into()
    }

    fn mirror_section(&self) -> Element<'_, Message> {
        let controls = self.session.controls();

        widget::column()
            .push(section_title(fl!("mirror")))
            .push(slider_row(
                fl!("step"),
                i32::from(controls.step),
                i32::from(limits::STEP_MIN)..=i32::from(limits::STEP_MAX),
                |step| Message::Edit(ConfigEdit::Step(to_u16(step))),
            ))
            .push(slider_row(
                fl!("max-distance"),
                i32::from(controls.max_distance),
                i32::from(limits::MAX_DISTANCE_MIN)..=i32::from(limits::MAX_DISTANCE_MAX),
                |max_distance| Message::Edit(ConfigEdit::MaxDistance(to_u16(max_distance))),
            ))
            .push(
                widget::text_input(fl!("distances-placeholder"), &controls.distances)
                    .on_input(|text| Message::Edit(ConfigEdit::Distances(text))),
            )
            .push(
                widget::button::standard(fl!("send-mirror"))
                    .on_press(Message::Action(Action::SendMirror)),
            )
            .spacing(ui::CONTROL_SPACING)
            .into()
    }

    fn image_section(&self) -> Element<'_, Message> {
        let geometry = self.session.calibrator().image_configuration();

        widget::column()
            .push(section_title(fl!("image-geometry")))
            .push(slider_row(
                fl!("center-x"),
                geometry.center_x,
                limits::CENTER_MIN..=limits::CENTER_MAX,
                |x| Message::Edit(ConfigEdit::CenterX(x)),
            ))
            .push(slider_row(
                fl!("center-y"),
                geometry.center_y,
                limits::CENTER_MIN..=limits::CENTER_MAX,
                |y| Message::Edit(ConfigEdit::CenterY(y)),
            ))
            .push(slider_row(
                fl!("tilt"),
                geometry.tilt,
                limits::TILT_MIN..=limits::TILT_MAX,
                |tilt| Message::Edit(ConfigEdit::Tilt(tilt)),
            ))
            .push(
                widget::button::standard(fl!("send-image"))
                    .on_press(Message::Action(Action::SendImage)),
            )
            .spacing(ui::CONTROL_SPACING)
            .into()
    }
}

fn section_title<'a>(title: String) -> Element<'a, Message> {
    widget::text(title).size(14).font(cosmic::font::bold()).into()
}

/// Name, slider and current value on one line
fn slider_row<'a>(
    name: String,
    value: i32,
    range: RangeInclusive<i32>,
    on_change: impl Fn(i32) -> Message + 'a,
) -> Element<'a, Message> {
    widget::row()
        .push(widget::text(name).width(Length::Fixed(ui::LABEL_WIDTH)))
        .push(widget::slider(range, value, on_change).width(Length::Fill))
        .push(
            widget::text(value.to_string())
                .width(Length::Fixed(ui::VALUE_WIDTH))
                .align_x(Alignment::End),
        )
        .spacing(ui::CONTROL_SPACING)
        .align_y(Alignment::Center)
        .into()
}

/// Slider values stay inside the slider range, saturate anything else
fn to_u8(value: i32) -> u8 {
    u8::try_from(value.max(0)).unwrap_or(u8::MAX)
}

fn to_u16(value: i32) -> u16 {
    u16::try_from(value.max(0)).unwrap_or(u16::MAX)
}
