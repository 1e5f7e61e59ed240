// SPDX-License-Identifier: GPL-3.0-only

//! Calibration session
//!
//! All controller state of the calibration window, independent of any
//! toolkit. The host feeds [`Event`]s through [`CalibrationSession::dispatch`]
//! and carries out the returned [`Effect`]s; what the preview should show is
//! read back through [`CalibrationSession::display`].

mod event;
mod mode;
mod widgets;

pub use event::{Action, ConfigEdit, Effect, Event, ModeToggle, Outbound, Shortcut};
pub use mode::{ActiveTimer, Indicator, ModeState, RenderPath, RenderTrigger};
pub use widgets::Controls;

use crate::calibrator::ImageCalibrator;
use crate::constants::limits;
use crate::errors::TransportError;
use crate::frame;
use crate::messages::{
    AcquisitionMode, ImageConfig, ImageFrame, Label, LabelConfiguration, OmniVisionConfResponse,
};
use crate::mirror::{self, MirrorStepPolicy};
use image::RgbImage;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Whether the remote configuration has been loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Pending,
    Synchronized,
    /// Retrieval failed, running on defaults
    Unsynchronized,
}

#[derive(Debug, Clone)]
pub struct CalibrationSession {
    calibrator: ImageCalibrator,
    controls: Controls,
    mode: ModeState,
    step_policy: MirrorStepPolicy,
    sync: SyncState,
    /// Latest decoded frame, overwritten on every arrival
    current: Arc<RgbImage>,
    /// What the preview shows
    display: Arc<RgbImage>,
    /// Bumped whenever `display` is replaced
    generation: u64,
}

impl Default for CalibrationSession {
    fn default() -> Self {
        Self::new(MirrorStepPolicy::default())
    }
}

impl CalibrationSession {
    pub fn new(step_policy: MirrorStepPolicy) -> Self {
        let mut calibrator = ImageCalibrator::new();
        calibrator.image_config_from_msg(ImageConfig {
            center_x: limits::CENTER_DEFAULT,
            center_y: limits::CENTER_DEFAULT,
            tilt: 0,
        });
        let placeholder = Arc::new(frame::placeholder());

        Self {
            calibrator,
            controls: Controls::default(),
            mode: ModeState::default(),
            step_policy,
            sync: SyncState::default(),
            current: placeholder.clone(),
            display: placeholder,
            generation: 0,
        }
    }

    pub fn calibrator(&self) -> &ImageCalibrator {
        &self.calibrator
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn mode(&self) -> ModeState {
        self.mode
    }

    pub fn sync_state(&self) -> SyncState {
        self.sync
    }

    pub fn step_policy(&self) -> MirrorStepPolicy {
        self.step_policy
    }

    pub fn set_step_policy(&mut self, policy: MirrorStepPolicy) {
        self.step_policy = policy;
    }

    /// Thresholds of the label selected in the chooser
    pub fn active_label(&self) -> LabelConfiguration {
        self.calibrator.label_configuration(self.controls.label)
    }

    pub fn current_frame(&self) -> &Arc<RgbImage> {
        &self.current
    }

    pub fn display(&self) -> &Arc<RgbImage> {
        &self.display
    }

    pub fn display_generation(&self) -> u64 {
        self.generation
    }

    pub fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::FrameArrived(frame) => self.on_frame(&frame),
            Event::ModeToggled(toggle) => self.on_mode_toggled(toggle),
            Event::ConfigEdited(edit) => self.on_config_edited(edit),
            Event::Tick(timer) => self.on_tick(timer),
            Event::Action(action) => self.on_action(action),
            Event::Shortcut(shortcut) => self.on_shortcut(shortcut),
            Event::ConfigRetrieved(result) => self.on_config_retrieved(result),
        }
    }

    fn show(&mut self, image: Arc<RgbImage>) {
        self.display = image;
        self.generation = self.generation.wrapping_add(1);
    }

    fn grab(&self) -> Vec<Effect> {
        vec![Effect::Publish(Outbound::ImageRequest(
            self.controls.image_request(),
        ))]
    }

    fn select_mode(&mut self, mode: AcquisitionMode) -> Vec<Effect> {
        if self.controls.acquisition_mode == mode {
            return Vec::new();
        }
        self.controls.acquisition_mode = mode;
        self.grab()
    }

    fn on_frame(&mut self, frame: &ImageFrame) -> Vec<Effect> {
        let image = match frame::decode_frame(frame) {
            Ok(image) => Arc::new(image),
            Err(err) => {
                warn!(error = %err, "Dropping camera frame");
                return Vec::new();
            }
        };
        self.current = image;

        if self.mode.render_path(RenderTrigger::Frame) == RenderPath::Raw {
            self.show(self.current.clone());
        }
        Vec::new()
    }

    fn on_tick(&mut self, timer: ActiveTimer) -> Vec<Effect> {
        match self.mode.render_path(RenderTrigger::Tick(timer)) {
            RenderPath::Threshold => {
                let binary = self.calibrator.get_binary(&self.current, &self.active_label());
                self.show(Arc::new(binary));
            }
            RenderPath::Crosshair => {
                let mut annotated = (*self.current).clone();
                self.calibrator.draw_center(&mut annotated);
                self.show(Arc::new(annotated));
            }
            RenderPath::Raw | RenderPath::Hold => {}
        }
        Vec::new()
    }

    fn on_mode_toggled(&mut self, toggle: ModeToggle) -> Vec<Effect> {
        match toggle {
            ModeToggle::Calibration => {
                self.mode.toggle_calibration();
                info!(calibrating = self.mode.calibrating, "Calibration mode toggled");
                // Thresholds are tuned on raw frames
                self.controls.acquisition_mode = AcquisitionMode::Raw;
                self.grab()
            }
            ModeToggle::Drawing(drawing) => {
                self.mode.drawing = drawing;
                Vec::new()
            }
            ModeToggle::DrawOverlay(enabled) => {
                self.mode.draw_overlay = enabled;
                Vec::new()
            }
        }
    }

    fn on_config_edited(&mut self, edit: ConfigEdit) -> Vec<Effect> {
        match edit {
            ConfigEdit::Label(index) => match Label::from_index(index) {
                Ok(label) => self.controls.label = label,
                Err(err) => warn!(error = %err, "Ignoring label selection"),
            },
            ConfigEdit::Threshold {
                channel,
                bound,
                value,
            } => {
                self.calibrator
                    .update_current_configuration(self.controls.label, channel, bound, value);
            }
            ConfigEdit::AcquisitionMode(index) => match AcquisitionMode::from_index(index) {
                Some(mode) => return self.select_mode(mode),
                None => warn!(index, "Ignoring unknown acquisition mode"),
            },
            ConfigEdit::Multiple(is_multiple) => self.controls.is_multiple = is_multiple,
            ConfigEdit::Frequency(frequency) => {
                let previous = self.controls.frequency;
                self.controls.set_frequency(frequency);
                if self.controls.frequency != previous {
                    return self.grab();
                }
            }
            ConfigEdit::Step(step) => {
                self.controls.step = step.clamp(limits::STEP_MIN, limits::STEP_MAX);
            }
            ConfigEdit::MaxDistance(max_distance) => {
                self.controls.max_distance =
                    max_distance.clamp(limits::MAX_DISTANCE_MIN, limits::MAX_DISTANCE_MAX);
            }
            ConfigEdit::Distances(text) => self.controls.distances = text,
            ConfigEdit::CenterX(x) => self.edit_geometry(|geometry| {
                geometry.center_x = x.clamp(limits::CENTER_MIN, limits::CENTER_MAX)
            }),
            ConfigEdit::CenterY(y) => self.edit_geometry(|geometry| {
                geometry.center_y = y.clamp(limits::CENTER_MIN, limits::CENTER_MAX)
            }),
            ConfigEdit::Tilt(tilt) => self.edit_geometry(|geometry| {
                geometry.tilt = tilt.clamp(limits::TILT_MIN, limits::TILT_MAX)
            }),
        }
        Vec::new()
    }

    /// Geometry edits go to the calibrator immediately, publishing waits for the send action
    fn edit_geometry(&mut self, edit: impl FnOnce(&mut ImageConfig)) {
        let mut geometry = self.calibrator.image_configuration();
        edit(&mut geometry);
        self.calibrator.image_config_from_msg(geometry);
    }

    fn on_action(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Grab => self.grab(),
            Action::Stop => vec![Effect::Publish(Outbound::ImageRequest(
                self.controls.stop_request(),
            ))],
            Action::SendMirror => self.send_mirror(),
            Action::SendVision => vec![Effect::Publish(Outbound::Vision(
                self.calibrator.lut_configuration(),
            ))],
            Action::SendImage => vec![Effect::Publish(Outbound::Image(
                self.calibrator.image_configuration(),
            ))],
            Action::Screenshot => vec![Effect::SaveScreenshot(self.current.clone())],
        }
    }

    fn send_mirror(&mut self) -> Vec<Effect> {
        match mirror::build_mirror_config(
            &self.controls.distances,
            self.controls.max_distance,
            self.controls.step,
            self.step_policy,
        ) {
            Ok(config) => {
                info!(entries = config.pixel_distances.len(), "Mirror configuration accepted");
                self.calibrator.mirror_config_from_msg(config.clone());
                vec![Effect::Publish(Outbound::Mirror(config))]
            }
            Err(err) => {
                error!(error = %err, "Bad mirror configuration");
                vec![Effect::MirrorRejected(err)]
            }
        }
    }

    fn on_shortcut(&mut self, shortcut: Shortcut) -> Vec<Effect> {
        debug!(?shortcut, "Shortcut");
        match shortcut {
            Shortcut::RawMode => self.select_mode(AcquisitionMode::Raw),
            Shortcut::SegmentedMode => self.select_mode(AcquisitionMode::Segmented),
            Shortcut::WorldMode => self.select_mode(AcquisitionMode::World),
            Shortcut::MapMode => self.select_mode(AcquisitionMode::Map),
            Shortcut::Feed => {
                self.controls.is_multiple = true;
                self.grab()
            }
            Shortcut::Single => {
                self.controls.is_multiple = false;
                self.grab()
            }
            Shortcut::FrequencyUp => {
                self.controls
                    .set_frequency(self.controls.frequency.saturating_add(1));
                self.grab()
            }
            Shortcut::FrequencyDown => {
                self.controls
                    .set_frequency(self.controls.frequency.saturating_sub(1));
                self.grab()
            }
            Shortcut::ToggleCalibration => self.on_mode_toggled(ModeToggle::Calibration),
        }
    }

    fn on_config_retrieved(
        &mut self,
        result: Result<OmniVisionConfResponse, TransportError>,
    ) -> Vec<Effect> {
        match result {
            Ok(response) => {
                info!("Loaded configuration from the robot");
                self.controls.load_mirror(&response.mirror_conf);
                self.calibrator.lut_config_from_msg(response.vision_conf);
                self.calibrator.mirror_config_from_msg(response.mirror_conf);
                self.calibrator.image_config_from_msg(response.image_conf);
                self.sync = SyncState::Synchronized;
            }
            Err(err) => {
                error!(error = %err, "Failed to retrieve configuration from the robot, using defaults");
                self.sync = SyncState::Unsynchronized;
            }
        }
        Vec::new()
    }
}
