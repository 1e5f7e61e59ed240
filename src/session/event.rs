// SPDX-License-Identifier: GPL-3.0-only

use super::mode::ActiveTimer;
use crate::errors::{MirrorError, TransportError};
use crate::messages::{
    Bound, Channel, ImageConfig, ImageFrame, ImageRequest, MirrorConfig, OmniVisionConfResponse,
    VisionHsvConfig,
};
use crate::transport::{BusClient, Topics};
use image::RgbImage;
use std::sync::Arc;

/// Everything the session reacts to
#[derive(Debug, Clone)]
pub enum Event {
    /// A camera frame came off the bus
    FrameArrived(ImageFrame),
    ModeToggled(ModeToggle),
    ConfigEdited(ConfigEdit),
    /// A periodic task fired
    Tick(ActiveTimer),
    Action(Action),
    Shortcut(Shortcut),
    /// Answer of the startup configuration request
    ConfigRetrieved(Result<OmniVisionConfResponse, TransportError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeToggle {
    Calibration,
    Drawing(bool),
    DrawOverlay(bool),
}

/// A single widget edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEdit {
    /// Label chooser index
    Label(usize),
    Threshold {
        channel: Channel,
        bound: Bound,
        value: u8,
    },
    /// Acquisition type chooser index
    AcquisitionMode(usize),
    Multiple(bool),
    Frequency(u32),
    Step(u16),
    MaxDistance(u16),
    Distances(String),
    CenterX(i32),
    CenterY(i32),
    Tilt(i32),
}

/// Buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Grab,
    Stop,
    SendMirror,
    SendVision,
    SendImage,
    Screenshot,
}

/// Single-key shortcuts of the calibration window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    RawMode,
    SegmentedMode,
    WorldMode,
    MapMode,
    /// Continuous feed
    Feed,
    /// One frame
    Single,
    FrequencyUp,
    FrequencyDown,
    ToggleCalibration,
}

impl Shortcut {
    pub fn from_key(key: &str) -> Option<Self> {
        let shortcut = match key.to_ascii_lowercase().as_str() {
            "r" => Shortcut::RawMode,
            "s" => Shortcut::SegmentedMode,
            "w" => Shortcut::WorldMode,
            "m" => Shortcut::MapMode,
            "f" => Shortcut::Feed,
            "g" => Shortcut::Single,
            "i" => Shortcut::FrequencyUp,
            "d" => Shortcut::FrequencyDown,
            "t" => Shortcut::ToggleCalibration,
            _ => return None,
        };
        Some(shortcut)
    }
}

/// Outbound message and the channel it belongs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    ImageRequest(ImageRequest),
    Mirror(MirrorConfig),
    Vision(VisionHsvConfig),
    Image(ImageConfig),
}

impl Outbound {
    pub fn topic<'a>(&self, topics: &'a Topics) -> &'a str {
        match self {
            Outbound::ImageRequest(_) => &topics.image_request,
            Outbound::Mirror(_) => &topics.mirror_config,
            Outbound::Vision(_) => &topics.vision_hsv_config,
            Outbound::Image(_) => &topics.image_config,
        }
    }

    pub fn publish(&self, bus: &BusClient, topics: &Topics) -> Result<(), TransportError> {
        let topic = self.topic(topics);
        match self {
            Outbound::ImageRequest(msg) => bus.publish(topic, msg),
            Outbound::Mirror(msg) => bus.publish(topic, msg),
            Outbound::Vision(msg) => bus.publish(topic, msg),
            Outbound::Image(msg) => bus.publish(topic, msg),
        }
    }
}

/// What the host has to carry out after a dispatch
#[derive(Debug, Clone)]
pub enum Effect {
    Publish(Outbound),
    /// Blocking error dialog for a rejected distance table
    MirrorRejected(MirrorError),
    SaveScreenshot(Arc<RgbImage>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{Deployment, Target};

    #[test]
    fn test_shortcut_keys() {
        assert_eq!(Shortcut::from_key("t"), Some(Shortcut::ToggleCalibration));
        assert_eq!(Shortcut::from_key("G"), Some(Shortcut::Single));
        assert_eq!(Shortcut::from_key("x"), None);
        assert_eq!(Shortcut::from_key("tt"), None);
    }

    #[test]
    fn test_outbound_topics() {
        let topics = Target::new(1, Deployment::Simulated).topics();
        let mirror = Outbound::Mirror(MirrorConfig::default());
        assert_eq!(mirror.topic(&topics), "minho_gazebo_robot1/mirrorConfig");
        let vision = Outbound::Vision(VisionHsvConfig::default());
        assert_eq!(vision.topic(&topics), "minho_gazebo_robot1/visionHSVConfig");
    }
}
