// SPDX-License-Identifier: GPL-3.0-only

//! Wire types exchanged with the robot's vision process
//!
//! Every type here is serialized as JSON inside a bus envelope (see
//! [`crate::transport`]). Field names follow the robot's message definitions.

use crate::errors::LabelIndexError;
use serde::{Deserialize, Serialize};

/// Color classes the vision process segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Label {
    #[default]
    Field,
    Line,
    Ball,
    Obstacle,
}

impl Label {
    /// All labels in chooser order
    pub const ALL: [Label; 4] = [Label::Field, Label::Line, Label::Ball, Label::Obstacle];

    /// Bounds-checked lookup from a chooser index
    pub fn from_index(index: usize) -> Result<Self, LabelIndexError> {
        Self::ALL.get(index).copied().ok_or(LabelIndexError(index))
    }

    /// Position of this label in the chooser
    pub fn index(self) -> usize {
        match self {
            Label::Field => 0,
            Label::Line => 1,
            Label::Ball => 2,
            Label::Obstacle => 3,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Label::Field => "Field",
            Label::Line => "Line",
            Label::Ball => "Ball",
            Label::Obstacle => "Obstacle",
        }
    }
}

/// HSV channel selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Hue,
    Saturation,
    Value,
}

/// Which end of a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    Min,
    Max,
}

/// Inclusive channel range on the 0-255 scale
///
/// `min > max` is representable and selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub min: u8,
    pub max: u8,
}

impl Default for Range {
    fn default() -> Self {
        Self { min: 0, max: 255 }
    }
}

impl Range {
    pub fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u8) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn get(&self, bound: Bound) -> u8 {
        match bound {
            Bound::Min => self.min,
            Bound::Max => self.max,
        }
    }

    pub fn set(&mut self, bound: Bound, value: u8) {
        match bound {
            Bound::Min => self.min = value,
            Bound::Max => self.max = value,
        }
    }
}

/// Threshold ranges of one label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct LabelConfiguration {
    pub h: Range,
    pub s: Range,
    pub v: Range,
}

impl LabelConfiguration {
    pub fn range(&self, channel: Channel) -> &Range {
        match channel {
            Channel::Hue => &self.h,
            Channel::Saturation => &self.s,
            Channel::Value => &self.v,
        }
    }

    pub fn range_mut(&mut self, channel: Channel) -> &mut Range {
        match channel {
            Channel::Hue => &mut self.h,
            Channel::Saturation => &mut self.s,
            Channel::Value => &mut self.v,
        }
    }

    /// Whether an HSV pixel falls inside all three ranges
    pub fn matches(&self, hsv: [u8; 3]) -> bool {
        self.h.contains(hsv[0]) && self.s.contains(hsv[1]) && self.v.contains(hsv[2])
    }
}

/// HSV thresholds for every label, published on the vision channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VisionHsvConfig {
    pub field: LabelConfiguration,
    pub line: LabelConfiguration,
    pub ball: LabelConfiguration,
    pub obstacle: LabelConfiguration,
}

impl VisionHsvConfig {
    pub fn label(&self, label: Label) -> &LabelConfiguration {
        match label {
            Label::Field => &self.field,
            Label::Line => &self.line,
            Label::Ball => &self.ball,
            Label::Obstacle => &self.obstacle,
        }
    }

    pub fn label_mut(&mut self, label: Label) -> &mut LabelConfiguration {
        match label {
            Label::Field => &mut self.field,
            Label::Line => &mut self.line,
            Label::Ball => &mut self.ball,
            Label::Obstacle => &mut self.obstacle,
        }
    }
}

/// Mirror distance table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MirrorConfig {
    pub max_distance: u16,
    pub step: u16,
    pub pixel_distances: Vec<u16>,
}

impl MirrorConfig {
    /// Distances joined the way the operator types them
    pub fn distances_text(&self) -> String {
        self.pixel_distances
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Image geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageConfig {
    pub center_x: i32,
    pub center_y: i32,
    pub tilt: i32,
}

/// Kind of image the vision process streams back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AcquisitionMode {
    #[default]
    Raw,
    Segmented,
    World,
    Map,
}

impl AcquisitionMode {
    pub const ALL: [AcquisitionMode; 4] = [
        AcquisitionMode::Raw,
        AcquisitionMode::Segmented,
        AcquisitionMode::World,
        AcquisitionMode::Map,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            AcquisitionMode::Raw => 0,
            AcquisitionMode::Segmented => 1,
            AcquisitionMode::World => 2,
            AcquisitionMode::Map => 3,
        }
    }

    /// Request type code, a power of two per mode
    pub fn type_code(self) -> u32 {
        1 << self.index()
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AcquisitionMode::Raw => "Raw",
            AcquisitionMode::Segmented => "Segmented",
            AcquisitionMode::World => "World",
            AcquisitionMode::Map => "Map",
        }
    }
}

/// Start or stop streaming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub is_multiple: bool,
    pub frequency: u32,
    #[serde(rename = "type")]
    pub kind: u32,
}

impl ImageRequest {
    pub fn new(is_multiple: bool, frequency: u32, mode: AcquisitionMode) -> Self {
        Self {
            is_multiple,
            frequency,
            kind: mode.type_code(),
        }
    }
}

/// Pixel encoding tag of a camera frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Rgb8,
    Bgr8,
    Mono8,
    Png,
    Jpeg,
    #[serde(untagged)]
    Other(String),
}

/// Camera frame as published by the vision process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFrame {
    pub width: u32,
    pub height: u32,
    pub encoding: Encoding,
    pub data: Vec<u8>,
}

/// Request body of the configuration service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OmniVisionConfRequest {
    pub request_node_name: String,
}

/// Response body of the configuration service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OmniVisionConfResponse {
    #[serde(rename = "mirrorConf")]
    pub mirror_conf: MirrorConfig,
    #[serde(rename = "visionConf")]
    pub vision_conf: VisionHsvConfig,
    #[serde(rename = "imageConf")]
    pub image_conf: ImageConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_lookup_is_bounds_checked() {
        assert_eq!(Label::from_index(2), Ok(Label::Ball));
        assert_eq!(Label::from_index(4), Err(LabelIndexError(4)));
        for label in Label::ALL {
            assert_eq!(Label::from_index(label.index()), Ok(label));
        }
    }

    #[test]
    fn test_acquisition_type_codes() {
        let codes: Vec<u32> = AcquisitionMode::ALL.iter().map(|m| m.type_code()).collect();
        assert_eq!(codes, vec![1, 2, 4, 8]);
    }

    #[test]
    fn test_inverted_range_selects_nothing() {
        let range = Range::new(200, 100);
        assert!((0..=255).all(|v| !range.contains(v)));
    }

    #[test]
    fn test_image_request_wire_names() {
        let json = serde_json::to_value(ImageRequest::new(true, 5, AcquisitionMode::World)).unwrap();
        assert_eq!(json["is_multiple"], true);
        assert_eq!(json["frequency"], 5);
        assert_eq!(json["type"], 4);
    }

    #[test]
    fn test_unknown_encoding_is_preserved() {
        let enc: Encoding = serde_json::from_str("\"yuv422\"").unwrap();
        assert_eq!(enc, Encoding::Other("yuv422".to_string()));
        let enc: Encoding = serde_json::from_str("\"bgr8\"").unwrap();
        assert_eq!(enc, Encoding::Bgr8);
    }

    #[test]
    fn test_distances_text() {
        let mirror = MirrorConfig {
            max_distance: 30,
            step: 10,
            pixel_distances: vec![10, 20, 30],
        };
        assert_eq!(mirror.distances_text(), "10,20,30");
        assert_eq!(MirrorConfig::default().distances_text(), "");
    }
}
