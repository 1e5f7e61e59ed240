// SPDX-License-Identifier: GPL-3.0-only

//! Image calibrator
//!
//! Holds the configuration being tuned (per-label HSV thresholds, mirror table,
//! image geometry) and renders the two previews built from it: the binary
//! threshold image and the center marker overlay.

mod hsv;
mod overlay;

pub use hsv::rgb_to_hsv;
pub use overlay::draw_center;

use crate::messages::{
    Bound, Channel, ImageConfig, Label, LabelConfiguration, MirrorConfig, VisionHsvConfig,
};
use image::{Rgb, RgbImage};

/// Pixel drawn where a label matches
const MATCH: Rgb<u8> = Rgb([255, 255, 255]);
/// Pixel drawn everywhere else
const NO_MATCH: Rgb<u8> = Rgb([0, 0, 0]);

#[derive(Debug, Clone, Default)]
pub struct ImageCalibrator {
    vision: VisionHsvConfig,
    mirror: MirrorConfig,
    image: ImageConfig,
}

impl ImageCalibrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the HSV thresholds of every label
    pub fn lut_config_from_msg(&mut self, config: VisionHsvConfig) {
        self.vision = config;
    }

    pub fn mirror_config_from_msg(&mut self, config: MirrorConfig) {
        self.mirror = config;
    }

    pub fn image_config_from_msg(&mut self, config: ImageConfig) {
        self.image = config;
    }

    pub fn label_configuration(&self, label: Label) -> LabelConfiguration {
        *self.vision.label(label)
    }

    pub fn lut_configuration(&self) -> VisionHsvConfig {
        self.vision
    }

    pub fn mirror_configuration(&self) -> &MirrorConfig {
        &self.mirror
    }

    pub fn image_configuration(&self) -> ImageConfig {
        self.image
    }

    /// Set one bound of one channel of one label
    ///
    /// Ranges are stored as given; an inverted range simply matches nothing.
    pub fn update_current_configuration(
        &mut self,
        label: Label,
        channel: Channel,
        bound: Bound,
        value: u8,
    ) {
        self.vision
            .label_mut(label)
            .range_mut(channel)
            .set(bound, value);
    }

    /// Classify every pixel of `frame` against `config`
    pub fn get_binary(&self, frame: &RgbImage, config: &LabelConfiguration) -> RgbImage {
        let mut binary = RgbImage::new(frame.width(), frame.height());
        for (src, dst) in frame.pixels().zip(binary.pixels_mut()) {
            *dst = if config.matches(rgb_to_hsv(src.0)) {
                MATCH
            } else {
                NO_MATCH
            };
        }
        binary
    }

    /// Draw the center marker of the current geometry onto `frame`
    pub fn draw_center(&self, frame: &mut RgbImage) {
        overlay::draw_center(frame, &self.image, &self.mirror);
    }
}
