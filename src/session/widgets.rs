// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::limits;
use crate::messages::{AcquisitionMode, ImageRequest, Label, MirrorConfig};

/// Control values that are not owned by the calibrator
///
/// HSV sliders and geometry spinners read straight from the calibrator; this
/// holds the rest of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    pub label: Label,
    pub acquisition_mode: AcquisitionMode,
    pub is_multiple: bool,
    pub frequency: u32,
    pub step: u16,
    pub max_distance: u16,
    /// Distance table as typed, comma separated
    pub distances: String,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            label: Label::default(),
            acquisition_mode: AcquisitionMode::default(),
            is_multiple: false,
            frequency: limits::FREQUENCY_DEFAULT,
            step: limits::STEP_DEFAULT,
            max_distance: limits::MAX_DISTANCE_DEFAULT,
            distances: String::new(),
        }
    }
}

impl Controls {
    pub fn set_frequency(&mut self, frequency: u32) {
        self.frequency = frequency.clamp(limits::FREQUENCY_MIN, limits::FREQUENCY_MAX);
    }

    /// Request built from the current values
    pub fn image_request(&self) -> ImageRequest {
        ImageRequest::new(self.is_multiple, self.frequency, self.acquisition_mode)
    }

    /// Same request with streaming turned off
    pub fn stop_request(&self) -> ImageRequest {
        ImageRequest::new(false, self.frequency, self.acquisition_mode)
    }

    pub fn load_mirror(&mut self, mirror: &MirrorConfig) {
        self.step = mirror.step;
        self.max_distance = mirror.max_distance;
        self.distances = mirror.distances_text();
    }
}
