// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Periodic task intervals
pub mod timing {
    use super::Duration;

    /// Threshold preview refresh while in calibration mode
    pub const THRESHOLD_INTERVAL: Duration = Duration::from_millis(30);

    /// Interaction tick outside calibration mode (drives the crosshair preview)
    pub const INTERACTION_INTERVAL: Duration = Duration::from_millis(100);

    /// Upper bound on the startup configuration request
    pub const CONFIG_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
}

/// Channel and service names shared with the robot's vision process
pub mod topics {
    /// Outbound acquisition requests
    pub const IMAGE_REQUEST: &str = "imgRequest";
    /// Inbound camera frames
    pub const CAMERA: &str = "camera";
    /// Outbound mirror (distance table) configuration
    pub const MIRROR_CONFIG: &str = "mirrorConfig";
    /// Outbound HSV label configuration
    pub const VISION_HSV_CONFIG: &str = "visionHSVConfig";
    /// Outbound image geometry configuration
    pub const IMAGE_CONFIG: &str = "imageConfig";
    /// Service answering the current omni-vision configuration
    pub const OMNI_VISION_CONF_SERVICE: &str = "requestOmniVisionConf";

    /// Prefix of per-robot namespaces in the simulator
    pub const SIMULATOR_NAMESPACE: &str = "minho_gazebo_robot";
    /// Readable prefix of this tool's node name
    pub const NODE_NAME_PREFIX: &str = "Vision_calib";
}

/// Messaging bus endpoint defaults
pub mod bus {
    /// Bus host when no per-robot override applies
    pub const LOCAL_HOST: &str = "127.0.0.1";
    /// Host prefix completed with the robot id (e.g. `172.16.49.3`)
    pub const ROBOT_HOST_PREFIX: &str = "172.16.49.";
    /// Bus port
    pub const DEFAULT_PORT: u16 = 11311;
}

/// Widget value ranges and defaults
pub mod limits {
    /// HSV slider bounds (all channels share the 0-255 scale)
    pub const HSV_MIN: u8 = 0;
    pub const HSV_MAX: u8 = 255;

    /// Acquisition frequency spin box (frames per second)
    pub const FREQUENCY_MIN: u32 = 1;
    pub const FREQUENCY_MAX: u32 = 30;
    pub const FREQUENCY_DEFAULT: u32 = 1;

    /// Mirror step spin box (real-world units between table entries)
    pub const STEP_MIN: u16 = 1;
    pub const STEP_MAX: u16 = 100;
    pub const STEP_DEFAULT: u16 = 20;

    /// Mirror maximum distance spin box
    pub const MAX_DISTANCE_MIN: u16 = 1;
    pub const MAX_DISTANCE_MAX: u16 = 2000;
    pub const MAX_DISTANCE_DEFAULT: u16 = 1000;

    /// Image center spin boxes (pixels)
    pub const CENTER_MIN: i32 = 0;
    pub const CENTER_MAX: i32 = 960;
    pub const CENTER_DEFAULT: i32 = 240;

    /// Tilt spin box (degrees)
    pub const TILT_MIN: i32 = 0;
    pub const TILT_MAX: i32 = 360;
}

/// Preview surface
pub mod frame {
    /// Side of the black placeholder shown before the first frame arrives
    pub const PLACEHOLDER_SIZE: u32 = 480;
}

/// UI layout constants
pub mod ui {
    /// Width of the control side panel
    pub const PANEL_WIDTH: f32 = 340.0;

    /// Width of the label column in slider rows
    pub const LABEL_WIDTH: f32 = 60.0;

    /// Width of the value column in slider rows
    pub const VALUE_WIDTH: f32 = 36.0;

    /// Spacing between the controls of a row
    pub const CONTROL_SPACING: u16 = 8;
}

pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }
}
