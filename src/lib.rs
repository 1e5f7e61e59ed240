// SPDX-License-Identifier: GPL-3.0-only

//! Vision calibration - tune a robot's omni-vision configuration from the desktop
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: COSMIC window, translating widget messages into session events
//! - [`session`]: Toolkit-free controller state and event dispatch
//! - [`calibrator`]: HSV thresholding and the center marker overlay
//! - [`mirror`]: Distance table validation
//! - [`transport`]: Bus client, topic naming and framing
//! - [`messages`]: Wire types exchanged with the robot
//! - [`frame`]: Camera frame decoding
//! - [`config`]: User configuration handling
//! - [`storage`]: Screenshot files
//!
//! # Example
//!
//! ```ignore
//! // This is a GUI application, typically run via:
//! // vision-calib --robot-id 3
//! ```

pub mod app;
pub mod calibrator;
pub mod config;
pub mod constants;
pub mod errors;
pub mod frame;
pub mod i18n;
pub mod messages;
pub mod mirror;
pub mod session;
pub mod storage;
pub mod transport;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use calibrator::ImageCalibrator;
pub use config::Config;
pub use errors::{AppError, AppResult};
pub use session::{CalibrationSession, Effect, Event};
