// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::config::Config;
use crate::errors::{AppResult, MirrorError, TransportError};
use crate::messages::{ImageFrame, OmniVisionConfResponse};
use crate::session::{Action, ActiveTimer, CalibrationSession, ConfigEdit, Shortcut};
use crate::transport::{BusClient, Target, Topics};
use cosmic::cosmic_config;
use cosmic::widget::about::About;
use cosmic::widget::image::Handle;
use std::path::PathBuf;

/// Connection to the robot's bus
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BusStatus {
    #[default]
    Connecting,
    Connected,
    /// Never connected or connection lost
    Offline(String),
}

impl BusStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, BusStatus::Connected)
    }
}

/// Startup flags handed to the application
#[derive(Debug, Clone, Copy, Default)]
pub struct Flags {
    pub target: Target,
}

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Robot being calibrated
    pub target: Target,
    /// Resolved channel names for `target`
    pub topics: Topics,
    /// Node name announced on the bus and sent with the configuration request
    pub node_name: String,
    pub bus: Option<BusClient>,
    pub bus_status: BusStatus,
    /// Bumped on every new connection so the frame subscription restarts
    pub bus_epoch: u32,
    /// Controller state and previews
    pub session: CalibrationSession,
    /// Preview handle, rebuilt when the session display changes
    pub preview: Handle,
    pub preview_generation: u64,
    /// Rejected distance table waiting for acknowledgement
    pub mirror_error: Option<MirrorError>,
    pub last_screenshot: Option<PathBuf>,
    pub label_options: Vec<String>,
    pub acquisition_options: Vec<String>,
    pub theme_options: Vec<String>,
    pub step_policy_options: Vec<String>,
}

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
    Settings,
}

/// Messages emitted by the application and its widgets.
///
/// Controller input is forwarded to the session; the remaining variants are
/// navigation, settings and results of background tasks.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page (About, Settings)
    ToggleContextPage(ContextPage),
    /// Dismiss the error dialog
    CloseDialog,

    // ===== Calibration =====
    /// Camera frame from the bus
    CameraFrame(ImageFrame),
    /// Periodic task fired
    Tick(ActiveTimer),
    ToggleCalibration,
    SetDrawing(bool),
    SetDrawOverlay(bool),
    Edit(ConfigEdit),
    Action(Action),
    Shortcut(Shortcut),

    // ===== Bus =====
    BusConnected(Result<BusClient, TransportError>),
    /// Frame stream ended
    BusClosed,
    Reconnect,
    ConfigRetrieved(Result<OmniVisionConfResponse, TransportError>),

    // ===== System =====
    ScreenshotSaved(AppResult<PathBuf>),
    UpdateConfig(Config),
    SetAppTheme(usize),
    SetMirrorStepPolicy(usize),
}
