// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use vision_calib::app::{AppModel, Flags};
use vision_calib::config::Config;
use vision_calib::constants::limits;
use vision_calib::i18n;
use vision_calib::messages::ImageRequest;
use vision_calib::transport::{Deployment, Target};

mod cli;

#[derive(Parser)]
#[command(name = "vision-calib")]
#[command(about = "Vision calibration for omni-vision robots")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Robot to calibrate (0 uses the local bus)
    #[arg(short, long, default_value_t = 0, global = true)]
    robot_id: u32,

    /// Target a robot running in the simulator
    #[arg(short, long, global = true)]
    simulated: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the robot's current vision configuration as JSON
    Fetch,

    /// Ask the robot for frames
    Grab {
        /// Image kind
        #[arg(short, long, value_enum, default_value = "raw")]
        mode: cli::ModeArg,

        /// Frames per second when streaming
        #[arg(short, long, default_value_t = limits::FREQUENCY_DEFAULT)]
        frequency: u32,

        /// Keep streaming instead of sending a single frame
        #[arg(short, long)]
        continuous: bool,
    },

    /// Stop streaming
    Stop {
        /// Image kind
        #[arg(short, long, value_enum, default_value = "raw")]
        mode: cli::ModeArg,
    },

    /// Print channel names and bus address
    Topics,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=vision_calib=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    let deployment = if cli.simulated {
        Deployment::Simulated
    } else {
        Deployment::Robot
    };
    let target = Target::new(cli.robot_id, deployment);

    let Some(command) = cli.command else {
        return run_gui(target);
    };

    let (_, config) = Config::load(<AppModel as cosmic::Application>::APP_ID);

    match command {
        Commands::Fetch => cli::fetch_config(target, &config),
        Commands::Grab {
            mode,
            frequency,
            continuous,
        } => {
            let frequency = frequency.clamp(limits::FREQUENCY_MIN, limits::FREQUENCY_MAX);
            let request = ImageRequest::new(continuous, frequency, mode.into());
            cli::send_request(target, &config, request)
        }
        Commands::Stop { mode } => {
            let request = ImageRequest::new(false, limits::FREQUENCY_DEFAULT, mode.into());
            cli::send_request(target, &config, request)
        }
        Commands::Topics => cli::print_topics(target, &config),
    }
}

fn run_gui(target: Target) -> Result<(), Box<dyn std::error::Error>> {
    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default()
        .size(cosmic::iced::Size::new(1100.0, 720.0))
        .size_limits(
            cosmic::iced::Limits::NONE
                .min_width(640.0)
                .min_height(480.0),
        );

    cosmic::app::run::<AppModel>(settings, Flags { target })?;

    Ok(())
}
