// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for talking to a robot without the window
//!
//! This module provides command-line functionality for:
//! - Fetching the current vision configuration
//! - Sending acquisition requests (grab / stop)
//! - Printing the resolved channel names

use clap::ValueEnum;
use std::time::Duration;
use vision_calib::config::Config;
use vision_calib::constants::{timing, topics};
use vision_calib::messages::{
    AcquisitionMode, ImageRequest, OmniVisionConfRequest, OmniVisionConfResponse,
};
use vision_calib::transport::{BusClient, Target};

/// Image kind selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Raw,
    Segmented,
    World,
    Map,
}

impl From<ModeArg> for AcquisitionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Raw => AcquisitionMode::Raw,
            ModeArg::Segmented => AcquisitionMode::Segmented,
            ModeArg::World => AcquisitionMode::World,
            ModeArg::Map => AcquisitionMode::Map,
        }
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

async fn connect(target: &Target, config: &Config) -> Result<BusClient, Box<dyn std::error::Error>> {
    let address = target.bus_address(&config.bus_host_prefix, config.bus_port);
    println!("Connecting to {}", address);
    Ok(BusClient::connect(&address, target.node_name()).await?)
}

/// Print the robot's current configuration as JSON
pub fn fetch_config(target: Target, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    runtime()?.block_on(async {
        let bus = connect(&target, config).await?;
        let request = OmniVisionConfRequest {
            request_node_name: bus.node_name().to_string(),
        };
        let response: OmniVisionConfResponse = bus
            .call(
                topics::OMNI_VISION_CONF_SERVICE,
                &request,
                timing::CONFIG_REQUEST_TIMEOUT,
            )
            .await?;

        println!("{}", serde_json::to_string_pretty(&response)?);
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Publish one acquisition request
pub fn send_request(
    target: Target,
    config: &Config,
    request: ImageRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    runtime()?.block_on(async {
        let bus = connect(&target, config).await?;
        let topic = target.topics().image_request;
        bus.publish(&topic, &request)?;
        tokio::time::timeout(Duration::from_secs(2), bus.flush()).await??;

        println!(
            "Sent to {}: is_multiple={} frequency={} type={}",
            topic, request.is_multiple, request.frequency, request.kind
        );
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Print channel names and bus address for the target
pub fn print_topics(target: Target, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let topics = target.topics();
    println!(
        "Bus:      {}",
        target.bus_address(&config.bus_host_prefix, config.bus_port)
    );
    println!("Node:     {}", target.node_name());
    println!();
    println!("Inbound:");
    println!("  {}", topics.camera);
    println!("Outbound:");
    for topic in topics.outbound() {
        println!("  {}", topic);
    }
    println!("Service:");
    println!("  {}", topics::OMNI_VISION_CONF_SERVICE);
    Ok(())
}
