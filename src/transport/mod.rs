// SPDX-License-Identifier: GPL-3.0-only

//! Messaging layer shared with the robot
//!
//! The robot side runs a message bus that relays topics between nodes and
//! routes service calls to their provider. This module names the endpoints
//! (topics, bus address, node name) for a given robot and provides the
//! [`BusClient`] that speaks the line-delimited JSON framing of [`Envelope`].

mod client;
mod envelope;

pub use client::{BusClient, Subscriber};
pub use envelope::Envelope;

use crate::constants::{bus, topics};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the target robot runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Deployment {
    /// Physical robot with its own bus; topics live at the root
    #[default]
    Robot,
    /// Simulator hosting every robot on one bus; topics are namespaced per robot
    Simulated,
}

/// Robot this instance calibrates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Target {
    pub robot_id: u32,
    pub deployment: Deployment,
}

impl Target {
    pub fn new(robot_id: u32, deployment: Deployment) -> Self {
        Self {
            robot_id,
            deployment,
        }
    }

    pub fn topics(&self) -> Topics {
        Topics::new(self)
    }

    /// Bus address for this robot
    ///
    /// Physical robots with a non-zero id are reached at `<host_prefix><id>`;
    /// everything else goes to the local bus.
    pub fn bus_address(&self, host_prefix: &str, port: u16) -> BusAddress {
        let host = match self.deployment {
            Deployment::Robot if self.robot_id > 0 => format!("{}{}", host_prefix, self.robot_id),
            _ => bus::LOCAL_HOST.to_string(),
        };
        BusAddress { host, port }
    }

    /// Node name used to identify this instance, unique per launch
    pub fn node_name(&self) -> String {
        node_name(self.robot_id, chrono::Utc::now().timestamp())
    }
}

/// Readable prefix, robot id and launch time
pub fn node_name(robot_id: u32, unix_seconds: i64) -> String {
    format!("{}{}_{}", topics::NODE_NAME_PREFIX, robot_id, unix_seconds)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusAddress {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for BusAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Resolved topic names for one robot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    pub image_request: String,
    pub camera: String,
    pub mirror_config: String,
    pub vision_hsv_config: String,
    pub image_config: String,
}

impl Topics {
    pub fn new(target: &Target) -> Self {
        let name = |topic: &str| match target.deployment {
            Deployment::Robot => format!("/{}", topic),
            Deployment::Simulated => format!(
                "{}{}/{}",
                topics::SIMULATOR_NAMESPACE,
                target.robot_id,
                topic
            ),
        };

        Self {
            image_request: name(topics::IMAGE_REQUEST),
            camera: name(topics::CAMERA),
            mirror_config: name(topics::MIRROR_CONFIG),
            vision_hsv_config: name(topics::VISION_HSV_CONFIG),
            image_config: name(topics::IMAGE_CONFIG),
        }
    }

    /// Topics this tool publishes on
    pub fn outbound(&self) -> [&str; 4] {
        [
            self.image_request.as_str(),
            self.mirror_config.as_str(),
            self.vision_hsv_config.as_str(),
            self.image_config.as_str(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robot_topics_are_rooted() {
        let topics = Target::new(3, Deployment::Robot).topics();
        assert_eq!(topics.image_request, "/imgRequest");
        assert_eq!(topics.camera, "/camera");
        assert_eq!(topics.vision_hsv_config, "/visionHSVConfig");
    }

    #[test]
    fn test_simulated_topics_are_namespaced() {
        let topics = Target::new(2, Deployment::Simulated).topics();
        assert_eq!(topics.camera, "minho_gazebo_robot2/camera");
        assert_eq!(topics.mirror_config, "minho_gazebo_robot2/mirrorConfig");
        assert_eq!(topics.image_config, "minho_gazebo_robot2/imageConfig");
    }

    #[test]
    fn test_bus_address_override() {
        let prefix = bus::ROBOT_HOST_PREFIX;
        let port = bus::DEFAULT_PORT;

        let robot = Target::new(4, Deployment::Robot).bus_address(prefix, port);
        assert_eq!(robot.to_string(), "172.16.49.4:11311");

        let local = Target::new(0, Deployment::Robot).bus_address(prefix, port);
        assert_eq!(local.host, bus::LOCAL_HOST);

        let sim = Target::new(4, Deployment::Simulated).bus_address(prefix, port);
        assert_eq!(sim.host, bus::LOCAL_HOST);
    }

    #[test]
    fn test_node_name() {
        assert_eq!(node_name(5, 1_700_000_000), "Vision_calib5_1700000000");
        assert!(Target::new(1, Deployment::Robot).node_name().starts_with("Vision_calib1_"));
    }
}
