// SPDX-License-Identifier: GPL-3.0-only

//! Bus framing
//!
//! One JSON object per line. `op` selects the variant.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Envelope {
    /// First line on every connection, names the node
    Hello { node: String },
    /// Announce that this node publishes on `topic`
    Advertise { topic: String },
    /// Ask the bus to forward `topic`
    Subscribe { topic: String },
    /// A message on a topic
    Publish { topic: String, payload: Value },
    /// Service request, answered by a `Reply` with the same id
    Call {
        id: u64,
        service: String,
        payload: Value,
    },
    /// Service answer; `error` set when the provider failed
    Reply {
        id: u64,
        #[serde(default)]
        payload: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl Envelope {
    /// Encode as a single newline-terminated line
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim_end())
    }
}
