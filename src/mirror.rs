// SPDX-License-Identifier: GPL-3.0-only

//! Mirror distance table validation
//!
//! The operator types the pixel distance of every `step` from the robot center
//! up to `max_distance`. A table is only sent when it has exactly one entry per
//! step and never decreases.

use crate::errors::MirrorError;
use crate::messages::MirrorConfig;
use serde::{Deserialize, Serialize};

/// How a `max_distance` that is not a multiple of `step` is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MirrorStepPolicy {
    /// Integer division, the remainder is ignored
    #[default]
    Truncate,
    /// Refuse tables whose step does not divide the maximum distance
    RequireExact,
}

impl MirrorStepPolicy {
    pub const ALL: [MirrorStepPolicy; 2] = [MirrorStepPolicy::Truncate, MirrorStepPolicy::RequireExact];

    pub fn display_name(&self) -> &'static str {
        match self {
            MirrorStepPolicy::Truncate => "Truncate",
            MirrorStepPolicy::RequireExact => "Require exact",
        }
    }
}

/// Number of table entries `max_distance / step` asks for
pub fn expected_count(
    max_distance: u16,
    step: u16,
    policy: MirrorStepPolicy,
) -> Result<usize, MirrorError> {
    if step == 0 {
        return Err(MirrorError::ZeroStep);
    }
    if policy == MirrorStepPolicy::RequireExact && max_distance % step != 0 {
        return Err(MirrorError::InexactStep { max_distance, step });
    }
    Ok(usize::from(max_distance / step))
}

/// Validate the typed distance list and build the configuration to publish
pub fn build_mirror_config(
    distances: &str,
    max_distance: u16,
    step: u16,
    policy: MirrorStepPolicy,
) -> Result<MirrorConfig, MirrorError> {
    let expected = expected_count(max_distance, step, policy)?;

    let tokens: Vec<&str> = distances.split(',').collect();
    if tokens.len() != expected {
        return Err(MirrorError::WrongNumber {
            expected,
            provided: tokens.len(),
        });
    }

    let pixel_distances = tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            token
                .trim()
                .parse::<u16>()
                .map_err(|_| MirrorError::InvalidValue {
                    index,
                    token: token.trim().to_string(),
                })
        })
        .collect::<Result<Vec<u16>, _>>()?;

    if let Some(index) = pixel_distances.windows(2).position(|w| w[0] > w[1]) {
        return Err(MirrorError::WrongSequence { index });
    }

    Ok(MirrorConfig {
        max_distance,
        step,
        pixel_distances,
    })
}
