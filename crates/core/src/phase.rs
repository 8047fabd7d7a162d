use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ModelConstants;

/// Lifecycle label for a sample's position within one oscillation cycle.
///
/// Within a cycle the phases always follow
/// `Expansion -> Collapse -> Emission -> Expansion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Expansion,
    Collapse,
    Emission,
}

impl Phase {
    /// All phases, in cycle order.
    pub const ALL: [Phase; 3] = [Phase::Expansion, Phase::Collapse, Phase::Emission];

    /// Classifies a radius variation, first match wins:
    ///
    /// 1. below the collapse threshold: `Collapse`;
    /// 2. below the expansion threshold: `Emission` while the wall rebounds,
    ///    `Collapse` while it still moves inward;
    /// 3. otherwise: `Expansion`.
    ///
    /// `rebounding` is true when the radius is growing.
    #[must_use]
    pub fn classify(radius_variation: f64, rebounding: bool, constants: &ModelConstants) -> Self {
        if radius_variation < constants.collapse_threshold {
            Phase::Collapse
        } else if radius_variation < constants.expansion_threshold {
            if rebounding {
                Phase::Emission
            } else {
                Phase::Collapse
            }
        } else {
            Phase::Expansion
        }
    }

    /// Returns the phase that follows this one within a cycle.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Phase::Expansion => Phase::Collapse,
            Phase::Collapse => Phase::Emission,
            Phase::Emission => Phase::Expansion,
        }
    }

    /// Returns the lowercase label used in serialized records.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Expansion => "expansion",
            Phase::Collapse => "collapse",
            Phase::Emission => "emission",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
