//! # sirsim-types::channel
//!
//! Defines the logical data channels the simulation tallies into. Each
//! channel is backed by a time series, a pyramid time series, and a running
//! statistic; exporters and the result accessor are keyed on this enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A logical output channel of the simulation.
///
/// `Susceptible`, `Infected` and `Recovered` are prevalence channels
/// (levels at an instant); `Infections` and `Recoveries` are incidence
/// channels (transition counts per period).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SirChannel {
    Susceptible,
    Infected,
    Recovered,
    Infections,
    Recoveries,
}

impl SirChannel {
    /// Every channel, in the fixed order used by all exporters.
    pub const ALL: [SirChannel; 5] = [
        SirChannel::Susceptible,
        SirChannel::Infected,
        SirChannel::Recovered,
        SirChannel::Infections,
        SirChannel::Recoveries,
    ];

    /// Stable lower-case label used in file names.
    pub fn label(&self) -> &'static str {
        match self {
            SirChannel::Susceptible => "susceptible",
            SirChannel::Infected => "infected",
            SirChannel::Recovered => "recovered",
            SirChannel::Infections => "infections",
            SirChannel::Recoveries => "recoveries",
        }
    }

    /// Display name used as a series title.
    pub fn name(&self) -> &'static str {
        match self {
            SirChannel::Susceptible => "Susceptible",
            SirChannel::Infected => "Infected",
            SirChannel::Recovered => "Recovered",
            SirChannel::Infections => "Infections",
            SirChannel::Recoveries => "Recoveries",
        }
    }

    /// Whether the channel records a level (prevalence) as opposed to a
    /// per-period count (incidence).
    pub fn is_prevalence(&self) -> bool {
        matches!(
            self,
            SirChannel::Susceptible | SirChannel::Infected | SirChannel::Recovered
        )
    }
}

impl fmt::Display for SirChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
