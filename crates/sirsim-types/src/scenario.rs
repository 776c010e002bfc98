//! # sirsim-types::scenario
//!
//! Defines the Rust structs that map directly to the scenario file schema
//! (YAML/TOML). A scenario is one experiment: a parameter set plus the
//! trajectory fan-out and output configuration.

use crate::errors::ConfigError;
use crate::params::SirParams;
use serde::{Deserialize, Serialize};

fn default_name() -> String {
    "sir".to_string()
}

fn default_trajectories() -> u32 {
    1
}

/// The top-level structure for a scenario definition file.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Experiment name; also the default output file prefix.
    #[serde(default = "default_name")]
    pub name: String,
    /// Master RNG seed. Per-trajectory seeds are derived from this.
    pub seed: Option<u64>,
    /// Number of trajectories to run. Must be >= 1.
    #[serde(default = "default_trajectories")]
    pub trajectories: u32,
    /// Run trajectories on a rayon pool instead of serially.
    #[serde(default)]
    pub parallel: bool,
    /// Output file prefix; falls back to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_prefix: Option<String>,
    /// Construction parameters shared by every trajectory.
    #[serde(default)]
    pub params: SirParams,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: default_name(),
            seed: None,
            trajectories: default_trajectories(),
            parallel: false,
            output_prefix: None,
            params: SirParams::default(),
        }
    }
}

impl Scenario {
    /// Validates the scenario for logical consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trajectories < 1 {
            return Err(ConfigError::Validation {
                name: self.name.clone(),
                message: "trajectories must be >= 1".to_string(),
            });
        }
        self.params
            .validate()
            .map_err(|e| ConfigError::Validation {
                name: self.name.clone(),
                message: e.to_string(),
            })
    }

    /// The effective output prefix.
    pub fn output_prefix(&self) -> &str {
        self.output_prefix.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_scenario_parses_with_defaults() {
        let scenario: Scenario = toml::from_str(
            r#"
            name = "measles"
            seed = 42

            [params]
            lambda = 1.5
            gamma = 8.0
            n_people = 1000
            age_min = 0
            age_max = 90
            age_break = 10
            t_max = 365
            delta_t = 1
            p_length = 7
            "#,
        )
        .unwrap();

        assert_eq!(scenario.name, "measles");
        assert_eq!(scenario.seed, Some(42));
        assert_eq!(scenario.trajectories, 1);
        assert!(!scenario.parallel);
        assert_eq!(scenario.output_prefix(), "measles");
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn yaml_scenario_round_trips() {
        let scenario = Scenario {
            trajectories: 16,
            parallel: true,
            ..Scenario::default()
        };
        let text = serde_yaml::to_string(&scenario).unwrap();
        let back: Scenario = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back.trajectories, 16);
        assert!(back.parallel);
    }

    #[test]
    fn zero_trajectories_is_rejected() {
        let scenario = Scenario {
            trajectories: 0,
            ..Scenario::default()
        };
        assert!(matches!(
            scenario.validate(),
            Err(ConfigError::Validation { .. })
        ));
    }
}
