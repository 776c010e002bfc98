//! # sirsim-cli::commands
//!
//! One module per subcommand, plus the shared scenario-file loader.

pub mod calibrate;
pub mod run;
pub mod validate;

use sirsim_types::{errors::ConfigError, scenario::Scenario};
use std::fs;
use std::path::Path;

/// Loads a scenario from a TOML or YAML file, selected by extension; a
/// missing path yields the default scenario so pure-flag invocations work.
pub(crate) fn load_scenario(path: Option<&Path>) -> Result<Scenario, ConfigError> {
    let path = match path {
        Some(path) => path,
        None => return Ok(Scenario::default()),
    };
    let content = fs::read_to_string(path)?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
        Some("toml") => Ok(toml::from_str(&content)?),
        other => Err(ConfigError::UnsupportedExtension(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}
