//! # sirsim-cli::commands::validate
//!
//! Implements the `validate` subcommand: parse a scenario file and run the
//! full consistency check without simulating anything.

use anyhow::Result;
use std::path::Path;

pub fn exec(scenario_path: &Path) -> Result<()> {
    let scenario = super::load_scenario(Some(scenario_path))?;
    scenario.validate()?;
    println!(
        "Scenario '{}' is valid: {} trajectories of {} people over {} days.",
        scenario.name, scenario.trajectories, scenario.params.n_people, scenario.params.t_max
    );
    Ok(())
}
