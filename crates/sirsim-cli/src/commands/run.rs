//! # sirsim-cli::commands::run
//!
//! Implements the `run` subcommand: load the scenario, apply flag
//! overrides, fan the trajectories out, and write the CSV outputs.

use crate::{args::RunOpts, export, runner};
use anyhow::Result;
use sirsim_types::scenario::Scenario;

pub fn exec(opts: RunOpts) -> Result<()> {
    let scenario = merge(&opts)?;
    scenario.validate()?;

    let sims = runner::run_all(&scenario)?;
    let written = export::write_all(scenario.output_prefix(), &sims)?;

    for path in &written {
        tracing::info!(path = %path.display(), "wrote");
    }
    println!(
        "Ran {} trajectories of '{}'; wrote {} files.",
        sims.len(),
        scenario.name,
        written.len()
    );
    Ok(())
}

fn merge(opts: &RunOpts) -> Result<Scenario> {
    let mut scenario = super::load_scenario(opts.scenario.as_deref())?;
    if let Some(seed) = opts.seed {
        scenario.seed = Some(seed);
    }
    if let Some(trajectories) = opts.trajectories {
        scenario.trajectories = trajectories;
    }
    if opts.parallel {
        scenario.parallel = true;
    }
    if let Some(output) = &opts.output {
        scenario.output_prefix = Some(output.clone());
    }
    opts.params.apply(&mut scenario.params);
    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ParamOverrides;

    #[test]
    fn flags_override_the_scenario_file_defaults() {
        let opts = RunOpts {
            scenario: None,
            seed: Some(7),
            trajectories: Some(3),
            parallel: true,
            output: Some("out".to_string()),
            params: ParamOverrides {
                n_people: Some(50),
                ..ParamOverrides::default()
            },
        };
        let scenario = merge(&opts).unwrap();
        assert_eq!(scenario.seed, Some(7));
        assert_eq!(scenario.trajectories, 3);
        assert!(scenario.parallel);
        assert_eq!(scenario.output_prefix(), "out");
        assert_eq!(scenario.params.n_people, 50);
    }
}
