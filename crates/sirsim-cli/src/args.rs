//! # sirsim-cli::args
//!
//! Defines the command-line argument structure using `clap`. The `run`
//! subcommand accepts either a scenario file, per-parameter flags, or both;
//! flags always win over the file.

use crate::calibrate::{ObservationModel, TargetChannel};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sirsim_types::params::SirParams;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(long, global = true, default_value = "human")]
    pub log: LogFormat,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one or more trajectories and write CSV outputs.
    Run(RunOpts),
    /// Validate a scenario file for correctness.
    Validate {
        #[arg(value_name = "SCENARIO_PATH")]
        scenario: PathBuf,
    },
    /// Fit lambda/gamma against an observed time series by grid search.
    Calibrate(CalibrateOpts),
}

#[derive(Args, Debug)]
pub struct RunOpts {
    /// Path to the scenario file (YAML or TOML).
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// Override the master RNG seed from the scenario file.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the number of trajectories to run.
    #[arg(long)]
    pub trajectories: Option<u32>,

    /// Run trajectories on a rayon thread pool instead of serially.
    #[arg(long)]
    pub parallel: bool,

    /// Output file prefix (defaults to the scenario name).
    #[arg(short, long)]
    pub output: Option<String>,

    #[command(flatten)]
    pub params: ParamOverrides,
}

#[derive(Args, Debug)]
pub struct CalibrateOpts {
    /// Path to the scenario file holding the fixed parameters.
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// RNG seed reused for every candidate (common random numbers).
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON file with the observed time series.
    #[arg(long, value_name = "DATA_PATH")]
    pub data: PathBuf,

    /// Which model view the observations are compared against.
    #[arg(long, default_value = "infected")]
    pub channel: TargetChannel,

    /// Observation model for the likelihood.
    #[arg(long, default_value = "normal")]
    pub model: ObservationModel,

    #[arg(long, default_value_t = 0.1)]
    pub lambda_min: f64,
    #[arg(long, default_value_t = 2.0)]
    pub lambda_max: f64,
    #[arg(long, default_value_t = 0.5)]
    pub gamma_min: f64,
    #[arg(long, default_value_t = 10.0)]
    pub gamma_max: f64,

    /// Grid resolution per axis.
    #[arg(long, default_value_t = 8)]
    pub steps: u32,

    /// Optional CSV path for the full likelihood surface.
    #[arg(long)]
    pub surface: Option<PathBuf>,

    #[command(flatten)]
    pub params: ParamOverrides,
}

/// Per-parameter overrides for the ten construction parameters; each falls
/// back to the scenario file (or its default) when absent.
#[derive(Args, Debug, Default)]
pub struct ParamOverrides {
    /// Transmission parameter, unit: [cases/day].
    #[arg(long)]
    pub lambda: Option<f64>,
    /// Mean duration of infectiousness, unit: [days].
    #[arg(long)]
    pub gamma: Option<f64>,
    /// Population size.
    #[arg(long)]
    pub n_people: Option<u32>,
    /// Minimum age in the initial population, unit: [years].
    #[arg(long)]
    pub age_min: Option<u32>,
    /// Maximum age in the initial population, unit: [years].
    #[arg(long)]
    pub age_max: Option<u32>,
    /// Width of one age bucket, unit: [years].
    #[arg(long)]
    pub age_break: Option<u32>,
    /// Simulation horizon, unit: [days].
    #[arg(long)]
    pub t_max: Option<u32>,
    /// Force-of-infection re-evaluation interval, unit: [days].
    #[arg(long)]
    pub delta_t: Option<u32>,
    /// Data-aggregation period length, unit: [days].
    #[arg(long)]
    pub p_length: Option<u32>,
}

impl ParamOverrides {
    /// Applies every present flag on top of `params`.
    pub fn apply(&self, params: &mut SirParams) {
        if let Some(v) = self.lambda {
            params.lambda = v;
        }
        if let Some(v) = self.gamma {
            params.gamma = v;
        }
        if let Some(v) = self.n_people {
            params.n_people = v;
        }
        if let Some(v) = self.age_min {
            params.age_min = v;
        }
        if let Some(v) = self.age_max {
            params.age_max = v;
        }
        if let Some(v) = self.age_break {
            params.age_break = v;
        }
        if let Some(v) = self.t_max {
            params.t_max = v;
        }
        if let Some(v) = self.delta_t {
            params.delta_t = v;
        }
        if let Some(v) = self.p_length {
            params.p_length = v;
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_defaults() {
        let mut params = SirParams::default();
        let overrides = ParamOverrides {
            lambda: Some(2.5),
            t_max: Some(30),
            ..ParamOverrides::default()
        };
        overrides.apply(&mut params);
        assert_eq!(params.lambda, 2.5);
        assert_eq!(params.t_max, 30);
        assert_eq!(params.gamma, SirParams::default().gamma);
    }

    #[test]
    fn cli_parses_a_full_run_invocation() {
        let cli = Cli::try_parse_from([
            "sirsim",
            "run",
            "--lambda",
            "1.5",
            "--gamma",
            "8",
            "--n-people",
            "1000",
            "--trajectories",
            "4",
            "--parallel",
            "--seed",
            "42",
            "--output",
            "flu",
        ])
        .unwrap();
        match cli.command {
            Command::Run(opts) => {
                assert_eq!(opts.params.lambda, Some(1.5));
                assert_eq!(opts.trajectories, Some(4));
                assert!(opts.parallel);
                assert_eq!(opts.output.as_deref(), Some("flu"));
            }
            other => panic!("parsed into {other:?}"),
        }
    }
}
