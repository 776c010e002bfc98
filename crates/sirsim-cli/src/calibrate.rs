//! # sirsim-cli::calibrate
//!
//! The calibration driver treats the simulation as a black-box likelihood
//! function: for a candidate (lambda, gamma) it runs one trajectory,
//! extracts the Infected or Infections view, and scores the observed time
//! series under a Normal or Binomial observation model. A deterministic
//! grid search over the candidate box reuses the same RNG seed for every
//! candidate, so likelihood differences come from the parameters alone.

use anyhow::{Context, Result};
use clap::ValueEnum;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::Deserialize;
use sirsim_engine::prelude::*;
use std::path::Path;

/// Which model view the observations are compared against.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetChannel {
    /// Prevalence of the infected state.
    Infected,
    /// Incident infections per period.
    Infections,
}

impl From<TargetChannel> for SirChannel {
    fn from(value: TargetChannel) -> Self {
        match value {
            TargetChannel::Infected => SirChannel::Infected,
            TargetChannel::Infections => SirChannel::Infections,
        }
    }
}

/// Observation model for the likelihood of one data point.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationModel {
    /// Observed ~ Normal(model value, sigma = 1).
    Normal,
    /// Observed ~ Binomial(n = population, p = model value / population).
    Binomial,
}

/// One observed data point.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ObservedPoint {
    pub time: Day,
    pub increment: i64,
}

/// The observed series file: `{"timeseries": [{"time": .., "increment": ..}]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservedSeries {
    pub timeseries: Vec<ObservedPoint>,
}

impl ObservedSeries {
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening observed series {}", path.display()))?;
        let series: ObservedSeries =
            serde_json::from_reader(file).context("parsing observed series JSON")?;
        Ok(series)
    }
}

/// One evaluated grid point.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub lambda: f64,
    pub gamma: f64,
    pub log_likelihood: f64,
}

/// The candidate box and resolution for the grid search.
#[derive(Debug, Clone, Copy)]
pub struct Grid {
    pub lambda_min: f64,
    pub lambda_max: f64,
    pub gamma_min: f64,
    pub gamma_max: f64,
    pub steps: u32,
}

impl Grid {
    fn axis(min: f64, max: f64, steps: u32, k: u32) -> f64 {
        if steps <= 1 {
            return min;
        }
        min + (max - min) * f64::from(k) / f64::from(steps - 1)
    }
}

/// Evaluates the whole grid and returns the candidates in evaluation
/// order together with the index of the best one.
pub fn grid_search(
    base: SirParams,
    seed: u64,
    channel: TargetChannel,
    model: ObservationModel,
    observed: &ObservedSeries,
    grid: Grid,
) -> Result<(usize, Vec<Candidate>)> {
    let mut candidates = Vec::with_capacity((grid.steps * grid.steps) as usize);

    for i in 0..grid.steps {
        for j in 0..grid.steps {
            let params = SirParams {
                lambda: Grid::axis(grid.lambda_min, grid.lambda_max, grid.steps, i),
                gamma: Grid::axis(grid.gamma_min, grid.gamma_max, grid.steps, j),
                ..base
            };
            let log_likelihood = score(params, seed, channel, model, observed)?;
            tracing::debug!(
                lambda = params.lambda,
                gamma = params.gamma,
                log_likelihood,
                "evaluated candidate"
            );
            candidates.push(Candidate {
                lambda: params.lambda,
                gamma: params.gamma,
                log_likelihood,
            });
        }
    }

    let best = candidates
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.log_likelihood.total_cmp(&b.log_likelihood))
        .map(|(idx, _)| idx)
        .context("empty candidate grid")?;
    Ok((best, candidates))
}

/// Runs one trajectory under `params` and scores the observed series
/// against the selected view.
fn score(
    params: SirParams,
    seed: u64,
    channel: TargetChannel,
    model: ObservationModel,
    observed: &ObservedSeries,
) -> Result<f64> {
    let mut sim = SirSimulation::new(ChaCha20Rng::seed_from_u64(seed), params)?;
    sim.run()?;

    let view = sim.time_series(channel.into());
    let total = observed
        .timeseries
        .iter()
        .map(|point| {
            let predicted = view.total_at_time(point.time);
            log_likelihood(model, params.n_people, point.increment, predicted)
        })
        .sum();
    Ok(total)
}

/// Log-likelihood of one observation given the model prediction.
fn log_likelihood(model: ObservationModel, n_people: u32, observed: i64, predicted: i64) -> f64 {
    match model {
        ObservationModel::Normal => {
            // Normal(mu = predicted, sigma = 1).
            let residual = observed as f64 - predicted as f64;
            -0.5 * (2.0 * std::f64::consts::PI).ln() - 0.5 * residual * residual
        }
        ObservationModel::Binomial => {
            let n = u64::from(n_people);
            let k = observed.clamp(0, n as i64) as u64;
            // Clamp p away from the boundary so zero-prediction candidates
            // score finitely instead of -inf.
            let p = (predicted as f64 / n as f64).clamp(1e-9, 1.0 - 1e-9);
            ln_choose(n, k) + k as f64 * p.ln() + (n - k) as f64 * (1.0 - p).ln()
        }
    }
}

/// ln C(n, k) by direct product, exact enough for population-sized n.
fn ln_choose(n: u64, k: u64) -> f64 {
    let k = k.min(n - k);
    (0..k)
        .map(|i| ((n - i) as f64).ln() - ((k - i) as f64).ln())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn ln_choose_matches_small_cases() {
        assert!((ln_choose(5, 2) - 10f64.ln()).abs() < 1e-12);
        assert!((ln_choose(10, 0) - 0.0).abs() < 1e-12);
        assert!((ln_choose(10, 10) - 0.0).abs() < 1e-12);
        assert!((ln_choose(52, 5) - 2_598_960f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn normal_likelihood_peaks_at_the_prediction() {
        let at = |obs| log_likelihood(ObservationModel::Normal, 100, obs, 5);
        assert!(at(5) > at(4));
        assert!(at(5) > at(6));
        assert!((at(4) - at(6)).abs() < 1e-12, "symmetric around the mean");
    }

    #[test]
    fn binomial_likelihood_is_finite_at_zero_prediction() {
        let ll = log_likelihood(ObservationModel::Binomial, 100, 3, 0);
        assert!(ll.is_finite());
    }

    #[test]
    fn observed_series_parses_the_json_layout() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"timeseries": [{{"time": 0.0, "increment": 1}}, {{"time": 1.0, "increment": 2}}]}}"#
        )
        .unwrap();
        let series = ObservedSeries::load(file.path()).unwrap();
        assert_eq!(series.timeseries.len(), 2);
        assert_eq!(series.timeseries[1].increment, 2);
    }

    #[test]
    fn grid_search_prefers_plausible_parameters() {
        // Observations from a run at (lambda=1, gamma=1); the grid should
        // evaluate every candidate and pick a finite best score.
        let observed = ObservedSeries {
            timeseries: vec![
                ObservedPoint {
                    time: 0.0,
                    increment: 1,
                },
                ObservedPoint {
                    time: 7.0,
                    increment: 1,
                },
            ],
        };
        let grid = Grid {
            lambda_min: 0.5,
            lambda_max: 1.5,
            gamma_min: 0.5,
            gamma_max: 1.5,
            steps: 2,
        };
        let (best, candidates) = grid_search(
            SirParams::default(),
            42,
            TargetChannel::Infected,
            ObservationModel::Normal,
            &observed,
            grid,
        )
        .unwrap();
        assert_eq!(candidates.len(), 4);
        assert!(candidates[best].log_likelihood.is_finite());
        let max = candidates
            .iter()
            .map(|c| c.log_likelihood)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(candidates[best].log_likelihood, max);
    }
}
