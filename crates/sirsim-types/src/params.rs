//! # sirsim-types::params
//!
//! Strongly-typed construction parameters for one SIR trajectory, with the
//! full validation rule set. These are parsed by `serde` from scenario
//! files and overridden by CLI flags; once a simulation is constructed they
//! are immutable.

use crate::errors::SimError;
use serde::{Deserialize, Serialize};

/// Construction parameters for a single SIR trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SirParams {
    /// Transmission parameter, unit: [cases/day]. Must be > 0.
    pub lambda: f64,
    /// Mean duration of infectiousness, unit: [days]. Must be > 0.
    pub gamma: f64,
    /// Population size. Must be >= 1.
    pub n_people: u32,
    /// Minimum age of an individual, unit: [years].
    pub age_min: u32,
    /// Maximum age of an individual, unit: [years]. Must be >= `age_min`.
    pub age_max: u32,
    /// Width of one age bucket, unit: [years].
    /// Must satisfy 1 <= age_break < (age_max - age_min).
    pub age_break: u32,
    /// Simulation horizon, unit: [days]. Must be >= 1.
    pub t_max: u32,
    /// Interval between force-of-infection re-evaluations, unit: [days].
    /// Must satisfy 1 <= delta_t <= t_max.
    pub delta_t: u32,
    /// Width of one data-aggregation period, unit: [days].
    /// Must satisfy 0 < p_length <= t_max.
    pub p_length: u32,
}

impl Default for SirParams {
    fn default() -> Self {
        Self {
            lambda: 1.0,
            gamma: 1.0,
            n_people: 10,
            age_min: 0,
            age_max: 100,
            age_break: 10,
            t_max: 365,
            delta_t: 1,
            p_length: 7,
        }
    }
}

impl SirParams {
    /// Checks every construction constraint, returning the first violation.
    ///
    /// Horizons that are not whole multiples of `p_length` or `delta_t` are
    /// legal but produce a ragged final bucket; they are reported as
    /// warnings rather than errors.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.lambda <= 0.0 {
            return Err(invalid("lambda", "must be > 0"));
        }
        if self.gamma <= 0.0 {
            return Err(invalid("gamma", "must be > 0"));
        }
        if self.n_people < 1 {
            return Err(invalid("n_people", "must be >= 1"));
        }
        if self.age_min > self.age_max {
            return Err(invalid("age_min", "must be <= age_max"));
        }
        if self.age_break < 1 {
            return Err(invalid("age_break", "must be >= 1"));
        }
        if self.age_break >= self.age_max - self.age_min {
            return Err(invalid("age_break", "must be < (age_max - age_min)"));
        }
        if self.t_max < 1 {
            return Err(invalid("t_max", "must be >= 1"));
        }
        if self.p_length == 0 {
            return Err(invalid("p_length", "must be > 0"));
        }
        if self.p_length > self.t_max {
            return Err(invalid("p_length", "must be <= t_max"));
        }
        if self.delta_t < 1 {
            return Err(invalid("delta_t", "must be >= 1"));
        }
        if self.delta_t > self.t_max {
            return Err(invalid("delta_t", "must be <= t_max"));
        }
        if self.t_max % self.p_length != 0 {
            tracing::warn!(
                t_max = self.t_max,
                p_length = self.p_length,
                "t_max is not a multiple of p_length; final period will be ragged"
            );
        }
        if self.t_max % self.delta_t != 0 {
            tracing::warn!(
                t_max = self.t_max,
                delta_t = self.delta_t,
                "t_max is not a multiple of delta_t"
            );
        }
        Ok(())
    }

    /// The interior age-break points: `age_min + k * age_break` for k >= 1,
    /// strictly less than `age_max`. Buckets are the intervals between
    /// consecutive breaks, plus the open-ended first and last buckets.
    pub fn age_breaks(&self) -> Vec<u32> {
        let mut breaks = Vec::new();
        let mut age = self.age_min + self.age_break;
        while age < self.age_max {
            breaks.push(age);
            age += self.age_break;
        }
        breaks
    }

    /// Number of age buckets implied by `age_breaks`.
    pub fn n_age_groups(&self) -> usize {
        let span = f64::from(self.age_max - self.age_min);
        (span / f64::from(self.age_break)).ceil() as usize
    }

    /// Number of aggregation periods covering `[0, t_max]`.
    pub fn n_periods(&self) -> usize {
        (self.t_max / self.p_length) as usize + 1
    }
}

fn invalid(name: &'static str, reason: &str) -> SimError {
    SimError::InvalidParameter {
        name,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        assert!(SirParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_each_bad_parameter() {
        let ok = SirParams::default();

        let cases: Vec<(&str, SirParams)> = vec![
            ("lambda", SirParams { lambda: 0.0, ..ok }),
            ("gamma", SirParams { gamma: -1.0, ..ok }),
            ("n_people", SirParams { n_people: 0, ..ok }),
            (
                "age_min",
                SirParams {
                    age_min: 101,
                    ..ok
                },
            ),
            ("age_break", SirParams { age_break: 0, ..ok }),
            (
                "age_break",
                SirParams {
                    age_max: 10,
                    age_break: 11,
                    ..ok
                },
            ),
            ("t_max", SirParams { t_max: 0, ..ok }),
            ("p_length", SirParams { p_length: 0, ..ok }),
            (
                "p_length",
                SirParams {
                    p_length: 366,
                    ..ok
                },
            ),
            ("delta_t", SirParams { delta_t: 0, ..ok }),
            ("delta_t", SirParams { delta_t: 366, ..ok }),
        ];

        for (name, params) in cases {
            match params.validate() {
                Err(SimError::InvalidParameter { name: got, .. }) => {
                    assert_eq!(got, name, "wrong rule fired for {params:?}")
                }
                other => panic!("expected rejection of {name}, got {other:?}"),
            }
        }
    }

    #[test]
    fn age_breaks_stay_below_age_max() {
        let params = SirParams::default();
        let breaks = params.age_breaks();
        assert_eq!(breaks, vec![10, 20, 30, 40, 50, 60, 70, 80, 90]);
        assert_eq!(params.n_age_groups(), 10);
    }

    #[test]
    fn ragged_age_span_rounds_group_count_up() {
        let params = SirParams {
            age_min: 0,
            age_max: 25,
            age_break: 10,
            ..SirParams::default()
        };
        assert_eq!(params.age_breaks(), vec![10, 20]);
        assert_eq!(params.n_age_groups(), 3);
    }
}
