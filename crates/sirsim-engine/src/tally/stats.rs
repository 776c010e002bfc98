//! # sirsim-engine::tally::stats
//!
//! Running statistics over a channel. Prevalence channels carry a
//! continuous-time statistic (time-weighted over the level's trajectory);
//! incidence channels carry a discrete statistic over the individual
//! increments. Both expose the same query surface through `TimeStatistic`,
//! which is what the statistics exporters consume.

use sirsim_types::time::Day;

/// Query surface shared by the continuous and discrete variants.
pub trait TimeStatistic {
    fn name(&self) -> &str;
    /// Total mass: time-weighted sum for the continuous variant, plain sum
    /// of increments for the discrete one.
    fn sum(&self) -> f64;
    fn mean(&self) -> f64;
    fn min(&self) -> f64;
    fn max(&self) -> f64;
    /// Number of accepted observations.
    fn count(&self) -> u64;
}

/// Time-weighted running statistic of a piecewise-constant level.
///
/// Each `record(t, level)` closes the interval since the previous record,
/// weighting the previous level by the elapsed time. The mean is therefore
/// the time average of the level, not the average of the observations.
#[derive(Debug, Clone)]
pub struct ContinuousTimeStatistic {
    name: &'static str,
    current: f64,
    last_time: Day,
    weighted_sum: f64,
    min: f64,
    max: f64,
    count: u64,
}

impl ContinuousTimeStatistic {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            current: 0.0,
            last_time: 0.0,
            weighted_sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            count: 0,
        }
    }

    /// Observes the level at time `t`. Timestamps must be non-decreasing;
    /// the caller (the owning time series) guarantees this.
    pub fn record(&mut self, t: Day, level: f64) {
        self.weighted_sum += self.current * (t - self.last_time);
        self.min = self.min.min(level);
        self.max = self.max.max(level);
        self.current = level;
        self.last_time = t;
        self.count += 1;
    }

    /// Closes the statistic at `t_end`, weighting the final level by the
    /// remaining time.
    pub fn close(&mut self, t_end: Day) {
        if t_end > self.last_time {
            self.weighted_sum += self.current * (t_end - self.last_time);
            self.last_time = t_end;
        }
    }
}

impl TimeStatistic for ContinuousTimeStatistic {
    fn name(&self) -> &str {
        self.name
    }

    fn sum(&self) -> f64 {
        self.weighted_sum
    }

    fn mean(&self) -> f64 {
        if self.last_time > 0.0 {
            self.weighted_sum / self.last_time
        } else {
            0.0
        }
    }

    fn min(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.min
        }
    }

    fn max(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.max
        }
    }

    fn count(&self) -> u64 {
        self.count
    }
}

/// Per-observation statistic over discrete increments.
#[derive(Debug, Clone)]
pub struct DiscreteTimeStatistic {
    name: &'static str,
    sum: f64,
    min: f64,
    max: f64,
    count: u64,
}

impl DiscreteTimeStatistic {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            count: 0,
        }
    }

    pub fn record(&mut self, value: f64) {
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.count += 1;
    }
}

impl TimeStatistic for DiscreteTimeStatistic {
    fn name(&self) -> &str {
        self.name
    }

    fn sum(&self) -> f64 {
        self.sum
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    fn min(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.min
        }
    }

    fn max(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.max
        }
    }

    fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous_mean_is_time_weighted() {
        let mut stat = ContinuousTimeStatistic::new("level");
        // Level 0 on [0, 1), 10 on [1, 3), 4 on [3, 4).
        stat.record(1.0, 10.0);
        stat.record(3.0, 4.0);
        stat.close(4.0);

        assert_eq!(stat.sum(), 10.0 * 2.0 + 4.0 * 1.0);
        assert_eq!(stat.mean(), 24.0 / 4.0);
        assert_eq!(stat.min(), 4.0);
        assert_eq!(stat.max(), 10.0);
    }

    #[test]
    fn continuous_close_is_idempotent_at_same_time() {
        let mut stat = ContinuousTimeStatistic::new("level");
        stat.record(2.0, 5.0);
        stat.close(10.0);
        let sum = stat.sum();
        stat.close(10.0);
        assert_eq!(stat.sum(), sum);
    }

    #[test]
    fn discrete_tracks_observations() {
        let mut stat = DiscreteTimeStatistic::new("increments");
        for value in [1.0, 1.0, 3.0, -1.0] {
            stat.record(value);
        }
        assert_eq!(stat.sum(), 4.0);
        assert_eq!(stat.mean(), 1.0);
        assert_eq!(stat.min(), -1.0);
        assert_eq!(stat.max(), 3.0);
        assert_eq!(stat.count(), 4);
    }

    #[test]
    fn empty_statistics_report_zeros() {
        let stat = DiscreteTimeStatistic::new("empty");
        assert_eq!(stat.mean(), 0.0);
        assert_eq!(stat.min(), 0.0);
        assert_eq!(stat.max(), 0.0);
    }
}
