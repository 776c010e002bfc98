//! # sirsim-engine::tally::time_series
//!
//! The per-channel time series. A `PrevalenceTimeSeries` tracks the level
//! of a state over time, bucketed into periods with carry-forward across
//! quiet periods; an `IncidenceTimeSeries` counts transitions per period.
//! Both refuse updates that run backwards in time, past the horizon, or
//! after `close()` — refusal is reported as `false` and left to the caller
//! to log, never panicked on.

use crate::tally::stats::{ContinuousTimeStatistic, DiscreteTimeStatistic};
use sirsim_types::time::{period_index, Day};

/// Net-level samples of a state, aggregated into periods of `p_length`
/// days over `[0, t_max]`.
#[derive(Debug, Clone)]
pub struct PrevalenceTimeSeries {
    name: &'static str,
    t_max: u32,
    p_length: u32,
    /// Level observed in each period, carry-forward across gaps.
    levels: Vec<i64>,
    current: i64,
    last_time: Day,
    last_period: usize,
    closed: bool,
    stat: ContinuousTimeStatistic,
}

impl PrevalenceTimeSeries {
    pub fn new(name: &'static str, t_max: u32, p_length: u32) -> Self {
        let n_periods = (t_max / p_length) as usize + 1;
        Self {
            name,
            t_max,
            p_length,
            levels: vec![0; n_periods],
            current: 0,
            last_time: 0.0,
            last_period: 0,
            closed: false,
            stat: ContinuousTimeStatistic::new(name),
        }
    }

    /// Applies a level change at time `t`. Returns `false` when the update
    /// is refused: series closed, `t` behind the last accepted record, or
    /// `t` past the horizon.
    pub fn record(&mut self, t: Day, delta: i64) -> bool {
        if self.closed || t < self.last_time || t > f64::from(self.t_max) {
            return false;
        }
        let period = period_index(t, self.p_length);
        if period >= self.levels.len() {
            return false;
        }
        // Quiet periods keep the level they ended with.
        for slot in &mut self.levels[self.last_period..period] {
            *slot = self.current;
        }
        self.current += delta;
        self.levels[period] = self.current;
        self.stat.record(t, self.current as f64);
        self.last_time = t;
        self.last_period = period;
        true
    }

    /// Flushes the carry-forward into every remaining period and seals the
    /// series against further updates.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        for slot in &mut self.levels[self.last_period..] {
            *slot = self.current;
        }
        self.stat.close(f64::from(self.t_max));
        self.closed = true;
    }

    /// The level right now, after the most recent accepted record.
    pub fn current_prevalence(&self) -> i64 {
        self.current
    }

    /// The level at time `t`. For instants past the last record this is
    /// the current level (the series is piecewise constant).
    pub fn level_at(&self, t: Day) -> i64 {
        let period = period_index(t, self.p_length);
        if period > self.last_period || period >= self.levels.len() {
            self.current
        } else {
            self.levels[period]
        }
    }

    /// Per-period levels. Only fully meaningful after `close()`.
    pub fn levels(&self) -> &[i64] {
        &self.levels
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn statistic(&self) -> &ContinuousTimeStatistic {
        &self.stat
    }
}

/// Count increments bucketed into periods of `p_length` days.
#[derive(Debug, Clone)]
pub struct IncidenceTimeSeries {
    name: &'static str,
    t_max: u32,
    p_length: u32,
    counts: Vec<i64>,
    total: i64,
    last_time: Day,
    closed: bool,
    stat: DiscreteTimeStatistic,
}

impl IncidenceTimeSeries {
    pub fn new(name: &'static str, t_max: u32, p_length: u32) -> Self {
        let n_periods = (t_max / p_length) as usize + 1;
        Self {
            name,
            t_max,
            p_length,
            counts: vec![0; n_periods],
            total: 0,
            last_time: 0.0,
            closed: false,
            stat: DiscreteTimeStatistic::new(name),
        }
    }

    /// Adds `delta` transitions at time `t`, with the same refusal rules as
    /// the prevalence series.
    pub fn record(&mut self, t: Day, delta: i64) -> bool {
        if self.closed || t < self.last_time || t > f64::from(self.t_max) {
            return false;
        }
        let period = period_index(t, self.p_length);
        if period >= self.counts.len() {
            return false;
        }
        self.counts[period] += delta;
        self.total += delta;
        self.stat.record(delta as f64);
        self.last_time = t;
        true
    }

    /// Seals the series against further updates.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Cumulative count across all periods.
    pub fn total(&self) -> i64 {
        self.total
    }

    /// Count recorded in the period containing `t`.
    pub fn count_at(&self, t: Day) -> i64 {
        let period = period_index(t, self.p_length);
        if period >= self.counts.len() {
            0
        } else {
            self.counts[period]
        }
    }

    pub fn counts(&self) -> &[i64] {
        &self.counts
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn statistic(&self) -> &DiscreteTimeStatistic {
        &self.stat
    }
}
