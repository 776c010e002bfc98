//! # sirsim-engine::tally::pyramid
//!
//! Age/sex-stratified tallies. `AgeBreaks` owns the single mapping from an
//! age to its bucket; `PyramidTimeSeries` tracks bucket × sex counts per
//! period (as levels or as incidence counts, selected by kind); and
//! `PyramidData` is the scalar bucket × category tally used for the final
//! infection-rate summary.

use sirsim_types::time::{day_floor, period_index, Day};

/// The age bucketing of a population: interior break points strictly below
/// `age_max`, every `age_break` years starting from `age_min`.
#[derive(Debug, Clone)]
pub struct AgeBreaks {
    age_min: u32,
    age_max: u32,
    breaks: Vec<u32>,
}

impl AgeBreaks {
    pub fn new(age_min: u32, age_max: u32, breaks: Vec<u32>) -> Self {
        debug_assert!(breaks.windows(2).all(|w| w[0] < w[1]), "unsorted breaks");
        debug_assert!(breaks.iter().all(|&b| b > age_min && b < age_max));
        Self {
            age_min,
            age_max,
            breaks,
        }
    }

    /// Index of the bucket containing `age`: the number of break points at
    /// or below it.
    pub fn group_of(&self, age: u32) -> usize {
        self.breaks.partition_point(|&b| b <= age)
    }

    pub fn n_groups(&self) -> usize {
        self.breaks.len() + 1
    }

    /// Human-readable bucket bounds, e.g. `0-9` or `90-100` for the last
    /// (inclusive) bucket.
    pub fn group_label(&self, group: usize) -> String {
        let lo = if group == 0 {
            self.age_min
        } else {
            self.breaks[group - 1]
        };
        if group == self.breaks.len() {
            format!("{lo}-{}", self.age_max)
        } else {
            format!("{lo}-{}", self.breaks[group] - 1)
        }
    }
}

/// Whether a pyramid series records levels or per-period counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PyramidKind {
    /// Levels with carry-forward across quiet periods.
    Prevalence,
    /// Per-period transition counts.
    Incidence,
}

/// A two-dimensional tally over age bucket × sex category × period,
/// updated by age and keyed on `floor(t)`.
#[derive(Debug, Clone)]
pub struct PyramidTimeSeries {
    name: &'static str,
    kind: PyramidKind,
    t_max: u32,
    p_length: u32,
    breaks: AgeBreaks,
    n_cats: usize,
    /// Flat `[period][group][cat]` storage.
    cells: Vec<i64>,
    /// Running level per `[group][cat]`; meaningful for prevalence only.
    current: Vec<i64>,
    last_day: u32,
    last_period: usize,
    closed: bool,
}

impl PyramidTimeSeries {
    pub fn new(
        name: &'static str,
        kind: PyramidKind,
        t_max: u32,
        p_length: u32,
        n_cats: usize,
        breaks: AgeBreaks,
    ) -> Self {
        let n_periods = (t_max / p_length) as usize + 1;
        let n_groups = breaks.n_groups();
        Self {
            name,
            kind,
            t_max,
            p_length,
            breaks,
            n_cats,
            cells: vec![0; n_periods * n_groups * n_cats],
            current: vec![0; n_groups * n_cats],
            last_day: 0,
            last_period: 0,
            closed: false,
        }
    }

    fn cell(&self, period: usize, group: usize, cat: usize) -> usize {
        (period * self.breaks.n_groups() + group) * self.n_cats + cat
    }

    /// Applies `delta` for an individual of the given sex category and age
    /// at time `t` (keyed on whole days). Returns `false` on refusal.
    pub fn update_by_age(&mut self, t: Day, cat: usize, age: u32, delta: i64) -> bool {
        if self.closed || t < 0.0 || t > f64::from(self.t_max) || cat >= self.n_cats {
            return false;
        }
        let day = day_floor(t);
        if day < self.last_day {
            return false;
        }
        let period = period_index(f64::from(day), self.p_length);
        let group = self.breaks.group_of(age);

        match self.kind {
            PyramidKind::Prevalence => {
                for q in self.last_period + 1..=period {
                    let base = self.cell(q, 0, 0);
                    let snapshot_len = self.current.len();
                    self.cells[base..base + snapshot_len].copy_from_slice(&self.current);
                }
                let level = self.current[group * self.n_cats + cat] + delta;
                self.current[group * self.n_cats + cat] = level;
                let idx = self.cell(period, group, cat);
                self.cells[idx] = level;
            }
            PyramidKind::Incidence => {
                let idx = self.cell(period, group, cat);
                self.cells[idx] += delta;
            }
        }
        self.last_day = day;
        self.last_period = period;
        true
    }

    /// Flushes carry-forward (for prevalence) and seals the series.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        if self.kind == PyramidKind::Prevalence {
            let n_periods = self.n_periods();
            for q in self.last_period + 1..n_periods {
                let base = self.cell(q, 0, 0);
                let snapshot_len = self.current.len();
                self.cells[base..base + snapshot_len].copy_from_slice(&self.current);
            }
        }
        self.closed = true;
    }

    pub fn value(&self, period: usize, group: usize, cat: usize) -> i64 {
        self.cells[self.cell(period, group, cat)]
    }

    pub fn n_periods(&self) -> usize {
        (self.t_max / self.p_length) as usize + 1
    }

    pub fn n_cats(&self) -> usize {
        self.n_cats
    }

    pub fn breaks(&self) -> &AgeBreaks {
        &self.breaks
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> PyramidKind {
        self.kind
    }
}

/// A scalar tally over age bucket × category (no time axis).
#[derive(Debug, Clone)]
pub struct PyramidData<T> {
    n_cats: usize,
    breaks: AgeBreaks,
    cells: Vec<T>,
}

impl<T: Copy + Default + std::ops::AddAssign> PyramidData<T> {
    pub fn new(n_cats: usize, breaks: AgeBreaks) -> Self {
        let cells = vec![T::default(); n_cats * breaks.n_groups()];
        Self {
            n_cats,
            breaks,
            cells,
        }
    }

    fn cell(&self, group: usize, cat: usize) -> usize {
        group * self.n_cats + cat
    }

    /// Adds `delta` into the bucket containing `age`.
    pub fn update_by_age(&mut self, cat: usize, age: u32, delta: T) -> bool {
        if cat >= self.n_cats {
            return false;
        }
        let group = self.breaks.group_of(age);
        let idx = self.cell(group, cat);
        self.cells[idx] += delta;
        true
    }

    /// Overwrites one bucket, addressed by group index.
    pub fn set(&mut self, cat: usize, group: usize, value: T) -> bool {
        if cat >= self.n_cats || group >= self.breaks.n_groups() {
            return false;
        }
        let idx = self.cell(group, cat);
        self.cells[idx] = value;
        true
    }

    pub fn get(&self, group: usize, cat: usize) -> T {
        self.cells[self.cell(group, cat)]
    }

    pub fn breaks(&self) -> &AgeBreaks {
        &self.breaks
    }

    pub fn n_cats(&self) -> usize {
        self.n_cats
    }
}

impl<T: Copy + Default + std::iter::Sum> PyramidData<T> {
    pub fn total(&self) -> T {
        self.cells.iter().copied().sum()
    }
}
