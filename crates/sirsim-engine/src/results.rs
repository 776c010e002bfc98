//! # sirsim-engine::results
//!
//! Polymorphic retrieval of tally objects keyed by logical data channel.
//! Instead of a type-parametric lookup there is one accessor per view;
//! each returns a non-owning handle that borrows the simulation and lives
//! for its lifetime.

use crate::{
    sim::SirSimulation,
    tally::{
        pyramid::{PyramidData, PyramidTimeSeries},
        stats::TimeStatistic,
        time_series::{IncidenceTimeSeries, PrevalenceTimeSeries},
    },
};
use sirsim_types::{channel::SirChannel, time::Day};

/// A borrowed view of one channel's time series, unified over the
/// prevalence/incidence split so exporters and the calibration driver can
/// treat every channel alike.
#[derive(Clone, Copy)]
pub enum TimeSeriesView<'a> {
    Prevalence(&'a PrevalenceTimeSeries),
    Incidence(&'a IncidenceTimeSeries),
}

impl<'a> TimeSeriesView<'a> {
    pub fn name(&self) -> &'static str {
        match self {
            TimeSeriesView::Prevalence(ts) => ts.name(),
            TimeSeriesView::Incidence(ts) => ts.name(),
        }
    }

    /// Number of aggregation periods.
    pub fn len(&self) -> usize {
        match self {
            TimeSeriesView::Prevalence(ts) => ts.levels().len(),
            TimeSeriesView::Incidence(ts) => ts.counts().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value of period `p`: the level for prevalence channels, the count
    /// for incidence channels.
    pub fn value(&self, p: usize) -> i64 {
        match self {
            TimeSeriesView::Prevalence(ts) => ts.levels()[p],
            TimeSeriesView::Incidence(ts) => ts.counts()[p],
        }
    }

    /// Value of the series at instant `t`.
    pub fn total_at_time(&self, t: Day) -> i64 {
        match self {
            TimeSeriesView::Prevalence(ts) => ts.level_at(t),
            TimeSeriesView::Incidence(ts) => ts.count_at(t),
        }
    }
}

impl SirSimulation {
    /// The per-period time series of a channel.
    pub fn time_series(&self, channel: SirChannel) -> TimeSeriesView<'_> {
        match channel {
            SirChannel::Susceptible => TimeSeriesView::Prevalence(&self.susceptible),
            SirChannel::Infected => TimeSeriesView::Prevalence(&self.infected),
            SirChannel::Recovered => TimeSeriesView::Prevalence(&self.recovered),
            SirChannel::Infections => TimeSeriesView::Incidence(&self.infections),
            SirChannel::Recoveries => TimeSeriesView::Incidence(&self.recoveries),
        }
    }

    /// The running statistic of a channel: time-weighted for prevalence
    /// channels, per-observation for incidence channels.
    pub fn statistic(&self, channel: SirChannel) -> &dyn TimeStatistic {
        match channel {
            SirChannel::Susceptible => self.susceptible.statistic(),
            SirChannel::Infected => self.infected.statistic(),
            SirChannel::Recovered => self.recovered.statistic(),
            SirChannel::Infections => self.infections.statistic(),
            SirChannel::Recoveries => self.recoveries.statistic(),
        }
    }

    /// The age/sex pyramid time series of a channel.
    pub fn pyramid_series(&self, channel: SirChannel) -> &PyramidTimeSeries {
        match channel {
            SirChannel::Susceptible => &self.susceptible_pyr,
            SirChannel::Infected => &self.infected_pyr,
            SirChannel::Recovered => &self.recovered_pyr,
            SirChannel::Infections => &self.infections_pyr,
            SirChannel::Recoveries => &self.recoveries_pyr,
        }
    }

    /// The final age-bucketed infection-rate summary. Only the Infections
    /// channel carries one; every other channel returns `None`.
    pub fn case_profile(&self, channel: SirChannel) -> Option<&PyramidData<f64>> {
        match channel {
            SirChannel::Infections => Some(&self.infections_age_percent),
            _ => None,
        }
    }
}
