//! # sirsim-engine::prelude
//!
//! A convenience module that re-exports the most commonly used types from
//! the engine and its dependencies. This simplifies imports for crates that
//! depend on the engine.

pub use crate::{
    events::SirEvent,
    population::{HealthState, Individual, Sex},
    queue::{EventQueue, Queued},
    results::TimeSeriesView,
    samplers::Samplers,
    sim::SirSimulation,
    tally::{
        pyramid::{AgeBreaks, PyramidData, PyramidTimeSeries},
        stats::{ContinuousTimeStatistic, DiscreteTimeStatistic, TimeStatistic},
        time_series::{IncidenceTimeSeries, PrevalenceTimeSeries},
    },
};

pub use sirsim_types::{
    channel::SirChannel,
    errors::{ConfigError, SimError},
    params::SirParams,
    scenario::Scenario,
    time::{day_floor, period_index, Day, DAY_ZERO},
};
