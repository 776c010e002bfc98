//! # sirsim-engine::tally
//!
//! The tally structures the simulation aggregates into: per-period time
//! series (prevalence levels and incidence counts), age/sex pyramid
//! tallies, and running statistics. Their update invariants are coupled to
//! event ordering: a tally only ever accepts non-decreasing timestamps, and
//! refuses (rather than panics on) anything else.

pub mod pyramid;
pub mod stats;
pub mod time_series;
