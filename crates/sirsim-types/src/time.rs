//! # sirsim-types::time
//!
//! Defines the representation of time within the simulation.
//! Simulation time is continuous and measured in days; events may fire at
//! arbitrary fractional instants, while the tally structures aggregate into
//! fixed-width periods.

/// The fundamental unit of time in the simulation, measured in days.
pub type Day = f64;

/// The start of simulation time.
pub const DAY_ZERO: Day = 0.0;

/// Maps an instant to the aggregation period containing it.
///
/// Every period bucket has width `p_length`; this is the one definition of
/// the `t -> floor(t / p_length)` mapping, reused by every tally.
pub fn period_index(t: Day, p_length: u32) -> usize {
    debug_assert!(t >= DAY_ZERO, "negative simulation time");
    debug_assert!(p_length > 0, "zero period length");
    (t / f64::from(p_length)).floor() as usize
}

/// Truncates an instant to whole days. The pyramid tallies key their
/// updates on `floor(t)`.
pub fn day_floor(t: Day) -> u32 {
    debug_assert!(t >= DAY_ZERO, "negative simulation time");
    t.floor() as u32
}
