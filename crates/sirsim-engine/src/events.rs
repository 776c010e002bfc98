//! # sirsim-engine::events
//!
//! Defines the SIR event model: the three event kinds that drive the
//! population state machine. Events are a tagged payload dispatched by the
//! simulation driver; each carries at most a stable population index, so
//! the simulation owns all data and events never hold references into it.

use sirsim_types::errors::SimError;

/// One scheduled state transition in the epidemic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SirEvent {
    /// Individual `idx` becomes infected; schedules its own recovery.
    Infection { idx: usize },
    /// Individual `idx` recovers. Recovered is absorbing.
    Recovery { idx: usize },
    /// Re-evaluate the force of infection over the whole population and
    /// reschedule itself one tick later.
    FoiUpdate,
}

impl SirEvent {
    /// Builds an infection event, rejecting out-of-range indices before
    /// anything reaches the queue.
    pub fn infection(idx: usize, n_people: usize) -> Result<Self, SimError> {
        Self::check_idx(idx, n_people)?;
        Ok(SirEvent::Infection { idx })
    }

    /// Builds a recovery event, with the same range check.
    pub fn recovery(idx: usize, n_people: usize) -> Result<Self, SimError> {
        Self::check_idx(idx, n_people)?;
        Ok(SirEvent::Recovery { idx })
    }

    fn check_idx(idx: usize, n_people: usize) -> Result<(), SimError> {
        if idx >= n_people {
            return Err(SimError::IndexOutOfRange { idx, n: n_people });
        }
        Ok(())
    }
}
