//! # sirsim-engine::population
//!
//! The individual record and its state machine. Each individual traverses
//! `Susceptible -> Infected -> Recovered`; transitions are effected only by
//! the corresponding event handlers, and `Recovered` is absorbing. The
//! population is an ordered `Vec<Individual>` whose indices are stable and
//! serve as the sole identifier carried inside events.

use crate::samplers::Samplers;
use rand_chacha::ChaCha20Rng;

/// Epidemiological state of one individual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Susceptible,
    Infected,
    Recovered,
}

/// Sex category used by the pyramid tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Both categories, in pyramid column order.
    pub const ALL: [Sex; 2] = [Sex::Male, Sex::Female];

    /// Category index inside pyramid tallies.
    pub fn index(&self) -> usize {
        match self {
            Sex::Male => 0,
            Sex::Female => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

/// One member of the population. `sex` and `age` are fixed at
/// initialization; `health` is mutated in place only by event handlers.
#[derive(Debug, Clone, Copy)]
pub struct Individual {
    pub health: HealthState,
    pub sex: Sex,
    pub age: u32,
}

impl Individual {
    /// Draws a new individual with age and sex from the shared samplers.
    pub fn sample(rng: &mut ChaCha20Rng, samplers: &Samplers, health: HealthState) -> Self {
        Self {
            health,
            sex: samplers.sample_sex(rng),
            age: samplers.sample_age(rng),
        }
    }
}
