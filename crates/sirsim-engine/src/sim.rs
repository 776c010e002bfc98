//! # sirsim-engine::sim
//!
//! This file contains the `SirSimulation` struct, which is the main entry
//! point and orchestrator for one epidemic trajectory. It owns the
//! population, the tally set, the samplers, the RNG, and the event queue.
//! The `run` method forms the core of the discrete-event simulation loop:
//! pop the earliest event, fire it, stop at the horizon or on fade-out.

use crate::{
    events::SirEvent,
    population::{HealthState, Individual},
    queue::EventQueue,
    samplers::Samplers,
    tally::{
        pyramid::{AgeBreaks, PyramidData, PyramidKind, PyramidTimeSeries},
        time_series::{IncidenceTimeSeries, PrevalenceTimeSeries},
    },
};
use rand_chacha::ChaCha20Rng;
use sirsim_types::{
    channel::SirChannel,
    errors::SimError,
    params::SirParams,
    time::{Day, DAY_ZERO},
};

/// The index case is always the first individual in the population.
const INDEX_CASE: usize = 0;

/// The first force-of-infection update fires strictly after the index-case
/// infection at t = 0, so FOI reads a tallied I(t) >= 1.
const FIRST_FOI_OFFSET: Day = 0.001;

/// Pyramid tallies stratify by the two sex categories.
const SEX_CATEGORIES: usize = 2;

/// One complete SIR trajectory: population state, tallies, and the event
/// queue, all owned by this instance. Nothing is shared between instances,
/// so trajectories can run on independent threads.
pub struct SirSimulation {
    params: SirParams,
    rng: ChaCha20Rng,
    samplers: Samplers,
    population: Vec<Individual>,
    queue: EventQueue<SirEvent>,

    // Time-series datastores, one per channel.
    pub(crate) susceptible: PrevalenceTimeSeries,
    pub(crate) infected: PrevalenceTimeSeries,
    pub(crate) recovered: PrevalenceTimeSeries,
    pub(crate) infections: IncidenceTimeSeries,
    pub(crate) recoveries: IncidenceTimeSeries,

    // Pyramid time-series datastores.
    pub(crate) susceptible_pyr: PyramidTimeSeries,
    pub(crate) infected_pyr: PyramidTimeSeries,
    pub(crate) recovered_pyr: PyramidTimeSeries,
    pub(crate) infections_pyr: PyramidTimeSeries,
    pub(crate) recoveries_pyr: PyramidTimeSeries,

    // Scalar age profiles for the final infection-rate summary.
    pub(crate) total_age_counts: PyramidData<i64>,
    pub(crate) infections_age_counts: PyramidData<i64>,
    pub(crate) infections_age_percent: PyramidData<f64>,

    refused_updates: u64,
    failed_events: u64,
    has_run: bool,
}

impl SirSimulation {
    /// Validates the parameters and allocates every datastore. The caller
    /// supplies the RNG; the simulation owns it from here on, so
    /// independently seeded instances are fully independent.
    pub fn new(rng: ChaCha20Rng, params: SirParams) -> Result<Self, SimError> {
        params.validate()?;

        let samplers = Samplers::new(&params)?;
        let breaks = AgeBreaks::new(params.age_min, params.age_max, params.age_breaks());
        let (t_max, p_length) = (params.t_max, params.p_length);

        let prevalence = |name| PrevalenceTimeSeries::new(name, t_max, p_length);
        let incidence = |name| IncidenceTimeSeries::new(name, t_max, p_length);
        let pyramid = |name, kind| {
            PyramidTimeSeries::new(name, kind, t_max, p_length, SEX_CATEGORIES, breaks.clone())
        };

        let mut sim = Self {
            rng,
            samplers,
            population: Vec::with_capacity(params.n_people as usize),
            queue: EventQueue::new(),

            susceptible: prevalence("Susceptible"),
            infected: prevalence("Infected"),
            recovered: prevalence("Recovered"),
            infections: incidence("Infections"),
            recoveries: incidence("Recoveries"),

            susceptible_pyr: pyramid("Susceptible", PyramidKind::Prevalence),
            infected_pyr: pyramid("Infected", PyramidKind::Prevalence),
            recovered_pyr: pyramid("Recovered", PyramidKind::Prevalence),
            infections_pyr: pyramid("Infections", PyramidKind::Incidence),
            recoveries_pyr: pyramid("Recoveries", PyramidKind::Incidence),

            total_age_counts: PyramidData::new(1, breaks.clone()),
            infections_age_counts: PyramidData::new(1, breaks.clone()),
            infections_age_percent: PyramidData::new(1, breaks),

            refused_updates: 0,
            failed_events: 0,
            has_run: false,
            params,
        };
        sim.populate();
        Ok(sim)
    }

    /// Creates the N susceptible individuals and records them into the
    /// Susceptible channel and the total age profile at t = 0.
    fn populate(&mut self) {
        for _ in 0..self.params.n_people {
            let idv = Individual::sample(&mut self.rng, &self.samplers, HealthState::Susceptible);
            self.population.push(idv);
            self.record_individual(DAY_ZERO, SirChannel::Susceptible, idv, 1);
            self.total_age_counts.update_by_age(0, idv.age, 1);
        }
    }

    /// Runs the trajectory to completion. A simulation runs exactly once;
    /// its tallies are the durable result.
    pub fn run(&mut self) -> Result<(), SimError> {
        if self.has_run {
            return Err(SimError::AlreadyRun);
        }
        self.has_run = true;

        // Bootstrap: the index case, then the first FOI update strictly
        // after it.
        let index_case = SirEvent::infection(INDEX_CASE, self.population.len())?;
        self.queue.schedule(DAY_ZERO, index_case);
        self.queue.schedule(FIRST_FOI_OFFSET, SirEvent::FoiUpdate);

        let t_max = f64::from(self.params.t_max);
        while let Some(queued) = match self.queue.peek_time() {
            Some(when) if when < t_max => self.queue.pop(),
            _ => None,
        } {
            if !self.dispatch(queued.time, queued.payload) {
                self.failed_events += 1;
            }
            if self.infected.current_prevalence() == 0 {
                tracing::debug!(t = queued.time, "no infected individuals left; fading out");
                break;
            }
        }

        self.finalize();
        Ok(())
    }

    fn dispatch(&mut self, t: Day, event: SirEvent) -> bool {
        tracing::trace!(t, ?event, "firing event");
        match event {
            SirEvent::Infection { idx } => self.fire_infection(t, idx),
            SirEvent::Recovery { idx } => self.fire_recovery(t, idx),
            SirEvent::FoiUpdate => self.fire_foi_update(t),
        }
    }

    /// S -> I for one individual: tallies first, then the recovery is
    /// scheduled, then the state flips. Tally order matters so a FOI update
    /// at the same timestamp sees a consistent I(t).
    fn fire_infection(&mut self, t: Day, idx: usize) -> bool {
        let idv = self.population[idx];
        if idv.health != HealthState::Susceptible {
            // Double-scheduled by near-coincident FOI updates; the first
            // infection won.
            tracing::trace!(t, idx, state = ?idv.health, "skipping infection of non-susceptible");
            return true;
        }

        let mut ok = self.record_individual(t, SirChannel::Susceptible, idv, -1);
        ok &= self.record_individual(t, SirChannel::Infected, idv, 1);
        ok &= self.record_individual(t, SirChannel::Infections, idv, 1);

        let recovery_delay = self.samplers.time_to_recovery(&mut self.rng);
        match SirEvent::recovery(idx, self.population.len()) {
            Ok(ev) => self.queue.schedule(t + recovery_delay, ev),
            Err(err) => {
                tracing::error!(%err, "recovery factory rejected a live index");
                ok = false;
            }
        }

        self.population[idx].health = HealthState::Infected;
        ok
    }

    /// I -> R for one individual. Recovered is absorbing.
    fn fire_recovery(&mut self, t: Day, idx: usize) -> bool {
        let idv = self.population[idx];
        if idv.health != HealthState::Infected {
            tracing::trace!(t, idx, state = ?idv.health, "skipping recovery of non-infected");
            return true;
        }

        let mut ok = self.record_individual(t, SirChannel::Infected, idv, -1);
        ok &= self.record_individual(t, SirChannel::Recovered, idv, 1);
        ok &= self.record_individual(t, SirChannel::Recoveries, idv, 1);

        self.population[idx].health = HealthState::Recovered;
        ok
    }

    /// Re-evaluates the force of infection lambda * I(t) / N and races an
    /// exponential waiting time against the tick for every susceptible.
    /// Always reschedules itself one tick later; when I(t) = 0 the rate is
    /// zero and no sampling happens at all, which is the natural fade-out.
    fn fire_foi_update(&mut self, t: Day) -> bool {
        let infected_now = self.infected.level_at(t);
        let rate =
            self.params.lambda * infected_now as f64 / f64::from(self.params.n_people);
        let tick = f64::from(self.params.delta_t);

        let mut ok = true;
        for idx in 0..self.population.len() {
            if self.population[idx].health != HealthState::Susceptible {
                continue;
            }
            if let Some(tti) = Samplers::time_to_infection(&mut self.rng, rate) {
                if tti < tick {
                    match SirEvent::infection(idx, self.population.len()) {
                        Ok(ev) => self.queue.schedule(t + tti, ev),
                        Err(err) => {
                            tracing::error!(%err, "infection factory rejected a live index");
                            ok = false;
                        }
                    }
                }
            }
        }

        self.queue.schedule(t + tick, SirEvent::FoiUpdate);
        ok
    }

    /// Increments the relevant time series and pyramid for an individual at
    /// time `t`. Refusals are counted and logged but never halt the loop.
    fn record_individual(
        &mut self,
        t: Day,
        channel: SirChannel,
        idv: Individual,
        delta: i64,
    ) -> bool {
        let cat = idv.sex.index();
        let ok = match channel {
            SirChannel::Susceptible => {
                let pyr = self.susceptible_pyr.update_by_age(t, cat, idv.age, delta);
                let ts = self.susceptible.record(t, delta);
                pyr && ts
            }
            SirChannel::Infected => {
                let pyr = self.infected_pyr.update_by_age(t, cat, idv.age, delta);
                let ts = self.infected.record(t, delta);
                pyr && ts
            }
            SirChannel::Recovered => {
                let pyr = self.recovered_pyr.update_by_age(t, cat, idv.age, delta);
                let ts = self.recovered.record(t, delta);
                pyr && ts
            }
            SirChannel::Infections => {
                let pyr = self.infections_pyr.update_by_age(t, cat, idv.age, delta);
                let ts = self.infections.record(t, delta);
                // Feed the scalar age profile for the final percentages.
                let ages = self.infections_age_counts.update_by_age(0, idv.age, delta);
                pyr && ts && ages
            }
            SirChannel::Recoveries => {
                let pyr = self.recoveries_pyr.update_by_age(t, cat, idv.age, delta);
                let ts = self.recoveries.record(t, delta);
                pyr && ts
            }
        };
        if !ok {
            self.refused_updates += 1;
            tracing::warn!(t, %channel, delta, "tally refused an update");
        }
        ok
    }

    /// Computes the per-bucket infection rates and closes every datastore,
    /// flushing the final period.
    fn finalize(&mut self) {
        for group in 0..self.total_age_counts.breaks().n_groups() {
            let members = self.total_age_counts.get(group, 0);
            let cases = self.infections_age_counts.get(group, 0);
            let percent = if members > 0 {
                cases as f64 / members as f64
            } else {
                0.0
            };
            self.infections_age_percent.set(0, group, percent);
        }

        self.susceptible.close();
        self.infected.close();
        self.recovered.close();
        self.infections.close();
        self.recoveries.close();

        self.susceptible_pyr.close();
        self.infected_pyr.close();
        self.recovered_pyr.close();
        self.infections_pyr.close();
        self.recoveries_pyr.close();

        tracing::info!(
            t_final = self.queue.now(),
            infections = self.infections.total(),
            recoveries = self.recoveries.total(),
            refused_updates = self.refused_updates,
            failed_events = self.failed_events,
            "trajectory complete"
        );
    }

    pub fn params(&self) -> &SirParams {
        &self.params
    }

    /// Number of tally updates refused since construction. Non-zero values
    /// are a diagnostic condition, not a failure.
    pub fn refused_updates(&self) -> u64 {
        self.refused_updates
    }

    /// Number of events that reported failure.
    pub fn failed_events(&self) -> u64 {
        self.failed_events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn sim_with(seed: u64, params: SirParams) -> SirSimulation {
        SirSimulation::new(ChaCha20Rng::seed_from_u64(seed), params).unwrap()
    }

    #[test]
    fn conservation_holds_in_every_period() {
        let mut sim = sim_with(7, SirParams::default());
        sim.run().unwrap();

        let n = i64::from(sim.params().n_people);
        let (s, i, r) = (
            sim.susceptible.levels(),
            sim.infected.levels(),
            sim.recovered.levels(),
        );
        for p in 0..s.len() {
            assert_eq!(s[p] + i[p] + r[p], n, "S+I+R != N in period {p}");
        }
    }

    #[test]
    fn susceptible_is_non_increasing_and_counts_non_negative() {
        let mut sim = sim_with(21, SirParams::default());
        sim.run().unwrap();

        let s = sim.susceptible.levels();
        assert!(s.windows(2).all(|w| w[1] <= w[0]), "S must not grow");
        assert!(sim.infections.counts().iter().all(|&c| c >= 0));
        assert!(sim.recoveries.counts().iter().all(|&c| c >= 0));
        assert!(sim.infections.total() >= 1, "the index case always counts");
    }

    #[test]
    fn infections_bound_recoveries() {
        let mut sim = sim_with(3, SirParams::default());
        sim.run().unwrap();
        assert!(sim.recoveries.total() <= sim.infections.total());
        assert_eq!(
            sim.infections.total() - sim.recoveries.total(),
            sim.infected.current_prevalence(),
        );
    }

    #[test]
    fn every_individual_ends_in_a_legal_state() {
        let mut sim = sim_with(11, SirParams::default());
        sim.run().unwrap();
        // After fade-out nobody is left Infected.
        if sim.infected.current_prevalence() == 0 {
            assert!(sim
                .population
                .iter()
                .all(|idv| idv.health != HealthState::Infected));
        }
    }

    #[test]
    fn index_case_removed_means_immediate_fade_out() {
        let mut sim = sim_with(5, SirParams {
            n_people: 5,
            ..SirParams::default()
        });
        sim.population[INDEX_CASE].health = HealthState::Recovered;
        sim.run().unwrap();

        assert_eq!(sim.infections.total(), 0);
        assert_eq!(sim.infected.current_prevalence(), 0);
        assert_eq!(sim.failed_events(), 0);
    }

    #[test]
    fn a_simulation_runs_exactly_once() {
        let mut sim = sim_with(1, SirParams::default());
        sim.run().unwrap();
        assert_eq!(sim.run(), Err(SimError::AlreadyRun));
    }

    #[test]
    fn refused_updates_stay_zero_on_the_happy_path() {
        let mut sim = sim_with(13, SirParams::default());
        sim.run().unwrap();
        assert_eq!(sim.refused_updates(), 0);
        assert_eq!(sim.failed_events(), 0);
    }
}
