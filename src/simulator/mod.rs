//! The simulator module provides the mechanics to run the facility as a
//! discrete event simulation: the event scheduler and simulation clock,
//! the blocking `Resource` and `Container` primitives, the configuration,
//! a single simulated day (`Simulation`), and the multi-day `Experiment`.
//!
//! Processes interleave cooperatively on one logical timeline.  A process
//! only gives up control at a blocking request or a timeout, so facility
//! counters are mutated by one process at a time.

use std::collections::BTreeMap;

use log::info;

use crate::input_modeling::UniformRNG;
use crate::models::{AccidentMonitor, Facility, Process, ProcessId, ProductGenerator, Step};
use crate::output_analysis::DayMetrics;
use crate::utils::errors::SimulationError;
use crate::utils::set_panic_hook;

pub mod config;
pub mod container;
pub mod experiment;
pub mod resource;
pub mod scheduler;
pub mod services;
pub mod web;

pub use self::config::{FacilityConfig, NUM_STATIONS};
pub use self::container::{Container, Transfer};
pub use self::experiment::Experiment;
pub use self::resource::{Acquisition, Resource};
pub use self::scheduler::{Resumption, RunOutcome, Scheduler};
pub use self::services::Services;
pub use self::web::WebExperiment;

/// Everything a resumed process may touch, apart from the scheduler.
#[derive(Debug, Clone)]
struct Runtime {
    facility: Facility,
    processes: BTreeMap<ProcessId, Process>,
    next_process_id: usize,
    uniform_rng: UniformRNG,
}

impl Runtime {
    fn spawn(
        &mut self,
        process: Process,
        scheduler: &mut Scheduler<ProcessId>,
    ) -> Result<ProcessId, SimulationError> {
        let id = ProcessId(self.next_process_id);
        self.next_process_id += 1;
        self.processes.insert(id, process);
        scheduler.schedule_after(0.0, id)?;
        Ok(id)
    }

    fn resume(
        &mut self,
        config: &FacilityConfig,
        scheduler: &mut Scheduler<ProcessId>,
        id: ProcessId,
    ) -> Result<Resumption, SimulationError> {
        let mut process = self
            .processes
            .remove(&id)
            .ok_or(SimulationError::ProcessNotFound)?;
        let mut services = Services::new(config, scheduler, &mut self.uniform_rng);
        let step = process.resume(id, &mut self.facility, &mut services)?;
        let spawned = services.into_spawned();
        if step == Step::Suspended {
            self.processes.insert(id, process);
        }
        spawned
            .into_iter()
            .try_for_each(|process| self.spawn(process, scheduler).map(|_| ()))?;
        match step {
            Step::Halt => Ok(Resumption::Halt),
            Step::Suspended | Step::Finished => Ok(Resumption::Continue),
        }
    }

    /// Unwind every process still holding a station or a device, in id
    /// order, at the instant the day ended.
    fn close_in_flight(&mut self, now: f64) -> Result<(), SimulationError> {
        let facility = &mut self.facility;
        self.processes
            .values_mut()
            .try_for_each(|process| process.close(facility, now))
    }
}

/// The `Simulation` struct is one simulated day: a fresh facility, its
/// processes, a scheduler, and the day's random number generator.  The
/// product generator and the accident monitor start at time 0.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: FacilityConfig,
    scheduler: Scheduler<ProcessId>,
    runtime: Runtime,
    outcome: Option<RunOutcome>,
}

impl Simulation {
    /// This constructor method creates a simulated day from a configuration
    /// and a random number generator.
    pub fn post(config: FacilityConfig, uniform_rng: UniformRNG) -> Result<Self, SimulationError> {
        set_panic_hook();
        config.validate()?;
        let mut scheduler = Scheduler::new();
        let mut runtime = Runtime {
            facility: Facility::new(&config),
            processes: BTreeMap::new(),
            next_process_id: 0,
            uniform_rng,
        };
        runtime.spawn(Process::Generator(ProductGenerator::new()), &mut scheduler)?;
        runtime.spawn(Process::AccidentMonitor(AccidentMonitor::new()), &mut scheduler)?;
        Ok(Self {
            config,
            scheduler,
            runtime,
            outcome: None,
        })
    }

    pub fn config(&self) -> &FacilityConfig {
        &self.config
    }

    pub fn facility(&self) -> &Facility {
        &self.runtime.facility
    }

    /// An accessor method for the simulation global time.
    pub fn get_global_time(&self) -> f64 {
        self.scheduler.global_time()
    }

    /// The outcome of the day, once it has ended.
    pub fn outcome(&self) -> Option<RunOutcome> {
        self.outcome
    }

    /// The status of a live process, if it still exists.
    pub fn get_status(&self, id: ProcessId) -> Result<String, SimulationError> {
        Ok(self
            .runtime
            .processes
            .get(&id)
            .ok_or(SimulationError::ProcessNotFound)?
            .status())
    }

    /// Fire a single event.  Once the day ends (at the deadline or by an
    /// accident) its outcome is returned, and further calls return it again.
    pub fn step(&mut self) -> Result<Option<RunOutcome>, SimulationError> {
        if self.outcome.is_some() {
            return Ok(self.outcome);
        }
        let deadline = self.config.simulation_time;
        match self.scheduler.pop_due(deadline) {
            Some(id) => {
                if self.runtime.resume(&self.config, &mut self.scheduler, id)? == Resumption::Halt {
                    let at = self.scheduler.global_time();
                    self.finish(RunOutcome::Halted { at })?;
                    return Ok(self.outcome);
                }
                Ok(None)
            }
            None => {
                self.scheduler.finish_at(deadline);
                self.finish(RunOutcome::Completed)?;
                Ok(self.outcome)
            }
        }
    }

    /// Run the day to its end and report its metrics.
    pub fn run(&mut self) -> Result<DayMetrics, SimulationError> {
        if self.outcome.is_none() {
            let deadline = self.config.simulation_time;
            let config = &self.config;
            let runtime = &mut self.runtime;
            let outcome = self
                .scheduler
                .run_until(deadline, |scheduler, id| runtime.resume(config, scheduler, id))?;
            self.finish(outcome)?;
        }
        Ok(self.metrics())
    }

    fn finish(&mut self, outcome: RunOutcome) -> Result<(), SimulationError> {
        let now = self.scheduler.global_time();
        self.runtime.close_in_flight(now)?;
        self.outcome = Some(outcome);
        info!(
            "Day ended at {:.2} ({} products finished{})",
            now,
            self.runtime.facility.counters().total_products(),
            match outcome {
                RunOutcome::Halted { .. } => ", halted by an accident",
                RunOutcome::Completed => "",
            }
        );
        Ok(())
    }

    /// The metrics of the day so far.  Before the day ends, the elapsed time
    /// is the current simulation time.
    pub fn metrics(&self) -> DayMetrics {
        DayMetrics::from_counters(
            self.runtime.facility.counters(),
            &self.config,
            self.scheduler.global_time(),
            matches!(self.outcome, Some(RunOutcome::Halted { .. })),
        )
    }
}

/// Run one simulated day with the given seed.
pub fn run_simulation(config: &FacilityConfig, seed: u64) -> Result<DayMetrics, SimulationError> {
    Simulation::post(config.clone(), UniformRNG::from_seed(seed))?.run()
}
