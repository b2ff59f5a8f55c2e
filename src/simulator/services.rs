use super::config::FacilityConfig;
use super::scheduler::Scheduler;
use crate::input_modeling::UniformRNG;
use crate::models::{Process, ProcessId};
use crate::utils::errors::SimulationError;

/// The simulator provides the configuration, the random number generator,
/// the clock and event scheduling to a process while it is resumed.
/// Processes spawned during the resumption are collected here, and started
/// by the simulator once the resumption returns.
pub struct Services<'a> {
    config: &'a FacilityConfig,
    scheduler: &'a mut Scheduler<ProcessId>,
    uniform_rng: &'a mut UniformRNG,
    spawned: Vec<Process>,
}

impl<'a> Services<'a> {
    pub fn new(
        config: &'a FacilityConfig,
        scheduler: &'a mut Scheduler<ProcessId>,
        uniform_rng: &'a mut UniformRNG,
    ) -> Self {
        Self {
            config,
            scheduler,
            uniform_rng,
            spawned: Vec::new(),
        }
    }

    pub fn config(&self) -> &'a FacilityConfig {
        self.config
    }

    pub fn uniform_rng(&mut self) -> &mut UniformRNG {
        self.uniform_rng
    }

    pub fn global_time(&self) -> f64 {
        self.scheduler.global_time()
    }

    /// Suspend `process` on a timeout of `delay`.
    pub fn schedule_after(&mut self, delay: f64, process: ProcessId) -> Result<(), SimulationError> {
        self.scheduler.schedule_after(delay, process)
    }

    /// Resume processes whose blocking request was just satisfied, at the
    /// current instant and in the order they were satisfied.
    pub fn resume_now<I>(&mut self, processes: I) -> Result<(), SimulationError>
    where
        I: IntoIterator<Item = ProcessId>,
    {
        processes
            .into_iter()
            .try_for_each(|process| self.scheduler.schedule_after(0.0, process))
    }

    /// Launch an independent process, which starts at the current instant.
    pub fn spawn(&mut self, process: Process) {
        self.spawned.push(process);
    }

    pub fn into_spawned(self) -> Vec<Process> {
        self.spawned
    }
}
