use log::info;

use super::config::FacilityConfig;
use super::Simulation;
use crate::input_modeling::{UniformRNG, DEFAULT_SEED};
use crate::output_analysis::{DayMetrics, ExperimentResults, ExperimentSummary};
use crate::utils::errors::SimulationError;

/// An experiment runs `iterations` independent simulated days.  Every day
/// gets a fresh facility and scheduler, and a generator seeded from the
/// experiment seed and the day index, so each day is independent of the
/// others while the whole experiment stays reproducible.
#[derive(Debug, Clone)]
pub struct Experiment {
    config: FacilityConfig,
}

impl Experiment {
    pub fn post(config: FacilityConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FacilityConfig {
        &self.config
    }

    /// The seed of the generator for day `day` (counting from 0).
    pub fn day_seed(&self, day: usize) -> u64 {
        self.config
            .seed
            .unwrap_or(DEFAULT_SEED)
            .wrapping_add(day as u64)
    }

    pub fn run(&self) -> Result<ExperimentResults, SimulationError> {
        self.run_with(|_| Ok(()))
    }

    /// Run every day, handing each day's metrics to `observer` as soon as
    /// the day ends.  An observer error stops the experiment.
    pub fn run_with<F>(&self, mut observer: F) -> Result<ExperimentResults, SimulationError>
    where
        F: FnMut(&DayMetrics) -> Result<(), SimulationError>,
    {
        let days = (0..self.config.iterations)
            .map(|day| -> Result<DayMetrics, SimulationError> {
                info!("Simulation {}/{}", day + 1, self.config.iterations);
                let mut simulation = Simulation::post(
                    self.config.clone(),
                    UniformRNG::from_seed(self.day_seed(day)),
                )?;
                let mut metrics = simulation.run()?;
                metrics.day = day;
                observer(&metrics)?;
                Ok(metrics)
            })
            .collect::<Result<Vec<DayMetrics>, SimulationError>>()?;
        let summary = ExperimentSummary::from_days(&days)?;
        Ok(ExperimentResults {
            config: self.config.clone(),
            days,
            summary,
        })
    }
}
