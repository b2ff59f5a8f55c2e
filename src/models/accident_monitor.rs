use log::error;
use serde::{Deserialize, Serialize};

use super::{ProcessId, Step};
use crate::input_modeling::BooleanRandomVariable;
use crate::simulator::Services;
use crate::utils::errors::SimulationError;

/// Time between two accident trials.
pub const POLL_INTERVAL: f64 = 1.0;

/// The accident monitor rolls an accident trial once per time unit.  The
/// first success halts the whole day - there is no recovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentMonitor {
    phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Initializing,
    Running,
    Halted,
}

impl Default for AccidentMonitor {
    fn default() -> Self {
        Self {
            phase: Phase::Initializing,
        }
    }
}

impl AccidentMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> String {
        match self.phase {
            Phase::Initializing | Phase::Running => String::from("Monitoring"),
            Phase::Halted => String::from("Halted"),
        }
    }

    pub fn resume(
        &mut self,
        process: ProcessId,
        services: &mut Services,
    ) -> Result<Step, SimulationError> {
        match self.phase {
            Phase::Initializing => {
                self.phase = Phase::Running;
                services.schedule_after(POLL_INTERVAL, process)?;
                Ok(Step::Suspended)
            }
            Phase::Running => {
                let accident = BooleanRandomVariable::Bernoulli {
                    p: services.config().accident_probability,
                }
                .random_variate(services.uniform_rng())?;
                if accident {
                    self.phase = Phase::Halted;
                    error!("Accident happened at {:.2}", services.global_time());
                    Ok(Step::Halt)
                } else {
                    services.schedule_after(POLL_INTERVAL, process)?;
                    Ok(Step::Suspended)
                }
            }
            Phase::Halted => Err(SimulationError::InvalidModelState),
        }
    }
}
