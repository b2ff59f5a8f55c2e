use log::debug;
use serde::{Deserialize, Serialize};

use super::facility::Facility;
use super::{ProcessId, Step};
use crate::input_modeling::ContinuousRandomVariable;
use crate::simulator::resource::Acquisition;
use crate::simulator::Services;
use crate::utils::errors::SimulationError;

/// A restock refills one station's bin to full capacity.  It takes a device
/// from the shared restock pool (so at most `restock_devices` refills run at
/// once), spends a normally distributed restock time, and deposits a full
/// bin's worth of material.  It never touches the station itself, so it runs
/// alongside the product that triggered it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restock {
    station: usize,
    phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum Phase {
    Requesting,
    AwaitingDevice,
    Restocking { started: f64 },
    Refilling { started: f64 },
    Completed,
}

impl Restock {
    pub fn new(station: usize) -> Self {
        Self {
            station,
            phase: Phase::Requesting,
        }
    }

    pub fn station(&self) -> usize {
        self.station
    }

    pub fn holds_device(&self) -> bool {
        matches!(
            self.phase,
            Phase::Restocking { .. } | Phase::Refilling { .. }
        )
    }

    pub fn status(&self) -> String {
        match self.phase {
            Phase::Requesting | Phase::AwaitingDevice => {
                format!["Awaiting a restock device for station {}", self.station + 1]
            }
            Phase::Restocking { .. } | Phase::Refilling { .. } => {
                format!["Restocking station {}", self.station + 1]
            }
            Phase::Completed => format!["Restocked station {}", self.station + 1],
        }
    }

    pub fn resume(
        &mut self,
        process: ProcessId,
        facility: &mut Facility,
        services: &mut Services,
    ) -> Result<Step, SimulationError> {
        match self.phase {
            Phase::Requesting => match facility.restock_devices_mut().request(process) {
                Acquisition::Granted => self.begin_restock(process, services),
                Acquisition::Queued => {
                    self.phase = Phase::AwaitingDevice;
                    Ok(Step::Suspended)
                }
            },
            Phase::AwaitingDevice => self.begin_restock(process, services),
            Phase::Restocking { started } => {
                let capacity = facility.bin(self.station)?.capacity();
                let transfer = facility.bin_mut(self.station)?.put(process, capacity)?;
                services.resume_now(transfer.satisfied)?;
                match transfer.acquisition {
                    Acquisition::Granted => self.complete_restock(started, facility, services),
                    Acquisition::Queued => {
                        self.phase = Phase::Refilling { started };
                        Ok(Step::Suspended)
                    }
                }
            }
            Phase::Refilling { started } => self.complete_restock(started, facility, services),
            Phase::Completed => Err(SimulationError::InvalidModelState),
        }
    }

    fn begin_restock(
        &mut self,
        process: ProcessId,
        services: &mut Services,
    ) -> Result<Step, SimulationError> {
        let config = services.config();
        let restock_time = ContinuousRandomVariable::Normal {
            mean: config.restock_time_mean,
            std_dev: config.restock_time_std_dev,
        }
        .non_negative_variate(services.uniform_rng())?;
        services.schedule_after(restock_time, process)?;
        self.phase = Phase::Restocking {
            started: services.global_time(),
        };
        Ok(Step::Suspended)
    }

    fn complete_restock(
        &mut self,
        started: f64,
        facility: &mut Facility,
        services: &mut Services,
    ) -> Result<Step, SimulationError> {
        let now = services.global_time();
        let counters = facility.counters_mut();
        counters.restock_device_busy_time += now - started;
        counters.restocks_completed += 1;
        debug!("station {} restocked {:.2}", self.station + 1, now);
        let next = facility.restock_devices_mut().release()?;
        services.resume_now(next)?;
        self.phase = Phase::Completed;
        Ok(Step::Finished)
    }

    /// End the restock early when the day ends around it, returning any
    /// held device to the pool.  An unfinished refill records no busy time.
    pub fn close(&mut self, facility: &mut Facility) -> Result<(), SimulationError> {
        if self.holds_device() {
            facility.restock_devices_mut().release()?;
        }
        self.phase = Phase::Completed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::config::FacilityConfig;
    use crate::simulator::scheduler::Scheduler;
    use crate::input_modeling::UniformRNG;

    #[test]
    fn restock_refills_an_empty_bin_and_frees_its_device() {
        let config = FacilityConfig {
            bin_capacity: 1,
            restock_devices: 1,
            ..FacilityConfig::default()
        };
        let mut facility = Facility::new(&config);
        let mut scheduler = Scheduler::new();
        let mut uniform_rng = UniformRNG::default();
        let consumer = ProcessId(7);
        facility.bin_mut(2).unwrap().get(consumer, 1).unwrap();
        let mut restock = Restock::new(2);
        let restocker = ProcessId(8);
        {
            let mut services = Services::new(&config, &mut scheduler, &mut uniform_rng);
            assert_eq!(
                Step::Suspended,
                restock.resume(restocker, &mut facility, &mut services).unwrap()
            );
        }
        assert_eq!(1, facility.restock_devices().holders());
        assert![restock.holds_device()];
        assert_eq!(Some(restocker), scheduler.pop_due(f64::INFINITY));
        let finished_at = scheduler.global_time();
        {
            let mut services = Services::new(&config, &mut scheduler, &mut uniform_rng);
            assert_eq!(
                Step::Finished,
                restock.resume(restocker, &mut facility, &mut services).unwrap()
            );
        }
        assert_eq!(1, facility.bin(2).unwrap().level());
        assert_eq!(0, facility.restock_devices().holders());
        assert_eq!(1, facility.counters().restocks_completed);
        assert![(facility.counters().restock_device_busy_time - finished_at).abs() < 1e-12];
    }
}
