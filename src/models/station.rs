use log::debug;
use serde::{Deserialize, Serialize};

use super::facility::Facility;
use super::restock::Restock;
use super::{Process, ProcessId};
use crate::input_modeling::{BooleanRandomVariable, ContinuousRandomVariable};
use crate::simulator::resource::Acquisition;
use crate::simulator::Services;
use crate::utils::errors::SimulationError;

/// A single pass of a product through one station: queue for the station,
/// withdraw one unit of material from the station's bin, process, and -
/// on every `maintenance_interval`-th unit - possibly undergo maintenance
/// before the station is released.  The visit suspends at each of these
/// blocking points and remembers where it left off in `phase`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationVisit {
    station: usize,
    phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum Phase {
    Arriving,
    QueuedForStation { since: f64 },
    QueuedForMaterial { acquired_at: f64, since: f64 },
    Processing { acquired_at: f64 },
    Maintaining { acquired_at: f64, since: f64 },
    Completed,
}

/// Whether a visit is still underway after a resumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitStep {
    Suspended,
    Completed,
}

impl StationVisit {
    pub fn new(station: usize) -> Self {
        Self {
            station,
            phase: Phase::Arriving,
        }
    }

    pub fn station(&self) -> usize {
        self.station
    }

    /// The visit holds its station from the moment it is granted until it
    /// is released, material waits and maintenance included.
    pub fn holds_station(&self) -> bool {
        matches!(
            self.phase,
            Phase::QueuedForMaterial { .. } | Phase::Processing { .. } | Phase::Maintaining { .. }
        )
    }

    pub fn status(&self) -> String {
        match self.phase {
            Phase::Arriving => format!["Arriving at station {}", self.station + 1],
            Phase::QueuedForStation { .. } => format!["Queued for station {}", self.station + 1],
            Phase::QueuedForMaterial { .. } => {
                format!["Waiting for material at station {}", self.station + 1]
            }
            Phase::Processing { .. } => format!["Processing at station {}", self.station + 1],
            Phase::Maintaining { .. } => format!["Held by maintenance at station {}", self.station + 1],
            Phase::Completed => format!["Done with station {}", self.station + 1],
        }
    }

    pub fn resume(
        &mut self,
        product: usize,
        process: ProcessId,
        facility: &mut Facility,
        services: &mut Services,
    ) -> Result<VisitStep, SimulationError> {
        let now = services.global_time();
        match self.phase {
            Phase::Arriving => {
                debug!(
                    "product {} requests station {} {:.2}",
                    product,
                    self.station + 1,
                    now
                );
                match facility.station_mut(self.station)?.request(process) {
                    Acquisition::Granted => self.acquire_material(product, process, now, facility, services),
                    Acquisition::Queued => {
                        self.phase = Phase::QueuedForStation { since: now };
                        Ok(VisitStep::Suspended)
                    }
                }
            }
            Phase::QueuedForStation { since } => {
                facility.counters_mut().station_waiting_time[self.station] += now - since;
                self.acquire_material(product, process, now, facility, services)
            }
            Phase::QueuedForMaterial { acquired_at, since } => {
                facility.counters_mut().bin_waiting_time[self.station] += now - since;
                self.begin_processing(product, process, acquired_at, facility, services)
            }
            Phase::Processing { acquired_at } => {
                self.complete_processing(product, process, acquired_at, facility, services)
            }
            Phase::Maintaining { acquired_at, since } => {
                facility.record_maintenance(self.station, now - since);
                debug!(
                    "maintenance completed at station {} {:.2}",
                    self.station + 1,
                    now
                );
                self.release_station(acquired_at, facility, services)
            }
            Phase::Completed => Err(SimulationError::InvalidModelState),
        }
    }

    fn acquire_material(
        &mut self,
        product: usize,
        process: ProcessId,
        acquired_at: f64,
        facility: &mut Facility,
        services: &mut Services,
    ) -> Result<VisitStep, SimulationError> {
        let transfer = facility.bin_mut(self.station)?.get(process, 1)?;
        services.resume_now(transfer.satisfied)?;
        match transfer.acquisition {
            Acquisition::Granted => {
                self.begin_processing(product, process, acquired_at, facility, services)
            }
            Acquisition::Queued => {
                self.phase = Phase::QueuedForMaterial {
                    acquired_at,
                    since: services.global_time(),
                };
                Ok(VisitStep::Suspended)
            }
        }
    }

    fn begin_processing(
        &mut self,
        product: usize,
        process: ProcessId,
        acquired_at: f64,
        facility: &mut Facility,
        services: &mut Services,
    ) -> Result<VisitStep, SimulationError> {
        debug!(
            "product {} got material from station {} {:.2}",
            product,
            self.station + 1,
            services.global_time()
        );
        // The unit is already in hand, so the refill runs on its own
        if facility.bin(self.station)?.level() == 0 {
            services.spawn(Process::Restock(Restock::new(self.station)));
            debug!(
                "restock for station {} {:.2}",
                self.station + 1,
                services.global_time()
            );
        }
        let config = services.config();
        let processing_time = ContinuousRandomVariable::Normal {
            mean: config.processing_time_mean,
            std_dev: config.processing_time_std_dev,
        }
        .non_negative_variate(services.uniform_rng())?;
        services.schedule_after(processing_time, process)?;
        self.phase = Phase::Processing { acquired_at };
        Ok(VisitStep::Suspended)
    }

    fn complete_processing(
        &mut self,
        product: usize,
        process: ProcessId,
        acquired_at: f64,
        facility: &mut Facility,
        services: &mut Services,
    ) -> Result<VisitStep, SimulationError> {
        let now = services.global_time();
        debug!(
            "product {} processed at station {} {:.2}",
            product,
            self.station + 1,
            now
        );
        let config = services.config();
        let processed = facility.record_processed(self.station);
        let failed = processed % config.maintenance_interval == 0
            && (BooleanRandomVariable::Bernoulli {
                p: config.station_failure_probabilities[self.station],
            })
            .random_variate(services.uniform_rng())?;
        if failed {
            debug!(
                "station {} requires maintenance {:.2}",
                self.station + 1,
                now
            );
            // Maintenance borrows the product's own hold on the station
            let maintenance_time = ContinuousRandomVariable::exp_with_mean(
                config.maintenance_time_mean,
            )
            .random_variate(services.uniform_rng())?;
            services.schedule_after(maintenance_time, process)?;
            self.phase = Phase::Maintaining {
                acquired_at,
                since: now,
            };
            return Ok(VisitStep::Suspended);
        }
        self.release_station(acquired_at, facility, services)
    }

    fn release_station(
        &mut self,
        acquired_at: f64,
        facility: &mut Facility,
        services: &mut Services,
    ) -> Result<VisitStep, SimulationError> {
        facility.counters_mut().station_busy_time[self.station] +=
            services.global_time() - acquired_at;
        let next = facility.station_mut(self.station)?.release()?;
        services.resume_now(next)?;
        self.phase = Phase::Completed;
        Ok(VisitStep::Completed)
    }

    /// End the visit early, at `now`, when the day ends around it.  A held
    /// station still has its busy time accounted and is released, and an
    /// interrupted maintenance is counted up to `now`.  Busy time of a unit
    /// that never finished processing is also kept apart, so it does not
    /// count towards the per-unit production time.
    pub fn close(&mut self, facility: &mut Facility, now: f64) -> Result<(), SimulationError> {
        let acquired_at = match self.phase {
            Phase::QueuedForMaterial { acquired_at, .. }
            | Phase::Processing { acquired_at }
            | Phase::Maintaining { acquired_at, .. } => acquired_at,
            _ => return Ok(()),
        };
        match self.phase {
            Phase::Maintaining { since, .. } => {
                facility.record_maintenance(self.station, now - since)
            }
            _ => facility.counters_mut().unfinished_busy_time[self.station] += now - acquired_at,
        }
        facility.counters_mut().station_busy_time[self.station] += now - acquired_at;
        facility.station_mut(self.station)?.release()?;
        self.phase = Phase::Completed;
        Ok(())
    }
}
