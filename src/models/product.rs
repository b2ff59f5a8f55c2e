use log::debug;
use serde::{Deserialize, Serialize};

use super::facility::Facility;
use super::station::{StationVisit, VisitStep};
use super::{ProcessId, Step};
use crate::input_modeling::BooleanRandomVariable;
use crate::simulator::Services;
use crate::utils::errors::SimulationError;

/// Number of station phases on every product's route.
pub const ROUTE_LENGTH: usize = 6;

/// A product's workflow: stations 1-3 in order, then stations 4 and 5 in a
/// coin-flipped order, then station 6, and finally a quality inspection
/// that accepts or rejects it.  Rejected products are not reworked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    id: usize,
    phase: usize,
    branch: Option<[usize; 2]>,
    visit: Option<StationVisit>,
}

impl Product {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            phase: 0,
            branch: None,
            visit: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn visit(&self) -> Option<&StationVisit> {
        self.visit.as_ref()
    }

    pub fn status(&self) -> String {
        match &self.visit {
            Some(visit) => format!["Product {}: {}", self.id, visit.status()],
            None => format!["Product {}: phase {}", self.id, self.phase + 1],
        }
    }

    /// The station for the current phase, or `None` once the route is done.
    /// The order of the two middle stations is drawn when it is first needed.
    fn station_for_phase(&mut self, services: &mut Services) -> Result<Option<usize>, SimulationError> {
        match self.phase {
            0..=2 => Ok(Some(self.phase)),
            3 | 4 => {
                let order = match self.branch {
                    Some(order) => order,
                    None => {
                        let first_left = BooleanRandomVariable::Bernoulli { p: 0.5 }
                            .random_variate(services.uniform_rng())?;
                        let order = if first_left {
                            [3, 4]
                        } else {
                            [4, 3]
                        };
                        self.branch = Some(order);
                        order
                    }
                };
                Ok(Some(order[self.phase - 3]))
            }
            5 => Ok(Some(5)),
            _ => Ok(None),
        }
    }

    pub fn resume(
        &mut self,
        process: ProcessId,
        facility: &mut Facility,
        services: &mut Services,
    ) -> Result<Step, SimulationError> {
        loop {
            let mut visit = match self.visit.take() {
                Some(visit) => visit,
                None => match self.station_for_phase(services)? {
                    Some(station) => StationVisit::new(station),
                    None => {
                        self.inspect(facility, services)?;
                        return Ok(Step::Finished);
                    }
                },
            };
            match visit.resume(self.id, process, facility, services)? {
                VisitStep::Suspended => {
                    self.visit = Some(visit);
                    return Ok(Step::Suspended);
                }
                VisitStep::Completed => {
                    debug!(
                        "product {} completes phase {} {:.2}",
                        self.id,
                        visit.station() + 1,
                        services.global_time()
                    );
                    self.phase += 1;
                }
            }
        }
    }

    fn inspect(&mut self, facility: &mut Facility, services: &mut Services) -> Result<(), SimulationError> {
        let rejected = BooleanRandomVariable::Bernoulli {
            p: services.config().rejection_probability,
        }
        .random_variate(services.uniform_rng())?;
        let counters = facility.counters_mut();
        if rejected {
            debug!("product {} rejected {:.2}", self.id, services.global_time());
            counters.rejected_products += 1;
        } else {
            debug!("product {} accepted {:.2}", self.id, services.global_time());
            counters.accepted_products += 1;
        }
        Ok(())
    }

    /// End the workflow early when the day ends around it.
    pub fn close(&mut self, facility: &mut Facility, now: f64) -> Result<(), SimulationError> {
        match self.visit.as_mut() {
            Some(visit) => visit.close(facility, now),
            None => Ok(()),
        }
    }
}
