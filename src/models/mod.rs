//! The models module provides the processes of the manufacturing facility,
//! and the facility itself.  Each process is an explicit state machine: it
//! is resumed by the simulator whenever an event for it fires, does its
//! work up to the next blocking point (a station or device request, a bin
//! withdrawal or deposit, or a timeout), records where it stopped, and
//! hands control back.

pub mod accident_monitor;
pub mod facility;
pub mod generator;
pub mod product;
pub mod restock;
pub mod station;

use serde::{Deserialize, Serialize};

use crate::simulator::Services;
use crate::utils::errors::SimulationError;

pub use self::accident_monitor::AccidentMonitor;
pub use self::facility::{Facility, FacilityCounters};
pub use self::generator::ProductGenerator;
pub use self::product::Product;
pub use self::restock::Restock;
pub use self::station::StationVisit;

/// Identifies a live process.  Events, resource queues and container
/// queues all refer to processes by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProcessId(pub usize);

/// What a process reports after being resumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Waiting on a timeout or a blocking request
    Suspended,
    /// Done - the process generates no further events
    Finished,
    /// Done, and the whole simulated day must stop now
    Halt,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Process {
    Generator(ProductGenerator),
    AccidentMonitor(AccidentMonitor),
    Product(Product),
    Restock(Restock),
}

impl Process {
    pub fn status(&self) -> String {
        match self {
            Process::Generator(generator) => generator.status(),
            Process::AccidentMonitor(monitor) => monitor.status(),
            Process::Product(product) => product.status(),
            Process::Restock(restock) => restock.status(),
        }
    }

    pub fn resume(
        &mut self,
        id: ProcessId,
        facility: &mut Facility,
        services: &mut Services,
    ) -> Result<Step, SimulationError> {
        match self {
            Process::Generator(generator) => generator.resume(id, services),
            Process::AccidentMonitor(monitor) => monitor.resume(id, services),
            Process::Product(product) => product.resume(id, facility, services),
            Process::Restock(restock) => restock.resume(id, facility, services),
        }
    }

    /// Close any scoped hold the process still has when the day ends at
    /// `now`, whether by deadline or by accident.
    pub fn close(&mut self, facility: &mut Facility, now: f64) -> Result<(), SimulationError> {
        match self {
            Process::Product(product) => product.close(facility, now),
            Process::Restock(restock) => restock.close(facility),
            Process::Generator(_) | Process::AccidentMonitor(_) => Ok(()),
        }
    }
}
