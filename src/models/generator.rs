use log::debug;
use serde::{Deserialize, Serialize};

use super::product::Product;
use super::{Process, ProcessId, Step};
use crate::simulator::Services;
use crate::utils::errors::SimulationError;

/// The generator releases one product per interarrival time, forever, with
/// strictly increasing product ids.  It never waits on the facility, so
/// congestion shows up only as growing waiting times downstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductGenerator {
    next_product: usize,
}

impl ProductGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn released(&self) -> usize {
        self.next_product
    }

    pub fn status(&self) -> String {
        format!["Generating products ({} released)", self.next_product]
    }

    pub fn resume(
        &mut self,
        process: ProcessId,
        services: &mut Services,
    ) -> Result<Step, SimulationError> {
        debug!(
            "product {} released {:.2}",
            self.next_product,
            services.global_time()
        );
        services.spawn(Process::Product(Product::new(self.next_product)));
        self.next_product += 1;
        let interarrival = services.config().product_interarrival_time;
        services.schedule_after(interarrival, process)?;
        Ok(Step::Suspended)
    }
}
