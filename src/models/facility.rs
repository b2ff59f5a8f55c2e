use serde::{Deserialize, Serialize};

use super::ProcessId;
use crate::simulator::config::{FacilityConfig, NUM_STATIONS};
use crate::simulator::container::Container;
use crate::simulator::resource::Resource;
use crate::utils::errors::SimulationError;

/// The counters accumulated over one simulated day.  They are only mutated
/// by the process currently being resumed, so no further synchronization is
/// needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityCounters {
    pub accepted_products: usize,
    pub rejected_products: usize,
    pub station_busy_time: Vec<f64>,
    pub station_processed: Vec<usize>,
    pub maintenance_downtime: Vec<f64>,
    pub maintenance_events: Vec<usize>,
    /// Time spent queueing for each station
    pub station_waiting_time: Vec<f64>,
    /// Time spent, while holding a station, waiting for its bin material
    pub bin_waiting_time: Vec<f64>,
    /// Part of the busy time spent on units still unfinished when the day
    /// ended
    pub unfinished_busy_time: Vec<f64>,
    pub restock_device_busy_time: f64,
    pub restocks_completed: usize,
    pub total_maintenance_time: f64,
    pub total_maintenance_events: usize,
}

impl Default for FacilityCounters {
    fn default() -> Self {
        Self {
            accepted_products: 0,
            rejected_products: 0,
            station_busy_time: vec![0.0; NUM_STATIONS],
            station_processed: vec![0; NUM_STATIONS],
            maintenance_downtime: vec![0.0; NUM_STATIONS],
            maintenance_events: vec![0; NUM_STATIONS],
            station_waiting_time: vec![0.0; NUM_STATIONS],
            bin_waiting_time: vec![0.0; NUM_STATIONS],
            unfinished_busy_time: vec![0.0; NUM_STATIONS],
            restock_device_busy_time: 0.0,
            restocks_completed: 0,
            total_maintenance_time: 0.0,
            total_maintenance_events: 0,
        }
    }
}

impl FacilityCounters {
    pub fn total_products(&self) -> usize {
        self.accepted_products + self.rejected_products
    }
}

/// The facility owns six single-capacity stations, one material bin per
/// station, the shared pool of restock devices, and the day's counters.
/// A fresh facility is built for every simulated day.
#[derive(Debug, Clone)]
pub struct Facility {
    stations: Vec<Resource<ProcessId>>,
    bins: Vec<Container<ProcessId>>,
    restock_devices: Resource<ProcessId>,
    counters: FacilityCounters,
}

impl Facility {
    pub fn new(config: &FacilityConfig) -> Self {
        Self {
            stations: (0..NUM_STATIONS).map(|_| Resource::new(1)).collect(),
            bins: (0..NUM_STATIONS)
                .map(|_| Container::full(config.bin_capacity))
                .collect(),
            restock_devices: Resource::new(config.restock_devices),
            counters: FacilityCounters::default(),
        }
    }

    pub fn station(&self, station: usize) -> Result<&Resource<ProcessId>, SimulationError> {
        self.stations
            .get(station)
            .ok_or(SimulationError::InvalidModelState)
    }

    pub fn station_mut(
        &mut self,
        station: usize,
    ) -> Result<&mut Resource<ProcessId>, SimulationError> {
        self.stations
            .get_mut(station)
            .ok_or(SimulationError::InvalidModelState)
    }

    pub fn bin(&self, station: usize) -> Result<&Container<ProcessId>, SimulationError> {
        self.bins.get(station).ok_or(SimulationError::InvalidModelState)
    }

    pub fn bin_mut(
        &mut self,
        station: usize,
    ) -> Result<&mut Container<ProcessId>, SimulationError> {
        self.bins
            .get_mut(station)
            .ok_or(SimulationError::InvalidModelState)
    }

    pub fn restock_devices(&self) -> &Resource<ProcessId> {
        &self.restock_devices
    }

    pub fn restock_devices_mut(&mut self) -> &mut Resource<ProcessId> {
        &mut self.restock_devices
    }

    pub fn counters(&self) -> &FacilityCounters {
        &self.counters
    }

    pub fn counters_mut(&mut self) -> &mut FacilityCounters {
        &mut self.counters
    }

    pub fn record_maintenance(&mut self, station: usize, duration: f64) {
        self.counters.maintenance_downtime[station] += duration;
        self.counters.maintenance_events[station] += 1;
        self.counters.total_maintenance_time += duration;
        self.counters.total_maintenance_events += 1;
    }

    /// Count a processed unit at `station`, returning the running count.
    pub fn record_processed(&mut self, station: usize) -> usize {
        self.counters.station_processed[station] += 1;
        self.counters.station_processed[station]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_facility_starts_idle_with_full_bins() {
        let config = FacilityConfig {
            bin_capacity: 7,
            restock_devices: 2,
            ..FacilityConfig::default()
        };
        let facility = Facility::new(&config);
        (0..NUM_STATIONS).for_each(|station| {
            assert_eq!(1, facility.station(station).unwrap().capacity());
            assert_eq!(0, facility.station(station).unwrap().holders());
            assert_eq!(7, facility.bin(station).unwrap().level());
        });
        assert_eq!(2, facility.restock_devices().capacity());
        assert_eq!(0, facility.counters().total_products());
        assert!(facility.station(NUM_STATIONS).is_err());
    }

    #[test]
    fn maintenance_accumulates_station_and_global_totals() {
        let mut facility = Facility::new(&FacilityConfig::default());
        facility.record_maintenance(3, 2.5);
        facility.record_maintenance(3, 1.5);
        facility.record_maintenance(1, 1.0);
        let counters = facility.counters();
        assert![(counters.maintenance_downtime[3] - 4.0).abs() < f64::EPSILON];
        assert_eq!(2, counters.maintenance_events[3]);
        assert_eq!(3, counters.total_maintenance_events);
        assert![(counters.total_maintenance_time - 5.0).abs() < f64::EPSILON];
    }
}
