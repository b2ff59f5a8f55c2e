use serde::{Deserialize, Serialize};

use crate::models::FacilityCounters;
use crate::simulator::config::FacilityConfig;
use crate::utils::{argmax, ratio_or_zero};

/// The station that spent the most time with products queueing for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    /// Zero-based station index; ties resolve to the lowest index
    pub bottleneck_station: usize,
    pub max_waiting_time: f64,
    pub waiting_times: Vec<f64>,
}

impl Bottleneck {
    pub fn from_waiting_times(waiting_times: &[f64]) -> Self {
        let (bottleneck_station, max_waiting_time) = argmax(waiting_times).unwrap_or((0, 0.0));
        Self {
            bottleneck_station,
            max_waiting_time,
            waiting_times: waiting_times.to_vec(),
        }
    }
}

/// The metrics of one simulated day.  Per-station lists hold one entry per
/// station, in station order.  Keys are snake_case, matching the records
/// the dashboard reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayMetrics {
    pub day: usize,
    pub accepted_products: usize,
    pub rejected_products: usize,
    pub total_products: usize,
    /// Simulated time the day actually ran - shorter than the configured
    /// simulation time when an accident halted it
    pub elapsed_time: f64,
    pub accident: bool,
    pub occupancy_per_workstation: Vec<f64>,
    pub avg_production_time: Vec<f64>,
    pub downtime_per_workstation: Vec<f64>,
    pub processed_per_workstation: Vec<usize>,
    pub maintenance_events_per_workstation: Vec<usize>,
    pub supplier_occupancy: f64,
    pub avg_fix_time: f64,
    /// Station queueing plus bin waiting, per finished product
    pub avg_delay_time: f64,
    pub faulty_product_rate: f64,
    pub production_rejection_percentage: f64,
    pub bottleneck_workstations: Bottleneck,
    pub bin_waiting_times: Vec<f64>,
}

impl DayMetrics {
    pub fn from_counters(
        counters: &FacilityCounters,
        config: &FacilityConfig,
        elapsed_time: f64,
        accident: bool,
    ) -> Self {
        let total_products = counters.total_products();
        let total = total_products as f64;
        let faulty_product_rate = ratio_or_zero(counters.rejected_products as f64, total);
        let total_delay = counters.station_waiting_time.iter().sum::<f64>()
            + counters.bin_waiting_time.iter().sum::<f64>();
        Self {
            day: 0,
            accepted_products: counters.accepted_products,
            rejected_products: counters.rejected_products,
            total_products,
            elapsed_time,
            accident,
            occupancy_per_workstation: counters
                .station_busy_time
                .iter()
                .map(|busy| ratio_or_zero(*busy, elapsed_time))
                .collect(),
            avg_production_time: counters
                .station_busy_time
                .iter()
                .zip(counters.unfinished_busy_time.iter())
                .zip(counters.station_processed.iter())
                .map(|((busy, unfinished), processed)| {
                    ratio_or_zero(busy - unfinished, *processed as f64)
                })
                .collect(),
            downtime_per_workstation: counters.maintenance_downtime.clone(),
            processed_per_workstation: counters.station_processed.clone(),
            maintenance_events_per_workstation: counters.maintenance_events.clone(),
            supplier_occupancy: ratio_or_zero(
                counters.restock_device_busy_time,
                elapsed_time * config.restock_devices as f64,
            ),
            avg_fix_time: ratio_or_zero(
                counters.total_maintenance_time,
                counters.total_maintenance_events as f64,
            ),
            avg_delay_time: ratio_or_zero(total_delay, total),
            faulty_product_rate,
            production_rejection_percentage: faulty_product_rate * 100.0,
            bottleneck_workstations: Bottleneck::from_waiting_times(
                &counters.station_waiting_time,
            ),
            bin_waiting_times: counters.bin_waiting_time.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epsilon() -> f64 {
        1.0e-12
    }

    fn counters() -> FacilityCounters {
        FacilityCounters {
            accepted_products: 18,
            rejected_products: 2,
            station_busy_time: vec![50.0, 40.0, 30.0, 20.0, 10.0, 0.0],
            station_processed: vec![10, 10, 10, 5, 5, 0],
            maintenance_downtime: vec![0.0, 0.0, 6.0, 0.0, 0.0, 0.0],
            maintenance_events: vec![0, 0, 2, 0, 0, 0],
            station_waiting_time: vec![1.0, 7.0, 7.0, 2.0, 0.0, 0.0],
            bin_waiting_time: vec![0.0, 0.0, 3.0, 0.0, 0.0, 0.0],
            unfinished_busy_time: vec![0.0, 0.0, 0.0, 4.0, 0.0, 0.0],
            restock_device_busy_time: 12.0,
            restocks_completed: 4,
            total_maintenance_time: 6.0,
            total_maintenance_events: 2,
        }
    }

    #[test]
    fn ratios_follow_the_counters() {
        let config = FacilityConfig {
            restock_devices: 3,
            ..FacilityConfig::default()
        };
        let metrics = DayMetrics::from_counters(&counters(), &config, 100.0, false);
        assert_eq!(20, metrics.total_products);
        assert!((metrics.occupancy_per_workstation[0] - 0.5).abs() < epsilon());
        assert!(metrics.avg_production_time[5].abs() < epsilon());
        assert!((metrics.supplier_occupancy - 0.04).abs() < epsilon());
        assert!((metrics.avg_fix_time - 3.0).abs() < epsilon());
        assert!((metrics.avg_delay_time - 1.0).abs() < epsilon());
        assert!((metrics.faulty_product_rate - 0.1).abs() < epsilon());
        assert!((metrics.production_rejection_percentage - 10.0).abs() < epsilon());
    }

    #[test]
    fn unfinished_units_stay_out_of_production_time() {
        let metrics = DayMetrics::from_counters(&counters(), &FacilityConfig::default(), 100.0, false);
        assert!((metrics.avg_production_time[3] - 3.2).abs() < epsilon());
        assert!((metrics.avg_production_time[0] - 5.0).abs() < epsilon());
        assert!((metrics.occupancy_per_workstation[3] - 0.2).abs() < epsilon());
    }

    #[test]
    fn bottleneck_ties_resolve_to_the_lowest_station() {
        let metrics = DayMetrics::from_counters(&counters(), &FacilityConfig::default(), 100.0, false);
        assert_eq!(1, metrics.bottleneck_workstations.bottleneck_station);
        assert!((metrics.bottleneck_workstations.max_waiting_time - 7.0).abs() < epsilon());
    }

    #[test]
    fn empty_day_reports_zero_ratios() {
        let metrics = DayMetrics::from_counters(
            &FacilityCounters::default(),
            &FacilityConfig::default(),
            100.0,
            true,
        );
        assert_eq!(0, metrics.total_products);
        assert!(metrics.avg_fix_time.abs() < epsilon());
        assert!(metrics.avg_delay_time.abs() < epsilon());
        assert!(metrics.faulty_product_rate.abs() < epsilon());
        assert_eq!(0, metrics.bottleneck_workstations.bottleneck_station);
        assert!(metrics.accident);
    }
}
