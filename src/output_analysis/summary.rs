use std::fmt;

use serde::{Deserialize, Serialize};

use super::metrics::DayMetrics;
use super::IndependentSample;
use crate::simulator::config::{FacilityConfig, NUM_STATIONS};
use crate::utils::errors::SimulationError;

fn column<F>(days: &[DayMetrics], metric: F) -> Vec<f64>
where
    F: Fn(&DayMetrics) -> f64,
{
    days.iter().map(metric).collect()
}

fn per_station_mean<F>(days: &[DayMetrics], metric: F) -> Vec<f64>
where
    F: Fn(&DayMetrics) -> &[f64],
{
    let mut means = vec![0.0; NUM_STATIONS];
    days.iter().for_each(|day| {
        metric(day)
            .iter()
            .zip(means.iter_mut())
            .for_each(|(value, mean)| *mean += value);
    });
    let count = days.len().max(1) as f64;
    means.iter_mut().for_each(|mean| *mean /= count);
    means
}

/// One column per station, each holding that station's value for every
/// day.
fn station_columns<F>(days: &[DayMetrics], metric: F) -> Vec<Vec<f64>>
where
    F: Fn(&DayMetrics) -> &[f64],
{
    (0..NUM_STATIONS)
        .map(|station| column(days, |day| metric(day).get(station).copied().unwrap_or(0.0)))
        .collect()
}

/// Averages of the day metrics over every day of an experiment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub days: usize,
    pub accepted_products: IndependentSample<f64>,
    pub rejected_products: IndependentSample<f64>,
    pub total_products: IndependentSample<f64>,
    pub faulty_product_rate: IndependentSample<f64>,
    pub production_rejection_percentage: f64,
    pub avg_delay_time: IndependentSample<f64>,
    pub avg_fix_time: f64,
    pub supplier_occupancy: f64,
    pub occupancy_per_workstation: Vec<f64>,
    pub avg_production_time: Vec<f64>,
    pub downtime_per_workstation: Vec<f64>,
    pub bottleneck_waiting_times: Vec<f64>,
    /// Number of days each station was the bottleneck
    pub bottleneck_frequency: Vec<usize>,
    /// Share of days that ended in an accident
    pub accident_rate: f64,
}

impl ExperimentSummary {
    pub fn from_days(days: &[DayMetrics]) -> Result<Self, SimulationError> {
        if days.is_empty() {
            return Err(SimulationError::EmptySample);
        }
        let faulty_product_rate =
            IndependentSample::post(column(days, |day| day.faulty_product_rate))?;
        let mut bottleneck_frequency = vec![0; NUM_STATIONS];
        days.iter().for_each(|day| {
            if let Some(count) =
                bottleneck_frequency.get_mut(day.bottleneck_workstations.bottleneck_station)
            {
                *count += 1;
            }
        });
        let count = days.len() as f64;
        Ok(Self {
            days: days.len(),
            accepted_products: IndependentSample::post(column(days, |day| {
                day.accepted_products as f64
            }))?,
            rejected_products: IndependentSample::post(column(days, |day| {
                day.rejected_products as f64
            }))?,
            total_products: IndependentSample::post(column(days, |day| day.total_products as f64))?,
            production_rejection_percentage: faulty_product_rate.point_estimate_mean() * 100.0,
            faulty_product_rate,
            avg_delay_time: IndependentSample::post(column(days, |day| day.avg_delay_time))?,
            avg_fix_time: column(days, |day| day.avg_fix_time).iter().sum::<f64>() / count,
            supplier_occupancy: column(days, |day| day.supplier_occupancy)
                .iter()
                .sum::<f64>()
                / count,
            occupancy_per_workstation: per_station_mean(days, |day| {
                day.occupancy_per_workstation.as_slice()
            }),
            avg_production_time: per_station_mean(days, |day| day.avg_production_time.as_slice()),
            downtime_per_workstation: per_station_mean(days, |day| {
                day.downtime_per_workstation.as_slice()
            }),
            bottleneck_waiting_times: per_station_mean(days, |day| {
                day.bottleneck_workstations.waiting_times.as_slice()
            }),
            bottleneck_frequency,
            accident_rate: days.iter().filter(|day| day.accident).count() as f64 / count,
        })
    }

    /// The station most often found to be the bottleneck, lowest index first
    /// on ties.
    pub fn most_frequent_bottleneck(&self) -> usize {
        self.bottleneck_frequency
            .iter()
            .enumerate()
            .fold((0, 0), |best, (station, count)| {
                if *count > best.1 {
                    (station, *count)
                } else {
                    best
                }
            })
            .0
    }
}

impl fmt::Display for ExperimentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Average values over {} simulated days ---", self.days)?;
        writeln!(
            f,
            "Accepted products: {:.2}",
            self.accepted_products.point_estimate_mean()
        )?;
        writeln!(
            f,
            "Rejected products: {:.2}",
            self.rejected_products.point_estimate_mean()
        )?;
        writeln!(
            f,
            "Total products: {:.2}",
            self.total_products.point_estimate_mean()
        )?;
        writeln!(
            f,
            "Faulty product rate: {:.4}",
            self.faulty_product_rate.point_estimate_mean()
        )?;
        writeln!(
            f,
            "Production rejection percentage: {:.2}%",
            self.production_rejection_percentage
        )?;
        writeln!(
            f,
            "Bottleneck delay: {:.2}",
            self.avg_delay_time.point_estimate_mean()
        )?;
        writeln!(f, "Average fix time: {:.2}", self.avg_fix_time)?;
        writeln!(f, "Supplier occupancy: {:.4}", self.supplier_occupancy)?;
        writeln!(
            f,
            "Accident occurrence rate: {:.2}%",
            self.accident_rate * 100.0
        )?;
        writeln!(
            f,
            "Longest station queue wait: {:.2}",
            self.bottleneck_waiting_times
                .iter()
                .copied()
                .fold(0.0, f64::max)
        )?;
        for station in 0..self.occupancy_per_workstation.len() {
            writeln!(
                f,
                "Workstation {}: occupancy {:.4}, production time {:.2}, downtime {:.2}, waiting time {:.2}",
                station + 1,
                self.occupancy_per_workstation[station],
                self.avg_production_time.get(station).copied().unwrap_or(0.0),
                self.downtime_per_workstation.get(station).copied().unwrap_or(0.0),
                self.bottleneck_waiting_times.get(station).copied().unwrap_or(0.0),
            )?;
        }
        write!(
            f,
            "Most frequent bottleneck: workstation {}",
            self.most_frequent_bottleneck() + 1
        )
    }
}

/// Column-oriented view of the day metrics, one list per metric, as used
/// for plotting the evolution of an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub accepted_products: Vec<usize>,
    pub rejected_products: Vec<usize>,
    pub total_products: Vec<usize>,
    pub faulty_product_rate: Vec<f64>,
    pub avg_delay_time: Vec<f64>,
    pub supplier_occupancy: Vec<f64>,
    pub avg_fix_time: Vec<f64>,
    pub accident: Vec<bool>,
    /// Indexed by station, then by day
    pub occupancy_per_workstation: Vec<Vec<f64>>,
    /// Indexed by station, then by day
    pub avg_production_time: Vec<Vec<f64>>,
    /// Indexed by station, then by day
    pub downtime_per_workstation: Vec<Vec<f64>>,
    pub bottleneck_station: Vec<usize>,
}

/// The days and summary of an experiment, along with the configuration
/// they were produced with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentResults {
    pub config: FacilityConfig,
    pub days: Vec<DayMetrics>,
    pub summary: ExperimentSummary,
}

impl ExperimentResults {
    pub fn series(&self) -> MetricSeries {
        MetricSeries {
            accepted_products: self.days.iter().map(|day| day.accepted_products).collect(),
            rejected_products: self.days.iter().map(|day| day.rejected_products).collect(),
            total_products: self.days.iter().map(|day| day.total_products).collect(),
            faulty_product_rate: column(&self.days, |day| day.faulty_product_rate),
            avg_delay_time: column(&self.days, |day| day.avg_delay_time),
            supplier_occupancy: column(&self.days, |day| day.supplier_occupancy),
            avg_fix_time: column(&self.days, |day| day.avg_fix_time),
            accident: self.days.iter().map(|day| day.accident).collect(),
            occupancy_per_workstation: station_columns(&self.days, |day| {
                day.occupancy_per_workstation.as_slice()
            }),
            avg_production_time: station_columns(&self.days, |day| {
                day.avg_production_time.as_slice()
            }),
            downtime_per_workstation: station_columns(&self.days, |day| {
                day.downtime_per_workstation.as_slice()
            }),
            bottleneck_station: self
                .days
                .iter()
                .map(|day| day.bottleneck_workstations.bottleneck_station)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FacilityCounters;

    fn epsilon() -> f64 {
        1.0e-12
    }

    fn day(day: usize, accepted: usize, rejected: usize, waiting: Vec<f64>, accident: bool) -> DayMetrics {
        let counters = FacilityCounters {
            accepted_products: accepted,
            rejected_products: rejected,
            station_waiting_time: waiting,
            ..FacilityCounters::default()
        };
        let mut metrics =
            DayMetrics::from_counters(&counters, &FacilityConfig::default(), 100.0, accident);
        metrics.day = day;
        metrics
    }

    fn days() -> Vec<DayMetrics> {
        vec![
            day(0, 9, 1, vec![0.0, 0.0, 5.0, 0.0, 0.0, 0.0], false),
            day(1, 17, 3, vec![0.0, 0.0, 1.0, 4.0, 0.0, 0.0], true),
        ]
    }

    #[test]
    fn summary_averages_over_days() {
        let summary = ExperimentSummary::from_days(&days()).unwrap();
        assert_eq!(2, summary.days);
        assert!((summary.accepted_products.point_estimate_mean() - 13.0).abs() < epsilon());
        assert!((summary.total_products.point_estimate_mean() - 15.0).abs() < epsilon());
        assert!((summary.faulty_product_rate.point_estimate_mean() - 0.125).abs() < epsilon());
        assert!((summary.production_rejection_percentage - 12.5).abs() < epsilon());
        assert!((summary.accident_rate - 0.5).abs() < epsilon());
        assert!((summary.bottleneck_waiting_times[2] - 3.0).abs() < epsilon());
        assert_eq!(vec![0, 0, 1, 1, 0, 0], summary.bottleneck_frequency);
        assert_eq!(2, summary.most_frequent_bottleneck());
    }

    #[test]
    fn summary_of_no_days_is_an_error() {
        assert!(matches!(
            ExperimentSummary::from_days(&[]),
            Err(SimulationError::EmptySample)
        ));
    }

    #[test]
    fn report_labels_stations_from_one() {
        let report = ExperimentSummary::from_days(&days()).unwrap().to_string();
        assert!(report.starts_with("--- Average values over 2 simulated days ---"));
        assert!(report.contains("Workstation 1:"));
        assert!(report.contains("Workstation 6:"));
        assert!(!report.contains("Workstation 0:"));
        assert!(report.ends_with("Most frequent bottleneck: workstation 3"));
        assert!(report.contains("Bottleneck delay: "));
        assert!(report.contains("Accident occurrence rate: 50.00%"));
        assert!(report.contains("Longest station queue wait: 3.00"));
    }

    #[test]
    fn series_is_column_oriented() {
        let days = days();
        let results = ExperimentResults {
            config: FacilityConfig::default(),
            summary: ExperimentSummary::from_days(&days).unwrap(),
            days,
        };
        let series = results.series();
        assert_eq!(vec![10, 20], series.total_products);
        assert_eq!(vec![2, 3], series.bottleneck_station);
        assert_eq!(NUM_STATIONS, series.occupancy_per_workstation.len());
        assert_eq!(2, series.occupancy_per_workstation[0].len());
        assert_eq!(vec![false, true], series.accident);
        assert_eq!(2, series.avg_fix_time.len());
        assert_eq!(NUM_STATIONS, series.avg_production_time.len());
        assert_eq!(NUM_STATIONS, series.downtime_per_workstation.len());
        assert!(series
            .downtime_per_workstation
            .iter()
            .chain(series.avg_production_time.iter())
            .all(|station| station.len() == 2));
        let keys = serde_json::to_value(&series).unwrap();
        ["avg_fix_time", "accident", "avg_production_time", "downtime_per_workstation"]
            .iter()
            .for_each(|key| assert![keys.get(key).is_some()]);
    }
}
