use serde::{Deserialize, Serialize};

use crate::utils::errors::SimulationError;

/// The facility always has six stations, one per manufacturing phase.
pub const NUM_STATIONS: usize = 6;

fn default_bin_capacity() -> usize {
    25
}

fn default_restock_devices() -> usize {
    3
}

fn default_restock_time_mean() -> f64 {
    2.0
}

fn default_maintenance_interval() -> usize {
    5
}

fn default_maintenance_time_mean() -> f64 {
    3.0
}

fn default_processing_time_mean() -> f64 {
    4.0
}

fn default_rejection_probability() -> f64 {
    0.05
}

fn default_accident_probability() -> f64 {
    0.0001
}

fn default_simulation_time() -> f64 {
    5000.0
}

fn default_iterations() -> usize {
    1
}

fn default_station_failure_probabilities() -> Vec<f64> {
    vec![0.02, 0.01, 0.05, 0.15, 0.07, 0.06]
}

fn default_interarrival_time() -> f64 {
    1.0
}

fn default_std_dev() -> f64 {
    0.5
}

/// The facility configuration is an immutable set of named parameters,
/// built once (from defaults, a JSON/YAML document, or command line
/// overrides) and then passed by reference into every simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityConfig {
    #[serde(default = "default_bin_capacity")]
    pub bin_capacity: usize,
    #[serde(default = "default_restock_devices")]
    pub restock_devices: usize,
    #[serde(default = "default_restock_time_mean")]
    pub restock_time_mean: f64,
    #[serde(default = "default_std_dev")]
    pub restock_time_std_dev: f64,
    /// Every `maintenance_interval`-th unit processed at a station rolls a
    /// failure trial for that station.
    #[serde(default = "default_maintenance_interval")]
    pub maintenance_interval: usize,
    #[serde(default = "default_maintenance_time_mean")]
    pub maintenance_time_mean: f64,
    #[serde(default = "default_processing_time_mean")]
    pub processing_time_mean: f64,
    #[serde(default = "default_std_dev")]
    pub processing_time_std_dev: f64,
    #[serde(default = "default_rejection_probability")]
    pub rejection_probability: f64,
    #[serde(default = "default_accident_probability")]
    pub accident_probability: f64,
    #[serde(default = "default_simulation_time")]
    pub simulation_time: f64,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    #[serde(default = "default_station_failure_probabilities")]
    pub station_failure_probabilities: Vec<f64>,
    #[serde(default = "default_interarrival_time")]
    pub product_interarrival_time: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub plot: bool,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            bin_capacity: default_bin_capacity(),
            restock_devices: default_restock_devices(),
            restock_time_mean: default_restock_time_mean(),
            restock_time_std_dev: default_std_dev(),
            maintenance_interval: default_maintenance_interval(),
            maintenance_time_mean: default_maintenance_time_mean(),
            processing_time_mean: default_processing_time_mean(),
            processing_time_std_dev: default_std_dev(),
            rejection_probability: default_rejection_probability(),
            accident_probability: default_accident_probability(),
            simulation_time: default_simulation_time(),
            iterations: default_iterations(),
            station_failure_probabilities: default_station_failure_probabilities(),
            product_interarrival_time: default_interarrival_time(),
            seed: None,
            plot: false,
        }
    }
}

fn invalid(field: &str, requirement: &str) -> SimulationError {
    SimulationError::InvalidConfiguration(format!["{} must be {}", field, requirement])
}

fn check_positive_count(field: &str, value: usize) -> Result<(), SimulationError> {
    if value == 0 {
        Err(invalid(field, "at least 1"))
    } else {
        Ok(())
    }
}

fn check_probability(field: &str, value: f64) -> Result<(), SimulationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, "a probability within [0, 1]"))
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<(), SimulationError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "a finite, non-negative number"))
    }
}

fn check_positive(field: &str, value: f64) -> Result<(), SimulationError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "a finite, positive number"))
    }
}

impl FacilityConfig {
    pub fn from_json(config: &str) -> Result<Self, SimulationError> {
        let config: Self = serde_json::from_str(config)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(config: &str) -> Result<Self, SimulationError> {
        let config: Self = serde_yaml::from_str(config)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range parameters before any simulated day starts.
    pub fn validate(&self) -> Result<(), SimulationError> {
        check_positive_count("binCapacity", self.bin_capacity)?;
        check_positive_count("restockDevices", self.restock_devices)?;
        check_positive_count("maintenanceInterval", self.maintenance_interval)?;
        check_positive_count("iterations", self.iterations)?;
        check_non_negative("restockTimeMean", self.restock_time_mean)?;
        check_non_negative("restockTimeStdDev", self.restock_time_std_dev)?;
        check_non_negative("processingTimeMean", self.processing_time_mean)?;
        check_non_negative("processingTimeStdDev", self.processing_time_std_dev)?;
        check_positive("maintenanceTimeMean", self.maintenance_time_mean)?;
        check_positive("simulationTime", self.simulation_time)?;
        check_positive("productInterarrivalTime", self.product_interarrival_time)?;
        check_probability("rejectionProbability", self.rejection_probability)?;
        check_probability("accidentProbability", self.accident_probability)?;
        if self.station_failure_probabilities.len() != NUM_STATIONS {
            return Err(invalid(
                "stationFailureProbabilities",
                "a list with one probability per station (6)",
            ));
        }
        self.station_failure_probabilities
            .iter()
            .try_for_each(|probability| {
                check_probability("stationFailureProbabilities", *probability)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(FacilityConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_documents_take_defaults() {
        let config =
            FacilityConfig::from_json(r#"{"binCapacity": 10, "seed": 7, "iterations": 4}"#)
                .unwrap();
        assert_eq!(10, config.bin_capacity);
        assert_eq!(Some(7), config.seed);
        assert_eq!(4, config.iterations);
        assert_eq!(3, config.restock_devices);
        assert_eq!(default_station_failure_probabilities(), config.station_failure_probabilities);
    }

    #[test]
    fn yaml_documents_are_accepted() {
        let config = FacilityConfig::from_yaml(
            "
restockDevices: 1
accidentProbability: 0.0
stationFailureProbabilities: [0.0, 0.0, 0.0, 1.0, 0.0, 0.0]
",
        )
        .unwrap();
        assert_eq!(1, config.restock_devices);
        assert![config.accident_probability == 0.0];
        assert![config.station_failure_probabilities[3] == 1.0];
    }

    #[test]
    fn out_of_range_parameters_are_rejected() {
        let cases: Vec<Box<dyn Fn(&mut FacilityConfig)>> = vec![
            Box::new(|config| config.bin_capacity = 0),
            Box::new(|config| config.restock_devices = 0),
            Box::new(|config| config.maintenance_interval = 0),
            Box::new(|config| config.iterations = 0),
            Box::new(|config| config.rejection_probability = -0.1),
            Box::new(|config| config.accident_probability = 1.5),
            Box::new(|config| config.accident_probability = f64::NAN),
            Box::new(|config| config.processing_time_mean = -4.0),
            Box::new(|config| config.maintenance_time_mean = 0.0),
            Box::new(|config| config.simulation_time = 0.0),
            Box::new(|config| config.product_interarrival_time = 0.0),
            Box::new(|config| config.station_failure_probabilities = vec![0.1; 5]),
            Box::new(|config| config.station_failure_probabilities[2] = 2.0),
        ];
        cases.iter().for_each(|mutate| {
            let mut config = FacilityConfig::default();
            mutate(&mut config);
            assert!(matches!(
                config.validate(),
                Err(SimulationError::InvalidConfiguration(_))
            ));
        });
    }

    #[test]
    fn invalid_documents_fail_to_load() {
        assert!(FacilityConfig::from_json(r#"{"rejectionProbability": 2.0}"#).is_err());
        assert!(FacilityConfig::from_json(r#"{"binCapacity": -1}"#).is_err());
    }
}
