use js_sys::Array;
use wasm_bindgen::prelude::*;

use super::config::FacilityConfig;
use super::experiment::Experiment;
use crate::output_analysis::ExperimentResults;
use crate::utils::set_panic_hook;

/// The `WebExperiment` provides JS/WASM-compatible interfaces to the core
/// `Experiment` struct.  For additional insight on these methods, refer to
/// the associated `Experiment` and `ExperimentResults` methods.  Errors are
/// unwrapped, instead of returned, in the `WebExperiment` methods.
#[wasm_bindgen]
pub struct WebExperiment {
    experiment: Experiment,
    results: Option<ExperimentResults>,
}

impl WebExperiment {
    fn results(&self) -> &ExperimentResults {
        self.results.as_ref().unwrap()
    }
}

#[wasm_bindgen]
impl WebExperiment {
    /// A JS/WASM interface for `Experiment.post`, which uses a JSON
    /// representation of the facility configuration.
    pub fn post_json(config: &str) -> Self {
        set_panic_hook();
        Self {
            experiment: Experiment::post(FacilityConfig::from_json(config).unwrap()).unwrap(),
            results: None,
        }
    }

    /// A JS/WASM interface for `Experiment.post`, which uses a YAML
    /// representation of the facility configuration.
    pub fn post_yaml(config: &str) -> Self {
        set_panic_hook();
        Self {
            experiment: Experiment::post(FacilityConfig::from_yaml(config).unwrap()).unwrap(),
            results: None,
        }
    }

    /// Get a JSON representation of the facility configuration.
    pub fn get_config_json(&self) -> String {
        serde_json::to_string_pretty(self.experiment.config()).unwrap()
    }

    /// An interface to `Experiment.run`.  The results are kept for the
    /// accessors below.
    pub fn run(&mut self) {
        self.results = Some(self.experiment.run().unwrap());
    }

    pub fn has_results(&self) -> bool {
        self.results.is_some()
    }

    /// The day metrics as a JavaScript Array of JSON strings.
    pub fn get_days_js(&self) -> Array {
        self.results()
            .days
            .iter()
            .map(|day| JsValue::from_str(&serde_json::to_string(day).unwrap()))
            .collect()
    }

    pub fn get_days_json(&self) -> String {
        serde_json::to_string(&self.results().days).unwrap()
    }

    pub fn get_days_yaml(&self) -> String {
        serde_yaml::to_string(&self.results().days).unwrap()
    }

    pub fn get_summary_json(&self) -> String {
        serde_json::to_string(&self.results().summary).unwrap()
    }

    pub fn get_summary_yaml(&self) -> String {
        serde_yaml::to_string(&self.results().summary).unwrap()
    }

    /// The average-values report of the summary.
    pub fn get_report(&self) -> String {
        self.results().summary.to_string()
    }

    pub fn get_series_json(&self) -> String {
        serde_json::to_string(&self.results().series()).unwrap()
    }

    pub fn get_series_yaml(&self) -> String {
        serde_yaml::to_string(&self.results().series()).unwrap()
    }
}
