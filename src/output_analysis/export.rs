use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::info;
use serde::Serialize;

use super::metrics::DayMetrics;
use super::summary::{ExperimentResults, ExperimentSummary};
use crate::simulator::config::FacilityConfig;
use crate::utils::errors::SimulationError;

pub const LATEST_FILE: &str = "results_latest.json";
pub const BACKUP_FILE: &str = "results_latest.json.bak";

#[derive(Serialize)]
struct Envelope<'a> {
    timestamp: String,
    metadata: &'a FacilityConfig,
    results: &'a [DayMetrics],
    summary: &'a ExperimentSummary,
}

impl<'a> Envelope<'a> {
    fn new(timestamp: String, results: &'a ExperimentResults) -> Self {
        Self {
            timestamp,
            metadata: &results.config,
            results: &results.days,
            summary: &results.summary,
        }
    }
}

/// Writes experiment results as timestamped JSON files into a directory,
/// keeping `results_latest.json` pointed at the newest export for the
/// dashboard.
#[derive(Debug, Clone)]
pub struct ResultExporter {
    directory: PathBuf,
}

impl ResultExporter {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Export `results` and return the path of the timestamped file.
    pub fn export(&self, results: &ExperimentResults) -> Result<PathBuf, SimulationError> {
        fs::create_dir_all(&self.directory)?;
        let now = Local::now();
        let path = self.directory.join(format![
            "simulation_results_{}.json",
            now.format("%Y%m%d_%H%M%S")
        ]);
        let contents = serde_json::to_string_pretty(&Envelope::new(
            now.format("%Y-%m-%d %H:%M:%S").to_string(),
            results,
        ))?;
        fs::write(&path, &contents)?;
        let latest = self.directory.join(LATEST_FILE);
        if latest.exists() {
            fs::rename(&latest, self.directory.join(BACKUP_FILE))?;
        }
        fs::write(&latest, &contents)?;
        info!("Results saved to {}", path.display());
        Ok(path)
    }

    /// Write `results` to exactly `path`, leaving the latest file alone.
    pub fn write_to<P: AsRef<Path>>(
        path: P,
        results: &ExperimentResults,
    ) -> Result<(), SimulationError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(&Envelope::new(
            Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            results,
        ))?;
        fs::write(path.as_ref(), contents)?;
        Ok(())
    }
}
