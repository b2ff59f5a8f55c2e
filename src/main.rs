use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use env_logger::{Builder, Env};
use log::{info, LevelFilter};

use facility_sim::output_analysis::ResultExporter;
use facility_sim::simulator::{Experiment, FacilityConfig};
use facility_sim::utils::errors::SimulationError;

/// Simulate days of a six-station manufacturing facility and report the
/// averaged results.
#[derive(Parser, Debug)]
#[command(name = "facility-sim")]
#[command(about = "Discrete event simulation of a manufacturing facility", long_about = None)]
struct Args {
    /// JSON or YAML configuration file, chosen by extension
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    bin_capacity: Option<usize>,

    #[arg(long)]
    restock_devices: Option<usize>,

    #[arg(long)]
    restock_time_mean: Option<f64>,

    #[arg(long)]
    maintenance_interval: Option<usize>,

    #[arg(long)]
    maintenance_time_mean: Option<f64>,

    #[arg(long)]
    processing_time_mean: Option<f64>,

    #[arg(long)]
    rejection_probability: Option<f64>,

    #[arg(long)]
    accident_probability: Option<f64>,

    #[arg(long)]
    simulation_time: Option<f64>,

    #[arg(long)]
    product_interarrival_time: Option<f64>,

    #[arg(short, long)]
    iterations: Option<usize>,

    #[arg(short, long)]
    seed: Option<u64>,

    /// Export the results as JSON into this directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn load_config(path: &Path) -> Result<FacilityConfig, SimulationError> {
    let contents = fs::read_to_string(path)?;
    match path.extension().and_then(|extension| extension.to_str()) {
        Some("yaml") | Some("yml") => FacilityConfig::from_yaml(&contents),
        _ => FacilityConfig::from_json(&contents),
    }
}

impl Args {
    fn facility_config(&self) -> Result<FacilityConfig, SimulationError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => FacilityConfig::default(),
        };
        if let Some(value) = self.bin_capacity {
            config.bin_capacity = value;
        }
        if let Some(value) = self.restock_devices {
            config.restock_devices = value;
        }
        if let Some(value) = self.restock_time_mean {
            config.restock_time_mean = value;
        }
        if let Some(value) = self.maintenance_interval {
            config.maintenance_interval = value;
        }
        if let Some(value) = self.maintenance_time_mean {
            config.maintenance_time_mean = value;
        }
        if let Some(value) = self.processing_time_mean {
            config.processing_time_mean = value;
        }
        if let Some(value) = self.rejection_probability {
            config.rejection_probability = value;
        }
        if let Some(value) = self.accident_probability {
            config.accident_probability = value;
        }
        if let Some(value) = self.simulation_time {
            config.simulation_time = value;
        }
        if let Some(value) = self.product_interarrival_time {
            config.product_interarrival_time = value;
        }
        if let Some(value) = self.iterations {
            config.iterations = value;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    if args.verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();

    let experiment = Experiment::post(args.facility_config()?)?;
    if experiment.config().plot {
        info!("Plotting is not supported; use the exported results instead");
    }
    let results = experiment.run()?;
    if let Some(directory) = &args.output_dir {
        ResultExporter::new(directory).export(&results)?;
    }
    println!("{}", results.summary);
    Ok(())
}
