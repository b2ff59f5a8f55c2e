//! The output analysis module turns the counters of simulated days into
//! reportable metrics, and summarizes those metrics across days.  Each day
//! of an experiment is an independent replication, so the per-day values
//! of a metric are analyzed with the `IndependentSample`.

use num_traits::Float;
use serde::{Deserialize, Serialize};

pub mod export;
pub mod metrics;
pub mod summary;

pub use self::export::ResultExporter;
pub use self::metrics::{Bottleneck, DayMetrics};
pub use self::summary::{ExperimentResults, ExperimentSummary, MetricSeries};

use crate::utils::errors::SimulationError;

fn sum<T: Float>(points: &[T]) -> T {
    points.iter().fold(T::zero(), |sum, point| sum + *point)
}

/// This function calculates the sample mean from a set of points - a simple
/// arithmetic mean.
fn sample_mean<T: Float>(points: &[T]) -> Result<T, SimulationError> {
    if points.is_empty() {
        return Err(SimulationError::EmptySample);
    }
    Ok(sum(points) / usize_to_float(points.len())?)
}

/// This function calculates sample variance, given a set of points and the
/// sample mean.
fn sample_variance<T: Float>(points: &[T], mean: &T) -> Result<T, SimulationError> {
    Ok(points
        .iter()
        .fold(T::zero(), |acc, point| acc + (*point - *mean).powi(2))
        / usize_to_float(points.len())?)
}

/// This function converts a usize to a Float, with an associated
/// `SimulationError` returned for failed conversions
fn usize_to_float<T: Float>(unconv: usize) -> Result<T, SimulationError> {
    T::from(unconv).ok_or(SimulationError::FloatConvError)
}

/// The independent sample is for independent, identically-distributed (IID)
/// samples - here, one point per simulated day.  There are no additional
/// requirements on the data beyond being IID.  For example, there are no
/// normality assumptions.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct IndependentSample<T> {
    points: Vec<T>,
    mean: T,
    variance: T,
}

impl<T: Float> IndependentSample<T> {
    /// This constructor method creates an `IndependentSample` from a vector
    /// of floating point values.  At least one point is required.
    pub fn post(points: Vec<T>) -> Result<IndependentSample<T>, SimulationError> {
        let mean = sample_mean(&points)?;
        let variance = sample_variance(&points, &mean)?;
        Ok(IndependentSample {
            points,
            mean,
            variance,
        })
    }

    /// Return the sample mean.
    pub fn point_estimate_mean(&self) -> T {
        self.mean
    }

    /// Return the sample variance.
    pub fn variance(&self) -> T {
        self.variance
    }

    pub fn points(&self) -> &[T] {
        &self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn epsilon() -> f64 {
        1.0e-12
    }

    #[test]
    fn sample_mean_and_variance() {
        let sample = IndependentSample::post(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((sample.point_estimate_mean() - 5.0).abs() < epsilon());
        assert!((sample.variance() - 4.0).abs() < epsilon());
    }

    #[test]
    fn single_point_sample_has_no_variance() {
        let sample = IndependentSample::post(vec![3.5]).unwrap();
        assert!((sample.point_estimate_mean() - 3.5).abs() < epsilon());
        assert!(sample.variance().abs() < epsilon());
    }

    #[test]
    fn empty_sample_is_an_error() {
        assert!(matches!(
            IndependentSample::<f64>::post(Vec::new()),
            Err(SimulationError::EmptySample)
        ));
    }
}
