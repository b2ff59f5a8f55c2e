//! Random variables underpin the stochastic behaviors of the facility.
//! Durations are drawn from `Continuous` distributions and yes/no outcomes
//! (failures, rejections, routing, accidents) from `Boolean` ones.  Both
//! are serializable, with their common parameterizations.

use rand::distributions::Distribution;
use serde::{Deserialize, Serialize};
use rand_distr::{Bernoulli, Exp, Normal};

use super::UniformRNG;
use crate::utils::errors::SimulationError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Continuous {
    Exp { lambda: f64 },
    Normal { mean: f64, std_dev: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Boolean {
    Bernoulli { p: f64 },
}

impl Continuous {
    /// An exponential distribution parameterized by its mean rather than
    /// its rate.
    pub fn exp_with_mean(mean: f64) -> Self {
        Continuous::Exp { lambda: 1.0 / mean }
    }

    /// The generation of random variates drives stochastic behaviors during
    /// simulation execution.  This function requires the random number
    /// generator of the simulation, and produces a f64 random variate.
    pub fn random_variate(&self, uniform_rng: &mut UniformRNG) -> Result<f64, SimulationError> {
        match self {
            Continuous::Exp { lambda } => Ok(Exp::new(*lambda)?.sample(uniform_rng.rng())),
            Continuous::Normal { mean, std_dev } => {
                Ok(Normal::new(*mean, *std_dev)?.sample(uniform_rng.rng()))
            }
        }
    }

    /// Durations cannot be negative, so normal tails below zero are floored
    /// at zero.
    pub fn non_negative_variate(
        &self,
        uniform_rng: &mut UniformRNG,
    ) -> Result<f64, SimulationError> {
        Ok(f64::max(0.0, self.random_variate(uniform_rng)?))
    }
}

impl Boolean {
    /// The generation of random variates drives stochastic behaviors during
    /// simulation execution.  This function requires the random number
    /// generator of the simulation, and produces a boolean random variate.
    pub fn random_variate(&self, uniform_rng: &mut UniformRNG) -> Result<bool, SimulationError> {
        match self {
            Boolean::Bernoulli { p } => Ok(Bernoulli::new(*p)?.sample(uniform_rng.rng())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empirical_mean(variable: &Continuous, sample_size: usize) -> f64 {
        let mut uniform_rng = UniformRNG::default();
        (0..sample_size)
            .map(|_| variable.random_variate(&mut uniform_rng).unwrap())
            .sum::<f64>()
            / (sample_size as f64)
    }

    #[test]
    fn exponential_samples_match_expectation() {
        let variable = Continuous::exp_with_mean(3.0);
        let mean = empirical_mean(&variable, 10000);
        let expected = 3.0;
        assert!((mean - expected).abs() / expected < 0.025);
    }

    #[test]
    fn normal_samples_match_expectation() {
        let variable = Continuous::Normal {
            mean: 4.0,
            std_dev: 0.5,
        };
        let mean = empirical_mean(&variable, 10000);
        let expected = 4.0;
        assert!((mean - expected).abs() / expected < 0.025);
    }

    #[test]
    fn non_negative_variates_are_floored() {
        let variable = Continuous::Normal {
            mean: -10.0,
            std_dev: 0.5,
        };
        let mut uniform_rng = UniformRNG::default();
        (0..100).for_each(|_| {
            assert![variable.non_negative_variate(&mut uniform_rng).unwrap() == 0.0];
        });
    }

    #[test]
    fn bernoulli_samples_chi_square() {
        let variable = Boolean::Bernoulli { p: 0.3 };
        let mut uniform_rng = UniformRNG::default();
        let successes = (0..10000)
            .filter(|_| variable.random_variate(&mut uniform_rng).unwrap())
            .count() as f64;
        // Failures are 70% of trials and successes are 30% of trials
        let expected = [7000.0, 3000.0];
        let observed = [10000.0 - successes, successes];
        let chi_square_actual = observed
            .iter()
            .zip(expected.iter())
            .fold(0.0, |acc, (o, e)| acc + (o - e).powi(2) / e);
        // At a significance level of 0.01, and with n-1=1 degrees of freedom, the chi square critical
        // value for this scenario is 6.635
        let chi_square_critical = 6.635;
        assert![chi_square_actual < chi_square_critical];
    }

    #[test]
    fn degenerate_bernoulli_is_certain() {
        let mut uniform_rng = UniformRNG::default();
        assert![Boolean::Bernoulli { p: 1.0 }
            .random_variate(&mut uniform_rng)
            .unwrap()];
        assert![!Boolean::Bernoulli { p: 0.0 }
            .random_variate(&mut uniform_rng)
            .unwrap()];
    }

    #[test]
    fn invalid_parameters_are_errors() {
        let mut uniform_rng = UniformRNG::default();
        assert!(Boolean::Bernoulli { p: 1.5 }
            .random_variate(&mut uniform_rng)
            .is_err());
        assert!(Continuous::Normal {
            mean: 1.0,
            std_dev: f64::NAN
        }
        .random_variate(&mut uniform_rng)
        .is_err());
        assert!(Continuous::Exp { lambda: -1.0 }
            .random_variate(&mut uniform_rng)
            .is_err());
    }
}
