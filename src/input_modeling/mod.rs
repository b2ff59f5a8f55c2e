//! The input modeling module provides a foundation for the stochastic
//! behaviors of the facility.  The module includes the random variable
//! distributions used by the processes (processing, restock and
//! maintenance durations, failure, rejection and accident trials) and a
//! structure around seedable random number generation.

pub mod random_variable;
pub mod uniform_rng;

pub use random_variable::Boolean as BooleanRandomVariable;
pub use random_variable::Continuous as ContinuousRandomVariable;
pub use uniform_rng::{UniformRNG, DEFAULT_SEED};
