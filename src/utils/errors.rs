use thiserror::Error;

/// `SimulationError` enumerates all possible errors returned by the facility
/// simulator.  The accident halt is not an error - it is reported through
/// `RunOutcome::Halted`.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Represents an out-of-range or inconsistent configuration parameter
    #[error("Invalid facility configuration: {0}")]
    InvalidConfiguration(String),

    /// Represents an invalid state of event scheduling
    #[error("An invalid state was encountered, with respect to event scheduling")]
    EventSchedulingError,

    /// Represents a release of a resource without any current holder
    #[error("A resource was released without being held")]
    ResourceNotHeld,

    /// Represents a container request that can never be satisfied
    #[error("A container request of {requested} units cannot be served by a container of capacity {capacity}")]
    InvalidContainerRequest { requested: usize, capacity: usize },

    /// Represents a container level pushed past its capacity
    #[error("A container level exceeded its capacity")]
    ContainerOverflow,

    /// Represents an event which references a process that no longer exists
    #[error("A scheduled event references a process that cannot be found")]
    ProcessNotFound,

    /// Represents an invalid process state
    #[error("An invalid process state was encountered")]
    InvalidModelState,

    /// Represents an output analysis requested on an empty sample
    #[error("Output analysis requires at least one sample point")]
    EmptySample,

    /// Represents a failed conversion to num-traits Float
    #[error("Failed to convert to a Float value")]
    FloatConvError,

    /// Transparent serde_json errors
    #[error(transparent)]
    JSONError(#[from] serde_json::error::Error),

    /// Transparent serde_yaml errors
    #[error(transparent)]
    YAMLError(#[from] serde_yaml::Error),

    /// Transparent I/O errors
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent Exponential distribution errors
    #[error(transparent)]
    ExpError(#[from] rand_distr::ExpError),

    /// Transparent Normal distribution errors
    #[error(transparent)]
    NormalError(#[from] rand_distr::NormalError),

    /// Transparent Bernoulli distribution errors
    #[error(transparent)]
    BernoulliError(#[from] rand_distr::BernoulliError),
}
