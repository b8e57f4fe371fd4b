//! Error type shared by option parsing, engine construction and the
//! coordinate model.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeError {
    /// Orientation policy string or code that names none of FF, RR, FR, RF
    #[error("unknown paired-end policy: {0}")]
    UnknownPolicy(String),

    /// Caller broke a structural precondition (e.g. mixed reference ids)
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Option bundle failed `PeOpt::validate`
    #[error("invalid paired-end options: {}", .0.join("; "))]
    InvalidOptions(Vec<String>),
}
