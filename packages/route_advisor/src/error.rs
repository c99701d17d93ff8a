//! Error taxonomy shared by graph construction, loading and route search.
//! All failures are deterministic functions of the input graph and query,
//! none of them are worth retrying.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouteError {
    /// A referenced city identifier is not present in the graph
    #[error("unknown city: {city}")]
    UnknownCity { city: String },

    /// The frontier was exhausted before the destination was reached
    #[error("no route from {start} to {end}")]
    Unreachable { start: String, end: String },

    /// The graph handed to the builder is malformed
    #[error("invalid road network: {0}")]
    InvariantViolation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unable to parse road network: {0}")]
    Parse(#[from] serde_json::Error),
}

impl RouteError {
    pub(crate) fn unknown_city(city: &str) -> Self {
        RouteError::UnknownCity {
            city: city.to_string(),
        }
    }
}
