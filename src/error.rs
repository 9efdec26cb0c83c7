use thiserror::Error;

/// Errors reported by the discovery engine.
///
/// Empty results are never errors: an empty filter, cluster, or proximity
/// result is a valid state. Prices are integer minor units, so a non-finite
/// price is unrepresentable in the model. Malformed coordinates inside a
/// listing collection are dropped by the cluster engine with a skip count
/// rather than aborting the call.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid coordinate: ({longitude}, {latitude})")]
    InvalidCoordinate { longitude: f64, latitude: f64 },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::InvalidRequest(errors.to_string())
    }
}
