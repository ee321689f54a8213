//! Protocol error types

use thiserror::Error;

/// Errors raised while decoding a message body
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Malformed message body '{body}': {source}")]
    Malformed {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Distance {distance} outside [0, 1]")]
    DistanceOutOfRange { distance: f64 },
}
