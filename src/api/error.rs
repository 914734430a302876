//! Remote API error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to the diary service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP client could not be built
    #[error("cannot create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never got a response
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    /// The response body was not what we expected
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
