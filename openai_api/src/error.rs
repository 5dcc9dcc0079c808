use http::StatusCode;
use thiserror::Error;

use crate::store::StateKey;

/// Why a response body could not be turned into the expected payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("malformed body: {0}")]
    MalformedBody(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cannot access {key}: {source}")]
    Io {
        key: StateKey,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: StatusCode,
        body: String,
    },

    #[error("invalid {what} response: {source}")]
    InvalidRemoteResponse {
        what: &'static str,
        #[source]
        source: DecodeError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub(crate) fn invalid(what: &'static str) -> impl FnOnce(DecodeError) -> ApiError {
        move |source| ApiError::InvalidRemoteResponse { what, source }
    }
}
