// src/error.rs

use reqwest::StatusCode;
use thiserror::Error;

/// Why a request to the FPL API produced no data.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("decoding body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected payload from {url}: {source}")]
    Payload {
        url: String,
        #[source]
        source: RecordError,
    },
}

/// A record (or payload) did not have the shape the caller expected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("missing key `{0}`")]
    MissingKey(String),

    #[error("key `{key}` is not a {expected}")]
    WrongType { key: String, expected: &'static str },

    #[error("`{0}` is not an array")]
    NotAnArray(String),

    #[error("no records to write")]
    Empty,
}
