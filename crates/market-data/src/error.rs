//! Gateway-internal error type.
//!
//! Public gateway operations never surface these to callers — every
//! failure collapses to `None` at the crate boundary. The enum exists so
//! the fetch internals can use `?` and the collapse site can log the
//! reason.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("malformed payload: missing {0}")]
    MissingField(&'static str),

    #[error("malformed payload: {0}")]
    Parse(String),
}
