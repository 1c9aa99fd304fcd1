//! Unified error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::status::Status;

/// The error type returned by ursa's fallible operations.
///
/// Protocol-level outcomes (not found, input required, etc.) are expressed as
/// Gemini responses, not as `Error`s. This type surfaces infrastructure
/// failures: loading configuration or certificates, binding, and writing to a
/// connection.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("tls: {0}")]
    Tls(#[from] tokio_rustls::rustls::Error),

    #[error("no certificates found in {}", .0.display())]
    NoCertificates(PathBuf),

    #[error("no private key found in {}", .0.display())]
    NoPrivateKey(PathBuf),

    #[error("config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A handler tried to write a second response on the same connection.
    #[error("response already written")]
    AlreadyWritten,

    #[error("invalid response meta: {0}")]
    InvalidMeta(&'static str),

    #[error("request timed out")]
    Timeout,
}

/// Why an incoming request line was rejected before routing.
///
/// Each variant maps to the status the client receives via
/// [`RequestError::status`].
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("request line exceeds {0} bytes")]
    TooLong(usize),

    #[error("request line is not terminated by CRLF")]
    Unterminated,

    #[error("request line is not valid UTF-8")]
    NotUtf8,

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("url must not carry userinfo")]
    UserInfo,

    #[error("unsupported scheme `{0}`")]
    Scheme(String),

    #[error("host `{0}` is not served here")]
    Host(String),
}

impl RequestError {
    pub fn status(&self) -> Status {
        match self {
            Self::Scheme(_) | Self::Host(_) => Status::ProxyRequestRefused,
            _ => Status::BadRequest,
        }
    }
}
