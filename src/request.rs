//! Incoming Gemini request type.
//!
//! A Gemini request is a single line: an absolute URL followed by CRLF.
//! There is no method, no headers and no body.

use std::net::SocketAddr;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::error::RequestError;

/// Maximum URL length in bytes, excluding the trailing CRLF.
pub const MAX_URL_LEN: usize = 1024;

/// An incoming request, parsed from the request line.
#[derive(Clone, Debug)]
pub struct IncomingRequest {
    url: Url,
    path: String,
    remote_addr: Option<SocketAddr>,
}

impl IncomingRequest {
    /// Parses a raw request line, including its line terminator.
    ///
    /// A bare `\n` is tolerated in place of `\r\n`. An unterminated line that
    /// already exceeds the URL limit reports [`RequestError::TooLong`].
    pub fn parse(line: &[u8]) -> Result<Self, RequestError> {
        let Some(line) = line.strip_suffix(b"\n") else {
            return Err(if line.len() > MAX_URL_LEN {
                RequestError::TooLong(MAX_URL_LEN)
            } else {
                RequestError::Unterminated
            });
        };
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.len() > MAX_URL_LEN {
            return Err(RequestError::TooLong(MAX_URL_LEN));
        }
        let line = std::str::from_utf8(line).map_err(|_| RequestError::NotUtf8)?;
        let mut req = Self::from_url(Url::parse(line)?)?;
        // `Url` resolves `.` and `..`; route on the path as the client sent it.
        req.path = decode_path(raw_path(line.trim_matches(|c: char| c <= ' ')));
        Ok(req)
    }

    /// Wraps an already-parsed URL, applying the same checks as [`parse`](Self::parse).
    ///
    /// Dot segments are already resolved in `url`, so [`path`](Self::path)
    /// reflects the normalized form.
    pub fn from_url(url: Url) -> Result<Self, RequestError> {
        if url.scheme() != "gemini" {
            return Err(RequestError::Scheme(url.scheme().to_owned()));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(RequestError::UserInfo);
        }
        let path = decode_path(url.path());
        Ok(Self { url, path, remote_addr: None })
    }

    pub(crate) fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    /// Rejects the request unless its host is in `hosts`.
    ///
    /// An empty list accepts every host.
    pub fn check_host(&self, hosts: &[String]) -> Result<(), RequestError> {
        if hosts.is_empty() {
            return Ok(());
        }
        let host = self.url.host_str().unwrap_or_default();
        if hosts.iter().any(|h| h.eq_ignore_ascii_case(host)) {
            Ok(())
        } else {
            Err(RequestError::Host(host.to_owned()))
        }
    }

    pub fn url(&self) -> &Url { &self.url }

    /// The percent-decoded request path, dot segments kept as sent. May be
    /// empty (`gemini://host`).
    pub fn path(&self) -> &str { &self.path }

    pub fn query(&self) -> Option<&str> { self.url.query() }

    pub fn remote_addr(&self) -> Option<SocketAddr> { self.remote_addr }
}

/// The path component of an absolute URL, exactly as written.
fn raw_path(url: &str) -> &str {
    let rest = url.split_once(':').map_or(url, |(_, rest)| rest);
    let rest = match rest.strip_prefix("//") {
        Some(authority) => &authority[authority.find(['/', '?', '#']).unwrap_or(authority.len())..],
        None => rest,
    };
    &rest[..rest.find(['?', '#']).unwrap_or(rest.len())]
}

fn decode_path(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}
