//! The write-once response channel.
//!
//! A Gemini response is a header line, `<status> <meta>\r\n`, optionally
//! followed by a body when the status is `20`. [`ResponseWriter`] enforces
//! that exactly one header is ever written per request.

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::Error;
use crate::status::Status;

/// Maximum meta length in bytes.
pub const MAX_META_LEN: usize = 1024;

/// Writes one response to the underlying connection.
///
/// Any async byte sink works: a TLS stream in production, a `Vec<u8>` or a
/// `tokio::io::duplex` half in tests.
pub struct ResponseWriter<'a> {
    inner: &'a mut (dyn AsyncWrite + Send + Unpin),
    status: Option<Status>,
}

impl<'a> ResponseWriter<'a> {
    pub fn new(inner: &'a mut (dyn AsyncWrite + Send + Unpin)) -> Self {
        Self { inner, status: None }
    }

    /// Writes a header-only response.
    pub async fn write_status(&mut self, status: Status, meta: &str) -> Result<(), Error> {
        self.write_header(status, meta).await?;
        self.inner.flush().await?;
        Ok(())
    }

    /// Writes `20 <media_type>` followed by `body`.
    pub async fn write_content(&mut self, media_type: &str, body: &[u8]) -> Result<(), Error> {
        self.write_header(Status::Success, media_type).await?;
        self.inner.write_all(body).await?;
        self.inner.flush().await?;
        Ok(())
    }

    /// Redirects the client to `target`. `status` should be in the redirect
    /// category ([`Status::Redirect`] or [`Status::PermanentRedirect`]).
    pub async fn redirect(&mut self, target: &str, status: Status) -> Result<(), Error> {
        self.write_status(status, target).await
    }

    pub async fn not_found(&mut self) -> Result<(), Error> {
        self.write_status(Status::NotFound, Status::NotFound.text()).await
    }

    /// The status that was written, if any.
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    pub fn is_written(&self) -> bool {
        self.status.is_some()
    }

    async fn write_header(&mut self, status: Status, meta: &str) -> Result<(), Error> {
        if self.status.is_some() {
            return Err(Error::AlreadyWritten);
        }
        if meta.len() > MAX_META_LEN {
            return Err(Error::InvalidMeta("longer than 1024 bytes"));
        }
        if meta.contains(['\r', '\n']) {
            return Err(Error::InvalidMeta("contains a line break"));
        }
        // Marked before the write: a failed write still consumes the response.
        self.status = Some(status);
        self.inner.write_all(format!("{status} {meta}\r\n").as_bytes()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn status_line_framing() {
        let mut out: Vec<u8> = Vec::new();
        let mut rw = ResponseWriter::new(&mut out);
        rw.write_status(Status::Input, "what?").await.unwrap();
        assert_eq!(rw.status(), Some(Status::Input));
        assert_eq!(out, b"10 what?\r\n");
    }

    #[tokio::test]
    async fn content_has_header_then_body() {
        let mut out: Vec<u8> = Vec::new();
        let mut rw = ResponseWriter::new(&mut out);
        rw.write_content("text/gemini", b"# hi\n").await.unwrap();
        assert_eq!(out, b"20 text/gemini\r\n# hi\n");
    }

    #[tokio::test]
    async fn redirect_and_not_found() {
        let mut out: Vec<u8> = Vec::new();
        ResponseWriter::new(&mut out).redirect("/index", Status::Redirect).await.unwrap();
        assert_eq!(out, b"30 /index\r\n");

        let mut out: Vec<u8> = Vec::new();
        ResponseWriter::new(&mut out).not_found().await.unwrap();
        assert_eq!(out, b"51 not found\r\n");
    }

    #[tokio::test]
    async fn second_write_is_rejected() {
        let mut out: Vec<u8> = Vec::new();
        let mut rw = ResponseWriter::new(&mut out);
        rw.not_found().await.unwrap();
        let err = rw.write_content("text/plain", b"late").await.unwrap_err();
        assert!(matches!(err, Error::AlreadyWritten));
        assert_eq!(out, b"51 not found\r\n");
    }

    #[tokio::test]
    async fn meta_with_line_break_is_rejected() {
        let mut out: Vec<u8> = Vec::new();
        let mut rw = ResponseWriter::new(&mut out);
        let err = rw.write_status(Status::Input, "a\r\nb").await.unwrap_err();
        assert!(matches!(err, Error::InvalidMeta(_)));
        assert!(!rw.is_written());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn overlong_meta_is_rejected() {
        let mut out: Vec<u8> = Vec::new();
        let meta = "x".repeat(MAX_META_LEN + 1);
        let err = ResponseWriter::new(&mut out).write_status(Status::Input, &meta).await.unwrap_err();
        assert!(matches!(err, Error::InvalidMeta(_)));
    }
}
