//! Static in-memory documents.

use bytes::Bytes;

use crate::error::Error;
use crate::handler::Handler;
use crate::request::IncomingRequest;
use crate::response::ResponseWriter;

/// Media type of gemtext documents.
pub const GEMTEXT: &str = "text/gemini";

/// Serves one immutable document with a fixed media type.
///
/// The body is a [`Bytes`], so cloning the responder or sharing it across
/// connection tasks never copies the document.
#[derive(Clone, Debug)]
pub struct StaticContent {
    media_type: String,
    body: Bytes,
}

impl StaticContent {
    pub fn new(media_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self { media_type: media_type.into(), body: body.into() }
    }

    /// A `text/gemini` document.
    pub fn gemtext(body: impl Into<Bytes>) -> Self {
        Self::new(GEMTEXT, body)
    }

    pub fn media_type(&self) -> &str { &self.media_type }
    pub fn body(&self) -> &Bytes { &self.body }
}

impl Handler for StaticContent {
    async fn handle(&self, rw: &mut ResponseWriter<'_>, _req: &IncomingRequest) -> Result<(), Error> {
        rw.write_content(&self.media_type, &self.body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_success_header_and_full_body() {
        let page = StaticContent::new("text/plain", &b"plain words"[..]);
        let req = IncomingRequest::parse(b"gemini://localhost/anything\r\n").unwrap();

        let mut out: Vec<u8> = Vec::new();
        page.handle(&mut ResponseWriter::new(&mut out), &req).await.unwrap();
        assert_eq!(out, b"20 text/plain\r\nplain words");
    }

    #[tokio::test]
    async fn clones_share_the_body() {
        let page = StaticContent::gemtext(Bytes::from_static(b"# ursa\n"));
        let copy = page.clone();
        assert_eq!(copy.media_type(), GEMTEXT);
        assert_eq!(copy.body().as_ptr(), page.body().as_ptr());
    }
}
