//! The handler trait the connection engine dispatches to.
//!
//! A handler receives the parsed request and the connection's
//! [`ResponseWriter`], and writes at most one response. Returning without
//! writing is allowed; the engine then closes the connection with no header.
//!
//! The chain from accept to handler is:
//!
//! ```text
//! TcpListener::accept                    ← server.rs
//!        ↓ TLS handshake
//! serve_connection(stream, handler)      ← connection.rs
//!        ↓ IncomingRequest::parse
//! handler.handle(&mut rw, &req)          ← one static dispatch, no boxing
//! ```
//!
//! The server is generic over `H: Handler`, so the only runtime cost per
//! request is one `Arc` clone of the handler.

use std::future::Future;

use crate::error::Error;
use crate::request::IncomingRequest;
use crate::response::ResponseWriter;

/// Implemented by everything that can answer a Gemini request.
///
/// Handlers are shared across every connection task, so they must be
/// `Send + Sync + 'static` and should hold only immutable state.
pub trait Handler: Send + Sync + 'static {
    fn handle(
        &self,
        rw: &mut ResponseWriter<'_>,
        req: &IncomingRequest,
    ) -> impl Future<Output = Result<(), Error>> + Send;
}
