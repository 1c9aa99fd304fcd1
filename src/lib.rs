//! # ursa
//!
//! A small Gemini content server. One index document, a redirect to it, two
//! input prompts, and not-found for everything else.
//!
//! ## Routes
//!
//! Evaluated top to bottom after stripping one trailing `/` from paths
//! longer than one character. First match wins.
//!
//! | Path                  | Response                          |
//! |-----------------------|-----------------------------------|
//! | `/index`              | `20 text/gemini` + index document |
//! | empty or `/`          | `30 /index`                       |
//! | `/ipfs/…`, `/ipns/…`  | nothing (not implemented yet)     |
//! | `/fetch/hash…`        | `10 what object to load?`         |
//! | `/fetch/name…`        | `10 what name to resolve?`        |
//! | anything else         | `51 not found`                    |
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use ursa::{Router, Server, StaticContent, tls};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ursa::Error> {
//!     let tls = tls::load_server_config(Path::new("cert.crt"), Path::new("cert.key"))?;
//!     let router = Router::new(StaticContent::gemtext(&b"# hello\n"[..]));
//!
//!     Server::bind("localhost:1965", tls).serve(router).await
//! }
//! ```
//!
//! The router is a plain [`Handler`], so it can be driven without a socket:
//!
//! ```rust
//! use ursa::{Handler, IncomingRequest, ResponseWriter, Router, StaticContent};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let router = Router::new(StaticContent::gemtext(&b"# hello\n"[..]));
//! let req = IncomingRequest::parse(b"gemini://localhost/\r\n").unwrap();
//!
//! let mut out: Vec<u8> = Vec::new();
//! router.handle(&mut ResponseWriter::new(&mut out), &req).await.unwrap();
//! assert_eq!(out, b"30 /index\r\n");
//! # }
//! ```

mod connection;
mod content;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod config;
pub mod tls;

pub use config::Config;
pub use connection::{ConnectionSettings, serve_connection};
pub use content::{GEMTEXT, StaticContent};
pub use error::{Error, RequestError};
pub use handler::Handler;
pub use request::{IncomingRequest, MAX_URL_LEN};
pub use response::{MAX_META_LEN, ResponseWriter};
pub use router::{INDEX_PATH, Route, Router, decide, normalize};
pub use server::Server;
pub use status::{Category, Status};
