//! Ordered prefix router.
//!
//! One constant rule table, evaluated top to bottom, first match wins. Exact
//! rules compare literally; prefix rules are plain `starts_with`. No
//! wildcards, no percent-decoding, no case-folding. Order is the whole
//! contract: `/fetch/hashxyz` still lands on the `/fetch/hash` rule.
//!
//! Paths arrive already percent-decoded, with dot segments as the client
//! sent them (see [`IncomingRequest::path`]).

use tracing::debug;

use crate::content::StaticContent;
use crate::error::Error;
use crate::handler::Handler;
use crate::request::IncomingRequest;
use crate::response::ResponseWriter;
use crate::status::Status;

/// Where `/` and the empty path send the client.
pub const INDEX_PATH: &str = "/index";

/// What the router does with a request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Route {
    /// Serve the index document.
    Index,
    /// Send the client to `to` with a redirect-class status.
    Redirect { to: &'static str, status: Status },
    /// Ask the client for input with the given prompt.
    Input(&'static str),
    /// Recognized but not implemented yet: nothing is written.
    Unhandled,
    /// No rule matched: `51`, no body.
    NotFound,
}

#[derive(Clone, Copy, Debug)]
enum Match {
    Exact(&'static str),
    Prefix(&'static str),
}

impl Match {
    fn matches(self, path: &str) -> bool {
        match self {
            Self::Exact(p)  => path == p,
            Self::Prefix(p) => path.starts_with(p),
        }
    }
}

const REDIRECT_TO_INDEX: Route = Route::Redirect { to: INDEX_PATH, status: Status::Redirect };

// Order matters. Unmatched paths fall through to `Route::NotFound`.
const RULES: &[(Match, Route)] = &[
    (Match::Exact(INDEX_PATH),      Route::Index),
    (Match::Exact(""),              REDIRECT_TO_INDEX),
    (Match::Exact("/"),             REDIRECT_TO_INDEX),
    (Match::Prefix("/ipfs/"),       Route::Unhandled),
    (Match::Prefix("/ipns/"),       Route::Unhandled),
    (Match::Prefix("/fetch/hash"),  Route::Input("what object to load?")),
    (Match::Prefix("/fetch/name"),  Route::Input("what name to resolve?")),
];

/// Strips one trailing `/` from paths longer than one character.
pub fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// Picks the route for a raw request path.
pub fn decide(path: &str) -> Route {
    let path = normalize(path);
    RULES
        .iter()
        .find(|(m, _)| m.matches(path))
        .map_or(Route::NotFound, |&(_, route)| route)
}

/// The application router.
///
/// Holds the index document, injected at construction so tests can serve
/// arbitrary bytes. Build it once at startup; pass it to
/// [`Server::serve`](crate::Server::serve).
#[derive(Clone, Debug)]
pub struct Router {
    index: StaticContent,
}

impl Router {
    pub fn new(index: StaticContent) -> Self {
        Self { index }
    }
}

impl Handler for Router {
    async fn handle(&self, rw: &mut ResponseWriter<'_>, req: &IncomingRequest) -> Result<(), Error> {
        let route = decide(req.path());
        debug!(path = req.path(), ?route, "routed");

        match route {
            Route::Index                   => self.index.handle(rw, req).await,
            Route::Redirect { to, status } => rw.redirect(to, status).await,
            Route::Input(prompt)           => rw.write_status(Status::Input, prompt).await,
            Route::Unhandled               => Ok(()),
            Route::NotFound                => rw.not_found().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::task::JoinSet;

    const INDEX: &[u8] = b"# test index\n=> /fetch/hash load\n";

    fn router() -> Router {
        Router::new(StaticContent::gemtext(INDEX))
    }

    async fn respond(router: &Router, path: &str) -> Vec<u8> {
        let line = format!("gemini://localhost{path}\r\n");
        let req = IncomingRequest::parse(line.as_bytes()).unwrap();
        let mut out: Vec<u8> = Vec::new();
        router.handle(&mut ResponseWriter::new(&mut out), &req).await.unwrap();
        out
    }

    #[test]
    fn normalize_strips_one_trailing_slash() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("/index/"), "/index");
        assert_eq!(normalize("/index//"), "/index/");
        assert_eq!(normalize("/index"), "/index");
    }

    #[test]
    fn trailing_slash_routes_like_bare_path() {
        for path in ["/index", "/fetch/hash", "/fetch/name", "/ipfs/x", "/nonexistent", "/ipfs"] {
            assert_eq!(decide(&format!("{path}/")), decide(path), "{path}");
        }
    }

    #[test]
    fn root_and_empty_redirect_to_index() {
        let expected = Route::Redirect { to: "/index", status: Status::Redirect };
        assert_eq!(decide(""), expected);
        assert_eq!(decide("/"), expected);
        assert_eq!(Status::Redirect.category(), crate::Category::Redirect);
    }

    #[test]
    fn fetch_prefixes_prompt_for_input() {
        for path in ["/fetch/hash", "/fetch/hash/abc", "/fetch/hashxyz"] {
            assert_eq!(decide(path), Route::Input("what object to load?"), "{path}");
        }
        for path in ["/fetch/name", "/fetch/name/foo.eth", "/fetch/names"] {
            assert_eq!(decide(path), Route::Input("what name to resolve?"), "{path}");
        }
    }

    #[test]
    fn ipfs_and_ipns_are_recognized_but_unhandled() {
        assert_eq!(decide("/ipfs/whatever"), Route::Unhandled);
        assert_eq!(decide("/ipns/whatever"), Route::Unhandled);
        // `/ipfs/` normalizes to `/ipfs`, which no longer has the prefix.
        assert_eq!(decide("/ipfs/"), Route::NotFound);
    }

    #[test]
    fn matching_is_literal() {
        assert_eq!(decide("/INDEX"), Route::NotFound);
        assert_eq!(decide("/index.gmi"), Route::NotFound);
        assert_eq!(decide("/%69ndex"), Route::NotFound);
        assert_eq!(decide("/fetch"), Route::NotFound);
    }

    #[tokio::test]
    async fn index_serves_gemtext_document() {
        let out = respond(&router(), "/index").await;
        let mut expected = b"20 text/gemini\r\n".to_vec();
        expected.extend_from_slice(INDEX);
        assert_eq!(out, expected);
    }

    #[tokio::test]
    async fn root_writes_redirect() {
        let router = router();
        assert_eq!(respond(&router, "/").await, b"30 /index\r\n");
        assert_eq!(respond(&router, "").await, b"30 /index\r\n");
    }

    #[tokio::test]
    async fn fetch_writes_input_prompt() {
        let router = router();
        assert_eq!(respond(&router, "/fetch/hash/abc").await, b"10 what object to load?\r\n");
        assert_eq!(respond(&router, "/fetch/name").await, b"10 what name to resolve?\r\n");
    }

    #[tokio::test]
    async fn unhandled_prefixes_write_nothing() {
        let router = router();
        assert!(respond(&router, "/ipfs/whatever").await.is_empty());
        assert!(respond(&router, "/ipns/whatever").await.is_empty());
    }

    #[tokio::test]
    async fn unknown_path_is_not_found_without_body() {
        assert_eq!(respond(&router(), "/nonexistent").await, b"51 not found\r\n");
    }

    #[tokio::test]
    async fn responses_are_repeatable() {
        let router = router();
        for path in ["/index", "/", "/fetch/hash", "/nope"] {
            assert_eq!(respond(&router, path).await, respond(&router, path).await, "{path}");
        }
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_router() {
        let router = Arc::new(router());
        let mut tasks = JoinSet::new();
        for _ in 0..16 {
            let router = Arc::clone(&router);
            tasks.spawn(async move { respond(&router, "/index").await });
        }

        let expected = respond(&router, "/index").await;
        let mut served = 0;
        while let Some(out) = tasks.join_next().await {
            assert_eq!(out.unwrap(), expected);
            served += 1;
        }
        assert_eq!(served, 16);
    }

    #[tokio::test]
    async fn exactly_one_write_per_request() {
        let router = router();
        let req = IncomingRequest::parse(b"gemini://localhost/index\r\n").unwrap();
        let mut out: Vec<u8> = Vec::new();
        let mut rw = ResponseWriter::new(&mut out);
        router.handle(&mut rw, &req).await.unwrap();
        assert_eq!(rw.status(), Some(Status::Success));
        let err = router.handle(&mut rw, &req).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyWritten));
    }
}
