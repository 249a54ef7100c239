//! Static file mount. Registers a subrouter under a URL prefix whose
//! `not_found` handler strips the prefix and hands the remainder to a
//! caller-supplied [`VirtualFs`], rather than touching `std::fs` directly.
//! This is the same "trait over I/O" shape used elsewhere for handler type
//! aliases, so tests can supply an in-memory filesystem without a real one
//! on disk.
//!
//! Piggybacking on the subrouter's not-found handler (instead of a
//! wildcard route pattern) keeps the matcher's segment-count contract
//! intact: a mounted static subrouter carries no [`crate::route::Route`]s
//! of its own, so every path under its prefix falls straight through to
//! file lookup regardless of how many `/`-segments it has.

use crate::middleware::{BoxFuture, TerminalHandler};
use crate::router::RouterBuilder;
use crate::writer::{ResponseSink, ResponseWriter};
use hyper::{Body, Method, Request, StatusCode};
use std::sync::Arc;

/// A read-only virtual filesystem a static mount serves out of.
/// Implementations are responsible for path-traversal rejection; `mount`
/// only ever hands it the already-prefix-stripped remainder of the request
/// path.
pub trait VirtualFs: Send + Sync + 'static {
    /// Returns the file's bytes and a MIME type, or `None` if it does not
    /// exist or falls outside the filesystem root.
    fn read(&self, path: &str) -> Option<(Vec<u8>, &'static str)>;
}

/// An in-memory `VirtualFs` keyed by path, useful for tests and for
/// embedding assets compiled into the binary.
#[derive(Default)]
pub struct MemoryFs {
    files: std::collections::HashMap<String, (Vec<u8>, &'static str)>,
}

impl MemoryFs {
    pub fn new() -> MemoryFs {
        MemoryFs::default()
    }

    pub fn with_file<P: Into<String>>(mut self, path: P, bytes: Vec<u8>, content_type: &'static str) -> Self {
        self.files.insert(normalize(&path.into()), (bytes, content_type));
        self
    }
}

impl VirtualFs for MemoryFs {
    fn read(&self, path: &str) -> Option<(Vec<u8>, &'static str)> {
        if path.is_empty() {
            return None;
        }
        self.files.get(&normalize(path)).cloned()
    }
}

/// Strips a leading `/` and rejects any path containing a `..` segment,
/// the mount-level half of the cleanup-and-verify traversal policy left to
/// the filesystem layer.
fn normalize(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if trimmed.split('/').any(|segment| segment == "..") {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Builds the `not_found` handler a static subrouter serves files through:
/// `GET` writes the body, `HEAD` writes only status and headers, anything
/// else falls through to 404 exactly like a genuine missing file would.
///
/// The request path is percent-decoded before the prefix is stripped, the
/// same decoding policy `RouterNode::dispatch` applies before matching
/// against any route, so a file whose name needs percent-encoding in the
/// URL (`/static/my%20file.css`) resolves against its literal name in the
/// `VirtualFs` rather than against the still-encoded string.
fn serve_or_404(fs: Arc<dyn VirtualFs>, prefix: String) -> TerminalHandler {
    Arc::new(move |req: Request<Body>| -> BoxFuture<ResponseWriter> {
        let fs = fs.clone();
        let method = req.method().clone();
        let path = crate::helpers::percent_decode_request_path(req.uri().path())
            .unwrap_or_else(|_| req.uri().path().to_string());
        let rest = path.strip_prefix(&prefix).unwrap_or("").to_string();
        Box::pin(async move {
            let mut writer = ResponseWriter::new();
            if !matches!(method, Method::GET | Method::HEAD) {
                writer.write_status(StatusCode::NOT_FOUND);
                return writer;
            }
            match fs.read(&normalize(&rest)) {
                Some((bytes, content_type)) => {
                    writer.write_header(
                        hyper::header::CONTENT_TYPE,
                        hyper::header::HeaderValue::from_static(content_type),
                    );
                    writer.write_status(StatusCode::OK);
                    if method == Method::GET {
                        writer.write_body(&bytes);
                    }
                }
                None => writer.write_status(StatusCode::NOT_FOUND),
            }
            writer
        })
    })
}

/// Mounts `fs` under `url_prefix` on `builder`: every `GET`/`HEAD` request
/// whose path falls under the prefix and matches no other route is resolved
/// by stripping the prefix and looking the remainder up in `fs`.
pub(crate) fn mount(builder: RouterBuilder, url_prefix: &str, fs: Arc<dyn VirtualFs>) -> RouterBuilder {
    let handler = serve_or_404(fs, url_prefix.to_string());
    let child = RouterBuilder::new().not_found(handler.clone()).method_not_allowed(handler);
    builder.mount(url_prefix, child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::RouterBuilder;

    fn fs() -> Arc<dyn VirtualFs> {
        Arc::new(MemoryFs::new().with_file("style.css", b"body{}".to_vec(), "text/css"))
    }

    #[tokio::test]
    async fn serves_file_under_prefix() {
        let router = mount(RouterBuilder::new(), "/static", fs()).build().unwrap();
        let resp = router
            .serve(Request::builder().uri("/static/style.css").body(Body::empty()).unwrap())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(hyper::header::CONTENT_TYPE).unwrap(), "text/css");
    }

    #[tokio::test]
    async fn serves_nested_paths_by_prefix_stripping() {
        let fs = Arc::new(MemoryFs::new().with_file("css/app.css", b"x".to_vec(), "text/css"));
        let router = mount(RouterBuilder::new(), "/static", fs).build().unwrap();
        let resp = router
            .serve(Request::builder().uri("/static/css/app.css").body(Body::empty()).unwrap())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn percent_encoded_file_name_resolves_to_its_decoded_form() {
        let fs = Arc::new(MemoryFs::new().with_file("my file.css", b"x".to_vec(), "text/css"));
        let router = mount(RouterBuilder::new(), "/static", fs).build().unwrap();
        let resp = router
            .serve(Request::builder().uri("/static/my%20file.css").body(Body::empty()).unwrap())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let router = mount(RouterBuilder::new(), "/static", fs()).build().unwrap();
        let resp = router
            .serve(Request::builder().uri("/static/missing.css").body(Body::empty()).unwrap())
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn head_request_omits_body() {
        let router = mount(RouterBuilder::new(), "/static", fs()).build().unwrap();
        let resp = router
            .serve(
                Request::builder()
                    .method(Method::HEAD)
                    .uri("/static/style.css")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = hyper::body::to_bytes(resp.into_body()).await.unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn traversal_outside_root_is_rejected() {
        let fs = MemoryFs::new().with_file("secret.txt", b"nope".to_vec(), "text/plain");
        assert!(fs.read("../secret.txt").is_none());
        assert!(fs.read("../../etc/passwd").is_none());
    }
}
