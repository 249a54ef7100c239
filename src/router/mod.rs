use crate::ext::RequestExt;
use crate::helpers;
use crate::matcher;
use crate::middleware::{BoxFuture, TerminalHandler};
use crate::route::Route;
use crate::writer::{ResponseSink, ResponseWriter};
use hyper::{Body, Request, Response, StatusCode};
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

pub use self::builder::RouterBuilder;

mod builder;

/// A routing tree node. Every route handler stored here is already fully
/// composed with its owning node's middleware chain: `RouterBuilder::build`
/// bakes that in once, up front, so dispatch never recomposes a chain per
/// request.
pub(crate) struct RouterNode {
    base_path: String,
    routes: Vec<Route>,
    children: Vec<RouterNode>,
    not_found: TerminalHandler,
    method_not_allowed: TerminalHandler,
}

impl RouterNode {
    pub(crate) fn new(
        base_path: String,
        routes: Vec<Route>,
        children: Vec<RouterNode>,
        not_found: TerminalHandler,
        method_not_allowed: TerminalHandler,
    ) -> RouterNode {
        RouterNode {
            base_path,
            routes,
            children,
            not_found,
            method_not_allowed,
        }
    }

    /// Dispatch for an incoming request: subrouters are tried first, in
    /// registration order, by path-prefix; only once none match does this
    /// node test its own routes. A path that matches some local route's
    /// pattern but not its method falls through to the node's
    /// method-not-allowed handler instead of 404.
    pub(crate) fn dispatch(&self, req: Request<Body>) -> BoxFuture<ResponseWriter> {
        let path = helpers::percent_decode_request_path(req.uri().path())
            .unwrap_or_else(|_| req.uri().path().to_string());

        for child in &self.children {
            if helpers::is_prefix_match(&child.base_path, &path) {
                return child.dispatch(req);
            }
        }

        let mut method_mismatch = false;
        for route in &self.routes {
            if let Some(params) = matcher::match_path(route.pattern(), &path) {
                if route.is_match_method(req.method()) {
                    let mut req = req;
                    req.extensions_mut().insert(params);
                    return (route.handler)(req);
                }
                method_mismatch = true;
            }
        }

        if method_mismatch {
            (self.method_not_allowed)(req)
        } else {
            (self.not_found)(req)
        }
    }
}

impl Debug for RouterNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ base_path: {:?}, routes: {:?}, children: {:?} }}",
            self.base_path, self.routes, self.children
        )
    }
}

/// The built, immutable routing tree. Registration must finish before the
/// router starts serving. Cheaply cloneable, since the whole tree lives
/// behind one `Arc`.
#[derive(Clone)]
pub struct Router {
    root: Arc<RouterNode>,
}

impl Router {
    /// Returns a [`RouterBuilder`] to assemble a `Router`.
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    pub(crate) fn from_node(root: RouterNode) -> Router {
        Router { root: Arc::new(root) }
    }

    pub(crate) fn dispatch(&self, req: Request<Body>) -> BoxFuture<ResponseWriter> {
        self.root.dispatch(req)
    }

    /// Reads a path parameter the dispatcher bound onto `req`. Both
    /// `router.url_param(req, name)` and `ctx.url_param(name)` look up the
    /// same opaque per-request key. Returns `""` when absent.
    pub fn url_param<'r>(&self, req: &'r Request<Body>, name: &str) -> &'r str {
        req.param(name)
    }

    /// Adapts this router into the bare terminal-handler shape so it can
    /// be wrapped by `hyper::service::service_fn` directly.
    pub fn into_terminal_handler(self) -> TerminalHandler {
        let root = self.root;
        Arc::new(move |req: Request<Body>| root.dispatch(req))
    }

    /// Drives one request through the tree and materializes a real
    /// `hyper::Response` from the resulting writer.
    pub async fn serve(&self, req: Request<Body>) -> Response<Body> {
        let writer = self.dispatch(req).await;
        let (status, headers, body) = writer.into_parts();
        let mut builder = Response::builder().status(status);
        *builder.headers_mut().expect("response builder has no error yet") = headers;
        builder
            .body(Body::from(body))
            .unwrap_or_else(|_| Response::new(Body::empty()))
    }

    /// Convenience entry point for `hyper::service::make_service_fn`: never
    /// fails, since nothing in the core dispatch path is fatal to the
    /// process.
    pub async fn call(&self, req: Request<Body>) -> Result<Response<Body>, std::convert::Infallible> {
        Ok(self.serve(req).await)
    }
}

pub(crate) fn default_not_found() -> TerminalHandler {
    Arc::new(|_req: Request<Body>| {
        Box::pin(async move {
            let mut writer = ResponseWriter::new();
            writer.write_status(StatusCode::NOT_FOUND);
            writer
        })
    })
}

pub(crate) fn default_method_not_allowed() -> TerminalHandler {
    Arc::new(|_req: Request<Body>| {
        Box::pin(async move {
            let mut writer = ResponseWriter::new();
            writer.write_status(StatusCode::METHOD_NOT_ALLOWED);
            writer
        })
    })
}
