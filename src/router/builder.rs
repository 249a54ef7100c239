use crate::context::{self, ResponseContext};
use crate::group::{Group, PendingRoute};
use crate::helpers;
use crate::middleware::{self, Middleware, TerminalHandler};
use crate::route::Route;
use crate::router::{default_method_not_allowed, default_not_found, Router, RouterNode};
use hyper::Method;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;

/// Accumulates routes, subrouters and middleware before `build()` compiles
/// everything into an immutable [`RouterNode`] tree. Registration must
/// complete before serving begins.
pub struct RouterBuilder {
    base_path: String,
    routes: Vec<PendingRoute>,
    children: Vec<RouterBuilder>,
    middleware: Vec<Middleware>,
    not_found: Option<TerminalHandler>,
    method_not_allowed: Option<TerminalHandler>,
}

impl RouterBuilder {
    pub(crate) fn new() -> RouterBuilder {
        RouterBuilder {
            base_path: String::new(),
            routes: Vec::new(),
            children: Vec::new(),
            middleware: Vec::new(),
            not_found: None,
            method_not_allowed: None,
        }
    }

    /// Registers an enhanced handler, `(ResponseContext) -> Result<()>`,
    /// under GET. Enhanced handlers are a convenience layer wrapped into the
    /// terminal shape by [`context::wrap_enhanced`].
    pub fn get<F, Fut>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(ResponseContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<()>> + Send + 'static,
    {
        self.route(Method::GET, pattern, context::wrap_enhanced(handler), None)
    }

    pub fn post<F, Fut>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(ResponseContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<()>> + Send + 'static,
    {
        self.route(Method::POST, pattern, context::wrap_enhanced(handler), None)
    }

    pub fn put<F, Fut>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(ResponseContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<()>> + Send + 'static,
    {
        self.route(Method::PUT, pattern, context::wrap_enhanced(handler), None)
    }

    pub fn patch<F, Fut>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(ResponseContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<()>> + Send + 'static,
    {
        self.route(Method::PATCH, pattern, context::wrap_enhanced(handler), None)
    }

    pub fn delete<F, Fut>(self, pattern: &str, handler: F) -> Self
    where
        F: Fn(ResponseContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = crate::Result<()>> + Send + 'static,
    {
        self.route(Method::DELETE, pattern, context::wrap_enhanced(handler), None)
    }

    /// Registers a bare terminal handler, `(Request) -> ResponseWriter`,
    /// with no enhanced-handler wrapping and room for opaque metadata.
    pub fn route(
        mut self,
        method: Method,
        pattern: &str,
        handler: TerminalHandler,
        metadata: Option<Arc<dyn Any + Send + Sync>>,
    ) -> Self {
        self.push_pending_route(method, pattern.to_string(), handler, metadata);
        self
    }

    pub(crate) fn push_pending_route(
        &mut self,
        method: Method,
        pattern: String,
        handler: TerminalHandler,
        metadata: Option<Arc<dyn Any + Send + Sync>>,
    ) {
        self.routes.push(PendingRoute {
            method,
            pattern,
            handler,
            metadata,
        });
    }

    /// Appends a middleware to this node's list. Any subrouter mounted
    /// afterwards via [`RouterBuilder::mount`] sees it; subrouters already
    /// mounted do not.
    pub fn middleware(mut self, middleware: Middleware) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn not_found(mut self, handler: TerminalHandler) -> Self {
        self.not_found = Some(handler);
        self
    }

    pub fn method_not_allowed(mut self, handler: TerminalHandler) -> Self {
        self.method_not_allowed = Some(handler);
        self
    }

    /// Mounts a [`crate::static_files::VirtualFs`] under `url_prefix`:
    /// `GET`/`HEAD` requests falling under the prefix and matching no other
    /// route are resolved by stripping the prefix and reading the remainder
    /// out of `fs`.
    pub fn static_files<F: crate::static_files::VirtualFs>(self, url_prefix: &str, fs: F) -> Self {
        crate::static_files::mount(self, url_prefix, Arc::new(fs))
    }

    /// Builds a scope of routes sharing a prefix and an extra, group-local
    /// middleware stack. The group never becomes part of the tree; its
    /// pending registrations are rewritten onto `self`.
    pub fn group<F>(mut self, prefix: &str, build: F) -> Self
    where
        F: FnOnce(Group) -> Group,
    {
        let group = build(Group::new(prefix));
        for pending in group.into_pending() {
            self.push_pending_route(pending.method, pending.pattern, pending.handler, pending.metadata);
        }
        self
    }

    /// Mounts `child` as a subrouter under `prefix`. The child's base path
    /// becomes `join(self.base_path, prefix)`, and it inherits a snapshot of
    /// `self`'s current middleware list, taken right now rather than at
    /// `build()` time, ahead of any middleware the child already carries.
    pub fn mount(mut self, prefix: &str, mut child: RouterBuilder) -> Self {
        child.base_path = helpers::join_paths(&self.base_path, prefix);

        let mut inherited = self.middleware.clone();
        inherited.append(&mut child.middleware);
        child.middleware = inherited;

        if child.not_found.is_none() {
            child.not_found = self.not_found.clone();
        }
        if child.method_not_allowed.is_none() {
            child.method_not_allowed = self.method_not_allowed.clone();
        }

        self.children.push(child);
        self
    }

    /// Compiles every pending route and subrouter into an immutable
    /// dispatch tree. Each route's handler is composed with its owning
    /// node's middleware chain exactly once here: per-request dispatch cost
    /// is then a single function call, not a recomposition.
    pub fn build(self) -> crate::Result<Router> {
        Ok(Router::from_node(self.build_node()?))
    }

    fn build_node(self) -> crate::Result<RouterNode> {
        let mut routes = Vec::with_capacity(self.routes.len());
        for pending in self.routes {
            let full_pattern = helpers::join_paths(&self.base_path, &pending.pattern);
            let composed = middleware::compose(&self.middleware, pending.handler);
            routes.push(Route::new(pending.method, &full_pattern, composed, pending.metadata)?);
        }

        let mut children = Vec::with_capacity(self.children.len());
        for child in self.children {
            children.push(child.build_node()?);
        }

        Ok(RouterNode::new(
            self.base_path,
            routes,
            children,
            self.not_found.unwrap_or_else(default_not_found),
            self.method_not_allowed.unwrap_or_else(default_method_not_allowed),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ResponseSink;
    use hyper::{Body, Request, StatusCode};
    use std::sync::{Arc, Mutex};

    fn ok_handler() -> TerminalHandler {
        Arc::new(|_req: Request<Body>| {
            Box::pin(async move {
                let mut writer = crate::writer::ResponseWriter::new();
                writer.write_status(StatusCode::OK);
                writer
            })
        })
    }

    fn trace_middleware(tag: &'static str, log: Arc<Mutex<Vec<&'static str>>>) -> Middleware {
        Arc::new(move |next: TerminalHandler| -> TerminalHandler {
            let log = log.clone();
            Arc::new(move |req: Request<Body>| {
                let next = next.clone();
                let log = log.clone();
                Box::pin(async move {
                    log.lock().unwrap().push(tag);
                    next(req).await
                })
            })
        })
    }

    #[tokio::test]
    async fn first_match_wins_among_same_method_routes() {
        let router = RouterBuilder::new()
            .route(Method::GET, "/x", ok_handler(), None)
            .route(Method::GET, "/x", {
                Arc::new(|_req: Request<Body>| {
                    Box::pin(async move {
                        let mut writer = crate::writer::ResponseWriter::new();
                        writer.write_status(StatusCode::CREATED);
                        writer
                    })
                })
            }, None)
            .build()
            .unwrap();

        let resp = router
            .serve(Request::builder().uri("/x").body(Body::empty()).unwrap())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn method_mismatch_yields_405_and_missing_path_yields_404() {
        let router = RouterBuilder::new()
            .route(Method::GET, "/x", ok_handler(), None)
            .build()
            .unwrap();

        let resp = router
            .serve(
                Request::builder()
                    .method(Method::POST)
                    .uri("/x")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let resp = router
            .serve(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn subrouter_snapshots_middleware_at_mount_time() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let child = RouterBuilder::new()
            .middleware(trace_middleware("a", log.clone()))
            .route(Method::GET, "/dashboard", ok_handler(), None);

        let router = RouterBuilder::new()
            .mount("/admin", child)
            .middleware(trace_middleware("x", log.clone()))
            .build()
            .unwrap();

        let resp = router
            .serve(
                Request::builder()
                    .uri("/admin/dashboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(*log.lock().unwrap(), vec!["a"]);
    }

    #[tokio::test]
    async fn group_wraps_inside_router_global_middleware() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let router = RouterBuilder::new()
            .middleware(trace_middleware("R", log.clone()))
            .group("/v1", {
                let log = log.clone();
                move |group| {
                    group
                        .middleware(trace_middleware("G", log.clone()))
                        .get("/ping", |mut ctx: ResponseContext| async move { ctx.text(StatusCode::OK, "") })
                }
            })
            .build()
            .unwrap();

        let resp = router
            .serve(Request::builder().uri("/v1/ping").body(Body::empty()).unwrap())
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(*log.lock().unwrap(), vec!["R", "G"]);
    }
}
