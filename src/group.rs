use crate::context::{self, ResponseContext};
use crate::middleware::{self, Middleware, TerminalHandler};
use hyper::Method;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;

pub(crate) struct PendingRoute {
    pub(crate) method: Method,
    pub(crate) pattern: String,
    pub(crate) handler: TerminalHandler,
    pub(crate) metadata: Option<Arc<dyn Any + Send + Sync>>,
}

/// Ephemeral prefix + middleware helper that never owns a route of its own.
/// Every registration made through a `Group` is rewritten onto the parent
/// builder as `(parent.basePath ∘ group.prefix ∘ pattern)` with the handler
/// wrapped by the group's own middleware, innermost first.
/// `RouterBuilder::group` drains the pending routes back onto itself once
/// the closure building the group returns.
pub struct Group {
    prefix: String,
    middleware: Vec<Middleware>,
    pending: Vec<PendingRoute>,
}

impl Group {
    pub(crate) fn new(prefix: &str) -> Group {
        Group {
            prefix: prefix.to_string(),
            middleware: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Appends a middleware local to this group only, wrapping group
    /// routes before the router's own global middleware does.
    pub fn middleware(mut self, middleware: Middleware) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Registers an enhanced handler, `(ResponseContext) -> Result<()>`,
    /// the same ergonomic shape [`crate::router::RouterBuilder`] exposes at
    /// the top level.
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

    /// Registers a bare terminal handler with room for opaque metadata,
    /// mirroring [`crate::router::RouterBuilder::route`].
    pub fn route(
        mut self,
        method: Method,
        pattern: &str,
        handler: TerminalHandler,
        metadata: Option<Arc<dyn Any + Send + Sync>>,
    ) -> Self {
        let joined = crate::helpers::join_paths(&self.prefix, pattern);
        let wrapped = middleware::compose(&self.middleware, handler);
        self.pending.push(PendingRoute {
            method,
            pattern: joined,
            handler: wrapped,
            metadata,
        });
        self
    }

    pub(crate) fn into_pending(self) -> Vec<PendingRoute> {
        self.pending
    }
}
