use crate::middleware::TerminalHandler;
use crate::pattern::{self, Pattern};
use hyper::Method;
use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// A `(method, compiled pattern, handler, metadata)` tuple, immutable once
/// registered. Owned exclusively by the [`crate::router::RouterNode`]
/// it was registered on.
pub struct Route {
    pub(crate) method: Method,
    pub(crate) pattern: Pattern,
    pub(crate) handler: TerminalHandler,
    pub(crate) metadata: Option<Arc<dyn Any + Send + Sync>>,
}

impl Route {
    pub(crate) fn new(
        method: Method,
        full_pattern: &str,
        handler: TerminalHandler,
        metadata: Option<Arc<dyn Any + Send + Sync>>,
    ) -> crate::Result<Route> {
        let pattern = pattern::compile(full_pattern)?;
        Ok(Route {
            method,
            pattern,
            handler,
            metadata,
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The opaque metadata pointer attached at registration time, untouched
    /// by the core and consulted only by external collaborators such as an
    /// OpenAPI reflector.
    pub fn metadata(&self) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.metadata.as_ref()
    }

    pub(crate) fn is_match_method(&self, method: &Method) -> bool {
        &self.method == method
    }
}

impl Debug for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ method: {}, pattern: {:?} }}", self.method, self.pattern.raw())
    }
}
