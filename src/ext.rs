use crate::types::ParamMap;
use hyper::{Body, Request};

/// Pulls the parameter bindings the dispatcher attached to a matched
/// request back out of its propagation context (`http::Extensions`).
///
/// Mirrors the upstream router's own `RequestExt` trait, generalized from
/// its app-data lookup to the router's own parameter map.
pub trait RequestExt {
    /// Looks up a single path parameter. Returns an empty string when the
    /// name is absent.
    fn param(&self, name: &str) -> &str;

    /// The full parameter map attached to this request, if any route
    /// matched with parameters.
    fn params(&self) -> Option<&ParamMap>;
}

impl RequestExt for Request<Body> {
    fn param(&self, name: &str) -> &str {
        self.extensions()
            .get::<ParamMap>()
            .and_then(|params| params.get(name))
            .unwrap_or("")
    }

    fn params(&self) -> Option<&ParamMap> {
        self.extensions().get::<ParamMap>()
    }
}
