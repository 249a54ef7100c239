//! Glob-importable convenience module, in the original router's own style:
//! internal modules pull in `Error`/`ErrorExt`/`ResultExt` with a single
//! `use crate::prelude::*;`, while downstream users get the same shortcut
//! for the handful of types every handler touches.
//!
//! `ErrorExt`/`ResultExt` are `pub(crate)`: they're visible to every module
//! in this crate through this glob import, but not re-exported outside it,
//! exactly as in the upstream router.

pub use crate::context::ResponseContext;
pub use crate::error::Error;
pub(crate) use crate::error::{ErrorExt, ResultExt};
pub use crate::ext::RequestExt;
pub use crate::middleware::Middleware;
pub use crate::router::{Router, RouterBuilder};
pub use crate::types::ParamMap;
pub use crate::validator::Validate;
pub use hyper::{Body, Method, Request, Response, StatusCode};
pub use junction_macros::{FromForm, Validate};
