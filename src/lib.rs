pub use self::context::{Renderable, ResponseContext};
pub use self::error::Error;
pub(crate) use self::error::{ErrorExt, ResultExt};
pub use self::ext::RequestExt;
pub use self::group::Group;
pub use self::middleware::{logger, Middleware};
pub use self::pattern::Pattern;
pub use self::route::Route;
pub use self::router::{Router, RouterBuilder};
pub use self::static_files::{MemoryFs, VirtualFs};
pub use self::types::ParamMap;
pub use self::validator::{Validate, ValidationError, ValidationErrors};
pub use self::writer::{RecordingSink, ResponseSink, ResponseWriter};
// Same identifiers as the trait/struct above on purpose: a derive macro
// lives in the macro namespace, so `Validate`/`FromForm` here don't clash
// with `validator::Validate` or `binder::FromForm`. `#[derive(Validate)]`
// resolves to this, `impl Validate for ...` resolves to the trait.
pub use junction_macros::{FromForm, Validate};

pub mod binder;
mod context;
mod error;
mod ext;
mod group;
mod helpers;
mod matcher;
mod middleware;
mod pattern;
pub mod prelude;
mod route;
mod router;
pub mod static_files;
mod types;
pub mod validator;
mod writer;

pub type Result<T> = std::result::Result<T, Error>;
