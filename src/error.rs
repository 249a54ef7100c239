use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};

/// The single error type returned by fallible `junction` operations:
/// pattern compilation, body binding and routing setup.
///
/// Carries an optional human-readable context message plus the original
/// source error, the same two-layer shape the original router used for its
/// own `Error` type.
pub struct Error {
    context: Option<String>,
    source: Box<dyn StdError + Send + Sync + 'static>,
}

impl Error {
    /// Build an `Error` from a plain message with no further source.
    pub fn new<M: Into<String>>(message: M) -> Error {
        Error {
            context: None,
            source: Box::new(StringError(message.into())),
        }
    }

    pub(crate) fn wrap<M: Into<String>>(context: M, source: Box<dyn StdError + Send + Sync + 'static>) -> Error {
        Error {
            context: Some(context.into()),
            source,
        }
    }
}

#[derive(Debug)]
struct StringError(String);

impl Display for StringError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for StringError {}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(ctx) => write!(f, "{}: {}", ctx, self.source),
            None => write!(f, "{}", self.source),
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Error {{ context: {:?}, source: {} }}", self.context, self.source)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Attaches a context message to any `std::error::Error`, producing a
/// `junction::Error`. Blanket-implemented so `.context(..)` reads naturally
/// both on raw source errors and on a `junction::Error` you want to rewrap.
pub(crate) trait ErrorExt: StdError + Send + Sync + Sized + 'static {
    fn context<C: Into<String>>(self, context: C) -> Error;
}

impl<E: StdError + Send + Sync + 'static> ErrorExt for E {
    fn context<C: Into<String>>(self, context: C) -> Error {
        Error::wrap(context, Box::new(self))
    }
}

/// `.context(..)` for `Result<T, E>`, the form actually used at call sites.
pub(crate) trait ResultExt<T> {
    fn context<C: Into<String>>(self, context: C) -> crate::Result<T>;
}

impl<T, E: StdError + Send + Sync + 'static> ResultExt<T> for Result<T, E> {
    fn context<C: Into<String>>(self, context: C) -> crate::Result<T> {
        self.map_err(|e| e.context(context))
    }
}
