use crate::writer::ResponseWriter;
use hyper::{Body, Request};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub(crate) type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A fully-erased terminal handler: request in, finished response writer
/// out. Every enhanced handler and every route handler is reduced to this
/// shape before it is stored on a [`crate::route::Route`].
pub(crate) type TerminalHandler = Arc<dyn Fn(Request<Body>) -> BoxFuture<ResponseWriter> + Send + Sync + 'static>;

/// A middleware wraps a terminal handler into another terminal handler.
/// Composition is LIFO: the first middleware registered on a node ends up
/// outermost.
pub type Middleware = Arc<dyn Fn(TerminalHandler) -> TerminalHandler + Send + Sync + 'static>;

/// Builds the cached composed chain for a node's middleware list: start
/// from the terminal handler, and for each middleware in *reverse*
/// registration order, replace the handler with `middleware(handler)`.
/// The middleware registered first therefore wraps everything registered
/// after it, so it is the first to run on the way in and the last to run
/// on the way out.
pub(crate) fn compose(middlewares: &[Middleware], terminal: TerminalHandler) -> TerminalHandler {
    middlewares
        .iter()
        .rev()
        .fold(terminal, |handler, middleware| middleware(handler))
}

/// A minimal request logger, built the same way the upstream router builds
/// its own ambient middleware: no logging crate, just `eprintln!` wrapping
/// the writer-interceptor byte/status counters from [`crate::writer`].
pub fn logger() -> Middleware {
    Arc::new(|next: TerminalHandler| -> TerminalHandler {
        Arc::new(move |req: Request<Body>| {
            let next = next.clone();
            Box::pin(async move {
                let method = req.method().clone();
                let path = req.uri().path().to_string();
                let writer = next(req).await;
                eprintln!(
                    "{} {} -> {} ({}B)",
                    method,
                    path,
                    writer.status_code_or_default(),
                    writer.bytes_written()
                );
                writer
            })
        })
    })
}
