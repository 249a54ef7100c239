use crate::error::{Error, ResultExt};
use crate::ext::RequestExt;
use crate::middleware::TerminalHandler;
use crate::writer::{ResponseSink, ResponseWriter};
use hyper::header::{HeaderValue, CONTENT_TYPE, LOCATION};
use hyper::{Body, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// What `ctx.html(...)` accepts: any value that can render itself to a
/// string. The actual HTML templating engine is left to the caller; this
/// crate only needs the rendered output.
pub trait Renderable {
    fn render(&self) -> String;
}

impl Renderable for str {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl Renderable for String {
    fn render(&self) -> String {
        self.clone()
    }
}

/// Transient per-request value bundling the request and the response sink
/// it is allowed to write into. Constructed fresh for each request and
/// never retained past the handler call that owns it.
///
/// The sink is `Arc<Mutex<ResponseWriter>>` rather than a borrowed
/// `&mut dyn ResponseSink` so that `ResponseContext` itself carries no
/// lifetime parameter. An enhanced handler is `Fn(ResponseContext) -> Fut`
/// with `Fut: 'static`, and a borrowed sink would tie `Fut` to the borrow's
/// lifetime the moment a handler's future captures `ctx` across an `.await`.
pub struct ResponseContext {
    req: Request<Body>,
    sink: Arc<Mutex<ResponseWriter>>,
}

impl ResponseContext {
    pub(crate) fn new(req: Request<Body>, sink: Arc<Mutex<ResponseWriter>>) -> ResponseContext {
        ResponseContext { req, sink }
    }

    pub fn request(&self) -> &Request<Body> {
        &self.req
    }

    pub fn request_mut(&mut self) -> &mut Request<Body> {
        &mut self.req
    }

    /// Reads a path parameter bound by the dispatcher, or `""` if absent.
    /// Looks at the same per-request propagation context
    /// `Router::url_param` would.
    pub fn url_param(&self, name: &str) -> &str {
        self.req.param(name)
    }

    /// True iff `Content-Type` or `Accept` mentions `application/json`.
    pub fn wants_json(&self) -> bool {
        let mentions_json = |value: &HeaderValue| value.to_str().map(|s| s.contains("application/json")).unwrap_or(false);

        self.req.headers().get(CONTENT_TYPE).map(mentions_json).unwrap_or(false)
            || self.req.headers().get(hyper::header::ACCEPT).map(mentions_json).unwrap_or(false)
    }

    /// Encodes `value` as JSON. On encode failure nothing is written, so the
    /// caller's error surfaces without a partial response.
    pub fn json<T: Serialize>(&mut self, status: StatusCode, value: &T) -> crate::Result<()> {
        let bytes = serde_json::to_vec(value).context("failed to encode JSON response body")?;
        let mut sink = self.sink.lock().unwrap();
        sink.write_header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        sink.write_status(status);
        sink.write_body(&bytes);
        Ok(())
    }

    pub fn json_error(&mut self, status: StatusCode, message: &str) -> crate::Result<()> {
        self.json(status, &serde_json::json!({ "error": message }))
    }

    pub fn text(&mut self, status: StatusCode, body: &str) -> crate::Result<()> {
        let mut sink = self.sink.lock().unwrap();
        sink.write_header(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
        sink.write_status(status);
        sink.write_body(body.as_bytes());
        Ok(())
    }

    pub fn html<R: Renderable + ?Sized>(&mut self, status: StatusCode, renderable: &R) -> crate::Result<()> {
        let mut sink = self.sink.lock().unwrap();
        sink.write_header(CONTENT_TYPE, HeaderValue::from_static("text/html; charset=utf-8"));
        sink.write_status(status);
        sink.write_body(renderable.render().as_bytes());
        Ok(())
    }

    pub fn redirect(&mut self, status: StatusCode, location: &str) -> crate::Result<()> {
        let value = HeaderValue::from_str(location).context("invalid redirect location")?;
        let mut sink = self.sink.lock().unwrap();
        sink.write_header(LOCATION, value);
        sink.write_status(status);
        Ok(())
    }

    /// See [`crate::binder`].
    pub async fn bind_json<T: DeserializeOwned>(&mut self) -> crate::Result<T> {
        crate::binder::bind_json(&mut self.req).await
    }

    pub async fn bind_form<T: crate::binder::FromForm>(&mut self) -> crate::Result<T> {
        crate::binder::bind_form(&mut self.req).await
    }

    pub async fn bind<T>(&mut self) -> crate::Result<T>
    where
        T: DeserializeOwned + crate::binder::FromForm,
    {
        crate::binder::bind(&mut self.req).await
    }

    /// Binds then validates, aggregating both stages into one result. A
    /// bind failure short-circuits before validation ever runs.
    pub async fn bind_validated<T>(&mut self, locale: &str) -> crate::Result<T>
    where
        T: DeserializeOwned + crate::binder::FromForm + crate::validator::Validate,
    {
        let value: T = self.bind().await?;
        value.validate_locale(locale).map_err(|errors| Error::new(errors.to_string()))?;
        Ok(value)
    }
}

/// Wraps an enhanced handler, `(ResponseContext) -> Result<()>`, into the
/// terminal shape every [`crate::route::Route`] ultimately stores. A
/// handler error becomes a 500 with a generic body, but only if the
/// handler had not already written a status of its own (the writer's
/// double-write guard makes this automatic).
pub(crate) fn wrap_enhanced<F, Fut>(handler: F) -> TerminalHandler
where
    F: Fn(ResponseContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = crate::Result<()>> + Send + 'static,
{
    let handler = Arc::new(handler);
    Arc::new(move |req: Request<Body>| {
        let handler = handler.clone();
        Box::pin(async move {
            let sink = Arc::new(Mutex::new(ResponseWriter::new()));
            let ctx = ResponseContext::new(req, sink.clone());
            let failed = handler(ctx).await.is_err();
            let mut writer = Arc::try_unwrap(sink)
                .unwrap_or_else(|_| panic!("handler retained its ResponseContext past return"))
                .into_inner()
                .unwrap();
            if failed {
                writer.write_status(StatusCode::INTERNAL_SERVER_ERROR);
                if writer.bytes_written() == 0 {
                    writer.write_body(b"Internal Server Error");
                }
            }
            writer
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::ResponseWriter;

    #[tokio::test]
    async fn json_writes_content_type_and_body() {
        let sink = Arc::new(Mutex::new(ResponseWriter::new()));
        let mut ctx = ResponseContext::new(Request::new(Body::empty()), sink.clone());
        ctx.json(StatusCode::OK, &serde_json::json!({ "ok": true })).unwrap();
        drop(ctx);

        let writer = sink.lock().unwrap();
        assert_eq!(writer.status(), Some(StatusCode::OK));
        assert_eq!(writer.body(), br#"{"ok":true}"#);
        assert_eq!(
            writer.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn enhanced_handler_error_without_prior_write_becomes_500() {
        let handler = wrap_enhanced(|_ctx: ResponseContext| async move { Err(Error::new("boom")) });
        let writer = handler(Request::new(Body::empty())).await;
        assert_eq!(writer.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn enhanced_handler_error_after_write_keeps_original_status() {
        let handler = wrap_enhanced(|mut ctx: ResponseContext| async move {
            ctx.text(StatusCode::OK, "partial")?;
            Err(Error::new("boom"))
        });
        let writer = handler(Request::new(Body::empty())).await;
        assert_eq!(writer.status(), Some(StatusCode::OK));
    }
}
