//! Integration tests for `#[derive(FromForm)]`, `ctx.bind()` dispatch and
//! the static file mount end to end. Lives outside `src/` for the same
//! reason as `tests/validation.rs`: the derive macro expands to
//! `impl ::junction::binder::FromForm`, which only resolves once `junction`
//! is depended on under its own crate name.

use hyper::{Body, Method, Request, StatusCode};
use junction::prelude::*;
use junction::{MemoryFs, Router};

#[derive(FromForm, serde::Deserialize, Debug, PartialEq)]
struct Signup {
    name: String,
    subscribed: bool,
    #[form(rename = "tag")]
    tags: Vec<String>,
}

#[tokio::test]
async fn repeated_keys_and_comma_separated_value_bind_to_the_same_vec() {
    async fn handler(mut ctx: ResponseContext) -> junction::Result<()> {
        let signup: Signup = ctx.bind().await?;
        ctx.json(StatusCode::OK, &serde_json::json!({ "tags": signup.tags }))
    }

    let router = Router::builder().post("/signup", handler).build().unwrap();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/signup")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("name=ada&subscribed=on&tag=a&tag=b&tag=c"))
        .unwrap();
    let resp = router.serve(req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = hyper::body::to_bytes(resp.into_body()).await.unwrap();
    assert_eq!(body.as_ref(), br#"{"tags":["a","b","c"]}"#);

    let req = Request::builder()
        .method(Method::POST)
        .uri("/signup")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from("name=ada&subscribed=on&tag=a,b,c"))
        .unwrap();
    let resp = router.serve(req).await;
    let body = hyper::body::to_bytes(resp.into_body()).await.unwrap();
    assert_eq!(body.as_ref(), br#"{"tags":["a","b","c"]}"#);
}

#[tokio::test]
async fn unsupported_content_type_yields_500_from_default_error_path() {
    async fn handler(mut ctx: ResponseContext) -> junction::Result<()> {
        let _signup: Signup = ctx.bind().await?;
        ctx.text(StatusCode::OK, "unreachable")
    }
    // `ctx.bind()` dispatches on Content-Type (bind_form alone never checks it).

    let router = Router::builder().post("/signup", handler).build().unwrap();
    let req = Request::builder()
        .method(Method::POST)
        .uri("/signup")
        .header("content-type", "text/plain")
        .body(Body::from("name=ada"))
        .unwrap();
    let resp = router.serve(req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn static_mount_and_dynamic_route_coexist_on_the_same_router() {
    async fn ping(mut ctx: ResponseContext) -> junction::Result<()> {
        ctx.text(StatusCode::OK, "pong")
    }

    let fs = MemoryFs::new().with_file("app.js", b"console.log(1)".to_vec(), "application/javascript");
    let router = Router::builder()
        .get("/ping", ping)
        .static_files("/assets", fs)
        .build()
        .unwrap();

    let resp = router
        .serve(Request::builder().uri("/ping").body(Body::empty()).unwrap())
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = router
        .serve(Request::builder().uri("/assets/app.js").body(Body::empty()).unwrap())
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(hyper::header::CONTENT_TYPE).unwrap(),
        "application/javascript"
    );
}
