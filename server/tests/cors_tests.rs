//! Cross-origin requests from the frontend.

mod common;

use actix_web::http::header;
use actix_web::http::StatusCode;
use actix_web::test;

use common::{context, ALLOWED_ORIGIN};
use lost_found_server::build_app;

#[actix_web::test]
async fn test_preflight_from_allowed_origin() {
    let ctx = context().await;
    let app = test::init_service(build_app(&ctx.security, ctx.state.clone())).await;

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/lost-found/lost-items")
        .insert_header((header::ORIGIN, ALLOWED_ORIGIN))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        ALLOWED_ORIGIN
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}

#[actix_web::test]
async fn test_preflight_from_other_origin_is_rejected() {
    let ctx = context().await;
    let app = test::init_service(build_app(&ctx.security, ctx.state.clone())).await;

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/lost-found/lost-items")
        .insert_header((header::ORIGIN, "http://evil.example"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[actix_web::test]
async fn test_login_response_carries_cors_headers() {
    let ctx = context().await;
    let app = test::init_service(build_app(&ctx.security, ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/lost-found/login")
        .insert_header((header::ORIGIN, ALLOWED_ORIGIN))
        .set_form([("username", "sam"), ("password", "sam-pass")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
}
