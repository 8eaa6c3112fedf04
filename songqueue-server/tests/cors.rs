use anyhow::Result;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use songqueue_core::api::routes::v1;
use songqueue_server::infra::config::{Config, CorsConfig};
use tower::ServiceExt;

mod common;
use common::build_test_app_with_config;

fn preflight(origin: &str) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method(Method::OPTIONS)
        .uri(v1::entries::COLLECTION)
        .header(header::ORIGIN, origin)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())?)
}

#[tokio::test]
async fn allow_list_echoes_only_configured_origins() -> Result<()> {
    let config = Config {
        cors: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
        ..Config::default()
    };
    let (router, _state, _tempdir) =
        build_test_app_with_config(config).await?.into_parts();

    let allowed = router
        .clone()
        .oneshot(preflight("http://localhost:5173")?)
        .await?;
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(
        allowed
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("http://localhost:5173")
    );

    let denied = router.oneshot(preflight("http://evil.test")?).await?;
    assert!(
        denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );

    Ok(())
}

#[tokio::test]
async fn wildcard_allows_any_origin() -> Result<()> {
    let (router, _state, _tempdir) =
        build_test_app_with_config(Config::default()).await?.into_parts();

    let response = router.oneshot(preflight("http://anywhere.test")?).await?;
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );

    Ok(())
}
