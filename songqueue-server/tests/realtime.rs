use std::time::Duration;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{Value, json};
use songqueue_core::api::routes::v1;

mod common;
use common::{build_test_app, test_server, wait_for_connections};

const RECEIVE_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn viewers_receive_one_event_per_mutation() -> Result<()> {
    let (router, state, _tempdir) = build_test_app().await?.into_parts();
    let server = test_server(router)?;

    let mut socket = server
        .get_websocket(v1::realtime::SOCKET)
        .await
        .into_websocket()
        .await;
    wait_for_connections(&state, 1).await;

    let created: Value = server
        .post(v1::entries::COLLECTION)
        .json(&json!({ "title": "Bohemian Rhapsody", "body": "Queen" }))
        .await
        .json();

    let event: Value =
        tokio::time::timeout(RECEIVE_TIMEOUT, socket.receive_json()).await?;
    assert_eq!(event["message"], "New song added: Bohemian Rhapsody");
    assert_eq!(event["entry"], created);

    let updated: Value = server
        .put(&v1::entries::item(1))
        .json(&json!({ "status": "DONE" }))
        .await
        .json();

    let event: Value =
        tokio::time::timeout(RECEIVE_TIMEOUT, socket.receive_json()).await?;
    assert_eq!(event["message"], "Song updated: Bohemian Rhapsody");
    assert_eq!(event["entry"], updated);

    server.delete(v1::entries::CLEAR).await.assert_status_ok();

    let event: Value =
        tokio::time::timeout(RECEIVE_TIMEOUT, socket.receive_json()).await?;
    assert_eq!(event["message"], "All songs cleared from database");
    assert!(event["entry"].is_null());

    Ok(())
}

#[tokio::test]
async fn failed_mutations_publish_nothing() -> Result<()> {
    let (router, state, _tempdir) = build_test_app().await?.into_parts();
    let server = test_server(router)?;

    let mut socket = server
        .get_websocket(v1::realtime::SOCKET)
        .await
        .into_websocket()
        .await;
    wait_for_connections(&state, 1).await;

    server
        .post(v1::entries::COLLECTION)
        .json(&json!({ "title": "", "body": "Queen" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server.get(v1::entries::COLLECTION).await.assert_status_ok();

    // The first event a viewer sees is the next successful mutation.
    server
        .post(v1::entries::COLLECTION)
        .json(&json!({ "title": "Killer Queen", "body": "Queen" }))
        .await
        .assert_status(StatusCode::CREATED);

    let event: Value =
        tokio::time::timeout(RECEIVE_TIMEOUT, socket.receive_json()).await?;
    assert_eq!(event["message"], "New song added: Killer Queen");

    Ok(())
}

#[tokio::test]
async fn every_viewer_gets_the_broadcast() -> Result<()> {
    let (router, state, _tempdir) = build_test_app().await?.into_parts();
    let server = test_server(router)?;

    let mut first = server
        .get_websocket(v1::realtime::SOCKET)
        .await
        .into_websocket()
        .await;
    let mut second = server
        .get_websocket(v1::realtime::SOCKET)
        .await
        .into_websocket()
        .await;
    wait_for_connections(&state, 2).await;

    server.delete(v1::entries::CLEAR).await.assert_status_ok();

    for socket in [&mut first, &mut second] {
        let event: Value =
            tokio::time::timeout(RECEIVE_TIMEOUT, socket.receive_json()).await?;
        assert!(event["entry"].is_null());
    }

    Ok(())
}

#[tokio::test]
async fn closing_the_socket_unregisters_the_viewer() -> Result<()> {
    let (router, state, _tempdir) = build_test_app().await?.into_parts();
    let server = test_server(router)?;

    let socket = server
        .get_websocket(v1::realtime::SOCKET)
        .await
        .into_websocket()
        .await;
    wait_for_connections(&state, 1).await;

    socket.close().await;
    wait_for_connections(&state, 0).await;

    // Mutations still succeed with nobody listening.
    server
        .post(v1::entries::COLLECTION)
        .json(&json!({ "title": "Song", "body": "Artist" }))
        .await
        .assert_status(StatusCode::CREATED);

    Ok(())
}
