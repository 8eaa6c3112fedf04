use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::Router;
use axum_test::TestServer;
use songqueue_core::database::SqliteDatabase;
use songqueue_server::{
    AppState,
    infra::config::{Config, DatabaseConfig},
    routes::create_app,
};
use tempfile::TempDir;

// Code is used by test modules, but not in this scope
#[allow(unused)]
#[derive(Debug)]
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    _tempdir: TempDir,
}

#[allow(unused)]
impl TestApp {
    pub fn into_parts(self) -> (Router, AppState, TempDir) {
        (self.router, self.state, self._tempdir)
    }
}

#[allow(unused)]
pub async fn build_test_app() -> Result<TestApp> {
    build_test_app_with_config(Config {
        dev_mode: true,
        ..Config::default()
    })
    .await
}

/// Build the full router over a throwaway SQLite file. The database URL in
/// `config` is replaced.
#[allow(unused)]
pub async fn build_test_app_with_config(mut config: Config) -> Result<TestApp> {
    let tempdir = TempDir::new().context("failed to create tempdir")?;
    let url = format!("sqlite://{}", tempdir.path().join("songs.db").display());

    config.database = DatabaseConfig {
        url: url.clone(),
        max_connections: 2,
    };

    let db = SqliteDatabase::connect(&url, config.database.max_connections).await?;
    db.initialize_schema().await?;

    let state = AppState::new(Arc::new(config), Arc::new(db));
    let router = create_app(state.clone());

    Ok(TestApp {
        router,
        state,
        _tempdir: tempdir,
    })
}

#[allow(unused)]
pub fn test_server(router: Router) -> Result<TestServer> {
    TestServer::builder()
        .http_transport()
        .build(router)
        .map_err(|err| anyhow::anyhow!(err.to_string()))
}

/// Wait until the hub has registered `expected` viewers.
#[allow(unused)]
pub async fn wait_for_connections(state: &AppState, expected: usize) {
    for _ in 0..200 {
        if state.hub().connection_count() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "expected {expected} realtime connections, found {}",
        state.hub().connection_count()
    );
}
