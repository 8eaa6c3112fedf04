use std::sync::{Arc, Mutex};

use songqueue_core::{
    QueueEvent,
    application::{QueueEventPublisher, QueueService},
    database::SqliteDatabase,
};
use tempfile::TempDir;

/// File-backed database living inside a temporary directory.
#[allow(unused)]
pub struct TestDb {
    pub db: SqliteDatabase,
    pub url: String,
    _tempdir: TempDir,
}

#[allow(unused)]
impl TestDb {
    pub fn into_parts(self) -> (SqliteDatabase, String, TempDir) {
        (self.db, self.url, self._tempdir)
    }
}

#[allow(unused)]
pub async fn open_test_db() -> TestDb {
    let tempdir = tempfile::tempdir().expect("create temp dir");
    let url = format!("sqlite://{}", tempdir.path().join("songs.db").display());
    let db = SqliteDatabase::connect(&url, 4)
        .await
        .expect("open sqlite database");
    db.initialize_schema().await.expect("apply migrations");

    TestDb {
        db,
        url,
        _tempdir: tempdir,
    }
}

#[allow(unused)]
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<QueueEvent>>,
}

#[allow(unused)]
impl RecordingPublisher {
    pub fn take(&self) -> Vec<QueueEvent> {
        std::mem::take(&mut *self.events.lock().expect("publisher lock"))
    }
}

impl QueueEventPublisher for RecordingPublisher {
    fn publish(&self, event: QueueEvent) {
        self.events.lock().expect("publisher lock").push(event);
    }
}

#[allow(unused)]
pub async fn service_with_recorder()
-> (QueueService, Arc<RecordingPublisher>, TestDb) {
    let test_db = open_test_db().await;
    let publisher = Arc::new(RecordingPublisher::default());
    let service = QueueService::new(test_db.db.entries(), publisher.clone());
    (service, publisher, test_db)
}
