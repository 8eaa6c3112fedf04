use std::{any::type_name_of_val, fmt, sync::Arc};

use songqueue_core::{application::QueueService, database::SqliteDatabase};

use crate::infra::{config::Config, websocket::NotificationHub};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<SqliteDatabase>,
    pub queue: QueueService,
    pub hub: NotificationHub,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("bind_address", &self.config.bind_address())
            .field("db", &type_name_of_val(self.db.as_ref()))
            .field("hub", &self.hub)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Wire the queue service to a fresh hub sized from `config`.
    pub fn new(config: Arc<Config>, db: Arc<SqliteDatabase>) -> Self {
        let hub = NotificationHub::new(config.hub.channel_capacity);
        let queue = QueueService::new(db.entries(), Arc::new(hub.clone()));

        Self {
            config,
            db,
            queue,
            hub,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn queue(&self) -> &QueueService {
        &self.queue
    }

    pub fn hub(&self) -> &NotificationHub {
        &self.hub
    }
}
