use axum::{
    Router,
    routing::{delete, get},
};
use songqueue_core::api::routes::v1;

use crate::{
    handlers::{
        clear_entries_handler, create_entry_handler, get_entry_handler,
        list_entries_handler, update_entry_handler, websocket_handler,
    },
    infra::app_state::AppState,
};

/// Create all v1 API routes
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route(
            v1::entries::COLLECTION,
            get(list_entries_handler).post(create_entry_handler),
        )
        .route(v1::entries::CLEAR, delete(clear_entries_handler))
        .route(
            v1::entries::ITEM,
            get(get_entry_handler)
                .put(update_entry_handler)
                .patch(update_entry_handler),
        )
        .route(v1::realtime::SOCKET, get(websocket_handler))
}
