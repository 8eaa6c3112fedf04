//! HTTP request handlers organized by functionality

pub mod entries;
pub mod system;
pub mod websocket;

pub use entries::{
    clear_entries_handler, create_entry_handler, get_entry_handler,
    list_entries_handler, update_entry_handler,
};
pub use system::{health_handler, ping_handler};
pub use websocket::websocket_handler;
