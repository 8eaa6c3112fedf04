//! HTTP and websocket front end for the SongQueue request queue.
//!
//! The binary in `main.rs` loads configuration, opens the SQLite store and
//! serves [`routes::create_app`]. Integration tests build the same router
//! around a throwaway database.

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
