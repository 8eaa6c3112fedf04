pub mod connection;
pub mod hub;
pub mod messages;

pub use connection::*;
pub use hub::*;
pub use messages::*;
