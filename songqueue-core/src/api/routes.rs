macro_rules! v1_path {
    ($path:literal) => {
        concat!("/api/v1", $path)
    };
}

/// Versioned API route definitions shared by the server and its clients
pub mod v1 {
    pub mod entries {
        pub const COLLECTION: &str = v1_path!("/entries");
        pub const ITEM: &str = v1_path!("/entries/{id}");
        pub const CLEAR: &str = v1_path!("/entries/clear");

        /// Concrete path for a single entry.
        pub fn item(id: i64) -> String {
            format!("{COLLECTION}/{id}")
        }
    }

    pub mod realtime {
        pub const SOCKET: &str = v1_path!("/ws");
    }
}

pub mod system {
    pub const PING: &str = "/ping";
    pub const HEALTH: &str = "/health";
}
