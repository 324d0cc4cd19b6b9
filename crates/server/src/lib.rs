pub mod config;
pub mod error;
pub mod routes;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorKind};
pub use routes::{create_router, AppState};
