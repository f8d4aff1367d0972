//! Reframe Server - HTTP processing service
//!
//! Accepts `POST /process-image` with a `multipart/form-data` body holding an
//! `image` file and a JSON `settings` part, runs the reframe-core transform
//! pipeline and answers with the PNG result or a JSON `{"error": ...}` body.

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use routes::{allowed_file, build_router, AppState};
pub use server::{create_app_router, Server};
