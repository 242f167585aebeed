mod application;
mod domain;
mod infrastructure;
mod interfaces;

pub use crate::infrastructure::config::ServerConfig;
pub use crate::interfaces::http::start_server;
