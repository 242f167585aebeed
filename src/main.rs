use tracing::info;

use sheetlens::{start_server, ServerConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .try_init();

    let config = ServerConfig::from_env();
    info!(host = %config.host, port = config.port, "Starting sheetlens");

    start_server(&config)?.await
}
