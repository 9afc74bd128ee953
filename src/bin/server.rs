//! capscope HTTP server
//!
//! Run with: cargo run --features server --bin capscope-server
//!
//! Environment: CAPSCOPE_ADDR or PORT, CAPSCOPE_CORS, RUST_LOG

use capscope::config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> capscope::Result<()> {
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();
    capscope::server::serve(config).await
}
