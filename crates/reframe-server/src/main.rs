use clap::Parser;
use reframe_server::{Server, ServerConfig, ServerResult};

#[tokio::main]
async fn main() -> ServerResult<()> {
    let config = ServerConfig::parse();
    init_tracing();

    Server::new(&config)?.serve().await
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
