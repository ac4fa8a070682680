use mock_server::{AppState, MockConfig};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = env_or("PORT", "3000");
    let throttle_first = env_or("THROTTLE_FIRST", "0").parse().unwrap_or(0);
    let config = MockConfig {
        key: env_or("MOCK_KEY", "key"),
        token: env_or("MOCK_TOKEN", "token"),
        throttle_first,
    };

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, throttle_first, "Mock Trello API listening");
    mock_server::run(listener, AppState::new(config)).await
}
