use relay::{AppState, RelayConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = match RelayConfig::from_env() {
        Ok(c) => c,
        Err(err) => {
            error!("{err}");
            std::process::exit(2);
        }
    };

    let state = match AppState::new(&config) {
        Ok(s) => s,
        Err(err) => {
            error!("http client setup failed: {err}");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(l) => l,
        Err(err) => {
            error!("bind {} failed: {err}", config.addr);
            std::process::exit(1);
        }
    };

    if let Err(err) = relay::serve(listener, state).await {
        error!("relay stopped: {err}");
        std::process::exit(1);
    }
}
