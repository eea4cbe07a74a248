use pix_checkout::config::Config;
use pix_checkout::handlers;
use pix_checkout::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pix_checkout=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    let addr = config.addr();
    let state = AppState::new(config)?;
    let app = handlers::app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
