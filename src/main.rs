use std::net::SocketAddr;

use anyhow::Context;
use gallery_cms::{app, config::AppConfig, db, state::AppState, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let config = AppConfig::from_env()?;
    let addr: SocketAddr = config
        .addr()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.addr()))?;
    tracing::info!(env = %config.env, "starting gallery-cms");

    let state = AppState::init(config).await?;
    db::migrate(&state.db).await?;

    let app = app::build_app(state);
    app::serve(app, addr).await
}
