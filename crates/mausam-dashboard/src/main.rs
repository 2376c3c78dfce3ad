use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use mausam_client::{ClientSettings, OpenWeatherClient};
use mausam_dashboard::{Action, DashboardSettings, FixedPosition, Services};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    // Observability
    mausam_obs::init("mausam");

    // Config
    let cfg = mausam_config::AppConfig::load().context("failed to load config")?;
    let http_bind = cfg.http_bind();
    let default_location = cfg.default_location();

    let api_key = cfg
        .api_key()
        .context("no OpenWeatherMap API key; set api.key or MAUSAM_API_KEY")?;
    let client = Arc::new(OpenWeatherClient::new(ClientSettings {
        api_key,
        base_url: cfg.api_base_url(),
        timeout: Duration::from_secs(cfg.api_timeout_secs()),
    })?);

    // The server has no device of its own; position requests resolve to the default place.
    let services = Services {
        weather: client.clone(),
        geocoder: client,
        locator: Arc::new(FixedPosition(default_location.coordinates())),
    };
    let settings = DashboardSettings {
        units: cfg.units(),
        forecast_days: cfg.forecast_days(),
        locate_timeout: Duration::from_secs(cfg.locate_timeout_secs()),
    };

    let (app, state) = mausam_dashboard::build_app(services, settings)?;

    // Initial load runs in the background so the listener comes up immediately
    let initial = Arc::clone(&state);
    tokio::spawn(async move {
        tracing::info!(place = %default_location.label(), "loading default location");
        initial
            .dashboard()
            .dispatch(Action::SelectLocation(default_location))
            .await;
    });

    // Start HTTP server
    let addr: SocketAddr = http_bind
        .parse()
        .with_context(|| format!("invalid HTTP bind address {http_bind}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind TCP listener")?;

    // Mark ready just before serving
    mausam_dashboard::set_ready(&state, true);

    tracing::info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
