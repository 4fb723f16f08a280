//! main.rs — Carga del dataset Michelin + geocoder + API HTTP

use anyhow::{Context, Result};
use reqwest::Client;
use std::{env, sync::Arc};
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use michelin_map::carga;
use michelin_map::controller::Controller;
use michelin_map::geocoding::NominatimClient;
use michelin_map::models::types::AppCfg;
use michelin_map::server::api;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs (RUST_LOG manda; por defecto info)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app_cfg = app_cfg_from_env();

    // HTTP client con compresión (descarga del CSV)
    let client = Client::builder().brotli(true).gzip(true).deflate(true).build()?;

    // Dataset: se carga una vez y no se vuelve a tocar
    info!("Cargando dataset: {}", app_cfg.data_source);
    let dataset = carga::load_dataset(&client, &app_cfg.data_source)
        .await
        .context("carga inicial del dataset")?;

    let geocoder = NominatimClient::new(&app_cfg).context("cliente de geocoding")?;
    info!("Geocoder: {}", geocoder.base_url);

    let ctl = Controller::new(Arc::new(dataset), Arc::new(geocoder), &app_cfg);

    // API
    let app = api::router(api::ApiState { ctl }, &app_cfg.web_dir);
    info!("Escuchando en http://{}", app_cfg.bind);
    let listener = tokio::net::TcpListener::bind(&app_cfg.bind).await?;
    let serve = axum::serve(listener, app);
    tokio::select! {
        r = serve => { r?; },
        _ = signal::ctrl_c() => { info!("Señal de salida recibida"); }
    }

    Ok(())
}

fn app_cfg_from_env() -> AppCfg {
    let mut c = AppCfg::default();
    if let Ok(v) = env::var("BIND") { c.bind = v; }
    if let Ok(v) = env::var("DATA_SOURCE") { c.data_source = v; }
    if let Ok(v) = env::var("GEOCODER_URL") { c.geocoder_url = v; }
    if let Ok(v) = env::var("GEOCODER_UA") { c.geocoder_user_agent = v; }
    if let Ok(v) = env::var("GEOCODER_TIMEOUT_S") { c.geocoder_timeout_s = v.parse().unwrap_or(c.geocoder_timeout_s); }
    if let Ok(v) = env::var("ZOOM_DAMPING") { c.zoom_damping = v.parse().unwrap_or(c.zoom_damping); }
    if let Ok(v) = env::var("TOP_N") { c.top_n = v.parse().unwrap_or(c.top_n); }
    if let Ok(v) = env::var("WEB_DIR") { c.web_dir = v; }
    c
}
