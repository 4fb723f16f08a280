//! fetch.rs
//! Descarga única del CSV del dataset (se hace una vez al arrancar).

use anyhow::Result;
use bytes::Bytes;
use reqwest::Client;
use tracing::debug;

/// GET simple: cualquier estado no 2xx es error
pub async fn get_bytes(client: &Client, url: &str) -> Result<Bytes> {
    let resp = client.get(url).send().await?.error_for_status()?;
    let bytes = resp.bytes().await?;
    debug!("{url}: {} bytes", bytes.len());
    Ok(bytes)
}
