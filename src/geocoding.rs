//! geocoding.rs
//! Búsqueda de ubicaciones: geocoding directo/inverso contra un proveedor
//! compatible con Nominatim y el cálculo del zoom del mapa a partir de la
//! caja envolvente devuelta.

use async_trait::async_trait;
use geo::{coord, Area, Rect};
use reqwest::Client;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::GeoError;
use crate::models::types::{AppCfg, BBox, Place};

/// Proveedor de geocoding. Se construye una vez y se inyecta en el controlador.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<Place, GeoError>;
    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Place, GeoError>;
}

// -------------------------------
// Curva área (grados²) -> zoom
// -------------------------------
// Heurística empírica: más área => menos zoom. Los dos últimos puntos se
// separan (1 y 100) para que la interpolación sea monótona.
const AREA_POINTS: [f64; 7] = [
    0.0,
    1.0 / 9_765_625.0, // 5^-10
    1.0 / 1_048_576.0, // 4^-10
    1.0 / 59_049.0,    // 3^-10
    1.0 / 1_024.0,     // 2^-10
    1.0,
    100.0,
];
const ZOOM_POINTS: [f64; 7] = [20.0, 17.0, 16.0, 15.0, 14.0, 7.0, 5.0];

/// Interpolación lineal a trozos; fuera de rango se satura a los extremos
pub fn zoom_for_area(area: f64) -> f64 {
    if area <= AREA_POINTS[0] { return ZOOM_POINTS[0]; }
    for i in 1..AREA_POINTS.len() {
        if area <= AREA_POINTS[i] {
            let (x0, x1) = (AREA_POINTS[i - 1], AREA_POINTS[i]);
            let (y0, y1) = (ZOOM_POINTS[i - 1], ZOOM_POINTS[i]);
            return y0 + (area - x0) * (y1 - y0) / (x1 - x0);
        }
    }
    ZOOM_POINTS[ZOOM_POINTS.len() - 1]
}

/// Alto × ancho de la caja (grados) interpolado a zoom
pub fn zoom_for_bbox(bbox: &BBox) -> Result<f64, GeoError> {
    let vals = [bbox.min_lat, bbox.max_lat, bbox.min_lon, bbox.max_lon];
    if vals.iter().any(|v| !v.is_finite()) {
        return Err(GeoError::LocationNotFound("caja envolvente vacía".into()));
    }
    // Rect normaliza min/max: equivale a |Δlat| · |Δlon|
    let rect = Rect::new(
        coord! { x: bbox.min_lon, y: bbox.min_lat },
        coord! { x: bbox.max_lon, y: bbox.max_lat },
    );
    Ok(zoom_for_area(rect.unsigned_area()))
}

/// Zoom sin amortiguar para una búsqueda libre; el llamador aplica el factor (0.85)
pub async fn zoom_for_location(geocoder: &dyn Geocoder, query: &str) -> Result<f64, GeoError> {
    let place = geocoder.geocode(query).await?;
    let bbox = place
        .bbox
        .ok_or_else(|| GeoError::LocationNotFound(format!("'{query}' sin caja envolvente")))?;
    zoom_for_bbox(&bbox)
}

// -------------------------------
// Cliente Nominatim
// -------------------------------
pub struct NominatimClient {
    pub(crate) http: Client,
    /// p.ej. "https://nominatim.openstreetmap.org"
    pub base_url: String,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    #[serde_as(as = "DisplayFromStr")]
    lat: f64,
    #[serde_as(as = "DisplayFromStr")]
    lon: f64,
    #[serde(default)]
    display_name: String,
    /// [min_lat, max_lat, min_lon, max_lon] como texto
    #[serde_as(as = "Option<Vec<DisplayFromStr>>")]
    #[serde(default)]
    boundingbox: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReverseResp {
    Place(NominatimPlace),
    Error { error: String },
}

impl From<NominatimPlace> for Place {
    fn from(p: NominatimPlace) -> Self {
        let bbox = match p.boundingbox.as_deref() {
            Some([a, b, c, d]) => Some(BBox { min_lat: *a, max_lat: *b, min_lon: *c, max_lon: *d }),
            _ => None,
        };
        Place { lat: p.lat, lon: p.lon, address: p.display_name, bbox }
    }
}

impl NominatimClient {
    pub fn new(cfg: &AppCfg) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(cfg.geocoder_user_agent.clone())
            .timeout(Duration::from_secs(cfg.geocoder_timeout_s))
            .gzip(true)
            .build()?;
        Ok(Self { http, base_url: cfg.geocoder_url.trim_end_matches('/').to_string() })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str, query: &[(&str, String)]) -> Result<T, GeoError> {
        let url = format!("{}/{}", self.base_url, path);
        let resp = self.http.get(&url).query(query).send().await.map_err(|e| {
            warn!("geocoder {url}: {e}");
            GeoError::from(e)
        })?;
        let status = resp.status();
        if !status.is_success() {
            warn!("geocoder {url}: HTTP {status}");
            return Err(GeoError::GeocodeUnavailable(format!("HTTP {status}")));
        }
        resp.json::<T>().await.map_err(GeoError::from)
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<Place, GeoError> {
        let q = query.trim();
        if q.is_empty() {
            return Err(GeoError::LocationNotFound("búsqueda vacía".into()));
        }
        let params = [
            ("q", q.to_string()),
            ("format", "jsonv2".to_string()),
            ("limit", "1".to_string()),
        ];
        let hits: Vec<NominatimPlace> = self.get_json("search", &params).await?;
        debug!("geocode '{q}': {} resultados", hits.len());
        hits.into_iter()
            .next()
            .map(Place::from)
            .ok_or_else(|| GeoError::LocationNotFound(q.to_string()))
    }

    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Place, GeoError> {
        let params = [
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("format", "jsonv2".to_string()),
        ];
        match self.get_json::<ReverseResp>("reverse", &params).await? {
            ReverseResp::Place(p) => Ok(p.into()),
            ReverseResp::Error { error } => Err(GeoError::LocationNotFound(format!("{lat}, {lon}: {error}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn control_points_map_exactly() {
        for (a, z) in AREA_POINTS.iter().zip(ZOOM_POINTS.iter()) {
            assert!((zoom_for_area(*a) - z).abs() < 1e-9, "area {a}");
        }
    }

    #[test]
    fn saturates_outside_range() {
        assert_eq!(zoom_for_area(-1.0), 20.0);
        assert_eq!(zoom_for_area(1e6), 5.0);
    }

    #[test]
    fn bbox_area_is_height_times_width() {
        // 0.5° × 2° = 1 grado² -> zoom 7
        let bb = BBox { min_lat: 10.0, max_lat: 10.5, min_lon: 3.0, max_lon: 1.0 };
        assert!((zoom_for_bbox(&bb).unwrap() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn nan_bbox_is_not_found() {
        let bb = BBox { min_lat: f64::NAN, max_lat: 1.0, min_lon: 0.0, max_lon: 1.0 };
        assert!(matches!(zoom_for_bbox(&bb), Err(GeoError::LocationNotFound(_))));
    }

    #[test]
    fn parses_nominatim_strings() {
        let raw = r#"[{"lat":"48.8588897","lon":"2.3200410","display_name":"Paris, France",
                      "boundingbox":["48.8155755","48.9021560","2.2241220","2.4697602"]}]"#;
        let hits: Vec<NominatimPlace> = serde_json::from_str(raw).unwrap();
        let p: Place = hits.into_iter().next().unwrap().into();
        assert_eq!(p.address, "Paris, France");
        let bb = p.bbox.unwrap();
        assert!((bb.max_lon - 2.4697602).abs() < 1e-9);
    }

    #[test]
    fn reverse_error_body_is_recognised() {
        let r: ReverseResp = serde_json::from_str(r#"{"error":"Unable to geocode"}"#).unwrap();
        assert!(matches!(r, ReverseResp::Error { .. }));
    }

    proptest! {
        #[test]
        fn zoom_never_increases_with_area(a in 0.0f64..500.0, b in 0.0f64..500.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(zoom_for_area(lo) >= zoom_for_area(hi));
        }

        #[test]
        fn zoom_never_increases_on_log_scale(e1 in -12.0f64..3.0, e2 in -12.0f64..3.0) {
            let (lo, hi) = if e1 <= e2 { (e1, e2) } else { (e2, e1) };
            prop_assert!(zoom_for_area(10f64.powf(lo)) >= zoom_for_area(10f64.powf(hi)));
        }
    }
}
