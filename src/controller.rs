//! controller.rs
//!
//! Despacho de eventos de la UI. Cada salida tiene un único manejador que recibe
//! explícitamente qué entrada cambió (`MapEvent`) y decide:
//! - filtros      -> reconstrucción completa del mapa (conserva centro/zoom/estilo)
//! - estilo       -> parche sólo de estilo, sin tocar las trazas
//! - búsqueda     -> geocoding + zoom por caja envolvente -> parche centro/zoom
//! - geolocación  -> geocoding inverso -> parche centro (y zoom si hay caja)
//!
//! Dataset y geocoder llegan inyectados; no hay estado global.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::GeoError;
use crate::geocoding::{self, Geocoder};
use crate::models::figures::{BarFigure, LatLon, MapFigure, MapPatch, WordFrequencies, WordcloudFigure};
use crate::models::types::{AppCfg, Award, Dataset, FilterSelection, MapViewState, RestaurantRecord, MAP_STYLES};
use crate::plots;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapEvent {
    Filters(FilterSelection),
    Style(String),
    Search(String),
    Geolocation { lat: f64, lon: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapUpdate {
    Replace(MapFigure),
    Patch(MapPatch),
}

/// Eventos que sólo actualizan el texto del buscador
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationEvent {
    Search(String),
    Geolocation { lat: f64, lon: f64 },
}

#[derive(Clone, Debug, Serialize)]
pub struct Insights {
    pub restaurants: usize,
    pub bar: BarFigure,
    pub frequencies: WordFrequencies,
    pub wordcloud: WordcloudFigure,
}

/// Ficha que se abre al hacer click en un marcador
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RestaurantDetail {
    pub name: String,
    pub award: Award,
    pub stars: u8,
    pub price: u8,
    pub address: String,
    pub location: String,
    pub cuisines: Vec<String>,
    pub services: Vec<String>,
    pub description: String,
    pub url: String,
}

impl From<&RestaurantRecord> for RestaurantDetail {
    fn from(r: &RestaurantRecord) -> Self {
        Self {
            name: r.name.clone(),
            award: r.award,
            stars: r.award.stars(),
            price: r.price,
            address: r.address.clone(),
            location: r.location.clone(),
            cuisines: r.cuisine_tags().map(str::to_string).collect(),
            services: r.service_tags().map(str::to_string).collect(),
            description: r.description.clone(),
            url: r.url.clone(),
        }
    }
}

/// Valores para poblar los controles de la barra lateral
#[derive(Clone, Debug, Serialize)]
pub struct Options {
    pub prices: Vec<u8>,
    pub awards: Vec<Award>,
    pub cuisines: Vec<String>,
    pub services: Vec<String>,
    pub map_styles: Vec<&'static str>,
    pub default_view: MapViewState,
    pub snapshot_ts_utc: String,
}

#[derive(Clone)]
pub struct Controller {
    pub dataset: Arc<Dataset>,
    pub geocoder: Arc<dyn Geocoder>,
    pub zoom_damping: f64,
    pub top_n: usize,
}

impl Controller {
    pub fn new(dataset: Arc<Dataset>, geocoder: Arc<dyn Geocoder>, cfg: &AppCfg) -> Self {
        Self { dataset, geocoder, zoom_damping: cfg.zoom_damping, top_n: cfg.top_n }
    }

    pub fn options(&self) -> Options {
        Options {
            prices: vec![4, 3, 2, 1],
            awards: Award::ALL.to_vec(),
            cuisines: self.dataset.cuisine_options.clone(),
            services: self.dataset.service_options.clone(),
            map_styles: MAP_STYLES.to_vec(),
            default_view: MapViewState::default(),
            snapshot_ts_utc: self.dataset.snapshot_ts_utc.clone(),
        }
    }

    /// Figura inicial: todo el dataset con la vista por defecto
    pub fn initial_map(&self) -> MapFigure {
        let view = MapViewState::default();
        let rows: Vec<&RestaurantRecord> = self.dataset.rows.iter().collect();
        plots::build_map(&rows, view.zoom, view.center, &view.style)
    }

    /// Devuelve la actualización a aplicar y la nueva vista.
    /// Si falla el geocoding la vista del cliente no cambia (el error sube).
    pub async fn update_map(&self, event: MapEvent, view: &MapViewState) -> Result<(MapUpdate, MapViewState), GeoError> {
        match event {
            MapEvent::Filters(sel) => {
                let rows = sel.apply(&self.dataset.rows);
                debug!("filtros: {} de {} filas", rows.len(), self.dataset.rows.len());
                let fig = plots::build_map(&rows, view.zoom, view.center, &view.style);
                Ok((MapUpdate::Replace(fig), view.clone()))
            }
            MapEvent::Style(style) => {
                let patch = MapPatch { style: Some(style.clone()), ..Default::default() };
                Ok((MapUpdate::Patch(patch), MapViewState { style, ..view.clone() }))
            }
            MapEvent::Search(query) => {
                let place = self.geocoder.geocode(&query).await?;
                let bbox = place
                    .bbox
                    .ok_or_else(|| GeoError::LocationNotFound(format!("'{query}' sin caja envolvente")))?;
                let zoom = geocoding::zoom_for_bbox(&bbox)? * self.zoom_damping;
                info!("búsqueda '{query}' -> ({:.4}, {:.4}) zoom {zoom:.2}", place.lat, place.lon);
                Ok(self.center_patch(view, (place.lat, place.lon), Some(zoom)))
            }
            MapEvent::Geolocation { lat, lon } => {
                let place = self.geocoder.reverse_geocode(lat, lon).await?;
                let zoom = match place.bbox {
                    Some(bb) => Some(geocoding::zoom_for_bbox(&bb)? * self.zoom_damping),
                    None => None,
                };
                Ok(self.center_patch(view, (lat, lon), zoom))
            }
        }
    }

    fn center_patch(&self, view: &MapViewState, center: (f64, f64), zoom: Option<f64>) -> (MapUpdate, MapViewState) {
        let patch = MapPatch {
            style: None,
            center: Some(LatLon { lat: center.0, lon: center.1 }),
            zoom,
        };
        let next = MapViewState { center, zoom: zoom.unwrap_or(view.zoom), style: view.style.clone() };
        (MapUpdate::Patch(patch), next)
    }

    /// Texto que se escribe en el buscador (dirección completa)
    pub async fn resolve_location(&self, event: LocationEvent) -> Result<String, GeoError> {
        let place = match event {
            LocationEvent::Search(q) => self.geocoder.geocode(&q).await?,
            LocationEvent::Geolocation { lat, lon } => self.geocoder.reverse_geocode(lat, lon).await?,
        };
        Ok(place.address)
    }

    pub fn insights(&self, sel: &FilterSelection) -> Insights {
        let rows = sel.apply(&self.dataset.rows);
        let frequencies = plots::build_wordcloud(&rows);
        Insights {
            restaurants: rows.len(),
            bar: plots::build_bar(&rows, self.top_n),
            wordcloud: plots::render_wordcloud(&frequencies),
            frequencies,
        }
    }

    pub fn restaurant(&self, name: &str) -> Option<RestaurantDetail> {
        self.dataset.find_by_name(name).map(RestaurantDetail::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carga::build_dataset;
    use crate::models::types::{BBox, Place};
    use async_trait::async_trait;

    struct FakeGeocoder;

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn geocode(&self, query: &str) -> Result<Place, GeoError> {
            match query {
                "Lyon" => Ok(Place {
                    lat: 45.76,
                    lon: 4.83,
                    address: "Lyon, Rhône, France".into(),
                    bbox: Some(BBox { min_lat: 45.70, max_lat: 45.80, min_lon: 4.77, max_lon: 4.90 }),
                }),
                "Nowhere" => Ok(Place { lat: 0.0, lon: 0.0, address: "Nowhere".into(), bbox: None }),
                "down" => Err(GeoError::GeocodeUnavailable("timeout".into())),
                _ => Err(GeoError::LocationNotFound(query.into())),
            }
        }

        async fn reverse_geocode(&self, lat: f64, lon: f64) -> Result<Place, GeoError> {
            Ok(Place { lat, lon, address: format!("{lat}, {lon}"), bbox: None })
        }
    }

    fn rec(name: &str, price: u8, award: Award) -> RestaurantRecord {
        RestaurantRecord {
            name: name.into(),
            address: "1 rue".into(),
            location: "Lyon, France".into(),
            city: "Lyon".into(),
            cuisine: "French, Creative".into(),
            services: "Terrace".into(),
            price,
            award,
            award_size: award.size(),
            latitude: Some(45.76),
            longitude: Some(4.83),
            description: "desc".into(),
            url: "https://guide.michelin.com/x".into(),
        }
    }

    fn controller() -> Controller {
        let ds = build_dataset(vec![
            rec("Alpha", 4, Award::ThreeStars),
            rec("Beta", 2, Award::OneStar),
            rec("Gamma", 1, Award::BibGourmand),
        ]);
        Controller::new(Arc::new(ds), Arc::new(FakeGeocoder), &AppCfg::default())
    }

    #[tokio::test]
    async fn filters_rebuild_and_keep_view() {
        let c = controller();
        let view = MapViewState { center: (45.0, 4.0), zoom: 9.0, style: "dark".into() };
        let sel = FilterSelection {
            prices: vec![4, 2],
            awards: vec![Award::ThreeStars, Award::OneStar],
            ..Default::default()
        };
        let (upd, next) = c.update_map(MapEvent::Filters(sel), &view).await.unwrap();
        let MapUpdate::Replace(fig) = upd else { panic!("esperaba figura completa") };
        assert_eq!(fig.marker_count(), 2);
        assert_eq!(fig.layout.map.zoom, 9.0);
        assert_eq!(fig.layout.map.style, "dark");
        assert_eq!(next, view);
    }

    #[tokio::test]
    async fn style_is_a_patch() {
        let c = controller();
        let view = MapViewState::default();
        let (upd, next) = c.update_map(MapEvent::Style("satellite".into()), &view).await.unwrap();
        assert_eq!(upd, MapUpdate::Patch(MapPatch { style: Some("satellite".into()), ..Default::default() }));
        assert_eq!(next.style, "satellite");
        assert_eq!(next.center, view.center);

        let mut fig = c.initial_map();
        let MapUpdate::Patch(p) = upd else { unreachable!() };
        fig.apply_patch(&p);
        assert_eq!(fig.layout.map.style, "satellite");
        assert_eq!(fig.marker_count(), 3);
    }

    #[tokio::test]
    async fn search_moves_center_and_damps_zoom() {
        let c = controller();
        let (upd, next) = c.update_map(MapEvent::Search("Lyon".into()), &MapViewState::default()).await.unwrap();
        let MapUpdate::Patch(p) = upd else { panic!("esperaba parche") };
        assert!(p.style.is_none());
        assert_eq!(p.center, Some(LatLon { lat: 45.76, lon: 4.83 }));

        let raw = geocoding::zoom_for_bbox(&BBox { min_lat: 45.70, max_lat: 45.80, min_lon: 4.77, max_lon: 4.90 }).unwrap();
        assert!((next.zoom - raw * 0.85).abs() < 1e-9);
        assert_eq!(next.style, "basic");
    }

    #[tokio::test]
    async fn search_failures_surface_as_geo_errors() {
        let c = controller();
        let view = MapViewState::default();
        assert!(matches!(
            c.update_map(MapEvent::Search("Atlantis".into()), &view).await,
            Err(GeoError::LocationNotFound(_))
        ));
        assert!(matches!(
            c.update_map(MapEvent::Search("Nowhere".into()), &view).await,
            Err(GeoError::LocationNotFound(_))
        ));
        assert!(matches!(
            c.update_map(MapEvent::Search("down".into()), &view).await,
            Err(GeoError::GeocodeUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn geolocation_centers_without_bbox_zoom() {
        let c = controller();
        let view = MapViewState::default();
        let (_, next) = c.update_map(MapEvent::Geolocation { lat: 43.7, lon: 7.26 }, &view).await.unwrap();
        assert_eq!(next.center, (43.7, 7.26));
        assert_eq!(next.zoom, view.zoom);
    }

    #[tokio::test]
    async fn location_text_comes_from_geocoder() {
        let c = controller();
        assert_eq!(c.resolve_location(LocationEvent::Search("Lyon".into())).await.unwrap(), "Lyon, Rhône, France");
        assert_eq!(
            c.resolve_location(LocationEvent::Geolocation { lat: 1.5, lon: 2.5 }).await.unwrap(),
            "1.5, 2.5"
        );
    }

    #[test]
    fn zoom_for_location_uses_the_bbox() {
        let z = tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(geocoding::zoom_for_location(&FakeGeocoder, "Lyon"))
            .unwrap();
        assert!(z > 7.0 && z < 14.0);
    }

    #[test]
    fn insights_and_detail() {
        let c = controller();
        let ins = c.insights(&FilterSelection::default());
        assert_eq!(ins.restaurants, 3);
        assert_eq!(ins.bar.cities(), vec!["Lyon"]);
        assert_eq!(ins.frequencies.get("french"), Some(3));

        let d = c.restaurant("Alpha").unwrap();
        assert_eq!(d.stars, 3);
        assert_eq!(d.cuisines, vec!["French", "Creative"]);
        assert!(c.restaurant("Omega").is_none());
    }
}
