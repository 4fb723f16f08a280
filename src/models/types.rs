//! types.rs
//! Modelos de datos compartidos por el servicio: filas del dataset Michelin,
//! selecciones de filtros, estado del mapa, resultados de geocoding y configuración

use serde::{Deserialize, Serialize};
use std::fmt;

// -------------------------------
// Categoría Michelin
// -------------------------------
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Award {
    #[serde(rename = "3 Stars")]
    ThreeStars,
    #[serde(rename = "2 Stars")]
    TwoStars,
    #[serde(rename = "1 Star")]
    OneStar,
    #[serde(rename = "Bib Gourmand")]
    BibGourmand,
    #[serde(rename = "Selected Restaurants")]
    Selected,
}

impl Award {
    /// Orden de leyenda: de 3 estrellas a "Selected Restaurants"
    pub const ALL: [Award; 5] = [
        Award::ThreeStars,
        Award::TwoStars,
        Award::OneStar,
        Award::BibGourmand,
        Award::Selected,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Award::ThreeStars => "3 Stars",
            Award::TwoStars => "2 Stars",
            Award::OneStar => "1 Star",
            Award::BibGourmand => "Bib Gourmand",
            Award::Selected => "Selected Restaurants",
        }
    }

    /// Cualquier etiqueta desconocida cae en `Selected` (el "else" del dataset)
    pub fn from_label(s: &str) -> Award {
        match s.trim() {
            "3 Stars" => Award::ThreeStars,
            "2 Stars" => Award::TwoStars,
            "1 Star" => Award::OneStar,
            "Bib Gourmand" => Award::BibGourmand,
            _ => Award::Selected,
        }
    }

    /// Tamaño de marcador en el mapa
    pub fn size(self) -> u32 {
        match self {
            Award::ThreeStars => 30,
            Award::TwoStars => 15,
            Award::OneStar => 10,
            Award::BibGourmand => 5,
            Award::Selected => 2,
        }
    }

    pub fn stars(self) -> u8 {
        match self {
            Award::ThreeStars => 3,
            Award::TwoStars => 2,
            Award::OneStar => 1,
            _ => 0,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Award::ThreeStars => "#636efa",
            Award::TwoStars => "#ef553b",
            Award::OneStar => "#00cc96",
            Award::BibGourmand => "#ab63fa",
            Award::Selected => "#ffa15a",
        }
    }
}

impl fmt::Display for Award {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fila cruda del CSV (columnas tal cual vienen en michelin_by_Jerry_Ng.csv)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MichelinRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Address")]
    pub address: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Cuisine")]
    pub cuisine: String,
    #[serde(rename = "Longitude", deserialize_with = "csv::invalid_option")]
    pub longitude: Option<f64>,
    #[serde(rename = "Latitude", deserialize_with = "csv::invalid_option")]
    pub latitude: Option<f64>,
    #[serde(rename = "Url")]
    pub url: String,
    #[serde(rename = "Award")]
    pub award: String,
    #[serde(rename = "FacilitiesAndServices")]
    pub facilities_and_services: String,
    #[serde(rename = "Description")]
    pub description: String,
}

/// Restaurante ya normalizado (city, tier de precio y award_size derivados)
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RestaurantRecord {
    pub name: String,
    pub address: String,
    pub location: String,
    pub city: String,
    pub cuisine: String,
    pub services: String,
    /// 1..=4
    pub price: u8,
    pub award: Award,
    pub award_size: u32,
    /// `None` si el CSV no trae coordenadas legibles: la fila no se pinta en el mapa
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: String,
    pub url: String,
}

impl RestaurantRecord {
    pub fn cuisine_tags(&self) -> impl Iterator<Item = &str> {
        split_tags(&self.cuisine)
    }

    pub fn service_tags(&self) -> impl Iterator<Item = &str> {
        split_tags(&self.services)
    }

    /// (lat, lon) sólo si ambas coordenadas existen
    pub fn position(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Separa "French, Seafood" en tags limpios; vacíos fuera
pub fn split_tags(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Dataset en memoria: inmutable tras la carga, compartido con `Arc`
#[derive(Clone, Debug, Default, Serialize)]
pub struct Dataset {
    pub rows: Vec<RestaurantRecord>,
    /// Tags distintos de cocina (orden de primera aparición)
    pub cuisine_options: Vec<String>,
    /// Tags distintos de servicios (orden de primera aparición)
    pub service_options: Vec<String>,
    pub snapshot_ts_utc: String,
}

impl Dataset {
    pub fn find_by_name(&self, name: &str) -> Option<&RestaurantRecord> {
        self.rows.iter().find(|r| r.name == name)
    }
}

/// Selección de filtros de la barra lateral
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    pub prices: Vec<u8>,
    pub awards: Vec<Award>,
    /// Vacío = sin restricción
    pub cuisines: Vec<String>,
    /// Vacío = sin restricción
    pub services: Vec<String>,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            prices: vec![4, 3, 2, 1],
            awards: Award::ALL.to_vec(),
            cuisines: Vec::new(),
            services: Vec::new(),
        }
    }
}

/// Centro/zoom/estilo actuales del mapa; lo guarda el cliente
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapViewState {
    /// (lat, lon)
    pub center: (f64, f64),
    pub zoom: f64,
    pub style: String,
}

impl Default for MapViewState {
    fn default() -> Self {
        Self { center: (47.6, 2.5), zoom: 4.0, style: "basic".into() }
    }
}

/// Caja envolvente devuelta por el geocoder (grados)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Resultado de geocoding (directo o inverso)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub lat: f64,
    pub lon: f64,
    pub address: String,
    pub bbox: Option<BBox>,
}

#[derive(Clone, Debug)]
pub struct AppCfg {
    /// Dirección/puerto del servidor HTTP (Axum)
    pub bind: String,

    /// CSV del dataset: URL http(s) o ruta local
    pub data_source: String,

    /// Endpoint base compatible con Nominatim
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout_s: u64,

    /// Factor aplicado al zoom calculado tras una búsqueda
    pub zoom_damping: f64,

    /// Ciudades en el gráfico de barras
    pub top_n: usize,

    /// Directorio de estáticos del front
    pub web_dir: String,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8050".into(),
            data_source: "https://raw.githubusercontent.com/plotly/datasets/master/michelin_by_Jerry_Ng.csv".into(),
            geocoder_url: "https://nominatim.openstreetmap.org".into(),
            geocoder_user_agent: "maps".into(),
            geocoder_timeout_s: 10,
            zoom_damping: 0.85,
            top_n: 10,
            web_dir: "web".into(),
        }
    }
}

/// Estilos de mapa base que acepta el front (plotly tile map)
pub const MAP_STYLES: [&str; 14] = [
    "basic",
    "carto-darkmatter",
    "carto-darkmatter-nolabels",
    "carto-positron",
    "carto-positron-nolabels",
    "carto-voyager",
    "carto-voyager-nolabels",
    "dark",
    "light",
    "open-street-map",
    "outdoors",
    "satellite",
    "satellite-streets",
    "streets",
];
