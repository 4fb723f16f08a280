//! figures.rs
//! Descripciones declarativas de figuras (formato plotly) que el front pinta tal cual.
//! El servicio nunca renderiza: sólo construye y parchea estos JSON.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub x: f64,
    pub y: f64,
    pub xanchor: String,
    pub yanchor: String,
}

impl Legend {
    /// Esquina superior izquierda, dentro del área del mapa
    pub fn top_left() -> Self {
        Self { x: 0.01, y: 0.99, xanchor: "left".into(), yanchor: "top".into() }
    }

    pub fn bottom_right() -> Self {
        Self { x: 0.99, y: 0.01, xanchor: "right".into(), yanchor: "bottom".into() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub color: String,
    pub size: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subtitle {
    pub text: String,
    pub font: Font,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
    pub subtitle: Subtitle,
}

impl Title {
    pub fn with_subtitle(text: &str, subtitle: &str) -> Self {
        Self {
            text: text.into(),
            subtitle: Subtitle {
                text: subtitle.into(),
                font: Font { color: "gray".into(), size: 13 },
            },
        }
    }
}

// -------------------------------
// Mapa de dispersión
// -------------------------------
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub color: String,
    pub size: Vec<u32>,
    pub sizemode: String,
}

/// Una traza por categoría Michelin
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapTrace {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    /// Nombre del restaurante: identificador opaco para el click
    pub customdata: Vec<String>,
    pub marker: MapMarker,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    pub style: String,
    pub center: LatLon,
    pub zoom: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapLayout {
    pub map: MapSettings,
    pub legend: Legend,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapFigure {
    pub data: Vec<MapTrace>,
    pub layout: MapLayout,
}

/// Parche parcial sobre una figura de mapa existente (sin reconstruir trazas)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<LatLon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f64>,
}

impl MapFigure {
    pub fn apply_patch(&mut self, patch: &MapPatch) {
        if let Some(style) = &patch.style { self.layout.map.style = style.clone(); }
        if let Some(center) = &patch.center { self.layout.map.center = center.clone(); }
        if let Some(zoom) = patch.zoom { self.layout.map.zoom = zoom; }
    }

    pub fn marker_count(&self) -> usize {
        self.data.iter().map(|t| t.customdata.len()).sum()
    }
}

// -------------------------------
// Barras horizontales apiladas
// -------------------------------
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarMarker {
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarTrace {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub orientation: String,
    /// Conteo por ciudad
    pub x: Vec<u32>,
    /// Ciudades
    pub y: Vec<String>,
    pub marker: BarMarker,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryAxis {
    pub categoryorder: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarLayout {
    pub title: Title,
    pub barmode: String,
    pub legend: Legend,
    pub yaxis: CategoryAxis,
    pub plot_bgcolor: String,
    pub paper_bgcolor: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarFigure {
    pub data: Vec<BarTrace>,
    pub layout: BarLayout,
}

impl BarFigure {
    /// Ciudades distintas presentes en las trazas
    pub fn cities(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for t in &self.data {
            for c in &t.y {
                if !out.contains(c) { out.push(c.clone()); }
            }
        }
        out
    }
}

// -------------------------------
// Nube de palabras
// -------------------------------
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: u32,
}

/// Tabla de frecuencias (orden de primera aparición)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFrequencies {
    pub words: Vec<WordCount>,
}

impl WordFrequencies {
    pub fn get(&self, word: &str) -> Option<u32> {
        self.words.iter().find(|w| w.word == word).map(|w| w.count)
    }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CloudWord {
    pub text: String,
    pub weight: u32,
    pub font_size: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CloudLayout {
    pub title: Title,
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub background_color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordcloudFigure {
    pub words: Vec<CloudWord>,
    pub layout: CloudLayout,
}
