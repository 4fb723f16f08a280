//! plots.rs
//!
//! Constructores de figuras, todos funciones puras sobre filas ya filtradas:
//! - `build_map`: mapa de dispersión, una traza por categoría Michelin
//! - `build_bar`: top-N ciudades con barras horizontales apiladas por categoría
//! - `build_wordcloud` / `render_wordcloud`: frecuencias de tipos de cocina
//!
//! Con cero filas devuelven figuras vacías, nunca error.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

use crate::models::figures::{
    BarFigure, BarLayout, BarMarker, BarTrace, CategoryAxis, CloudLayout, CloudWord, LatLon, Legend,
    MapFigure, MapLayout, MapMarker, MapSettings, MapTrace, Title, WordCount, WordFrequencies,
    WordcloudFigure,
};
use crate::models::types::{Award, RestaurantRecord};

// -------------------------------
// Mapa
// -------------------------------
pub fn build_map(rows: &[&RestaurantRecord], zoom: f64, center: (f64, f64), style: &str) -> MapFigure {
    let mut data = Vec::new();
    for award in Award::ALL {
        // sin coordenadas no hay marcador
        let group: Vec<(&RestaurantRecord, (f64, f64))> = rows
            .iter()
            .filter(|r| r.award == award)
            .filter_map(|r| r.position().map(|p| (*r, p)))
            .collect();
        if group.is_empty() { continue; }
        data.push(MapTrace {
            kind: "scattermap".into(),
            name: award.label().into(),
            lat: group.iter().map(|(_, (lat, _))| *lat).collect(),
            lon: group.iter().map(|(_, (_, lon))| *lon).collect(),
            customdata: group.iter().map(|(r, _)| r.name.clone()).collect(),
            marker: MapMarker {
                color: award.color().into(),
                size: group.iter().map(|(r, _)| r.award_size).collect(),
                sizemode: "area".into(),
            },
        });
    }
    MapFigure {
        data,
        layout: MapLayout {
            map: MapSettings {
                style: style.into(),
                center: LatLon { lat: center.0, lon: center.1 },
                zoom,
            },
            legend: Legend::top_left(),
        },
    }
}

// -------------------------------
// Barras: top-N ciudades
// -------------------------------
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CityTotal {
    pub city: String,
    pub total: u32,
    pub by_award: HashMap<Award, u32>,
}

/// Agrupa por (ciudad, categoría) y ordena por total desc.
/// Empates: orden de primera aparición en `rows`.
pub fn rank_cities(rows: &[&RestaurantRecord]) -> Vec<CityTotal> {
    let mut idx: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<CityTotal> = Vec::new();
    for r in rows {
        let i = *idx.entry(r.city.as_str()).or_insert_with(|| {
            out.push(CityTotal { city: r.city.clone(), total: 0, by_award: HashMap::new() });
            out.len() - 1
        });
        let c = &mut out[i];
        c.total += 1;
        *c.by_award.entry(r.award).or_insert(0) += 1;
    }
    // sort_by es estable: los empates conservan la primera aparición
    out.sort_by(|a, b| b.total.cmp(&a.total));
    out
}

pub fn build_bar(rows: &[&RestaurantRecord], n: usize) -> BarFigure {
    let mut ranked = rank_cities(rows);
    ranked.truncate(n);

    let mut data = Vec::new();
    for award in Award::ALL {
        let (y, x): (Vec<String>, Vec<u32>) = ranked
            .iter()
            .filter_map(|c| c.by_award.get(&award).map(|k| (c.city.clone(), *k)))
            .unzip();
        if y.is_empty() { continue; }
        data.push(BarTrace {
            kind: "bar".into(),
            name: award.label().into(),
            orientation: "h".into(),
            x,
            y,
            marker: BarMarker { color: award.color().into() },
        });
    }

    BarFigure {
        data,
        layout: BarLayout {
            title: Title::with_subtitle(
                "<b>Cities</b>",
                &format!("Top {n} cities with most restaurants in the Michelin guide"),
            ),
            barmode: "stack".into(),
            legend: Legend::bottom_right(),
            yaxis: CategoryAxis { categoryorder: "total ascending".into() },
            plot_bgcolor: "rgba(0, 0, 0, 0)".into(),
            paper_bgcolor: "rgba(0, 0, 0, 0)".into(),
        },
    }
}

// -------------------------------
// Nube de palabras
// -------------------------------
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["a", "the", "an", "to", "in", "for", "of", "or", "by", "with", "is", "on", "that", "be"]
        .into_iter()
        .collect()
});

/// Cómo se descartan las stop words
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StopWordMatch {
    /// El tag limpio (trim + minúsculas) es exactamente una stop word
    #[default]
    Exact,
    /// Comportamiento del dashboard antiguo: el trozo crudo entre comas, sin
    /// trim y distinguiendo mayúsculas, empieza por una stop word. "also" cae
    /// por "a"; "American" y " Organic" se quedan.
    Prefix,
}

fn is_stop_word(raw: &str, token: &str, mode: StopWordMatch) -> bool {
    match mode {
        StopWordMatch::Exact => STOP_WORDS.contains(token),
        StopWordMatch::Prefix => STOP_WORDS.iter().any(|w| raw.starts_with(w)),
    }
}

pub fn build_wordcloud(rows: &[&RestaurantRecord]) -> WordFrequencies {
    build_wordcloud_with(rows, StopWordMatch::Exact)
}

pub fn build_wordcloud_with(rows: &[&RestaurantRecord], mode: StopWordMatch) -> WordFrequencies {
    let mut idx: HashMap<String, usize> = HashMap::new();
    let mut words: Vec<WordCount> = Vec::new();
    for r in rows {
        for raw in r.cuisine.split(',') {
            let token = raw.trim().to_lowercase();
            if token.is_empty() || is_stop_word(raw, &token, mode) { continue; }
            match idx.get(&token) {
                Some(&i) => words[i].count += 1,
                None => {
                    idx.insert(token.clone(), words.len());
                    words.push(WordCount { word: token, count: 1 });
                }
            }
        }
    }
    WordFrequencies { words }
}

const MAX_WORDS: usize = 1000;
const MIN_FONT: f64 = 10.0;
const MAX_FONT: f64 = 80.0;

/// Tamaño de letra lineal con la frecuencia; la colocación la hace el front
pub fn render_wordcloud(freqs: &WordFrequencies) -> WordcloudFigure {
    let mut sorted: Vec<&WordCount> = freqs.words.iter().collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    sorted.truncate(MAX_WORDS);

    let hi = sorted.first().map(|w| w.count).unwrap_or(0);
    let lo = sorted.last().map(|w| w.count).unwrap_or(0);
    let words = sorted
        .into_iter()
        .map(|w| {
            let font_size = if hi == lo {
                MAX_FONT
            } else {
                MIN_FONT + (MAX_FONT - MIN_FONT) * f64::from(w.count - lo) / f64::from(hi - lo)
            };
            CloudWord { text: w.word.clone(), weight: w.count, font_size }
        })
        .collect();

    WordcloudFigure {
        words,
        layout: CloudLayout {
            title: Title::with_subtitle(
                "<b>Wordcloud</b>",
                "Word cloud of the descriptions of the cuisine of the restaurants",
            ),
            width: 1200,
            height: 300,
            scale: 3,
            background_color: "white".into(),
        },
    }
}
