//! carga.rs
//!
//! Carga del CSV de la Guía Michelin y normalización de columnas.
//!
//! - `City` = texto antes de la primera coma de `Location`
//! - `Price` = nº de símbolos de moneda ("€€€" -> 3), acotado a 1..=4
//! - `award_size` = tamaño de marcador según la categoría
//!
//! Se ejecuta una sola vez al arrancar; el `Dataset` resultante es inmutable.

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::models::types::{Award, Dataset, MichelinRow, RestaurantRecord};
use crate::server::fetch;

/// Descarga (http/https) o lee de disco el CSV y lo normaliza
pub async fn load_dataset(client: &Client, source: &str) -> Result<Dataset> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        fetch::get_bytes(client, source)
            .await
            .with_context(|| format!("descargando dataset {source}"))?
            .to_vec()
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("leyendo dataset {source}"))?
    };
    anyhow::ensure!(!bytes.is_empty(), "dataset {source} vacío");
    let ds = parse_michelin_csv(&bytes)?;
    info!(
        "Dataset cargado: {} restaurantes, {} cocinas, {} servicios",
        ds.rows.len(),
        ds.cuisine_options.len(),
        ds.service_options.len()
    );
    Ok(ds)
}

pub fn parse_michelin_csv(raw: &[u8]) -> Result<Dataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(raw);
    rdr.headers().context("CSV sin cabecera")?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (i, rec) in rdr.deserialize::<MichelinRow>().enumerate() {
        match rec {
            Ok(r) => rows.push(normalize(r)),
            Err(e) => {
                warn!("fila {}: {e}", i + 2);
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        warn!("{skipped} filas ilegibles descartadas");
    }
    let unplaced = rows.iter().filter(|r| r.position().is_none()).count();
    if unplaced > 0 {
        warn!("{unplaced} restaurantes sin coordenadas: no aparecerán en el mapa");
    }
    Ok(build_dataset(rows))
}

/// Calcula las opciones de los desplegables sobre el dataset completo
pub fn build_dataset(rows: Vec<RestaurantRecord>) -> Dataset {
    let mut cuisine_options: Vec<String> = Vec::new();
    let mut service_options: Vec<String> = Vec::new();
    for r in &rows {
        for t in r.cuisine_tags() {
            if !cuisine_options.iter().any(|o| o == t) { cuisine_options.push(t.to_string()); }
        }
        for t in r.service_tags() {
            if !service_options.iter().any(|o| o == t) { service_options.push(t.to_string()); }
        }
    }
    Dataset {
        rows,
        cuisine_options,
        service_options,
        snapshot_ts_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

/// Fila cruda -> registro. Sin coordenadas la fila se conserva (barras,
/// nube de palabras y ficha la usan); sólo el mapa la ignora.
pub fn normalize(row: MichelinRow) -> RestaurantRecord {
    let (lat, lon) = match (row.latitude, row.longitude) {
        (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => (Some(lat), Some(lon)),
        _ => {
            debug!("'{}' sin coordenadas válidas", row.name);
            (None, None)
        }
    };
    let award = Award::from_label(&row.award);
    RestaurantRecord {
        city: city_of(&row.location),
        price: price_tier(&row.price),
        award,
        award_size: award.size(),
        latitude: lat,
        longitude: lon,
        cuisine: clean_tag_field(row.cuisine),
        services: clean_tag_field(row.facilities_and_services),
        name: row.name,
        address: row.address,
        location: row.location,
        description: row.description,
        url: row.url,
    }
}

pub fn city_of(location: &str) -> String {
    location.split(',').next().unwrap_or("").trim().to_string()
}

/// Nº de símbolos acotado a 1..=4. Un precio vacío cuenta como tier 1 para
/// que toda fila tenga tier y la selección completa devuelva la tabla entera.
pub fn price_tier(price: &str) -> u8 {
    let n = price.trim().chars().count();
    n.clamp(1, 4) as u8
}

// pandas convierte los vacíos en "nan"; aquí un campo ausente es simplemente sin tags
fn clean_tag_field(s: String) -> String {
    if s.trim().eq_ignore_ascii_case("nan") { String::new() } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Name,Address,Location,Price,Cuisine,Longitude,Latitude,PhoneNumber,Url,WebsiteUrl,Award,FacilitiesAndServices,Description
Le Bernardin,155 W 51st St,\"New York, USA\",$$$$,\"Seafood, French\",-73.98,40.76,,https://guide.michelin.com/a,,3 Stars,\"Air conditioning,Wheelchair access\",Fish
Paul Bocuse,40 quai,\"Lyon, France\",€€€€,Classic Cuisine,4.84,45.81,,https://guide.michelin.com/b,,3 Stars,,Legend
Broken,nowhere,\"Nowhere, Land\",€,Modern,,,,,,1 Star,,No coords
Chez Nous,1 rue,\"Lyon, France\",€,\"Traditional Cuisine\",4.83,45.76,,https://guide.michelin.com/c,,Unknown,Terrace,Bistro
";

    #[test]
    fn parses_and_derives_columns() {
        let ds = parse_michelin_csv(CSV.as_bytes()).unwrap();
        assert_eq!(ds.rows.len(), 4);

        let lb = &ds.rows[0];
        assert_eq!(lb.city, "New York");
        assert_eq!(lb.price, 4);
        assert_eq!(lb.award, Award::ThreeStars);
        assert_eq!(lb.award_size, 30);

        let chez = &ds.rows[3];
        assert_eq!(chez.award, Award::Selected);
        assert_eq!(chez.award_size, 2);
        assert_eq!(chez.price, 1);
    }

    #[test]
    fn missing_tags_are_empty_not_fatal() {
        let ds = parse_michelin_csv(CSV.as_bytes()).unwrap();
        assert_eq!(ds.rows[1].service_tags().count(), 0);
    }

    #[test]
    fn options_are_distinct_observed_tags() {
        let ds = parse_michelin_csv(CSV.as_bytes()).unwrap();
        assert_eq!(
            ds.cuisine_options,
            vec!["Seafood", "French", "Classic Cuisine", "Modern", "Traditional Cuisine"]
        );
        assert_eq!(ds.service_options, vec!["Air conditioning", "Wheelchair access", "Terrace"]);
    }

    #[test]
    fn price_tier_counts_symbols() {
        assert_eq!(price_tier("€€"), 2);
        assert_eq!(price_tier("¥¥¥"), 3);
        assert_eq!(price_tier("$$$$$"), 4);
        assert_eq!(price_tier(""), 1);
    }

    #[test]
    fn nan_fields_become_empty() {
        let row = MichelinRow {
            name: "X".into(),
            latitude: Some(1.0),
            longitude: Some(2.0),
            cuisine: "nan".into(),
            ..Default::default()
        };
        let r = normalize(row);
        assert!(r.cuisine.is_empty());
        assert_eq!(r.city, "");
    }

    #[test]
    fn rows_without_coordinates_stay_in_the_dataset() {
        let ds = parse_michelin_csv(CSV.as_bytes()).unwrap();
        let broken = ds.find_by_name("Broken").unwrap();
        assert_eq!(broken.position(), None);
        assert_eq!(broken.city, "Nowhere");
        assert_eq!(broken.award, Award::OneStar);
        assert_eq!(ds.rows[0].position(), Some((40.76, -73.98)));
    }

    #[test]
    fn empty_price_is_tier_one_and_passes_full_selection() {
        let row = MichelinRow {
            name: "Sin precio".into(),
            latitude: Some(1.0),
            longitude: Some(2.0),
            award: "1 Star".into(),
            ..Default::default()
        };
        let ds = build_dataset(vec![normalize(row)]);
        assert_eq!(ds.rows[0].price, 1);
        assert_eq!(crate::models::types::FilterSelection::default().apply(&ds.rows).len(), 1);
    }
}
