//! filtros.rs
//! Filtros de la barra lateral sobre el dataset.
//!
//! precio ∈ prices  Y  award ∈ awards  Y  (cocinas vacío O algún tag en cocinas)
//! Y (servicios vacío O algún tag en servicios). Orden del dataset, sin copias.

use crate::models::types::{Award, FilterSelection, RestaurantRecord};

pub fn apply_filters<'a, S: AsRef<str>>(
    rows: &'a [RestaurantRecord],
    prices: &[u8],
    awards: &[Award],
    cuisines: &[S],
    services: &[S],
) -> Vec<&'a RestaurantRecord> {
    rows.iter()
        .filter(|r| prices.contains(&r.price))
        .filter(|r| awards.contains(&r.award))
        .filter(|r| any_tag_in(r.cuisine_tags(), cuisines))
        .filter(|r| any_tag_in(r.service_tags(), services))
        .collect()
}

#[inline]
fn any_tag_in<'t, S: AsRef<str>>(mut tags: impl Iterator<Item = &'t str>, wanted: &[S]) -> bool {
    wanted.is_empty() || tags.any(|t| wanted.iter().any(|w| w.as_ref() == t))
}

impl FilterSelection {
    pub fn apply<'a>(&self, rows: &'a [RestaurantRecord]) -> Vec<&'a RestaurantRecord> {
        apply_filters(rows, &self.prices, &self.awards, &self.cuisines, &self.services)
    }
}
