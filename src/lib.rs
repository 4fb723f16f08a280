//! Servicio del mapa de la Guía Michelin: carga del dataset, filtros,
//! geocoding y figuras declarativas servidas por HTTP.

pub mod carga;
pub mod controller;
pub mod error;
pub mod filtros;
pub mod geocoding;
pub mod models;
pub mod plots;
pub mod server;
