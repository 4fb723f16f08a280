//! api.rs — Rutas HTTP: /health, /options, /map, /insights, /location y /restaurants/:name

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, services::ServeDir};
use tracing::warn;

use crate::controller::{Controller, Insights, LocationEvent, MapEvent, MapUpdate, Options, RestaurantDetail};
use crate::error::{ApiError, ApiResult};
use crate::models::figures::MapFigure;
use crate::models::types::{FilterSelection, MapViewState};

#[derive(Clone)]
pub struct ApiState {
    pub ctl: Controller,
}

pub fn router(state: ApiState, web_dir: &str) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/options", get(get_options))
        .route("/map", get(get_initial_map).post(post_map_event))
        .route("/insights", post(post_insights))
        .route("/location", post(post_location))
        .route("/restaurants/:name", get(get_restaurant))
        .fallback_service(ServeDir::new(web_dir))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
}

async fn get_options(State(st): State<ApiState>) -> Json<Options> {
    Json(st.ctl.options())
}

#[derive(Serialize)]
struct InitialMap {
    figure: MapFigure,
    view: MapViewState,
}

async fn get_initial_map(State(st): State<ApiState>) -> Json<InitialMap> {
    Json(InitialMap { figure: st.ctl.initial_map(), view: MapViewState::default() })
}

/// Cuerpo de /map: qué cambió + vista actual del cliente
#[derive(Debug, Deserialize)]
pub struct MapRequest {
    pub event: MapEvent,
    #[serde(default)]
    pub view: MapViewState,
}

#[derive(Debug, Serialize)]
pub struct MapResponse {
    pub update: MapUpdate,
    pub view: MapViewState,
}

/// Un fallo de geocoding no es fatal: se devuelve el error junto a la vista sin cambios
async fn post_map_event(State(st): State<ApiState>, Json(req): Json<MapRequest>) -> Response {
    match st.ctl.update_map(req.event, &req.view).await {
        Ok((update, view)) => Json(MapResponse { update, view }).into_response(),
        Err(e) => {
            warn!("map: {e}");
            let err = ApiError::from(e);
            let body = json!({ "error": err.code(), "message": err.to_string(), "view": req.view });
            (err.status(), Json(body)).into_response()
        }
    }
}

async fn post_insights(State(st): State<ApiState>, Json(sel): Json<FilterSelection>) -> Json<Insights> {
    Json(st.ctl.insights(&sel))
}

#[derive(Serialize)]
struct LocationResp {
    address: String,
}

async fn post_location(State(st): State<ApiState>, Json(ev): Json<LocationEvent>) -> ApiResult<Json<LocationResp>> {
    if let LocationEvent::Search(q) = &ev {
        if q.trim().is_empty() {
            return Err(ApiError::BadRequest("búsqueda vacía".into()));
        }
    }
    let address = st.ctl.resolve_location(ev).await?;
    Ok(Json(LocationResp { address }))
}

async fn get_restaurant(State(st): State<ApiState>, Path(name): Path<String>) -> ApiResult<Json<RestaurantDetail>> {
    st.ctl
        .restaurant(&name)
        .map(Json)
        .ok_or(ApiError::NotFound(name))
}
