use axum::{
    extract::{Path, State},
    Extension, Json,
};
use dlvfee_core::{Coordinate, DeliverySettings, StoreConfig};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct StoreSummaryItem {
    pub slug: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub max_distance_km: f64,
    pub free_threshold: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub(super) struct StoreDetail {
    pub slug: String,
    pub name: String,
    pub location: Coordinate,
    pub delivery: DeliverySettings,
    pub notes: Option<String>,
}

impl From<&StoreConfig> for StoreSummaryItem {
    fn from(store: &StoreConfig) -> Self {
        Self {
            slug: store.slug(),
            name: store.name.clone(),
            lat: store.location.lat(),
            lng: store.location.lng(),
            max_distance_km: store.delivery.max_distance_km(),
            free_threshold: store.delivery.free_delivery().threshold(),
        }
    }
}

pub(super) async fn list_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<StoreSummaryItem>>> {
    let data = state
        .stores
        .stores
        .iter()
        .map(StoreSummaryItem::from)
        .collect();

    Json(ApiResponse::new(data, req_id.0))
}

pub(super) async fn get_store(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<StoreDetail>>, ApiError> {
    let Some(store) = state.stores.find(&slug) else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("store '{slug}' not found"),
        ));
    };

    let data = StoreDetail {
        slug: store.slug(),
        name: store.name.clone(),
        location: store.location,
        delivery: store.delivery.clone(),
        notes: store.notes.clone(),
    };

    Ok(Json(ApiResponse::new(data, req_id.0)))
}
