use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use dlvfee_core::{
    calculate_delivery_fee, legacy_quote, Coordinate, DeliveryFeeResult, DeliverySettings,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct StoreQuoteRequest {
    pub customer_lat: f64,
    pub customer_lng: f64,
    pub order_amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub(super) struct QuoteRequest {
    pub store_lat: f64,
    pub store_lng: f64,
    pub customer_lat: f64,
    pub customer_lng: f64,
    pub order_amount: Decimal,
    pub settings: DeliverySettings,
}

#[derive(Debug, Deserialize)]
pub(super) struct DistanceQuery {
    pub from_lat: f64,
    pub from_lng: f64,
    pub to_lat: f64,
    pub to_lng: f64,
}

#[derive(Debug, Serialize)]
pub(super) struct DistanceData {
    pub distance_km: f64,
}

fn require_non_negative(req_id: &RequestId, order_amount: Decimal) -> Result<(), ApiError> {
    if order_amount < Decimal::ZERO {
        return Err(ApiError::validation(
            req_id.0.clone(),
            format!("order_amount must not be negative, got {order_amount}"),
        ));
    }
    Ok(())
}

/// Quote a delivery from a registered store to a customer.
pub(super) async fn quote_store_delivery_fee(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
    body: Result<Json<StoreQuoteRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<DeliveryFeeResult>>, ApiError> {
    let Some(store) = state.stores.find(&slug) else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("store '{slug}' not found"),
        ));
    };
    let Json(body) = body.map_err(|e| ApiError::validation(req_id.0.clone(), e.body_text()))?;

    require_non_negative(&req_id, body.order_amount)?;
    let customer = Coordinate::new(body.customer_lat, body.customer_lng)
        .map_err(|e| ApiError::validation(req_id.0.clone(), e.to_string()))?;

    let result = if state.legacy_fee_rollback {
        legacy_quote(body.order_amount, store.location.distance_to(&customer))
    } else {
        store
            .policy()
            .quote(&store.location, &customer, body.order_amount)
    };

    tracing::info!(
        store = %slug,
        distance_km = result.distance_km,
        delivery_fee = %result.delivery_fee,
        deliverable = result.is_deliverable(),
        "quoted store delivery fee"
    );

    Ok(Json(ApiResponse::new(result, req_id.0)))
}

/// Quote a delivery with caller-supplied settings, e.g. a console preview of
/// unsaved policy changes.
pub(super) async fn quote_delivery_fee(
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<DeliveryFeeResult>>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::validation(req_id.0.clone(), e.body_text()))?;

    require_non_negative(&req_id, body.order_amount)?;
    let result = calculate_delivery_fee(
        body.store_lat,
        body.store_lng,
        body.customer_lat,
        body.customer_lng,
        body.order_amount,
        &body.settings,
    )
    .map_err(|e| ApiError::validation(req_id.0.clone(), e.to_string()))?;

    tracing::debug!(
        distance_km = result.distance_km,
        delivery_fee = %result.delivery_fee,
        "quoted ad-hoc delivery fee"
    );

    Ok(Json(ApiResponse::new(result, req_id.0)))
}

pub(super) async fn distance(
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<DistanceQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<DistanceData>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::validation(req_id.0.clone(), e.body_text()))?;

    let from = Coordinate::new(query.from_lat, query.from_lng)
        .map_err(|e| ApiError::validation(req_id.0.clone(), e.to_string()))?;
    let to = Coordinate::new(query.to_lat, query.to_lng)
        .map_err(|e| ApiError::validation(req_id.0.clone(), e.to_string()))?;

    Ok(Json(ApiResponse::new(
        DistanceData {
            distance_km: from.distance_to(&to),
        },
        req_id.0,
    )))
}
