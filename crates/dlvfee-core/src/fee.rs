//! Delivery fee decision.
//!
//! Branches are evaluated in a fixed order and the first match wins:
//!
//! 1. distance beyond `max_distance_km` → undeliverable (`-1`)
//! 2. order amount at or above the free-delivery threshold → `0`
//! 3. first distance tier covering the distance → that tier's fee
//! 4. otherwise `base_fee + ceil(distance) * extra_fee_per_km`

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;
use crate::settings::DeliverySettings;
use crate::CoreError;

/// Orders at or above this amount ship free under the legacy flat fee.
pub const LEGACY_FREE_THRESHOLD: i64 = 20_000;
/// Legacy flat fee for orders below [`LEGACY_FREE_THRESHOLD`].
pub const LEGACY_FLAT_FEE: i64 = 3_000;

/// Which branch of the policy produced a fee.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeeBasis {
    OutOfRange { max_distance_km: f64 },
    FreeThreshold { threshold: Decimal },
    DistanceTier { max_km: f64 },
    DistanceBased { billed_km: u64 },
    Legacy,
}

/// Outcome of one fee quote.
///
/// `delivery_fee` is [`DeliveryFeeResult::UNDELIVERABLE`] (`-1`) when the
/// customer is out of range. That value is a marker, not a charge: branch on
/// [`DeliveryFeeResult::payable_fee`] or `basis` before doing arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryFeeResult {
    pub delivery_fee: Decimal,
    /// Great-circle distance, populated for every outcome.
    pub distance_km: f64,
    /// Display text. Not meant for programmatic branching.
    pub reason: String,
    pub basis: FeeBasis,
}

impl DeliveryFeeResult {
    pub const UNDELIVERABLE: Decimal = Decimal::NEGATIVE_ONE;

    #[must_use]
    pub fn is_deliverable(&self) -> bool {
        !matches!(self.basis, FeeBasis::OutOfRange { .. })
    }

    /// The fee to add to an order total, or `None` when the order cannot be
    /// delivered.
    #[must_use]
    pub fn payable_fee(&self) -> Option<Decimal> {
        self.is_deliverable().then_some(self.delivery_fee)
    }
}

/// A merchant's fee policy, ready to quote.
#[derive(Debug, Clone)]
pub struct DeliveryFeePolicy {
    settings: DeliverySettings,
}

impl DeliveryFeePolicy {
    #[must_use]
    pub fn new(settings: DeliverySettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &DeliverySettings {
        &self.settings
    }

    /// Quote the fee for delivering from `store` to `customer`.
    #[must_use]
    pub fn quote(
        &self,
        store: &Coordinate,
        customer: &Coordinate,
        order_amount: Decimal,
    ) -> DeliveryFeeResult {
        decide(&self.settings, store.distance_to(customer), order_amount)
    }

    /// Quote the fee for an already-computed distance in kilometers.
    ///
    /// A `NaN` distance is treated as out of range.
    #[must_use]
    pub fn quote_for_distance(&self, distance_km: f64, order_amount: Decimal) -> DeliveryFeeResult {
        decide(&self.settings, distance_km, order_amount)
    }
}

/// Quote a delivery fee from raw coordinates.
///
/// # Errors
///
/// Returns [`CoreError::InvalidCoordinate`] if either coordinate is not a
/// finite latitude/longitude in range. An out-of-range *delivery* is not an
/// error; it comes back as a result with the `-1` sentinel.
pub fn calculate_delivery_fee(
    store_lat: f64,
    store_lng: f64,
    customer_lat: f64,
    customer_lng: f64,
    order_amount: Decimal,
    settings: &DeliverySettings,
) -> Result<DeliveryFeeResult, CoreError> {
    let store = Coordinate::new(store_lat, store_lng)?;
    let customer = Coordinate::new(customer_lat, customer_lng)?;
    Ok(decide(settings, store.distance_to(&customer), order_amount))
}

fn decide(
    settings: &DeliverySettings,
    distance_km: f64,
    order_amount: Decimal,
) -> DeliveryFeeResult {
    let max_distance_km = settings.max_distance_km();

    let (delivery_fee, basis, reason) = if distance_km.is_nan() || distance_km > max_distance_km {
        (
            DeliveryFeeResult::UNDELIVERABLE,
            FeeBasis::OutOfRange { max_distance_km },
            format!(
                "exceeds max deliverable distance ({distance_km:.2} km > {max_distance_km} km)"
            ),
        )
    } else if let Some(threshold) = settings
        .free_delivery()
        .threshold()
        .filter(|t| order_amount >= *t)
    {
        (
            Decimal::ZERO,
            FeeBasis::FreeThreshold { threshold },
            format!("order amount met free-delivery threshold ({threshold})"),
        )
    } else if let Some(tier) = settings.tiers().and_then(|t| t.lookup(distance_km)) {
        (
            tier.fee,
            FeeBasis::DistanceTier {
                max_km: tier.max_km,
            },
            format!("distance tier up to {} km ({distance_km:.2} km)", tier.max_km),
        )
    } else {
        // Partial kilometers bill as a whole kilometer. Settings validation
        // bounds this arithmetic at max_distance_km.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let billed_km = distance_km.ceil() as u64;
        let extra = Decimal::from(billed_km) * settings.extra_fee_per_km();
        let fee = settings.base_fee() + extra;
        (
            fee,
            FeeBasis::DistanceBased { billed_km },
            format!(
                "base fee {} + extra fee {billed_km} km x {} = {fee}",
                settings.base_fee(),
                settings.extra_fee_per_km()
            ),
        )
    };

    tracing::debug!(
        distance_km,
        %order_amount,
        %delivery_fee,
        basis = ?basis,
        "delivery fee decided"
    );

    DeliveryFeeResult {
        delivery_fee,
        distance_km,
        reason,
        basis,
    }
}

/// Flat fee that ignores distance: free at or above 20000, otherwise 3000.
///
/// Kept only so operators can roll back to the pre-distance pricing. New
/// pricing code goes through [`DeliveryFeePolicy`].
#[deprecated(note = "distance-blind flat fee kept for rollback; use DeliveryFeePolicy")]
#[must_use]
pub fn calculate_delivery_fee_legacy(order_amount: Decimal) -> Decimal {
    if order_amount >= Decimal::from(LEGACY_FREE_THRESHOLD) {
        Decimal::ZERO
    } else {
        Decimal::from(LEGACY_FLAT_FEE)
    }
}

/// Wrap the legacy flat fee in a [`DeliveryFeeResult`] so rollback traffic
/// keeps the same response shape. The distance is reported but not priced.
#[must_use]
pub fn legacy_quote(order_amount: Decimal, distance_km: f64) -> DeliveryFeeResult {
    #[allow(deprecated)]
    let delivery_fee = calculate_delivery_fee_legacy(order_amount);
    let reason = if delivery_fee.is_zero() {
        format!("legacy flat fee: free at or above {LEGACY_FREE_THRESHOLD}")
    } else {
        format!("legacy flat fee {LEGACY_FLAT_FEE} below {LEGACY_FREE_THRESHOLD}")
    };
    tracing::warn!(%order_amount, %delivery_fee, "legacy flat delivery fee applied");

    DeliveryFeeResult {
        delivery_fee,
        distance_km,
        reason,
        basis: FeeBasis::Legacy,
    }
}

#[cfg(test)]
#[path = "fee_test.rs"]
mod tests;
