//! Merchant delivery policy.
//!
//! [`DeliverySettings`] is only ever constructed through validation, either
//! from [`DeliverySettings::builder`] or by deserializing the wire form, so
//! a fee quote never has to re-check its inputs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A fixed fee for deliveries up to `max_km`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceTier {
    pub max_km: f64,
    pub fee: Decimal,
}

/// Non-empty list of tiers in strictly ascending `max_km` order.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTiers(Vec<DistanceTier>);

impl DistanceTiers {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSettings`] if the list is empty, a tier has
    /// a non-positive or non-finite `max_km` or a negative fee, or the tiers
    /// are not strictly ascending by `max_km`.
    pub fn new(tiers: Vec<DistanceTier>) -> Result<Self, CoreError> {
        if tiers.is_empty() {
            return Err(CoreError::InvalidSettings(
                "distance tiers must not be empty".to_string(),
            ));
        }

        let mut previous: Option<f64> = None;
        for (idx, tier) in tiers.iter().enumerate() {
            if !tier.max_km.is_finite() || tier.max_km <= 0.0 {
                return Err(CoreError::InvalidSettings(format!(
                    "tier {idx} has invalid max_km {}; must be a positive number",
                    tier.max_km
                )));
            }
            if tier.fee < Decimal::ZERO {
                return Err(CoreError::InvalidSettings(format!(
                    "tier {idx} has negative fee {}",
                    tier.fee
                )));
            }
            if let Some(prev) = previous {
                if tier.max_km <= prev {
                    return Err(CoreError::InvalidSettings(format!(
                        "tier {idx} max_km {} must be greater than the previous tier's {prev}",
                        tier.max_km
                    )));
                }
            }
            previous = Some(tier.max_km);
        }

        Ok(Self(tiers))
    }

    /// First tier whose `max_km` covers `distance_km`. The distance is
    /// compared as-is, without rounding.
    #[must_use]
    pub fn lookup(&self, distance_km: f64) -> Option<&DistanceTier> {
        self.0.iter().find(|tier| tier.max_km >= distance_km)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[DistanceTier] {
        &self.0
    }
}

/// When an order ships for free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FreeDelivery {
    /// Every order pays a delivery fee.
    #[default]
    Disabled,
    /// Orders whose amount is at or above the threshold ship free. A zero
    /// threshold makes every in-range delivery free.
    AtOrAbove(Decimal),
}

impl FreeDelivery {
    #[must_use]
    pub fn applies_to(&self, order_amount: Decimal) -> bool {
        match self {
            FreeDelivery::Disabled => false,
            FreeDelivery::AtOrAbove(threshold) => order_amount >= *threshold,
        }
    }

    #[must_use]
    pub fn threshold(&self) -> Option<Decimal> {
        match self {
            FreeDelivery::Disabled => None,
            FreeDelivery::AtOrAbove(threshold) => Some(*threshold),
        }
    }
}

/// A validated merchant delivery policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DeliverySettingsWire", into = "DeliverySettingsWire")]
pub struct DeliverySettings {
    base_fee: Decimal,
    free_delivery: FreeDelivery,
    extra_fee_per_km: Decimal,
    max_distance_km: f64,
    tiers: Option<DistanceTiers>,
}

impl DeliverySettings {
    /// Start a builder. Only `max_distance_km` is required; fees default to
    /// zero, free delivery to disabled and tiers to none.
    #[must_use]
    pub fn builder(max_distance_km: f64) -> DeliverySettingsBuilder {
        DeliverySettingsBuilder {
            base_fee: Decimal::ZERO,
            free_delivery: FreeDelivery::Disabled,
            extra_fee_per_km: Decimal::ZERO,
            max_distance_km,
            tiers: Vec::new(),
        }
    }

    #[must_use]
    pub fn base_fee(&self) -> Decimal {
        self.base_fee
    }

    #[must_use]
    pub fn free_delivery(&self) -> FreeDelivery {
        self.free_delivery
    }

    #[must_use]
    pub fn extra_fee_per_km(&self) -> Decimal {
        self.extra_fee_per_km
    }

    #[must_use]
    pub fn max_distance_km(&self) -> f64 {
        self.max_distance_km
    }

    #[must_use]
    pub fn tiers(&self) -> Option<&DistanceTiers> {
        self.tiers.as_ref()
    }
}

#[derive(Debug, Clone)]
pub struct DeliverySettingsBuilder {
    base_fee: Decimal,
    free_delivery: FreeDelivery,
    extra_fee_per_km: Decimal,
    max_distance_km: f64,
    tiers: Vec<DistanceTier>,
}

impl DeliverySettingsBuilder {
    #[must_use]
    pub fn base_fee(mut self, fee: Decimal) -> Self {
        self.base_fee = fee;
        self
    }

    #[must_use]
    pub fn free_threshold(mut self, threshold: Decimal) -> Self {
        self.free_delivery = FreeDelivery::AtOrAbove(threshold);
        self
    }

    #[must_use]
    pub fn free_delivery(mut self, free_delivery: FreeDelivery) -> Self {
        self.free_delivery = free_delivery;
        self
    }

    #[must_use]
    pub fn extra_fee_per_km(mut self, fee: Decimal) -> Self {
        self.extra_fee_per_km = fee;
        self
    }

    #[must_use]
    pub fn tier(mut self, max_km: f64, fee: Decimal) -> Self {
        self.tiers.push(DistanceTier { max_km, fee });
        self
    }

    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSettings`] for negative amounts, a
    /// non-positive or non-finite max distance, a per-km fee that would
    /// overflow at the max distance, or invalid tiers.
    pub fn build(self) -> Result<DeliverySettings, CoreError> {
        non_negative("base_fee", self.base_fee)?;
        non_negative("extra_fee_per_km", self.extra_fee_per_km)?;
        if let FreeDelivery::AtOrAbove(threshold) = self.free_delivery {
            non_negative("free_threshold", threshold)?;
        }
        if !self.max_distance_km.is_finite() || self.max_distance_km <= 0.0 {
            return Err(CoreError::InvalidSettings(format!(
                "max_distance_km must be a positive number, got {}",
                self.max_distance_km
            )));
        }

        // Every quoted per-km fee is at most the fee at the farthest
        // billable distance.
        let max_fee = max_billed_km(self.max_distance_km)
            .and_then(|km| Decimal::from(km).checked_mul(self.extra_fee_per_km))
            .and_then(|extra| self.base_fee.checked_add(extra));
        if max_fee.is_none() {
            return Err(CoreError::InvalidSettings(format!(
                "base_fee {} + {} km x extra_fee_per_km {} overflows the fee range",
                self.base_fee,
                self.max_distance_km.ceil(),
                self.extra_fee_per_km
            )));
        }

        let tiers = if self.tiers.is_empty() {
            None
        } else {
            Some(DistanceTiers::new(self.tiers)?)
        };

        Ok(DeliverySettings {
            base_fee: self.base_fee,
            free_delivery: self.free_delivery,
            extra_fee_per_km: self.extra_fee_per_km,
            max_distance_km: self.max_distance_km,
            tiers,
        })
    }
}

/// Whole kilometers billed at `max_distance_km`, or `None` if that does not
/// fit in a `u64`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn max_billed_km(max_distance_km: f64) -> Option<u64> {
    let km = max_distance_km.ceil();
    (km >= 0.0 && km < u64::MAX as f64).then(|| km as u64)
}

fn non_negative(field: &str, value: Decimal) -> Result<(), CoreError> {
    if value < Decimal::ZERO {
        return Err(CoreError::InvalidSettings(format!(
            "{field} must not be negative, got {value}"
        )));
    }
    Ok(())
}

/// Serialized form used in `stores.yaml` and API request bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliverySettingsWire {
    #[serde(default)]
    pub base_fee: Decimal,
    /// Absent or `null` disables free delivery.
    #[serde(default)]
    pub free_threshold: Option<Decimal>,
    #[serde(default)]
    pub extra_fee_per_km: Decimal,
    pub max_distance_km: f64,
    #[serde(default)]
    pub distance_tiers: Vec<DistanceTier>,
}

impl TryFrom<DeliverySettingsWire> for DeliverySettings {
    type Error = CoreError;

    fn try_from(wire: DeliverySettingsWire) -> Result<Self, Self::Error> {
        let free_delivery = wire
            .free_threshold
            .map_or(FreeDelivery::Disabled, FreeDelivery::AtOrAbove);

        let mut builder = DeliverySettings::builder(wire.max_distance_km)
            .base_fee(wire.base_fee)
            .extra_fee_per_km(wire.extra_fee_per_km)
            .free_delivery(free_delivery);
        for tier in wire.distance_tiers {
            builder = builder.tier(tier.max_km, tier.fee);
        }
        builder.build()
    }
}

impl From<DeliverySettings> for DeliverySettingsWire {
    fn from(settings: DeliverySettings) -> Self {
        Self {
            base_fee: settings.base_fee,
            free_threshold: settings.free_delivery.threshold(),
            extra_fee_per_km: settings.extra_fee_per_km,
            max_distance_km: settings.max_distance_km,
            distance_tiers: settings.tiers.map(|t| t.0).unwrap_or_default(),
        }
    }
}
