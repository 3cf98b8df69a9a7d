use super::*;
use crate::geo::calculate_distance;
use crate::settings::FreeDelivery;

const STORE: (f64, f64) = (37.5665, 126.9780);
const CUSTOMER_EAST: (f64, f64) = (37.5651, 126.9895);

fn seoul_settings() -> DeliverySettings {
    DeliverySettings::builder(10.0)
        .base_fee(Decimal::from(2000))
        .free_threshold(Decimal::from(20_000))
        .extra_fee_per_km(Decimal::from(500))
        .build()
        .expect("valid settings")
}

fn tiered_settings() -> DeliverySettings {
    DeliverySettings::builder(10.0)
        .base_fee(Decimal::from(1000))
        .extra_fee_per_km(Decimal::from(500))
        .tier(2.0, Decimal::from(1000))
        .tier(5.0, Decimal::from(2000))
        .build()
        .expect("valid settings")
}

fn quote(settings: &DeliverySettings, customer: (f64, f64), amount: i64) -> DeliveryFeeResult {
    calculate_delivery_fee(
        STORE.0,
        STORE.1,
        customer.0,
        customer.1,
        Decimal::from(amount),
        settings,
    )
    .expect("valid coordinates")
}

#[test]
fn nearby_customer_pays_base_plus_rounded_up_kilometers() {
    let result = quote(&seoul_settings(), CUSTOMER_EAST, 15_000);
    assert_eq!(result.delivery_fee, Decimal::from(3000));
    assert!((result.distance_km - 1.03).abs() < 0.1, "got {}", result.distance_km);
    assert_eq!(result.basis, FeeBasis::DistanceBased { billed_km: 2 });
    assert!(result.reason.contains("base fee 2000"), "{}", result.reason);
    assert!(result.reason.contains("2 km x 500"), "{}", result.reason);
    assert_eq!(result.payable_fee(), Some(Decimal::from(3000)));
}

#[test]
fn large_order_ships_free() {
    let result = quote(&seoul_settings(), CUSTOMER_EAST, 25_000);
    assert_eq!(result.delivery_fee, Decimal::ZERO);
    assert!(result.distance_km > 0.0);
    assert!(result
        .reason
        .contains("order amount met free-delivery threshold"));
    assert!(matches!(result.basis, FeeBasis::FreeThreshold { .. }));
}

#[test]
fn customer_fifty_km_away_is_undeliverable() {
    let far = (STORE.0 + 0.45, STORE.1);
    let result = quote(&seoul_settings(), far, 15_000);
    assert_eq!(result.delivery_fee, Decimal::from(-1));
    assert_eq!(result.delivery_fee, DeliveryFeeResult::UNDELIVERABLE);
    assert!((result.distance_km - 50.0).abs() < 0.5, "got {}", result.distance_km);
    assert!(result.reason.contains("exceeds max deliverable distance"));
    assert!(!result.is_deliverable());
    assert_eq!(result.payable_fee(), None);
}

#[test]
fn out_of_range_wins_over_free_delivery() {
    let far = (STORE.0 + 0.45, STORE.1);
    let result = quote(&seoul_settings(), far, 1_000_000);
    assert_eq!(result.delivery_fee, DeliveryFeeResult::UNDELIVERABLE);
}

#[test]
fn free_delivery_threshold_boundary() {
    let policy = DeliveryFeePolicy::new(seoul_settings());
    let at = policy.quote_for_distance(3.0, Decimal::from(20_000));
    assert_eq!(at.delivery_fee, Decimal::ZERO);

    let below = policy.quote_for_distance(3.0, Decimal::from(19_999));
    assert_eq!(below.delivery_fee, Decimal::from(3500));

    let just_below = policy.quote_for_distance(3.0, Decimal::new(1_999_999, 2));
    assert_ne!(just_below.delivery_fee, Decimal::ZERO);
}

#[test]
fn zero_threshold_makes_every_in_range_delivery_free() {
    let settings = DeliverySettings::builder(10.0)
        .base_fee(Decimal::from(2000))
        .free_threshold(Decimal::ZERO)
        .build()
        .unwrap();
    let result = DeliveryFeePolicy::new(settings).quote_for_distance(9.5, Decimal::ZERO);
    assert_eq!(result.delivery_fee, Decimal::ZERO);
}

#[test]
fn disabled_free_delivery_never_fires() {
    let settings = DeliverySettings::builder(10.0)
        .base_fee(Decimal::from(2000))
        .free_delivery(FreeDelivery::Disabled)
        .build()
        .unwrap();
    let result = DeliveryFeePolicy::new(settings).quote_for_distance(1.0, Decimal::MAX);
    assert_eq!(result.delivery_fee, Decimal::from(2000));
}

#[test]
fn distance_equal_to_max_is_deliverable() {
    let d = calculate_distance(STORE.0, STORE.1, CUSTOMER_EAST.0, CUSTOMER_EAST.1);
    let settings = DeliverySettings::builder(d)
        .base_fee(Decimal::from(2000))
        .extra_fee_per_km(Decimal::from(500))
        .build()
        .unwrap();
    let result = quote(&settings, CUSTOMER_EAST, 0);
    assert!(result.is_deliverable());
    assert_eq!(result.delivery_fee, Decimal::from(3000));
}

#[test]
fn distance_just_over_max_is_rejected() {
    let d = calculate_distance(STORE.0, STORE.1, CUSTOMER_EAST.0, CUSTOMER_EAST.1);
    let just_below = f64::from_bits(d.to_bits() - 1);
    let settings = DeliverySettings::builder(just_below).build().unwrap();
    let result = quote(&settings, CUSTOMER_EAST, 0);
    assert_eq!(result.delivery_fee, DeliveryFeeResult::UNDELIVERABLE);
    assert!((result.distance_km - d).abs() < f64::EPSILON);
}

#[test]
fn first_matching_tier_wins() {
    let policy = DeliveryFeePolicy::new(tiered_settings());

    let at_two = policy.quote_for_distance(2.0, Decimal::ZERO);
    assert_eq!(at_two.delivery_fee, Decimal::from(1000));
    assert_eq!(at_two.basis, FeeBasis::DistanceTier { max_km: 2.0 });

    let past_two = policy.quote_for_distance(2.001, Decimal::ZERO);
    assert_eq!(past_two.delivery_fee, Decimal::from(2000));
    assert_eq!(past_two.basis, FeeBasis::DistanceTier { max_km: 5.0 });
}

#[test]
fn distance_past_every_tier_falls_back_to_per_km() {
    let policy = DeliveryFeePolicy::new(tiered_settings());
    let result = policy.quote_for_distance(7.2, Decimal::ZERO);
    assert_eq!(result.basis, FeeBasis::DistanceBased { billed_km: 8 });
    assert_eq!(result.delivery_fee, Decimal::from(1000 + 8 * 500));
}

#[test]
fn partial_kilometer_is_billed_as_whole() {
    let settings = DeliverySettings::builder(10.0)
        .base_fee(Decimal::from(1000))
        .extra_fee_per_km(Decimal::from(500))
        .build()
        .unwrap();
    let result = DeliveryFeePolicy::new(settings).quote_for_distance(3.1, Decimal::ZERO);
    assert_eq!(result.delivery_fee, Decimal::from(3000));
}

#[test]
fn whole_kilometer_is_not_rounded_further() {
    let settings = DeliverySettings::builder(10.0)
        .base_fee(Decimal::from(1000))
        .extra_fee_per_km(Decimal::from(500))
        .build()
        .unwrap();
    let result = DeliveryFeePolicy::new(settings).quote_for_distance(3.0, Decimal::ZERO);
    assert_eq!(result.delivery_fee, Decimal::from(2500));
}

#[test]
fn fee_never_decreases_with_distance() {
    let policy = DeliveryFeePolicy::new(seoul_settings());
    let mut last = Decimal::MIN;
    for step in 0..100 {
        let km = f64::from(step) * 0.1;
        let result = policy.quote_for_distance(km, Decimal::from(1000));
        assert!(
            result.delivery_fee >= last,
            "fee dropped at {km} km: {} < {last}",
            result.delivery_fee
        );
        last = result.delivery_fee;
    }
}

#[test]
fn nan_distance_is_out_of_range() {
    let policy = DeliveryFeePolicy::new(seoul_settings());
    let result = policy.quote_for_distance(f64::NAN, Decimal::from(50_000));
    assert!(!result.is_deliverable());
}

#[test]
fn invalid_coordinates_fail_fast() {
    let err = calculate_delivery_fee(
        f64::NAN,
        126.9780,
        37.5651,
        126.9895,
        Decimal::from(1000),
        &seoul_settings(),
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::InvalidCoordinate { .. }));

    let err = calculate_delivery_fee(
        37.5665,
        126.9780,
        37.5651,
        226.9895,
        Decimal::from(1000),
        &seoul_settings(),
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::InvalidCoordinate { .. }));
}

#[test]
fn policy_quote_matches_free_function() {
    let settings = seoul_settings();
    let policy = DeliveryFeePolicy::new(settings.clone());
    let store = Coordinate::new(STORE.0, STORE.1).unwrap();
    let customer = Coordinate::new(CUSTOMER_EAST.0, CUSTOMER_EAST.1).unwrap();
    let via_policy = policy.quote(&store, &customer, Decimal::from(15_000));
    let via_fn = quote(&settings, CUSTOMER_EAST, 15_000);
    assert_eq!(via_policy, via_fn);
}

#[test]
#[allow(deprecated)]
fn legacy_flat_fee() {
    assert_eq!(
        calculate_delivery_fee_legacy(Decimal::from(20_000)),
        Decimal::ZERO
    );
    assert_eq!(
        calculate_delivery_fee_legacy(Decimal::from(19_999)),
        Decimal::from(3000)
    );
    assert_eq!(calculate_delivery_fee_legacy(Decimal::ZERO), Decimal::from(3000));
}

#[test]
fn legacy_quote_reports_distance_without_pricing_it() {
    let result = legacy_quote(Decimal::from(5_000), 42.0);
    assert_eq!(result.delivery_fee, Decimal::from(3000));
    assert_eq!(result.basis, FeeBasis::Legacy);
    assert!((result.distance_km - 42.0).abs() < f64::EPSILON);
    assert!(result.is_deliverable());
}

#[test]
fn result_serializes_with_tagged_basis() {
    let result = quote(&seoul_settings(), CUSTOMER_EAST, 15_000);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["basis"]["kind"], "distance_based");
    assert_eq!(json["basis"]["billed_km"], 2);
    assert_eq!(json["delivery_fee"], "3000");
}

#[test]
fn largest_accepted_fees_quote_without_overflow() {
    let settings = DeliverySettings::builder(10.0)
        .base_fee(Decimal::MAX)
        .build()
        .expect("valid settings");
    let policy = DeliveryFeePolicy::new(settings);
    for km in [0.0, 1.5, 9.99, 10.0] {
        let result = policy.quote_for_distance(km, Decimal::ZERO);
        assert_eq!(result.delivery_fee, Decimal::MAX);
    }

    let settings = DeliverySettings::builder(10.0)
        .extra_fee_per_km(Decimal::from(1_000_000_000_000_i64))
        .build()
        .expect("valid settings");
    let result = DeliveryFeePolicy::new(settings).quote_for_distance(10.0, Decimal::ZERO);
    assert_eq!(result.delivery_fee, Decimal::from(10_000_000_000_000_i64));
}
