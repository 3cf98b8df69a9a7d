use std::path::PathBuf;

use clap::Parser;
use dlvfee_core::DeliverySettings;

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["dlvfee-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_distance_command() {
    let cli = Cli::try_parse_from([
        "dlvfee-cli",
        "distance",
        "--from",
        "37.5665,126.978",
        "--to",
        "35.1798,129.075",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Distance { from, to }) = cli.command else {
        panic!("expected distance command, got {:?}", cli.command);
    };
    assert!((from.distance_to(&to) - 325.0).abs() < 2.0);
}

#[test]
fn distance_accepts_negative_coordinates() {
    let cli = Cli::try_parse_from([
        "dlvfee-cli",
        "distance",
        "--from",
        "-33.8688,151.2093",
        "--to",
        "-37.8136,144.9631",
    ])
    .expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Distance { .. })));
}

#[test]
fn distance_rejects_out_of_range_coordinate() {
    let result = Cli::try_parse_from([
        "dlvfee-cli",
        "distance",
        "--from",
        "95.0,126.978",
        "--to",
        "35.1798,129.075",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_quote_command_with_default_registry() {
    let cli = Cli::try_parse_from([
        "dlvfee-cli",
        "quote",
        "--store",
        "gwanghwamun-kitchen",
        "--to",
        "37.5651,126.9895",
        "--amount",
        "15000",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Quote {
            ref store,
            json: false,
            ..
        }) if store == "gwanghwamun-kitchen"
    ));
}

#[test]
fn parses_quote_command_with_registry_override() {
    let cli = Cli::try_parse_from([
        "dlvfee-cli",
        "quote",
        "--store",
        "mapo-late-night",
        "--to",
        "37.5563,126.9336",
        "--amount",
        "12500.50",
        "--stores",
        "/tmp/stores.yaml",
        "--json",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Quote {
        amount,
        json,
        registry,
        ..
    }) = cli.command
    else {
        panic!("expected quote command");
    };
    assert_eq!(amount, Decimal::new(1_250_050, 2));
    assert!(json);
    assert_eq!(registry.path, PathBuf::from("/tmp/stores.yaml"));
}

#[test]
fn quote_rejects_non_numeric_amount() {
    let result = Cli::try_parse_from([
        "dlvfee-cli",
        "quote",
        "--store",
        "gwanghwamun-kitchen",
        "--to",
        "37.5651,126.9895",
        "--amount",
        "lots",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_stores_subcommands() {
    let cli = Cli::try_parse_from(["dlvfee-cli", "stores", "list"]).expect("valid");
    assert!(matches!(
        cli.command,
        Some(Commands::Stores {
            command: StoresCommands::List { .. }
        })
    ));

    let cli = Cli::try_parse_from(["dlvfee-cli", "stores", "check", "--stores", "x.yaml"])
        .expect("valid");
    assert!(matches!(
        cli.command,
        Some(Commands::Stores {
            command: StoresCommands::Check { ref registry }
        }) if registry.path == PathBuf::from("x.yaml")
    ));
}

#[test]
fn parses_legacy_command() {
    let cli = Cli::try_parse_from(["dlvfee-cli", "legacy", "--amount", "20000"]).expect("valid");
    assert!(matches!(
        cli.command,
        Some(Commands::Legacy { amount }) if amount == Decimal::from(20_000)
    ));
}

#[test]
fn describe_out_of_range_says_not_deliverable() {
    let settings = DeliverySettings::builder(1.0).build().unwrap();
    let result =
        dlvfee_core::DeliveryFeePolicy::new(settings).quote_for_distance(3.0, Decimal::ZERO);
    let text = describe(&result);
    assert!(text.starts_with("not deliverable"), "{text}");
    assert!(!text.contains("-1"), "{text}");
}

#[test]
fn describe_deliverable_shows_fee() {
    let settings = DeliverySettings::builder(5.0)
        .base_fee(Decimal::from(2000))
        .extra_fee_per_km(Decimal::from(500))
        .build()
        .unwrap();
    let result =
        dlvfee_core::DeliveryFeePolicy::new(settings).quote_for_distance(1.2, Decimal::ZERO);
    assert!(describe(&result).starts_with("delivery fee 3000"));
}

#[test]
fn quote_against_sample_registry() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("stores.yaml");
    let customer: Coordinate = "37.5651,126.9895".parse().unwrap();
    let store = "gwanghwamun-kitchen";
    stores::run_quote(&path, store, &customer, Decimal::from(15_000), false)
        .expect("quote succeeds");
    assert!(stores::run_quote(&path, "no-such-store", &customer, Decimal::ZERO, false).is_err());
    assert!(stores::run_quote(&path, store, &customer, Decimal::from(-1), false).is_err());
}

#[test]
fn legacy_summary_reports_flat_fee_only() {
    assert_eq!(
        legacy_summary(Decimal::from(19_999)),
        "3000 (legacy flat fee below 20000)"
    );
    assert_eq!(
        legacy_summary(Decimal::from(20_000)),
        "0 (legacy flat fee: free at or above 20000)"
    );
    assert!(!legacy_summary(Decimal::from(5_000)).contains("km"));
}
