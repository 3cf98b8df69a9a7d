use std::path::Path;

use anyhow::Context;
use dlvfee_core::{load_stores, Coordinate};
use rust_decimal::Decimal;

use crate::describe;

pub(crate) fn run_quote(
    path: &Path,
    slug: &str,
    customer: &Coordinate,
    amount: Decimal,
    json: bool,
) -> anyhow::Result<()> {
    if amount < Decimal::ZERO {
        anyhow::bail!("--amount must not be negative, got {amount}");
    }

    let stores = load_stores(path)
        .with_context(|| format!("loading store registry from {}", path.display()))?;
    let store = stores
        .find(slug)
        .with_context(|| format!("store '{slug}' not found in {}", path.display()))?;

    let result = store.policy().quote(&store.location, customer, amount);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}: {}", store.name, describe(&result));
    }
    Ok(())
}

pub(crate) fn run_list(path: &Path) -> anyhow::Result<()> {
    let stores = load_stores(path)
        .with_context(|| format!("loading store registry from {}", path.display()))?;

    for store in &stores.stores {
        let free = store
            .delivery
            .free_delivery()
            .threshold()
            .map_or_else(|| "never".to_string(), |t| format!("from {t}"));
        println!(
            "{:<24} {}  radius {} km  free {}",
            store.slug(),
            store.location,
            store.delivery.max_distance_km(),
            free
        );
    }
    Ok(())
}

pub(crate) fn run_check(path: &Path) -> anyhow::Result<()> {
    let stores = load_stores(path)
        .with_context(|| format!("store registry {} is invalid", path.display()))?;
    println!("{}: {} store(s) OK", path.display(), stores.stores.len());
    Ok(())
}
