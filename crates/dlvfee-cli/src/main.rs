mod stores;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dlvfee_core::fee::LEGACY_FREE_THRESHOLD;
use dlvfee_core::{Coordinate, DeliveryFeeResult, FeeBasis};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dlvfee-cli")]
#[command(about = "Delivery fee quotes and store registry tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Args, PartialEq, Eq)]
struct RegistryArgs {
    /// Path to the store registry YAML
    #[arg(long = "stores", env = "DLVFEE_STORES_PATH", default_value = "./config/stores.yaml")]
    path: PathBuf,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Great-circle distance between two points
    Distance {
        /// Origin as LAT,LNG
        #[arg(long, allow_hyphen_values = true)]
        from: Coordinate,
        /// Destination as LAT,LNG
        #[arg(long, allow_hyphen_values = true)]
        to: Coordinate,
    },
    /// Quote the delivery fee from a registered store to a customer
    Quote {
        /// Store slug, e.g. gwanghwamun-kitchen
        #[arg(long)]
        store: String,
        /// Customer location as LAT,LNG
        #[arg(long, allow_hyphen_values = true)]
        to: Coordinate,
        /// Order amount in the store's currency unit
        #[arg(long)]
        amount: Decimal,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        registry: RegistryArgs,
    },
    /// Inspect or validate the store registry
    Stores {
        #[command(subcommand)]
        command: StoresCommands,
    },
    /// Preview the deprecated flat fee (rollback only)
    Legacy {
        #[arg(long)]
        amount: Decimal,
    },
}

#[derive(Debug, Subcommand)]
enum StoresCommands {
    /// List registered stores and their delivery radius
    List {
        #[command(flatten)]
        registry: RegistryArgs,
    },
    /// Validate the registry file and exit non-zero on error
    Check {
        #[command(flatten)]
        registry: RegistryArgs,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Distance { from, to }) => {
            println!("{:.3} km", from.distance_to(&to));
        }
        Some(Commands::Quote {
            store,
            to,
            amount,
            json,
            registry,
        }) => stores::run_quote(&registry.path, &store, &to, amount, json)?,
        Some(Commands::Stores { command }) => match command {
            StoresCommands::List { registry } => stores::run_list(&registry.path)?,
            StoresCommands::Check { registry } => stores::run_check(&registry.path)?,
        },
        Some(Commands::Legacy { amount }) => {
            tracing::warn!("legacy flat fee ignores distance; use it only to preview a rollback");
            println!("{}", legacy_summary(amount));
        }
        None => println!("dlvfee-cli: run with --help to see available commands"),
    }

    Ok(())
}

/// Legacy flat fee for `amount`. Distance plays no part, so none is shown.
fn legacy_summary(amount: Decimal) -> String {
    #[allow(deprecated)]
    let fee = dlvfee_core::calculate_delivery_fee_legacy(amount);
    if fee.is_zero() {
        format!("{fee} (legacy flat fee: free at or above {LEGACY_FREE_THRESHOLD})")
    } else {
        format!("{fee} (legacy flat fee below {LEGACY_FREE_THRESHOLD})")
    }
}

/// One-line human summary of a quote.
fn describe(result: &DeliveryFeeResult) -> String {
    match result.basis {
        FeeBasis::OutOfRange { .. } => format!(
            "not deliverable: {} ({:.2} km)",
            result.reason, result.distance_km
        ),
        _ => format!(
            "delivery fee {} ({:.2} km): {}",
            result.delivery_fee, result.distance_km, result.reason
        ),
    }
}

#[cfg(test)]
mod tests;
