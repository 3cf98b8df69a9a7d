pub mod app_config;
pub mod config;
pub mod error;
pub mod fee;
pub mod geo;
pub mod settings;
pub mod stores;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
#[allow(deprecated)]
pub use fee::calculate_delivery_fee_legacy;
pub use fee::{calculate_delivery_fee, legacy_quote, DeliveryFeePolicy, DeliveryFeeResult, FeeBasis};
pub use geo::{calculate_distance, Coordinate, EARTH_RADIUS_KM};
pub use settings::{
    DeliverySettings, DeliverySettingsBuilder, DistanceTier, DistanceTiers, FreeDelivery,
};
pub use stores::{load_stores, StoreConfig, StoresFile};
