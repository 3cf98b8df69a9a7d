use thiserror::Error;

/// Errors raised while validating fee inputs.
///
/// Out-of-range deliveries are not errors; they come back as a
/// [`crate::DeliveryFeeResult`] carrying the `-1` sentinel.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid coordinate ({lat}, {lng}): latitude must be within [-90, 90] and longitude within [-180, 180]")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("invalid delivery settings: {0}")]
    InvalidSettings(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read stores file {path}: {source}")]
    StoresFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse stores file: {0}")]
    StoresFileParse(#[from] serde_yaml::Error),

    #[error("stores validation failed: {0}")]
    Validation(String),
}
