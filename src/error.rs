//! Error types and handling for the `FishLog` service

use thiserror::Error;

/// Main error type for the `FishLog` service
#[derive(Error, Debug)]
pub enum FishLogError {
    /// Configuration-related errors, e.g. a missing weather API key
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Weather provider communication errors (network failure or non-2xx)
    #[error("Fetch error: {message}")]
    Fetch { message: String },

    /// Coordinate display strings that do not match the expected grammar
    #[error(transparent)]
    Parse(#[from] CoordinateParseError),

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Trip/location store errors
    #[error("Store error: {message}")]
    Store { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

/// Why a `DD°MM.MMM′H` string could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinateParseError {
    #[error("coordinate is empty")]
    Empty,

    #[error("missing degrees")]
    MissingDegrees,

    #[error("missing minutes")]
    MissingMinutes,

    #[error("minutes must be below 60")]
    MinutesOutOfRange,

    #[error("missing hemisphere (expected N, S, E or W)")]
    MissingHemisphere,

    #[error("invalid hemisphere '{0}' (expected N, S, E or W)")]
    InvalidHemisphere(char),

    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
}

impl FishLogError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new fetch error
    pub fn fetch<S: Into<String>>(message: S) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new store error
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Whether retrying the same operation could succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, FishLogError::Fetch { .. } | FishLogError::Io { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            FishLogError::Config { .. } => {
                "Weather service is not configured. Please check the API key.".to_string()
            }
            FishLogError::Fetch { .. } => {
                "Weather data is currently unavailable. Please try again later.".to_string()
            }
            FishLogError::Parse(err) => format!("Invalid coordinate: {err}"),
            FishLogError::Validation { message } => format!("Invalid input: {message}"),
            FishLogError::Store { .. } => "Could not access your fishing log.".to_string(),
            FishLogError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for FishLogError {
    fn from(err: reqwest::Error) -> Self {
        FishLogError::fetch(err.to_string())
    }
}
