#![allow(missing_docs)]
//! Error types for the Moralis plugin.

use thiserror::Error;

/// Result type for Moralis operations.
pub type Result<T> = std::result::Result<T, MoralisError>;

#[derive(Error, Debug)]
pub enum MoralisError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Missing required parameter(s): {}", .fields.join(", "))]
    MissingParameter { fields: Vec<String> },

    #[error("Invalid parameter {field}: {message}")]
    InvalidParameter { field: String, message: String },

    #[error("API error: {message} (status: {status_code}, endpoint: {endpoint})")]
    Api {
        message: String,
        status_code: u16,
        endpoint: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Model error: {0}")]
    Model(String),
}

impl MoralisError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }

    pub fn missing<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingParameter {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn api(message: impl Into<String>, status_code: u16, endpoint: impl Into<String>) -> Self {
        Self::Api {
            message: message.into(),
            status_code,
            endpoint: endpoint.into(),
        }
    }

    /// Stable identifier for the failure category.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration_error",
            Self::Extraction(_) => "extraction_error",
            Self::Model(_) | Self::Template(_) => "model_error",
            Self::MissingParameter { .. } => "missing_parameter",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::Api { .. } | Self::Network(_) | Self::Timeout(_) | Self::Json(_) => "api_error",
        }
    }

    /// Upstream HTTP status, if the failure came from a non-2xx response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_rate_limit(&self) -> bool {
        self.status_code() == Some(429)
    }

    /// True for failures the user can fix by rephrasing or supplying a value.
    pub fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Extraction(_) | Self::MissingParameter { .. } | Self::InvalidParameter { .. }
        )
    }

    /// Short, non-technical text for the chat user.
    ///
    /// `missing_hint` is the action's own prompt for a missing or malformed
    /// identifier; `subject` names what was being fetched ("token price").
    /// The error's `Display` output is never part of the result.
    pub fn user_message(&self, missing_hint: &str, subject: &str) -> String {
        match self {
            Self::Config(_) => {
                "Market data isn't available right now because the Moralis API key is not configured."
                    .to_string()
            }
            Self::Extraction(_) => {
                "I couldn't work out the details of that request. Could you rephrase it?"
                    .to_string()
            }
            Self::MissingParameter { .. } | Self::InvalidParameter { .. } => {
                missing_hint.to_string()
            }
            Self::Api { .. }
            | Self::Network(_)
            | Self::Timeout(_)
            | Self::Json(_)
            | Self::Template(_)
            | Self::Model(_) => {
                format!("Sorry, I couldn't fetch the {subject} right now. Please try again later.")
            }
        }
    }
}
