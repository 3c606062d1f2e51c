//! Error handling for enterprise cluster discovery
//!
//! Covers the two upstream-data failures raised by the normalizer, the two
//! transport classifications raised by the cluster client, and the request
//! errors of the surrounding service.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;

/// Message surfaced to the GUI for any normalizer failure
pub const UNREADABLE_DATABASES_MESSAGE: &str = "Could not read cluster databases.";

/// Discovery error taxonomy
#[derive(Error, Debug)]
pub enum DiscoveryError {
    /// The selected external endpoint carries no addresses
    #[error("Malformed external endpoint for database {database_id}: address list is empty")]
    MalformedEndpoint { database_id: String },

    /// Snapshot persistence is enabled but no snapshot policy is listed
    #[error("Database {database_id} uses snapshot persistence but has no snapshot policy")]
    MissingSnapshotPolicy { database_id: String },

    /// The cluster rejected the supplied credentials (HTTP 401/403)
    #[error("Cluster at {address} rejected the supplied credentials")]
    Credentials { address: String },

    /// The cluster could not be reached or answered unusably
    #[error("Failed to reach cluster at {address}: {reason}")]
    Connection { address: String, reason: String },

    /// Request payload failed validation
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Request body could not be read as connection details
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DiscoveryError {
    /// Create a new malformed endpoint error
    pub fn malformed_endpoint<S: Into<String>>(database_id: S) -> Self {
        Self::MalformedEndpoint {
            database_id: database_id.into(),
        }
    }

    /// Create a new missing snapshot policy error
    pub fn missing_snapshot_policy<S: Into<String>>(database_id: S) -> Self {
        Self::MissingSnapshotPolicy {
            database_id: database_id.into(),
        }
    }

    /// Create a new credentials error
    pub fn credentials<S: Into<String>>(address: S) -> Self {
        Self::Credentials {
            address: address.into(),
        }
    }

    /// Create a new connection error
    pub fn connection<S1: Into<String>, S2: Into<String>>(address: S1, reason: S2) -> Self {
        Self::Connection {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Create a new invalid request error
    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error describes corrupt data returned by the cluster
    pub fn is_upstream_data_error(&self) -> bool {
        matches!(
            self,
            DiscoveryError::MalformedEndpoint { .. } | DiscoveryError::MissingSnapshotPolicy { .. }
        )
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DiscoveryError::Credentials { .. } => StatusCode::FORBIDDEN,
            DiscoveryError::Connection { .. }
            | DiscoveryError::Validation(_)
            | DiscoveryError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            DiscoveryError::MalformedEndpoint { .. }
            | DiscoveryError::MissingSnapshotPolicy { .. } => StatusCode::BAD_GATEWAY,
            DiscoveryError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error (for API responses and events)
    pub fn error_code(&self) -> &'static str {
        match self {
            DiscoveryError::MalformedEndpoint { .. } => "MALFORMED_ENDPOINT",
            DiscoveryError::MissingSnapshotPolicy { .. } => "MISSING_SNAPSHOT_POLICY",
            DiscoveryError::Credentials { .. } => "INCORRECT_CREDENTIALS",
            DiscoveryError::Connection { .. } => "CONNECTION_ERROR",
            DiscoveryError::Validation(_) | DiscoveryError::InvalidRequest { .. } => {
                "VALIDATION_ERROR"
            }
            DiscoveryError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Message suitable for display in the GUI
    pub fn user_message(&self) -> String {
        match self {
            DiscoveryError::MalformedEndpoint { .. }
            | DiscoveryError::MissingSnapshotPolicy { .. } => {
                UNREADABLE_DATABASES_MESSAGE.to_string()
            }
            DiscoveryError::Credentials { address } => format!(
                "Could not connect to {}, please check the Username or Password.",
                address
            ),
            DiscoveryError::Connection { address, .. } => format!(
                "Could not connect to {}, please check the connection details.",
                address
            ),
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for DiscoveryError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_request(rejection.body_text())
    }
}

impl IntoResponse for DiscoveryError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_code = self.error_code();

        tracing::error!(
            error_code = error_code,
            error_message = %self,
            "Enterprise discovery error"
        );

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": self.user_message(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }));

        (status_code, body).into_response()
    }
}
