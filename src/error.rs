//! Typed error hierarchy for the graph-user-admin crate.
//!
//! Every variant maps to a real failure boundary:
//! - `Config` covers the local JSON configuration file.
//! - `Auth` covers the Microsoft identity platform token endpoint.
//! - `Api` and `NotFound` cover Microsoft Graph REST responses.
//! - `License` covers structured license-assignment failures that have been
//!   classified and enriched with remediation guidance.
//! - `Parse`, `Network` and `Io` wrap the underlying library errors.
//!
//! `Api` always preserves the raw response body. Graph error envelopes carry
//! the codes and messages needed to diagnose permission and request-shape
//! problems, and `error_for_status()` would discard them.

use std::fmt;

use reqwest::StatusCode;

/// Unified error type for all graph-user-admin operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The configuration file is missing, unreadable, malformed, or lacks
    /// required fields. Raised before any network activity.
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable description, naming the path or missing fields.
        message: String,
    },

    /// The token endpoint rejected the credentials or returned a body that
    /// could not be parsed.
    #[error("authentication failed: {message}")]
    Auth {
        /// Description including the HTTP status and raw body when available.
        message: String,
        /// The underlying transport or parse error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Microsoft Graph returned a status other than the one the operation
    /// expects.
    #[error("request failed ({status}): {body}")]
    Api {
        /// The HTTP status code returned by Graph.
        status: StatusCode,
        /// The raw response body text.
        body: String,
    },

    /// A single-resource lookup returned 404.
    #[error("{resource} not found: {id} (status 404): {body}")]
    NotFound {
        /// Resource family, e.g. `"user"`.
        resource: &'static str,
        /// The identifier that was looked up.
        id: String,
        /// The raw response body text.
        body: String,
    },

    /// A license assignment was rejected with a structured Graph error.
    #[error("license assignment failed: {message}{remedy}")]
    License {
        /// The `error.message` extracted from the Graph error envelope.
        message: String,
        /// Remediation guidance for recognized failure classes.
        remedy: Remedy,
    },

    /// JSON deserialization of a response body failed.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Transport-level failure (DNS, TCP, TLS). No HTTP status is available.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Local I/O failure (config file, terminal prompt, output stream).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Remediation guidance attached to a classified license failure.
///
/// Renders as an empty string for [`Remedy::None`], so the `License` variant's
/// message reads naturally whether or not guidance applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remedy {
    /// The message did not match any known failure class.
    None,
    /// The target user has no usage location set.
    UserUsageLocation,
    /// Not enough units available, or another license-related rejection for a user.
    UserCapacity,
    /// Not enough units available for group-based licensing.
    GroupCapacity,
    /// Members of the target group lack a usage location.
    GroupUsageLocation,
}

impl fmt::Display for Remedy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Remedy::None => Ok(()),
            Remedy::UserUsageLocation => write!(
                f,
                "\n\nUser must have a usageLocation set. Use:\n  \
                 gua users update <UPN> usageLocation <country-code>\n  \
                 Example: gua users update user@example.com usageLocation US\n\n\
                 If usageLocation is already set:\n  \
                 - Not enough available licenses (check with 'gua licenses list-skus')"
            ),
            Remedy::UserCapacity => write!(
                f,
                "\n\nPossible causes:\n  \
                 - Not enough available licenses (check with 'gua licenses list-skus')\n  \
                 - User doesn't have usageLocation set (use 'gua users update <UPN> usageLocation US')"
            ),
            Remedy::GroupCapacity => write!(
                f,
                "\n\nPossible causes:\n  \
                 - Not enough available licenses (check with 'gua licenses list-skus')\n  \
                 - Group members don't have usageLocation set"
            ),
            Remedy::GroupUsageLocation => write!(
                f,
                "\n\nEvery group member must have a usageLocation set. Use:\n  \
                 gua users update <UPN> usageLocation <country-code>\n\n\
                 If every member has one:\n  \
                 - Not enough available licenses (check with 'gua licenses list-skus')"
            ),
        }
    }
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, GraphError>;
