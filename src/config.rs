//! Configuration loading from a local JSON file.
//!
//! ```json
//! {
//!   "tenantId": "...",
//!   "clientId": "...",
//!   "clientSecret": "...",
//!   "licenseErrorHints": { "usageLocation": ["usage location"] }
//! }
//! ```
//!
//! The three credential fields are required and must be non-empty.
//! `licenseErrorHints` is optional and overrides the markers used to classify
//! rejected license assignments.

use std::path::Path;

use serde::Deserialize;

use crate::error::{GraphError, Result};
use crate::licenses::FailureHints;

/// Points users at the shipped template.
const EXAMPLE_HINT: &str = "See config.json.example for the required format";

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub license_error_hints: FailureHints,
}

impl Config {
    /// Reads, parses and validates the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GraphError::Config {
                message: format!(
                    "config file not found: {}\n\nPlease create a config.json file with your \
                     Azure AD credentials.\n{EXAMPLE_HINT}",
                    path.display()
                ),
            });
        }

        let data = std::fs::read_to_string(path).map_err(|e| GraphError::Config {
            message: format!("failed to read config file {}: {e}", path.display()),
        })?;

        Self::from_json(&data)
    }

    /// Parses and validates configuration text.
    pub fn from_json(data: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(data).map_err(|e| GraphError::Config {
            message: format!("failed to parse config file: {e}\n\nEnsure the file contains valid JSON"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Names of required fields that are absent or empty, in declaration order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("tenantId", &self.tenant_id),
            ("clientId", &self.client_id),
            ("clientSecret", &self.client_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            return Ok(());
        }
        Err(GraphError::Config {
            message: format!(
                "config file is missing required fields: {}\n\n{EXAMPLE_HINT}",
                missing.join(", ")
            ),
        })
    }
}
