//! Configuration module for the tweetsweep collector.
//!
//! This module loads the Twitter API credentials from a local secrets file.
//! The file is required at startup; the collector never reaches the
//! pagination loop without a complete set of credentials.

use log::{debug, error, info, warn};
use serde::Deserialize;
use std::path::Path;

/// Default location of the credentials file, relative to the working directory.
pub const DEFAULT_SECRETS_FILE: &str = "secrets.toml";

/// Credentials for OAuth 1.0a authentication against the Twitter API.
///
/// All four values come from the app page of the Twitter Developer Portal and
/// are read from a local TOML file that is never distributed with the binary:
///
/// ```toml
/// consumer_key = "..."
/// consumer_secret = "..."
/// access_token = "..."
/// access_token_secret = "..."
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCredentials {
    /// The API key identifying the consumer application
    pub consumer_key: String,
    /// The API secret paired with the consumer key
    pub consumer_secret: String,
    /// The Access Token for the acting user
    pub access_token: String,
    /// The Access Token Secret paired with the access token
    pub access_token_secret: String,
}

/// Masks a secret for logging, keeping at most the first and last 4 characters.
fn mask_secret(secret: &str) -> String {
    let len = secret.len();
    if len > 12 {
        format!("{}...{}", &secret[..4], &secret[len - 4..])
    } else if len > 4 {
        format!("{}...", &secret[..4])
    } else {
        "...".to_string()
    }
}

impl ApiCredentials {
    /// Loads credentials from a TOML file at the given path.
    ///
    /// # Parameters
    ///
    /// - `path`: Location of the secrets file (usually `secrets.toml`)
    ///
    /// # Returns
    ///
    /// - `Ok(ApiCredentials)`: If the file exists, parses, and every value is non-empty
    /// - `Err(Box<dyn std::error::Error + Send + Sync>)`: If the file is missing,
    ///   malformed, or any credential is empty
    ///
    /// # Errors
    ///
    /// A missing file is a fatal startup condition and produces a directive
    /// message telling the operator to create the file.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        info!("Loading Twitter API credentials from {}", path.display());

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                error!("Failed to read credentials file {}: {}", path.display(), e);
                return Err(format!(
                    "Remember to create a {} file with the Twitter API keys \
                     (consumer_key, consumer_secret, access_token, access_token_secret): {}",
                    path.display(),
                    e
                )
                .into());
            }
        };

        let credentials: ApiCredentials = toml::from_str(&contents).map_err(|e| {
            error!("Failed to parse credentials file {}: {}", path.display(), e);
            format!("Malformed credentials file {}: {}", path.display(), e)
        })?;

        credentials.validate()?;

        debug!(
            "Consumer key (masked): {}",
            mask_secret(&credentials.consumer_key)
        );
        debug!(
            "Access token (masked): {}",
            mask_secret(&credentials.access_token)
        );

        info!("Twitter API credentials loaded successfully");
        Ok(credentials)
    }

    /// Checks that every credential value is present and non-empty.
    fn validate(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let fields = [
            ("consumer_key", &self.consumer_key),
            ("consumer_secret", &self.consumer_secret),
            ("access_token", &self.access_token),
            ("access_token_secret", &self.access_token_secret),
        ];

        for (name, value) in fields {
            if value.is_empty() {
                error!("Credential '{}' is empty", name);
                return Err(format!("Credential '{}' cannot be empty", name).into());
            }
            if value.len() < 10 {
                warn!(
                    "Credential '{}' seems unusually short ({} characters)",
                    name,
                    value.len()
                );
            }
        }

        Ok(())
    }
}
