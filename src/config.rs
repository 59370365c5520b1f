//! Source configuration.
//!
//! [`SourceConfig`] carries the knobs the fetchers and the translator are
//! constructed with. The components never read the environment or files
//! themselves; the loaders here exist for the command-line front end.
//!
//! Layering used by `dataspace-import` (later layers win):
//!
//! 1. [`SourceConfig::default`]
//! 2. [`SourceConfig::from_env`] (`DSPACE_HOSTNAME`, `CONTRACT_NUMBER`)
//! 3. a TOML file, see [`ConfigFile`]
//! 4. command-line flags
//!
//! ```
//! use dataspace_osti::SourceConfig;
//!
//! let config = SourceConfig::default()
//!     .merge_toml_str("hostname = \"dspace.example.org\"\ncontract_no = \"AC02-09CH11466\"")?;
//! assert_eq!(config.hostname, "dspace.example.org");
//! assert_eq!(config.dataset_type, "SM");
//! # Ok::<(), dataspace_osti::ImportError>(())
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{ImportError, Result};

/// Default DSpace REST host.
pub const DEFAULT_HOSTNAME: &str = "dataspace.princeton.edu";

/// Default OSTI dataset type (`SM`, specialized mix).
pub const DEFAULT_DATASET_TYPE: &str = "SM";

/// Environment variable overriding the source host.
pub const HOSTNAME_ENV: &str = "DSPACE_HOSTNAME";

/// Environment variable providing the default contract number.
pub const CONTRACT_NUMBER_ENV: &str = "CONTRACT_NUMBER";

/// Connection and translation defaults for one import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// DSpace host name, without scheme (`dataspace.princeton.edu`)
    pub hostname: String,
    /// DOE contract number stamped on every translated record
    pub contract_no: Option<String>,
    /// OSTI dataset type stamped on every translated record
    pub dataset_type: String,
    /// Verify the source's TLS certificate
    pub verify_tls: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            hostname: DEFAULT_HOSTNAME.to_string(),
            contract_no: None,
            dataset_type: DEFAULT_DATASET_TYPE.to_string(),
            verify_tls: true,
        }
    }
}

/// On-disk configuration. Every key is optional.
///
/// ```toml
/// hostname = "dataspace.princeton.edu"
/// contract_no = "AC02-09CH11466"
/// dataset_type = "SM"
/// verify_tls = true
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Overrides [`SourceConfig::hostname`]
    pub hostname: Option<String>,
    /// Overrides [`SourceConfig::contract_no`]
    pub contract_no: Option<String>,
    /// Overrides [`SourceConfig::dataset_type`]
    pub dataset_type: Option<String>,
    /// Overrides [`SourceConfig::verify_tls`]
    pub verify_tls: Option<bool>,
}

impl SourceConfig {
    /// Defaults overlaid with `DSPACE_HOSTNAME` and `CONTRACT_NUMBER`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().merge_vars(|name| std::env::var(name).ok())
    }

    /// Overlay values produced by `lookup` for the two environment keys.
    ///
    /// Split out from [`from_env`](Self::from_env) so the overlay can be
    /// exercised without touching the process environment.
    #[must_use]
    pub fn merge_vars<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(hostname) = lookup(HOSTNAME_ENV).filter(|v| !v.is_empty()) {
            self.hostname = hostname;
        }
        if let Some(contract_no) = lookup(CONTRACT_NUMBER_ENV).filter(|v| !v.is_empty()) {
            self.contract_no = Some(contract_no);
        }
        self
    }

    /// Apply the keys present in `file`.
    #[must_use]
    pub fn merge_file(mut self, file: ConfigFile) -> Self {
        if let Some(hostname) = file.hostname {
            self.hostname = hostname;
        }
        if let Some(contract_no) = file.contract_no {
            self.contract_no = Some(contract_no);
        }
        if let Some(dataset_type) = file.dataset_type {
            self.dataset_type = dataset_type;
        }
        if let Some(verify_tls) = file.verify_tls {
            self.verify_tls = verify_tls;
        }
        self
    }

    /// Parse TOML text and apply it.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Config`] if the text is not valid TOML or has
    /// unknown keys.
    pub fn merge_toml_str(self, text: &str) -> Result<Self> {
        let file: ConfigFile =
            toml::from_str(text).map_err(|e| ImportError::Config(e.to_string()))?;
        Ok(self.merge_file(file))
    }

    /// Apply the TOML file at `path` if it exists.
    ///
    /// A missing file leaves the configuration unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Config`] if the file exists but cannot be read
    /// or parsed.
    pub fn merge_toml_file(self, path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(self);
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ImportError::Config(format!("{}: {e}", path.display())))?;
        let file: ConfigFile = toml::from_str(&text)
            .map_err(|e| ImportError::Config(format!("{}: {e}", path.display())))?;
        Ok(self.merge_file(file))
    }

    /// Base URL of the DSpace REST API for this host.
    #[must_use]
    pub fn rest_base_url(&self) -> String {
        format!("https://{}/rest", self.hostname.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SourceConfig::default();
        assert_eq!(config.hostname, "dataspace.princeton.edu");
        assert_eq!(config.contract_no, None);
        assert_eq!(config.dataset_type, "SM");
        assert!(config.verify_tls);
    }

    #[test]
    fn test_env_overlay() {
        let config = SourceConfig::default().merge_vars(|name| match name {
            HOSTNAME_ENV => Some("dspace.example.org".to_string()),
            CONTRACT_NUMBER_ENV => Some("AC02-09CH11466".to_string()),
            _ => None,
        });
        assert_eq!(config.hostname, "dspace.example.org");
        assert_eq!(config.contract_no.as_deref(), Some("AC02-09CH11466"));
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let config = SourceConfig::default().merge_vars(|_| Some(String::new()));
        assert_eq!(config, SourceConfig::default());
    }

    #[test]
    fn test_toml_overlay_keeps_absent_keys() {
        let config = SourceConfig::default()
            .merge_toml_str("dataset_type = \"ND\"\nverify_tls = false\n")
            .unwrap();
        assert_eq!(config.hostname, DEFAULT_HOSTNAME);
        assert_eq!(config.dataset_type, "ND");
        assert!(!config.verify_tls);
    }

    #[test]
    fn test_unknown_toml_key_is_rejected() {
        let err = SourceConfig::default()
            .merge_toml_str("username = \"someone\"")
            .unwrap_err();
        assert!(matches!(err, ImportError::Config(_)));
    }

    #[test]
    fn test_rest_base_url() {
        let config = SourceConfig {
            hostname: "dspace.example.org/".to_string(),
            ..SourceConfig::default()
        };
        assert_eq!(config.rest_base_url(), "https://dspace.example.org/rest");
    }
}
