//! # Application configuration: `hospadmin.toml`
//!
//! Deployment settings read by the server at startup (path from the
//! `HOSPADMIN_CONFIG` environment variable) and baked into the client as
//! defaults.
//!
//! ## Structure
//!
//! ```toml
//! [session]
//! key = "hospadmin.session"     # storage key for the persisted session
//!
//! [listing]
//! page_size = 10                # rows per page in every list screen
//!
//! [database]
//! max_connections = 5           # pool size per server process
//! acquire_timeout_secs = 5      # wait for a free connection before failing
//!
//! [auth]
//! require_active = true         # reject inactive / suspended profiles
//!
//! [[auth.reserved]]
//! identifier = "00000000000"
//! secret = "admin123"
//! label = "Super Admin"
//! ```
//!
//! Every section is `#[serde(default)]`, so a missing or empty file is the
//! default configuration. Declaring any `[[auth.reserved]]` entry replaces the
//! built-in reserved accounts entirely; an empty list disables the bypass.

use serde::{Deserialize, Serialize};

use crate::session::SESSION_KEY;

/// Top-level configuration stored in `hospadmin.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HospAdminConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_key")]
    pub key: String,
}

fn default_session_key() -> String {
    SESSION_KEY.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            key: default_session_key(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Rows per page. Values below 1 are treated as 1.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    10
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Postgres pool limits. Requests that cannot get a connection within the
/// timeout fail, and list screens fall back to their offline data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

/// A fixed identifier/secret pair that signs in to the master unit without a lookup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReservedAccount {
    pub identifier: String,
    pub secret: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_require_active")]
    pub require_active: bool,
    #[serde(default = "default_reserved")]
    pub reserved: Vec<ReservedAccount>,
}

fn default_require_active() -> bool {
    true
}

fn default_reserved() -> Vec<ReservedAccount> {
    vec![
        ReservedAccount {
            identifier: "00000000000".to_string(),
            secret: "admin123".to_string(),
            label: "Super Admin".to_string(),
        },
        ReservedAccount {
            identifier: "11111111111".to_string(),
            secret: "gestor123".to_string(),
            label: "Gestor Geral".to_string(),
        },
    ]
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            require_active: default_require_active(),
            reserved: default_reserved(),
        }
    }
}

impl HospAdminConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "hospadmin.toml"
    }

    /// Effective page size, never zero.
    pub fn page_size(&self) -> usize {
        self.listing.page_size.max(1)
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = HospAdminConfig::from_toml("").unwrap();
        assert_eq!(config, HospAdminConfig::default());
        assert_eq!(config.session.key, "hospadmin.session");
        assert_eq!(config.page_size(), 10);
        assert!(config.auth.require_active);
        assert_eq!(config.auth.reserved.len(), 2);
        assert_eq!(config.auth.reserved[0].identifier, "00000000000");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.acquire_timeout_secs, 5);
    }

    #[test]
    fn test_partial_sections() {
        let config = HospAdminConfig::from_toml(
            r#"
            [listing]
            page_size = 0

            [auth]
            require_active = false
            reserved = []
            "#,
        )
        .unwrap();
        assert_eq!(config.page_size(), 1);
        assert!(!config.auth.require_active);
        assert!(config.auth.reserved.is_empty());
        assert_eq!(config.session, SessionConfig::default());
    }

    #[test]
    fn test_database_limits() {
        let config = HospAdminConfig::from_toml("[database]\nmax_connections = 20\n").unwrap();
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.acquire_timeout_secs, 5);
    }
}
