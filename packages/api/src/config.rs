//! Server configuration, read once from `hospadmin.toml`.
//!
//! The path comes from `HOSPADMIN_CONFIG` (loaded through `dotenvy`) and
//! defaults to `hospadmin.toml` in the working directory. A missing file is
//! the default configuration; a file that fails to parse is logged and also
//! falls back to the defaults.

use std::sync::OnceLock;

use store::HospAdminConfig;

static CONFIG: OnceLock<HospAdminConfig> = OnceLock::new();

pub fn app_config() -> &'static HospAdminConfig {
    CONFIG.get_or_init(load)
}

fn load() -> HospAdminConfig {
    dotenvy::dotenv().ok();
    let path = std::env::var("HOSPADMIN_CONFIG")
        .unwrap_or_else(|_| HospAdminConfig::filename().to_string());

    match std::fs::read_to_string(&path) {
        Ok(text) => parse_or_default(&path, &text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("No {} found, using default configuration", path);
            HospAdminConfig::default()
        }
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", path, e);
            HospAdminConfig::default()
        }
    }
}

fn parse_or_default(path: &str, text: &str) -> HospAdminConfig {
    HospAdminConfig::from_toml(text).unwrap_or_else(|e| {
        tracing::warn!("Invalid {}: {}", path, e);
        HospAdminConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_file_falls_back() {
        let config = parse_or_default("bad.toml", "[listing\npage_size = ");
        assert_eq!(config, HospAdminConfig::default());
    }

    #[test]
    fn test_reserved_accounts_replaced() {
        let config = parse_or_default(
            "custom.toml",
            "[[auth.reserved]]\nidentifier = \"99\"\nsecret = \"s\"\nlabel = \"Ops\"\n",
        );
        assert_eq!(config.auth.reserved.len(), 1);
        assert!(config.auth.require_active);
    }
}
