//! Types crossing the server/client boundary next to the store records.

use serde::{Deserialize, Serialize};
use store::{HealthUnit, HospAdminConfig};

/// Outcome of a login attempt. Rejections carry the message shown under the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoginReply {
    SignedIn(HealthUnit),
    Rejected(String),
}

/// The part of the server configuration the browser needs. Never includes
/// reserved account secrets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    pub page_size: usize,
    pub session_key: String,
}

impl From<&HospAdminConfig> for UiSettings {
    fn from(config: &HospAdminConfig) -> Self {
        Self {
            page_size: config.page_size(),
            session_key: config.session.key.clone(),
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self::from(&HospAdminConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_follow_config() {
        let config = HospAdminConfig::from_toml("[listing]\npage_size = 25\n").unwrap();
        let settings = UiSettings::from(&config);
        assert_eq!(settings.page_size, 25);
        assert_eq!(settings.session_key, "hospadmin.session");
        assert_eq!(UiSettings::default().page_size, 10);
    }
}
