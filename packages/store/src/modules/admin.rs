//! Administration: user profiles, health units and the audit log.

use serde::{Deserialize, Serialize};

use super::{field, FieldKind, FieldSpec, Screen, UNIT_FIELD};
use crate::models::{HealthUnit, Profile};
use crate::records::{Collection, Record};

pub const PROFILE_STATUS_OPTIONS: &[(&str, &str)] = &[
    ("active", "Active"),
    ("inactive", "Inactive"),
    ("suspended", "Suspended"),
];

pub const UNIT_TYPE_OPTIONS: &[(&str, &str)] = &[
    ("Hospital", "Hospital"),
    ("UPA", "UPA"),
    ("UBS", "UBS"),
    ("Maternidade", "Maternidade"),
    ("Laboratório", "Laboratório"),
    ("Administrativo", "Administrativo"),
];

impl Screen for Profile {
    const NOUN: &'static str = "User";
    const FIELDS: &'static [FieldSpec] = &[
        field("name", "Name", FieldKind::Text),
        field("email", "E-mail", FieldKind::Email),
        field("role", "Role", FieldKind::Text),
        field("department", "Department", FieldKind::Text),
        field("status", "Status", FieldKind::Select(PROFILE_STATUS_OPTIONS)),
        UNIT_FIELD,
    ];
    const CATEGORY_FIELDS: &'static [&'static str] = &["status"];
}

impl Screen for HealthUnit {
    const NOUN: &'static str = "Health Unit";
    const FIELDS: &'static [FieldSpec] = &[
        field("name", "Name", FieldKind::Text),
        field("type", "Type", FieldKind::Select(UNIT_TYPE_OPTIONS)),
    ];
    const CATEGORY_FIELDS: &'static [&'static str] = &["type"];
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    #[default]
    Info,
    Warning,
    Critical,
}

pub const LOG_LEVEL_OPTIONS: &[(&str, &str)] = &[
    ("info", "Info"),
    ("warning", "Warning"),
    ("critical", "Critical"),
];

/// One entry of the administrative audit trail.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: String,
    pub unit_id: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    pub user: String,
    pub action: String,
    pub module: String,
    pub level: LogLevel,
}

impl AuditLog {
    /// New entry stamped with the current UTC time.
    pub fn now(unit_id: &str, user: &str, action: &str, module: &str, level: LogLevel) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            unit_id: unit_id.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            user: user.to_string(),
            action: action.to_string(),
            module: module.to_string(),
            level,
        }
    }
}

impl Record for AuditLog {
    const COLLECTION: Collection = Collection::AuditLogs;
    const SEARCH_FIELDS: &'static [&'static str] = &["user", "action", "module"];
    const REQUIRED_FIELDS: &'static [&'static str] = &["user", "action"];
    const DATE_FIELD: Option<&'static str> = Some("timestamp");

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Screen for AuditLog {
    const NOUN: &'static str = "Log Entry";
    const FIELDS: &'static [FieldSpec] = &[
        field("timestamp", "When", FieldKind::Text),
        field("user", "User", FieldKind::Text),
        field("action", "Action", FieldKind::Text),
        field("module", "Module", FieldKind::Text),
        field("level", "Level", FieldKind::Select(LOG_LEVEL_OPTIONS)),
    ];
    const CATEGORY_FIELDS: &'static [&'static str] = &["level", "module"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{parse_date, ListView};
    use crate::models::{ProfileStatus, UnitType};
    use crate::modules::assert_options_deserialize;

    #[test]
    fn test_options_match_serde() {
        assert_options_deserialize::<ProfileStatus>(PROFILE_STATUS_OPTIONS);
        assert_options_deserialize::<UnitType>(UNIT_TYPE_OPTIONS);
        assert_options_deserialize::<LogLevel>(LOG_LEVEL_OPTIONS);
    }

    #[test]
    fn test_audit_log_timestamp_is_date_filterable() {
        let entry = AuditLog::now("h1", "admin", "Login", "Auth", LogLevel::Info);
        let date = parse_date(&entry.timestamp).unwrap();
        let mut view = ListView::default();
        view.set_date_range(Some(date), Some(date));
        assert_eq!(view.filter(&[entry]).len(), 1);
    }

    #[test]
    fn test_profile_filter_by_status() {
        let profiles = vec![
            Profile { id: "1".into(), name: "Ana".into(), ..Profile::default() },
            Profile {
                id: "2".into(),
                name: "Bruno".into(),
                status: ProfileStatus::Inactive,
                ..Profile::default()
            },
        ];
        let mut view = ListView::default();
        view.set_category("status", Some("inactive"));
        let visible = view.filter(&profiles);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Bruno");
        assert_eq!(visible[0].display("status"), "Inactive");
    }
}
