//! # Core identity models: health units, profiles and the session record
//!
//! These types cross every boundary in HospAdmin: they are stored by a
//! [`crate::RecordStore`], persisted by the [`crate::SessionStore`] and sent
//! between server functions and the browser. All of them are
//! `Serialize + Deserialize` and use the wire names of the persisted JSON.
//!
//! | Type | Represents |
//! |------|------------|
//! | [`HealthUnit`] | A facility (hospital, UPA, UBS, maternity, lab) or the synthetic master unit. |
//! | [`UnitType`] | Closed set of facility kinds. Serialised with its display label (`"UPA"`, `"Laboratório"`...). |
//! | [`Profile`] | Stored identity of a staff member, linked to exactly one unit through `unit_id`. |
//! | [`ProfileStatus`] | `active`, `inactive` or `suspended`. Only `active` profiles may sign in. |
//! | [`Session`] | The persisted session value: `{"unit": {...}}`. |

use serde::{Deserialize, Serialize};

use crate::records::{Collection, Record};

/// Identifier of the synthetic cross-unit administrative unit.
pub const MASTER_UNIT_ID: &str = "master";

/// Kind of facility a [`HealthUnit`] represents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    #[default]
    Hospital,
    #[serde(rename = "UPA")]
    Upa,
    #[serde(rename = "UBS")]
    Ubs,
    Maternidade,
    #[serde(rename = "Laboratório")]
    Laboratorio,
    Administrativo,
}

impl UnitType {
    pub const ALL: [UnitType; 6] = [
        UnitType::Hospital,
        UnitType::Upa,
        UnitType::Ubs,
        UnitType::Maternidade,
        UnitType::Laboratorio,
        UnitType::Administrativo,
    ];

    /// Label used in the persisted JSON and on screen.
    pub fn label(&self) -> &'static str {
        match self {
            UnitType::Hospital => "Hospital",
            UnitType::Upa => "UPA",
            UnitType::Ubs => "UBS",
            UnitType::Maternidade => "Maternidade",
            UnitType::Laboratorio => "Laboratório",
            UnitType::Administrativo => "Administrativo",
        }
    }
}

/// A facility that scopes a user's session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HealthUnit {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
}

impl HealthUnit {
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_type: UnitType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit_type,
        }
    }

    /// The synthetic, never-persisted unit used by reserved administrator accounts.
    pub fn master() -> Self {
        Self::new(
            MASTER_UNIT_ID,
            "Visão Geral (Master)",
            UnitType::Administrativo,
        )
    }

    pub fn is_master(&self) -> bool {
        self.id == MASTER_UNIT_ID
    }
}

impl Record for HealthUnit {
    const COLLECTION: Collection = Collection::HealthUnits;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "type"];
    const REQUIRED_FIELDS: &'static [&'static str] = &["name", "type"];

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Account status of a [`Profile`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    #[default]
    Active,
    Inactive,
    Suspended,
}

impl ProfileStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ProfileStatus::Active => "active",
            ProfileStatus::Inactive => "inactive",
            ProfileStatus::Suspended => "suspended",
        }
    }
}

impl std::fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Stored identity record for a staff user.
///
/// Credentials are deliberately not part of this type: they live beside the
/// profile in the credential table and are only read by a
/// [`crate::auth::SecretVerifier`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub role: String,
    pub email: String,
    pub status: ProfileStatus,
    pub department: String,
    pub unit_id: String,
}

impl Record for Profile {
    const COLLECTION: Collection = Collection::Profiles;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email", "role", "department"];
    const REQUIRED_FIELDS: &'static [&'static str] = &["name", "email", "role", "unit_id"];

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// The value persisted under the session key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub unit: HealthUnit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_wire_format() {
        let session = Session {
            unit: HealthUnit::master(),
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "unit": {
                    "id": "master",
                    "name": "Visão Geral (Master)",
                    "type": "Administrativo"
                }
            })
        );
    }

    #[test]
    fn test_unit_type_labels_match_serde() {
        for unit_type in UnitType::ALL {
            let json = serde_json::to_value(unit_type).unwrap();
            assert_eq!(json, serde_json::Value::String(unit_type.label().to_string()));
        }
    }

    #[test]
    fn test_profile_status_lowercase() {
        let status: ProfileStatus = serde_json::from_str("\"suspended\"").unwrap();
        assert_eq!(status, ProfileStatus::Suspended);
        assert_eq!(status.to_string(), "suspended");
    }
}
