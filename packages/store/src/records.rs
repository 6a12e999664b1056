//! # Record Store contract
//!
//! Every screen in HospAdmin reads and writes table-shaped data through the
//! [`RecordStore`] trait. The application only needs five shapes of request,
//! so any backend that can answer them is substitutable: the in-memory
//! [`crate::MemoryRecordStore`] used by tests and offline builds, the
//! PostgreSQL store in the `api` crate, or the HTTP-backed store the browser
//! uses to reach the server.
//!
//! ## [`Record`]
//!
//! A record type declares which [`Collection`] it lives in, how its identity is
//! read and written, and which of its fields are searchable, required, or carry
//! the date used for range filters. Field access by name (`field_text`,
//! `with_field`) is derived from the serde representation, so list filters, CSV
//! export and the generic edit form never need per-type code.
//!
//! ## [`Filter`]
//!
//! `Eq` matches one field, `AnyOf` matches when any of its `(field, value)`
//! pairs does (the OR-equality select used by login lookups).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Named tables reachable through a [`RecordStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    HealthUnits,
    Profiles,
    Beds,
    Patients,
    KpiMetrics,
    Documents,
    Shifts,
    AuditLogs,
    Authorizations,
    Notifications,
    NeonatalScreenings,
}

impl Collection {
    pub const ALL: [Collection; 11] = [
        Collection::HealthUnits,
        Collection::Profiles,
        Collection::Beds,
        Collection::Patients,
        Collection::KpiMetrics,
        Collection::Documents,
        Collection::Shifts,
        Collection::AuditLogs,
        Collection::Authorizations,
        Collection::Notifications,
        Collection::NeonatalScreenings,
    ];

    /// Table name, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::HealthUnits => "health_units",
            Collection::Profiles => "profiles",
            Collection::Beds => "beds",
            Collection::Patients => "patients",
            Collection::KpiMetrics => "kpi_metrics",
            Collection::Documents => "documents",
            Collection::Shifts => "shifts",
            Collection::AuditLogs => "audit_logs",
            Collection::Authorizations => "authorizations",
            Collection::Notifications => "notifications",
            Collection::NeonatalScreenings => "neonatal_screenings",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by record stores and by field access on records.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{collection} record {id} not found")]
    NotFound { collection: Collection, id: String },
    #[error("{collection} record {id} already exists")]
    Conflict { collection: Collection, id: String },
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid value for field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("record store error: {0}")]
    Backend(String),
}

/// A row type stored in one [`Collection`].
pub trait Record: Clone + PartialEq + Serialize + DeserializeOwned {
    const COLLECTION: Collection;
    /// Fields matched by the free-text search box.
    const SEARCH_FIELDS: &'static [&'static str];
    /// Fields that must be non-blank for a form submit to succeed.
    const REQUIRED_FIELDS: &'static [&'static str] = &[];
    /// Field holding an ISO `YYYY-MM-DD` date, used by range filters.
    const DATE_FIELD: Option<&'static str> = None;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);

    /// Text rendering of a field, `None` when absent or null.
    fn field_text(&self, field: &str) -> Option<String> {
        let value = serde_json::to_value(self).ok()?;
        value_text(value.get(field)?)
    }

    /// Copy of `self` with `field` replaced by `text`, coerced to the field's JSON kind.
    fn with_field(&self, field: &str, text: &str) -> Result<Self, StoreError> {
        let mut value = serde_json::to_value(self)?;
        let object = value.as_object_mut().ok_or_else(|| StoreError::InvalidField {
            field: field.to_string(),
            reason: "record is not an object".to_string(),
        })?;
        let current = object.get(field).ok_or_else(|| StoreError::InvalidField {
            field: field.to_string(),
            reason: "unknown field".to_string(),
        })?;
        let replacement = coerce(field, current, text)?;
        object.insert(field.to_string(), replacement);

        match serde_json::from_value::<Self>(value.clone()) {
            Ok(record) => Ok(record),
            // Optional fields accept a blank input as "unset".
            Err(_) if text.trim().is_empty() => {
                object_insert(&mut value, field, Value::Null);
                serde_json::from_value(value).map_err(|e| invalid(field, e))
            }
            Err(e) => Err(invalid(field, e)),
        }
    }
}

fn invalid(field: &str, e: serde_json::Error) -> StoreError {
    StoreError::InvalidField {
        field: field.to_string(),
        reason: e.to_string(),
    }
}

fn object_insert(value: &mut Value, field: &str, replacement: Value) {
    if let Some(object) = value.as_object_mut() {
        object.insert(field.to_string(), replacement);
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn coerce(field: &str, current: &Value, text: &str) -> Result<Value, StoreError> {
    let trimmed = text.trim();
    match current {
        // A cleared number input reads as zero so it can be retyped.
        Value::Number(n) if trimmed.is_empty() => Ok(if n.is_f64() { Value::from(0.0) } else { Value::from(0) }),
        Value::Number(n) if n.is_f64() => trimmed
            .replace(',', ".")
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| StoreError::InvalidField {
                field: field.to_string(),
                reason: format!("`{text}` is not a number"),
            }),
        Value::Number(_) => trimmed
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| StoreError::InvalidField {
                field: field.to_string(),
                reason: format!("`{text}` is not a whole number"),
            }),
        Value::Bool(_) => trimmed
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|_| StoreError::InvalidField {
                field: field.to_string(),
                reason: format!("`{text}` is not true/false"),
            }),
        Value::Null if trimmed.is_empty() => Ok(Value::Null),
        _ => Ok(Value::String(text.to_string())),
    }
}

/// Equality predicates understood by every [`RecordStore`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    Eq { field: String, value: String },
    AnyOf(Vec<(String, String)>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn any_of<F: Into<String>, V: Into<String>>(pairs: impl IntoIterator<Item = (F, V)>) -> Self {
        Filter::AnyOf(
            pairs
                .into_iter()
                .map(|(f, v)| (f.into(), v.into()))
                .collect(),
        )
    }

    /// Evaluate against a serialized record.
    pub fn matches_value(&self, record: &Value) -> bool {
        let field_is = |field: &str, value: &str| {
            record
                .get(field)
                .and_then(value_text)
                .is_some_and(|text| text == value)
        };
        match self {
            Filter::Eq { field, value } => field_is(field, value),
            Filter::AnyOf(pairs) => pairs.iter().any(|(f, v)| field_is(f, v)),
        }
    }

    pub fn matches<R: Record>(&self, record: &R) -> bool {
        serde_json::to_value(record)
            .map(|value| self.matches_value(&value))
            .unwrap_or(false)
    }
}

/// Async, table-scoped access to a record backend.
pub trait RecordStore {
    fn select_all<R: Record>(&self) -> impl std::future::Future<Output = Result<Vec<R>, StoreError>>;

    fn select_where<R: Record>(
        &self,
        filter: &Filter,
    ) -> impl std::future::Future<Output = Result<Vec<R>, StoreError>>;

    fn select_by_id<R: Record>(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<R>, StoreError>>;

    fn insert<R: Record>(&self, record: R) -> impl std::future::Future<Output = Result<R, StoreError>>;

    fn update<R: Record>(&self, record: R) -> impl std::future::Future<Output = Result<R, StoreError>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Profile, ProfileStatus};
    use crate::modules::beds::{Bed, BedStatus};
    use crate::modules::neonatal::{NeonatalScreening, ScreeningResult, ScreeningTest};
    use chrono::NaiveDate;

    fn profile() -> Profile {
        Profile {
            id: "p1".into(),
            name: "Ana Souza".into(),
            role: "Enfermeira".into(),
            email: "ana@hospital.gov".into(),
            status: ProfileStatus::Active,
            department: "UTI".into(),
            unit_id: "h1".into(),
        }
    }

    #[test]
    fn test_field_text_reads_serde_names() {
        let p = profile();
        assert_eq!(p.field_text("email").as_deref(), Some("ana@hospital.gov"));
        assert_eq!(p.field_text("status").as_deref(), Some("active"));
        assert_eq!(p.field_text("missing"), None);
    }

    #[test]
    fn test_with_field_coerces_enum_and_rejects_unknown_variant() {
        let p = profile();
        let suspended = p.with_field("status", "suspended").unwrap();
        assert_eq!(suspended.status, ProfileStatus::Suspended);
        assert_eq!(p.status, ProfileStatus::Active);

        assert!(matches!(
            p.with_field("status", "retired"),
            Err(StoreError::InvalidField { .. })
        ));
        assert!(matches!(
            p.with_field("nope", "x"),
            Err(StoreError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_with_field_blank_clears_optional_date() {
        let screening = NeonatalScreening {
            id: "n1".into(),
            unit_id: "m1".into(),
            newborn: "RN de Maria".into(),
            mother: "Maria".into(),
            birth_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            test: ScreeningTest::Heel,
            collected_on: NaiveDate::from_ymd_opt(2026, 3, 4),
            result: ScreeningResult::Pending,
        };
        let cleared = screening.with_field("collected_on", "").unwrap();
        assert_eq!(cleared.collected_on, None);

        let bed = Bed {
            id: "b1".into(),
            unit_id: "h1".into(),
            ward: "UTI".into(),
            number: "01".into(),
            status: BedStatus::Occupied,
            patient: Some("José".into()),
        };
        let freed = bed.with_field("status", "free").unwrap();
        assert_eq!(freed.status, BedStatus::Free);
    }

    #[test]
    fn test_filter_any_of() {
        let p = profile();
        let by_name = Filter::any_of([("email", "Ana Souza"), ("name", "Ana Souza")]);
        assert!(by_name.matches(&p));
        let miss = Filter::eq("email", "other@hospital.gov");
        assert!(!miss.matches(&p));
    }

    #[test]
    fn test_collection_names_match_serde() {
        for collection in Collection::ALL {
            let json = serde_json::to_value(collection).unwrap();
            assert_eq!(json, Value::String(collection.as_str().to_string()));
        }
    }
}
