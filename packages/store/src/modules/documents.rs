//! Document repository: protocols, SOPs, forms and their revision status.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{field, FieldKind, FieldSpec, Screen, UNIT_FIELD};
use crate::records::{Collection, Record};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    #[default]
    Draft,
    Review,
    Published,
    Archived,
}

pub const DOCUMENT_STATUS_OPTIONS: &[(&str, &str)] = &[
    ("draft", "Draft"),
    ("review", "In review"),
    ("published", "Published"),
    ("archived", "Archived"),
];

pub const DOCUMENT_CATEGORY_OPTIONS: &[(&str, &str)] = &[
    ("Protocolo", "Clinical protocol"),
    ("POP", "Standard operating procedure"),
    ("Formulário", "Form"),
    ("Regimento", "Bylaws"),
    ("Relatório", "Report"),
];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub unit_id: String,
    pub title: String,
    pub category: String,
    pub owner: String,
    pub version: String,
    pub status: DocumentStatus,
    pub updated_on: NaiveDate,
}

impl Record for Document {
    const COLLECTION: Collection = Collection::Documents;
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "owner", "category"];
    const REQUIRED_FIELDS: &'static [&'static str] = &["title", "category", "owner", "unit_id"];
    const DATE_FIELD: Option<&'static str> = Some("updated_on");

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Screen for Document {
    const NOUN: &'static str = "Document";
    const FIELDS: &'static [FieldSpec] = &[
        field("title", "Title", FieldKind::Text),
        field("category", "Category", FieldKind::Select(DOCUMENT_CATEGORY_OPTIONS)),
        field("owner", "Owner", FieldKind::Text),
        field("version", "Version", FieldKind::Text),
        field("status", "Status", FieldKind::Select(DOCUMENT_STATUS_OPTIONS)),
        field("updated_on", "Updated", FieldKind::Date),
        UNIT_FIELD,
    ];
    const CATEGORY_FIELDS: &'static [&'static str] = &["category", "status"];

    fn prepare_new(self, _existing: &[Self], today: NaiveDate) -> Self {
        Self {
            version: "1.0".to_string(),
            updated_on: today,
            ..self
        }
    }

    /// Opening a document for edit starts its next revision.
    fn prepare_edit(self, today: NaiveDate) -> Self {
        Self {
            version: next_version(&self.version),
            updated_on: today,
            ..self
        }
    }
}

/// Next version label after a revision: `"1.4"` becomes `"1.5"`, anything unparsable restarts at `"1.0"`.
/// A minor number that cannot grow moves to the next major.
pub fn next_version(current: &str) -> String {
    let mut parts = current.trim().splitn(2, '.');
    let major = parts.next().and_then(|p| p.parse::<u32>().ok());
    let minor = parts.next().map(|p| p.parse::<u32>().ok());
    match (major, minor) {
        (Some(major), Some(Some(minor))) => match minor.checked_add(1) {
            Some(next) => format!("{major}.{next}"),
            None => match major.checked_add(1) {
                Some(next) => format!("{next}.0"),
                None => "1.0".to_string(),
            },
        },
        (Some(major), None) => format!("{major}.1"),
        _ => "1.0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::assert_options_deserialize;

    #[test]
    fn test_options_match_serde() {
        assert_options_deserialize::<DocumentStatus>(DOCUMENT_STATUS_OPTIONS);
    }

    #[test]
    fn test_next_version() {
        assert_eq!(next_version("1.4"), "1.5");
        assert_eq!(next_version("2"), "2.1");
        assert_eq!(next_version("v3"), "1.0");
        assert_eq!(next_version("1.x"), "1.0");
    }

    #[test]
    fn test_next_version_at_numeric_limits() {
        assert_eq!(next_version("1.4294967295"), "2.0");
        assert_eq!(next_version("4294967295.4294967295"), "1.0");
        // Too large to parse at all
        assert_eq!(next_version("1.99999999999"), "1.0");
    }

    #[test]
    fn test_edit_starts_next_revision() {
        let today = NaiveDate::from_ymd_opt(2026, 5, 2).unwrap();
        let doc = Document { version: "2.3".into(), ..Document::default() };
        let revised = doc.prepare_edit(today);
        assert_eq!(revised.version, "2.4");
        assert_eq!(revised.updated_on, today);
        assert_eq!(Document::default().prepare_new(&[], today).version, "1.0");
    }

    #[test]
    fn test_category_display_label() {
        let doc = Document {
            category: "POP".into(),
            ..Document::default()
        };
        assert_eq!(doc.display("category"), "Standard operating procedure");
    }
}
