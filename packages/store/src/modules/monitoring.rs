//! Epidemiological monitoring: compulsory disease notifications and per-disease case counts.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{field, FieldKind, FieldSpec, Screen, UNIT_FIELD};
use crate::records::{Collection, Record};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    #[default]
    Suspected,
    Confirmed,
    Discarded,
}

pub const CASE_STATUS_OPTIONS: &[(&str, &str)] = &[
    ("suspected", "Suspected"),
    ("confirmed", "Confirmed"),
    ("discarded", "Discarded"),
];

pub const DISEASE_OPTIONS: &[(&str, &str)] = &[
    ("Dengue", "Dengue"),
    ("Chikungunya", "Chikungunya"),
    ("Zika", "Zika"),
    ("Influenza", "Influenza"),
    ("COVID-19", "COVID-19"),
    ("Tuberculose", "Tuberculosis"),
    ("Sarampo", "Measles"),
    ("Leptospirose", "Leptospirosis"),
];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub unit_id: String,
    pub disease: String,
    pub patient: String,
    pub neighborhood: String,
    pub notified_on: NaiveDate,
    pub status: CaseStatus,
}

impl Record for Notification {
    const COLLECTION: Collection = Collection::Notifications;
    const SEARCH_FIELDS: &'static [&'static str] = &["disease", "patient", "neighborhood"];
    const REQUIRED_FIELDS: &'static [&'static str] = &["disease", "patient", "unit_id"];
    const DATE_FIELD: Option<&'static str> = Some("notified_on");

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Screen for Notification {
    const NOUN: &'static str = "Notification";
    const FIELDS: &'static [FieldSpec] = &[
        field("disease", "Disease", FieldKind::Select(DISEASE_OPTIONS)),
        field("patient", "Patient", FieldKind::Text),
        field("neighborhood", "Neighborhood", FieldKind::Text),
        field("notified_on", "Notified", FieldKind::Date),
        field("status", "Status", FieldKind::Select(CASE_STATUS_OPTIONS)),
        UNIT_FIELD,
    ];
    const CATEGORY_FIELDS: &'static [&'static str] = &["disease", "status"];
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiseaseSummary {
    pub disease: String,
    pub suspected: usize,
    pub confirmed: usize,
    pub discarded: usize,
}

impl DiseaseSummary {
    pub fn total(&self) -> usize {
        self.suspected + self.confirmed + self.discarded
    }

    /// Cases still counting towards surveillance (not discarded).
    pub fn active(&self) -> usize {
        self.suspected + self.confirmed
    }
}

/// Per-disease counts, most active cases first, ties by name.
pub fn cases_by_disease(notifications: &[Notification]) -> Vec<DiseaseSummary> {
    let mut by_disease: BTreeMap<&str, DiseaseSummary> = BTreeMap::new();
    for n in notifications {
        let summary = by_disease
            .entry(n.disease.as_str())
            .or_insert_with(|| DiseaseSummary {
                disease: n.disease.clone(),
                ..DiseaseSummary::default()
            });
        match n.status {
            CaseStatus::Suspected => summary.suspected += 1,
            CaseStatus::Confirmed => summary.confirmed += 1,
            CaseStatus::Discarded => summary.discarded += 1,
        }
    }
    let mut summaries: Vec<DiseaseSummary> = by_disease.into_values().collect();
    summaries.sort_by(|a, b| b.active().cmp(&a.active()).then_with(|| a.disease.cmp(&b.disease)));
    summaries
}
