//! # Authorization requests and hospitalization priority
//!
//! Procedures that need regulatory approval are tracked as
//! [`AuthorizationRequest`]s, each identified by a protocol number
//! `AUT-<year>-<sequence>`. The priority calculator scores a bed request from
//! a few clinical criteria and maps the score to a colour class.
//!
//! | Criterion | Points |
//! |-----------|--------|
//! | Severity low / moderate / high / critical | 1 / 3 / 6 / 10 |
//! | Age under 2 or 60-79 | 2 |
//! | Age 80+ | 3 |
//! | Each comorbidity (max 3) | 1 |
//! | Every 2 days waiting (max 5) | 1 |
//! | Pregnancy | 2 |
//!
//! Classes: red from 12, orange from 8, yellow from 4, green below.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{field, form_only, FieldKind, FieldSpec, Screen, UNIT_FIELD};
use crate::records::{Collection, Record};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    #[default]
    Pending,
    UnderReview,
    Approved,
    Denied,
}

pub const AUTHORIZATION_STATUS_OPTIONS: &[(&str, &str)] = &[
    ("pending", "Pending"),
    ("under_review", "Under review"),
    ("approved", "Approved"),
    ("denied", "Denied"),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityClass {
    Red,
    Orange,
    Yellow,
    #[default]
    Green,
}

pub const PRIORITY_OPTIONS: &[(&str, &str)] = &[
    ("red", "Emergency"),
    ("orange", "Very urgent"),
    ("yellow", "Urgent"),
    ("green", "Standard"),
];

impl PriorityClass {
    pub fn from_score(score: u32) -> Self {
        match score {
            12.. => PriorityClass::Red,
            8..=11 => PriorityClass::Orange,
            4..=7 => PriorityClass::Yellow,
            _ => PriorityClass::Green,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriorityClass::Red => "Emergency",
            PriorityClass::Orange => "Very urgent",
            PriorityClass::Yellow => "Urgent",
            PriorityClass::Green => "Standard",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationRequest {
    pub id: String,
    pub unit_id: String,
    /// Case tracking number, `AUT-2026-000042`.
    pub protocol: String,
    pub patient: String,
    pub procedure: String,
    pub requester: String,
    pub requested_on: NaiveDate,
    pub status: AuthorizationStatus,
    pub priority: PriorityClass,
}

impl Record for AuthorizationRequest {
    const COLLECTION: Collection = Collection::Authorizations;
    const SEARCH_FIELDS: &'static [&'static str] = &["protocol", "patient", "procedure", "requester"];
    const REQUIRED_FIELDS: &'static [&'static str] = &["patient", "procedure", "requester", "unit_id"];
    const DATE_FIELD: Option<&'static str> = Some("requested_on");

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Screen for AuthorizationRequest {
    const NOUN: &'static str = "Authorization";
    const FIELDS: &'static [FieldSpec] = &[
        field("protocol", "Protocol", FieldKind::Text),
        field("patient", "Patient", FieldKind::Text),
        field("procedure", "Procedure", FieldKind::Text),
        form_only("requester", "Requester", FieldKind::Text),
        field("requested_on", "Requested", FieldKind::Date),
        field("priority", "Priority", FieldKind::Select(PRIORITY_OPTIONS)),
        field("status", "Status", FieldKind::Select(AUTHORIZATION_STATUS_OPTIONS)),
        UNIT_FIELD,
    ];
    const CATEGORY_FIELDS: &'static [&'static str] = &["status", "priority"];

    fn prepare_new(self, existing: &[Self], today: NaiveDate) -> Self {
        Self {
            protocol: next_protocol(existing, today.year()),
            requested_on: today,
            ..self
        }
    }
}

/// Next free protocol number for `year`, one past the highest existing sequence.
/// Sequences that cannot be incremented are ignored.
pub fn next_protocol(existing: &[AuthorizationRequest], year: i32) -> String {
    let prefix = format!("AUT-{year}-");
    let next = existing
        .iter()
        .filter_map(|r| r.protocol.strip_prefix(&prefix))
        .filter_map(|seq| seq.parse::<u64>().ok())
        .filter_map(|seq| seq.checked_add(1))
        .max()
        .unwrap_or(1);
    format!("{prefix}{next:06}")
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[default]
    Low,
    Moderate,
    High,
    Critical,
}

pub const SEVERITY_OPTIONS: &[(&str, &str)] = &[
    ("low", "Low"),
    ("moderate", "Moderate"),
    ("high", "High"),
    ("critical", "Critical"),
];

impl Severity {
    fn points(&self) -> u32 {
        match self {
            Severity::Low => 1,
            Severity::Moderate => 3,
            Severity::High => 6,
            Severity::Critical => 10,
        }
    }
}

/// Inputs of the hospitalization priority calculator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HospitalizationCriteria {
    pub age: u32,
    pub severity: Severity,
    pub comorbidities: u32,
    pub waiting_days: u32,
    pub pregnant: bool,
}

pub fn priority_score(criteria: &HospitalizationCriteria) -> u32 {
    let age = match criteria.age {
        0..=1 => 2,
        60..=79 => 2,
        80.. => 3,
        _ => 0,
    };
    let pregnancy = if criteria.pregnant { 2 } else { 0 };
    criteria.severity.points()
        + age
        + criteria.comorbidities.min(3)
        + (criteria.waiting_days / 2).min(5)
        + pregnancy
}

pub fn priority_class(criteria: &HospitalizationCriteria) -> PriorityClass {
    PriorityClass::from_score(priority_score(criteria))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::assert_options_deserialize;

    #[test]
    fn test_options_match_serde() {
        assert_options_deserialize::<AuthorizationStatus>(AUTHORIZATION_STATUS_OPTIONS);
        assert_options_deserialize::<PriorityClass>(PRIORITY_OPTIONS);
        assert_options_deserialize::<Severity>(SEVERITY_OPTIONS);
    }

    #[test]
    fn test_minimal_case_is_green() {
        let criteria = HospitalizationCriteria {
            age: 30,
            ..HospitalizationCriteria::default()
        };
        assert_eq!(priority_score(&criteria), 1);
        assert_eq!(priority_class(&criteria), PriorityClass::Green);
    }

    #[test]
    fn test_score_components_are_capped() {
        let criteria = HospitalizationCriteria {
            age: 85,
            severity: Severity::Critical,
            comorbidities: 7,
            waiting_days: 40,
            pregnant: false,
        };
        // 10 + 3 + 3 + 5
        assert_eq!(priority_score(&criteria), 21);
        assert_eq!(priority_class(&criteria), PriorityClass::Red);
    }

    #[test]
    fn test_class_thresholds() {
        assert_eq!(PriorityClass::from_score(3), PriorityClass::Green);
        assert_eq!(PriorityClass::from_score(4), PriorityClass::Yellow);
        assert_eq!(PriorityClass::from_score(7), PriorityClass::Yellow);
        assert_eq!(PriorityClass::from_score(8), PriorityClass::Orange);
        assert_eq!(PriorityClass::from_score(11), PriorityClass::Orange);
        assert_eq!(PriorityClass::from_score(12), PriorityClass::Red);
    }

    #[test]
    fn test_infant_and_pregnancy_points() {
        let infant = HospitalizationCriteria {
            age: 1,
            severity: Severity::Moderate,
            ..HospitalizationCriteria::default()
        };
        assert_eq!(priority_score(&infant), 5);

        let pregnant = HospitalizationCriteria {
            age: 28,
            severity: Severity::High,
            waiting_days: 3,
            pregnant: true,
            ..HospitalizationCriteria::default()
        };
        // 6 + 0 + 0 + 1 + 2
        assert_eq!(priority_score(&pregnant), 9);
        assert_eq!(priority_class(&pregnant), PriorityClass::Orange);
    }

    #[test]
    fn test_next_protocol() {
        let existing = vec![
            AuthorizationRequest { protocol: "AUT-2026-000007".into(), ..Default::default() },
            AuthorizationRequest { protocol: "AUT-2026-000012".into(), ..Default::default() },
            AuthorizationRequest { protocol: "AUT-2025-000099".into(), ..Default::default() },
            AuthorizationRequest { protocol: "manual".into(), ..Default::default() },
        ];
        assert_eq!(next_protocol(&existing, 2026), "AUT-2026-000013");
        assert_eq!(next_protocol(&existing, 2027), "AUT-2027-000001");
    }

    #[test]
    fn test_next_protocol_past_large_sequences() {
        let existing = vec![
            AuthorizationRequest { protocol: "AUT-2026-4294967295".into(), ..Default::default() },
            AuthorizationRequest { protocol: format!("AUT-2026-{}", u64::MAX), ..Default::default() },
            AuthorizationRequest { protocol: "AUT-2026-000003".into(), ..Default::default() },
        ];
        assert_eq!(next_protocol(&existing, 2026), "AUT-2026-4294967296");

        let maxed = vec![AuthorizationRequest { protocol: format!("AUT-2026-{}", u64::MAX), ..Default::default() }];
        assert_eq!(next_protocol(&maxed, 2026), "AUT-2026-000001");
    }

    #[test]
    fn test_new_request_gets_protocol_and_date() {
        let existing = vec![AuthorizationRequest { protocol: "AUT-2026-000004".into(), ..Default::default() }];
        let today = NaiveDate::from_ymd_opt(2026, 5, 2).unwrap();
        let fresh = AuthorizationRequest::default().prepare_new(&existing, today);
        assert_eq!(fresh.protocol, "AUT-2026-000005");
        assert_eq!(fresh.requested_on, today);
    }
}
