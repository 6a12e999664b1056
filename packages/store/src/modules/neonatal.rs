//! # Neonatal screening
//!
//! Each newborn goes through the mandatory screening tests; every test has a
//! deadline counted in days from birth. A screening with no collection date
//! past its deadline is overdue and shows up in the dashboard alerts.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{field, form_only, FieldKind, FieldSpec, Screen, UNIT_FIELD};
use crate::records::{Collection, Record};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningTest {
    /// Heel prick (Guthrie) test.
    #[default]
    Heel,
    Hearing,
    RedReflex,
    PulseOximetry,
    TongueTie,
}

pub const SCREENING_TEST_OPTIONS: &[(&str, &str)] = &[
    ("heel", "Heel prick"),
    ("hearing", "Hearing"),
    ("red_reflex", "Red reflex"),
    ("pulse_oximetry", "Pulse oximetry"),
    ("tongue_tie", "Tongue-tie"),
];

impl ScreeningTest {
    /// Days after birth by which the test must be collected.
    pub fn deadline_days(&self) -> u64 {
        match self {
            ScreeningTest::Heel => 5,
            ScreeningTest::Hearing => 30,
            ScreeningTest::RedReflex => 3,
            ScreeningTest::PulseOximetry => 2,
            ScreeningTest::TongueTie => 30,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreeningResult {
    #[default]
    Pending,
    Normal,
    Altered,
}

pub const SCREENING_RESULT_OPTIONS: &[(&str, &str)] = &[
    ("pending", "Pending"),
    ("normal", "Normal"),
    ("altered", "Altered"),
];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NeonatalScreening {
    pub id: String,
    pub unit_id: String,
    pub newborn: String,
    pub mother: String,
    pub birth_date: NaiveDate,
    pub test: ScreeningTest,
    pub collected_on: Option<NaiveDate>,
    pub result: ScreeningResult,
}

impl Record for NeonatalScreening {
    const COLLECTION: Collection = Collection::NeonatalScreenings;
    const SEARCH_FIELDS: &'static [&'static str] = &["newborn", "mother"];
    const REQUIRED_FIELDS: &'static [&'static str] = &["newborn", "mother", "birth_date", "unit_id"];
    const DATE_FIELD: Option<&'static str> = Some("birth_date");

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Screen for NeonatalScreening {
    const NOUN: &'static str = "Screening";
    const FIELDS: &'static [FieldSpec] = &[
        field("newborn", "Newborn", FieldKind::Text),
        form_only("mother", "Mother", FieldKind::Text),
        field("birth_date", "Born", FieldKind::Date),
        field("test", "Test", FieldKind::Select(SCREENING_TEST_OPTIONS)),
        field("collected_on", "Collected", FieldKind::Date),
        field("result", "Result", FieldKind::Select(SCREENING_RESULT_OPTIONS)),
        UNIT_FIELD,
    ];
    const CATEGORY_FIELDS: &'static [&'static str] = &["test", "result"];
}

impl NeonatalScreening {
    pub fn deadline(&self) -> NaiveDate {
        self.birth_date
            .checked_add_days(Days::new(self.test.deadline_days()))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Not yet collected and past the test's deadline on `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.collected_on.is_none() && today > self.deadline()
    }
}

pub fn overdue(screenings: &[NeonatalScreening], today: NaiveDate) -> Vec<&NeonatalScreening> {
    screenings.iter().filter(|s| s.is_overdue(today)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::assert_options_deserialize;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn screening(test: ScreeningTest, collected_on: Option<NaiveDate>) -> NeonatalScreening {
        NeonatalScreening {
            newborn: "RN de Joana".into(),
            mother: "Joana".into(),
            birth_date: day(1),
            test,
            collected_on,
            ..NeonatalScreening::default()
        }
    }

    #[test]
    fn test_options_match_serde() {
        assert_options_deserialize::<ScreeningTest>(SCREENING_TEST_OPTIONS);
        assert_options_deserialize::<ScreeningResult>(SCREENING_RESULT_OPTIONS);
    }

    #[test]
    fn test_heel_prick_deadline() {
        let pending = screening(ScreeningTest::Heel, None);
        assert_eq!(pending.deadline(), day(6));
        assert!(!pending.is_overdue(day(6)));
        assert!(pending.is_overdue(day(7)));

        let collected = screening(ScreeningTest::Heel, Some(day(4)));
        assert!(!collected.is_overdue(day(20)));
    }

    #[test]
    fn test_overdue_list() {
        let list = vec![
            screening(ScreeningTest::PulseOximetry, None),
            screening(ScreeningTest::Hearing, None),
            screening(ScreeningTest::RedReflex, Some(day(2))),
        ];
        let late = overdue(&list, day(10));
        assert_eq!(late.len(), 1);
        assert_eq!(late[0].test, ScreeningTest::PulseOximetry);
    }
}
