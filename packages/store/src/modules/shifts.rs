//! Staff roster: who works where, on which day and period.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{field, FieldKind, FieldSpec, Screen, UNIT_FIELD};
use crate::records::{Collection, Record};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftPeriod {
    #[default]
    Morning,
    Afternoon,
    Night,
}

pub const SHIFT_PERIOD_OPTIONS: &[(&str, &str)] = &[
    ("morning", "Morning (07-13)"),
    ("afternoon", "Afternoon (13-19)"),
    ("night", "Night (19-07)"),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    #[default]
    Scheduled,
    Confirmed,
    Cancelled,
}

pub const SHIFT_STATUS_OPTIONS: &[(&str, &str)] = &[
    ("scheduled", "Scheduled"),
    ("confirmed", "Confirmed"),
    ("cancelled", "Cancelled"),
];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: String,
    pub unit_id: String,
    pub professional: String,
    pub department: String,
    pub date: NaiveDate,
    pub period: ShiftPeriod,
    pub status: ShiftStatus,
}

impl Record for Shift {
    const COLLECTION: Collection = Collection::Shifts;
    const SEARCH_FIELDS: &'static [&'static str] = &["professional", "department"];
    const REQUIRED_FIELDS: &'static [&'static str] = &["professional", "department", "date", "unit_id"];
    const DATE_FIELD: Option<&'static str> = Some("date");

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Screen for Shift {
    const NOUN: &'static str = "Shift";
    const FIELDS: &'static [FieldSpec] = &[
        field("professional", "Professional", FieldKind::Text),
        field("department", "Department", FieldKind::Text),
        field("date", "Date", FieldKind::Date),
        field("period", "Period", FieldKind::Select(SHIFT_PERIOD_OPTIONS)),
        field("status", "Status", FieldKind::Select(SHIFT_STATUS_OPTIONS)),
        UNIT_FIELD,
    ];
    const CATEGORY_FIELDS: &'static [&'static str] = &["period", "status"];
}

/// Non-cancelled headcount per period on `date`.
pub fn coverage(shifts: &[Shift], date: NaiveDate) -> BTreeMap<ShiftPeriod, usize> {
    let mut counts = BTreeMap::new();
    for shift in shifts
        .iter()
        .filter(|s| s.date == date && s.status != ShiftStatus::Cancelled)
    {
        *counts.entry(shift.period).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::assert_options_deserialize;

    #[test]
    fn test_options_match_serde() {
        assert_options_deserialize::<ShiftPeriod>(SHIFT_PERIOD_OPTIONS);
        assert_options_deserialize::<ShiftStatus>(SHIFT_STATUS_OPTIONS);
    }

    #[test]
    fn test_coverage_skips_cancelled_and_other_days() {
        let day = NaiveDate::from_ymd_opt(2026, 4, 10).unwrap();
        let shift = |period, status, date| Shift {
            professional: "Carla".into(),
            department: "UTI".into(),
            date,
            period,
            status,
            ..Shift::default()
        };
        let roster = vec![
            shift(ShiftPeriod::Night, ShiftStatus::Confirmed, day),
            shift(ShiftPeriod::Night, ShiftStatus::Scheduled, day),
            shift(ShiftPeriod::Morning, ShiftStatus::Cancelled, day),
            shift(ShiftPeriod::Morning, ShiftStatus::Confirmed, day.succ_opt().unwrap()),
        ];
        let counts = coverage(&roster, day);
        assert_eq!(counts.get(&ShiftPeriod::Night), Some(&2));
        assert_eq!(counts.get(&ShiftPeriod::Morning), None);
    }
}
