//! # Bed management
//!
//! Beds belong to a ward of a unit and move between five states. The bed map
//! groups them by ward; [`occupancy`] gives the headline percentage shown on
//! the dashboard.
//!
//! Occupancy counts only beds that can take a patient: beds under maintenance
//! are left out of the denominator, so closing a broken bed does not make the
//! unit look emptier than it is.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{field, form_only, FieldKind, FieldSpec, Screen, UNIT_FIELD};
use crate::records::{Collection, Record};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BedStatus {
    #[default]
    Free,
    Occupied,
    Cleaning,
    Maintenance,
    Reserved,
}

pub const BED_STATUS_OPTIONS: &[(&str, &str)] = &[
    ("free", "Free"),
    ("occupied", "Occupied"),
    ("cleaning", "Cleaning"),
    ("maintenance", "Maintenance"),
    ("reserved", "Reserved"),
];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bed {
    pub id: String,
    pub unit_id: String,
    pub ward: String,
    pub number: String,
    pub status: BedStatus,
    pub patient: Option<String>,
}

impl Record for Bed {
    const COLLECTION: Collection = Collection::Beds;
    const SEARCH_FIELDS: &'static [&'static str] = &["ward", "number", "patient"];
    const REQUIRED_FIELDS: &'static [&'static str] = &["ward", "number", "unit_id"];

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Screen for Bed {
    const NOUN: &'static str = "Bed";
    const FIELDS: &'static [FieldSpec] = &[
        field("ward", "Ward", FieldKind::Text),
        field("number", "Bed", FieldKind::Text),
        field("status", "Status", FieldKind::Select(BED_STATUS_OPTIONS)),
        field("patient", "Patient", FieldKind::Text),
        UNIT_FIELD,
    ];
    const CATEGORY_FIELDS: &'static [&'static str] = &["status", "ward"];
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[default]
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "M")]
    Male,
}

pub const SEX_OPTIONS: &[(&str, &str)] = &[("F", "Female"), ("M", "Male")];

/// A patient registered at a unit, identified by the national health card (CNS).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub unit_id: String,
    pub name: String,
    pub cns: String,
    pub sex: Sex,
    pub birth_date: NaiveDate,
    pub admitted_on: Option<NaiveDate>,
}

impl Record for Patient {
    const COLLECTION: Collection = Collection::Patients;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "cns"];
    const REQUIRED_FIELDS: &'static [&'static str] = &["name", "cns", "birth_date", "unit_id"];
    const DATE_FIELD: Option<&'static str> = Some("admitted_on");

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Screen for Patient {
    const NOUN: &'static str = "Patient";
    const FIELDS: &'static [FieldSpec] = &[
        field("name", "Name", FieldKind::Text),
        field("cns", "CNS", FieldKind::Text),
        field("sex", "Sex", FieldKind::Select(SEX_OPTIONS)),
        field("birth_date", "Birth date", FieldKind::Date),
        form_only("admitted_on", "Admitted on", FieldKind::Date),
        UNIT_FIELD,
    ];
    const CATEGORY_FIELDS: &'static [&'static str] = &["sex"];
}

impl Patient {
    /// Age in whole years on `today`.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        today.years_since(self.birth_date).unwrap_or(0)
    }
}

/// Occupancy summary for a set of beds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Occupancy {
    pub total: usize,
    pub occupied: usize,
    pub available: usize,
    pub blocked: usize,
    /// Occupied share of usable beds, one decimal, 0.0 when none are usable.
    pub percent: f64,
}

pub fn occupancy(beds: &[Bed]) -> Occupancy {
    let count = |status: BedStatus| beds.iter().filter(|b| b.status == status).count();
    let occupied = count(BedStatus::Occupied);
    let blocked = count(BedStatus::Maintenance);
    let usable = beds.len() - blocked;
    let percent = if usable == 0 {
        0.0
    } else {
        (occupied as f64 * 1000.0 / usable as f64).round() / 10.0
    };
    Occupancy {
        total: beds.len(),
        occupied,
        available: count(BedStatus::Free),
        blocked,
        percent,
    }
}

/// Beds grouped by ward (alphabetical), each ward sorted by bed number.
pub fn by_ward(beds: &[Bed]) -> BTreeMap<String, Vec<Bed>> {
    let mut wards: BTreeMap<String, Vec<Bed>> = BTreeMap::new();
    for bed in beds {
        wards.entry(bed.ward.clone()).or_default().push(bed.clone());
    }
    for beds in wards.values_mut() {
        beds.sort_by(|a, b| a.number.cmp(&b.number));
    }
    wards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::assert_options_deserialize;

    fn bed(ward: &str, number: &str, status: BedStatus) -> Bed {
        Bed {
            id: format!("{ward}-{number}"),
            unit_id: "h1".into(),
            ward: ward.into(),
            number: number.into(),
            status,
            patient: None,
        }
    }

    #[test]
    fn test_options_match_serde() {
        assert_options_deserialize::<BedStatus>(BED_STATUS_OPTIONS);
        assert_options_deserialize::<Sex>(SEX_OPTIONS);
    }

    #[test]
    fn test_occupancy_excludes_maintenance() {
        let beds = vec![
            bed("UTI", "01", BedStatus::Occupied),
            bed("UTI", "02", BedStatus::Occupied),
            bed("UTI", "03", BedStatus::Free),
            bed("UTI", "04", BedStatus::Maintenance),
            bed("UTI", "05", BedStatus::Cleaning),
            bed("UTI", "06", BedStatus::Reserved),
            bed("UTI", "07", BedStatus::Free),
        ];
        let o = occupancy(&beds);
        assert_eq!(o.total, 7);
        assert_eq!(o.occupied, 2);
        assert_eq!(o.available, 2);
        assert_eq!(o.blocked, 1);
        // 2 of 6 usable beds
        assert_eq!(o.percent, 33.3);
    }

    #[test]
    fn test_occupancy_edges() {
        assert_eq!(occupancy(&[]).percent, 0.0);
        let broken = vec![bed("A", "1", BedStatus::Maintenance)];
        assert_eq!(occupancy(&broken).percent, 0.0);
        let full = vec![bed("A", "1", BedStatus::Occupied), bed("A", "2", BedStatus::Occupied)];
        assert_eq!(occupancy(&full).percent, 100.0);
    }

    #[test]
    fn test_by_ward_groups_and_sorts() {
        let beds = vec![
            bed("Pediatria", "02", BedStatus::Free),
            bed("Clínica", "01", BedStatus::Free),
            bed("Pediatria", "01", BedStatus::Occupied),
        ];
        let wards = by_ward(&beds);
        let names: Vec<&String> = wards.keys().collect();
        assert_eq!(names, vec!["Clínica", "Pediatria"]);
        assert_eq!(wards["Pediatria"][0].number, "01");
    }

    #[test]
    fn test_patient_age() {
        let patient = Patient {
            birth_date: NaiveDate::from_ymd_opt(1950, 6, 15).unwrap(),
            ..Patient::default()
        };
        assert_eq!(patient.age_on(NaiveDate::from_ymd_opt(2026, 6, 14).unwrap()), 75);
        assert_eq!(patient.age_on(NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()), 76);
    }
}
