//! # Business modules
//!
//! The dashboard is a fixed set of [`Module`]s, each a router over named
//! [`ModulePage`]s. A page either shows a special view (overview cards, the
//! bed map, the priority calculator, the case summary) or a generic
//! collection screen driven by a [`Screen`] record type.
//!
//! Icons are a closed [`ModuleIcon`] enum; the UI maps each tag to a concrete
//! icon with an exhaustive `match`, so a new module without an icon does not
//! compile.

pub mod admin;
pub mod authorization;
pub mod beds;
pub mod documents;
pub mod indicators;
pub mod monitoring;
pub mod neonatal;
pub mod shifts;

use chrono::NaiveDate;
use serde_json::Value;

use crate::models::{HealthUnit, Profile};
use crate::records::{Collection, Record, StoreError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModuleIcon {
    Gauge,
    UserShield,
    FolderOpen,
    Bed,
    FileSignature,
    Virus,
    ChartLine,
    Baby,
    CalendarDays,
}

/// What a page renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageView {
    Overview,
    BedMap,
    PriorityCalculator,
    CaseSummary,
    Collection(Collection),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModulePage {
    pub slug: &'static str,
    pub title: &'static str,
    pub view: PageView,
}

const fn page(slug: &'static str, title: &'static str, view: PageView) -> ModulePage {
    ModulePage { slug, title, view }
}

const DASHBOARD_PAGES: &[ModulePage] = &[page("overview", "Overview", PageView::Overview)];
const ADMIN_PAGES: &[ModulePage] = &[
    page("users", "Users", PageView::Collection(Collection::Profiles)),
    page("units", "Health Units", PageView::Collection(Collection::HealthUnits)),
    page("logs", "Audit Log", PageView::Collection(Collection::AuditLogs)),
];
const DOCUMENT_PAGES: &[ModulePage] = &[page(
    "repository",
    "Repository",
    PageView::Collection(Collection::Documents),
)];
const BED_PAGES: &[ModulePage] = &[
    page("map", "Bed Map", PageView::BedMap),
    page("beds", "Beds", PageView::Collection(Collection::Beds)),
    page("patients", "Patients", PageView::Collection(Collection::Patients)),
];
const AUTHORIZATION_PAGES: &[ModulePage] = &[
    page("requests", "Requests", PageView::Collection(Collection::Authorizations)),
    page("priority", "Hospitalization Priority", PageView::PriorityCalculator),
];
const MONITORING_PAGES: &[ModulePage] = &[
    page("notifications", "Notifications", PageView::Collection(Collection::Notifications)),
    page("summary", "Case Summary", PageView::CaseSummary),
];
const INDICATOR_PAGES: &[ModulePage] = &[page("kpis", "KPIs", PageView::Collection(Collection::KpiMetrics))];
const NEONATAL_PAGES: &[ModulePage] = &[page(
    "screenings",
    "Screenings",
    PageView::Collection(Collection::NeonatalScreenings),
)];
const SHIFT_PAGES: &[ModulePage] = &[page("roster", "Roster", PageView::Collection(Collection::Shifts))];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Module {
    Dashboard,
    Admin,
    Documents,
    Beds,
    Authorization,
    Monitoring,
    Indicators,
    Neonatal,
    Shifts,
}

impl Module {
    pub const ALL: [Module; 9] = [
        Module::Dashboard,
        Module::Admin,
        Module::Documents,
        Module::Beds,
        Module::Authorization,
        Module::Monitoring,
        Module::Indicators,
        Module::Neonatal,
        Module::Shifts,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Module::Dashboard => "dashboard",
            Module::Admin => "admin",
            Module::Documents => "documents",
            Module::Beds => "beds",
            Module::Authorization => "authorization",
            Module::Monitoring => "monitoring",
            Module::Indicators => "indicators",
            Module::Neonatal => "neonatal",
            Module::Shifts => "shifts",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Module::Dashboard => "Dashboard",
            Module::Admin => "Administration",
            Module::Documents => "Documents",
            Module::Beds => "Beds",
            Module::Authorization => "Authorizations",
            Module::Monitoring => "Epidemiological Monitoring",
            Module::Indicators => "Indicators",
            Module::Neonatal => "Neonatal Screening",
            Module::Shifts => "Shifts",
        }
    }

    pub fn icon(&self) -> ModuleIcon {
        match self {
            Module::Dashboard => ModuleIcon::Gauge,
            Module::Admin => ModuleIcon::UserShield,
            Module::Documents => ModuleIcon::FolderOpen,
            Module::Beds => ModuleIcon::Bed,
            Module::Authorization => ModuleIcon::FileSignature,
            Module::Monitoring => ModuleIcon::Virus,
            Module::Indicators => ModuleIcon::ChartLine,
            Module::Neonatal => ModuleIcon::Baby,
            Module::Shifts => ModuleIcon::CalendarDays,
        }
    }

    pub fn pages(&self) -> &'static [ModulePage] {
        match self {
            Module::Dashboard => DASHBOARD_PAGES,
            Module::Admin => ADMIN_PAGES,
            Module::Documents => DOCUMENT_PAGES,
            Module::Beds => BED_PAGES,
            Module::Authorization => AUTHORIZATION_PAGES,
            Module::Monitoring => MONITORING_PAGES,
            Module::Indicators => INDICATOR_PAGES,
            Module::Neonatal => NEONATAL_PAGES,
            Module::Shifts => SHIFT_PAGES,
        }
    }

    pub fn default_page(&self) -> &'static ModulePage {
        &self.pages()[0]
    }

    pub fn from_slug(slug: &str) -> Option<Module> {
        Module::ALL.into_iter().find(|m| m.slug() == slug)
    }

    pub fn page(&self, slug: &str) -> Option<&'static ModulePage> {
        self.pages().iter().find(|p| p.slug == slug)
    }

    /// Modules visible from a unit. Administration is reserved to the master unit.
    pub fn visible_for(unit: &HealthUnit) -> Vec<Module> {
        Module::ALL
            .into_iter()
            .filter(|m| *m != Module::Admin || unit.is_master())
            .collect()
    }
}

/// Input control used for a form field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldKind {
    Text,
    Email,
    Number,
    Date,
    /// `(serde value, label)` pairs.
    Select(&'static [(&'static str, &'static str)]),
    /// One of the health units, listed at runtime.
    Unit,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Shown as a table column (otherwise only in the form).
    pub column: bool,
}

pub const fn field(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        column: true,
    }
}

pub const fn form_only(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        column: false,
    }
}

/// Owning unit of a unit-scoped record. Preset for unit sessions; the master
/// unit must pick one.
pub const UNIT_FIELD: FieldSpec = form_only("unit_id", "Unit", FieldKind::Unit);

/// A record type with a generic list + form screen.
pub trait Screen: Record + Default {
    /// Singular noun used in dialog titles.
    const NOUN: &'static str;
    const FIELDS: &'static [FieldSpec];
    /// Select fields offered as category filters above the table.
    const CATEGORY_FIELDS: &'static [&'static str] = &[];

    /// Defaults for a new record created from `unit`.
    fn new_for_unit(unit: &HealthUnit) -> Self {
        let blank = Self::default();
        if unit.is_master() {
            return blank;
        }
        blank.with_field("unit_id", &unit.id).unwrap_or(blank)
    }

    /// Fill derived fields of a new record from the rows already listed.
    fn prepare_new(self, _existing: &[Self], _today: NaiveDate) -> Self {
        self
    }

    /// Adjust a record as it is opened for editing.
    fn prepare_edit(self, _today: NaiveDate) -> Self {
        self
    }

    fn field_spec(name: &str) -> Option<&'static FieldSpec> {
        Self::FIELDS.iter().find(|f| f.name == name)
    }

    /// Display text for a cell: select values are shown with their label.
    fn display(&self, name: &str) -> String {
        let raw = self.field_text(name).unwrap_or_default();
        match Self::field_spec(name).map(|f| f.kind) {
            Some(FieldKind::Select(options)) => options
                .iter()
                .find(|(value, _)| *value == raw)
                .map(|(_, label)| label.to_string())
                .unwrap_or(raw),
            _ => raw,
        }
    }
}

/// Records visible to `unit`: everything for the master unit, otherwise rows
/// whose `unit_id` matches. Rows without a `unit_id` field are shared.
pub fn scope_to_unit<R: Record>(records: &[R], unit: &HealthUnit) -> Vec<R> {
    if unit.is_master() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| r.field_text("unit_id").is_none_or(|id| id == unit.id))
        .cloned()
        .collect()
}

/// Check that `row` parses as the record type of `collection`, has an id and
/// fills every required field.
pub fn validate_row(collection: Collection, row: &Value) -> Result<(), StoreError> {
    match collection {
        Collection::HealthUnits => validate::<HealthUnit>(row),
        Collection::Profiles => validate::<Profile>(row),
        Collection::Beds => validate::<beds::Bed>(row),
        Collection::Patients => validate::<beds::Patient>(row),
        Collection::KpiMetrics => validate::<indicators::KpiMetric>(row),
        Collection::Documents => validate::<documents::Document>(row),
        Collection::Shifts => validate::<shifts::Shift>(row),
        Collection::AuditLogs => validate::<admin::AuditLog>(row),
        Collection::Authorizations => validate::<authorization::AuthorizationRequest>(row),
        Collection::Notifications => validate::<monitoring::Notification>(row),
        Collection::NeonatalScreenings => validate::<neonatal::NeonatalScreening>(row),
    }
}

fn validate<R: Record>(row: &Value) -> Result<(), StoreError> {
    let record: R = serde_json::from_value(row.clone())?;
    let blank = |field: &str| record.field_text(field).is_none_or(|text| text.trim().is_empty());
    if blank("id") {
        return Err(StoreError::InvalidField {
            field: "id".to_string(),
            reason: "required".to_string(),
        });
    }
    // Rows without an owner are invisible to every unit.
    if record.field_text("unit_id").is_some() && blank("unit_id") {
        return Err(StoreError::InvalidField {
            field: "unit_id".to_string(),
            reason: "a health unit is required".to_string(),
        });
    }
    match R::REQUIRED_FIELDS.iter().find(|field| blank(field)) {
        Some(field) => Err(StoreError::InvalidField {
            field: field.to_string(),
            reason: "required".to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
pub(crate) fn assert_options_deserialize<T: serde::de::DeserializeOwned>(
    options: &[(&str, &str)],
) {
    for (value, _) in options {
        let parsed: Result<T, _> = serde_json::from_value(serde_json::Value::String(value.to_string()));
        assert!(parsed.is_ok(), "option `{value}` does not deserialize");
    }
}
