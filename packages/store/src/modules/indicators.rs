//! Management indicators (KPIs) measured against a target.

use serde::{Deserialize, Serialize};

use super::{field, form_only, FieldKind, FieldSpec, Screen, UNIT_FIELD};
use crate::records::{Collection, Record};

pub const KPI_CATEGORY_OPTIONS: &[(&str, &str)] = &[
    ("Assistencial", "Clinical care"),
    ("Qualidade", "Quality"),
    ("Financeiro", "Financial"),
    ("Operacional", "Operations"),
    ("Pessoas", "People"),
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KpiMetric {
    pub id: String,
    pub unit_id: String,
    pub name: String,
    pub category: String,
    /// Reference period, `2026-03` for monthly figures.
    pub period: String,
    /// Unit of measure shown next to the value (`%`, `days`, ...).
    pub measure: String,
    pub value: f64,
    pub target: f64,
    pub higher_is_better: bool,
}

impl Default for KpiMetric {
    fn default() -> Self {
        Self {
            id: String::new(),
            unit_id: String::new(),
            name: String::new(),
            category: String::new(),
            period: String::new(),
            measure: "%".to_string(),
            value: 0.0,
            target: 0.0,
            higher_is_better: true,
        }
    }
}

impl Record for KpiMetric {
    const COLLECTION: Collection = Collection::KpiMetrics;
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "category", "period"];
    const REQUIRED_FIELDS: &'static [&'static str] = &["name", "category", "period", "unit_id"];

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Screen for KpiMetric {
    const NOUN: &'static str = "Indicator";
    const FIELDS: &'static [FieldSpec] = &[
        field("name", "Indicator", FieldKind::Text),
        field("category", "Category", FieldKind::Select(KPI_CATEGORY_OPTIONS)),
        field("period", "Period", FieldKind::Text),
        field("value", "Value", FieldKind::Number),
        field("target", "Target", FieldKind::Number),
        form_only("measure", "Measure", FieldKind::Text),
        UNIT_FIELD,
    ];
    const CATEGORY_FIELDS: &'static [&'static str] = &["category"];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KpiStatus {
    OnTarget,
    Attention,
    Critical,
}

impl KpiStatus {
    pub fn label(&self) -> &'static str {
        match self {
            KpiStatus::OnTarget => "On target",
            KpiStatus::Attention => "Attention",
            KpiStatus::Critical => "Critical",
        }
    }
}

impl KpiMetric {
    /// Percentage of the target reached, inverted for lower-is-better metrics.
    /// A zero target is met by any non-negative value.
    pub fn attainment(&self) -> f64 {
        let ratio = if self.higher_is_better {
            if self.target == 0.0 {
                return if self.value >= 0.0 { 100.0 } else { 0.0 };
            }
            self.value / self.target
        } else {
            if self.value == 0.0 {
                return 100.0;
            }
            self.target / self.value
        };
        (ratio * 1000.0).round() / 10.0
    }

    pub fn status(&self) -> KpiStatus {
        match self.attainment() {
            a if a >= 100.0 => KpiStatus::OnTarget,
            a if a >= 80.0 => KpiStatus::Attention,
            _ => KpiStatus::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kpi(value: f64, target: f64, higher_is_better: bool) -> KpiMetric {
        KpiMetric {
            name: "Taxa".into(),
            value,
            target,
            higher_is_better,
            ..KpiMetric::default()
        }
    }

    #[test]
    fn test_attainment_higher_is_better() {
        assert_eq!(kpi(90.0, 90.0, true).attainment(), 100.0);
        assert_eq!(kpi(72.0, 90.0, true).attainment(), 80.0);
        assert_eq!(kpi(72.0, 90.0, true).status(), KpiStatus::Attention);
        assert_eq!(kpi(45.0, 90.0, true).status(), KpiStatus::Critical);
    }

    #[test]
    fn test_attainment_lower_is_better() {
        // Average stay of 5 days against a 4-day target
        let stay = kpi(5.0, 4.0, false);
        assert_eq!(stay.attainment(), 80.0);
        assert_eq!(stay.status(), KpiStatus::Attention);
        assert_eq!(kpi(3.0, 4.0, false).status(), KpiStatus::OnTarget);
        assert_eq!(kpi(0.0, 2.0, false).attainment(), 100.0);
    }

    #[test]
    fn test_number_fields_take_form_text() {
        let edited = kpi(0.0, 10.0, true).with_field("value", "12.5").unwrap();
        assert_eq!(edited.value, 12.5);
        assert_eq!(edited.status(), KpiStatus::OnTarget);
    }

    #[test]
    fn test_cleared_number_reads_as_zero() {
        let kpi = kpi(7.5, 10.0, true);
        let cleared = kpi.with_field("target", "  ").unwrap();
        assert_eq!(cleared.target, 0.0);
        assert_eq!(cleared.with_field("target", "8").unwrap().target, 8.0);
        assert!(kpi.with_field("value", "abc").is_err());
    }
}
