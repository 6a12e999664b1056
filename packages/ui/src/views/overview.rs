use dioxus::prelude::*;
use store::modules::beds::{occupancy, Bed};
use store::modules::indicators::{KpiMetric, KpiStatus};
use store::modules::monitoring::{cases_by_disease, Notification};
use store::modules::neonatal::{overdue, NeonatalScreening};
use store::modules::shifts::{coverage, Shift, ShiftPeriod};
use store::Screen;

use super::dataset::{use_dataset, OfflineBadge};
use crate::auth::use_auth;

#[component]
fn StatCard(title: String, value: String, detail: String, #[props(default)] tone: String) -> Element {
    rsx! {
        div {
            class: "stat-card stat-card--{tone}",
            span { class: "stat-card-title", "{title}" }
            span { class: "stat-card-value", "{value}" }
            span { class: "stat-card-detail", "{detail}" }
        }
    }
}

/// Dashboard landing page with one card per operational area.
#[component]
pub fn OverviewView() -> Element {
    let auth = use_auth();
    let beds = use_dataset::<Bed>();
    let kpis = use_dataset::<KpiMetric>();
    let screenings = use_dataset::<NeonatalScreening>();
    let notifications = use_dataset::<Notification>();
    let shifts = use_dataset::<Shift>();

    let today = chrono::Local::now().date_naive();
    let beds_now = occupancy(&beds.records.read());
    let kpi_list = kpis.records.read();
    let count = |status: KpiStatus| kpi_list.iter().filter(|k| k.status() == status).count();
    let (on_target, attention, critical) = (
        count(KpiStatus::OnTarget),
        count(KpiStatus::Attention),
        count(KpiStatus::Critical),
    );
    let screening_list = screenings.records.read();
    let late = overdue(&screening_list, today);
    let late_rows: Vec<(String, String, String, String)> = late
        .iter()
        .take(5)
        .map(|s| (s.id.clone(), s.newborn.clone(), s.display("test"), s.deadline().to_string()))
        .collect();
    let late_count = late.len();
    let occupancy_tone = if beds_now.percent >= 90.0 {
        "critical"
    } else if beds_now.percent >= 75.0 {
        "attention"
    } else {
        "ok"
    };
    let kpi_tone = if critical > 0 {
        "critical"
    } else if attention > 0 {
        "attention"
    } else {
        "ok"
    };
    let cases = cases_by_disease(&notifications.records.read());
    let active_cases: usize = cases.iter().map(|c| c.active()).sum();
    let on_duty = coverage(&shifts.records.read(), today);
    let staffed = |period: ShiftPeriod| on_duty.get(&period).copied().unwrap_or(0);
    let (morning, afternoon, night) = (
        staffed(ShiftPeriod::Morning),
        staffed(ShiftPeriod::Afternoon),
        staffed(ShiftPeriod::Night),
    );
    let uncovered = [morning, afternoon, night].iter().filter(|n| **n == 0).count();
    let offline = (beds.offline)()
        || (kpis.offline)()
        || (screenings.offline)()
        || (notifications.offline)()
        || (shifts.offline)();
    let unit_name = auth().unit().map(|u| u.name.clone()).unwrap_or_default();

    rsx! {
        div {
            class: "overview",
            div {
                class: "flex items-center gap-3 mb-4",
                h2 { class: "m-0 text-base font-semibold", "{unit_name}" }
                OfflineBadge { offline }
            }
            div {
                class: "stat-grid",
                StatCard {
                    title: "Bed occupancy",
                    value: format!("{:.1}%", beds_now.percent),
                    detail: format!(
                        "{} occupied, {} free, {} in maintenance",
                        beds_now.occupied, beds_now.available, beds_now.blocked
                    ),
                    tone: occupancy_tone.to_string(),
                }
                StatCard {
                    title: "Indicators on target",
                    value: format!("{on_target}/{}", kpi_list.len()),
                    detail: format!("{attention} need attention, {critical} critical"),
                    tone: kpi_tone.to_string(),
                }
                StatCard {
                    title: "Overdue screenings",
                    value: late_count.to_string(),
                    detail: "Not collected within the test deadline",
                    tone: if late_count == 0 { "ok".to_string() } else { "critical".to_string() },
                }
                StatCard {
                    title: "Active notifications",
                    value: active_cases.to_string(),
                    detail: format!("{} diseases under surveillance", cases.len()),
                }
                StatCard {
                    title: "Staff on duty today",
                    value: (morning + afternoon + night).to_string(),
                    detail: format!("{morning} morning, {afternoon} afternoon, {night} night"),
                    tone: if uncovered == 0 { "ok".to_string() } else { "attention".to_string() },
                }
            }

            if !late_rows.is_empty() {
                h3 { class: "mt-6 mb-2 text-sm font-semibold", "Overdue screenings" }
                table {
                    class: "collection-table",
                    thead {
                        tr {
                            th { "Newborn" }
                            th { "Test" }
                            th { "Deadline" }
                        }
                    }
                    tbody {
                        for (id, newborn, test, deadline) in late_rows {
                            tr {
                                key: "{id}",
                                td { "{newborn}" }
                                td { "{test}" }
                                td { "{deadline}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
