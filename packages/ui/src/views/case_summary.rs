use dioxus::prelude::*;
use store::modules::monitoring::{cases_by_disease, Notification, DISEASE_OPTIONS};

use super::dataset::{use_dataset, OfflineBadge};

fn disease_label(disease: &str) -> &str {
    DISEASE_OPTIONS
        .iter()
        .find(|(value, _)| *value == disease)
        .map(|(_, label)| *label)
        .unwrap_or(disease)
}

/// Notification counts per disease, most active first.
#[component]
pub fn CaseSummaryView() -> Element {
    let notifications = use_dataset::<Notification>();
    let summary = cases_by_disease(&notifications.records.read());
    let (suspected, confirmed, discarded) = summary.iter().fold((0, 0, 0), |(s, c, d), row| {
        (s + row.suspected, c + row.confirmed, d + row.discarded)
    });

    rsx! {
        div {
            class: "case-summary",
            div {
                class: "flex items-center gap-3 mb-4",
                OfflineBadge { offline: (notifications.offline)() }
            }
            table {
                class: "collection-table",
                thead {
                    tr {
                        th { "Disease" }
                        th { "Suspected" }
                        th { "Confirmed" }
                        th { "Discarded" }
                        th { "Active" }
                    }
                }
                tbody {
                    if summary.is_empty() {
                        tr {
                            td { colspan: "5", class: "collection-empty", "No notifications." }
                        }
                    }
                    for row in summary.iter() {
                        tr {
                            key: "{row.disease}",
                            td { "{disease_label(&row.disease)}" }
                            td { "{row.suspected}" }
                            td { "{row.confirmed}" }
                            td { "{row.discarded}" }
                            td { class: "font-semibold", "{row.active()}" }
                        }
                    }
                }
                tfoot {
                    tr {
                        td { "Total" }
                        td { "{suspected}" }
                        td { "{confirmed}" }
                        td { "{discarded}" }
                        td { class: "font-semibold", "{suspected + confirmed}" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disease_label_translates_known_values() {
        assert_eq!(disease_label("Sarampo"), "Measles");
        assert_eq!(disease_label("Dengue"), "Dengue");
        assert_eq!(disease_label("Mpox"), "Mpox");
    }
}
