use dioxus::prelude::*;
use store::modules::beds::{by_ward, occupancy, Bed, BedStatus, BED_STATUS_OPTIONS};

use super::dataset::{use_dataset, OfflineBadge};

fn status_class(status: BedStatus) -> &'static str {
    match status {
        BedStatus::Free => "bed-tile bed-tile--free",
        BedStatus::Occupied => "bed-tile bed-tile--occupied",
        BedStatus::Cleaning => "bed-tile bed-tile--cleaning",
        BedStatus::Maintenance => "bed-tile bed-tile--maintenance",
        BedStatus::Reserved => "bed-tile bed-tile--reserved",
    }
}

/// Beds as tiles, grouped by ward, with the unit's occupancy on top.
#[component]
pub fn BedMapView() -> Element {
    let beds = use_dataset::<Bed>();
    let list = beds.records.read();
    let summary = occupancy(&list);
    let wards = by_ward(&list);
    let percent = format!("{:.1}", summary.percent);

    rsx! {
        div {
            class: "bed-map",
            div {
                class: "flex items-center gap-4 mb-4 text-sm",
                span { class: "font-semibold", "Occupancy {percent}%" }
                span { "{summary.occupied} occupied" }
                span { "{summary.available} free" }
                span { "{summary.total} total" }
                OfflineBadge { offline: (beds.offline)() }
            }
            div {
                class: "bed-legend",
                for (value, label) in BED_STATUS_OPTIONS.iter().copied() {
                    span { key: "{value}", class: "bed-legend-item bed-tile--{value}", "{label}" }
                }
            }
            if wards.is_empty() && !(beds.loading)() {
                p { class: "text-sm text-neutral-500", "No beds registered for this unit." }
            }
            for (ward, ward_beds) in wards {
                section {
                    key: "{ward}",
                    class: "bed-ward",
                    h3 { class: "bed-ward-title", "{ward}" }
                    div {
                        class: "bed-grid",
                        for bed in ward_beds {
                            div {
                                key: "{bed.id}",
                                class: status_class(bed.status),
                                title: bed.patient.clone().unwrap_or_default(),
                                span { class: "bed-number", "{bed.number}" }
                                if let Some(patient) = bed.patient.as_ref() {
                                    span { class: "bed-patient", "{patient}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
