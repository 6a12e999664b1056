//! The generic list screen: filters, a sortable table, a pager, the
//! create/edit dialog and CSV export, configured entirely by a [`Screen`] type.

use std::collections::BTreeSet;

use api::ApiRecordStore;
use dioxus::prelude::*;
use store::crud::ModalMode;
use store::export::screen_csv;
use store::listing::{parse_date, SortDirection};
use store::models::{HealthUnit, Profile};
use store::modules::admin::AuditLog;
use store::modules::authorization::AuthorizationRequest;
use store::modules::beds::{Bed, Patient};
use store::modules::documents::Document;
use store::modules::indicators::KpiMetric;
use store::modules::monitoring::Notification;
use store::modules::neonatal::NeonatalScreening;
use store::modules::shifts::Shift;
use store::modules::{FieldKind, FieldSpec};
use store::{Collection, CrudModal, ListView, Screen};

use super::dataset::{use_dataset, Dataset, OfflineBadge};
use super::ModalOverlay;
use crate::alerts::{push_alert, use_alerts, AlertLevel};
use crate::auth::{use_auth, use_settings, use_units};
use crate::components::{Button, ButtonVariant, Input, Label, Select};
use crate::icons::{FaFileCsv, FaPenToSquare, FaPlus, FaSort, FaSortDown, FaSortUp};
use crate::Icon;

const DOWNLOAD_JS: &str = r#"
    const [name, body] = await dioxus.recv();
    const link = document.createElement("a");
    link.href = "data:text/csv;charset=utf-8," + encodeURIComponent(body);
    link.download = name;
    document.body.appendChild(link);
    link.click();
    link.remove();
"#;

/// List screen for one collection. Give it a `key` per collection so
/// switching collections remounts the screen.
#[component]
pub fn CollectionPage(collection: Collection) -> Element {
    match collection {
        Collection::HealthUnits => collection_screen::<HealthUnit>(),
        Collection::Profiles => collection_screen::<Profile>(),
        Collection::Beds => collection_screen::<Bed>(),
        Collection::Patients => collection_screen::<Patient>(),
        Collection::KpiMetrics => collection_screen::<KpiMetric>(),
        Collection::Documents => collection_screen::<Document>(),
        Collection::Shifts => collection_screen::<Shift>(),
        Collection::AuditLogs => collection_screen::<AuditLog>(),
        Collection::Authorizations => collection_screen::<AuthorizationRequest>(),
        Collection::Notifications => collection_screen::<Notification>(),
        Collection::NeonatalScreenings => collection_screen::<NeonatalScreening>(),
    }
}

/// Choices of a select field. Unit fields list `units`.
fn options_of(spec: &FieldSpec, units: &[(String, String)]) -> Option<Vec<(String, String)>> {
    match spec.kind {
        FieldKind::Select(options) => Some(
            options
                .iter()
                .map(|(value, label)| (value.to_string(), label.to_string()))
                .collect(),
        ),
        FieldKind::Unit => Some(units.to_vec()),
        _ => None,
    }
}

/// Units a record can belong to. The master overview owns no records.
fn unit_options(units: &[HealthUnit]) -> Vec<(String, String)> {
    units
        .iter()
        .filter(|u| !u.is_master())
        .map(|u| (u.id.clone(), u.name.clone()))
        .collect()
}

/// Choices of a category filter: the declared options, or the distinct values present.
fn category_options<R: Screen>(field: &str, records: &[R]) -> Vec<(String, String)> {
    if let Some(options) = R::field_spec(field).and_then(|spec| options_of(spec, &[])) {
        return options;
    }
    records
        .iter()
        .filter_map(|r| r.field_text(field))
        .filter(|text| !text.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|text| (text.clone(), text))
        .collect()
}

fn input_type(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Email => "email",
        FieldKind::Number => "number",
        FieldKind::Date => "date",
        FieldKind::Text | FieldKind::Select(_) | FieldKind::Unit => "text",
    }
}

fn collection_screen<R: Screen + 'static>() -> Element {
    let auth = use_auth();
    let settings = use_settings();
    let mut alerts = use_alerts();
    let Dataset {
        mut records,
        offline,
        loading,
    } = use_dataset::<R>();
    let mut view = use_signal(|| ListView::new(settings.peek().page_size));
    let mut modal = use_signal(CrudModal::<R>::new);
    let unit_list = use_units();

    let open_create = move |_| {
        let Some(unit) = auth.peek().unit().cloned() else {
            return;
        };
        let today = chrono::Local::now().date_naive();
        let defaults = R::new_for_unit(&unit).prepare_new(&records.peek(), today);
        modal.write().open_for_create(defaults);
    };

    let mut submit = move || {
        let mut list = records.peek().clone();
        let result = modal.write().submit(&mut list);
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::info!("{} form rejected: {}", R::NOUN, e);
                return;
            }
        };
        records.set(list);
        if *offline.peek() {
            push_alert(
                &mut alerts,
                AlertLevel::Warning,
                &format!("{} saved locally only (offline data)", R::NOUN),
            );
            return;
        }
        spawn(async move {
            match outcome.persist(&ApiRecordStore::new()).await {
                Ok(_) => push_alert(&mut alerts, AlertLevel::Success, &format!("{} saved", R::NOUN)),
                Err(e) => {
                    tracing::error!("Failed to save {}: {}", R::NOUN, e);
                    push_alert(
                        &mut alerts,
                        AlertLevel::Error,
                        &format!("{} not saved: {e}", R::NOUN),
                    );
                }
            }
        });
    };

    let export = move |_| {
        let visible = view.peek().filter(&records.peek());
        let csv = screen_csv(&visible);
        let eval = document::eval(DOWNLOAD_JS);
        match eval.send((format!("{}.csv", R::COLLECTION), csv)) {
            Ok(()) => push_alert(
                &mut alerts,
                AlertLevel::Success,
                &format!("Exported {} rows", visible.len()),
            ),
            Err(e) => {
                tracing::error!("CSV download failed: {:?}", e);
                push_alert(&mut alerts, AlertLevel::Error, "CSV download failed");
            }
        }
    };

    let page = view.read().page_of(&records.read());
    let (first, last) = page.range();
    let columns: Vec<&'static FieldSpec> = R::FIELDS.iter().filter(|f| f.column).collect();
    let (date_from, date_to) = view.read().date_range();
    let date_from = date_from.map(|d| d.to_string()).unwrap_or_default();
    let date_to = date_to.map(|d| d.to_string()).unwrap_or_default();
    let units = unit_options(&unit_list.read());
    let form = modal.read().form().cloned();
    let editing = matches!(modal.read().mode(), Some(ModalMode::Edit { .. }));
    let form_error = modal.read().error().map(str::to_string);
    let sort = view
        .read()
        .sort()
        .map(|(field, direction)| (field.to_string(), direction));

    rsx! {
        div {
            class: "collection-screen",

            div {
                class: "collection-toolbar",
                Input {
                    class: "w-64",
                    placeholder: "Search...",
                    value: view.read().search().to_string(),
                    oninput: move |evt: FormEvent| view.write().set_search(evt.value()),
                }
                for field in R::CATEGORY_FIELDS.iter().copied() {
                    Select {
                        key: "{field}",
                        options: category_options::<R>(field, &records.read()),
                        value: view.read().category(field).unwrap_or_default().to_string(),
                        placeholder: format!(
                            "All: {}",
                            R::field_spec(field).map(|f| f.label).unwrap_or(field)
                        ),
                        onchange: move |value: String| {
                            view.write().set_category(field, (!value.is_empty()).then_some(value.as_str()));
                        },
                    }
                }
                if R::DATE_FIELD.is_some() {
                    Input {
                        r#type: "date",
                        value: date_from,
                        oninput: move |evt: FormEvent| {
                            let (_, to) = view.peek().date_range();
                            view.write().set_date_range(parse_date(&evt.value()), to);
                        },
                    }
                    span { class: "text-neutral-400", "to" }
                    Input {
                        r#type: "date",
                        value: date_to,
                        oninput: move |evt: FormEvent| {
                            let (from, _) = view.peek().date_range();
                            view.write().set_date_range(from, parse_date(&evt.value()));
                        },
                    }
                }
                Button {
                    variant: ButtonVariant::Ghost,
                    onclick: move |_| view.write().clear_filters(),
                    "Clear"
                }
                div { class: "flex-1" }
                OfflineBadge { offline: offline() }
                Button {
                    variant: ButtonVariant::Outline,
                    title: "Export the filtered rows as CSV",
                    onclick: export,
                    Icon { icon: FaFileCsv, width: 14, height: 14 }
                    "Export CSV"
                }
                Button {
                    variant: ButtonVariant::Primary,
                    onclick: open_create,
                    Icon { icon: FaPlus, width: 12, height: 12 }
                    "New {R::NOUN}"
                }
            }

            table {
                class: "collection-table",
                thead {
                    tr {
                        for spec in columns.iter().copied() {
                            th {
                                key: "{spec.name}",
                                onclick: move |_| view.write().toggle_sort(spec.name),
                                "{spec.label} "
                                {match sort.as_ref().filter(|(field, _)| field == spec.name) {
                                    Some((_, SortDirection::Ascending)) => rsx! { Icon { icon: FaSortUp, width: 10, height: 10 } },
                                    Some((_, SortDirection::Descending)) => rsx! { Icon { icon: FaSortDown, width: 10, height: 10 } },
                                    None => rsx! { Icon { icon: FaSort, width: 10, height: 10 } },
                                }}
                            }
                        }
                        th { class: "w-12" }
                    }
                }
                tbody {
                    if loading() && records.read().is_empty() {
                        tr {
                            td { colspan: "{columns.len() + 1}", class: "collection-empty", "Loading..." }
                        }
                    } else if page.items.is_empty() {
                        tr {
                            td { colspan: "{columns.len() + 1}", class: "collection-empty", "No records match the filters." }
                        }
                    }
                    for record in page.items.iter().cloned() {
                        tr {
                            key: "{record.id()}",
                            for spec in columns.iter().copied() {
                                td { key: "{spec.name}", "{record.display(spec.name)}" }
                            }
                            td {
                                button {
                                    class: "text-neutral-500 hover:text-sky-700",
                                    title: "Edit",
                                    onclick: {
                                        let record = record.clone();
                                        move |_| {
                                            let today = chrono::Local::now().date_naive();
                                            modal.write().open_for_edit(&record.clone().prepare_edit(today))
                                        }
                                    },
                                    Icon { icon: FaPenToSquare, width: 13, height: 13 }
                                }
                            }
                        }
                    }
                }
            }

            div {
                class: "collection-pager",
                span { "Showing {first}-{last} of {page.total}" }
                div { class: "flex-1" }
                Button {
                    variant: ButtonVariant::Outline,
                    disabled: !page.has_previous(),
                    onclick: move |_| view.write().previous(),
                    "Previous"
                }
                span { "Page {page.page} of {page.total_pages.max(1)}" }
                Button {
                    variant: ButtonVariant::Outline,
                    disabled: !page.has_next(),
                    onclick: move |_| {
                        let total_pages = view.peek().page_of(&records.peek()).total_pages;
                        view.write().next(total_pages);
                    },
                    "Next"
                }
            }
        }

        if let Some(form) = form {
            ModalOverlay {
                title: if editing { format!("Edit {}", R::NOUN) } else { format!("New {}", R::NOUN) },
                on_close: move |_| modal.write().cancel(),
                form {
                    class: "flex flex-col gap-3",
                    onsubmit: move |evt: FormEvent| {
                        evt.prevent_default();
                        submit();
                    },
                    for spec in R::FIELDS.iter().copied() {
                        FormField {
                            key: "{spec.name}",
                            spec,
                            units: units.clone(),
                            value: form.field_text(spec.name).unwrap_or_default(),
                            required: R::REQUIRED_FIELDS.contains(&spec.name),
                            onchange: move |value: String| {
                                // A rejected value is kept as the dialog's error message.
                                let _ = modal.write().set_field(spec.name, &value);
                            },
                        }
                    }
                    if let Some(error) = form_error {
                        p { class: "m-0 text-sm text-red-600", role: "alert", "{error}" }
                    }
                    div {
                        class: "flex gap-2 mt-2",
                        Button { variant: ButtonVariant::Primary, r#type: "submit", "Save" }
                        Button {
                            variant: ButtonVariant::Outline,
                            onclick: move |_| modal.write().cancel(),
                            "Cancel"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn FormField(
    spec: FieldSpec,
    units: Vec<(String, String)>,
    value: String,
    required: bool,
    onchange: EventHandler<String>,
) -> Element {
    let id = format!("field-{}", spec.name);
    let label = if required {
        format!("{} *", spec.label)
    } else {
        spec.label.to_string()
    };

    rsx! {
        div {
            Label { html_for: id.clone(), "{label}" }
            {match options_of(&spec, &units) {
                Some(options) => rsx! {
                    Select {
                        id: id.clone(),
                        class: "w-full mt-1.5",
                        options: options,
                        value: value.clone(),
                        placeholder: if required { String::new() } else { "-".to_string() },
                        onchange: move |value: String| onchange.call(value),
                    }
                },
                None => rsx! {
                    Input {
                        id: id.clone(),
                        class: "w-full mt-1.5",
                        r#type: input_type(spec.kind).to_string(),
                        value: value.clone(),
                        oninput: move |evt: FormEvent| onchange.call(evt.value()),
                    }
                },
            }}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::modules::beds::BedStatus;

    #[test]
    fn test_category_options_declared_or_distinct() {
        let bed = |ward: &str| Bed {
            ward: ward.to_string(),
            status: BedStatus::Free,
            ..Bed::default()
        };
        let beds = vec![bed("UTI Adulto"), bed("Pediatria"), bed("UTI Adulto")];

        let statuses = category_options::<Bed>("status", &beds);
        assert_eq!(statuses[0], ("free".to_string(), "Free".to_string()));

        let wards = category_options::<Bed>("ward", &beds);
        let names: Vec<&str> = wards.iter().map(|(v, _)| v.as_str()).collect();
        assert_eq!(names, vec!["Pediatria", "UTI Adulto"]);
    }

    #[test]
    fn test_unit_field_lists_units_without_master() {
        let units = unit_options(&[
            HealthUnit::master(),
            HealthUnit::new("h1", "Hospital Central", store::UnitType::Hospital),
        ]);
        assert_eq!(units, vec![("h1".to_string(), "Hospital Central".to_string())]);

        let unit_field = Bed::field_spec("unit_id").copied().unwrap();
        assert_eq!(options_of(&unit_field, &units), Some(units.clone()));
        assert_eq!(options_of(&unit_field, &[]), Some(Vec::new()));
    }

    #[test]
    fn test_input_types() {
        assert_eq!(input_type(FieldKind::Date), "date");
        assert_eq!(input_type(FieldKind::Email), "email");
        assert_eq!(input_type(FieldKind::Text), "text");
    }
}
