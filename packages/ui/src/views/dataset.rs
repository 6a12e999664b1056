use dioxus::prelude::*;
use store::modules::scope_to_unit;
use store::{Record, Seed, StoreError};

use crate::alerts::{push_alert, use_alerts, AlertLevel};
use crate::auth::use_auth;

/// One collection as seen by the signed-in unit.
pub struct Dataset<R: 'static> {
    pub records: Signal<Vec<R>>,
    /// Set when the rows come from the built-in demo data instead of the server.
    pub offline: Signal<bool>,
    pub loading: Signal<bool>,
}

/// Load `R`'s collection for the active unit and reload it when the unit or
/// connectivity changes. A failed fetch falls back to the demo rows of that
/// unit and marks the dataset offline.
pub fn use_dataset<R: Record + 'static>() -> Dataset<R> {
    let auth = use_auth();
    let mut alerts = use_alerts();
    let mut records = use_signal(Vec::<R>::new);
    let mut offline = use_signal(|| false);
    let mut loading = use_signal(|| true);
    let unit = use_memo(move || auth().unit().cloned());
    let online = use_memo(move || auth().online);

    let _ = use_resource(move || async move {
        let Some(unit) = unit() else {
            return;
        };
        let online = online();
        loading.set(true);

        let fetched = if online {
            api::fetch_records::<R>().await
        } else {
            Err(StoreError::Unavailable("server unreachable".to_string()))
        };
        match fetched {
            Ok(rows) => {
                records.set(rows);
                offline.set(false);
            }
            Err(e) => {
                if online {
                    tracing::error!("Failed to load {}: {}", R::COLLECTION, e);
                    push_alert(
                        &mut alerts,
                        AlertLevel::Warning,
                        &format!("Showing offline data for {}: {e}", R::COLLECTION),
                    );
                }
                records.set(scope_to_unit(&Seed::demo().records::<R>(), &unit));
                offline.set(true);
            }
        }
        loading.set(false);
    });

    Dataset {
        records,
        offline,
        loading,
    }
}

/// Small marker shown on screens backed by demo rows.
#[component]
pub fn OfflineBadge(offline: bool) -> Element {
    if !offline {
        return rsx! {};
    }
    rsx! {
        span {
            class: "badge badge--warning",
            title: "The server could not be reached; showing built-in demo data",
            "Offline data"
        }
    }
}
