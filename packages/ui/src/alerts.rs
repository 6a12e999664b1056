//! User-facing alerts: store errors, saves, exports and session changes.

use dioxus::prelude::*;

use crate::icons::{FaBell, FaXmark};
use crate::Icon;

const ALERTS_CSS: Asset = asset!("/assets/styling/alerts.css");

/// How many alerts are kept before the oldest are dropped.
const MAX_ALERTS: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AlertLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl AlertLevel {
    fn class(&self) -> &'static str {
        match self {
            AlertLevel::Info => "alert info",
            AlertLevel::Success => "alert success",
            AlertLevel::Warning => "alert warning",
            AlertLevel::Error => "alert error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Alert {
    pub timestamp: String,
    pub level: AlertLevel,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct Alerts {
    pub entries: Vec<Alert>,
    pub visible: bool,
}

impl Alerts {
    pub fn push(&mut self, level: AlertLevel, message: impl Into<String>) {
        self.entries.push(Alert {
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            level,
            message: message.into(),
        });
        if self.entries.len() > MAX_ALERTS {
            let excess = self.entries.len() - MAX_ALERTS;
            self.entries.drain(..excess);
        }
        // Errors open the panel so they are not missed.
        if level == AlertLevel::Error {
            self.visible = true;
        }
    }

    pub fn unread_errors(&self) -> bool {
        self.entries.iter().any(|e| e.level == AlertLevel::Error)
    }
}

pub fn use_alerts() -> Signal<Alerts> {
    use_context::<Signal<Alerts>>()
}

pub fn push_alert(alerts: &mut Signal<Alerts>, level: AlertLevel, message: &str) {
    alerts.write().push(level, message);
}

/// Provides the [`Alerts`] context to its children.
#[component]
pub fn AlertProvider(children: Element) -> Element {
    use_context_provider(|| Signal::new(Alerts::default()));
    rsx! {
        {children}
    }
}

#[component]
pub fn AlertPanel() -> Element {
    let mut alerts = use_alerts();

    if !alerts().visible {
        return rsx! {};
    }

    let entries = alerts().entries.clone();

    rsx! {
        document::Stylesheet { href: ALERTS_CSS }

        div {
            class: "alert-panel",
            div {
                class: "alert-panel-header",
                span { "Alerts" }
                div {
                    class: "alert-panel-actions",
                    button {
                        onclick: move |_| alerts.write().entries.clear(),
                        "Clear"
                    }
                    button {
                        title: "Close",
                        onclick: move |_| alerts.write().visible = false,
                        Icon { icon: FaXmark, width: 12, height: 12 }
                    }
                }
            }
            div {
                class: "alert-panel-entries",
                if entries.is_empty() {
                    div { class: "alert-empty", "Nothing to report." }
                }
                for entry in entries.iter().rev() {
                    div {
                        class: entry.level.class(),
                        span { class: "alert-time", "{entry.timestamp}" }
                        span { " {entry.message}" }
                    }
                }
            }
        }
    }
}

#[component]
pub fn AlertToggle() -> Element {
    let mut alerts = use_alerts();
    let count = alerts().entries.len();
    let has_errors = alerts().unread_errors();

    rsx! {
        document::Stylesheet { href: ALERTS_CSS }

        button {
            class: if has_errors { "alert-toggle has-errors" } else { "alert-toggle" },
            title: "Alerts",
            onclick: move |_| {
                let visible = alerts().visible;
                alerts.write().visible = !visible;
            },
            Icon { icon: FaBell, width: 14, height: 14 }
            if count > 0 {
                span { class: "alert-count", "{count}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_open_panel() {
        let mut alerts = Alerts::default();
        alerts.push(AlertLevel::Info, "Loaded 4 beds");
        assert!(!alerts.visible);
        alerts.push(AlertLevel::Error, "Record store unavailable");
        assert!(alerts.visible);
        assert!(alerts.unread_errors());
    }

    #[test]
    fn test_oldest_alerts_dropped() {
        let mut alerts = Alerts::default();
        for i in 0..(MAX_ALERTS + 5) {
            alerts.push(AlertLevel::Info, format!("alert {i}"));
        }
        assert_eq!(alerts.entries.len(), MAX_ALERTS);
        assert_eq!(alerts.entries[0].message, "alert 5");
    }
}
