use dioxus::prelude::*;
use store::modules::authorization::{
    priority_class, priority_score, HospitalizationCriteria, PriorityClass, Severity,
    SEVERITY_OPTIONS,
};

use crate::components::{Input, Label, Select};

fn parse_count(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}

fn parse_severity(value: &str) -> Severity {
    serde_json::from_value(serde_json::Value::String(value.to_string())).unwrap_or_default()
}

fn class_tone(class: PriorityClass) -> &'static str {
    match class {
        PriorityClass::Red => "priority priority--red",
        PriorityClass::Orange => "priority priority--orange",
        PriorityClass::Yellow => "priority priority--yellow",
        PriorityClass::Green => "priority priority--green",
    }
}

/// Hospitalization priority calculator. Recomputes on every change.
#[component]
pub fn PriorityCalculatorView() -> Element {
    let mut criteria = use_signal(HospitalizationCriteria::default);
    let current = criteria();
    let score = priority_score(&current);
    let class = priority_class(&current);
    let severity_options: Vec<(String, String)> = SEVERITY_OPTIONS
        .iter()
        .map(|(value, label)| (value.to_string(), label.to_string()))
        .collect();
    let severity_value = serde_json::to_value(current.severity)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();

    rsx! {
        div {
            class: "priority-calculator",
            div {
                class: "grid grid-cols-2 gap-4 max-w-xl",
                div {
                    Label { html_for: "priority-age", "Age (years)" }
                    Input {
                        id: "priority-age",
                        class: "w-full mt-1.5",
                        r#type: "number",
                        value: current.age.to_string(),
                        oninput: move |evt: FormEvent| criteria.write().age = parse_count(&evt.value()),
                    }
                }
                div {
                    Label { html_for: "priority-severity", "Clinical severity" }
                    Select {
                        id: "priority-severity",
                        class: "w-full mt-1.5",
                        options: severity_options,
                        value: severity_value,
                        onchange: move |value: String| criteria.write().severity = parse_severity(&value),
                    }
                }
                div {
                    Label { html_for: "priority-comorbidities", "Comorbidities" }
                    Input {
                        id: "priority-comorbidities",
                        class: "w-full mt-1.5",
                        r#type: "number",
                        value: current.comorbidities.to_string(),
                        oninput: move |evt: FormEvent| criteria.write().comorbidities = parse_count(&evt.value()),
                    }
                }
                div {
                    Label { html_for: "priority-waiting", "Days waiting" }
                    Input {
                        id: "priority-waiting",
                        class: "w-full mt-1.5",
                        r#type: "number",
                        value: current.waiting_days.to_string(),
                        oninput: move |evt: FormEvent| criteria.write().waiting_days = parse_count(&evt.value()),
                    }
                }
                label {
                    class: "flex items-center gap-2 text-sm",
                    input {
                        r#type: "checkbox",
                        checked: current.pregnant,
                        onchange: move |evt: FormEvent| criteria.write().pregnant = evt.checked(),
                    }
                    "Pregnant"
                }
            }
            div {
                class: "{class_tone(class)} mt-6",
                span { class: "priority-score", "{score}" }
                span { class: "priority-label", "{class.label()}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_parsing() {
        assert_eq!(parse_count(" 7 "), 7);
        assert_eq!(parse_count("-3"), 0);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_severity("critical"), Severity::Critical);
        assert_eq!(parse_severity("unknown"), Severity::Low);
    }
}
