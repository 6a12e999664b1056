//! Small form primitives shared by every screen.

use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
    Ghost,
    Destructive,
}

impl ButtonVariant {
    fn class(&self) -> &'static str {
        match self {
            ButtonVariant::Primary => "bg-sky-700 text-white hover:bg-sky-800",
            ButtonVariant::Secondary => "bg-neutral-100 text-neutral-800 hover:bg-neutral-200",
            ButtonVariant::Outline => "border border-neutral-300 text-neutral-700 hover:bg-neutral-50",
            ButtonVariant::Ghost => "text-neutral-600 hover:bg-neutral-100",
            ButtonVariant::Destructive => "bg-red-600 text-white hover:bg-red-700",
        }
    }
}

#[component]
pub fn Button(
    #[props(default)] variant: ButtonVariant,
    #[props(default)] class: String,
    #[props(default)] disabled: bool,
    #[props(default = "button".to_string())] r#type: String,
    #[props(default)] title: String,
    onclick: Option<EventHandler<MouseEvent>>,
    children: Element,
) -> Element {
    rsx! {
        button {
            class: "inline-flex items-center gap-1.5 px-3 py-1.5 rounded text-sm font-medium disabled:opacity-50 disabled:cursor-not-allowed {variant.class()} {class}",
            r#type: "{r#type}",
            title: "{title}",
            disabled,
            onclick: move |evt| {
                if let Some(handler) = onclick {
                    handler.call(evt);
                }
            },
            {children}
        }
    }
}

#[component]
pub fn Input(
    #[props(default)] id: String,
    #[props(default)] class: String,
    #[props(default = "text".to_string())] r#type: String,
    #[props(default)] placeholder: String,
    #[props(default)] value: String,
    #[props(default)] disabled: bool,
    oninput: Option<EventHandler<FormEvent>>,
) -> Element {
    rsx! {
        input {
            id: "{id}",
            class: "px-2.5 py-1.5 rounded border border-neutral-300 text-sm focus:outline-none focus:border-sky-600 {class}",
            r#type: "{r#type}",
            placeholder: "{placeholder}",
            value: "{value}",
            disabled,
            oninput: move |evt| {
                if let Some(handler) = oninput {
                    handler.call(evt);
                }
            },
        }
    }
}

#[component]
pub fn Label(#[props(default)] html_for: String, children: Element) -> Element {
    rsx! {
        label {
            r#for: "{html_for}",
            class: "block text-xs font-medium text-neutral-600",
            {children}
        }
    }
}

/// A `<select>` over `(value, label)` pairs with an optional blank first entry.
#[component]
pub fn Select(
    #[props(default)] id: String,
    #[props(default)] class: String,
    options: Vec<(String, String)>,
    value: String,
    /// Label of the empty option; no empty option when blank.
    #[props(default)]
    placeholder: String,
    onchange: EventHandler<String>,
) -> Element {
    rsx! {
        select {
            id: "{id}",
            class: "px-2 py-1.5 rounded border border-neutral-300 text-sm bg-white {class}",
            value: "{value}",
            onchange: move |evt: FormEvent| onchange.call(evt.value()),
            if !placeholder.is_empty() {
                option { value: "", selected: value.is_empty(), "{placeholder}" }
            }
            for (option_value, label) in options {
                option {
                    key: "{option_value}",
                    value: "{option_value}",
                    selected: option_value == value,
                    "{label}"
                }
            }
        }
    }
}

/// A rounded status pill.
#[component]
pub fn Badge(tone: String, children: Element) -> Element {
    rsx! {
        span { class: "badge badge--{tone}", {children} }
    }
}
