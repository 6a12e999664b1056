use dioxus::prelude::*;
use store::modules::{ModulePage, PageView};
use store::Module;

use super::{BedMapView, CaseSummaryView, CollectionPage, OverviewView, PriorityCalculatorView};
use crate::{AlertPanel, AlertToggle, AppSidebar, LogoutButton, OnlineIndicator, UnitSwitcher, use_auth};

const SHELL_CSS: Asset = asset!("/assets/styling/shell.css");

/// The signed-in frame: module sidebar, header controls, page tabs and the
/// current page.
///
/// Platform packages map routes to `module`/`page` and handle `on_navigate`
/// and `on_logout`.
#[component]
pub fn ModuleShell(
    module: Module,
    page: ModulePage,
    /// Called with the module and page slug the user picked.
    on_navigate: EventHandler<(Module, &'static str)>,
    on_logout: EventHandler<()>,
) -> Element {
    let auth = use_auth();
    let state = auth();
    let Some(unit) = state.unit() else {
        return rsx! {};
    };
    let modules = Module::visible_for(unit);
    let allowed = modules.contains(&module);

    rsx! {
        document::Stylesheet { href: SHELL_CSS }

        div {
            class: "shell",
            AppSidebar {
                modules: modules,
                active: module,
                on_select: move |m: Module| on_navigate.call((m, m.default_page().slug)),
            }

            div {
                class: "shell-main",
                header {
                    class: "shell-header",
                    h1 { class: "shell-title", "{module.title()}" }
                    div { class: "flex-1" }
                    UnitSwitcher {}
                    OnlineIndicator {}
                    AlertToggle {}
                    LogoutButton { on_logout: on_logout }
                }

                if allowed {
                    if module.pages().len() > 1 {
                        nav {
                            class: "shell-tabs",
                            for tab in module.pages().iter() {
                                button {
                                    key: "{tab.slug}",
                                    class: if tab.slug == page.slug { "shell-tab active" } else { "shell-tab" },
                                    onclick: move |_| on_navigate.call((module, tab.slug)),
                                    "{tab.title}"
                                }
                            }
                        }
                    }
                    main {
                        class: "shell-content",
                        PageContent { view: page.view }
                    }
                } else {
                    main {
                        class: "shell-content",
                        p { class: "text-sm text-neutral-500", "This module is only available to the master unit." }
                    }
                }

                AlertPanel {}
            }
        }
    }
}

#[component]
fn PageContent(view: PageView) -> Element {
    match view {
        PageView::Overview => rsx! { OverviewView {} },
        PageView::BedMap => rsx! { BedMapView {} },
        PageView::PriorityCalculator => rsx! { PriorityCalculatorView {} },
        PageView::CaseSummary => rsx! { CaseSummaryView {} },
        PageView::Collection(collection) => rsx! {
            CollectionPage { key: "{collection}", collection }
        },
    }
}
