use dioxus::prelude::*;
use store::Module;
use ui::use_auth;
use ui::views::ModuleShell;

use crate::Route;

fn page_route(module: Module, page: &str) -> Route {
    Route::ModulePage {
        module: module.slug().to_string(),
        page: page.to_string(),
    }
}

#[component]
fn Loading() -> Element {
    rsx! {
        div { class: "loading-screen", "Loading..." }
    }
}

/// Redirect `/` to the dashboard, or to `/login` without a session.
#[component]
pub fn Root() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    let state = auth();
    if state.loading {
        return rsx! { Loading {} };
    }
    if state.unit().is_some() {
        let dashboard = Module::Dashboard;
        nav.replace(page_route(dashboard, dashboard.default_page().slug));
    } else {
        nav.replace(Route::Login {});
    }
    rsx! {}
}

/// `/:module` opens the module's first page.
#[component]
pub fn ModuleHome(module: String) -> Element {
    let nav = use_navigator();
    match Module::from_slug(&module) {
        Some(found) => nav.replace(page_route(found, found.default_page().slug)),
        None => nav.replace(Route::Root {}),
    };
    rsx! {}
}

/// `/:module/:page` inside the signed-in shell. Unknown slugs fall back to
/// the nearest valid page.
#[component]
pub fn ModulePage(module: String, page: String) -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    let state = auth();
    if state.loading {
        return rsx! { Loading {} };
    }
    if state.unit().is_none() {
        nav.replace(Route::Login {});
        return rsx! {};
    }
    let Some(current) = Module::from_slug(&module) else {
        nav.replace(Route::Root {});
        return rsx! {};
    };
    let Some(current_page) = current.page(&page) else {
        nav.replace(page_route(current, current.default_page().slug));
        return rsx! {};
    };

    rsx! {
        ModuleShell {
            module: current,
            page: *current_page,
            on_navigate: move |(module, page): (Module, &'static str)| {
                nav.push(page_route(module, page));
            },
            on_logout: move |_| {
                nav.replace(Route::Login {});
            },
        }
    }
}
