//! Login page view.

use dioxus::prelude::*;
use ui::{use_auth, LoginForm};

use crate::Route;

/// Login page component.
#[component]
pub fn Login() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    // Already signed in: go to the dashboard
    if !auth().loading && auth().unit().is_some() {
        nav.replace(Route::Root {});
    }

    rsx! {
        div {
            class: "login-container",
            div {
                class: "login-card",
                h1 { class: "login-title", "HospAdmin" }
                p { class: "login-subtitle", "Sign in to your health unit" }
                LoginForm {
                    on_success: move |_| {
                        nav.replace(Route::Root {});
                    },
                }
            }
        }
    }
}
