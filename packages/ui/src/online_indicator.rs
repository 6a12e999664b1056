//! Online/offline status indicator for the shell header.

use dioxus::prelude::*;

use crate::auth::use_auth;
use crate::icons::{FaCloud, FaCloudArrowUp};
use crate::Icon;

/// A small icon that shows whether the server is answering.
///
/// - **Online**: green cloud icon
/// - **Offline**: orange cloud-up icon; screens show demo data and edits stay local
#[component]
pub fn OnlineIndicator() -> Element {
    let auth = use_auth();
    let state = auth();

    if state.loading {
        return rsx! {};
    }

    if state.online {
        rsx! {
            span {
                class: "online-indicator online-indicator--online",
                title: "Connected",
                Icon { icon: FaCloud, width: 14, height: 14 }
            }
        }
    } else {
        rsx! {
            span {
                class: "online-indicator online-indicator--offline",
                title: "Offline: showing demo data, changes are not saved",
                Icon { icon: FaCloudArrowUp, width: 14, height: 14 }
            }
        }
    }
}
