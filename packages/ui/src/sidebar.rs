use dioxus::prelude::*;
use store::{Module, ModuleIcon};

use crate::icons::{
    FaBaby, FaBed, FaCalendarDays, FaChartLine, FaFileSignature, FaFolderOpen, FaGauge,
    FaHospital, FaUserShield, FaVirus,
};
use crate::Icon;

const SIDEBAR_CSS: Asset = asset!("/assets/styling/sidebar.css");

/// Concrete icon for a module tag. Every tag has exactly one icon.
pub fn module_icon(icon: ModuleIcon) -> Element {
    match icon {
        ModuleIcon::Gauge => rsx! { Icon { icon: FaGauge, width: 16, height: 16 } },
        ModuleIcon::UserShield => rsx! { Icon { icon: FaUserShield, width: 16, height: 16 } },
        ModuleIcon::FolderOpen => rsx! { Icon { icon: FaFolderOpen, width: 16, height: 16 } },
        ModuleIcon::Bed => rsx! { Icon { icon: FaBed, width: 16, height: 16 } },
        ModuleIcon::FileSignature => rsx! { Icon { icon: FaFileSignature, width: 16, height: 16 } },
        ModuleIcon::Virus => rsx! { Icon { icon: FaVirus, width: 16, height: 16 } },
        ModuleIcon::ChartLine => rsx! { Icon { icon: FaChartLine, width: 16, height: 16 } },
        ModuleIcon::Baby => rsx! { Icon { icon: FaBaby, width: 16, height: 16 } },
        ModuleIcon::CalendarDays => rsx! { Icon { icon: FaCalendarDays, width: 16, height: 16 } },
    }
}

/// Module navigation for the signed-in unit.
#[component]
pub fn AppSidebar(
    modules: Vec<Module>,
    active: Module,
    on_select: EventHandler<Module>,
) -> Element {
    rsx! {
        document::Stylesheet { href: SIDEBAR_CSS }

        nav {
            class: "sidebar",
            div {
                class: "sidebar-brand",
                Icon { icon: FaHospital, width: 18, height: 18 }
                span { "HospAdmin" }
            }
            div {
                class: "sidebar-modules",
                for module in modules {
                    button {
                        key: "{module.slug()}",
                        class: if module == active { "sidebar-item active" } else { "sidebar-item" },
                        onclick: move |_| on_select.call(module),
                        {module_icon(module.icon())}
                        span { "{module.title()}" }
                    }
                }
            }
        }
    }
}
