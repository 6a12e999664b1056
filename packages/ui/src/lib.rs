//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

pub mod components;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub mod views;

pub const TAILWIND_CSS: Asset = asset!("/assets/tailwind.css");

mod auth;
pub use auth::{
    use_auth, use_settings, use_units, AuthProvider, AuthState, LoginForm, LogoutButton, SessionKv,
    UnitSwitcher,
};

mod online_indicator;
pub use online_indicator::OnlineIndicator;

mod sidebar;
pub use sidebar::{module_icon, AppSidebar};

pub mod alerts;
pub use alerts::{push_alert, use_alerts, AlertLevel, AlertPanel, AlertProvider, AlertToggle, Alerts};
