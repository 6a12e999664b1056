//! Session context and the sign-in controls.
//!
//! [`AuthProvider`] owns the one [`SessionState`] of the app. Every sign-in,
//! unit switch and sign-out writes through it, so the unit on screen and the
//! persisted session agree. On startup the persisted session is reconciled
//! with the server session: a server that answers "not signed in" clears the
//! local copy, an unreachable server keeps it and flags the app offline.

use api::{LoginReply, UiSettings};
use dioxus::prelude::*;
use store::{
    Authenticator, HealthUnit, HospAdminConfig, LoginFlow, MemoryRecordStore, Seed, SessionState,
    SessionStore, StaticSecrets,
};

use crate::alerts::{push_alert, use_alerts, AlertLevel};
use crate::components::{Button, ButtonVariant, Input, Label, Select};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type SessionKv = store::LocalStorageKv;
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub type SessionKv = store::MemoryKv;

fn new_session(key: &str) -> SessionState<SessionKv> {
    SessionState::new(SessionStore::with_key(SessionKv::new(), key))
}

/// Authentication state for the application.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub session: SessionState<SessionKv>,
    pub loading: bool,
    /// Whether the server answered the last check.
    pub online: bool,
}

impl AuthState {
    pub fn unit(&self) -> Option<&HealthUnit> {
        self.session.unit()
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            session: new_session(&UiSettings::default().session_key),
            loading: true,
            online: false,
        }
    }
}

/// Get the current authentication state.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Server-provided list settings, defaults until the server answers.
pub fn use_settings() -> Signal<UiSettings> {
    use_context::<Signal<UiSettings>>()
}

/// Align the local session with what the server reports.
fn reconcile(session: &mut SessionState<SessionKv>, server_unit: Option<HealthUnit>) {
    match server_unit {
        Some(unit) if session.unit() == Some(&unit) => {}
        Some(unit) => {
            if let Err(e) = session.sign_in(unit) {
                tracing::error!("Failed to persist session: {}", e);
            }
        }
        None if session.is_authenticated() => {
            tracing::info!("Server session ended, signing out locally");
            session.sign_out();
        }
        None => {}
    }
}

/// Provider component that manages authentication state.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let mut auth_state = use_signal(AuthState::default);
    let mut settings = use_signal(UiSettings::default);

    let _ = use_resource(move || async move {
        let (online, loaded) = match api::ui_settings().await {
            Ok(loaded) => (true, loaded),
            Err(e) => {
                tracing::warn!("Settings unavailable, using defaults: {}", e);
                (false, UiSettings::default())
            }
        };
        let mut session = new_session(&loaded.session_key);
        session.restore_on_start();
        settings.set(loaded);

        let online = match api::current_unit().await {
            Ok(server_unit) => {
                reconcile(&mut session, server_unit);
                online
            }
            Err(e) => {
                tracing::warn!("Server unreachable, keeping local session: {}", e);
                false
            }
        };
        auth_state.set(AuthState {
            session,
            loading: false,
            online,
        });
    });

    // Periodic connectivity check (every 30s)
    use_effect(move || {
        spawn(async move {
            loop {
                #[cfg(target_arch = "wasm32")]
                gloo_timers::future::sleep(std::time::Duration::from_secs(30)).await;
                #[cfg(not(target_arch = "wasm32"))]
                tokio::time::sleep(std::time::Duration::from_secs(30)).await;

                if auth_state.peek().loading {
                    continue;
                }
                match api::current_unit().await {
                    Ok(server_unit) => {
                        let mut state = auth_state.peek().clone();
                        // An offline sign-in has no server session to compare with.
                        if state.online {
                            reconcile(&mut state.session, server_unit);
                        }
                        state.online = true;
                        if state.unit() != auth_state.peek().unit() || !auth_state.peek().online {
                            auth_state.set(state);
                        }
                    }
                    Err(_) => {
                        if auth_state.peek().online {
                            auth_state.write().online = false;
                        }
                    }
                }
            }
        });
    });

    use_context_provider(|| auth_state);
    use_context_provider(|| settings);

    rsx! {
        {children}
    }
}

/// Profiles and secrets available for signing in without the server.
/// Demo builds carry the seeded accounts.
#[cfg(feature = "offline-demo")]
async fn offline_directory() -> Result<(MemoryRecordStore, StaticSecrets, Vec<HealthUnit>), store::StoreError> {
    let seed = Seed::demo();
    let records = MemoryRecordStore::new();
    seed.load_into(&records).await?;
    let secrets = Seed::demo_secrets()
        .into_iter()
        .fold(StaticSecrets::new(), |secrets, (id, secret)| secrets.with(id, secret));
    Ok((records, secrets, seed.units))
}

/// Without the demo accounts only the reserved accounts sign in offline;
/// every profile lookup fails as unreachable.
#[cfg(not(feature = "offline-demo"))]
async fn offline_directory() -> Result<(MemoryRecordStore, StaticSecrets, Vec<HealthUnit>), store::StoreError> {
    let records = MemoryRecordStore::new();
    records.set_reachable(false);
    Ok((records, StaticSecrets::new(), Vec::new()))
}

/// Authenticate without the server. Nothing is persisted remotely.
async fn offline_login(
    flow: &mut LoginFlow,
    session: &mut SessionState<SessionKv>,
    identifier: &str,
    secret: &str,
) -> Option<HealthUnit> {
    let (records, secrets, units) = match offline_directory().await {
        Ok(directory) => directory,
        Err(e) => {
            flow.fail(e.to_string());
            return None;
        }
    };
    let authenticator = Authenticator::new(records, secrets, &HospAdminConfig::default().auth);
    flow.submit(&authenticator, session, identifier, secret, &units)
        .await
}

/// Identifier + secret form. Calls `on_success` with the unit once the session is written.
#[component]
pub fn LoginForm(on_success: EventHandler<HealthUnit>) -> Element {
    let mut auth = use_auth();
    let mut flow = use_signal(LoginFlow::new);
    let mut identifier = use_signal(String::new);
    let mut secret = use_signal(String::new);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        flow.write().begin();
        spawn(async move {
            let id = identifier();
            let pw = secret();
            let mut state = flow();
            let mut session = auth.peek().session.clone();

            let (unit, online) = match api::login(id.clone(), pw.clone()).await {
                Ok(LoginReply::SignedIn(unit)) => (state.finish(Ok(unit), &mut session), true),
                Ok(LoginReply::Rejected(message)) => {
                    state.fail(message);
                    (None, true)
                }
                Err(e) => {
                    tracing::warn!("Login server unreachable, using offline data: {}", e);
                    (offline_login(&mut state, &mut session, &id, &pw).await, false)
                }
            };

            flow.set(state);
            if let Some(unit) = unit {
                {
                    let mut auth = auth.write();
                    auth.session = session;
                    auth.online = online;
                    auth.loading = false;
                }
                secret.set(String::new());
                on_success.call(unit);
            }
        });
    };

    let loading = flow().loading;

    rsx! {
        form {
            class: "flex flex-col gap-4 w-full",
            onsubmit: onsubmit,
            div {
                Label { html_for: "login-identifier", "E-mail, name or ID" }
                Input {
                    id: "login-identifier",
                    class: "w-full mt-1.5",
                    placeholder: "name@saude.gov",
                    value: identifier(),
                    oninput: move |evt: FormEvent| identifier.set(evt.value()),
                }
            }
            div {
                Label { html_for: "login-secret", "Password" }
                Input {
                    id: "login-secret",
                    class: "w-full mt-1.5",
                    r#type: "password",
                    value: secret(),
                    oninput: move |evt: FormEvent| secret.set(evt.value()),
                }
            }
            if let Some(error) = flow().error {
                p { class: "m-0 text-sm text-red-600", role: "alert", "{error}" }
            }
            Button {
                variant: ButtonVariant::Primary,
                class: "justify-center",
                r#type: "submit",
                disabled: loading,
                if loading { "Signing in..." } else { "Sign in" }
            }
        }
    }
}

/// Button to end the session, locally and on the server.
#[component]
pub fn LogoutButton(
    #[props(default = "Sign out".to_string())] label: String,
    on_logout: EventHandler<()>,
) -> Element {
    let mut auth = use_auth();

    let onclick = move |_| {
        spawn(async move {
            if let Err(e) = api::logout().await {
                tracing::warn!("Server logout failed: {}", e);
            }
            auth.write().session.sign_out();
            on_logout.call(());
        });
    };

    rsx! {
        Button {
            variant: ButtonVariant::Ghost,
            onclick: onclick,
            "{label}"
        }
    }
}

/// Units the session may move to while the server is unreachable.
fn offline_units(current: &HealthUnit) -> Vec<HealthUnit> {
    if !current.is_master() {
        return vec![current.clone()];
    }
    let mut units = Seed::demo().units;
    units.insert(0, HealthUnit::master());
    units
}

/// Units the signed-in session can reach: every unit for a master home,
/// otherwise the home unit. Reloaded when connectivity changes.
pub fn use_units() -> Signal<Vec<HealthUnit>> {
    let auth = use_auth();
    let mut units = use_signal(Vec::<HealthUnit>::new);
    let online = use_memo(move || auth().online);

    let _ = use_resource(move || async move {
        let online = online();
        let Some(current) = auth.peek().unit().cloned() else {
            return;
        };
        let list = if online {
            match api::list_units().await {
                Ok(list) => list,
                Err(e) => {
                    tracing::error!("Failed to list units: {}", e);
                    vec![current]
                }
            }
        } else {
            offline_units(&current)
        };
        units.set(list);
    });

    units
}

/// Drop-down to change the active unit. Renders the unit name alone when
/// there is nothing to switch to.
#[component]
pub fn UnitSwitcher() -> Element {
    let mut auth = use_auth();
    let mut alerts = use_alerts();
    let units = use_units();

    let on_change = move |unit_id: String| {
        spawn(async move {
            let target = if auth.peek().online {
                match api::switch_unit(unit_id).await {
                    Ok(unit) => unit,
                    Err(e) => {
                        tracing::error!("Unit switch rejected: {}", e);
                        push_alert(&mut alerts, AlertLevel::Error, &format!("Could not switch unit: {e}"));
                        return;
                    }
                }
            } else {
                match units.peek().iter().find(|u| u.id == unit_id) {
                    Some(unit) => unit.clone(),
                    None => return,
                }
            };
            let switched = auth.write().session.switch_unit(target.clone());
            match switched {
                Ok(true) => push_alert(
                    &mut alerts,
                    AlertLevel::Info,
                    &format!("Now working in {}", target.name),
                ),
                Ok(false) => {}
                Err(e) => push_alert(&mut alerts, AlertLevel::Error, &e.to_string()),
            }
        });
    };

    let state = auth();
    let Some(current) = state.unit() else {
        return rsx! {};
    };

    if units().len() <= 1 {
        return rsx! {
            span { class: "unit-name", "{current.name}" }
        };
    }

    let options: Vec<(String, String)> = units()
        .iter()
        .map(|u| (u.id.clone(), u.name.clone()))
        .collect();

    rsx! {
        Select {
            id: "unit-switcher",
            class: "unit-switcher",
            options: options,
            value: current.id.clone(),
            onchange: on_change,
        }
    }
}
