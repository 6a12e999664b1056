//! # Authentication flow
//!
//! Resolves `(identifier, secret)` into the [`HealthUnit`] the user works in.
//! Rules, first match wins:
//!
//! 1. A configured reserved account (super-admin, general manager) signs in to
//!    [`HealthUnit::master`] without touching the record store.
//! 2. Otherwise the `profiles` collection is searched for a record whose
//!    `email` or `name` equals the identifier.
//! 3. The secret is checked by a [`SecretVerifier`] and, unless disabled in
//!    configuration, the profile must be `active`.
//! 4. The profile's `unit_id` is resolved from the already-loaded unit list,
//!    falling back to a lookup by id.
//!
//! [`LoginFlow`] wraps this for screens: it tracks `loading` and the error
//! message shown under the form, and writes the session on success. No error
//! escapes it.

use std::collections::HashMap;

use crate::config::{AuthConfig, ReservedAccount};
use crate::models::{HealthUnit, Profile, ProfileStatus};
use crate::records::{Filter, RecordStore, StoreError};
use crate::session::{KeyValueStore, SessionState};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Identifier and password are required")]
    MissingInput,
    #[error("User not found")]
    UserNotFound,
    #[error("Health unit not found")]
    UnitNotFound,
    #[error("Invalid identifier or password")]
    InvalidCredentials,
    #[error("Account is {0}")]
    Inactive(ProfileStatus),
    #[error("Login failed: {0}")]
    Store(#[from] StoreError),
}

/// Checks a submitted secret against a profile's stored credential.
pub trait SecretVerifier {
    fn verify(
        &self,
        profile: &Profile,
        secret: &str,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>>;
}

/// Verifier over a fixed `profile id → secret` table. Used for offline demos and tests.
#[derive(Clone, Debug, Default)]
pub struct StaticSecrets {
    secrets: HashMap<String, String>,
}

impl StaticSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, profile_id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.secrets.insert(profile_id.into(), secret.into());
        self
    }
}

impl SecretVerifier for StaticSecrets {
    async fn verify(&self, profile: &Profile, secret: &str) -> Result<bool, StoreError> {
        Ok(self
            .secrets
            .get(&profile.id)
            .is_some_and(|stored| stored == secret))
    }
}

/// Resolves credentials to a health unit.
#[derive(Clone, Debug)]
pub struct Authenticator<S: RecordStore, V: SecretVerifier> {
    store: S,
    verifier: V,
    reserved: Vec<ReservedAccount>,
    require_active: bool,
}

impl<S: RecordStore, V: SecretVerifier> Authenticator<S, V> {
    pub fn new(store: S, verifier: V, config: &AuthConfig) -> Self {
        Self {
            store,
            verifier,
            reserved: config.reserved.clone(),
            require_active: config.require_active,
        }
    }

    fn reserved_account(&self, identifier: &str, secret: &str) -> Option<&ReservedAccount> {
        self.reserved
            .iter()
            .find(|account| account.identifier == identifier && account.secret == secret)
    }

    pub async fn authenticate(
        &self,
        identifier: &str,
        secret: &str,
        loaded_units: &[HealthUnit],
    ) -> Result<HealthUnit, AuthError> {
        let identifier = identifier.trim();
        if identifier.is_empty() || secret.is_empty() {
            return Err(AuthError::MissingInput);
        }

        if let Some(account) = self.reserved_account(identifier, secret) {
            tracing::info!("Reserved account {:?} signed in to master unit", account.label);
            return Ok(HealthUnit::master());
        }

        let profiles: Vec<Profile> = self
            .store
            .select_where(&Filter::any_of([("email", identifier), ("name", identifier)]))
            .await?;
        let Some(profile) = profiles.into_iter().next() else {
            tracing::info!("Login rejected: no profile matches {identifier}");
            return Err(AuthError::UserNotFound);
        };

        if !self.verifier.verify(&profile, secret).await? {
            tracing::info!("Login rejected: bad secret for profile {}", profile.id);
            return Err(AuthError::InvalidCredentials);
        }

        if self.require_active && profile.status != ProfileStatus::Active {
            tracing::info!("Login rejected: profile {} is {}", profile.id, profile.status);
            return Err(AuthError::Inactive(profile.status));
        }

        if let Some(unit) = loaded_units.iter().find(|u| u.id == profile.unit_id) {
            return Ok(unit.clone());
        }
        match self.store.select_by_id::<HealthUnit>(&profile.unit_id).await? {
            Some(unit) => Ok(unit),
            None => {
                tracing::warn!(
                    "Profile {} points at missing unit {}",
                    profile.id,
                    profile.unit_id
                );
                Err(AuthError::UnitNotFound)
            }
        }
    }
}

/// Screen-facing login state: a loading flag and the message under the form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoginFlow {
    pub loading: bool,
    pub error: Option<String>,
}

impl LoginFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Record a failure that happened outside [`Authenticator`], e.g. a network error.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Apply an authentication result: on success the session is written.
    pub fn finish<K: KeyValueStore>(
        &mut self,
        result: Result<HealthUnit, AuthError>,
        session: &mut SessionState<K>,
    ) -> Option<HealthUnit> {
        self.loading = false;
        match result {
            Ok(unit) => match session.sign_in(unit.clone()) {
                Ok(()) => {
                    self.error = None;
                    Some(unit)
                }
                Err(e) => {
                    self.error = Some(e.to_string());
                    None
                }
            },
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    pub async fn submit<S: RecordStore, V: SecretVerifier, K: KeyValueStore>(
        &mut self,
        authenticator: &Authenticator<S, V>,
        session: &mut SessionState<K>,
        identifier: &str,
        secret: &str,
        loaded_units: &[HealthUnit],
    ) -> Option<HealthUnit> {
        self.begin();
        let result = authenticator
            .authenticate(identifier, secret, loaded_units)
            .await;
        self.finish(result, session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryKv, MemoryRecordStore};
    use crate::models::UnitType;
    use crate::session::SessionStore;

    fn profile(id: &str, email: &str, unit_id: &str, status: ProfileStatus) -> Profile {
        Profile {
            id: id.into(),
            name: format!("Nome {id}"),
            role: "Enfermeiro".into(),
            email: email.into(),
            status,
            department: "Emergência".into(),
            unit_id: unit_id.into(),
        }
    }

    async fn fixture() -> (MemoryRecordStore, Authenticator<MemoryRecordStore, StaticSecrets>) {
        let store = MemoryRecordStore::new();
        store
            .insert(HealthUnit::new("h1", "Hospital Central", UnitType::Hospital))
            .await
            .unwrap();
        store
            .insert(HealthUnit::new("u1", "UPA Norte", UnitType::Upa))
            .await
            .unwrap();
        store
            .insert(profile("p1", "ana@saude.gov", "h1", ProfileStatus::Active))
            .await
            .unwrap();
        store
            .insert(profile("p2", "bia@saude.gov", "u1", ProfileStatus::Suspended))
            .await
            .unwrap();
        store
            .insert(profile("p3", "caio@saude.gov", "gone", ProfileStatus::Active))
            .await
            .unwrap();
        store
            .insert(profile("p4", "davi@saude.gov", "h1", ProfileStatus::Active))
            .await
            .unwrap();

        let secrets = StaticSecrets::new()
            .with("p1", "senha-ana")
            .with("p2", "senha-bia")
            .with("p3", "senha-caio");
        let auth = Authenticator::new(store.clone(), secrets, &AuthConfig::default());
        (store, auth)
    }

    #[tokio::test]
    async fn test_reserved_accounts_bypass_unreachable_store() {
        let (store, auth) = fixture().await;
        store.set_reachable(false);

        let unit = auth.authenticate("00000000000", "admin123", &[]).await.unwrap();
        assert_eq!(unit, HealthUnit::master());
        assert_eq!(unit.name, "Visão Geral (Master)");

        let unit = auth.authenticate("11111111111", "gestor123", &[]).await.unwrap();
        assert!(unit.is_master());

        // Wrong reserved secret falls through to the (unreachable) store
        assert!(matches!(
            auth.authenticate("00000000000", "nope", &[]).await,
            Err(AuthError::Store(StoreError::Unavailable(_)))
        ));
    }

    #[tokio::test]
    async fn test_profile_resolves_to_its_unit() {
        let (_store, auth) = fixture().await;

        // Not in loaded list: looked up by id
        let unit = auth.authenticate("ana@saude.gov", "senha-ana", &[]).await.unwrap();
        assert_eq!(unit.id, "h1");

        // By name, resolved from the loaded list
        let loaded = vec![HealthUnit::new("h1", "Hospital Central (cache)", UnitType::Hospital)];
        let unit = auth.authenticate("  Nome p1 ", "senha-ana", &loaded).await.unwrap();
        assert_eq!(unit.name, "Hospital Central (cache)");
    }

    #[tokio::test]
    async fn test_secret_is_verified() {
        let (_store, auth) = fixture().await;
        assert!(matches!(
            auth.authenticate("ana@saude.gov", "anything", &[]).await,
            Err(AuthError::InvalidCredentials)
        ));
        // Profile without a stored credential cannot sign in
        assert!(matches!(
            auth.authenticate("davi@saude.gov", "whatever", &[]).await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_failure_modes() {
        let (_store, auth) = fixture().await;
        assert!(matches!(
            auth.authenticate("ghost@saude.gov", "x", &[]).await,
            Err(AuthError::UserNotFound)
        ));
        assert!(matches!(
            auth.authenticate("caio@saude.gov", "senha-caio", &[]).await,
            Err(AuthError::UnitNotFound)
        ));
        assert!(matches!(
            auth.authenticate("bia@saude.gov", "senha-bia", &[]).await,
            Err(AuthError::Inactive(ProfileStatus::Suspended))
        ));
        assert!(matches!(
            auth.authenticate("   ", "x", &[]).await,
            Err(AuthError::MissingInput)
        ));
    }

    #[tokio::test]
    async fn test_inactive_allowed_when_configured() {
        let (store, _) = fixture().await;
        let config = AuthConfig {
            require_active: false,
            ..AuthConfig::default()
        };
        let auth = Authenticator::new(store, StaticSecrets::new().with("p2", "senha-bia"), &config);
        let unit = auth.authenticate("bia@saude.gov", "senha-bia", &[]).await.unwrap();
        assert_eq!(unit.id, "u1");
    }

    #[tokio::test]
    async fn test_login_flow_sets_session_or_message() {
        let (_store, auth) = fixture().await;
        let kv = MemoryKv::new();
        let mut session = SessionState::new(SessionStore::new(kv.clone()));
        let mut flow = LoginFlow::new();

        let result = flow
            .submit(&auth, &mut session, "ghost@saude.gov", "x", &[])
            .await;
        assert!(result.is_none());
        assert!(!flow.loading);
        assert_eq!(flow.error.as_deref(), Some("User not found"));
        assert!(!session.is_authenticated());

        let result = flow
            .submit(&auth, &mut session, "ana@saude.gov", "senha-ana", &[])
            .await;
        assert_eq!(result.map(|u| u.id), Some("h1".to_string()));
        assert!(flow.error.is_none());
        assert_eq!(session.unit().map(|u| u.id.as_str()), Some("h1"));
        assert!(SessionStore::new(kv).restore().is_some());
    }

    #[test]
    fn test_login_flow_network_failure() {
        let mut flow = LoginFlow::new();
        flow.begin();
        assert!(flow.loading);
        flow.fail("Server unreachable");
        assert!(!flow.loading);
        assert_eq!(flow.error.as_deref(), Some("Server unreachable"));
    }
}
