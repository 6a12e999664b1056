//! What the server remembers about a signed-in browser.
//!
//! Three keys in the `tower-sessions` session:
//!
//! | Key | Value |
//! |-----|-------|
//! | `unit` | the active [`HealthUnit`], used to scope every request |
//! | `home_unit` | the unit resolved at login; only a master home may switch freely |
//! | `user` | the identifier shown in audit log entries |

use store::HealthUnit;
use tower_sessions::Session;

pub const SESSION_UNIT_KEY: &str = "unit";
pub const SESSION_HOME_KEY: &str = "home_unit";
pub const SESSION_USER_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionData {
    pub unit: HealthUnit,
    pub home: HealthUnit,
    pub user: String,
}

impl SessionData {
    /// `None` when the session carries no signed-in unit.
    pub async fn load(session: &Session) -> Result<Option<Self>, tower_sessions::session::Error> {
        let Some(unit) = session.get::<HealthUnit>(SESSION_UNIT_KEY).await? else {
            return Ok(None);
        };
        let home = session
            .get::<HealthUnit>(SESSION_HOME_KEY)
            .await?
            .unwrap_or_else(|| unit.clone());
        let user = session
            .get::<String>(SESSION_USER_KEY)
            .await?
            .unwrap_or_default();
        Ok(Some(Self { unit, home, user }))
    }

    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(SESSION_UNIT_KEY, &self.unit).await?;
        session.insert(SESSION_HOME_KEY, &self.home).await?;
        session.insert(SESSION_USER_KEY, &self.user).await?;
        Ok(())
    }

    /// Whether this session may move to `target`.
    pub fn may_switch_to(&self, target: &HealthUnit) -> bool {
        self.home.is_master() || target.id == self.home.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::UnitType;

    fn data(home: HealthUnit) -> SessionData {
        SessionData {
            unit: home.clone(),
            home,
            user: "ana.souza@saude.gov".into(),
        }
    }

    #[test]
    fn test_master_home_switches_anywhere() {
        let session = data(HealthUnit::master());
        assert!(session.may_switch_to(&HealthUnit::new("h1", "Hospital", UnitType::Hospital)));
        assert!(session.may_switch_to(&HealthUnit::master()));
    }

    #[test]
    fn test_unit_home_stays_home() {
        let hospital = HealthUnit::new("h1", "Hospital", UnitType::Hospital);
        let session = data(hospital.clone());
        assert!(session.may_switch_to(&hospital));
        assert!(!session.may_switch_to(&HealthUnit::new("u1", "UPA", UnitType::Upa)));
        assert!(!session.may_switch_to(&HealthUnit::master()));
    }
}
