//! Small demo dataset: loaded into an empty database on first start, and used by
//! list screens as offline data when the server cannot be reached.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::listing::parse_date;
use crate::models::{HealthUnit, Profile, ProfileStatus, UnitType};
use crate::modules::admin::{AuditLog, LogLevel};
use crate::modules::authorization::{AuthorizationRequest, AuthorizationStatus, PriorityClass};
use crate::modules::beds::{Bed, BedStatus, Patient, Sex};
use crate::modules::documents::{Document, DocumentStatus};
use crate::modules::indicators::KpiMetric;
use crate::modules::monitoring::{CaseStatus, Notification};
use crate::modules::neonatal::{NeonatalScreening, ScreeningResult, ScreeningTest};
use crate::modules::shifts::{Shift, ShiftPeriod, ShiftStatus};
use crate::records::{Collection, Record, RecordStore, StoreError};

#[derive(Clone, Debug, Default)]
pub struct Seed {
    pub units: Vec<HealthUnit>,
    pub profiles: Vec<Profile>,
    pub beds: Vec<Bed>,
    pub patients: Vec<Patient>,
    pub kpis: Vec<KpiMetric>,
    pub documents: Vec<Document>,
    pub shifts: Vec<Shift>,
    pub audit_logs: Vec<AuditLog>,
    pub authorizations: Vec<AuthorizationRequest>,
    pub notifications: Vec<Notification>,
    pub screenings: Vec<NeonatalScreening>,
}

fn date(iso: &str) -> NaiveDate {
    parse_date(iso).unwrap_or_default()
}

fn profile(id: &str, name: &str, role: &str, email: &str, department: &str, unit_id: &str) -> Profile {
    Profile {
        id: id.into(),
        name: name.into(),
        role: role.into(),
        email: email.into(),
        status: ProfileStatus::Active,
        department: department.into(),
        unit_id: unit_id.into(),
    }
}

fn bed(id: &str, unit_id: &str, ward: &str, number: &str, status: BedStatus, patient: Option<&str>) -> Bed {
    Bed {
        id: id.into(),
        unit_id: unit_id.into(),
        ward: ward.into(),
        number: number.into(),
        status,
        patient: patient.map(str::to_string),
    }
}

#[allow(clippy::too_many_arguments)]
fn kpi(id: &str, unit_id: &str, name: &str, category: &str, measure: &str, value: f64, target: f64, higher: bool) -> KpiMetric {
    KpiMetric {
        id: id.into(),
        unit_id: unit_id.into(),
        name: name.into(),
        category: category.into(),
        period: "2026-09".into(),
        measure: measure.into(),
        value,
        target,
        higher_is_better: higher,
    }
}

impl Seed {
    pub fn demo() -> Self {
        let units = vec![
            HealthUnit::new("h1", "Hospital Municipal Central", UnitType::Hospital),
            HealthUnit::new("u1", "UPA Zona Norte", UnitType::Upa),
            HealthUnit::new("m1", "Maternidade Santa Clara", UnitType::Maternidade),
            HealthUnit::new("b1", "UBS Vila Nova", UnitType::Ubs),
            HealthUnit::new("l1", "Laboratório Municipal", UnitType::Laboratorio),
        ];

        let mut suspended = profile("p5", "Rafael Costa", "Técnico de Enfermagem", "rafael.costa@saude.gov", "Pronto Atendimento", "u1");
        suspended.status = ProfileStatus::Suspended;
        let profiles = vec![
            profile("p1", "Ana Souza", "Enfermeira", "ana.souza@saude.gov", "UTI Adulto", "h1"),
            profile("p2", "Carlos Lima", "Médico Regulador", "carlos.lima@saude.gov", "Regulação", "h1"),
            profile("p3", "Juliana Alves", "Obstetra", "juliana.alves@saude.gov", "Centro Obstétrico", "m1"),
            profile("p4", "Marcos Pereira", "Coordenador", "marcos.pereira@saude.gov", "Atenção Básica", "b1"),
            suspended,
        ];
        let beds = vec![
            bed("bd1", "h1", "UTI Adulto", "01", BedStatus::Occupied, Some("José Ferreira")),
            bed("bd2", "h1", "UTI Adulto", "02", BedStatus::Occupied, Some("Lúcia Martins")),
            bed("bd3", "h1", "UTI Adulto", "03", BedStatus::Cleaning, None),
            bed("bd4", "h1", "UTI Adulto", "04", BedStatus::Maintenance, None),
            bed("bd5", "h1", "Clínica Médica", "101", BedStatus::Free, None),
            bed("bd6", "h1", "Clínica Médica", "102", BedStatus::Occupied, Some("Antônio Rocha")),
            bed("bd7", "h1", "Clínica Médica", "103", BedStatus::Reserved, None),
            bed("bd8", "u1", "Observação", "OBS-1", BedStatus::Occupied, Some("Pedro Santos")),
            bed("bd9", "u1", "Observação", "OBS-2", BedStatus::Free, None),
            bed("bd10", "m1", "Alojamento Conjunto", "AC-01", BedStatus::Occupied, Some("Joana Dias")),
            bed("bd11", "m1", "Alojamento Conjunto", "AC-02", BedStatus::Free, None),
        ];

        let patients = vec![
            Patient { id: "pt1".into(), unit_id: "h1".into(), name: "José Ferreira".into(), cns: "700000000000001".into(), sex: Sex::Male, birth_date: date("1948-02-11"), admitted_on: Some(date("2026-09-28")) },
            Patient { id: "pt2".into(), unit_id: "h1".into(), name: "Lúcia Martins".into(), cns: "700000000000002".into(), sex: Sex::Female, birth_date: date("1971-07-30"), admitted_on: Some(date("2026-10-02")) },
            Patient { id: "pt3".into(), unit_id: "h1".into(), name: "Antônio Rocha".into(), cns: "700000000000003".into(), sex: Sex::Male, birth_date: date("1959-12-01"), admitted_on: Some(date("2026-10-10")) },
            Patient { id: "pt4".into(), unit_id: "u1".into(), name: "Pedro Santos".into(), cns: "700000000000004".into(), sex: Sex::Male, birth_date: date("1990-04-17"), admitted_on: Some(date("2026-10-15")) },
            Patient { id: "pt5".into(), unit_id: "m1".into(), name: "Joana Dias".into(), cns: "700000000000005".into(), sex: Sex::Female, birth_date: date("1996-05-22"), admitted_on: Some(date("2026-10-12")) },
        ];

        let kpis = vec![
            kpi("k1", "h1", "Taxa de ocupação", "Operacional", "%", 78.5, 85.0, true),
            kpi("k2", "h1", "Tempo médio de permanência", "Assistencial", "dias", 5.2, 4.5, false),
            kpi("k3", "h1", "Adesão à higiene das mãos", "Qualidade", "%", 91.0, 90.0, true),
            kpi("k4", "u1", "Tempo porta-médico", "Assistencial", "min", 42.0, 30.0, false),
            kpi("k5", "m1", "Partos normais", "Assistencial", "%", 58.0, 60.0, true),
            kpi("k6", "b1", "Cobertura vacinal", "Qualidade", "%", 72.0, 95.0, true),
        ];

        let documents = vec![
            Document { id: "d1".into(), unit_id: "h1".into(), title: "Protocolo de Sepse".into(), category: "Protocolo".into(), owner: "CCIH".into(), version: "2.1".into(), status: DocumentStatus::Published, updated_on: date("2026-08-14") },
            Document { id: "d2".into(), unit_id: "h1".into(), title: "Higienização de leitos".into(), category: "POP".into(), owner: "Hotelaria".into(), version: "1.3".into(), status: DocumentStatus::Review, updated_on: date("2026-09-30") },
            Document { id: "d3".into(), unit_id: "m1".into(), title: "Acolhimento com classificação de risco obstétrico".into(), category: "Protocolo".into(), owner: "Centro Obstétrico".into(), version: "1.0".into(), status: DocumentStatus::Draft, updated_on: date("2026-10-05") },
            Document { id: "d4".into(), unit_id: "b1".into(), title: "Regimento interno".into(), category: "Regimento".into(), owner: "Gerência".into(), version: "3.0".into(), status: DocumentStatus::Archived, updated_on: date("2025-12-01") },
        ];

        let shift = |id: &str, unit_id: &str, professional: &str, department: &str, day: &str, period: ShiftPeriod, status: ShiftStatus| Shift {
            id: id.into(),
            unit_id: unit_id.into(),
            professional: professional.into(),
            department: department.into(),
            date: date(day),
            period,
            status,
        };
        let shifts = vec![
            shift("s1", "h1", "Ana Souza", "UTI Adulto", "2026-10-18", ShiftPeriod::Night, ShiftStatus::Confirmed),
            shift("s2", "h1", "Carlos Lima", "Regulação", "2026-10-18", ShiftPeriod::Morning, ShiftStatus::Scheduled),
            shift("s3", "u1", "Rafael Costa", "Pronto Atendimento", "2026-10-19", ShiftPeriod::Afternoon, ShiftStatus::Cancelled),
            shift("s4", "m1", "Juliana Alves", "Centro Obstétrico", "2026-10-19", ShiftPeriod::Night, ShiftStatus::Scheduled),
        ];

        let log = |id: &str, unit_id: &str, timestamp: &str, user: &str, action: &str, module: &str, level: LogLevel| AuditLog {
            id: id.into(),
            unit_id: unit_id.into(),
            timestamp: timestamp.into(),
            user: user.into(),
            action: action.into(),
            module: module.into(),
            level,
        };
        let audit_logs = vec![
            log("a1", "h1", "2026-10-17T08:12:00Z", "Ana Souza", "Login", "Auth", LogLevel::Info),
            log("a2", "h1", "2026-10-17T09:40:00Z", "Carlos Lima", "Approved authorization AUT-2026-000002", "Authorization", LogLevel::Info),
            log("a3", "u1", "2026-10-17T11:03:00Z", "Rafael Costa", "Login blocked: account suspended", "Auth", LogLevel::Warning),
            log("a4", "h1", "2026-10-18T02:15:00Z", "system", "Bed UTI-04 moved to maintenance", "Beds", LogLevel::Critical),
        ];

        let authorization = |id: &str, seq: u32, patient: &str, procedure: &str, day: &str, status: AuthorizationStatus, priority: PriorityClass| AuthorizationRequest {
            id: id.into(),
            unit_id: "h1".into(),
            protocol: format!("AUT-2026-{seq:06}"),
            patient: patient.into(),
            procedure: procedure.into(),
            requester: "Carlos Lima".into(),
            requested_on: date(day),
            status,
            priority,
        };
        let authorizations = vec![
            authorization("r1", 1, "José Ferreira", "Internação em UTI", "2026-09-28", AuthorizationStatus::Approved, PriorityClass::Red),
            authorization("r2", 2, "Antônio Rocha", "Cateterismo cardíaco", "2026-10-11", AuthorizationStatus::Approved, PriorityClass::Orange),
            authorization("r3", 3, "Lúcia Martins", "Ressonância magnética", "2026-10-14", AuthorizationStatus::UnderReview, PriorityClass::Yellow),
            authorization("r4", 4, "Maria Oliveira", "Colecistectomia eletiva", "2026-10-16", AuthorizationStatus::Pending, PriorityClass::Green),
        ];

        let notification = |id: &str, unit_id: &str, disease: &str, patient: &str, neighborhood: &str, day: &str, status: CaseStatus| Notification {
            id: id.into(),
            unit_id: unit_id.into(),
            disease: disease.into(),
            patient: patient.into(),
            neighborhood: neighborhood.into(),
            notified_on: date(day),
            status,
        };
        let notifications = vec![
            notification("n1", "u1", "Dengue", "Bruno Araújo", "Jardim América", "2026-10-03", CaseStatus::Confirmed),
            notification("n2", "u1", "Dengue", "Clara Nunes", "Jardim América", "2026-10-06", CaseStatus::Suspected),
            notification("n3", "b1", "Dengue", "Diego Ramos", "Vila Nova", "2026-10-09", CaseStatus::Discarded),
            notification("n4", "h1", "Influenza", "Eva Moraes", "Centro", "2026-10-12", CaseStatus::Confirmed),
            notification("n5", "b1", "Tuberculose", "Fábio Teixeira", "Vila Nova", "2026-10-14", CaseStatus::Suspected),
        ];

        let screening = |id: &str, newborn: &str, mother: &str, born: &str, test: ScreeningTest, collected: Option<&str>, result: ScreeningResult| NeonatalScreening {
            id: id.into(),
            unit_id: "m1".into(),
            newborn: newborn.into(),
            mother: mother.into(),
            birth_date: date(born),
            test,
            collected_on: collected.map(date),
            result,
        };
        let screenings = vec![
            screening("ns1", "RN de Joana Dias", "Joana Dias", "2026-10-12", ScreeningTest::Heel, None, ScreeningResult::Pending),
            screening("ns2", "RN de Joana Dias", "Joana Dias", "2026-10-12", ScreeningTest::PulseOximetry, Some("2026-10-13"), ScreeningResult::Normal),
            screening("ns3", "RN de Paula Reis", "Paula Reis", "2026-10-16", ScreeningTest::RedReflex, None, ScreeningResult::Pending),
            screening("ns4", "RN de Paula Reis", "Paula Reis", "2026-10-16", ScreeningTest::Hearing, Some("2026-10-17"), ScreeningResult::Altered),
        ];

        Self {
            units,
            profiles,
            beds,
            patients,
            kpis,
            documents,
            shifts,
            audit_logs,
            authorizations,
            notifications,
            screenings,
        }
    }

    /// `(profile id, plain secret)` for the demo profiles. Kept out of the
    /// client bundle unless `demo-secrets` is enabled.
    #[cfg(any(test, feature = "demo-secrets"))]
    pub fn demo_secrets() -> Vec<(String, String)> {
        [("p1", "ana2026"), ("p2", "carlos2026"), ("p3", "juliana2026"), ("p4", "marcos2026"), ("p5", "rafael2026")]
            .into_iter()
            .map(|(id, secret)| (id.to_string(), secret.to_string()))
            .collect()
    }

    /// Serialized rows of one collection.
    pub fn rows(&self, collection: Collection) -> Vec<Value> {
        fn values<T: Serialize>(items: &[T]) -> Vec<Value> {
            items.iter().filter_map(|i| serde_json::to_value(i).ok()).collect()
        }
        match collection {
            Collection::HealthUnits => values(&self.units),
            Collection::Profiles => values(&self.profiles),
            Collection::Beds => values(&self.beds),
            Collection::Patients => values(&self.patients),
            Collection::KpiMetrics => values(&self.kpis),
            Collection::Documents => values(&self.documents),
            Collection::Shifts => values(&self.shifts),
            Collection::AuditLogs => values(&self.audit_logs),
            Collection::Authorizations => values(&self.authorizations),
            Collection::Notifications => values(&self.notifications),
            Collection::NeonatalScreenings => values(&self.screenings),
        }
    }

    /// Typed rows of `R`'s collection.
    pub fn records<R: Record>(&self) -> Vec<R> {
        self.rows(R::COLLECTION)
            .into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect()
    }

    /// Insert every seed record into `store`. Returns the number of rows written.
    pub async fn load_into<S: RecordStore>(&self, store: &S) -> Result<usize, StoreError> {
        let mut written = 0;
        written += insert_all(store, &self.units).await?;
        written += insert_all(store, &self.profiles).await?;
        written += insert_all(store, &self.beds).await?;
        written += insert_all(store, &self.patients).await?;
        written += insert_all(store, &self.kpis).await?;
        written += insert_all(store, &self.documents).await?;
        written += insert_all(store, &self.shifts).await?;
        written += insert_all(store, &self.audit_logs).await?;
        written += insert_all(store, &self.authorizations).await?;
        written += insert_all(store, &self.notifications).await?;
        written += insert_all(store, &self.screenings).await?;
        tracing::info!("Seeded {written} records");
        Ok(written)
    }
}

async fn insert_all<S: RecordStore, R: Record>(store: &S, records: &[R]) -> Result<usize, StoreError> {
    for record in records {
        store.insert(record.clone()).await?;
    }
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthError, Authenticator, StaticSecrets};
    use crate::config::AuthConfig;
    use crate::memory::MemoryRecordStore;
    use crate::modules::beds::occupancy;
    use crate::modules::{scope_to_unit, validate_row};

    #[test]
    fn test_every_collection_has_rows_that_parse() {
        let seed = Seed::demo();
        for collection in Collection::ALL {
            assert!(!seed.rows(collection).is_empty(), "{collection} is empty");
        }
        assert_eq!(seed.records::<Bed>().len(), seed.beds.len());
        assert_eq!(seed.records::<NeonatalScreening>(), seed.screenings);
    }

    #[test]
    fn test_every_seeded_row_validates() {
        let seed = Seed::demo();
        for collection in Collection::ALL {
            for row in seed.rows(collection) {
                assert!(validate_row(collection, &row).is_ok(), "{collection}: {row}");
            }
        }
    }

    #[test]
    fn test_profiles_point_at_seeded_units() {
        let seed = Seed::demo();
        for p in &seed.profiles {
            assert!(seed.units.iter().any(|u| u.id == p.unit_id), "{} has no unit", p.id);
            assert!(Seed::demo_secrets().iter().any(|(id, _)| *id == p.id));
        }
    }

    #[test]
    fn test_hospital_occupancy() {
        let seed = Seed::demo();
        let hospital = seed.units[0].clone();
        let beds = scope_to_unit(&seed.beds, &hospital);
        // 3 occupied of 6 usable
        assert_eq!(occupancy(&beds).percent, 50.0);
    }

    #[tokio::test]
    async fn test_seeded_store_authenticates_demo_user() {
        let seed = Seed::demo();
        let store = MemoryRecordStore::new();
        let written = seed.load_into(&store).await.unwrap();
        assert_eq!(written, Collection::ALL.iter().map(|c| seed.rows(*c).len()).sum::<usize>());

        let secrets = Seed::demo_secrets()
            .into_iter()
            .fold(StaticSecrets::new(), |s, (id, secret)| s.with(id, secret));
        let auth = Authenticator::new(store.clone(), secrets, &AuthConfig::default());

        let unit = auth.authenticate("ana.souza@saude.gov", "ana2026", &[]).await.unwrap();
        assert_eq!(unit.id, "h1");
        assert!(matches!(
            auth.authenticate("Rafael Costa", "rafael2026", &seed.units).await,
            Err(AuthError::Inactive(ProfileStatus::Suspended))
        ));

        // Loading twice collides on ids
        assert!(matches!(seed.load_into(&store).await, Err(StoreError::Conflict { .. })));
    }
}
