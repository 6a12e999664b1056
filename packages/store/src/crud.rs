//! # Create / edit modal lifecycle
//!
//! [`CrudModal`] is the form state behind every "New" and "Edit" dialog. The
//! form always works on its own copy of the record, so typing into it never
//! changes the collection until [`CrudModal::submit`] succeeds.
//!
//! A submit validates `R::REQUIRED_FIELDS`, then either replaces the record
//! with the same id (edit) or prepends a copy with a freshly generated id
//! (create), and closes the modal. Any failure leaves the modal open and the
//! collection untouched. The returned [`SubmitOutcome`] can be echoed to a
//! [`RecordStore`] with [`SubmitOutcome::persist`].

use crate::records::{Record, RecordStore, StoreError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalMode {
    Create,
    Edit { id: String },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CrudError {
    #[error("No form is open")]
    NotOpen,
    #[error("Required fields missing: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("Record {0} no longer exists")]
    RecordGone(String),
}

/// What a successful submit did to the collection.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome<R> {
    Created(R),
    Updated(R),
}

impl<R: Record> SubmitOutcome<R> {
    pub fn record(&self) -> &R {
        match self {
            SubmitOutcome::Created(r) | SubmitOutcome::Updated(r) => r,
        }
    }

    /// Mirror the change to a record store.
    pub async fn persist<S: RecordStore>(&self, store: &S) -> Result<R, StoreError> {
        match self {
            SubmitOutcome::Created(r) => store.insert(r.clone()).await,
            SubmitOutcome::Updated(r) => store.update(r.clone()).await,
        }
    }
}

/// Form state for one create/edit dialog.
#[derive(Clone, Debug, PartialEq)]
pub struct CrudModal<R> {
    form: Option<(ModalMode, R)>,
    error: Option<String>,
}

impl<R> Default for CrudModal<R> {
    fn default() -> Self {
        Self {
            form: None,
            error: None,
        }
    }
}

impl<R: Record> CrudModal<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.form.is_some()
    }

    pub fn mode(&self) -> Option<&ModalMode> {
        self.form.as_ref().map(|(mode, _)| mode)
    }

    pub fn form(&self) -> Option<&R> {
        self.form.as_ref().map(|(_, record)| record)
    }

    pub fn form_mut(&mut self) -> Option<&mut R> {
        self.form.as_mut().map(|(_, record)| record)
    }

    /// Last validation or field error, shown inside the dialog.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn open_for_create(&mut self, defaults: R) {
        self.form = Some((ModalMode::Create, defaults));
        self.error = None;
    }

    pub fn open_for_edit(&mut self, record: &R) {
        let mode = ModalMode::Edit {
            id: record.id().to_string(),
        };
        self.form = Some((mode, record.clone()));
        self.error = None;
    }

    /// Update one form field from user input.
    pub fn set_field(&mut self, field: &str, text: &str) -> Result<(), StoreError> {
        let Some((_, record)) = self.form.as_mut() else {
            return Ok(());
        };
        match record.with_field(field, text) {
            Ok(updated) => {
                *record = updated;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Required fields that are blank in the current form.
    pub fn missing_fields(&self) -> Vec<String> {
        let Some(record) = self.form() else {
            return Vec::new();
        };
        R::REQUIRED_FIELDS
            .iter()
            .filter(|field| {
                record
                    .field_text(field)
                    .is_none_or(|text| text.trim().is_empty())
            })
            .map(|field| field.to_string())
            .collect()
    }

    pub fn submit(&mut self, collection: &mut Vec<R>) -> Result<SubmitOutcome<R>, CrudError> {
        let result = self.apply(collection);
        match &result {
            Ok(_) => {
                self.form = None;
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
        result
    }

    fn apply(&self, collection: &mut Vec<R>) -> Result<SubmitOutcome<R>, CrudError> {
        let Some((mode, record)) = self.form.as_ref() else {
            return Err(CrudError::NotOpen);
        };
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(CrudError::MissingFields(missing));
        }

        match mode {
            ModalMode::Edit { id } => {
                let slot = collection
                    .iter_mut()
                    .find(|r| r.id() == id)
                    .ok_or_else(|| CrudError::RecordGone(id.clone()))?;
                let mut updated = record.clone();
                updated.set_id(id.clone());
                *slot = updated.clone();
                Ok(SubmitOutcome::Updated(updated))
            }
            ModalMode::Create => {
                let mut created = record.clone();
                created.set_id(new_id(collection));
                collection.insert(0, created.clone());
                Ok(SubmitOutcome::Created(created))
            }
        }
    }

    /// Close without touching the collection.
    pub fn cancel(&mut self) {
        self.form = None;
        self.error = None;
    }
}

/// A UUID v4 not used by any record in `collection`.
pub fn new_id<R: Record>(collection: &[R]) -> String {
    loop {
        let id = uuid::Uuid::new_v4().to_string();
        if !collection.iter().any(|r| r.id() == id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryRecordStore;
    use crate::modules::shifts::{Shift, ShiftPeriod, ShiftStatus};
    use chrono::NaiveDate;

    fn shift(id: &str, professional: &str) -> Shift {
        Shift {
            id: id.into(),
            unit_id: "h1".into(),
            professional: professional.into(),
            department: "Pronto-Socorro".into(),
            date: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            period: ShiftPeriod::Night,
            status: ShiftStatus::Scheduled,
        }
    }

    fn roster() -> Vec<Shift> {
        vec![shift("s1", "Dra. Lima"), shift("s2", "Dr. Alves")]
    }

    #[test]
    fn test_missing_required_field_keeps_modal_open() {
        let mut collection = roster();
        let mut modal = CrudModal::new();
        modal.open_for_create(Shift::default());

        let err = modal.submit(&mut collection).unwrap_err();
        assert!(matches!(err, CrudError::MissingFields(ref f) if f.contains(&"professional".to_string())));
        assert!(modal.is_open());
        assert_eq!(collection.len(), 2);
        assert!(modal.error().unwrap().starts_with("Required fields missing"));

        modal.set_field("professional", "   ").unwrap();
        assert!(modal.submit(&mut collection).is_err());
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_edit_replaces_exactly_one_record() {
        let mut collection = roster();
        let mut modal = CrudModal::new();
        modal.open_for_edit(&collection[1]);
        modal.set_field("professional", "Dr. Alves Filho").unwrap();

        // Editing the form does not touch the original yet
        assert_eq!(collection[1].professional, "Dr. Alves");

        let outcome = modal.submit(&mut collection).unwrap();
        assert!(matches!(outcome, SubmitOutcome::Updated(_)));
        assert_eq!(collection.len(), 2);
        assert_eq!(collection[1].professional, "Dr. Alves Filho");
        assert_eq!(collection[1].id, "s2");
        assert_eq!(collection[0], shift("s1", "Dra. Lima"));
        assert!(!modal.is_open());
    }

    #[test]
    fn test_create_adds_one_with_fresh_id() {
        let mut collection = roster();
        let mut modal = CrudModal::new();
        let mut defaults = shift("", "Enf. Rocha");
        defaults.status = ShiftStatus::Confirmed;
        modal.open_for_create(defaults);

        let outcome = modal.submit(&mut collection).unwrap();
        let created = outcome.record().clone();
        assert_eq!(collection.len(), 3);
        assert_eq!(collection[0], created);
        assert!(!created.id.is_empty());
        assert!(created.id != "s1" && created.id != "s2");
        assert_eq!(collection.iter().filter(|s| s.id == created.id).count(), 1);
    }

    #[test]
    fn test_cancel_discards_form() {
        let mut collection = roster();
        let mut modal = CrudModal::new();
        modal.open_for_edit(&collection[0]);
        modal.set_field("department", "UTI").unwrap();
        modal.cancel();
        assert!(!modal.is_open());
        assert_eq!(collection, roster());
        assert_eq!(modal.submit(&mut collection), Err(CrudError::NotOpen));
    }

    #[test]
    fn test_edit_of_removed_record_fails() {
        let mut collection = roster();
        let mut modal = CrudModal::new();
        modal.open_for_edit(&collection[0]);
        collection.remove(0);
        assert_eq!(
            modal.submit(&mut collection),
            Err(CrudError::RecordGone("s1".into()))
        );
        assert!(modal.is_open());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_invalid_field_input_reports_error() {
        let mut modal = CrudModal::new();
        modal.open_for_create(shift("", "X"));
        assert!(modal.set_field("period", "midnight").is_err());
        assert!(modal.error().is_some());
        assert_eq!(modal.form().unwrap().period, ShiftPeriod::Night);
    }

    #[tokio::test]
    async fn test_outcome_persists_to_store() {
        let store = MemoryRecordStore::new();
        let mut collection = Vec::new();
        let mut modal = CrudModal::new();

        modal.open_for_create(shift("", "Dra. Lima"));
        let created = modal.submit(&mut collection).unwrap();
        created.persist(&store).await.unwrap();

        modal.open_for_edit(&collection[0]);
        modal.set_field("status", "cancelled").unwrap();
        let updated = modal.submit(&mut collection).unwrap();
        updated.persist(&store).await.unwrap();

        let stored: Vec<Shift> = store.select_all().await.unwrap();
        assert_eq!(stored, collection);
        assert_eq!(stored[0].status, ShiftStatus::Cancelled);
    }
}
