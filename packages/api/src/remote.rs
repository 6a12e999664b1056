//! [`RecordStore`] backed by the collection server functions. This is what the
//! browser talks to; scoping to the signed-in unit happens on the server.

use dioxus::prelude::ServerFnError;
use serde_json::Value;
use store::{Filter, Record, RecordStore, StoreError};

fn unavailable(e: ServerFnError) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

fn rejected(e: ServerFnError) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn decode<R: Record>(rows: Vec<Value>) -> Result<Vec<R>, StoreError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(StoreError::from))
        .collect()
}

/// Every record of `R`'s collection visible to the current session.
pub async fn fetch_records<R: Record>() -> Result<Vec<R>, StoreError> {
    let rows = crate::fetch_collection(R::COLLECTION)
        .await
        .map_err(unavailable)?;
    decode(rows)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ApiRecordStore;

impl ApiRecordStore {
    pub fn new() -> Self {
        Self
    }

    async fn save<R: Record>(&self, record: R, create: bool) -> Result<R, StoreError> {
        let row = serde_json::to_value(&record)?;
        let saved = crate::save_record(R::COLLECTION, row, create)
            .await
            .map_err(rejected)?;
        Ok(serde_json::from_value(saved)?)
    }
}

impl RecordStore for ApiRecordStore {
    async fn select_all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        fetch_records().await
    }

    async fn select_where<R: Record>(&self, filter: &Filter) -> Result<Vec<R>, StoreError> {
        let rows = crate::fetch_collection(R::COLLECTION)
            .await
            .map_err(unavailable)?;
        decode(rows.into_iter().filter(|row| filter.matches_value(row)).collect())
    }

    async fn select_by_id<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        let records: Vec<R> = fetch_records().await?;
        Ok(records.into_iter().find(|r| r.id() == id))
    }

    async fn insert<R: Record>(&self, record: R) -> Result<R, StoreError> {
        self.save(record, true).await
    }

    async fn update<R: Record>(&self, record: R) -> Result<R, StoreError> {
        self.save(record, false).await
    }
}
