use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use store::{Collection, Filter, Record, RecordStore, StoreError};

/// [`RecordStore`] over the `records` table.
///
/// Rows come back in insertion order. Filters compare `data->>field` as text,
/// the same rendering [`Filter::matches_value`] uses in memory.
#[derive(Clone, Debug)]
pub struct PgRecordStore {
    pool: PgPool,
}

fn backend(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(e.to_string())
        }
        other => StoreError::Backend(other.to_string()),
    }
}

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    match filter {
        Filter::Eq { field, value } => {
            query.push(" AND data->>");
            query.push_bind(field.clone());
            query.push(" = ");
            query.push_bind(value.clone());
        }
        Filter::AnyOf(pairs) if pairs.is_empty() => {
            query.push(" AND FALSE");
        }
        Filter::AnyOf(pairs) => {
            query.push(" AND (");
            for (i, (field, value)) in pairs.iter().enumerate() {
                if i > 0 {
                    query.push(" OR ");
                }
                query.push("data->>");
                query.push_bind(field.clone());
                query.push(" = ");
                query.push_bind(value.clone());
            }
            query.push(")");
        }
    }
}

fn decode<R: Record>(rows: Vec<Value>) -> Result<Vec<R>, StoreError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(StoreError::from))
        .collect()
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Raw rows of `collection`, optionally filtered.
    pub async fn rows(&self, collection: Collection, filter: Option<&Filter>) -> Result<Vec<Value>, StoreError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT data FROM records WHERE collection = ");
        query.push_bind(collection.as_str());
        if let Some(filter) = filter {
            push_filter(&mut query, filter);
        }
        query.push(" ORDER BY position");

        let rows: Vec<(Json<Value>,)> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        Ok(rows.into_iter().map(|(Json(data),)| data).collect())
    }

    pub async fn row_by_id(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError> {
        let row: Option<(Json<Value>,)> =
            sqlx::query_as("SELECT data FROM records WHERE collection = $1 AND id = $2")
                .bind(collection.as_str())
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
        Ok(row.map(|(Json(data),)| data))
    }

    pub async fn insert_row(&self, collection: Collection, id: &str, data: Value) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO records (collection, id, data) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(data))
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict {
                collection,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub async fn update_row(&self, collection: Collection, id: &str, data: Value) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE records SET data = $3, updated_at = now() WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(Json(data))
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub async fn is_empty(&self) -> Result<bool, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM records")
            .fetch_one(&self.pool)
            .await
            .map_err(backend)?;
        Ok(count == 0)
    }
}

impl RecordStore for PgRecordStore {
    async fn select_all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        decode(self.rows(R::COLLECTION, None).await?)
    }

    async fn select_where<R: Record>(&self, filter: &Filter) -> Result<Vec<R>, StoreError> {
        decode(self.rows(R::COLLECTION, Some(filter)).await?)
    }

    async fn select_by_id<R: Record>(&self, id: &str) -> Result<Option<R>, StoreError> {
        self.row_by_id(R::COLLECTION, id)
            .await?
            .map(|row| serde_json::from_value(row).map_err(StoreError::from))
            .transpose()
    }

    async fn insert<R: Record>(&self, record: R) -> Result<R, StoreError> {
        self.insert_row(R::COLLECTION, record.id(), serde_json::to_value(&record)?)
            .await?;
        Ok(record)
    }

    async fn update<R: Record>(&self, record: R) -> Result<R, StoreError> {
        self.update_row(R::COLLECTION, record.id(), serde_json::to_value(&record)?)
            .await?;
        Ok(record)
    }
}
