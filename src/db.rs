use anyhow::Result;
use surrealdb::engine::local::{Db, Mem, RocksDb};
use surrealdb::Surreal;

use crate::store::BlobStore;

pub type DbConn = Surreal<Db>;

/// Open the on-disk database with RocksDB backend
pub async fn connect(path: &str) -> Result<DbConn> {
    let db = Surreal::new::<RocksDb>(path).await?;
    db.use_ns("fleet").use_db("waybills").await?;
    init_schema(&db).await?;
    Ok(db)
}

/// In-memory database, used by tests and dry runs
pub async fn connect_memory() -> Result<DbConn> {
    let db = Surreal::new::<Mem>(()).await?;
    db.use_ns("fleet").use_db("waybills").await?;
    init_schema(&db).await?;
    Ok(db)
}

/// Initialize database schema
pub async fn init_schema(db: &DbConn) -> Result<()> {
    db.query(
        r#"
        -- One record per key, record id is the key itself
        DEFINE TABLE IF NOT EXISTS blob SCHEMAFULL;
        DEFINE FIELD IF NOT EXISTS value ON blob TYPE string;
        "#,
    )
    .await?
    .check()?;

    Ok(())
}

/// Key/value blob store backed by the `blob` table
#[derive(Clone)]
pub struct SurrealBlobStore {
    db: DbConn,
}

impl SurrealBlobStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

impl BlobStore for SurrealBlobStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let values: Vec<String> = self
            .db
            .query("SELECT VALUE value FROM type::thing('blob', $key)")
            .bind(("key", key.to_string()))
            .await?
            .take(0)?;
        Ok(values.into_iter().next())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.db
            .query("UPSERT type::thing('blob', $key) SET value = $value")
            .bind(("key", key.to_string()))
            .bind(("value", value))
            .await?
            .check()?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.db
            .query("DELETE type::thing('blob', $key)")
            .bind(("key", key.to_string()))
            .await?
            .check()?;
        Ok(())
    }
}
