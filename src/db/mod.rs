//! Database Module
//!
//! Embedded SurrealDB: RocksDB on disk in production, in-memory for tests.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "drape";
const DATABASE: &str = "drape";

/// Open the on-disk database and apply schema definitions
pub async fn init_db(db_path: &str) -> Result<Surreal<Db>, AppError> {
    let db = Surreal::new::<RocksDb>(db_path)
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;
    define_schema(&db).await?;
    tracing::info!("Database connection established (RocksDB at {db_path})");
    Ok(db)
}

/// Open a fresh in-memory database (test harness)
pub async fn init_mem_db() -> Result<Surreal<Db>, AppError> {
    let db = Surreal::new::<Mem>(())
        .await
        .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;
    define_schema(&db).await?;
    Ok(db)
}

/// Uniqueness constraints the application relies on
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        "
        DEFINE INDEX IF NOT EXISTS user_email ON TABLE user COLUMNS email UNIQUE;
        DEFINE INDEX IF NOT EXISTS cart_user ON TABLE cart COLUMNS user UNIQUE;
        DEFINE INDEX IF NOT EXISTS review_user_product ON TABLE review COLUMNS user, product UNIQUE;
        ",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
    Ok(())
}
