//! Repository Module
//!
//! CRUD operations over the embedded SurrealDB tables.

// Accounts
pub mod address;
pub mod user;

// Catalog
pub mod category;
pub mod product;
pub mod subcategory;

// Shopping
pub mod cart;
pub mod order;
pub mod review;

// Marketing
pub mod advertisement;

// Re-exports
pub use address::AddressRepository;
pub use advertisement::AdvertisementRepository;
pub use cart::CartRepository;
pub use category::CategoryRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use review::ReviewRepository;
pub use subcategory::SubcategoryRepository;
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let msg = err.to_string();
        // Unique index violations surface as a plain query error
        if msg.contains("already contains") || msg.contains("unique") {
            RepoError::Duplicate(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

impl From<RepoError> for crate::utils::AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => crate::utils::AppError::NotFound(msg),
            RepoError::Duplicate(msg) => crate::utils::AppError::Conflict(msg),
            RepoError::Validation(msg) => crate::utils::AppError::Validation(msg),
            RepoError::Database(msg) => crate::utils::AppError::Database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" strings at the API edge, RecordId internally
// =============================================================================
//
//   - Parse: let id: RecordId = "product:abc".parse()?;
//   - Table name: id.table()
//   - Pure key: id.key().to_string()
//   - CRUD: db.select(id) / db.delete(id) take RecordId directly

/// Parse a "table:id" string, enforcing the expected table
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<surrealdb::RecordId> {
    let rid: surrealdb::RecordId = if id.contains(':') {
        id.parse()
            .map_err(|_| RepoError::Validation(format!("Invalid id: {id}")))?
    } else {
        surrealdb::RecordId::from_table_key(table, id)
    };
    if rid.table() != table {
        return Err(RepoError::Validation(format!(
            "Expected {table} id, got: {id}"
        )));
    }
    Ok(rid)
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
