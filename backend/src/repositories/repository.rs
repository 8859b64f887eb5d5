//! Repository trait shared by the CRUD screens.

use crate::error::AppError;
use sqlx::PgPool;

/// Standard repository trait for the records a manager maintains by hand.
#[allow(async_fn_in_trait)]
pub trait Repository<T> {
    /// Target table name.
    const TABLE: &'static str;
    /// Primary key type for the record.
    type Id;

    /// Find all records, newest first.
    async fn find_all(&self, db: &PgPool) -> Result<Vec<T>, AppError>;

    /// Find a single record by ID, failing with `NotFound`.
    async fn find_by_id(&self, db: &PgPool, id: Self::Id) -> Result<T, AppError>;

    async fn create(&self, db: &PgPool, item: &T) -> Result<T, AppError>;

    async fn update(&self, db: &PgPool, item: &T) -> Result<T, AppError>;

    async fn delete(&self, db: &PgPool, id: Self::Id) -> Result<(), AppError>;
}
