//! Driver repository.

use chrono::NaiveDate;
use sqlx::{PgExecutor, PgPool};

use crate::{
    error::{unique_violation, AppError},
    models::driver::{Driver, DriverCompliance, DriverStatus},
    repositories::repository::Repository,
    types::DriverId,
};

const TABLE_NAME: &str = "drivers";
const SELECT_COLUMNS: &str = "id, name, license_number, license_expiry_date, status, safety_score, created_at, updated_at";

pub const DUPLICATE_LICENSE: &str = "License number must be unique.";
pub const DRIVER_NOT_FOUND: &str = "Driver not found.";

#[derive(Debug, Default, Clone, Copy)]
pub struct DriverRepository;

impl DriverRepository {
    pub fn new() -> Self {
        Self
    }

    fn base_select_query() -> String {
        format!("SELECT {} FROM {}", SELECT_COLUMNS, TABLE_NAME)
    }

    pub async fn find_optional<'e>(
        &self,
        db: impl PgExecutor<'e>,
        id: DriverId,
    ) -> Result<Option<Driver>, AppError> {
        let query = format!("{} WHERE id = $1", Self::base_select_query());
        let row = sqlx::query_as::<_, Driver>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }

    /// Reads a driver and holds its row lock until the transaction ends.
    pub async fn lock_by_id<'e>(
        &self,
        db: impl PgExecutor<'e>,
        id: DriverId,
    ) -> Result<Option<Driver>, AppError> {
        let query = format!("{} WHERE id = $1 FOR UPDATE", Self::base_select_query());
        let row = sqlx::query_as::<_, Driver>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }

    /// Available drivers whose license is still valid on `today`, by name.
    pub async fn list_assignable(
        &self,
        db: &PgPool,
        today: NaiveDate,
        order_by_name: bool,
    ) -> Result<Vec<Driver>, AppError> {
        let order = if order_by_name {
            "name"
        } else {
            "created_at DESC"
        };
        let query = format!(
            "{} WHERE status = 'available' AND license_expiry_date >= $1 ORDER BY {}",
            Self::base_select_query(),
            order
        );
        let rows = sqlx::query_as::<_, Driver>(&query)
            .bind(today)
            .fetch_all(db)
            .await?;
        Ok(rows)
    }

    pub async fn set_status<'e>(
        &self,
        db: impl PgExecutor<'e>,
        id: DriverId,
        status: DriverStatus,
    ) -> Result<(), AppError> {
        let query = format!(
            "UPDATE {} SET status = $1, updated_at = NOW() WHERE id = $2",
            TABLE_NAME
        );
        sqlx::query(&query).bind(status).bind(id).execute(db).await?;
        Ok(())
    }

    /// Applies a safety officer's edit; callers hold the row lock.
    pub async fn update_compliance<'e>(
        &self,
        db: impl PgExecutor<'e>,
        id: DriverId,
        safety_score: i32,
        status: DriverStatus,
    ) -> Result<(), AppError> {
        let query = format!(
            "UPDATE {} SET safety_score = $1, status = $2, updated_at = NOW() WHERE id = $3",
            TABLE_NAME
        );
        sqlx::query(&query)
            .bind(safety_score)
            .bind(status)
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn list_compliance(
        &self,
        db: &PgPool,
        today: NaiveDate,
    ) -> Result<Vec<DriverCompliance>, AppError> {
        let rows = sqlx::query_as::<_, DriverCompliance>(
            "SELECT d.id, d.name, d.license_number, d.license_expiry_date, d.status, d.safety_score, \
                    (d.license_expiry_date < $1) AS is_expired, \
                    COUNT(t.id) FILTER (WHERE t.status = 'completed') AS completed_trip_count \
             FROM drivers d \
             LEFT JOIN trips t ON t.driver_id = d.id \
             GROUP BY d.id \
             ORDER BY d.name",
        )
        .bind(today)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn has_trips(&self, db: &PgPool, id: DriverId) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM trips WHERE driver_id = $1)",
        )
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(exists)
    }
}

fn map_write_error(err: sqlx::Error) -> AppError {
    if unique_violation(&err).is_some() {
        return AppError::Conflict(DUPLICATE_LICENSE.into());
    }
    err.into()
}

impl Repository<Driver> for DriverRepository {
    const TABLE: &'static str = TABLE_NAME;
    type Id = DriverId;

    async fn find_all(&self, db: &PgPool) -> Result<Vec<Driver>, AppError> {
        let query = format!("{} ORDER BY created_at DESC", Self::base_select_query());
        Ok(sqlx::query_as::<_, Driver>(&query).fetch_all(db).await?)
    }

    async fn find_by_id(&self, db: &PgPool, id: DriverId) -> Result<Driver, AppError> {
        self.find_optional(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(DRIVER_NOT_FOUND.into()))
    }

    async fn create(&self, db: &PgPool, item: &Driver) -> Result<Driver, AppError> {
        let query = format!(
            "INSERT INTO {} (id, name, license_number, license_expiry_date, status, safety_score, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        sqlx::query_as::<_, Driver>(&query)
            .bind(item.id)
            .bind(&item.name)
            .bind(&item.license_number)
            .bind(item.license_expiry_date)
            .bind(item.status)
            .bind(item.safety_score)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(db)
            .await
            .map_err(map_write_error)
    }

    async fn update(&self, db: &PgPool, item: &Driver) -> Result<Driver, AppError> {
        let query = format!(
            "UPDATE {} SET name = $2, license_number = $3, license_expiry_date = $4, \
             status = $5, updated_at = $6 \
             WHERE id = $1 RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        sqlx::query_as::<_, Driver>(&query)
            .bind(item.id)
            .bind(&item.name)
            .bind(&item.license_number)
            .bind(item.license_expiry_date)
            .bind(item.status)
            .bind(item.updated_at)
            .fetch_optional(db)
            .await
            .map_err(map_write_error)?
            .ok_or_else(|| AppError::NotFound(DRIVER_NOT_FOUND.into()))
    }

    async fn delete(&self, db: &PgPool, id: DriverId) -> Result<(), AppError> {
        let query = format!("DELETE FROM {} WHERE id = $1", TABLE_NAME);
        let result = sqlx::query(&query).bind(id).execute(db).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(DRIVER_NOT_FOUND.into()));
        }
        Ok(())
    }
}
