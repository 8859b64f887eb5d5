//! Vehicle repository.

use sqlx::{PgExecutor, PgPool};

use crate::{
    error::{foreign_key_violation, unique_violation, AppError},
    models::vehicle::{Vehicle, VehicleOption, VehicleStatus},
    repositories::repository::Repository,
    types::VehicleId,
};

const TABLE_NAME: &str = "vehicles";
const SELECT_COLUMNS: &str =
    "id, model_name, license_plate, max_capacity_kg, odometer, status, created_at, updated_at";

pub const DUPLICATE_PLATE: &str = "License plate must be unique.";
pub const VEHICLE_NOT_FOUND: &str = "Vehicle not found.";

#[derive(Debug, Default, Clone, Copy)]
pub struct VehicleRepository;

impl VehicleRepository {
    pub fn new() -> Self {
        Self
    }

    fn base_select_query() -> String {
        format!("SELECT {} FROM {}", SELECT_COLUMNS, TABLE_NAME)
    }

    pub async fn find_optional<'e>(
        &self,
        db: impl PgExecutor<'e>,
        id: VehicleId,
    ) -> Result<Option<Vehicle>, AppError> {
        let query = format!("{} WHERE id = $1", Self::base_select_query());
        let row = sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }

    /// Reads a vehicle and holds its row lock until the transaction ends.
    pub async fn lock_by_id<'e>(
        &self,
        db: impl PgExecutor<'e>,
        id: VehicleId,
    ) -> Result<Option<Vehicle>, AppError> {
        let query = format!("{} WHERE id = $1 FOR UPDATE", Self::base_select_query());
        let row = sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }

    pub async fn set_status<'e>(
        &self,
        db: impl PgExecutor<'e>,
        id: VehicleId,
        status: VehicleStatus,
    ) -> Result<(), AppError> {
        let query = format!(
            "UPDATE {} SET status = $1, updated_at = NOW() WHERE id = $2",
            TABLE_NAME
        );
        sqlx::query(&query).bind(status).bind(id).execute(db).await?;
        Ok(())
    }

    pub async fn has_trips(&self, db: &PgPool, id: VehicleId) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM trips WHERE vehicle_id = $1)",
        )
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(exists)
    }

    /// All vehicles ordered by plate.
    pub async fn list_by_plate(&self, db: &PgPool) -> Result<Vec<Vehicle>, AppError> {
        let query = format!("{} ORDER BY license_plate", Self::base_select_query());
        Ok(sqlx::query_as::<_, Vehicle>(&query).fetch_all(db).await?)
    }

    /// Vehicles a dispatcher may pick: anything not in the shop.
    pub async fn list_assignable(&self, db: &PgPool) -> Result<Vec<VehicleOption>, AppError> {
        let rows = sqlx::query_as::<_, VehicleOption>(
            "SELECT id, license_plate FROM vehicles WHERE status <> 'in_shop' ORDER BY license_plate",
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn list_options(&self, db: &PgPool) -> Result<Vec<VehicleOption>, AppError> {
        let rows = sqlx::query_as::<_, VehicleOption>(
            "SELECT id, license_plate FROM vehicles ORDER BY license_plate",
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

fn map_write_error(err: sqlx::Error) -> AppError {
    if unique_violation(&err).is_some() {
        return AppError::Conflict(DUPLICATE_PLATE.into());
    }
    err.into()
}

impl Repository<Vehicle> for VehicleRepository {
    const TABLE: &'static str = TABLE_NAME;
    type Id = VehicleId;

    async fn find_all(&self, db: &PgPool) -> Result<Vec<Vehicle>, AppError> {
        let query = format!("{} ORDER BY created_at DESC", Self::base_select_query());
        Ok(sqlx::query_as::<_, Vehicle>(&query).fetch_all(db).await?)
    }

    async fn find_by_id(&self, db: &PgPool, id: VehicleId) -> Result<Vehicle, AppError> {
        self.find_optional(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(VEHICLE_NOT_FOUND.into()))
    }

    async fn create(&self, db: &PgPool, item: &Vehicle) -> Result<Vehicle, AppError> {
        let query = format!(
            "INSERT INTO {} (id, model_name, license_plate, max_capacity_kg, odometer, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(item.id)
            .bind(&item.model_name)
            .bind(&item.license_plate)
            .bind(item.max_capacity_kg)
            .bind(item.odometer)
            .bind(item.status)
            .bind(item.created_at)
            .bind(item.updated_at)
            .fetch_one(db)
            .await
            .map_err(map_write_error)
    }

    async fn update(&self, db: &PgPool, item: &Vehicle) -> Result<Vehicle, AppError> {
        let query = format!(
            "UPDATE {} SET model_name = $2, license_plate = $3, max_capacity_kg = $4, \
             odometer = $5, status = $6, updated_at = $7 \
             WHERE id = $1 RETURNING {}",
            TABLE_NAME, SELECT_COLUMNS
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(item.id)
            .bind(&item.model_name)
            .bind(&item.license_plate)
            .bind(item.max_capacity_kg)
            .bind(item.odometer)
            .bind(item.status)
            .bind(item.updated_at)
            .fetch_optional(db)
            .await
            .map_err(map_write_error)?
            .ok_or_else(|| AppError::NotFound(VEHICLE_NOT_FOUND.into()))
    }

    async fn delete(&self, db: &PgPool, id: VehicleId) -> Result<(), AppError> {
        let query = format!("DELETE FROM {} WHERE id = $1", TABLE_NAME);
        let result = sqlx::query(&query).bind(id).execute(db).await.map_err(|err| {
            if foreign_key_violation(&err).is_some() {
                AppError::Conflict(
                    "Vehicle cannot be deleted because it has maintenance or fuel records.".into(),
                )
            } else {
                err.into()
            }
        })?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(VEHICLE_NOT_FOUND.into()));
        }
        Ok(())
    }
}
