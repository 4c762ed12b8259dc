use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::database::manager::DatabaseError;
use crate::database::models::{AppUser, Car, NewAppUser, NewCar, NewOwner, Owner};
use crate::database::repository::{AppUserRepository, CarRepository, OwnerRepository};

/// Statements run at startup. `entity_seq` gives every table ids from one sequence.
const SCHEMA: &[&str] = &[
    "CREATE SEQUENCE IF NOT EXISTS entity_seq",
    r#"
    CREATE TABLE IF NOT EXISTS owner (
        owner_id  BIGINT PRIMARY KEY DEFAULT nextval('entity_seq'),
        firstname TEXT NOT NULL,
        lastname  TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS car (
        id                  BIGINT PRIMARY KEY DEFAULT nextval('entity_seq'),
        brand               TEXT NOT NULL,
        model               TEXT NOT NULL,
        color               TEXT NOT NULL,
        registration_number TEXT NOT NULL,
        model_year          INTEGER NOT NULL,
        price               INTEGER NOT NULL,
        owner               BIGINT REFERENCES owner (owner_id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS app_user (
        id       BIGINT PRIMARY KEY DEFAULT nextval('entity_seq'),
        username TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        role     TEXT NOT NULL
    )
    "#,
];

/// Advisory lock id held while the schema is created
const SCHEMA_LOCK_KEY: i64 = 0x6361_7264_6230;

const CAR_COLUMNS: &str = "id, brand, model, color, registration_number, model_year, price, owner";

/// Map constraint violations to `Conflict`, keep everything else as a driver error
fn map_write_error(e: sqlx::Error, what: &str) -> DatabaseError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
            return DatabaseError::Conflict(format!("{}: {}", what, db_err.message()));
        }
    }
    DatabaseError::Sqlx(e)
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent. Concurrent callers queue on an advisory lock since
    /// `CREATE ... IF NOT EXISTS` races with itself in PostgreSQL.
    pub async fn create_schema(&self) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SCHEMA_LOCK_KEY)
            .execute(&mut *tx)
            .await?;
        for statement in SCHEMA {
            sqlx::query(*statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        info!("Database schema ready");
        Ok(())
    }
}

#[async_trait]
impl OwnerRepository for PgStore {
    async fn find_all(&self) -> Result<Vec<Owner>, DatabaseError> {
        let owners = sqlx::query_as::<_, Owner>(
            "SELECT owner_id, firstname, lastname FROM owner ORDER BY owner_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(owners)
    }

    async fn find_by_id(&self, owner_id: i64) -> Result<Option<Owner>, DatabaseError> {
        let owner = sqlx::query_as::<_, Owner>(
            "SELECT owner_id, firstname, lastname FROM owner WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(owner)
    }

    async fn find_by_firstname(&self, firstname: &str) -> Result<Option<Owner>, DatabaseError> {
        let owner = sqlx::query_as::<_, Owner>(
            "SELECT owner_id, firstname, lastname FROM owner WHERE firstname = $1 ORDER BY owner_id LIMIT 1",
        )
        .bind(firstname)
        .fetch_optional(&self.pool)
        .await?;
        Ok(owner)
    }

    async fn save(&self, owner: NewOwner) -> Result<Owner, DatabaseError> {
        let owner = sqlx::query_as::<_, Owner>(
            "INSERT INTO owner (firstname, lastname) VALUES ($1, $2)
             RETURNING owner_id, firstname, lastname",
        )
        .bind(&owner.firstname)
        .bind(&owner.lastname)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "owner"))?;
        Ok(owner)
    }

    async fn delete(&self, owner_id: i64) -> Result<(), DatabaseError> {
        // Cars go first in the same transaction; the FK cascade is only a backstop
        let mut tx = self.pool.begin().await?;

        let cars = sqlx::query("DELETE FROM car WHERE owner = $1")
            .bind(owner_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let owners = sqlx::query("DELETE FROM owner WHERE owner_id = $1")
            .bind(owner_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if owners == 0 {
            tx.rollback().await?;
            return Err(DatabaseError::NotFound(format!("Owner {} not found", owner_id)));
        }

        tx.commit().await?;
        debug!("Deleted owner {} with {} car(s)", owner_id, cars);
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM car WHERE owner IS NOT NULL")
            .execute(&mut *tx)
            .await?;
        let removed = sqlx::query("DELETE FROM owner")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;
        Ok(removed)
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM owner")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl CarRepository for PgStore {
    async fn find_all(&self) -> Result<Vec<Car>, DatabaseError> {
        let cars = sqlx::query_as::<_, Car>(&format!("SELECT {CAR_COLUMNS} FROM car ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(cars)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Car>, DatabaseError> {
        let car = sqlx::query_as::<_, Car>(&format!("SELECT {CAR_COLUMNS} FROM car WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(car)
    }

    async fn find_by_owner(&self, owner_id: i64) -> Result<Vec<Car>, DatabaseError> {
        let cars = sqlx::query_as::<_, Car>(&format!(
            "SELECT {CAR_COLUMNS} FROM car WHERE owner = $1 ORDER BY id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(cars)
    }

    async fn find_by_brand(&self, brand: &str) -> Result<Vec<Car>, DatabaseError> {
        let cars = sqlx::query_as::<_, Car>(&format!(
            "SELECT {CAR_COLUMNS} FROM car WHERE brand = $1 ORDER BY id"
        ))
        .bind(brand)
        .fetch_all(&self.pool)
        .await?;
        Ok(cars)
    }

    async fn save(&self, car: NewCar) -> Result<Car, DatabaseError> {
        let car = sqlx::query_as::<_, Car>(&format!(
            "INSERT INTO car (brand, model, color, registration_number, model_year, price, owner)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {CAR_COLUMNS}"
        ))
        .bind(&car.brand)
        .bind(&car.model)
        .bind(&car.color)
        .bind(&car.registration_number)
        .bind(car.model_year)
        .bind(car.price)
        .bind(car.owner)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "car"))?;
        Ok(car)
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM car")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl AppUserRepository for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<AppUser>, DatabaseError> {
        let user = sqlx::query_as::<_, AppUser>(
            "SELECT id, username, password, role FROM app_user WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn save(&self, user: NewAppUser) -> Result<AppUser, DatabaseError> {
        let user = sqlx::query_as::<_, AppUser>(
            "INSERT INTO app_user (username, password, role) VALUES ($1, $2, $3)
             RETURNING id, username, password, role",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "app_user"))?;
        Ok(user)
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM app_user")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
