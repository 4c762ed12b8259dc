use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{AppUser, Car, NewAppUser, NewCar, NewOwner, Owner};

/// Data access for owners. An owner owns its cars: deleting it deletes them.
#[async_trait]
pub trait OwnerRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Owner>, DatabaseError>;

    async fn find_by_id(&self, owner_id: i64) -> Result<Option<Owner>, DatabaseError>;

    async fn find_by_firstname(&self, firstname: &str) -> Result<Option<Owner>, DatabaseError>;

    async fn save(&self, owner: NewOwner) -> Result<Owner, DatabaseError>;

    /// Removes the owner and every car referencing it.
    /// Fails with `NotFound` when no such owner exists.
    async fn delete(&self, owner_id: i64) -> Result<(), DatabaseError>;

    /// Removes all owners (and therefore all owned cars), returning the owner count removed
    async fn delete_all(&self) -> Result<u64, DatabaseError>;

    async fn count(&self) -> Result<i64, DatabaseError>;
}

#[async_trait]
pub trait CarRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Car>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Car>, DatabaseError>;

    async fn find_by_owner(&self, owner_id: i64) -> Result<Vec<Car>, DatabaseError>;

    async fn find_by_brand(&self, brand: &str) -> Result<Vec<Car>, DatabaseError>;

    /// Fails with `Conflict` when `car.owner` names a missing owner
    async fn save(&self, car: NewCar) -> Result<Car, DatabaseError>;

    async fn count(&self) -> Result<i64, DatabaseError>;
}

#[async_trait]
pub trait AppUserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<AppUser>, DatabaseError>;

    /// Fails with `Conflict` when the username is taken
    async fn save(&self, user: NewAppUser) -> Result<AppUser, DatabaseError>;

    async fn count(&self) -> Result<i64, DatabaseError>;
}
