use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{AppUser, Car, NewAppUser, NewCar, NewOwner, Owner};
use crate::database::repository::{AppUserRepository, CarRepository, OwnerRepository};

/// An owner and the cars it owns. Dropping the entry drops the cars.
#[derive(Debug)]
struct OwnerEntry {
    owner: Owner,
    cars: BTreeMap<i64, Car>,
}

#[derive(Debug, Default)]
struct Inner {
    /// Single id sequence shared by every entity
    next_id: i64,
    owners: BTreeMap<i64, OwnerEntry>,
    /// Cars not yet assigned to an owner
    unassigned: BTreeMap<i64, Car>,
    users: BTreeMap<i64, AppUser>,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn cars(&self) -> impl Iterator<Item = &Car> {
        self.owners
            .values()
            .flat_map(|entry| entry.cars.values())
            .chain(self.unassigned.values())
    }
}

/// Process-local store used when no database is configured
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OwnerRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Owner>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.owners.values().map(|e| e.owner.clone()).collect())
    }

    async fn find_by_id(&self, owner_id: i64) -> Result<Option<Owner>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner.owners.get(&owner_id).map(|e| e.owner.clone()))
    }

    async fn find_by_firstname(&self, firstname: &str) -> Result<Option<Owner>, DatabaseError> {
        let inner = self.inner.read().await;
        let owner = inner
            .owners
            .values()
            .find(|e| e.owner.firstname == firstname)
            .map(|e| e.owner.clone());
        Ok(owner)
    }

    async fn save(&self, owner: NewOwner) -> Result<Owner, DatabaseError> {
        let mut inner = self.inner.write().await;
        let owner_id = inner.next_id();
        let owner = Owner {
            owner_id,
            firstname: owner.firstname,
            lastname: owner.lastname,
        };
        inner.owners.insert(
            owner_id,
            OwnerEntry {
                owner: owner.clone(),
                cars: BTreeMap::new(),
            },
        );
        Ok(owner)
    }

    async fn delete(&self, owner_id: i64) -> Result<(), DatabaseError> {
        let mut inner = self.inner.write().await;
        match inner.owners.remove(&owner_id) {
            Some(entry) => {
                tracing::debug!("Deleted owner {} with {} car(s)", owner_id, entry.cars.len());
                Ok(())
            }
            None => Err(DatabaseError::NotFound(format!("Owner {} not found", owner_id))),
        }
    }

    async fn delete_all(&self) -> Result<u64, DatabaseError> {
        let mut inner = self.inner.write().await;
        let removed = inner.owners.len() as u64;
        inner.owners.clear();
        Ok(removed)
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        Ok(self.inner.read().await.owners.len() as i64)
    }
}

#[async_trait]
impl CarRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Car>, DatabaseError> {
        let inner = self.inner.read().await;
        let mut cars: Vec<Car> = inner.cars().cloned().collect();
        cars.sort_by_key(|c| c.id);
        Ok(cars)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Car>, DatabaseError> {
        let inner = self.inner.read().await;
        let car = inner.cars().find(|c| c.id == id).cloned();
        Ok(car)
    }

    async fn find_by_owner(&self, owner_id: i64) -> Result<Vec<Car>, DatabaseError> {
        let inner = self.inner.read().await;
        Ok(inner
            .owners
            .get(&owner_id)
            .map(|e| e.cars.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_by_brand(&self, brand: &str) -> Result<Vec<Car>, DatabaseError> {
        let inner = self.inner.read().await;
        let mut cars: Vec<Car> = inner.cars().filter(|c| c.brand == brand).cloned().collect();
        cars.sort_by_key(|c| c.id);
        Ok(cars)
    }

    async fn save(&self, car: NewCar) -> Result<Car, DatabaseError> {
        let mut inner = self.inner.write().await;

        if let Some(owner_id) = car.owner {
            if !inner.owners.contains_key(&owner_id) {
                return Err(DatabaseError::Conflict(format!(
                    "car references missing owner {}",
                    owner_id
                )));
            }
        }

        let id = inner.next_id();
        let car = car.into_car(id);
        match car.owner {
            Some(owner_id) => {
                if let Some(entry) = inner.owners.get_mut(&owner_id) {
                    entry.cars.insert(id, car.clone());
                }
            }
            None => {
                inner.unassigned.insert(id, car.clone());
            }
        }
        Ok(car)
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        Ok(self.inner.read().await.cars().count() as i64)
    }
}

#[async_trait]
impl AppUserRepository for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<AppUser>, DatabaseError> {
        let inner = self.inner.read().await;
        let user = inner.users.values().find(|u| u.username == username).cloned();
        Ok(user)
    }

    async fn save(&self, user: NewAppUser) -> Result<AppUser, DatabaseError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.username == user.username) {
            return Err(DatabaseError::Conflict(format!(
                "username '{}' already exists",
                user.username
            )));
        }

        let id = inner.next_id();
        let user = AppUser {
            id,
            username: user.username,
            password: user.password_hash,
            role: user.role,
        };
        inner.users.insert(id, user.clone());
        Ok(user)
    }

    async fn count(&self) -> Result<i64, DatabaseError> {
        Ok(self.inner.read().await.users.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn owner(store: &MemoryStore, first: &str, last: &str) -> Owner {
        OwnerRepository::save(store, NewOwner::new(first, last)).await.unwrap()
    }

    async fn car(store: &MemoryStore, reg: &str, owner: Option<i64>) -> Car {
        CarRepository::save(
            store,
            NewCar::new("Ford", "Mustang", "Red", reg, 2023, 59000, owner),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn save_owner_and_find_by_firstname() {
        let store = MemoryStore::new();
        owner(&store, "일", "김").await;

        let found = store.find_by_firstname("일").await.unwrap();
        assert!(found.is_some());
        assert!(store.find_by_firstname("이").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_all_owners_leaves_zero() {
        let store = MemoryStore::new();
        owner(&store, "이", "김").await;
        owner(&store, "삼", "박").await;

        assert_eq!(store.delete_all().await.unwrap(), 2);
        assert_eq!(OwnerRepository::count(&store).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn deleting_owner_cascades_to_cars() {
        let store = MemoryStore::new();
        let john = owner(&store, "John", "Johnson").await;
        let mary = owner(&store, "Mary", "Robinson").await;
        car(&store, "ADF-11121", Some(john.owner_id)).await;
        car(&store, "SSJ-3002", Some(john.owner_id)).await;
        let kept = car(&store, "KKO-0212", Some(mary.owner_id)).await;

        OwnerRepository::delete(&store, john.owner_id).await.unwrap();

        let cars = CarRepository::find_all(&store).await.unwrap();
        assert_eq!(cars, vec![kept]);
        assert!(cars.iter().all(|c| c.owner != Some(john.owner_id)));
        assert!(store.find_by_owner(john.owner_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_missing_owner_is_not_found() {
        let store = MemoryStore::new();
        let err = OwnerRepository::delete(&store, 42).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }

    #[tokio::test]
    async fn car_with_missing_owner_is_rejected() {
        let store = MemoryStore::new();
        let err = CarRepository::save(
            &store,
            NewCar::new("Kia", "Seltos", "Chacoal", "360수5690", 2020, 28000, Some(99)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
        assert_eq!(CarRepository::count(&store).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unassigned_cars_are_listed() {
        let store = MemoryStore::new();
        let saved = car(&store, "NEW-0001", None).await;
        assert_eq!(CarRepository::find_by_id(&store, saved.id).await.unwrap(), Some(saved));
        assert_eq!(store.find_by_brand("Ford").await.unwrap().len(), 1);
        assert!(store.find_by_brand("Kia").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ids_come_from_one_sequence() {
        let store = MemoryStore::new();
        let o = owner(&store, "John", "Johnson").await;
        let c = car(&store, "ADF-11121", Some(o.owner_id)).await;
        assert_eq!(o.owner_id, 1);
        assert_eq!(c.id, 2);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let store = MemoryStore::new();
        AppUserRepository::save(&store, NewAppUser::new("user", "$argon2id$x", "USER"))
            .await
            .unwrap();

        let err = AppUserRepository::save(&store, NewAppUser::new("user", "$argon2id$y", "ADMIN"))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
        assert_eq!(AppUserRepository::count(&store).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn username_lookup_is_case_sensitive() {
        let store = MemoryStore::new();
        AppUserRepository::save(&store, NewAppUser::new("admin", "$argon2id$x", "ADMIN"))
            .await
            .unwrap();
        assert!(store.find_by_username("admin").await.unwrap().is_some());
        assert!(store.find_by_username("Admin").await.unwrap().is_none());
    }
}
