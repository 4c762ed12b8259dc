pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod seed;

pub use manager::{DatabaseError, DatabaseManager, StoreKind, Stores};
pub use repository::{AppUserRepository, CarRepository, OwnerRepository};
