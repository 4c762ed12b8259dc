// handlers/protected/mod.rs - Data handlers
//
// Guarded by `jwt_auth_middleware` when `security.require_auth` is on. Handlers
// accept an optional `AuthUser` so they work either way.

pub mod cars;
pub mod owners;

pub use cars::{car_get, cars_get, cars_post};
pub use owners::{owner_delete, owner_get, owners_get, owners_post};
