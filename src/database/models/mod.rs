pub mod app_user;
pub mod car;
pub mod owner;

pub use app_user::{AppUser, NewAppUser};
pub use car::{Car, NewCar};
pub use owner::{NewOwner, Owner, OwnerWithCars};
