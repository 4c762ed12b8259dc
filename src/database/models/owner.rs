use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::car::Car;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub owner_id: i64,
    pub firstname: String,
    pub lastname: String,
}

/// Owner payload before an id has been assigned
#[derive(Debug, Clone, Deserialize)]
pub struct NewOwner {
    pub firstname: String,
    pub lastname: String,
}

impl NewOwner {
    pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        Self {
            firstname: firstname.into(),
            lastname: lastname.into(),
        }
    }
}

/// Owner together with every car it owns, as listed by `GET /owners`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerWithCars {
    #[serde(flatten)]
    pub owner: Owner,
    pub cars: Vec<Car>,
}

impl OwnerWithCars {
    /// Attach each car to its owner. Cars pointing at an unknown owner are skipped.
    pub fn group(owners: Vec<Owner>, cars: Vec<Car>) -> Vec<OwnerWithCars> {
        let mut grouped: Vec<OwnerWithCars> = owners
            .into_iter()
            .map(|owner| OwnerWithCars { owner, cars: Vec::new() })
            .collect();

        for car in cars {
            let Some(owner_id) = car.owner else { continue };
            if let Some(entry) = grouped.iter_mut().find(|o| o.owner.owner_id == owner_id) {
                entry.cars.push(car);
            }
        }

        grouped
    }
}
