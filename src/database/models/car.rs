use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub color: String,
    pub registration_number: String,
    pub model_year: i32,
    pub price: i32,
    /// Id of the owning `Owner`; `None` until the car is assigned
    pub owner: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCar {
    pub brand: String,
    pub model: String,
    pub color: String,
    pub registration_number: String,
    pub model_year: i32,
    pub price: i32,
    #[serde(default)]
    pub owner: Option<i64>,
}

impl NewCar {
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        color: impl Into<String>,
        registration_number: impl Into<String>,
        model_year: i32,
        price: i32,
        owner: Option<i64>,
    ) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            color: color.into(),
            registration_number: registration_number.into(),
            model_year,
            price,
            owner,
        }
    }

    pub(crate) fn into_car(self, id: i64) -> Car {
        Car {
            id,
            brand: self.brand,
            model: self.model,
            color: self.color,
            registration_number: self.registration_number,
            model_year: self.model_year,
            price: self.price,
            owner: self.owner,
        }
    }
}
