use anyhow::Context;
use tracing::info;

use crate::auth::password::hash_password;
use crate::database::manager::Stores;
use crate::database::models::{NewAppUser, NewCar, NewOwner};

/// Sample fleet loaded at startup.
///
/// Skipped when owners already exist so a persistent database is seeded once.
pub async fn seed(stores: &Stores) -> anyhow::Result<bool> {
    if stores.owners.count().await? > 0 {
        info!("Store already holds data, skipping seed");
        return Ok(false);
    }

    let owner1 = stores.owners.save(NewOwner::new("John", "Johnson")).await?;
    let owner2 = stores.owners.save(NewOwner::new("Mary", "Robinson")).await?;
    let owner3 = stores.owners.save(NewOwner::new("근수", "안")).await?;

    let cars = [
        NewCar::new("Ford", "Mustang", "Red", "ADF-11121", 2023, 59000, Some(owner1.owner_id)),
        NewCar::new("Nissan", "Leaf", "White", "SSJ-3002", 2020, 29000, Some(owner1.owner_id)),
        NewCar::new("Toyata", "Pruis", "Silver", "KKO-0212", 2022, 39000, Some(owner2.owner_id)),
        NewCar::new("Kia", "Seltos", "Chacoal", "360수5690", 2020, 28000, Some(owner3.owner_id)),
    ];
    for car in cars {
        stores.cars.save(car).await?;
    }

    for car in stores.cars.find_all().await? {
        info!("brand: {}, model: {}", car.brand, car.model);
    }

    // username / password: user / user, admin / admin
    for (username, role) in [("user", "USER"), ("admin", "ADMIN")] {
        let hash = hash_password(username)
            .with_context(|| format!("hashing seed password for '{}'", username))?;
        stores.users.save(NewAppUser::new(username, hash, role)).await?;
    }

    info!("Seeded 3 owners, 4 cars and 2 users");
    Ok(true)
}
