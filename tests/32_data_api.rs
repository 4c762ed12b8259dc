mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn list_cars_returns_seeded_fleet() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::get(format!("{}/cars", server.base_url)).await?;
    assert_eq!(res.status(), StatusCode::OK, "expected 200 OK, got {}", res.status());

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], true, "success flag false or missing: {}", body);
    let cars = body["data"].as_array().expect("data should be an array");

    let mustang = cars
        .iter()
        .find(|c| c["registrationNumber"] == "ADF-11121")
        .expect("seeded Mustang missing");
    assert_eq!(mustang["brand"], "Ford");
    assert_eq!(mustang["modelYear"], 2023);
    assert_eq!(mustang["price"], 59000);
    assert!(mustang["owner"].is_i64());

    Ok(())
}

#[tokio::test]
async fn list_cars_by_brand() -> Result<()> {
    let server = common::ensure_server().await?;

    let body = reqwest::get(format!("{}/cars?brand=Kia", server.base_url))
        .await?
        .json::<Value>()
        .await?;

    let cars = body["data"].as_array().expect("data should be an array");
    assert_eq!(cars.len(), 1, "unexpected cars: {}", body);
    assert_eq!(cars[0]["model"], "Seltos");
    Ok(())
}

#[tokio::test]
async fn list_owners_includes_cars() -> Result<()> {
    let server = common::ensure_server().await?;

    let body = reqwest::get(format!("{}/owners", server.base_url))
        .await?
        .json::<Value>()
        .await?;

    let owners = body["data"].as_array().expect("data should be an array");
    let john = owners
        .iter()
        .find(|o| o["firstname"] == "John")
        .expect("seeded owner John missing");
    assert_eq!(john["lastname"], "Johnson");
    assert_eq!(john["cars"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test]
async fn missing_car_is_404() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::get(format!("{}/cars/999999", server.base_url)).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn deleting_owner_removes_its_cars() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/owners", server.base_url))
        .json(&json!({ "firstname": "Cascade", "lastname": "Tester" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let owner_id = res.json::<Value>().await?["data"]["ownerId"]
        .as_i64()
        .expect("ownerId missing");

    let mut car_ids = Vec::new();
    for reg in ["CAS-0001", "CAS-0002"] {
        let res = client
            .post(format!("{}/cars", server.base_url))
            .json(&json!({
                "brand": "Hyundai",
                "model": "Ioniq",
                "color": "Blue",
                "registrationNumber": reg,
                "modelYear": 2024,
                "price": 45000,
                "owner": owner_id
            }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
        car_ids.push(res.json::<Value>().await?["data"]["id"].as_i64().expect("id missing"));
    }

    let owner = client
        .get(format!("{}/owners/{}", server.base_url, owner_id))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(owner["data"]["cars"].as_array().map(Vec::len), Some(2));

    let res = client
        .delete(format!("{}/owners/{}", server.base_url, owner_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    for id in car_ids {
        let res = client
            .get(format!("{}/cars/{}", server.base_url, id))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "car {} survived its owner", id);
    }

    let cars = client
        .get(format!("{}/cars", server.base_url))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let orphans = cars["data"]
        .as_array()
        .expect("data should be an array")
        .iter()
        .filter(|c| c["owner"] == owner_id)
        .count();
    assert_eq!(orphans, 0);

    let res = client
        .delete(format!("{}/owners/{}", server.base_url, owner_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn car_for_missing_owner_is_conflict() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::Client::new()
        .post(format!("{}/cars", server.base_url))
        .json(&json!({
            "brand": "Kia",
            "model": "EV6",
            "color": "Grey",
            "registrationNumber": "NOP-0000",
            "modelYear": 2022,
            "price": 52000,
            "owner": 987654
        }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn blank_owner_is_bad_request() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::Client::new()
        .post(format!("{}/owners", server.base_url))
        .json(&json!({ "firstname": " ", "lastname": "Nobody" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn car_with_missing_fields_is_bad_request() -> Result<()> {
    let server = common::ensure_server().await?;

    let res = reqwest::Client::new()
        .post(format!("{}/cars", server.base_url))
        .json(&json!({ "brand": "Kia" }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "BAD_REQUEST");
    Ok(())
}
