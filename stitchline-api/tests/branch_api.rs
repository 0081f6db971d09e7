use rocket::http::Status;
use rocket::local::asynchronous::Client;
use serde_json::json;

use stitchline_api::models::BranchView;
use stitchline_api::orm::testing::test_rocket;

fn branch_body(name: &str, is_main: bool) -> serde_json::Value {
    json!({
        "name": name,
        "owner": "Karim",
        "rent": 45000.0,
        "size_sqft": 1800.0,
        "is_main": is_main,
        "is_outlet": false,
        "is_manufacturing": !is_main,
        "facilities": ["cutting table", "generator"]
    })
}

async fn create_branch(client: &Client, name: &str, is_main: bool) -> BranchView {
    let response = client
        .post("/api/1/Branches")
        .json(&branch_body(name, is_main))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    response.into_json().await.expect("valid branch JSON")
}

#[rocket::async_test]
async fn test_create_and_get_branch() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let created = create_branch(&client, "Mirpur Unit", false).await;
    assert!(created.id > 0);
    assert_eq!(created.facilities, vec!["cutting table", "generator"]);

    let response = client
        .get(format!("/api/1/Branches/{}", created.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let fetched: BranchView = response.into_json().await.expect("valid branch JSON");
    assert_eq!(fetched.name, "Mirpur Unit");
    assert_eq!(fetched.rent, 45000.0);
}

#[rocket::async_test]
async fn test_duplicate_name_rejected() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    create_branch(&client, "Head Office", true).await;

    let response = client
        .post("/api/1/Branches")
        .json(&branch_body("Head Office", false))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);
}

#[rocket::async_test]
async fn test_single_main_branch_enforced() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    create_branch(&client, "Head Office", true).await;

    // A second main branch is rejected outright.
    let response = client
        .post("/api/1/Branches")
        .json(&branch_body("Pretender", true))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);

    // Promoting an existing branch to main fails the same way.
    let outlet = create_branch(&client, "Outlet", false).await;
    let response = client
        .put(format!("/api/1/Branches/{}", outlet.id))
        .json(&json!({ "is_main": true }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);
}

#[rocket::async_test]
async fn test_update_preserves_unspecified_fields() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let branch = create_branch(&client, "Savar Unit", false).await;

    let response = client
        .put(format!("/api/1/Branches/{}", branch.id))
        .json(&json!({ "rent": 52000.0 }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let updated: BranchView = response.into_json().await.expect("valid branch JSON");
    assert_eq!(updated.rent, 52000.0);
    assert_eq!(updated.name, "Savar Unit");
    assert_eq!(updated.owner, "Karim");
}

#[rocket::async_test]
async fn test_delete_branch() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let branch = create_branch(&client, "Closing Soon", false).await;

    let response = client
        .delete(format!("/api/1/Branches/{}", branch.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);

    let response = client
        .get(format!("/api/1/Branches/{}", branch.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);

    let response = client
        .delete(format!("/api/1/Branches/{}", branch.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn test_list_branches_sorted() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    for name in ["Gazipur", "Ashulia", "Tongi"] {
        create_branch(&client, name, false).await;
    }

    let response = client
        .get("/api/1/Branches?sort=name&dir=asc")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let page: serde_json::Value = response.into_json().await.expect("valid page JSON");
    assert_eq!(page["total"], 3);
    let names: Vec<&str> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ashulia", "Gazipur", "Tongi"]);

    // Unknown sort keys are rejected, not silently ignored.
    let response = client
        .get("/api/1/Branches?sort=owner")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}
