use rocket::http::Status;
use rocket::local::asynchronous::Client;
use serde_json::json;

use stitchline_api::models::EmployeeContact;
use stitchline_api::orm::testing::test_rocket;

async fn create_contact(client: &Client, name: &str) -> EmployeeContact {
    let response = client
        .post("/api/1/Contacts")
        .json(&json!({
            "name": name,
            "phone": "01711-000000",
            "department": "sewing",
            "salary": 15000.0,
            "join_date": "2024-03-01"
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    response.into_json().await.expect("valid contact JSON")
}

#[rocket::async_test]
async fn test_create_contact_defaults_active() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let contact = create_contact(&client, "Rahima").await;
    assert!(contact.is_active);
    assert_eq!(contact.department, "sewing");
}

#[rocket::async_test]
async fn test_soft_delete_and_restore() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let keep = create_contact(&client, "Keep").await;
    let gone = create_contact(&client, "Gone").await;

    let response = client
        .delete(format!("/api/1/Contacts/{}", gone.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);

    // Default listing hides the deactivated contact.
    let response = client.get("/api/1/Contacts").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let page: serde_json::Value = response.into_json().await.expect("valid page JSON");
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], keep.id);

    // include_inactive opts back in.
    let response = client
        .get("/api/1/Contacts?include_inactive=true")
        .dispatch()
        .await;
    let page: serde_json::Value = response.into_json().await.expect("valid page JSON");
    assert_eq!(page["total"], 2);

    // The row itself is still fetchable by id.
    let response = client
        .get(format!("/api/1/Contacts/{}", gone.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let stored: EmployeeContact = response.into_json().await.expect("valid contact JSON");
    assert!(!stored.is_active);

    // Restore brings it back into the default listing.
    let response = client
        .post(format!("/api/1/Contacts/{}/restore", gone.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let restored: EmployeeContact = response.into_json().await.expect("valid contact JSON");
    assert!(restored.is_active);

    let response = client.get("/api/1/Contacts").dispatch().await;
    let page: serde_json::Value = response.into_json().await.expect("valid page JSON");
    assert_eq!(page["total"], 2);
}

#[rocket::async_test]
async fn test_update_contact_partial() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let contact = create_contact(&client, "Promotee").await;

    let response = client
        .put(format!("/api/1/Contacts/{}", contact.id))
        .json(&json!({ "salary": 18500.0, "department": "finishing" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let updated: EmployeeContact = response.into_json().await.expect("valid contact JSON");
    assert_eq!(updated.salary, 18500.0);
    assert_eq!(updated.department, "finishing");
    assert_eq!(updated.name, "Promotee");
}

#[rocket::async_test]
async fn test_missing_contact_is_404() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let response = client.get("/api/1/Contacts/9999").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);

    let response = client
        .put("/api/1/Contacts/9999")
        .json(&json!({ "salary": 1.0 }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);

    let response = client.delete("/api/1/Contacts/9999").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}
