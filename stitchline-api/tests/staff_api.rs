use rocket::http::Status;
use rocket::local::asynchronous::Client;
use serde_json::json;

use stitchline_api::models::{EmployeeContact, StaffAbsence, StaffMonthlySummary, StaffSalaryEntry};
use stitchline_api::orm::testing::test_rocket;

async fn create_staffer(client: &Client) -> EmployeeContact {
    let response = client
        .post("/api/1/Contacts")
        .json(&json!({
            "name": "Shafiq",
            "phone": "01811-000000",
            "department": "cutting",
            "salary": 20000.0,
            "join_date": "2023-11-01"
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    response.into_json().await.expect("valid contact JSON")
}

async fn add_salary(client: &Client, contact_id: i32, date: &str, amount: f64, category: &str) {
    let response = client
        .post("/api/1/Staff/SalaryEntries")
        .json(&json!({
            "contact_id": contact_id,
            "entry_date": date,
            "amount": amount,
            "category": category
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
}

#[rocket::async_test]
async fn test_salary_entries_require_existing_contact() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let response = client
        .post("/api/1/Staff/SalaryEntries")
        .json(&json!({
            "contact_id": 9999,
            "entry_date": "2026-04-05",
            "amount": 5000.0,
            "category": "advance"
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn test_salary_entry_range_filter() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let staffer = create_staffer(&client).await;

    add_salary(&client, staffer.id, "2026-03-31", 100.0, "salary").await;
    add_salary(&client, staffer.id, "2026-04-05", 200.0, "salary").await;
    add_salary(&client, staffer.id, "2026-04-28", 300.0, "bonus").await;
    add_salary(&client, staffer.id, "2026-05-01", 400.0, "salary").await;

    let response = client
        .get(format!(
            "/api/1/Staff/{}/SalaryEntries?from=2026-04-01&to=2026-04-30",
            staffer.id
        ))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let entries: Vec<StaffSalaryEntry> = response.into_json().await.expect("valid entries JSON");
    assert_eq!(entries.len(), 2);
    // Newest first.
    assert_eq!(entries[0].amount, 300.0);
    assert_eq!(entries[1].amount, 200.0);

    // Malformed dates are rejected up front.
    let response = client
        .get(format!("/api/1/Staff/{}/SalaryEntries?from=04-01-2026", staffer.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn test_absences_and_validation() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let staffer = create_staffer(&client).await;

    let response = client
        .post("/api/1/Staff/Absences")
        .json(&json!({
            "contact_id": staffer.id,
            "start_date": "2026-04-20",
            "end_date": "2026-04-22",
            "reason": "fever"
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let absence: StaffAbsence = response.into_json().await.expect("valid absence JSON");
    assert_eq!(absence.reason.as_deref(), Some("fever"));

    // Inverted range.
    let response = client
        .post("/api/1/Staff/Absences")
        .json(&json!({
            "contact_id": staffer.id,
            "start_date": "2026-04-10",
            "end_date": "2026-04-08",
            "reason": null
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    let response = client
        .get(format!("/api/1/Staff/{}/Absences", staffer.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let absences: Vec<StaffAbsence> = response.into_json().await.expect("valid absences JSON");
    assert_eq!(absences.len(), 1);

    let response = client
        .delete(format!("/api/1/Staff/Absences/{}", absence.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);
}

#[rocket::async_test]
async fn test_monthly_summary_clips_absences() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let staffer = create_staffer(&client).await;

    add_salary(&client, staffer.id, "2026-04-10", 12000.0, "salary").await;
    add_salary(&client, staffer.id, "2026-04-25", 3000.0, "bonus").await;

    // Spans the March/April boundary: only Apr 1-2 count for April.
    client
        .post("/api/1/Staff/Absences")
        .json(&json!({
            "contact_id": staffer.id,
            "start_date": "2026-03-30",
            "end_date": "2026-04-02",
            "reason": "eid"
        }))
        .dispatch()
        .await;
    client
        .post("/api/1/Staff/Absences")
        .json(&json!({
            "contact_id": staffer.id,
            "start_date": "2026-04-20",
            "end_date": "2026-04-22",
            "reason": null
        }))
        .dispatch()
        .await;

    let response = client
        .get(format!("/api/1/Staff/{}/summary?year=2026&month=4", staffer.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let summary: StaffMonthlySummary = response.into_json().await.expect("valid summary JSON");
    assert_eq!(summary.salary_total, 15000.0);
    assert_eq!(summary.salary_entry_count, 2);
    assert_eq!(summary.salary_daily_average, 500.0);
    assert_eq!(summary.absence_days, 5);

    // Month 13 does not exist.
    let response = client
        .get(format!("/api/1/Staff/{}/summary?year=2026&month=13", staffer.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}
