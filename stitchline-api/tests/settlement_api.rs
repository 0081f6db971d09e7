use rocket::http::Status;
use rocket::local::asynchronous::Client;
use serde_json::json;

use stitchline_api::models::{EmployeeContact, ProductionRun, Settlement, SettlementPreview};
use stitchline_api::orm::testing::test_rocket;

/// A worker with three entries: two inside the 2026-06-08 week at 40 and 25
/// pieces, one after it at 30.
async fn seed_worker_with_entries(client: &Client) -> (i32, i32) {
    let response = client
        .post("/api/1/Contacts")
        .json(&json!({
            "name": "Joynal",
            "phone": "01911-000000",
            "department": "sewing",
            "salary": 0.0,
            "join_date": "2025-01-06"
        }))
        .dispatch()
        .await;
    let worker: EmployeeContact = response.into_json().await.expect("valid contact JSON");

    let response = client
        .post("/api/1/ProductionRuns")
        .json(&json!({
            "product_name": "Cargo Pants",
            "target_quantity": 500,
            "cut_quantity": 500,
            "start_date": "2026-06-01"
        }))
        .dispatch()
        .await;
    let run: ProductionRun = response.into_json().await.expect("valid run JSON");

    for (date, qty) in [("2026-06-08", 40), ("2026-06-10", 25), ("2026-06-15", 30)] {
        let response = client
            .post(format!("/api/1/ProductionRuns/{}/entries", run.id))
            .json(&json!({
                "worker_contact_id": worker.id,
                "entry_date": date,
                "quantity_completed": qty,
                "piece_rate": 4.0
            }))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);
    }

    (worker.id, run.id)
}

fn week_body(worker_id: i32, deductions: f64) -> serde_json::Value {
    json!({
        "worker_contact_id": worker_id,
        "week_start": "2026-06-08",
        "week_end": "2026-06-14",
        "deductions": deductions,
        "actor": "payroll"
    })
}

#[rocket::async_test]
async fn test_preview_computes_without_writing() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let (worker_id, _) = seed_worker_with_entries(&client).await;

    let response = client
        .post("/api/1/Settlements/preview")
        .json(&week_body(worker_id, 50.0))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let preview: SettlementPreview = response.into_json().await.expect("valid preview JSON");
    // (40 + 25) * 4.0
    assert_eq!(preview.gross_pay, 260.0);
    assert_eq!(preview.net_pay, 210.0);
    assert_eq!(preview.entry_count, 2);

    // Previewing wrote no settlement.
    let response = client.get("/api/1/Settlements").dispatch().await;
    let page: serde_json::Value = response.into_json().await.expect("valid page JSON");
    assert_eq!(page["total"], 0);
}

#[rocket::async_test]
async fn test_create_marks_entries_settled_once() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let (worker_id, run_id) = seed_worker_with_entries(&client).await;

    let response = client
        .post("/api/1/Settlements")
        .json(&week_body(worker_id, 0.0))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let settlement: Settlement = response.into_json().await.expect("valid settlement JSON");
    assert_eq!(settlement.gross_pay, 260.0);
    assert_eq!(settlement.net_pay, 260.0);
    assert_eq!(settlement.entry_count, 2);

    // The entry outside the week stays unsettled.
    let response = client
        .get(format!("/api/1/ProductionRuns/{}/entries", run_id))
        .dispatch()
        .await;
    let entries: serde_json::Value = response.into_json().await.expect("valid entries JSON");
    let settled: Vec<bool> = entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["settled"].as_bool().unwrap())
        .collect();
    assert_eq!(settled, vec![true, true, false]);

    // The same week cannot be settled twice.
    let response = client
        .post("/api/1/Settlements")
        .json(&week_body(worker_id, 0.0))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);
}

#[rocket::async_test]
async fn test_create_rejects_excess_deductions() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let (worker_id, run_id) = seed_worker_with_entries(&client).await;

    let response = client
        .post("/api/1/Settlements")
        .json(&week_body(worker_id, 500.0))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);

    // Rejection left every entry unsettled.
    let response = client
        .get(format!("/api/1/ProductionRuns/{}/entries", run_id))
        .dispatch()
        .await;
    let entries: serde_json::Value = response.into_json().await.expect("valid entries JSON");
    assert!(entries
        .as_array()
        .unwrap()
        .iter()
        .all(|e| !e["settled"].as_bool().unwrap()));
}

#[rocket::async_test]
async fn test_invalid_week_and_unknown_worker() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let (worker_id, _) = seed_worker_with_entries(&client).await;

    let response = client
        .post("/api/1/Settlements/preview")
        .json(&json!({
            "worker_contact_id": worker_id,
            "week_start": "2026-06-08",
            "week_end": "2026-06-01",
            "deductions": 0.0
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    let response = client
        .post("/api/1/Settlements")
        .json(&week_body(9999, 0.0))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn test_list_filters_by_worker() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");
    let (worker_id, _) = seed_worker_with_entries(&client).await;

    client
        .post("/api/1/Settlements")
        .json(&week_body(worker_id, 0.0))
        .dispatch()
        .await;

    let response = client
        .get(format!("/api/1/Settlements?worker={}", worker_id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let page: serde_json::Value = response.into_json().await.expect("valid page JSON");
    assert_eq!(page["total"], 1);
    let settlement_id = page["items"][0]["id"].as_i64().unwrap();

    let response = client.get("/api/1/Settlements?worker=9999").dispatch().await;
    let page: serde_json::Value = response.into_json().await.expect("valid page JSON");
    assert_eq!(page["total"], 0);

    let response = client
        .get(format!("/api/1/Settlements/{}", settlement_id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let settlement: Settlement = response.into_json().await.expect("valid settlement JSON");
    assert_eq!(settlement.worker_contact_id, worker_id);
}
