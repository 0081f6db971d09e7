use rocket::http::Status;
use rocket::local::asynchronous::Client;
use serde_json::json;

use stitchline_api::models::{JobOrder, JobOrderStats};
use stitchline_api::orm::testing::test_rocket;

async fn create_order(client: &Client, company: &str, pieces: i32, rate: f64, date: &str) -> JobOrder {
    let response = client
        .post("/api/1/JobOrders")
        .json(&json!({
            "company_name": company,
            "order_date": date,
            "total_pieces": pieces,
            "rate_per_piece": rate,
            "operations": [
                { "category": "stitching", "operation_name": "side seam", "rate": 2.5, "pieces": pieces },
                { "category": "finishing", "operation_name": "ironing", "rate": 1.0, "pieces": pieces }
            ]
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    response.into_json().await.expect("valid order JSON")
}

#[rocket::async_test]
async fn test_create_derives_amount_and_statuses() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let order = create_order(&client, "Dhaka Denim", 500, 12.0, "2026-05-04").await;
    assert_eq!(order.total_amount, 6000.0);
    assert_eq!(order.payment_status, "pending");
    assert_eq!(order.job_status, "planned");

    let response = client
        .get(format!("/api/1/JobOrders/{}", order.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let detail: serde_json::Value = response.into_json().await.expect("valid detail JSON");
    assert_eq!(detail["operations"].as_array().unwrap().len(), 2);
    // 500 * 2.5 + 500 * 1.0
    assert_eq!(detail["operation_cost"], 1750.0);
    assert_eq!(detail["pending_amount"], 6000.0);
}

#[rocket::async_test]
async fn test_create_rejects_bad_quantities() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let response = client
        .post("/api/1/JobOrders")
        .json(&json!({
            "company_name": "Dhaka Denim",
            "order_date": "2026-05-04",
            "total_pieces": 0,
            "rate_per_piece": 12.0
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn test_payments_walk_statuses() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let order = create_order(&client, "Dhaka Denim", 100, 10.0, "2026-05-04").await;

    let response = client
        .post(format!("/api/1/JobOrders/{}/payments", order.id))
        .json(&json!({ "amount": 400.0, "actor": "accounts" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let order_after: JobOrder = response.into_json().await.expect("valid order JSON");
    assert_eq!(order_after.payment_status, "partial");
    assert_eq!(order_after.paid_amount, 400.0);

    let response = client
        .post(format!("/api/1/JobOrders/{}/payments", order.id))
        .json(&json!({ "amount": 600.0 }))
        .dispatch()
        .await;
    let order_after: JobOrder = response.into_json().await.expect("valid order JSON");
    assert_eq!(order_after.payment_status, "paid");
}

#[rocket::async_test]
async fn test_overpayment_and_bad_amount_rejected() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let order = create_order(&client, "Dhaka Denim", 100, 10.0, "2026-05-04").await;

    let response = client
        .post(format!("/api/1/JobOrders/{}/payments", order.id))
        .json(&json!({ "amount": 1200.0 }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Conflict);

    let response = client
        .post(format!("/api/1/JobOrders/{}/payments", order.id))
        .json(&json!({ "amount": -5.0 }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    // Neither rejection wrote anything.
    let response = client
        .get(format!("/api/1/JobOrders/{}", order.id))
        .dispatch()
        .await;
    let detail: serde_json::Value = response.into_json().await.expect("valid detail JSON");
    assert_eq!(detail["paid_amount"], 0.0);
    assert_eq!(detail["payment_status"], "pending");
}

#[rocket::async_test]
async fn test_update_recomputes_amount() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let order = create_order(&client, "Dhaka Denim", 100, 10.0, "2026-05-04").await;

    let response = client
        .put(format!("/api/1/JobOrders/{}", order.id))
        .json(&json!({ "total_pieces": 150, "job_status": "in_progress" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let updated: JobOrder = response.into_json().await.expect("valid order JSON");
    assert_eq!(updated.total_amount, 1500.0);
    assert_eq!(updated.job_status, "in_progress");

    // Unknown statuses never reach storage.
    let response = client
        .put(format!("/api/1/JobOrders/{}", order.id))
        .json(&json!({ "job_status": "paused" }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn test_stats_aggregation() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let a = create_order(&client, "A", 100, 10.0, "2026-04-10").await;
    create_order(&client, "B", 200, 5.0, "2026-05-02").await;
    create_order(&client, "C", 50, 8.0, "2026-05-20").await;

    client
        .post(format!("/api/1/JobOrders/{}/payments", a.id))
        .json(&json!({ "amount": 300.0 }))
        .dispatch()
        .await;

    let response = client.get("/api/1/JobOrders/stats").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let stats: JobOrderStats = response.into_json().await.expect("valid stats JSON");

    assert_eq!(stats.order_count, 3);
    assert_eq!(stats.total_amount, 2400.0);
    assert_eq!(stats.paid_amount, 300.0);
    assert_eq!(stats.pending_amount, stats.total_amount - stats.paid_amount);
    assert_eq!(stats.partial_count, 1);
    assert_eq!(stats.pending_count, 2);

    assert_eq!(stats.monthly.len(), 2);
    assert_eq!(stats.monthly[0].month, "2026-04");
    assert_eq!(stats.monthly[1].month, "2026-05");
    assert_eq!(stats.monthly[1].order_count, 2);
}

#[rocket::async_test]
async fn test_delete_order() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let order = create_order(&client, "Dhaka Denim", 100, 10.0, "2026-05-04").await;

    let response = client
        .delete(format!("/api/1/JobOrders/{}", order.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NoContent);

    let response = client
        .get(format!("/api/1/JobOrders/{}", order.id))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}
