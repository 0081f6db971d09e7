use rocket::http::Status;
use rocket::local::asynchronous::Client;
use serde_json::json;

use stitchline_api::orm::testing::test_rocket;

#[rocket::async_test]
async fn test_plan_marker_layout() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    let response = client
        .post("/api/1/Marker/plan")
        .json(&json!({
            "sheet_width": 60.0,
            "pieces": [
                { "label": "front panel", "width": 25.0, "length": 30.0, "count": 4 },
                { "label": "pocket", "width": 8.0, "length": 9.0, "count": 8 }
            ]
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let layout: serde_json::Value = response.into_json().await.expect("valid layout JSON");

    assert_eq!(layout["placements"].as_array().unwrap().len(), 12);
    // First piece always sits at the origin.
    assert_eq!(layout["placements"][0]["x"], 0.0);
    assert_eq!(layout["placements"][0]["y"], 0.0);

    let efficiency = layout["efficiency"].as_f64().unwrap();
    assert!(efficiency > 0.0 && efficiency <= 1.0);

    let piece_area = layout["piece_area"].as_f64().unwrap();
    let marker_area = layout["marker_area"].as_f64().unwrap();
    assert!((efficiency - piece_area / marker_area).abs() < 1e-9);
}

#[rocket::async_test]
async fn test_plan_marker_rejects_bad_input() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    // Piece wider than the sheet.
    let response = client
        .post("/api/1/Marker/plan")
        .json(&json!({
            "sheet_width": 20.0,
            "pieces": [
                { "label": "back panel", "width": 25.0, "length": 30.0, "count": 1 }
            ]
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    // Empty piece list.
    let response = client
        .post("/api/1/Marker/plan")
        .json(&json!({ "sheet_width": 60.0, "pieces": [] }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    // Non-positive sheet width.
    let response = client
        .post("/api/1/Marker/plan")
        .json(&json!({
            "sheet_width": 0.0,
            "pieces": [
                { "label": "pocket", "width": 8.0, "length": 9.0, "count": 1 }
            ]
        }))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn test_plan_marker_honors_sheet_length() {
    let client = Client::tracked(test_rocket()).await.expect("valid rocket instance");

    // Two 25-long rows fit a 50-long sheet exactly.
    let body = json!({
        "sheet_width": 50.0,
        "sheet_length": 50.0,
        "pieces": [
            { "label": "back", "width": 20.0, "length": 25.0, "count": 3 }
        ]
    });
    let response = client.post("/api/1/Marker/plan").json(&body).dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let layout: serde_json::Value = response.into_json().await.expect("valid layout JSON");
    assert_eq!(layout["used_length"], 50.0);

    // The same pieces overrun a 40-long sheet.
    let body = json!({
        "sheet_width": 50.0,
        "sheet_length": 40.0,
        "pieces": [
            { "label": "back", "width": 20.0, "length": 25.0, "count": 3 }
        ]
    });
    let response = client.post("/api/1/Marker/plan").json(&body).dispatch().await;
    assert_eq!(response.status(), Status::BadRequest);
}
