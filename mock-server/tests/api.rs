use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, IncentiveRow};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

async fn send(app: &mut Router, request: Request<String>) -> axum::response::Response {
    use tower::Service;

    ServiceExt::<Request<String>>::ready(app)
        .await
        .unwrap()
        .call(request)
        .await
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_employees_is_enveloped() {
    let resp = app().oneshot(empty_request("GET", "/employees")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"data": []}));
}

#[tokio::test]
async fn list_regions_is_bare() {
    let resp = app().oneshot(empty_request("GET", "/regions")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn unknown_collection_returns_404() {
    let resp = app().oneshot(empty_request("GET", "/widgets")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- create ---

#[tokio::test]
async fn create_employee_returns_201() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/employees",
            r#"{"name":"Ada","email":"ada@example.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["data"]["name"], "Ada");
    assert_eq!(body["data"]["active"], true);
    assert!(body["data"]["id"].as_str().is_some());
}

#[tokio::test]
async fn create_missing_field_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/regions", r#"{"name":"North"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn create_non_object_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/regions", "[1,2]"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get / update / delete ---

#[tokio::test]
async fn get_record_not_found() {
    let resp = app()
        .oneshot(empty_request("GET", "/employees/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_record_bad_uuid_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/employees/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_record_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PATCH",
            "/positions/00000000-0000-0000-0000-000000000000",
            r#"{"level":2}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_cannot_null_or_retype_required_fields() {
    let mut app = app();
    let resp = send(&mut app, json_request("POST", "/regions", r#"{"name":"North","code":"N"}"#)).await;
    let created: Value = body_json(resp).await;
    let id = created["id"].as_str().unwrap().to_string();

    let resp = send(&mut app, json_request("PATCH", &format!("/regions/{id}"), r#"{"code":null}"#)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = send(&mut app, json_request("PATCH", &format!("/regions/{id}"), r#"{"code":null,"name":7}"#)).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = send(&mut app, empty_request("GET", &format!("/regions/{id}"))).await;
    let fetched: Value = body_json(resp).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn delete_record_not_found() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/hurdles/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- bulk / upload ---

#[tokio::test]
async fn bulk_assign_creates_every_assignment() {
    let mut app = app();
    let resp = send(
        &mut app,
        json_request(
            "POST",
            "/store-assignments/bulk",
            r#"{"assignments":[
                {"employee_id":"00000000-0000-0000-0000-000000000001","store_code":"S-01","kind":"store"},
                {"employee_id":"00000000-0000-0000-0000-000000000001","store_code":"W-09","kind":"warehouse"}
            ]}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let resp = send(&mut app, empty_request("GET", "/store-assignments")).await;
    let listed: Vec<Value> = body_json(resp).await;
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn bulk_assign_rejects_incomplete_batch() {
    let mut app = app();
    let resp = send(
        &mut app,
        json_request(
            "POST",
            "/store-assignments/bulk",
            r#"{"assignments":[{"employee_id":"00000000-0000-0000-0000-000000000001","kind":"store"}]}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = send(&mut app, empty_request("GET", "/store-assignments")).await;
    let listed: Vec<Value> = body_json(resp).await;
    assert!(listed.is_empty());
}

#[tokio::test]
async fn upload_reports_imported_count() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/transactions/upload",
            r#"{"file_name":"sept.csv","rows":[
                {"employee_id":"00000000-0000-0000-0000-000000000001","store_code":"S-01","amount_cents":500,"occurred_on":"2026-09-01"}
            ]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = body_json(resp).await;
    assert_eq!(body, json!({"data": {"imported": 1}}));
}

// --- auth ---

#[tokio::test]
async fn refresh_token_issues_new_pair() {
    let resp = app()
        .oneshot(json_request("POST", "/auth/refresh-token", r#"{"refresh_token":"r1"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert!(body["data"]["access_token"].as_str().unwrap().starts_with("access-"));
    assert!(body["data"]["refresh_token"].as_str().unwrap().starts_with("refresh-"));
}

#[tokio::test]
async fn refresh_token_rejects_blank_token() {
    let resp = app()
        .oneshot(json_request("POST", "/auth/refresh-token", r#"{"refresh_token":" "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- reports ---

#[tokio::test]
async fn incentive_report_over_http() {
    let mut app = app();

    let resp = send(&mut app, json_request("POST", "/positions", r#"{"title":"Associate","level":1}"#)).await;
    let position: Value = body_json(resp).await;
    let position_id = position["data"]["id"].as_str().unwrap().to_string();

    let resp = send(
        &mut app,
        json_request(
            "POST",
            "/employees",
            &json!({"name": "Bea", "email": "bea@example.com", "position_id": position_id}).to_string(),
        ),
    )
    .await;
    let employee: Value = body_json(resp).await;
    let employee_id = employee["data"]["id"].as_str().unwrap().to_string();

    let hurdle = json!({"position_id": position_id, "period": "2026-09", "target_cents": 1_000, "rate_bps": 1_000});
    let resp = send(&mut app, json_request("POST", "/hurdles", &hurdle.to_string())).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let sale = json!({"employee_id": employee_id, "store_code": "S-01", "amount_cents": 2_500, "occurred_on": "2026-09-12"});
    let resp = send(&mut app, json_request("POST", "/transactions", &sale.to_string())).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = send(&mut app, empty_request("GET", "/reports/incentives?period=2026-09")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["period"], "2026-09");
    let rows: Vec<IncentiveRow> = serde_json::from_value(body["data"].clone()).unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].achieved);
    assert_eq!(rows[0].incentive_cents, 250);

    let resp = send(&mut app, empty_request("GET", "/reports/incentives/export?period=2026-09")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "text/csv");
    let csv = String::from_utf8(body_bytes(resp).await.to_vec()).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.lines().nth(1).unwrap().ends_with(",2500,1000,true,250"));
}

#[tokio::test]
async fn incentive_report_requires_period() {
    let resp = app()
        .oneshot(empty_request("GET", "/reports/incentives"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    let mut app = app();

    // create
    let resp = send(&mut app, json_request("POST", "/regions", r#"{"name":"North","code":"N"}"#)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = body_json(resp).await;
    assert_eq!(created["name"], "North");
    let id = created["id"].as_str().unwrap().to_string();

    // get
    let resp = send(&mut app, empty_request("GET", &format!("/regions/{id}"))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = body_json(resp).await;
    assert_eq!(fetched, created);

    // update: only code
    let resp = send(&mut app, json_request("PATCH", &format!("/regions/{id}"), r#"{"code":"NO"}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = body_json(resp).await;
    assert_eq!(updated["name"], "North");
    assert_eq!(updated["code"], "NO");

    // delete
    let resp = send(&mut app, empty_request("DELETE", &format!("/regions/{id}"))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // get after delete
    let resp = send(&mut app, empty_request("GET", &format!("/regions/{id}"))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // list after delete
    let resp = send(&mut app, empty_request("GET", "/regions")).await;
    let regions: Vec<Value> = body_json(resp).await;
    assert!(regions.is_empty());
}
