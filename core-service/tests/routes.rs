use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use chrono::{Duration, Utc};
use core_auth::{AccessToken, AuthError, TokenProvider};
use core_runtime::config::GraphSettings;
use core_service::{router, AppState};
use http_body_util::BodyExt;
use mockall::mock;
use serde_json::{json, Value};
use tower::ServiceExt;

const DRIVE_ROOT: &str = "https://graph.test/v1.0/users/ops/drive";
const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

mock! {
    HttpClient {}

    #[async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

struct StaticToken;

#[async_trait]
impl TokenProvider for StaticToken {
    async fn acquire(&self) -> core_auth::Result<AccessToken> {
        Ok(AccessToken::new("test-token", Utc::now() + Duration::hours(1)))
    }
}

struct RejectedToken;

#[async_trait]
impl TokenProvider for RejectedToken {
    async fn acquire(&self) -> core_auth::Result<AccessToken> {
        Err(AuthError::TokenRejected(
            r#"{"error":"invalid_client"}"#.to_string(),
        ))
    }
}

fn graph_settings(default_workbook: Option<&str>) -> GraphSettings {
    GraphSettings {
        api_root: "https://graph.test".to_string(),
        drive_root: Some(DRIVE_ROOT.to_string()),
        default_workbook: default_workbook.map(str::to_string),
        default_sheet: "Sheet1".to_string(),
    }
}

fn app(http: MockHttpClient) -> Router {
    app_with(http, Arc::new(StaticToken), Some("01WORKBOOK"))
}

fn app_with(
    http: MockHttpClient,
    tokens: Arc<dyn TokenProvider>,
    default_workbook: Option<&str>,
) -> Router {
    router(AppState::new(
        tokens,
        Arc::new(http),
        graph_settings(default_workbook),
    ))
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn update_range_returns_patch_acknowledgement() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .withf(|request| {
            request.method == HttpMethod::Patch
                && request.url
                    == format!(
                        "{}/items/01WORKBOOK/workbook/worksheets/Sheet1/range(address='A2:A3')",
                        DRIVE_ROOT
                    )
                && request.headers.get("Authorization").map(String::as_str)
                    == Some("Bearer test-token")
        })
        .returning(|_| {
            Ok(HttpResponse::new(
                200,
                json!({
                    "address": "Sheet1!A2:A3",
                    "values": [["Hello World"], ["How are you?"]]
                })
                .to_string(),
            ))
        });

    let (status, body) = call(
        app(http),
        post_json(
            "/api/update-range",
            r#"{"range": "A2:A3", "values": [["Hello World"], ["How are you?"]]}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["address"], "Sheet1!A2:A3");
}

#[tokio::test]
async fn update_range_without_range_is_rejected() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(0);

    let (status, body) = call(
        app(http),
        post_json("/api/update-range", r#"{"values": [["x"]]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "Invalid request: range and values are required."
    );
}

#[tokio::test]
async fn update_range_with_malformed_json_is_rejected() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(0);

    let (status, body) = call(app(http), post_json("/api/update-range", "{range:")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "Invalid request: request body must be valid JSON."
    );
}

#[tokio::test]
async fn update_range_with_blank_range_is_rejected() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(0);

    let (status, body) = call(
        app(http),
        post_json("/api/update-range", r#"{"range": "   ", "values": [["x"]]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "Invalid request: range and values are required."
    );
}

#[tokio::test]
async fn update_range_with_numeric_file_id_is_rejected() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(0);

    let (status, body) = call(
        app(http),
        post_json(
            "/api/update-range",
            r#"{"range": "A1", "values": [[1]], "fileId": 5}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "Invalid request: fileId is required."
    );
}

#[tokio::test]
async fn update_range_with_non_string_sheet_uses_default() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .withf(|request| {
            request.url.ends_with(
                "/items/01WORKBOOK/workbook/worksheets/Sheet1/range(address='A1')",
            )
        })
        .returning(|_| Ok(HttpResponse::new(200, r#"{"address":"Sheet1!A1"}"#)));

    let (status, _) = call(
        app(http),
        post_json(
            "/api/update-range",
            r#"{"range": "A1", "values": [[1]], "sheet": []}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn update_range_needs_a_file_when_no_default() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(0);

    let app = app_with(http, Arc::new(StaticToken), None);
    let (status, body) = call(
        app,
        post_json("/api/update-range", r#"{"range": "A1", "values": [[1]]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "Invalid request: fileId is required."
    );
}

#[tokio::test]
async fn update_range_error_payload_is_500() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(1).returning(|_| {
        Ok(HttpResponse::new(
            200,
            r#"{"error":{"code":"InvalidArgument","message":"bad range"}}"#,
        ))
    });

    let (status, body) = call(
        app(http),
        post_json(
            "/api/update-range",
            r#"{"range": "ZZ", "values": [[1]], "fileId": "01OTHER", "sheet": "Data"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "Failed to update excel sheet: InvalidArgument: bad range"
    );
}

#[tokio::test]
async fn get_range_reads_query_parameters() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .withf(|request| {
            request.method == HttpMethod::Get
                && request
                    .url
                    .ends_with("/items/01ABC/workbook/worksheets/Budget/range(address='B1:B2')")
        })
        .returning(|_| {
            Ok(HttpResponse::new(
                200,
                r#"{"address":"Budget!B1:B2","rowCount":2,"values":[[1],[2]]}"#,
            ))
        });

    let (status, body) = call(
        app(http),
        get("/api/get-range?fileId=01ABC&range=B1:B2&sheet=Budget"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["values"], json!([[1], [2]]));
    assert_eq!(body["rowCount"], 2);
}

#[tokio::test]
async fn get_range_falls_back_to_body() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .withf(|request| request.url.contains("/items/01BODY/workbook/worksheets/Sheet1/"))
        .returning(|_| Ok(HttpResponse::new(200, r#"{"values":[["a"]]}"#)));

    let request = Request::builder()
        .method("GET")
        .uri("/api/get-range")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"fileId": "01BODY", "range": "A1"}"#))
        .unwrap();
    let (status, _) = call(app(http), request).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn get_range_without_file_is_rejected() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(0);

    let (status, body) = call(app(http), get("/api/get-range?range=A1")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "Invalid request: fileId and range are required."
    );
}

#[tokio::test]
async fn get_range_with_malformed_body_and_no_query_is_rejected() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(0);

    let request = Request::builder()
        .method("GET")
        .uri("/api/get-range")
        .header("content-type", "application/json")
        .body(Body::from("{fileId:"))
        .unwrap();
    let (status, body) = call(app(http), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "Invalid request: request body must be valid JSON."
    );
}

#[tokio::test]
async fn get_range_with_blank_file_id_is_rejected() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(0);

    let (status, body) = call(app(http), get("/api/get-range?fileId=%20%20&range=A1")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "Invalid request: fileId and range are required."
    );
}

#[tokio::test]
async fn get_range_ignores_non_string_body_fields() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(0);

    let request = Request::builder()
        .method("GET")
        .uri("/api/get-range")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"fileId": 7, "range": "A1"}"#))
        .unwrap();
    let (status, body) = call(app(http), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        "Invalid request: fileId and range are required."
    );
}

#[tokio::test]
async fn get_range_fills_query_gaps_from_body() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .withf(|request| {
            request
                .url
                .ends_with("/items/01BODY/workbook/worksheets/Sheet1/range(address='A1')")
        })
        .returning(|_| Ok(HttpResponse::new(200, r#"{"values":[["a"]]}"#)));

    let request = Request::builder()
        .method("GET")
        .uri("/api/get-range?fileId=&range=A1&range=B2")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"fileId": "01BODY", "range": "C3"}"#))
        .unwrap();
    let (status, _) = call(app(http), request).await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn get_range_remote_failure_is_500() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .returning(|_| Ok(HttpResponse::new(404, r#"{"error":{"code":"ItemNotFound"}}"#)));

    let (status, body) = call(app(http), get("/api/get-range?fileId=gone&range=A1")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(String::from_utf8(body).unwrap().contains("status 404"));
}

#[tokio::test]
async fn list_root_items_returns_names() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .withf(|request| request.url == format!("{}/root/children", DRIVE_ROOT))
        .returning(|_| {
            Ok(HttpResponse::new(
                200,
                json!({"value": [
                    {"id": "1", "name": "Reports", "folder": {}},
                    {"id": "2", "name": "Budget.xlsx", "file": {"mimeType": XLSX}}
                ]})
                .to_string(),
            ))
        });

    let (status, body) = call(app(http), get("/api/list-root-items")).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<String> = serde_json::from_slice(&body).unwrap();
    assert_eq!(names, vec!["Reports", "Budget.xlsx"]);
}

#[tokio::test]
async fn list_spreadsheet_files_returns_name_and_id() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(1).returning(|_| {
        Ok(HttpResponse::new(
            200,
            json!({"value": [
                {"id": "a", "name": "Budget.xlsx", "file": {"mimeType": XLSX}},
                {"id": "b", "name": "report.xlsx", "file": {"mimeType": "text/plain"}}
            ]})
            .to_string(),
        ))
    });

    let (status, body) = call(app(http), get("/api/list-spreadsheet-files")).await;

    assert_eq!(status, StatusCode::OK);
    let files: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(files, json!([{"name": "Budget.xlsx", "id": "a"}]));
}

#[tokio::test]
async fn get_drive_info_echoes_metadata() {
    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .withf(|request| request.url == DRIVE_ROOT)
        .returning(|_| Ok(HttpResponse::new(200, r#"{"id":"b!1","driveType":"business"}"#)));

    let (status, body) = call(app(http), get("/api/get-drive-info")).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["driveType"], "business");
}

#[tokio::test]
async fn token_failure_is_500_with_payload() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(0);

    let app = app_with(http, Arc::new(RejectedToken), Some("01WORKBOOK"));
    let (status, body) = call(app, get("/api/list-root-items")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        String::from_utf8(body).unwrap(),
        r#"Error acquiring token: {"error":"invalid_client"}"#
    );
}

#[tokio::test]
async fn health_needs_no_downstream() {
    let mut http = MockHttpClient::new();
    http.expect_execute().times(0);

    let app = app_with(http, Arc::new(RejectedToken), None);
    let (status, body) = call(app, get("/api/health")).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}
