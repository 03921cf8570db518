// ==========================================
// HTTP 路由 集成测试
// ==========================================
// 测试范围:
// 1. /health 与 /api/sync-feriados（公开）
// 2. 看板路由的会话守卫（Bearer / cookie）
// 3. 看板 JSON、CSV 导出、筛选选项
// 4. 登录 / 会话 / 注销
// ==========================================

mod helpers;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Datelike, Local};
use serde_json::{json, Value};
use tower::ServiceExt;

use helpers::*;
use production_tracker::app::router;

fn app_with(env: &TestEnv) -> Router {
    router(env.state.clone())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, String) {
    let resp = app.oneshot(request).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn empty_env() -> TestEnv {
    TestEnv::new(Arc::new(FakeHolidaySource::returning(Vec::new())))
}

#[tokio::test]
async fn test_health() {
    let env = empty_env();
    let (status, _, body) = send(app_with(&env), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["status"], "ok");
    assert_eq!(v["version"], production_tracker::VERSION);
}

#[tokio::test]
async fn test_sync_feriados_success_body() {
    let env = TestEnv::new(Arc::new(FakeHolidaySource::returning(vec![
        ext(1, 1, "Año Nuevo"),
        ext(12, 25, "Navidad"),
    ])));

    let (status, _, body) = send(app_with(&env), get("/api/sync-feriados")).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_str(&body).unwrap();
    let year = Local::now().year();
    assert_eq!(
        v,
        json!({ "success": true, "message": format!("Synced 2 holidays for {}", year) })
    );
    assert_eq!(env.state.holiday_repo.count().unwrap(), 2);
}

#[tokio::test]
async fn test_sync_feriados_explicit_year() {
    let env = TestEnv::new(Arc::new(FakeHolidaySource::returning(vec![ext(1, 5, "Prueba")])));

    let (status, _, body) = send(app_with(&env), get("/api/sync-feriados?year=2024")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Synced 1 holidays for 2024"));
    assert!(env.state.holiday_repo.find_by_date(d(2024, 1, 5)).unwrap().is_some());
}

#[tokio::test]
async fn test_sync_feriados_failure_is_500_with_error() {
    let env = TestEnv::new(Arc::new(FakeHolidaySource::failing("Failed to fetch external API")));

    let (status, _, body) = send(app_with(&env), get("/api/sync-feriados")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["error"], "Failed to fetch external API");
}

#[tokio::test]
async fn test_dashboard_requires_session() {
    let env = empty_env();

    let (status, _, body) = send(app_with(&env), get("/api/dashboard")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("error"));

    let (status, _, _) = send(app_with(&env), get_with_token("/api/dashboard", "wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dashboard_denied_when_auth_not_configured() {
    let env = TestEnv::without_auth(Arc::new(FakeHolidaySource::returning(Vec::new())));
    let (status, _, _) = send(app_with(&env), get_with_token("/api/dashboard", VALID_TOKEN)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dashboard_view_with_filters() {
    let env = empty_env();
    seed_days(&env.state.production_repo, "L1", "SKU-A", d(2024, 3, 1), 3, 100.0, 90.0);
    seed_days(&env.state.production_repo, "L2", "SKU-B", d(2024, 3, 1), 3, 50.0, 50.0);

    let (status, _, body) = send(
        app_with(&env),
        get_with_token("/api/dashboard?linea=L1&granularity=month", VALID_TOKEN),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["granularity"], "month");
    assert_eq!(v["row_count"], 3);
    assert_eq!(v["series"]["labels"], json!(["mar"]));
    assert_eq!(v["series"]["plan_acumulado"], json!([300.0]));
    assert_eq!(v["charts"]["curve"]["kind"], "line");
    assert_eq!(v["charts"]["bar"]["datasets"][0]["backgroundColor"], "#84cc16");
    assert_eq!(v["kpis"]["delay_status"], "ON_TRACK");
}

#[tokio::test]
async fn test_dashboard_rejects_bad_query() {
    let env = empty_env();

    let (status, _, _) = send(
        app_with(&env),
        get_with_token("/api/dashboard?granularity=year", VALID_TOKEN),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = send(
        app_with(&env),
        get_with_token("/api/dashboard?desde=2024-03-10&hasta=2024-03-01", VALID_TOKEN),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_export_csv_with_cookie_session() {
    let env = empty_env();
    seed_days(&env.state.production_repo, "L1", "SKU-A", d(2024, 3, 1), 2, 10.0, 8.0);

    let request = Request::builder()
        .uri("/api/dashboard/export.csv?sku=sku-a")
        .header(header::COOKIE, format!("theme=dark; sb-access-token={}", VALID_TOKEN))
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(app_with(&env), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "fecha,linea,id_sku,plan_dia,real_dia,plan_acumulado,real_acumulado,dias_atraso,ritmo_promedio"
    );
    assert!(lines[2].starts_with("2024-03-02,L1,SKU-A"));
}

#[tokio::test]
async fn test_filter_options() {
    let env = empty_env();
    seed_days(&env.state.production_repo, "L2", "SKU-B", d(2024, 3, 1), 1, 1.0, 1.0);
    seed_days(&env.state.production_repo, "L1", "SKU-A", d(2024, 3, 1), 1, 1.0, 1.0);

    let (status, _, body) =
        send(app_with(&env), get_with_token("/api/dashboard/filters", VALID_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v, json!({ "lineas": ["L1", "L2"], "skus": ["SKU-A", "SKU-B"] }));
}

#[tokio::test]
async fn test_login_session_logout_flow() {
    let env = empty_env();

    let login = |password: &str| {
        Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "email": TEST_EMAIL, "password": password }).to_string(),
            ))
            .unwrap()
    };

    let (status, _, body) = send(app_with(&env), login("wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let v: Value = serde_json::from_str(&body).unwrap();
    assert!(v["data"].is_null());
    assert_eq!(v["error"]["code"], "invalid_credentials");

    let (status, headers, body) = send(app_with(&env), login(TEST_PASSWORD)).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["data"]["user"]["email"], TEST_EMAIL);
    assert!(v["error"].is_null());
    let cookie = headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with(&format!("sb-access-token={}", VALID_TOKEN)));

    let (status, _, body) = send(app_with(&env), get_with_token("/api/auth/session", VALID_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(v["data"]["access_token"], VALID_TOKEN);

    let (status, _, body) = send(app_with(&env), get("/api/auth/session")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({ "data": null, "error": null }));

    let logout = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(header::AUTHORIZATION, format!("Bearer {}", VALID_TOKEN))
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(app_with(&env), logout).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::SET_COOKIE].to_str().unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn test_index_redirects_to_login_without_session() {
    let env = empty_env();

    let (status, headers, _) = send(app_with(&env), get("/")).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/login.html");

    let (status, headers, _) = send(app_with(&env), get_with_token("/", "expired-or-bogus")).await;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(headers.get(header::LOCATION).unwrap(), "/login.html");
}

#[tokio::test]
async fn test_index_served_with_session_and_login_page_public() {
    let env = empty_env();

    let (status, headers, body) = send(app_with(&env), get_with_token("/", VALID_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
    assert!(body.contains("/api/dashboard"));

    let (status, _, body) = send(app_with(&env), get("/login.html")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/api/auth/login"));
}

#[tokio::test]
async fn test_sync_runs_listed_newest_first() {
    let env = TestEnv::new(Arc::new(FakeHolidaySource::returning(vec![ext(1, 1, "Año Nuevo")])));

    let (status, _, _) = send(app_with(&env), get("/api/sync-feriados?year=2023")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(app_with(&env), get("/api/sync-feriados?year=2024")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = send(app_with(&env), get("/api/sync-feriados/runs")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, body) = send(
        app_with(&env),
        get_with_token("/api/sync-feriados/runs?limit=1", VALID_TOKEN),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let runs: Value = serde_json::from_str(&body).unwrap();
    let runs = runs.as_array().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["year"], 2024);
    assert_eq!(runs[0]["success"], true);
    assert_eq!(runs[0]["message"], "Synced 1 holidays for 2024");
}
