// ==========================================
// 生产进度看板 - HTTP 路由
// ==========================================
// 路由:
// - GET  /health, /login.html
// - GET  /api/sync-feriados[?year=YYYY]
// - POST /api/auth/login | /api/auth/logout, GET /api/auth/session
// - GET  /（看板页面）, /api/dashboard, /api/dashboard/export.csv, /api/dashboard/filters,
//        /api/sync-feriados/runs（需会话；页面跳转登录，API 返回 401）
// 错误: ApiError → 状态码 + { "error": message, "code": CODE }
// ==========================================

use std::sync::Arc;

use axum::extract::{Query, Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::api::{ApiError, ApiResult, DashboardView, FilterOptions, LoginRequest, SyncResponse};
use crate::auth::{extract_access_token, AuthResponse, GuardDecision, LOGIN_PATH, SESSION_COOKIE};
use crate::app::state::AppState;
use crate::domain::auth::Session;
use crate::domain::holiday::SyncRun;
use crate::domain::types::Granularity;
use crate::engine::DashboardFilter;

pub type SharedState = Arc<AppState>;

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const LOGIN_HTML: &str = include_str!("../../assets/login.html");

const DEFAULT_RUNS_LIMIT: usize = 20;
const MAX_RUNS_LIMIT: usize = 200;

// ==========================================
// 错误映射
// ==========================================

pub fn status_for(err: &ApiError) -> StatusCode {
    match err {
        ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        ApiError::AuthServiceError(_) => StatusCode::BAD_GATEWAY,
        ApiError::ConfigurationError(_)
        | ApiError::ExternalServiceError(_)
        | ApiError::DatabaseError(_)
        | ApiError::DatabaseConnectionError(_)
        | ApiError::DatabaseTransactionError(_)
        | ApiError::ExportError(_)
        | ApiError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "请求处理失败");
        } else {
            tracing::debug!(code = self.code(), error = %self, "请求被拒绝");
        }
        let body = json!({ "error": self.to_string(), "code": self.code() });
        (status, Json(body)).into_response()
    }
}

// ==========================================
// 查询参数
// ==========================================

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub linea: Option<String>,
    pub sku: Option<String>,
    pub desde: Option<String>,
    pub hasta: Option<String>,
    pub granularity: Option<String>,
}

fn parse_date_param(name: &str, value: Option<&str>) -> ApiResult<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| ApiError::InvalidInput(format!("{} 日期格式错误（应为YYYY-MM-DD）: {}", name, e))),
    }
}

impl DashboardQuery {
    pub fn to_filter(&self) -> ApiResult<DashboardFilter> {
        Ok(DashboardFilter {
            linea: self.linea.clone(),
            sku: self.sku.clone(),
            desde: parse_date_param("desde", self.desde.as_deref())?,
            hasta: parse_date_param("hasta", self.hasta.as_deref())?,
        })
    }

    pub fn to_granularity(&self) -> ApiResult<Granularity> {
        match self.granularity.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(Granularity::default()),
            Some(raw) => raw.parse::<Granularity>().map_err(ApiError::InvalidInput),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SyncQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RunsQuery {
    pub limit: Option<usize>,
}

impl RunsQuery {
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_RUNS_LIMIT).clamp(1, MAX_RUNS_LIMIT)
    }
}

fn request_token(headers: &HeaderMap) -> Option<String> {
    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let cookie = headers.get(COOKIE).and_then(|v| v.to_str().ok());
    extract_access_token(authorization, cookie)
}

// ==========================================
// 中间件: 会话守卫
// ==========================================

async fn require_session(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let token = request_token(request.headers());

    match state.auth_api.authorize(&path, token.as_deref()).await {
        GuardDecision::Reveal => next.run(request).await,
        GuardDecision::RedirectToLogin if path.starts_with("/api/") => {
            ApiError::Unauthorized(path).into_response()
        }
        GuardDecision::RedirectToLogin => Redirect::temporary(LOGIN_PATH).into_response(),
    }
}

// ==========================================
// 处理函数
// ==========================================

async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn login_page() -> Html<&'static str> {
    Html(LOGIN_HTML)
}

async fn health(State(state): State<SharedState>) -> Response {
    match state.ping_db() {
        Ok(()) => Json(json!({ "status": "ok", "version": crate::VERSION })).into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "version": crate::VERSION, "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn sync_feriados(
    State(state): State<SharedState>,
    Query(query): Query<SyncQuery>,
) -> ApiResult<Json<SyncResponse>> {
    let resp = match query.year {
        Some(year) => state.sync_api.sync_year(year).await?,
        None => state.sync_api.sync_current_year().await?,
    };
    Ok(Json(resp))
}

async fn sync_runs(
    State(state): State<SharedState>,
    Query(query): Query<RunsQuery>,
) -> ApiResult<Json<Vec<SyncRun>>> {
    Ok(Json(state.sync_api.recent_runs(query.effective_limit())?))
}

fn build_controller(state: &AppState, query: &DashboardQuery) -> ApiResult<crate::api::DashboardController> {
    let filter = query.to_filter()?;
    let granularity = query.to_granularity()?;
    let mut controller = state.dashboard_controller()?;
    controller.set_filters(filter)?;
    controller.set_granularity(granularity);
    Ok(controller)
}

async fn dashboard(
    State(state): State<SharedState>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Json<DashboardView>> {
    let controller = build_controller(&state, &query)?;
    Ok(Json(controller.render()))
}

async fn export_csv(
    State(state): State<SharedState>,
    Query(query): Query<DashboardQuery>,
) -> ApiResult<Response> {
    let controller = build_controller(&state, &query)?;
    let csv = controller.export_csv()?;
    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"produccion.csv\""),
        ],
        csv,
    )
        .into_response())
}

async fn filter_options(State(state): State<SharedState>) -> ApiResult<Json<FilterOptions>> {
    let controller = state.dashboard_controller()?;
    Ok(Json(controller.filter_options()))
}

fn auth_status<T>(resp: &AuthResponse<T>) -> StatusCode {
    match resp.error.as_ref().map(|e| e.code.as_str()) {
        None => StatusCode::OK,
        Some("invalid_credentials") => StatusCode::UNAUTHORIZED,
        Some("not_configured") => StatusCode::SERVICE_UNAVAILABLE,
        Some(_) => StatusCode::BAD_GATEWAY,
    }
}

fn session_cookie(value: &str, max_age: Option<i64>) -> Option<HeaderValue> {
    let mut cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, value);
    if let Some(secs) = max_age {
        cookie.push_str(&format!("; Max-Age={}", secs));
    }
    HeaderValue::from_str(&cookie).ok()
}

async fn login(State(state): State<SharedState>, Json(req): Json<LoginRequest>) -> Response {
    let resp = state.auth_api.login(&req).await;
    let status = auth_status(&resp);
    let cookie = resp
        .data
        .as_ref()
        .and_then(|s: &Session| session_cookie(&s.access_token, None));

    let mut response = (status, Json(resp)).into_response();
    if let Some(value) = cookie {
        response.headers_mut().insert(SET_COOKIE, value);
    }
    response
}

async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let token = request_token(&headers);
    let resp = state.auth_api.logout(token.as_deref()).await;
    let status = auth_status(&resp);

    let mut response = (status, Json(resp)).into_response();
    if status == StatusCode::OK {
        if let Some(value) = session_cookie("", Some(0)) {
            response.headers_mut().insert(SET_COOKIE, value);
        }
    }
    response
}

async fn session(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let token = request_token(&headers);
    let resp = state.auth_api.session(token.as_deref()).await;
    (auth_status(&resp), Json(resp)).into_response()
}

/// 构建完整路由
pub fn router(state: SharedState) -> Router {
    let protected = Router::new()
        .route("/", get(index_page))
        .route("/api/dashboard", get(dashboard))
        .route("/api/dashboard/export.csv", get(export_csv))
        .route("/api/dashboard/filters", get(filter_options))
        .route("/api/sync-feriados/runs", get(sync_runs))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/health", get(health))
        .route(LOGIN_PATH, get(login_page))
        .route("/api/sync-feriados", get(sync_feriados))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/session", get(session))
        .merge(protected)
        .with_state(state)
}
