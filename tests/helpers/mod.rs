// ==========================================
// 集成测试辅助工具
// ==========================================
// 职责: 临时数据库、测试替身（节假日数据源、认证服务）、AppState 组装
// ==========================================

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::Connection;
use tempfile::NamedTempFile;

use production_tracker::app::AppState;
use production_tracker::auth::{AuthError, AuthProvider, AuthResponse};
use production_tracker::config::{env_keys, AppConfig};
use production_tracker::db::{ensure_schema, open_sqlite_connection};
use production_tracker::domain::auth::{AuthUser, Session};
use production_tracker::domain::holiday::ExternalHoliday;
use production_tracker::logging;
use production_tracker::repository::ProductionRepository;
use production_tracker::sync::{HolidaySource, SyncError};

pub const VALID_TOKEN: &str = "valid-token";
pub const TEST_EMAIL: &str = "ops@example.com";
pub const TEST_PASSWORD: &str = "correct-horse";

/// 创建临时数据库并初始化 schema
///
/// NamedTempFile 需要在测试期间保持存活
pub fn create_test_db() -> (NamedTempFile, Arc<Mutex<Connection>>) {
    logging::init_test();
    let temp_file = NamedTempFile::new().expect("创建临时文件失败");
    let conn = open_sqlite_connection(temp_file.path().to_str().unwrap()).expect("打开数据库失败");
    ensure_schema(&conn).expect("初始化 schema 失败");
    (temp_file, Arc::new(Mutex::new(conn)))
}

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn ext(mes: u32, dia: u32, motivo: &str) -> ExternalHoliday {
    ExternalHoliday {
        motivo: motivo.to_string(),
        tipo: "inamovible".to_string(),
        dia,
        mes,
        id: None,
    }
}

/// 写入连续若干天的生产数据
pub fn seed_days(
    repo: &ProductionRepository,
    linea: &str,
    sku: &str,
    from: NaiveDate,
    days: u32,
    plan_dia: f64,
    real_dia: f64,
) {
    for i in 0..days {
        let fecha = from + chrono::Duration::days(i as i64);
        repo.upsert_daily(fecha, linea, sku, plan_dia, real_dia)
            .expect("写入生产数据失败");
    }
}

// ==========================================
// 节假日数据源替身
// ==========================================

pub struct FakeHolidaySource {
    items: Mutex<Vec<ExternalHoliday>>,
    fail_with: Option<String>,
    pub calls: AtomicUsize,
}

impl FakeHolidaySource {
    pub fn returning(items: Vec<ExternalHoliday>) -> Self {
        Self {
            items: Mutex::new(items),
            fail_with: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_items(&self, items: Vec<ExternalHoliday>) {
        *self.items.lock().unwrap() = items;
    }
}

#[async_trait]
impl HolidaySource for FakeHolidaySource {
    async fn fetch_year(&self, _year: i32) -> Result<Vec<ExternalHoliday>, SyncError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(msg) => Err(SyncError::Fetch(msg.clone())),
            None => Ok(self.items.lock().unwrap().clone()),
        }
    }
}

// ==========================================
// 认证服务替身
// ==========================================

pub struct FakeAuthProvider;

fn test_session() -> Session {
    Session {
        access_token: VALID_TOKEN.to_string(),
        refresh_token: Some("refresh".to_string()),
        expires_at: None,
        user: AuthUser {
            id: "user-1".to_string(),
            email: Some(TEST_EMAIL.to_string()),
        },
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> AuthResponse<Session> {
        if email == TEST_EMAIL && password == TEST_PASSWORD {
            AuthResponse::ok(test_session())
        } else {
            AuthResponse::err(AuthError::InvalidCredentials("Invalid login credentials".to_string()))
        }
    }

    async fn get_session(&self, access_token: &str) -> AuthResponse<Session> {
        if access_token == VALID_TOKEN {
            AuthResponse::ok(test_session())
        } else {
            AuthResponse::empty()
        }
    }

    async fn sign_out(&self, _access_token: &str) -> AuthResponse<()> {
        AuthResponse::ok(())
    }
}

// ==========================================
// AppState 组装
// ==========================================

pub struct TestEnv {
    pub _db_file: NamedTempFile,
    pub state: Arc<AppState>,
}

impl TestEnv {
    pub fn new(source: Arc<dyn HolidaySource>) -> Self {
        Self::build(source, Some(Arc::new(FakeAuthProvider)))
    }

    pub fn without_auth(source: Arc<dyn HolidaySource>) -> Self {
        Self::build(source, None)
    }

    fn build(source: Arc<dyn HolidaySource>, auth: Option<Arc<dyn AuthProvider>>) -> Self {
        let (db_file, conn) = create_test_db();
        let db_path = db_file.path().to_str().unwrap().to_string();
        let config = AppConfig::from_lookup(|key| {
            if key == env_keys::DATABASE_PATH {
                Some(db_path.clone())
            } else {
                None
            }
        })
        .expect("测试配置无效");

        let state = AppState::with_components(config, conn, source, auth).expect("AppState 组装失败");
        Self {
            _db_file: db_file,
            state: Arc::new(state),
        }
    }
}
