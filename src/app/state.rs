// ==========================================
// 生产进度看板 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// 说明: 所有仓储共享一个 SQLite 连接；看板控制器按请求创建
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{ApiError, ApiResult, AuthApi, DashboardController, SyncApi};
use crate::auth::{AuthProvider, SupabaseAuthClient};
use crate::config::{AppConfig, ConfigManager, DEFAULT_DELAY_TOLERANCE_DAYS};
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::engine::KpiCalculator;
use crate::i18n;
use crate::repository::{HolidayRepository, ProductionRepository, SyncRunRepository};
use crate::sync::{HolidaySource, HolidaySyncJob, HttpHolidaySource};

/// 应用状态
pub struct AppState {
    pub config: AppConfig,

    /// 共享数据库连接
    pub conn: Arc<Mutex<Connection>>,

    pub production_repo: Arc<ProductionRepository>,
    pub holiday_repo: Arc<HolidayRepository>,
    pub sync_run_repo: Arc<SyncRunRepository>,
    pub config_manager: Arc<ConfigManager>,

    /// 节假日同步任务（HTTP 与定时器共用）
    pub sync_job: Arc<HolidaySyncJob>,
    pub sync_api: Arc<SyncApi>,
    pub auth_api: Arc<AuthApi>,
}

impl AppState {
    /// 按进程配置初始化（真实数据源与认证服务）
    pub fn new(config: AppConfig) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", config.database_path);

        let conn = open_sqlite_connection(&config.database_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("数据库结构初始化失败: {}", e))?;

        let source: Arc<dyn HolidaySource> = Arc::new(
            HttpHolidaySource::new(&config.holiday_api_url, config.locale.clone())
                .map_err(|e| format!("无法创建节假日数据源: {}", e))?,
        );

        let auth: Option<Arc<dyn AuthProvider>> = match &config.auth {
            Some(auth_config) => Some(Arc::new(
                SupabaseAuthClient::new(auth_config)
                    .map_err(|e| format!("无法创建认证客户端: {}", e))?,
            )),
            None => {
                tracing::warn!("未配置 SUPABASE_URL / SUPABASE_ANON_KEY，受保护路由将全部拒绝");
                None
            }
        };

        let state = Self::with_components(config, Arc::new(Mutex::new(conn)), source, auth)?;
        tracing::info!("AppState初始化完成");
        Ok(state)
    }

    /// 使用给定的连接、数据源与认证服务组装（测试可注入替身）
    pub fn with_components(
        config: AppConfig,
        conn: Arc<Mutex<Connection>>,
        source: Arc<dyn HolidaySource>,
        auth: Option<Arc<dyn AuthProvider>>,
    ) -> Result<Self, String> {
        let production_repo = Arc::new(ProductionRepository::new(conn.clone()));
        let holiday_repo = Arc::new(HolidayRepository::new(conn.clone()));
        let sync_run_repo = Arc::new(SyncRunRepository::new(conn.clone()));
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        let sync_job = Arc::new(HolidaySyncJob::new(
            source,
            holiday_repo.clone(),
            sync_run_repo.clone(),
        ));
        let sync_api = Arc::new(SyncApi::new(
            sync_job.clone(),
            sync_run_repo.clone(),
            config.locale.clone(),
        ));
        let auth_api = Arc::new(AuthApi::new(auth));

        Ok(Self {
            config,
            conn,
            production_repo,
            holiday_repo,
            sync_run_repo,
            config_manager,
            sync_job,
            sync_api,
            auth_api,
        })
    }

    /// 看板语言: config_kv 优先，其次进程配置
    pub fn dashboard_locale(&self) -> String {
        match self.config_manager.get_dashboard_locale() {
            Ok(Some(locale)) if i18n::is_supported(&locale) => locale,
            Ok(Some(locale)) => {
                tracing::warn!("不支持的看板语言 {}，使用 {}", locale, self.config.locale);
                self.config.locale.clone()
            }
            Ok(None) => self.config.locale.clone(),
            Err(e) => {
                tracing::warn!("读取看板语言失败，使用默认值: {}", e);
                self.config.locale.clone()
            }
        }
    }

    /// 为单次请求创建看板控制器（已加载数据）
    pub fn dashboard_controller(&self) -> ApiResult<DashboardController> {
        let tolerance = self
            .config_manager
            .get_delay_tolerance_days()
            .unwrap_or_else(|e| {
                tracing::warn!("读取延误容差失败，使用默认值: {}", e);
                DEFAULT_DELAY_TOLERANCE_DAYS
            });
        let locale = self.dashboard_locale();

        let mut controller = DashboardController::new(
            self.production_repo.clone(),
            KpiCalculator::new(tolerance, locale.clone()),
            locale,
        );
        controller.load()?;
        Ok(controller)
    }

    /// 连接健康检查
    pub fn ping_db(&self) -> ApiResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", e)))?;
        conn.query_row("SELECT 1", [], |_| Ok(()))
            .map_err(|e| ApiError::DatabaseError(e.to_string()))
    }
}
