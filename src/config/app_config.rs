// ==========================================
// 生产进度看板 - 进程级配置（环境变量）
// ==========================================
// 职责: 启动时读取环境变量，缺失的必填项返回配置错误
// 说明: 运行期可调参数放在 config_kv（见 ConfigManager）
// ==========================================

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub mod env_keys {
    pub const DATABASE_PATH: &str = "DATABASE_PATH";
    pub const BIND_ADDR: &str = "BIND_ADDR";
    pub const HOLIDAY_API_URL: &str = "HOLIDAY_API_URL";
    pub const SUPABASE_URL: &str = "SUPABASE_URL";
    pub const SUPABASE_ANON_KEY: &str = "SUPABASE_ANON_KEY";
    pub const SYNC_CRON: &str = "SYNC_CRON";
    pub const APP_LOCALE: &str = "APP_LOCALE";
}

pub const DEFAULT_HOLIDAY_API_URL: &str = "https://nolaborables.com.ar/api/v2/feriados";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_LOCALE: &str = "es-AR";

/// 配置错误（与运行期错误区分）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("缺少配置项: {0}")]
    Missing(&'static str),

    #[error("配置项格式错误 (key={key}): {message}")]
    Invalid { key: &'static str, message: String },
}

/// 认证服务配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub url: String,
    pub anon_key: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: String,
    pub bind_addr: SocketAddr,
    pub holiday_api_url: String,
    /// 未配置时，受保护路由一律拒绝
    pub auth: Option<AuthConfig>,
    pub sync_cron: Option<String>,
    pub locale: String,
}

impl AppConfig {
    /// 从进程环境变量加载
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载（便于测试）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_path = get(env_keys::DATABASE_PATH).unwrap_or_else(get_default_db_path);

        let bind_raw = get(env_keys::BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            key: env_keys::BIND_ADDR,
            message: e.to_string(),
        })?;

        let holiday_api_url = get(env_keys::HOLIDAY_API_URL)
            .unwrap_or_else(|| DEFAULT_HOLIDAY_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        // URL 与 KEY 必须成对出现
        let auth = match (get(env_keys::SUPABASE_URL), get(env_keys::SUPABASE_ANON_KEY)) {
            (Some(url), Some(anon_key)) => Some(AuthConfig {
                url: url.trim_end_matches('/').to_string(),
                anon_key,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(env_keys::SUPABASE_ANON_KEY)),
            (None, Some(_)) => return Err(ConfigError::Missing(env_keys::SUPABASE_URL)),
        };

        let sync_cron = get(env_keys::SYNC_CRON);
        if let Some(expr) = &sync_cron {
            crate::sync::scheduler::parse_schedule(expr).map_err(|e| ConfigError::Invalid {
                key: env_keys::SYNC_CRON,
                message: e,
            })?;
        }

        let locale = get(env_keys::APP_LOCALE).unwrap_or_else(|| DEFAULT_LOCALE.to_string());

        Ok(Self {
            database_path,
            bind_addr,
            holiday_api_url,
            auth,
            sync_cron,
            locale,
        })
    }

    /// 认证配置（受保护路由必需）
    pub fn require_auth(&self) -> Result<&AuthConfig, ConfigError> {
        self.auth.as_ref().ok_or(ConfigError::Missing(env_keys::SUPABASE_URL))
    }
}

/// 默认数据库路径：<用户数据目录>/production-tracker/production_tracker.db
pub fn get_default_db_path() -> String {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("production-tracker");
    if let Err(e) = std::fs::create_dir_all(&path) {
        tracing::warn!("无法创建数据目录 {}: {}", path.display(), e);
    }
    path.push("production_tracker.db");
    path.to_string_lossy().to_string()
}
