// ==========================================
// 生产进度看板 - 配置层
// ==========================================
// 职责:
// - 进程级配置: 环境变量（数据库路径、外部服务地址、定时表达式）
// - 运行期配置: config_kv 表（延误容差、看板语言）
// ==========================================

pub mod app_config;
pub mod config_manager;

// 重导出
pub use app_config::{env_keys, get_default_db_path, AppConfig, AuthConfig, ConfigError};
pub use config_manager::{config_keys, ConfigManager, DEFAULT_DELAY_TOLERANCE_DAYS};
