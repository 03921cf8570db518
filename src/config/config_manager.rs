// ==========================================
// 生产进度看板 - 配置管理器
// ==========================================
// 职责: 运行期配置加载、查询、覆写
// 存储: config_kv 表 (scope_id='global')
// ==========================================

use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    /// 延误容差（天），dias_atraso 大于该值视为落后
    pub const DELAY_TOLERANCE_DAYS: &str = "dashboard.delay_tolerance_days";
    /// 看板标签语言
    pub const DASHBOARD_LOCALE: &str = "dashboard.locale";
}

pub const DEFAULT_DELAY_TOLERANCE_DAYS: f64 = 0.5;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    // ===== 看板配置 =====

    /// 获取延误容差（天）
    ///
    /// 默认 0.5；格式错误或为负时回退默认值
    pub fn get_delay_tolerance_days(&self) -> Result<f64, Box<dyn Error>> {
        let default = DEFAULT_DELAY_TOLERANCE_DAYS.to_string();
        let value = self.get_config_or_default(config_keys::DELAY_TOLERANCE_DAYS, &default)?;
        match value.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
            _ => {
                tracing::warn!(
                    config_key = config_keys::DELAY_TOLERANCE_DAYS,
                    raw_value = %value,
                    "延误容差配置格式错误，使用默认值"
                );
                Ok(DEFAULT_DELAY_TOLERANCE_DAYS)
            }
        }
    }

    /// 获取看板语言（未配置时返回 None，由调用方决定默认值）
    pub fn get_dashboard_locale(&self) -> Result<Option<String>, Box<dyn Error>> {
        Ok(self
            .get_config_value(config_keys::DASHBOARD_LOCALE)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}
