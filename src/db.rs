// ==========================================
// 生产进度看板 - SQLite 连接初始化与建库
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 幂等建库: feriados_ar / produccion_diaria / v_dashboard_main / sync_run_log / config_kv
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 建库脚本
///
/// 说明：
/// - v_dashboard_main 的列契约固定（fecha, linea, id_sku, plan_dia, real_dia,
///   plan_acumulado, real_acumulado, dias_atraso, ritmo_promedio）
/// - 本地库中该视图由 produccion_diaria 经窗口函数推导；
///   托管库可用同名视图替换，读取端不受影响
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL DEFAULT 'global',
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS feriados_ar (
    fecha TEXT PRIMARY KEY,
    descripcion TEXT NOT NULL,
    tipo TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sync_run_log (
    run_id TEXT PRIMARY KEY,
    year INTEGER NOT NULL,
    synced_count INTEGER NOT NULL DEFAULT 0,
    success INTEGER NOT NULL,
    message TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sync_run_log_started_at
    ON sync_run_log(started_at);

CREATE TABLE IF NOT EXISTS produccion_diaria (
    fecha TEXT NOT NULL,
    linea TEXT NOT NULL,
    id_sku TEXT NOT NULL,
    plan_dia REAL NOT NULL DEFAULT 0,
    real_dia REAL NOT NULL DEFAULT 0,
    PRIMARY KEY (fecha, linea, id_sku)
);

CREATE VIEW IF NOT EXISTS v_dashboard_main AS
SELECT
    fecha,
    linea,
    id_sku,
    plan_dia,
    real_dia,
    plan_acumulado,
    real_acumulado,
    CASE
        WHEN ritmo_promedio > 0 THEN (plan_acumulado - real_acumulado) / ritmo_promedio
        ELSE 0
    END AS dias_atraso,
    ritmo_promedio
FROM (
    SELECT
        fecha,
        linea,
        id_sku,
        plan_dia,
        real_dia,
        SUM(plan_dia) OVER w AS plan_acumulado,
        SUM(real_dia) OVER w AS real_acumulado,
        AVG(real_dia) OVER w AS ritmo_promedio
    FROM produccion_diaria
    WINDOW w AS (
        PARTITION BY linea, id_sku
        ORDER BY fecha
        ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW
    )
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 幂等建库，并登记 schema_version
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    if let Some(v) = read_schema_version(conn)? {
        if v > CURRENT_SCHEMA_VERSION {
            tracing::warn!(
                db_version = v,
                expected = CURRENT_SCHEMA_VERSION,
                "数据库 schema_version 高于当前代码版本"
            );
        }
    }
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
