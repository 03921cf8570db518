// ==========================================
// 生产进度看板 - 生产记录仓储（只读）
// ==========================================
// 来源: v_dashboard_main 视图
// 红线: Repository 不做业务逻辑,只做数据映射
// ==========================================

use crate::domain::production::ProductionRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const SELECT_DASHBOARD_ROWS: &str = r#"
    SELECT
        fecha,
        linea,
        id_sku,
        plan_dia,
        real_dia,
        plan_acumulado,
        real_acumulado,
        dias_atraso,
        ritmo_promedio
    FROM v_dashboard_main
"#;

pub struct ProductionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductionRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<ProductionRecord> {
        Ok(ProductionRecord {
            fecha: row.get::<_, NaiveDate>(0)?,
            linea: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            id_sku: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            plan_dia: row.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
            real_dia: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
            plan_acumulado: row.get::<_, Option<f64>>(5)?.unwrap_or(0.0),
            real_acumulado: row.get::<_, Option<f64>>(6)?.unwrap_or(0.0),
            dias_atraso: row.get::<_, Option<f64>>(7)?.unwrap_or(0.0),
            ritmo_promedio: row.get::<_, Option<f64>>(8)?.unwrap_or(0.0),
        })
    }

    /// 读取全部看板行（按日期升序）
    ///
    /// 同一日期内按 linea, id_sku 排序，保证多次读取顺序稳定
    pub fn list_all(&self) -> RepositoryResult<Vec<ProductionRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY fecha ASC, linea ASC, id_sku ASC", SELECT_DASHBOARD_ROWS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 写入/覆盖一条日生产数据（供种子数据与测试使用）
    pub fn upsert_daily(
        &self,
        fecha: NaiveDate,
        linea: &str,
        id_sku: &str,
        plan_dia: f64,
        real_dia: f64,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO produccion_diaria (fecha, linea, id_sku, plan_dia, real_dia)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(fecha, linea, id_sku) DO UPDATE SET
                plan_dia = excluded.plan_dia,
                real_dia = excluded.real_dia
            "#,
            params![fecha, linea, id_sku, plan_dia, real_dia],
        )?;
        Ok(())
    }
}
