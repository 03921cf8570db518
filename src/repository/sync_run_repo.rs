// ==========================================
// 生产进度看板 - 同步运行日志仓储
// ==========================================
// 表: sync_run_log
// 用途: 记录每次节假日同步的结果（成功/失败），便于排查
// ==========================================

use crate::domain::holiday::SyncRun;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct SyncRunRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SyncRunRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn insert(&self, run: &SyncRun) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO sync_run_log (
                run_id, year, synced_count, success, message, started_at, finished_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                run.run_id,
                run.year,
                run.synced_count as i64,
                run.success as i32,
                run.message,
                run.started_at.format(TS_FORMAT).to_string(),
                run.finished_at.format(TS_FORMAT).to_string(),
            ],
        )?;
        Ok(run.run_id.clone())
    }

    /// 最近的同步记录（按开始时间倒序）
    pub fn find_recent(&self, limit: usize) -> RepositoryResult<Vec<SyncRun>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT run_id, year, synced_count, success, message, started_at, finished_at
            FROM sync_run_log
            ORDER BY started_at DESC, rowid DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                let started_at: String = row.get(5)?;
                let finished_at: String = row.get(6)?;
                Ok(SyncRun {
                    run_id: row.get(0)?,
                    year: row.get(1)?,
                    synced_count: row.get::<_, i64>(2)?.max(0) as usize,
                    success: row.get::<_, i32>(3)? != 0,
                    message: row.get(4)?,
                    started_at: parse_ts(&started_at, 5)?,
                    finished_at: parse_ts(&finished_at, 6)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }
}

fn parse_ts(raw: &str, idx: usize) -> SqliteResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TS_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
