// ==========================================
// 生产进度看板 - 节假日仓储
// ==========================================
// 表: feriados_ar(fecha PK, descripcion, tipo)
// 约束: 以 fecha 为键 upsert，重复同步幂等
// ==========================================

use crate::domain::holiday::HolidayRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

pub struct HolidayRepository {
    conn: Arc<Mutex<Connection>>,
}

impl HolidayRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量 upsert（单事务）
    ///
    /// # 返回
    /// - Ok(n): 写入的记录数
    pub fn upsert_batch(&self, records: &[HolidayRecord]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO feriados_ar (fecha, descripcion, tipo)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(fecha) DO UPDATE SET
                    descripcion = excluded.descripcion,
                    tipo = excluded.tipo
                "#,
            )?;
            for r in records {
                stmt.execute(params![r.fecha, r.descripcion, r.tipo])?;
                count += 1;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    pub fn find_by_date(&self, fecha: NaiveDate) -> RepositoryResult<Option<HolidayRecord>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            "SELECT fecha, descripcion, tipo FROM feriados_ar WHERE fecha = ?1",
            params![fecha],
            |row| {
                Ok(HolidayRecord {
                    fecha: row.get(0)?,
                    descripcion: row.get(1)?,
                    tipo: row.get(2)?,
                })
            },
        );

        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 按年份列出（按日期升序）
    pub fn list_by_year(&self, year: i32) -> RepositoryResult<Vec<HolidayRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT fecha, descripcion, tipo
            FROM feriados_ar
            WHERE substr(fecha, 1, 4) = ?1
            ORDER BY fecha ASC
            "#,
        )?;
        let rows = stmt
            .query_map(params![format!("{:04}", year)], |row| {
                Ok(HolidayRecord {
                    fecha: row.get(0)?,
                    descripcion: row.get(1)?,
                    tipo: row.get(2)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM feriados_ar", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> HolidayRepository {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        HolidayRepository::new(Arc::new(Mutex::new(conn)))
    }

    fn holiday(y: i32, m: u32, d: u32, desc: &str) -> HolidayRecord {
        HolidayRecord {
            fecha: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            descripcion: desc.to_string(),
            tipo: "inamovible".to_string(),
        }
    }

    #[test]
    fn test_upsert_batch_is_idempotent_by_fecha() {
        let repo = setup();
        let batch = vec![holiday(2024, 1, 1, "Año Nuevo"), holiday(2024, 5, 25, "Revolución de Mayo")];

        assert_eq!(repo.upsert_batch(&batch).unwrap(), 2);
        assert_eq!(repo.upsert_batch(&batch).unwrap(), 2);
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_upsert_replaces_description() {
        let repo = setup();
        repo.upsert_batch(&[holiday(2024, 1, 1, "viejo")]).unwrap();
        repo.upsert_batch(&[holiday(2024, 1, 1, "Año Nuevo")]).unwrap();

        let found = repo
            .find_by_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(found.descripcion, "Año Nuevo");
    }

    #[test]
    fn test_list_by_year() {
        let repo = setup();
        repo.upsert_batch(&[
            holiday(2024, 12, 25, "Navidad"),
            holiday(2025, 1, 1, "Año Nuevo"),
            holiday(2024, 1, 1, "Año Nuevo"),
        ])
        .unwrap();

        let rows = repo.list_by_year(2024).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fecha, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(repo
            .find_by_date(NaiveDate::from_ymd_opt(2024, 7, 9).unwrap())
            .unwrap()
            .is_none());
    }
}
