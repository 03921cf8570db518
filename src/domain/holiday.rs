// ==========================================
// 生产进度看板 - 节假日实体
// ==========================================
// 存储: feriados_ar(fecha PK, descripcion, tipo)
// 外部来源: nolaborables.com.ar API v2
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 节假日记录（以 fecha 为自然键）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRecord {
    pub fecha: NaiveDate,
    pub descripcion: String,
    pub tipo: String,
}

/// 外部 API 返回的单条节假日
///
/// 形如 `{ "motivo": "...", "tipo": "inamovible", "dia": 1, "mes": 1, "id": "año-nuevo" }`，
/// 其余字段忽略。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalHoliday {
    pub motivo: String,
    pub tipo: String,
    pub dia: u32,
    pub mes: u32,
    #[serde(default)]
    pub id: Option<String>,
}

/// 一次同步运行的审计记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRun {
    pub run_id: String,
    pub year: i32,
    pub synced_count: usize,
    pub success: bool,
    pub message: String,
    pub started_at: NaiveDateTime,
    pub finished_at: NaiveDateTime,
}
