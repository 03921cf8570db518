// ==========================================
// 生产进度看板 - CSV 导出
// ==========================================
// 表头: v_dashboard_main 列名
// 日期: YYYY-MM-DD；数值: 原样输出（不做本地化格式）
// ==========================================

use std::io::Write;

use thiserror::Error;

use crate::domain::production::{ProductionRecord, DASHBOARD_VIEW_COLUMNS};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV 写入失败: {0}")]
    CsvWriteError(String),

    #[error("CSV 编码失败: {0}")]
    EncodingError(String),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvWriteError(err.to_string())
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

/// 写入 CSV（含表头）
pub fn write_csv<W: Write>(rows: &[ProductionRecord], writer: W) -> ExportResult<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(DASHBOARD_VIEW_COLUMNS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()
        .map_err(|e| ExportError::CsvWriteError(e.to_string()))?;
    Ok(())
}

/// 导出为 CSV 字符串
pub fn to_csv_string(rows: &[ProductionRecord]) -> ExportResult<String> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    String::from_utf8(buf).map_err(|e| ExportError::EncodingError(e.to_string()))
}
