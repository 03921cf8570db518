// ==========================================
// 生产进度看板 - 节假日同步任务
// ==========================================
// 流程: 拉取（当年）→ 转换 {fecha, descripcion, tipo} → 按 fecha upsert
// 约束:
// - 无重试、无部分失败处理
// - 每次运行写 sync_run_log（best-effort，写失败只告警）
// ==========================================

use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::app_config::DEFAULT_LOCALE;
use crate::domain::holiday::{ExternalHoliday, HolidayRecord, SyncRun};
use crate::i18n;
use crate::repository::error::RepositoryError;
use crate::repository::{HolidayRepository, SyncRunRepository};
use crate::sync::holiday_source::HolidaySource;

/// 同步错误
#[derive(Error, Debug)]
pub enum SyncError {
    /// 外部 API 请求失败（含非 2xx 状态、响应解析失败）
    #[error("{0}")]
    Fetch(String),

    #[error("节假日数据转换失败: {0}")]
    Transform(String),

    #[error("数据库写入失败: {0}")]
    Database(#[from] RepositoryError),
}

/// 同步结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub run_id: String,
    pub year: i32,
    pub count: usize,
}

impl SyncOutcome {
    pub fn message(&self, locale: &str) -> String {
        let count = self.count.to_string();
        let year = self.year.to_string();
        i18n::t_with_args("sync.synced", locale, &[("count", count.as_str()), ("year", year.as_str())])
    }
}

/// 外部记录 → 库表记录
///
/// `{mes: 1, dia: 5}` + 2024 → `2024-01-05`
pub fn to_holiday_records(year: i32, items: &[ExternalHoliday]) -> Result<Vec<HolidayRecord>, SyncError> {
    items
        .iter()
        .map(|h| {
            let fecha = NaiveDate::from_ymd_opt(year, h.mes, h.dia).ok_or_else(|| {
                SyncError::Transform(format!(
                    "无效日期: year={}, mes={}, dia={} ({})",
                    year, h.mes, h.dia, h.motivo
                ))
            })?;
            Ok(HolidayRecord {
                fecha,
                descripcion: h.motivo.clone(),
                tipo: h.tipo.clone(),
            })
        })
        .collect()
}

/// 节假日同步任务
pub struct HolidaySyncJob {
    source: Arc<dyn HolidaySource>,
    holiday_repo: Arc<HolidayRepository>,
    sync_run_repo: Arc<SyncRunRepository>,
}

impl HolidaySyncJob {
    pub fn new(
        source: Arc<dyn HolidaySource>,
        holiday_repo: Arc<HolidayRepository>,
        sync_run_repo: Arc<SyncRunRepository>,
    ) -> Self {
        Self {
            source,
            holiday_repo,
            sync_run_repo,
        }
    }

    /// 同步当年
    pub async fn run(&self) -> Result<SyncOutcome, SyncError> {
        self.run_for_year(Local::now().year()).await
    }

    /// 同步指定年份
    pub async fn run_for_year(&self, year: i32) -> Result<SyncOutcome, SyncError> {
        let run_id = Uuid::new_v4().to_string();
        let started_at = Local::now().naive_local();
        tracing::info!(run_id = %run_id, year, "开始同步节假日");

        let result = self.sync_once(year).await.map(|count| SyncOutcome {
            run_id: run_id.clone(),
            year,
            count,
        });

        let (success, count, message) = match &result {
            Ok(outcome) => {
                tracing::info!(run_id = %run_id, year, count = outcome.count, "节假日同步完成");
                (true, outcome.count, outcome.message(DEFAULT_LOCALE))
            }
            Err(e) => {
                tracing::error!(run_id = %run_id, year, error = %e, "节假日同步失败");
                (false, 0, e.to_string())
            }
        };

        let run = SyncRun {
            run_id: run_id.clone(),
            year,
            synced_count: count,
            success,
            message,
            started_at,
            finished_at: Local::now().naive_local(),
        };
        if let Err(e) = self.sync_run_repo.insert(&run) {
            tracing::warn!(run_id = %run_id, "sync_run_log 写入失败: {}", e);
        }

        result
    }

    async fn sync_once(&self, year: i32) -> Result<usize, SyncError> {
        let items = self.source.fetch_year(year).await?;
        let records = to_holiday_records(year, &items)?;
        let n = self.holiday_repo.upsert_batch(&records)?;
        Ok(n)
    }
}
