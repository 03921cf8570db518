// ==========================================
// 生产进度看板 - 节假日同步 API
// ==========================================
// 成功: { "success": true, "message": "Synced N holidays for YYYY" }
// 失败: ApiError（由 HTTP 层映射为 500 { "error": ... }）
// 记录: recent_runs 读取 sync_run_log（新到旧）
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::domain::holiday::SyncRun;
use crate::repository::SyncRunRepository;
use crate::sync::HolidaySyncJob;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResponse {
    pub success: bool,
    pub message: String,
}

pub struct SyncApi {
    job: Arc<HolidaySyncJob>,
    sync_run_repo: Arc<SyncRunRepository>,
    locale: String,
}

impl SyncApi {
    pub fn new(job: Arc<HolidaySyncJob>, sync_run_repo: Arc<SyncRunRepository>, locale: impl Into<String>) -> Self {
        Self {
            job,
            sync_run_repo,
            locale: locale.into(),
        }
    }

    /// 同步当年节假日
    pub async fn sync_current_year(&self) -> ApiResult<SyncResponse> {
        let outcome = self.job.run().await?;
        Ok(SyncResponse {
            success: true,
            message: outcome.message(&self.locale),
        })
    }

    /// 同步指定年份
    pub async fn sync_year(&self, year: i32) -> ApiResult<SyncResponse> {
        let outcome = self.job.run_for_year(year).await?;
        Ok(SyncResponse {
            success: true,
            message: outcome.message(&self.locale),
        })
    }

    /// 最近的同步记录
    pub fn recent_runs(&self, limit: usize) -> ApiResult<Vec<SyncRun>> {
        Ok(self.sync_run_repo.find_recent(limit)?)
    }
}
