// ==========================================
// 生产进度看板 - 节假日数据源
// ==========================================
// 外部 API: GET {base_url}/{year}
// 返回: [{ motivo, tipo, dia, mes, id, ... }]
// 约束: 非 2xx 状态即失败，不重试；错误消息固定，细节只写日志
// ==========================================

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::holiday::ExternalHoliday;
use crate::i18n;
use crate::sync::holiday_sync::SyncError;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// 节假日数据源
#[async_trait]
pub trait HolidaySource: Send + Sync {
    /// 拉取指定年份的节假日
    async fn fetch_year(&self, year: i32) -> Result<Vec<ExternalHoliday>, SyncError>;
}

/// nolaborables.com.ar HTTP 数据源
pub struct HttpHolidaySource {
    client: reqwest::Client,
    base_url: String,
    locale: String,
}

impl HttpHolidaySource {
    pub fn new(base_url: &str, locale: impl Into<String>) -> Result<Self, SyncError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| SyncError::Fetch(format!("HTTP 客户端初始化失败: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            locale: locale.into(),
        })
    }

    fn fetch_failed(&self) -> SyncError {
        SyncError::Fetch(i18n::t_locale("sync.fetch_failed", &self.locale))
    }

    pub fn year_url(&self, year: i32) -> String {
        format!("{}/{}", self.base_url, year)
    }
}

#[async_trait]
impl HolidaySource for HttpHolidaySource {
    async fn fetch_year(&self, year: i32) -> Result<Vec<ExternalHoliday>, SyncError> {
        let url = self.year_url(year);
        tracing::debug!(url = %url, "请求节假日 API");

        let resp = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "节假日 API 请求失败");
            self.fetch_failed()
        })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "节假日 API 返回非成功状态");
            return Err(self.fetch_failed());
        }

        resp.json::<Vec<ExternalHoliday>>().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "节假日 API 响应解析失败");
            SyncError::Fetch(i18n::t_locale("sync.parse_failed", &self.locale))
        })
    }
}
