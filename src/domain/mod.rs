// ==========================================
// 生产进度看板 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod auth;
pub mod holiday;
pub mod production;
pub mod types;

// 重导出核心类型
pub use auth::{AuthUser, Session};
pub use holiday::{ExternalHoliday, HolidayRecord, SyncRun};
pub use production::{AggregatedPeriod, PeriodSeries, ProductionRecord, DASHBOARD_VIEW_COLUMNS};
pub use types::{DelayStatus, Granularity, TrendTone};
