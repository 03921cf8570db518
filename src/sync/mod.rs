// ==========================================
// 生产进度看板 - 节假日同步层
// ==========================================
// 职责: 外部节假日 API → feriados_ar
// ==========================================

pub mod holiday_source;
pub mod holiday_sync;
pub mod scheduler;

pub use holiday_source::{HolidaySource, HttpHolidaySource};
pub use holiday_sync::{to_holiday_records, HolidaySyncJob, SyncError, SyncOutcome};
pub use scheduler::{parse_schedule, run_scheduled_sync};
