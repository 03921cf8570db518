// ==========================================
// 生产进度看板 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供 HTTP 路由调用
// ==========================================

pub mod auth_api;
pub mod dashboard_controller;
pub mod error;
pub mod sync_api;

// 重导出核心类型
pub use auth_api::{AuthApi, LoginRequest};
pub use dashboard_controller::{DashboardController, DashboardView, FilterOptions};
pub use error::{ApiError, ApiResult};
pub use sync_api::{SyncApi, SyncResponse};
