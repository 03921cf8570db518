// ==========================================
// 生产进度看板 - 核心库
// ==========================================
// 技术栈: axum + Rust + SQLite
// 系统定位: 生产计划 vs 实际进度看板（只读）+ 节假日同步
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "es-AR");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 筛选、聚合、KPI、图表
pub mod engine;

// 节假日同步
pub mod sync;

// 认证
pub mod auth;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// CSV 导出
pub mod exporter;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - HTTP 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DelayStatus, Granularity, TrendTone};

// 领域实体
pub use domain::{AggregatedPeriod, HolidayRecord, PeriodSeries, ProductionRecord, Session};

// 引擎
pub use engine::{DashboardFilter, KpiCalculator, PeriodAggregator};

// API
pub use api::{ApiError, DashboardController, DashboardView};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Tablero de Producción";
