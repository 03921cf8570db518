// ==========================================
// 生产进度看板 - 引擎层
// ==========================================
// 职责: 纯计算（筛选、周期聚合、KPI、图表规格），不做 I/O
// ==========================================

pub mod chart;
pub mod filter;
pub mod kpi;
pub mod period_aggregator;

// 重导出核心引擎
pub use chart::{build_charts, ChartKind, ChartSpec, DashboardCharts};
pub use filter::DashboardFilter;
pub use kpi::{classify_delay, estimate_completion, format_number, percent_delta, KpiCalculator, KpiPanel};
pub use period_aggregator::{week_of_year, PeriodAggregator};
