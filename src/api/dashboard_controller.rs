// ==========================================
// 生产进度看板 - 看板控制器
// ==========================================
// 状态: { filters, granularity, dataset }
// 流程: load() 读取视图 → set_filters / set_granularity 修改状态
//       → render() 重新计算序列、KPI、图表规格
// 说明: 每个 HTTP 请求新建一个控制器，不跨请求共享
// ==========================================

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::production::{PeriodSeries, ProductionRecord};
use crate::domain::types::Granularity;
use crate::engine::{build_charts, DashboardCharts, DashboardFilter, KpiCalculator, KpiPanel, PeriodAggregator};
use crate::exporter;
use crate::repository::ProductionRepository;

/// 渲染结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub granularity: Granularity,
    pub filters: DashboardFilter,
    pub series: PeriodSeries,
    /// 无数据时为 null
    pub kpis: Option<KpiPanel>,
    pub charts: DashboardCharts,
    /// 筛选后的行数
    pub row_count: usize,
}

/// 筛选下拉选项
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub lineas: Vec<String>,
    pub skus: Vec<String>,
}

pub struct DashboardController {
    repo: Arc<ProductionRepository>,
    aggregator: PeriodAggregator,
    kpi: KpiCalculator,
    locale: String,
    filters: DashboardFilter,
    granularity: Granularity,
    dataset: Vec<ProductionRecord>,
}

impl DashboardController {
    pub fn new(repo: Arc<ProductionRepository>, kpi: KpiCalculator, locale: impl Into<String>) -> Self {
        let locale = locale.into();
        Self {
            repo,
            aggregator: PeriodAggregator::new(locale.clone()),
            kpi,
            locale,
            filters: DashboardFilter::default(),
            granularity: Granularity::default(),
            dataset: Vec::new(),
        }
    }

    /// 读取视图全部数据（按日期升序），返回行数
    pub fn load(&mut self) -> ApiResult<usize> {
        match self.repo.list_all() {
            Ok(rows) => {
                tracing::debug!(rows = rows.len(), "看板数据加载完成");
                self.dataset = rows;
                Ok(self.dataset.len())
            }
            Err(e) => {
                tracing::error!(error = %e, "看板数据加载失败");
                Err(ApiError::from(e))
            }
        }
    }

    pub fn filters(&self) -> &DashboardFilter {
        &self.filters
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn set_filters(&mut self, filters: DashboardFilter) -> ApiResult<()> {
        if !filters.has_valid_range() {
            return Err(ApiError::InvalidInput(format!(
                "日期区间无效: desde={:?} > hasta={:?}",
                filters.desde, filters.hasta
            )));
        }
        self.filters = filters;
        Ok(())
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.granularity = granularity;
    }

    /// 当前筛选后的行（保持日期顺序）
    pub fn visible_rows(&self) -> Vec<ProductionRecord> {
        self.filters.apply(&self.dataset)
    }

    pub fn render(&self) -> DashboardView {
        self.render_at(Local::now().date_naive())
    }

    /// 以指定日期为"今天"渲染（预计完成日期基于此日期）
    pub fn render_at(&self, today: NaiveDate) -> DashboardView {
        let rows = self.visible_rows();
        let series = self.aggregator.aggregate(&rows, self.granularity);
        let kpis = self.kpi.compute(rows.last(), today);
        let charts = build_charts(&series, &self.locale);

        DashboardView {
            granularity: self.granularity,
            filters: self.filters.clone(),
            series,
            kpis,
            charts,
            row_count: rows.len(),
        }
    }

    /// 当前可见行导出为 CSV
    pub fn export_csv(&self) -> ApiResult<String> {
        let rows = self.visible_rows();
        let csv = exporter::to_csv_string(&rows)?;
        tracing::info!(rows = rows.len(), "看板数据已导出 CSV");
        Ok(csv)
    }

    /// 已加载数据中的产线（去重、排序）
    pub fn available_lines(&self) -> Vec<String> {
        self.dataset
            .iter()
            .map(|r| r.linea.trim())
            .filter(|l| !l.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// 已加载数据中的 SKU（去重、排序）
    pub fn available_skus(&self) -> Vec<String> {
        self.dataset
            .iter()
            .map(|r| r.id_sku.trim())
            .filter(|s| !s.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            lineas: self.available_lines(),
            skus: self.available_skus(),
        }
    }
}
