// ==========================================
// 生产进度看板 - 图表规格（声明式）
// ==========================================
// 职责: 由聚合结果生成图表配置，前端按规格整体重绘
// 图表:
// - S 曲线（折线）：计划累计 / 实际累计
// - 日产量（柱状）：实际增量
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::production::PeriodSeries;
use crate::i18n;

pub const COLOR_NEON_CYAN: &str = "#06b6d4";
pub const COLOR_NEON_VIOLET: &str = "#8b5cf6";
pub const COLOR_NEON_LIME: &str = "#84cc16";
const AXIS_TICK_COLOR: &str = "#a1a1aa";
const GRID_COLOR: &str = "rgba(255, 255, 255, 0.05)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: Option<String>,
    pub background_color: String,
    pub border_width: Option<u32>,
    pub fill: bool,
    pub tension: Option<f64>,
    pub point_radius: Option<u32>,
    pub border_radius: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisStyle {
    pub grid_color: Option<String>,
    pub show_grid: bool,
    pub tick_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub legend_color: String,
    pub x: AxisStyle,
    pub y: AxisStyle,
    /// 悬浮提示按索引联动（仅 S 曲线）
    pub index_interaction: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            responsive: true,
            maintain_aspect_ratio: false,
            legend_color: AXIS_TICK_COLOR.to_string(),
            x: AxisStyle {
                grid_color: None,
                show_grid: false,
                tick_color: AXIS_TICK_COLOR.to_string(),
            },
            y: AxisStyle {
                grid_color: Some(GRID_COLOR.to_string()),
                show_grid: true,
                tick_color: AXIS_TICK_COLOR.to_string(),
            },
            index_interaction: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub id: String,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub options: ChartOptions,
}

/// 看板上的全部图表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardCharts {
    pub curve: ChartSpec,
    pub bar: ChartSpec,
}

/// S 曲线（计划累计 vs 实际累计）
pub fn s_curve_chart(series: &PeriodSeries, locale: &str) -> ChartSpec {
    ChartSpec {
        id: "chart-curve".to_string(),
        kind: ChartKind::Line,
        labels: series.labels.clone(),
        datasets: vec![
            Dataset {
                label: i18n::t_locale("chart.plan_acumulado", locale),
                data: series.plan_acumulado.clone(),
                border_color: Some(COLOR_NEON_CYAN.to_string()),
                background_color: "rgba(6, 182, 212, 0.1)".to_string(),
                border_width: Some(2),
                fill: true,
                tension: Some(0.4),
                point_radius: Some(0),
                border_radius: None,
            },
            Dataset {
                label: i18n::t_locale("chart.real_acumulado", locale),
                data: series.real_acumulado.clone(),
                border_color: Some(COLOR_NEON_VIOLET.to_string()),
                background_color: "rgba(139, 92, 246, 0.1)".to_string(),
                border_width: Some(2),
                fill: true,
                tension: Some(0.4),
                point_radius: Some(3),
                border_radius: None,
            },
        ],
        options: ChartOptions {
            index_interaction: true,
            ..ChartOptions::default()
        },
    }
}

/// 周期实际产量柱状图
pub fn production_bar_chart(series: &PeriodSeries, locale: &str) -> ChartSpec {
    ChartSpec {
        id: "chart-bar".to_string(),
        kind: ChartKind::Bar,
        labels: series.labels.clone(),
        datasets: vec![Dataset {
            label: i18n::t_locale("chart.prod_real", locale),
            data: series.real_incremental.clone(),
            border_color: None,
            background_color: COLOR_NEON_LIME.to_string(),
            border_width: None,
            fill: false,
            tension: None,
            point_radius: None,
            border_radius: Some(4),
        }],
        options: ChartOptions::default(),
    }
}

pub fn build_charts(series: &PeriodSeries, locale: &str) -> DashboardCharts {
    DashboardCharts {
        curve: s_curve_chart(series, locale),
        bar: production_bar_chart(series, locale),
    }
}
