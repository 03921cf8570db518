// ==========================================
// 生产进度看板 - 生产记录与周期聚合
// ==========================================
// 来源: v_dashboard_main 视图（只读）
// 约束: 周期内累计值 = 该周期最后一行的累计值（不可对累计值求和）
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 视图 v_dashboard_main 的列（顺序与 SELECT 一致）
pub const DASHBOARD_VIEW_COLUMNS: [&str; 9] = [
    "fecha",
    "linea",
    "id_sku",
    "plan_dia",
    "real_dia",
    "plan_acumulado",
    "real_acumulado",
    "dias_atraso",
    "ritmo_promedio",
];

/// 生产记录（每日 × SKU，或每日一行）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub fecha: NaiveDate,
    pub linea: String,
    pub id_sku: String,
    pub plan_dia: f64,
    pub real_dia: f64,
    pub plan_acumulado: f64,
    pub real_acumulado: f64,
    pub dias_atraso: f64,
    pub ritmo_promedio: f64,
}

/// 单个周期的聚合结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedPeriod {
    pub label: String,
    pub plan_incremental: f64,
    pub real_incremental: f64,
    /// 周期末计划累计
    pub plan_acumulado: f64,
    /// 周期末实际累计
    pub real_acumulado: f64,
}

/// 图表用的平行数组
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSeries {
    pub labels: Vec<String>,
    pub plan_acumulado: Vec<f64>,
    pub real_acumulado: Vec<f64>,
    pub plan_incremental: Vec<f64>,
    pub real_incremental: Vec<f64>,
}

impl PeriodSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl From<Vec<AggregatedPeriod>> for PeriodSeries {
    fn from(periods: Vec<AggregatedPeriod>) -> Self {
        let mut series = PeriodSeries::default();
        for p in periods {
            series.labels.push(p.label);
            series.plan_acumulado.push(p.plan_acumulado);
            series.real_acumulado.push(p.real_acumulado);
            series.plan_incremental.push(p.plan_incremental);
            series.real_incremental.push(p.real_incremental);
        }
        series
    }
}
