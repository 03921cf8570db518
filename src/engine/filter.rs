// ==========================================
// 生产进度看板 - 数据筛选
// ==========================================
// 规则:
// - 产线: 精确匹配（去除首尾空白）
// - SKU: 子串匹配，不区分大小写
// - 日期: 闭区间
// - 空字符串视为未设置
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::production::ProductionRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardFilter {
    #[serde(default)]
    pub linea: Option<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub desde: Option<NaiveDate>,
    #[serde(default)]
    pub hasta: Option<NaiveDate>,
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl DashboardFilter {
    pub fn is_empty(&self) -> bool {
        non_blank(&self.linea).is_none()
            && non_blank(&self.sku).is_none()
            && self.desde.is_none()
            && self.hasta.is_none()
    }

    /// 日期区间是否有效（desde <= hasta）
    pub fn has_valid_range(&self) -> bool {
        match (self.desde, self.hasta) {
            (Some(from), Some(to)) => from <= to,
            _ => true,
        }
    }

    pub fn matches(&self, row: &ProductionRecord) -> bool {
        if let Some(linea) = non_blank(&self.linea) {
            if row.linea.trim() != linea {
                return false;
            }
        }
        if let Some(sku) = non_blank(&self.sku) {
            if !row.id_sku.to_lowercase().contains(&sku.to_lowercase()) {
                return false;
            }
        }
        if let Some(from) = self.desde {
            if row.fecha < from {
                return false;
            }
        }
        if let Some(to) = self.hasta {
            if row.fecha > to {
                return false;
            }
        }
        true
    }

    /// 过滤，保持原有顺序
    pub fn apply(&self, rows: &[ProductionRecord]) -> Vec<ProductionRecord> {
        rows.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}
