// ==========================================
// 生产进度看板 - KPI 计算与格式化
// ==========================================
// 输入: 最新（或筛选后最新）一行生产记录
// 规则:
// - 偏差% = (实际 - 计划) / 计划 × 100，计划 <= 0 时为 0
// - dias_atraso > 容差（默认 0.5 天）判定为落后
// - 预计完工日 = 今天 + dias_atraso 天（小数部分向零截断）
// ==========================================

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_DELAY_TOLERANCE_DAYS;
use crate::domain::production::ProductionRecord;
use crate::domain::types::{DelayStatus, TrendTone};
use crate::i18n;

/// 展示日期格式 (dd/mm/yyyy)
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// KPI 面板
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiPanel {
    pub fecha: NaiveDate,
    pub plan_acumulado: f64,
    pub real_acumulado: f64,
    pub ritmo_promedio: f64,
    pub dias_atraso: f64,
    pub plan_text: String,
    pub real_text: String,
    pub ritmo_text: String,
    pub delta_pct: f64,
    pub delta_text: String,
    pub delta_tone: TrendTone,
    pub delay_text: String,
    pub delay_status: DelayStatus,
    pub estimated_end_date: NaiveDate,
    pub estimated_end_text: String,
}

/// 偏差百分比
pub fn percent_delta(plan: f64, real: f64) -> f64 {
    if plan > 0.0 {
        (real - plan) / plan * 100.0
    } else {
        0.0
    }
}

/// 延误判定（严格大于容差才算落后）
pub fn classify_delay(dias_atraso: f64, tolerance_days: f64) -> DelayStatus {
    if dias_atraso > tolerance_days {
        DelayStatus::Behind
    } else {
        DelayStatus::OnTrack
    }
}

/// 预计完工日
pub fn estimate_completion(today: NaiveDate, dias_atraso: f64) -> NaiveDate {
    if !dias_atraso.is_finite() {
        return today;
    }
    // 超出日期范围时保持今天
    let days = dias_atraso.trunc() as i64;
    Duration::try_days(days)
        .and_then(|delta| today.checked_add_signed(delta))
        .unwrap_or(today)
}

/// 数字格式化（千分位 + 最多 3 位小数，去掉末尾 0）
///
/// es-AR: `1.234,5`；en: `1,234.5`
pub fn format_number(value: f64, locale: &str) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let (group_sep, decimal_sep) = if locale.starts_with("es") { ('.', ',') } else { (',', '.') };

    let rounded = (value.abs() * 1000.0).round() / 1000.0;
    let fixed = format!("{:.3}", rounded);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(group_sep);
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if value < 0.0 && rounded > 0.0 {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac.is_empty() {
        out.push(decimal_sep);
        out.push_str(frac);
    }
    out
}

/// KPI 计算器
pub struct KpiCalculator {
    tolerance_days: f64,
    locale: String,
}

impl KpiCalculator {
    pub fn new(tolerance_days: f64, locale: impl Into<String>) -> Self {
        Self {
            tolerance_days,
            locale: locale.into(),
        }
    }

    /// 根据快照计算 KPI；无数据时返回 None
    pub fn compute(&self, snapshot: Option<&ProductionRecord>, today: NaiveDate) -> Option<KpiPanel> {
        let current = snapshot?;

        let plan = current.plan_acumulado;
        let real = current.real_acumulado;
        let delay = current.dias_atraso;

        let delta = percent_delta(plan, real);
        let (arrow, tone) = if delta >= 0.0 {
            ("▲", TrendTone::Positive)
        } else {
            ("▼", TrendTone::Negative)
        };
        let delta_text = format!(
            "{} {:.1}% {}",
            arrow,
            delta.abs(),
            i18n::t_locale("kpi.vs_plan", &self.locale)
        );

        let estimated = estimate_completion(today, delay);

        Some(KpiPanel {
            fecha: current.fecha,
            plan_acumulado: plan,
            real_acumulado: real,
            ritmo_promedio: current.ritmo_promedio,
            dias_atraso: delay,
            plan_text: format_number(plan, &self.locale),
            real_text: format_number(real, &self.locale),
            ritmo_text: format_number(current.ritmo_promedio, &self.locale),
            delta_pct: delta,
            delta_text,
            delta_tone: tone,
            delay_text: format!("{:.1}", delay.abs()),
            delay_status: classify_delay(delay, self.tolerance_days),
            estimated_end_date: estimated,
            estimated_end_text: estimated.format(DISPLAY_DATE_FORMAT).to_string(),
        })
    }
}

impl Default for KpiCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY_TOLERANCE_DAYS, crate::config::app_config::DEFAULT_LOCALE)
    }
}
