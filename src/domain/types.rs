// ==========================================
// 生产进度看板 - 领域类型定义
// ==========================================
// 职责: 看板用到的枚举类型（时间粒度、延误状态、涨跌色调）
// 序列化格式: snake_case（与前端查询参数一致）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 时间粒度 (Granularity)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    Day,   // 按日
    Week,  // 按周
    Month, // 按月
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Day => write!(f, "day"),
            Granularity::Week => write!(f, "week"),
            Granularity::Month => write!(f, "month"),
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "dia" | "día" | "d" => Ok(Granularity::Day),
            "week" | "semana" | "w" => Ok(Granularity::Week),
            "month" | "mes" | "m" => Ok(Granularity::Month),
            other => Err(format!("未知的时间粒度: {}", other)),
        }
    }
}

// ==========================================
// 延误状态 (Delay Status)
// ==========================================
// dias_atraso > 容差 即视为落后
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelayStatus {
    OnTrack, // 按期/超前
    Behind,  // 落后
}

impl fmt::Display for DelayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayStatus::OnTrack => write!(f, "ON_TRACK"),
            DelayStatus::Behind => write!(f, "BEHIND"),
        }
    }
}

// ==========================================
// 涨跌色调 (Trend Tone)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendTone {
    Positive, // 实际 >= 计划
    Negative, // 实际 < 计划
}
