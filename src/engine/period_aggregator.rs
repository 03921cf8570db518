// ==========================================
// 生产进度看板 - 周期聚合引擎
// ==========================================
// 输入: 按日期升序的生产记录 + 时间粒度
// 输出: 按首次出现顺序排列的平行数组（标签/累计计划/累计实际/增量）
// 规则:
// - 增量字段（plan_dia / real_dia）按周期求和
// - 累计字段取周期内最后一行的值（不可求和）
// 前置条件: 输入已按日期升序（不做校验）
// ==========================================

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::production::{AggregatedPeriod, PeriodSeries, ProductionRecord};
use crate::domain::types::Granularity;
use crate::i18n;

/// 周期键：与标签一一对应（日 = dd/mm，周 = 周序号，月 = 月份），不含年份
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PeriodKey {
    Day { month: u32, day: u32 },
    Week(u32),
    Month(u32),
}

/// 周序号：一年中的第几周（周日为一周起点，1 月 1 日所在周为第 1 周）
///
/// week = ceil((day_of_year0 + weekday(1月1日, 周日=0) + 1) / 7)
pub fn week_of_year(date: NaiveDate) -> u32 {
    let jan1_offset = NaiveDate::from_ymd_opt(date.year(), 1, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0);
    (date.ordinal0() + jan1_offset + 7) / 7
}

fn period_key(date: NaiveDate, granularity: Granularity) -> PeriodKey {
    match granularity {
        Granularity::Day => PeriodKey::Day {
            month: date.month(),
            day: date.day(),
        },
        Granularity::Week => PeriodKey::Week(week_of_year(date)),
        Granularity::Month => PeriodKey::Month(date.month()),
    }
}

fn period_label(key: PeriodKey, locale: &str) -> String {
    match key {
        PeriodKey::Day { month, day } => format!("{:02}/{:02}", day, month),
        PeriodKey::Week(week) => i18n::week_label(week, locale),
        PeriodKey::Month(month) => i18n::month_abbrev(month, locale),
    }
}

/// 周期聚合器
pub struct PeriodAggregator {
    locale: String,
}

impl PeriodAggregator {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
        }
    }

    /// 聚合为周期列表
    pub fn aggregate_periods(
        &self,
        rows: &[ProductionRecord],
        granularity: Granularity,
    ) -> Vec<AggregatedPeriod> {
        let mut periods: Vec<AggregatedPeriod> = Vec::new();
        let mut index: HashMap<PeriodKey, usize> = HashMap::new();

        for row in rows {
            let key = period_key(row.fecha, granularity);
            let idx = *index.entry(key).or_insert_with(|| {
                periods.push(AggregatedPeriod {
                    label: period_label(key, &self.locale),
                    plan_incremental: 0.0,
                    real_incremental: 0.0,
                    plan_acumulado: 0.0,
                    real_acumulado: 0.0,
                });
                periods.len() - 1
            });

            let p = &mut periods[idx];
            p.plan_incremental += row.plan_dia;
            p.real_incremental += row.real_dia;
            // 累计值：以最近一行覆盖
            p.plan_acumulado = row.plan_acumulado;
            p.real_acumulado = row.real_acumulado;
        }

        periods
    }

    /// 聚合为平行数组（图表直接使用）
    pub fn aggregate(&self, rows: &[ProductionRecord], granularity: Granularity) -> PeriodSeries {
        PeriodSeries::from(self.aggregate_periods(rows, granularity))
    }
}

impl Default for PeriodAggregator {
    fn default() -> Self {
        Self::new(crate::config::app_config::DEFAULT_LOCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn row(date: NaiveDate, plan: f64, real: f64, plan_acum: f64, real_acum: f64) -> ProductionRecord {
        ProductionRecord {
            fecha: date,
            linea: "L1".to_string(),
            id_sku: "SKU-A".to_string(),
            plan_dia: plan,
            real_dia: real,
            plan_acumulado: plan_acum,
            real_acumulado: real_acum,
            dias_atraso: 0.0,
            ritmo_promedio: 0.0,
        }
    }

    /// 连续 n 天，每天计划 100，实际 90
    fn daily_rows(start: NaiveDate, n: u32) -> Vec<ProductionRecord> {
        (0..n)
            .map(|i| {
                let date = start + chrono::Duration::days(i as i64);
                let k = (i + 1) as f64;
                row(date, 100.0, 90.0, 100.0 * k, 90.0 * k)
            })
            .collect()
    }

    #[test]
    fn test_day_granularity_one_row_per_day_is_identity() {
        let rows = daily_rows(d(2024, 3, 1), 5);
        let series = PeriodAggregator::new("es-AR").aggregate(&rows, Granularity::Day);

        assert_eq!(series.labels, vec!["01/03", "02/03", "03/03", "04/03", "05/03"]);
        assert_eq!(
            series.plan_acumulado,
            rows.iter().map(|r| r.plan_acumulado).collect::<Vec<_>>()
        );
        assert_eq!(
            series.real_acumulado,
            rows.iter().map(|r| r.real_acumulado).collect::<Vec<_>>()
        );
        assert_eq!(
            series.real_incremental,
            rows.iter().map(|r| r.real_dia).collect::<Vec<_>>()
        );
        assert_eq!(
            series.plan_incremental,
            rows.iter().map(|r| r.plan_dia).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_month_granularity_uses_last_row_cumulative_not_sum() {
        let rows = daily_rows(d(2024, 3, 1), 10);
        let series = PeriodAggregator::new("es-AR").aggregate(&rows, Granularity::Month);

        assert_eq!(series.labels, vec!["mar"]);
        // 最后一行的累计值，而不是累计值之和
        assert_eq!(series.plan_acumulado, vec![1000.0]);
        assert_eq!(series.real_acumulado, vec![900.0]);
        assert_eq!(series.plan_incremental, vec![1000.0]);
        assert_eq!(series.real_incremental, vec![900.0]);
    }

    #[test]
    fn test_month_granularity_spanning_two_months() {
        let rows = daily_rows(d(2024, 1, 30), 4); // 30/01, 31/01, 01/02, 02/02
        let periods = PeriodAggregator::new("es-AR").aggregate_periods(&rows, Granularity::Month);

        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].label, "ene");
        assert_eq!(periods[0].real_incremental, 180.0);
        assert_eq!(periods[0].real_acumulado, 180.0);
        assert_eq!(periods[1].label, "feb");
        assert_eq!(periods[1].real_incremental, 180.0);
        assert_eq!(periods[1].real_acumulado, 360.0);
    }

    #[test]
    fn test_week_of_year_starts_on_sunday() {
        // 2024-01-01 是周一
        assert_eq!(week_of_year(d(2024, 1, 1)), 1);
        assert_eq!(week_of_year(d(2024, 1, 6)), 1); // 周六
        assert_eq!(week_of_year(d(2024, 1, 7)), 2); // 周日
        // 2023-01-01 是周日
        assert_eq!(week_of_year(d(2023, 1, 1)), 1);
        assert_eq!(week_of_year(d(2023, 1, 8)), 2);
        assert_eq!(week_of_year(d(2024, 12, 31)), 53);
    }

    #[test]
    fn test_week_granularity_groups_and_labels() {
        let rows = daily_rows(d(2024, 1, 1), 9); // 01..09 → 第 1 周 6 天, 第 2 周 3 天
        let series = PeriodAggregator::new("es-AR").aggregate(&rows, Granularity::Week);

        assert_eq!(series.labels, vec!["Sem 1", "Sem 2"]);
        assert_eq!(series.real_incremental, vec![540.0, 270.0]);
        assert_eq!(series.real_acumulado, vec![540.0, 810.0]);
    }

    #[test]
    fn test_multiple_skus_same_day_sum_incremental() {
        let date = d(2024, 6, 3);
        let mut a = row(date, 50.0, 40.0, 500.0, 400.0);
        a.id_sku = "SKU-A".to_string();
        let mut b = row(date, 30.0, 35.0, 300.0, 310.0);
        b.id_sku = "SKU-B".to_string();

        let periods = PeriodAggregator::new("es-AR").aggregate_periods(&[a, b], Granularity::Day);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].plan_incremental, 80.0);
        assert_eq!(periods[0].real_incremental, 75.0);
        // 最近一行覆盖
        assert_eq!(periods[0].plan_acumulado, 300.0);
        assert_eq!(periods[0].real_acumulado, 310.0);
    }

    #[test]
    fn test_same_month_different_years_share_one_bucket() {
        let rows = vec![
            row(d(2023, 1, 15), 10.0, 10.0, 10.0, 10.0),
            row(d(2023, 2, 15), 5.0, 5.0, 15.0, 15.0),
            row(d(2024, 1, 15), 10.0, 10.0, 25.0, 25.0),
        ];
        let series = PeriodAggregator::new("en").aggregate(&rows, Granularity::Month);
        assert_eq!(series.labels, vec!["Jan", "Feb"]);
        assert_eq!(series.real_incremental, vec![20.0, 5.0]);
        // 累计值取最近一行
        assert_eq!(series.real_acumulado, vec![25.0, 15.0]);

        let days = PeriodAggregator::new("en").aggregate(&rows, Granularity::Day);
        assert_eq!(days.labels, vec!["15/01", "15/02"]);
        assert_eq!(days.plan_incremental, vec![20.0, 5.0]);
    }

    #[test]
    fn test_empty_input() {
        let series = PeriodAggregator::default().aggregate(&[], Granularity::Month);
        assert!(series.is_empty());
    }
}
