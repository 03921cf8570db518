// ==========================================
// 生产进度看板 - 节假日同步定时器
// ==========================================
// 表达式: cron 6 字段（秒 分 时 日 月 周），如 "0 0 3 * * *"
// 说明: 仅在配置 SYNC_CRON 时启用；失败不重试，等下一次触发
// ==========================================

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use cron::Schedule;

use crate::sync::holiday_sync::HolidaySyncJob;

/// 解析 cron 表达式
pub fn parse_schedule(expr: &str) -> Result<Schedule, String> {
    Schedule::from_str(expr.trim()).map_err(|e| format!("无效的 cron 表达式 '{}': {}", expr, e))
}

/// 距离下一次触发的等待时长（无后续触发时返回 None）
pub fn next_delay(schedule: &Schedule) -> Option<Duration> {
    let now = Local::now();
    let next = schedule.after(&now).next()?;
    (next - now).to_std().ok().or(Some(Duration::ZERO))
}

/// 定时运行同步任务（常驻）
pub async fn run_scheduled_sync(job: Arc<HolidaySyncJob>, schedule: Schedule) {
    tracing::info!("节假日同步定时器已启动");

    loop {
        let Some(delay) = next_delay(&schedule) else {
            tracing::warn!("cron 表达式没有后续触发时间，定时器退出");
            return;
        };
        tracing::debug!(wait_secs = delay.as_secs(), "等待下一次节假日同步");
        tokio::time::sleep(delay).await;

        run_tick(&job).await;
    }
}

/// 单次触发；返回是否成功
async fn run_tick(job: &HolidaySyncJob) -> bool {
    // 失败详情已由任务写入日志与 sync_run_log
    match job.run().await {
        Ok(_) => true,
        Err(e) => {
            tracing::debug!(error = %e, "定时同步本轮失败，等待下一次触发");
            false
        }
    }
}
