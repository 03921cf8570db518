// ==========================================
// 生产进度看板 - HTTP 服务入口
// ==========================================

use std::sync::Arc;

use production_tracker::app::{router, AppState};
use production_tracker::config::AppConfig;
use production_tracker::sync::{parse_schedule, run_scheduled_sync};
use production_tracker::{i18n, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", production_tracker::APP_NAME, production_tracker::VERSION);
    tracing::info!("==================================================");

    let config = AppConfig::from_env()?;
    if i18n::is_supported(&config.locale) {
        i18n::set_locale(&config.locale);
    } else {
        tracing::warn!("不支持的语言 {}，使用默认语言", config.locale);
    }
    tracing::info!("使用数据库: {}", config.database_path);

    let bind_addr = config.bind_addr;
    let sync_cron = config.sync_cron.clone();
    let state = Arc::new(AppState::new(config).map_err(anyhow::Error::msg)?);

    if let Some(expr) = sync_cron {
        let schedule = parse_schedule(&expr).map_err(anyhow::Error::msg)?;
        tracing::info!(cron = %expr, "启用节假日定时同步");
        tokio::spawn(run_scheduled_sync(state.sync_job.clone(), schedule));
    }

    let app = router(state);

    tracing::info!("listening on http://{}", bind_addr);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
