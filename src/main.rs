// ==========================================
// 考勤表客户端 - 命令行主入口
// ==========================================

use anyhow::{Context, Result};
use attendance_sheets::app::{run, AppState, Cli};
use attendance_sheets::config::ClientConfig;
use attendance_sheets::{i18n, logging};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    let config = ClientConfig::from_env();
    let locale = i18n::set_locale(&config.locale);
    tracing::info!(version = attendance_sheets::VERSION, locale, "{} 启动", attendance_sheets::APP_NAME);

    let state = AppState::new(config)
        .map_err(anyhow::Error::msg)
        .context("无法初始化AppState")?;

    if let Err(e) = run(&state, cli.command).await {
        tracing::debug!(error = ?e, "命令执行失败");
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}
