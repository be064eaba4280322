mod cli;
mod logging;
mod sink;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use accesswatch_core::config::AccesswatchConfig;
use accesswatch_core::error::{AccesswatchError, ConfigError};
use accesswatch_core::pipeline::Pipeline;
use accesswatch_detect::{MonitorConfig, MonitorPipelineBuilder};

use crate::cli::DaemonCli;
use crate::sink::TracingSink;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DaemonCli::parse();

    // 설정 로드: 파일이 없으면 기본값 + 환경변수 오버라이드로 동작
    let mut config = match AccesswatchConfig::load(&cli.config).await {
        Ok(config) => config,
        Err(AccesswatchError::Config(ConfigError::FileNotFound { path })) => {
            eprintln!("config file not found at {path}, using defaults");
            let mut config = AccesswatchConfig::default();
            config.apply_env_overrides();
            config
        }
        Err(e) => return Err(anyhow::anyhow!("failed to load configuration: {}", e)),
    };

    // CLI 인자가 최고 우선순위
    if let Some(level) = cli.log_level {
        config.general.log_level = level;
    }
    if let Some(format) = cli.log_format {
        config.general.log_format = format;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    if cli.validate {
        println!("configuration OK: {}", cli.config.display());
        return Ok(());
    }
    if cli.print_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    // 로깅 초기화
    logging::init_tracing(&config.general)?;
    tracing::info!("accesswatch-daemon starting");

    // 메트릭 설명 등록
    accesswatch_core::metrics::describe_all();

    if !config.monitor.enabled {
        tracing::warn!("monitor disabled in configuration, nothing to do");
        return Ok(());
    }

    // 모니터 파이프라인 빌드
    let monitor_config = MonitorConfig::from_core(&config.monitor);
    let mut pipeline = MonitorPipelineBuilder::new()
        .config(monitor_config)
        .sink(Arc::new(TracingSink::new()))
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build monitor pipeline: {}", e))?;

    tracing::info!("monitor pipeline initialized");

    // 파이프라인 시작
    pipeline
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("failed to start monitor pipeline: {}", e))?;
    tracing::info!("monitor pipeline started");

    // 종료 시그널 대기
    tracing::info!("accesswatch-daemon running -- monitor active");
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");

    // 우아한 종료
    if let Err(e) = pipeline.stop().await {
        tracing::error!(error = %e, "failed to stop monitor pipeline");
    }

    tracing::info!("accesswatch-daemon shut down");
    Ok(())
}
