//! 日志初始化模块
//!
//! 所有服务通过单一入口点配置日志输出，确保一致的格式与过滤规则。
//! 仅输出日志，不导出指标与分布式追踪。

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::ObservabilityConfig;

/// 构建环境过滤器
///
/// RUST_LOG 优先，其次是配置中的日志级别，两者都无效时回落到 info。
pub fn build_env_filter(config: &ObservabilityConfig) -> EnvFilter {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    resolve_env_filter(rust_log.as_deref(), &config.log_level)
}

fn resolve_env_filter(rust_log: Option<&str>, log_level: &str) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(log_level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// 初始化全局日志订阅者
///
/// 重复调用会返回错误（全局订阅者只能设置一次）。
pub fn init(service_name: &str, config: &ObservabilityConfig) -> Result<()> {
    let env_filter = build_env_filter(config);

    let fmt_layer = if config.json_logs() {
        fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    info!(
        service = %service_name,
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Logging initialized"
    );

    Ok(())
}
