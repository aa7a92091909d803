//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。
//! 风险阈值是固定常量，不属于配置范围；这里只承载通道标识与运行时参数。

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::kafka::topics;

/// Kafka 配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KafkaConfig {
    pub brokers: String,
    pub consumer_group: String,
    pub auto_offset_reset: String,
    /// 入站交易通道
    pub transaction_topic: String,
    /// 低风险告警出站通道
    pub low_risk_topic: String,
    /// 高风险告警出站通道
    pub high_risk_topic: String,
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: "localhost:9092".to_string(),
            consumer_group: "fraud-processor".to_string(),
            auto_offset_reset: "earliest".to_string(),
            transaction_topic: topics::BANK_TRANSACTIONS.to_string(),
            low_risk_topic: topics::LOW_RISK_ALERTS.to_string(),
            high_risk_topic: topics::HIGH_RISK_ALERTS.to_string(),
        }
    }
}

/// 可观测性配置
///
/// 只包含日志相关项，不导出指标与分布式追踪。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// 日志输出格式：json（结构化）或 pretty（人类可读）
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl ObservabilityConfig {
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub kafka: KafkaConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. .env 文件（若存在，仅注入环境变量）
    /// 2. config/default.toml（默认配置）
    /// 3. config/{environment}.toml（环境特定配置）
    /// 4. config/{service_name}.toml（服务特定配置）
    /// 5. 环境变量（FRAUD_ 前缀，双下划线分隔层级，如 FRAUD_KAFKA__BROKERS -> kafka.brokers）
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        file_sources(service_name, &current_environment(), Path::new(&config_dir))?
            .add_source(
                Environment::with_prefix("FRAUD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 配置加载失败时使用的兜底配置
    ///
    /// 服务名与运行环境的取值方式与 `load` 一致，其余字段使用默认值。
    pub fn fallback(service_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
            environment: current_environment(),
            ..Self::default()
        }
    }
}

/// 当前运行环境，由 FRAUD_ENV 指定
fn current_environment() -> String {
    std::env::var("FRAUD_ENV").unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string())
}

const DEFAULT_ENVIRONMENT: &str = "development";

/// 按覆盖顺序叠加配置文件源，所有文件都是可选的
fn file_sources(
    service_name: &str,
    env: &str,
    config_dir: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(Config::builder()
        .set_default("service_name", service_name)?
        .set_default("environment", env)?
        .add_source(File::from(config_dir.join("default.toml")).required(false))
        .add_source(File::from(config_dir.join(format!("{env}.toml"))).required(false))
        .add_source(File::from(config_dir.join(format!("{service_name}.toml"))).required(false)))
}
