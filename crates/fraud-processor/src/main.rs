//! 交易风险路由服务
//!
//! 消费 Kafka 银行交易事件，评分后投递低风险/高风险告警。

use std::sync::Arc;

use anyhow::Result;
use fraud_processor::consumer::TransactionConsumer;
use fraud_processor::emitter::KafkaRiskEmitter;
use fraud_processor::router::TransactionRiskRouter;
use fraud_shared::{config::AppConfig, kafka::KafkaProducer, observability};
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

const SERVICE_NAME: &str = "fraud-processor";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. 加载配置，失败时使用默认值
    let (config, load_error) = match AppConfig::load(SERVICE_NAME) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::fallback(SERVICE_NAME), Some(e)),
    };

    // 2. 初始化日志
    observability::init(&config.service_name, &config.observability)?;
    if let Some(e) = load_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    info!("Starting fraud-processor...");
    info!(
        environment = %config.environment,
        brokers = %config.kafka.brokers,
        "Configuration loaded"
    );

    // 3. 出站通道
    let producer = KafkaProducer::new(&config.kafka)?;
    let low_risk = Arc::new(KafkaRiskEmitter::new(
        producer.clone(),
        &config.kafka.low_risk_topic,
    ));
    let high_risk = Arc::new(KafkaRiskEmitter::new(producer, &config.kafka.high_risk_topic));
    info!(
        low_risk_topic = %low_risk.topic(),
        high_risk_topic = %high_risk.topic(),
        "Risk emitters initialized"
    );

    // 4. 路由器与入站消费者
    let router = TransactionRiskRouter::new(low_risk, high_risk);
    let consumer = TransactionConsumer::new(&config, router)?;

    // 5. 关闭信号
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    consumer.run(shutdown_rx).await?;

    info!("Service shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
///
/// 监听 Ctrl+C 和 SIGTERM 信号，用于 Kubernetes 优雅关闭
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        }
    }
}
