//! 风险事件出站通道
//!
//! 通过 `RiskEventEmitter` trait 抽象"把事件投递到某个通道"的能力，
//! 路由器在构造时注入低风险、高风险两个通道，不直接依赖 Kafka 客户端。

use async_trait::async_trait;
use fraud_shared::events::RiskEvent;
use fraud_shared::kafka::KafkaProducer;
use tracing::debug;

use crate::error::ProcessorError;

/// 投递回执
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub partition: i32,
    pub offset: i64,
}

/// 风险事件发送器 trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RiskEventEmitter: Send + Sync {
    /// 发送单个风险事件，返回投递结果；失败时不重试
    async fn send(&self, event: &RiskEvent) -> Result<Delivery, ProcessorError>;
}

// ---------------------------------------------------------------------------
// Kafka 发送器
// ---------------------------------------------------------------------------

/// 基于 Kafka topic 的发送器
///
/// 以账户 ID 作为消息 key，同一账户的告警落在同一分区。
#[derive(Clone)]
pub struct KafkaRiskEmitter {
    producer: KafkaProducer,
    topic: String,
}

impl KafkaRiskEmitter {
    pub fn new(producer: KafkaProducer, topic: impl Into<String>) -> Self {
        Self {
            producer,
            topic: topic.into(),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[async_trait]
impl RiskEventEmitter for KafkaRiskEmitter {
    async fn send(&self, event: &RiskEvent) -> Result<Delivery, ProcessorError> {
        let (partition, offset) = self
            .producer
            .send_json(&self.topic, event.account_id(), event)
            .await
            .map_err(|e| ProcessorError::EmitFailed {
                channel: self.topic.clone(),
                reason: e.to_string(),
            })?;

        debug!(
            topic = %self.topic,
            event = event.name(),
            account_id = %event.account_id(),
            partition,
            offset,
            "风险事件已投递"
        );

        Ok(Delivery { partition, offset })
    }
}
