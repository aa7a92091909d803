//! 入站消息确认
//!
//! 把"确认一条入站消息"抽象为 `Acknowledge` trait，确认结果以 `Result` 返回，
//! 由调用方决定如何记录，而不是静默丢弃。

use async_trait::async_trait;
use fraud_shared::kafka::OffsetAck;

use crate::error::ProcessorError;

/// 消息确认能力
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Acknowledge: Send + Sync {
    async fn ack(&self) -> Result<(), ProcessorError>;
}

/// Kafka 消息确认：存储 offset，等待下一次自动提交
#[async_trait]
impl Acknowledge for OffsetAck {
    async fn ack(&self) -> Result<(), ProcessorError> {
        self.store()
            .map_err(|e| ProcessorError::AckFailed(e.to_string()))
    }
}
