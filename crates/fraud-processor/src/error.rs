//! 风险路由服务专用错误类型
//!
//! 在共享库 FraudError 基础上定义本服务特有的错误变体。
//! 这些错误只用于分类和日志，路由本身不会据此重试或拒绝确认。

use fraud_shared::error::FraudError;

/// 风险路由错误
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    /// 入站负载无法解析为交易事件，交给宿主消费循环记录
    #[error("交易事件反序列化失败: {0}")]
    DeserializationFailed(String),

    /// 出站通道投递失败
    #[error("风险事件发送失败: 通道={channel}, 原因={reason}")]
    EmitFailed { channel: String, reason: String },

    /// 入站消息确认失败
    #[error("消息确认失败: {0}")]
    AckFailed(String),

    #[error(transparent)]
    Shared(#[from] FraudError),
}

impl ProcessorError {
    /// 获取错误码，共享库错误透传其自身的错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::DeserializationFailed(_) => "DESERIALIZATION_FAILED",
            Self::EmitFailed { .. } => "EMIT_FAILED",
            Self::AckFailed(_) => "ACK_FAILED",
            Self::Shared(e) => e.code(),
        }
    }
}
