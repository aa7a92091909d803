//! 统一错误处理模块
//!
//! 定义风控服务共享的错误类型，使用 thiserror 提供良好的错误信息。

use thiserror::Error;

/// 系统错误类型
#[derive(Debug, Error)]
pub enum FraudError {
    // ==================== Kafka 错误 ====================
    #[error("Kafka 错误: {0}")]
    Kafka(String),

    // ==================== 配置错误 ====================
    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),

    // ==================== 序列化错误 ====================
    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FraudError {
    /// 获取错误码，随错误日志一起输出便于检索
    pub fn code(&self) -> &'static str {
        match self {
            Self::Kafka(_) => "KAFKA_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = FraudError::Kafka("broker 不可达".to_string());
        assert_eq!(err.code(), "KAFKA_ERROR");
        assert_eq!(err.to_string(), "Kafka 错误: broker 不可达");

        let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = FraudError::from(serde_err);
        assert_eq!(err.code(), "SERIALIZATION_ERROR");

        let err = FraudError::from(config::ConfigError::NotFound("kafka.brokers".to_string()));
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}
