//! 交易风险路由服务
//!
//! 消费 Kafka 中的银行交易事件，按固定金额阈值计算欺诈评分，
//! 再按评分把交易路由到低风险或高风险告警通道（至多一个），最后无条件确认入站消息。
//! 每笔交易独立、无状态地处理，不保留任何跨消息的数据。

pub mod ack;
pub mod consumer;
pub mod emitter;
pub mod error;
pub mod router;
pub mod scoring;

pub use ack::Acknowledge;
pub use emitter::{Delivery, KafkaRiskEmitter, RiskEventEmitter};
pub use error::ProcessorError;
pub use router::{RouteOutcome, TransactionRiskRouter};
pub use scoring::{RiskTier, calculate_fraud_score};
