//! Kafka 消费者与交易分发
//!
//! 将 Kafka 消息解码为银行交易事件后交给 TransactionRiskRouter。
//! 本模块是路由器的宿主：解码、发送、确认中出现的错误都在这里记录，
//! 不重试、不投递死信，消费循环继续处理下一条消息。

use fraud_shared::config::AppConfig;
use fraud_shared::events::BankTransaction;
use fraud_shared::kafka::{ConsumerMessage, KafkaConsumer};
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::ack::Acknowledge;
use crate::error::ProcessorError;
use crate::router::{RouteOutcome, TransactionRiskRouter};

/// 交易事件消费者
///
/// 组合 KafkaConsumer（消息拉取）和 TransactionRiskRouter（评分与路由）。
pub struct TransactionConsumer {
    consumer: KafkaConsumer,
    router: TransactionRiskRouter,
    topic: String,
}

impl TransactionConsumer {
    pub fn new(config: &AppConfig, router: TransactionRiskRouter) -> Result<Self, ProcessorError> {
        let consumer = KafkaConsumer::new(&config.kafka)?;
        Ok(Self {
            consumer,
            router,
            topic: config.kafka.transaction_topic.clone(),
        })
    }

    /// 启动消费循环，直到收到 shutdown 信号
    pub async fn run(self, shutdown: watch::Receiver<bool>) -> Result<(), ProcessorError> {
        self.consumer.subscribe(&[self.topic.as_str()])?;

        info!(topic = %self.topic, "银行交易消费者已启动");

        let router = self.router;

        self.consumer
            .start(shutdown, |msg, ack| {
                let router = &router;
                async move {
                    match handle_message(router, &msg, &ack).await {
                        Ok(outcome) => report_outcome(&msg, &outcome),
                        Err(e) => {
                            error!(
                                error = %e,
                                code = e.code(),
                                topic = %msg.topic,
                                partition = msg.partition,
                                offset = msg.offset,
                                "处理银行交易事件失败"
                            );
                        }
                    }
                    Ok(())
                }
            })
            .await;

        info!("银行交易消费者已停止");
        Ok(())
    }
}

/// 处理单条 Kafka 消息
///
/// 拆分为独立函数，便于在测试中直接调用而无需构造完整的 Consumer。
/// 负载无法解析时直接返回错误且不确认，该 offset 会随同分区后续消息的确认一起越过。
pub async fn handle_message(
    router: &TransactionRiskRouter,
    msg: &ConsumerMessage,
    ack: &dyn Acknowledge,
) -> Result<RouteOutcome, ProcessorError> {
    let transaction: BankTransaction = msg.deserialize_payload().map_err(|e| {
        warn!(
            error = %e,
            offset = msg.offset,
            "银行交易事件反序列化失败"
        );
        ProcessorError::DeserializationFailed(e.to_string())
    })?;

    Ok(router.route(&transaction, ack).await)
}

/// 记录路由结果中的失败部分；成功路径已由路由器输出日志
fn report_outcome(msg: &ConsumerMessage, outcome: &RouteOutcome) {
    if let Some(Err(e)) = &outcome.emission {
        error!(
            error = %e,
            code = e.code(),
            tier = %outcome.tier,
            partition = msg.partition,
            offset = msg.offset,
            "风险事件未能投递"
        );
    }

    if let Err(e) = &outcome.ack {
        error!(
            error = %e,
            code = e.code(),
            partition = msg.partition,
            offset = msg.offset,
            "入站消息确认失败"
        );
    }
}
