//! 交易风险路由器
//!
//! 单条处理管道：接收交易 -> 评分 -> 分级 -> 可选地发送一个风险事件 -> 确认入站消息。
//! 路由器不持有任何可变状态，可以通过 `Arc` 在多个任务间共享。

use std::sync::Arc;

use fraud_shared::events::{BankTransaction, RiskEvent};
use tracing::{info, warn};

use crate::ack::Acknowledge;
use crate::emitter::{Delivery, RiskEventEmitter};
use crate::error::ProcessorError;
use crate::scoring::{RiskTier, calculate_fraud_score};

/// 单笔交易的路由结果
///
/// 发送结果与确认结果都显式保留：
/// - `emission` 为 `None` 表示该等级不需要发送事件
/// - `ack` 总是存在，因为确认是无条件执行的
#[derive(Debug)]
pub struct RouteOutcome {
    pub score: i32,
    pub tier: RiskTier,
    pub event: Option<RiskEvent>,
    pub emission: Option<Result<Delivery, ProcessorError>>,
    pub ack: Result<(), ProcessorError>,
}

impl RouteOutcome {
    /// 是否有事件被成功投递
    pub fn emitted(&self) -> bool {
        matches!(self.emission, Some(Ok(_)))
    }

    pub fn acked(&self) -> bool {
        self.ack.is_ok()
    }
}

/// 交易风险路由器
///
/// 两个出站通道在构造时注入，使用 trait object 避免泛型传播到消费者。
#[derive(Clone)]
pub struct TransactionRiskRouter {
    low_risk: Arc<dyn RiskEventEmitter>,
    high_risk: Arc<dyn RiskEventEmitter>,
}

impl TransactionRiskRouter {
    pub fn new(low_risk: Arc<dyn RiskEventEmitter>, high_risk: Arc<dyn RiskEventEmitter>) -> Self {
        Self {
            low_risk,
            high_risk,
        }
    }

    /// 评分并给出风险等级，不产生任何副作用
    pub fn decide(transaction: &BankTransaction) -> (i32, RiskTier) {
        let score = calculate_fraud_score(transaction.amount);
        (score, RiskTier::from_score(score))
    }

    /// 处理单笔交易
    ///
    /// 无论是否发送事件、发送是否成功，都会在最后确认一次入站消息。
    pub async fn route(
        &self,
        transaction: &BankTransaction,
        ack: &dyn Acknowledge,
    ) -> RouteOutcome {
        info!(
            account_id = %transaction.account_id,
            amount = transaction.amount,
            "收到银行交易事件"
        );

        let (score, tier) = Self::decide(transaction);

        info!(
            account_id = %transaction.account_id,
            score,
            "欺诈评分已计算"
        );

        let event = tier.to_event(&transaction.account_id);

        let emission = match &event {
            Some(event) => Some(self.emit(event).await),
            None => None,
        };

        let ack = ack.ack().await;

        RouteOutcome {
            score,
            tier,
            event,
            emission,
            ack,
        }
    }

    async fn emit(&self, event: &RiskEvent) -> Result<Delivery, ProcessorError> {
        info!(
            event = event.name(),
            account_id = %event.account_id(),
            "发送风险事件"
        );

        let emitter = match event {
            RiskEvent::LowRisk(_) => &self.low_risk,
            RiskEvent::HighRisk(_) => &self.high_risk,
        };

        let result = emitter.send(event).await;
        if let Err(e) = &result {
            warn!(
                event = event.name(),
                account_id = %event.account_id(),
                error = %e,
                "风险事件发送失败，不做重试"
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ack::MockAcknowledge;
    use crate::emitter::MockRiskEventEmitter;
    use mockall::Sequence;
    use parking_lot::Mutex;
    use std::io;

    fn delivery() -> Delivery {
        Delivery {
            partition: 0,
            offset: 7,
        }
    }

    fn unused_emitter() -> Arc<dyn RiskEventEmitter> {
        let mut emitter = MockRiskEventEmitter::new();
        emitter.expect_send().times(0);
        Arc::new(emitter)
    }

    fn ack_once() -> MockAcknowledge {
        let mut ack = MockAcknowledge::new();
        ack.expect_ack().times(1).returning(|| Ok(()));
        ack
    }

    #[tokio::test]
    async fn test_small_amount_emits_nothing() {
        let router = TransactionRiskRouter::new(unused_emitter(), unused_emitter());
        let ack = ack_once();

        let outcome = router
            .route(&BankTransaction::new("A1", 1000.0), &ack)
            .await;

        assert_eq!(outcome.score, -1);
        assert_eq!(outcome.tier, RiskTier::None);
        assert!(outcome.event.is_none());
        assert!(outcome.emission.is_none());
        assert!(outcome.acked());
    }

    #[tokio::test]
    async fn test_medium_amount_emits_low_risk_then_acks() {
        let mut seq = Sequence::new();

        let mut low = MockRiskEventEmitter::new();
        low.expect_send()
            .withf(|event| *event == RiskEvent::low_risk("A2"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(delivery()));

        let mut ack = MockAcknowledge::new();
        ack.expect_ack()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        let router = TransactionRiskRouter::new(Arc::new(low), unused_emitter());
        let outcome = router
            .route(&BankTransaction::new("A2", 5000.0), &ack)
            .await;

        assert_eq!(outcome.score, 25);
        assert_eq!(outcome.tier, RiskTier::LowRisk);
        assert_eq!(outcome.event, Some(RiskEvent::low_risk("A2")));
        assert!(outcome.emitted());
        assert!(outcome.acked());
    }

    #[tokio::test]
    async fn test_large_amount_emits_high_risk() {
        let mut high = MockRiskEventEmitter::new();
        high.expect_send()
            .withf(|event| *event == RiskEvent::high_risk("A3"))
            .times(1)
            .returning(|_| Ok(delivery()));

        let router = TransactionRiskRouter::new(unused_emitter(), Arc::new(high));
        let ack = ack_once();

        let outcome = router
            .route(&BankTransaction::new("A3", 30000.0), &ack)
            .await;

        assert_eq!(outcome.score, 75);
        assert_eq!(outcome.tier, RiskTier::HighRisk);
        assert_eq!(outcome.event, Some(RiskEvent::high_risk("A3")));
        assert!(outcome.emitted());
        assert!(outcome.acked());
    }

    #[tokio::test]
    async fn test_boundaries() {
        // 3000 不超过中额阈值
        let router = TransactionRiskRouter::new(unused_emitter(), unused_emitter());
        let outcome = router
            .route(&BankTransaction::new("B1", 3000.0), &ack_once())
            .await;
        assert_eq!(outcome.score, -1);
        assert!(outcome.event.is_none());

        // 25000 不超过高额阈值，仍走低风险通道
        let mut low = MockRiskEventEmitter::new();
        low.expect_send().times(1).returning(|_| Ok(delivery()));
        let router = TransactionRiskRouter::new(Arc::new(low), unused_emitter());
        let outcome = router
            .route(&BankTransaction::new("B2", 25000.0), &ack_once())
            .await;
        assert_eq!(outcome.score, 25);
        assert_eq!(outcome.event, Some(RiskEvent::low_risk("B2")));
    }

    #[tokio::test]
    async fn test_emit_failure_still_acks() {
        let mut high = MockRiskEventEmitter::new();
        high.expect_send().times(1).returning(|_| {
            Err(ProcessorError::EmitFailed {
                channel: "high-risk-alerts".to_string(),
                reason: "消息超时".to_string(),
            })
        });

        let router = TransactionRiskRouter::new(unused_emitter(), Arc::new(high));
        let ack = ack_once();

        let outcome = router
            .route(&BankTransaction::new("A4", 99999.0), &ack)
            .await;

        assert_eq!(outcome.event, Some(RiskEvent::high_risk("A4")));
        assert!(!outcome.emitted());
        assert!(matches!(
            outcome.emission,
            Some(Err(ProcessorError::EmitFailed { .. }))
        ));
        assert!(outcome.acked());
    }

    #[tokio::test]
    async fn test_ack_failure_is_surfaced() {
        let router = TransactionRiskRouter::new(unused_emitter(), unused_emitter());

        let mut ack = MockAcknowledge::new();
        ack.expect_ack()
            .times(1)
            .returning(|| Err(ProcessorError::AckFailed("分区已被回收".to_string())));

        let outcome = router
            .route(&BankTransaction::new("A5", 10.0), &ack)
            .await;

        assert!(!outcome.acked());
        assert!(matches!(outcome.ack, Err(ProcessorError::AckFailed(_))));
    }

    #[test]
    fn test_decide_is_pure() {
        let tx = BankTransaction::new("A6", 12345.0);
        let first = TransactionRiskRouter::decide(&tx);
        for _ in 0..10 {
            assert_eq!(TransactionRiskRouter::decide(&tx), first);
        }

        // 账户 ID 不影响结果
        let other = BankTransaction::new("", 12345.0);
        assert_eq!(TransactionRiskRouter::decide(&other), first);
    }

    /// 收集格式化日志输出的内存 writer
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn info_lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock())
                .lines()
                .filter(|line| line.contains("INFO"))
                .map(str::to_string)
                .collect()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    async fn route_with_captured_logs(amount: f64) -> Vec<String> {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::INFO)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut emitter = MockRiskEventEmitter::new();
        emitter.expect_send().returning(|_| Ok(delivery()));
        let emitter: Arc<dyn RiskEventEmitter> = Arc::new(emitter);
        let router = TransactionRiskRouter::new(emitter.clone(), emitter);

        router
            .route(&BankTransaction::new("L1", amount), &ack_once())
            .await;

        logs.info_lines()
    }

    #[tokio::test]
    async fn test_info_log_lines_per_transaction() {
        // 不发送事件时只有接收与评分两行
        let lines = route_with_captured_logs(1000.0).await;
        assert_eq!(lines.len(), 2, "{lines:?}");
        assert!(lines[0].contains("收到银行交易事件"));
        assert!(lines[1].contains("欺诈评分已计算"));
        assert!(lines.iter().all(|line| !line.contains("发送风险事件")));

        for (amount, event) in [
            (5000.0, "LowRiskAccountWasDetected"),
            (30000.0, "HighRiskAccountWasDetected"),
        ] {
            let lines = route_with_captured_logs(amount).await;
            assert_eq!(lines.len(), 3, "amount={amount} {lines:?}");
            assert!(lines[2].contains("发送风险事件"));
            assert!(lines[2].contains(event));
        }
    }
}
