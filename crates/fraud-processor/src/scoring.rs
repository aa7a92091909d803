//! 欺诈评分与风险分级
//!
//! 评分只依赖交易金额，分级只依赖评分，两者都是纯函数。
//!
//! 评分档位（-1 / 25 / 75）与分级阈值（20 / 50）是两组独立常量：
//! 实际可达的评分只有三个，`score <= 20` 只会被 -1 命中，
//! `20 < score <= 50` 只会被 25 命中。保持这些常量原样，不做"合并简化"。

use fraud_shared::events::RiskEvent;

/// 金额超过该值评为高分
pub const HIGH_AMOUNT_THRESHOLD: f64 = 25_000.0;
/// 金额超过该值（且未超过高额阈值）评为中分
pub const MEDIUM_AMOUNT_THRESHOLD: f64 = 3_000.0;

pub const HIGH_AMOUNT_SCORE: i32 = 75;
pub const MEDIUM_AMOUNT_SCORE: i32 = 25;
pub const LOW_AMOUNT_SCORE: i32 = -1;

/// 评分超过该值路由到高风险通道
pub const HIGH_RISK_CUTOFF: i32 = 50;
/// 评分超过该值（且未超过高风险阈值）路由到低风险通道
pub const LOW_RISK_CUTOFF: i32 = 20;

/// 按金额计算欺诈评分
///
/// | 条件 | 评分 |
/// |---|---|
/// | amount > 25000 | 75 |
/// | 3000 < amount <= 25000 | 25 |
/// | amount <= 3000 | -1 |
///
/// 不校验金额符号；NaN 两个比较都不成立，落到 -1。
pub fn calculate_fraud_score(amount: f64) -> i32 {
    if amount > HIGH_AMOUNT_THRESHOLD {
        HIGH_AMOUNT_SCORE
    } else if amount > MEDIUM_AMOUNT_THRESHOLD {
        MEDIUM_AMOUNT_SCORE
    } else {
        LOW_AMOUNT_SCORE
    }
}

/// 风险等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskTier {
    /// 不发送任何事件
    None,
    LowRisk,
    HighRisk,
}

impl RiskTier {
    /// 由评分决定风险等级
    pub fn from_score(score: i32) -> Self {
        if score > HIGH_RISK_CUTOFF {
            RiskTier::HighRisk
        } else if score > LOW_RISK_CUTOFF {
            RiskTier::LowRisk
        } else {
            RiskTier::None
        }
    }

    /// 为该等级构造出站事件，`None` 等级不产生事件
    pub fn to_event(self, account_id: &str) -> Option<RiskEvent> {
        match self {
            RiskTier::None => None,
            RiskTier::LowRisk => Some(RiskEvent::low_risk(account_id)),
            RiskTier::HighRisk => Some(RiskEvent::high_risk(account_id)),
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskTier::None => "NONE",
            RiskTier::LowRisk => "LOW_RISK",
            RiskTier::HighRisk => "HIGH_RISK",
        };
        write!(f, "{s}")
    }
}
