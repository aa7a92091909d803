//! 事件模型
//!
//! 定义入站的银行交易事件，以及两类出站风险告警事件。
//! 线上格式统一使用 camelCase JSON，与上下游生产者保持一致。

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BankTransaction: 入站交易事件
// ---------------------------------------------------------------------------

/// 银行交易事件
///
/// 由上游生产者构造，消费一次后即丢弃。账户 ID 非空、金额非负由上游约定保证，
/// 这里不做校验，任何值都会按同样的规则评分。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankTransaction {
    pub account_id: String,
    pub amount: f64,
}

impl BankTransaction {
    pub fn new(account_id: impl Into<String>, amount: f64) -> Self {
        Self {
            account_id: account_id.into(),
            amount,
        }
    }
}

// ---------------------------------------------------------------------------
// 出站风险事件
// ---------------------------------------------------------------------------

/// 低风险账户告警
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowRiskAccountWasDetected {
    pub account_id: String,
}

/// 高风险账户告警
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HighRiskAccountWasDetected {
    pub account_id: String,
}

/// 风险事件
///
/// 两个变体互斥，每笔交易至多产生一个。序列化时只输出内部载荷
/// （`{"accountId": "..."}`），事件类别由投递的 topic 区分。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RiskEvent {
    LowRisk(LowRiskAccountWasDetected),
    HighRisk(HighRiskAccountWasDetected),
}

impl RiskEvent {
    pub fn low_risk(account_id: impl Into<String>) -> Self {
        Self::LowRisk(LowRiskAccountWasDetected {
            account_id: account_id.into(),
        })
    }

    pub fn high_risk(account_id: impl Into<String>) -> Self {
        Self::HighRisk(HighRiskAccountWasDetected {
            account_id: account_id.into(),
        })
    }

    /// 事件名，用于日志
    pub fn name(&self) -> &'static str {
        match self {
            Self::LowRisk(_) => "LowRiskAccountWasDetected",
            Self::HighRisk(_) => "HighRiskAccountWasDetected",
        }
    }

    pub fn account_id(&self) -> &str {
        match self {
            Self::LowRisk(e) => &e.account_id,
            Self::HighRisk(e) => &e.account_id,
        }
    }
}

impl std::fmt::Display for RiskEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name(), self.account_id())
    }
}
