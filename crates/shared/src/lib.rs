//! 共享库
//!
//! 包含风控服务共用的配置、错误处理、事件模型、Kafka 与日志初始化等基础设施代码。

pub mod config;
pub mod error;
pub mod events;
pub mod kafka;
pub mod observability;
