//! 通知抽象层 - 按严重级别发送通知，渠道不可用时回退到本地日志
//!
//! # 设计目标
//! 1. 统一接口：渠道实现 `ProviderSender` trait，本地日志实现 `LocalLogger` trait
//! 2. 不影响调用方：发送失败只记录日志，不返回错误
//! 3. 长消息自动切分：Markdown 消息按批次发送，单批不超过 4000 字节，最多 5 批
//!
//! # 使用示例
//! ```ignore
//! use noti::config::Settings;
//! use noti::notification::NotifierBuilder;
//!
//! let notifier = NotifierBuilder::from_settings(Settings::load()?).build();
//! notifier.warn("磁盘空间不足");
//! notifier.error_long(&["# 任务失败", "- 原因：超时"]);
//! ```

pub mod builder;
pub mod channels;
pub mod chunker;
pub mod dispatcher;
pub mod error;
pub mod logger;
pub mod sender;
pub mod severity;

pub use builder::NotifierBuilder;
pub use chunker::{chunk, chunk_with, Batch, ChunkPolicy};
pub use dispatcher::{Notifier, SendResult};
pub use error::{BoxError, ChunkError, NotifyError};
pub use logger::{LocalLogger, TracingLogger};
pub use sender::{MessageKind, ProviderSender};
pub use severity::Severity;
