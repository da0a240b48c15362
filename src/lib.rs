//! noti - 按严重级别发送企业微信机器人通知，未配置时回退到本地日志

pub mod config;
pub mod global;
pub mod notification;

pub use config::{ProviderKind, Settings, WeworkSettings};
pub use notification::{
    chunk, Batch, ChunkError, LocalLogger, MessageKind, Notifier, NotifierBuilder, NotifyError,
    ProviderSender, SendResult, Severity, TracingLogger,
};
