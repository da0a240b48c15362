//! 通知渠道 trait 定义

use super::chunker::{chunk_with, ChunkPolicy};
use super::error::{BoxError, NotifyError};
use super::severity::Severity;
use tracing::debug;

/// 消息格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// 纯文本
    Text,
    /// Markdown
    Markdown,
}

impl MessageKind {
    /// 接口中的 msgtype
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Markdown => "markdown",
        }
    }
}

/// 通知渠道 trait
///
/// 实现方只需提供 `post`，按严重级别选择对应的 key 发出一条消息；
/// 长消息的切分和逐批发送由默认方法完成。
pub trait ProviderSender: Send + Sync {
    /// 渠道名称（用于日志）
    fn name(&self) -> &str;

    /// 凭证是否齐全
    fn ready(&self) -> bool;

    /// 缺少的凭证名称，用于配置警告
    fn missing_credentials(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// 发送一条已渲染的消息
    fn post(&self, severity: Severity, kind: MessageKind, content: &str) -> Result<(), BoxError>;

    /// 长消息切分策略
    fn chunk_policy(&self) -> ChunkPolicy {
        ChunkPolicy::default()
    }

    /// 发送纯文本消息
    fn send_text(&self, severity: Severity, content: &str) -> Result<(), NotifyError> {
        self.post(severity, MessageKind::Text, content)
            .map_err(|e| NotifyError::transport(self.name(), None, e))
    }

    /// 发送 Markdown 长消息，返回发送的批次数
    ///
    /// 先完成切分，切分失败时不会发出任何请求。批次按顺序逐个发送，
    /// 遇到第一个失败即停止，后续批次不再发送。
    fn send_long(&self, severity: Severity, lines: &[String]) -> Result<usize, NotifyError> {
        let batches = chunk_with(lines, &self.chunk_policy())?;
        let total = batches.len();

        for (index, batch) in batches.iter().enumerate() {
            self.post(severity, MessageKind::Markdown, &batch.content())
                .map_err(|e| NotifyError::transport(self.name(), Some(index), e))?;
            debug!(
                provider = self.name(),
                severity = %severity,
                batch = index,
                total,
                "Markdown batch sent"
            );
        }

        Ok(total)
    }

    /// 一般通知
    fn send_info(&self, content: &str) -> Result<(), NotifyError> {
        self.send_text(Severity::Info, content)
    }

    /// 重要通知
    fn send_warn(&self, content: &str) -> Result<(), NotifyError> {
        self.send_text(Severity::Warn, content)
    }

    /// 出错通知
    fn send_error(&self, content: &str) -> Result<(), NotifyError> {
        self.send_text(Severity::Error, content)
    }

    fn send_info_long(&self, lines: &[String]) -> Result<usize, NotifyError> {
        self.send_long(Severity::Info, lines)
    }

    fn send_warn_long(&self, lines: &[String]) -> Result<usize, NotifyError> {
        self.send_long(Severity::Warn, lines)
    }

    fn send_error_long(&self, lines: &[String]) -> Result<usize, NotifyError> {
        self.send_long(Severity::Error, lines)
    }
}

impl std::fmt::Debug for dyn ProviderSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSender")
            .field("name", &self.name())
            .field("ready", &self.ready())
            .finish()
    }
}
