//! 通知分发器 - 在渠道和本地日志之间决定消息去向
//!
//! 两种模式：
//! - Live：持有一个可用渠道，消息先发到渠道，再写本地日志
//! - Debug：没有渠道，消息只写本地日志，不产生任何网络请求
//!
//! 所有发送方法都不会失败：渠道错误只记录到本地日志，并通过 `SendResult` 返回给调用方查看。

use super::chunker::LINE_SEPARATOR;
use super::error::NotifyError;
use super::logger::{LocalLogger, TracingLogger};
use super::sender::ProviderSender;
use super::severity::Severity;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// 发送结果
#[derive(Debug)]
pub enum SendResult {
    /// 已发送到渠道（长消息为批次数）
    Sent { batches: usize },
    /// 调试模式，只写了本地日志
    Logged,
    /// 渠道发送失败，已写本地日志
    Failed(NotifyError),
}

impl SendResult {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendResult::Sent { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SendResult::Failed(_))
    }

    pub fn error(&self) -> Option<&NotifyError> {
        match self {
            SendResult::Failed(e) => Some(e),
            _ => None,
        }
    }
}

struct State {
    sender: Option<Arc<dyn ProviderSender>>,
    logger: Arc<dyn LocalLogger>,
}

/// 通知分发器
pub struct Notifier {
    state: RwLock<State>,
}

impl Notifier {
    /// 创建分发器，`sender` 为 `None` 时处于调试模式
    pub fn new(sender: Option<Arc<dyn ProviderSender>>, logger: Arc<dyn LocalLogger>) -> Self {
        Self {
            state: RwLock::new(State { sender, logger }),
        }
    }

    /// 只写本地日志的分发器
    pub fn debug_only(logger: Arc<dyn LocalLogger>) -> Self {
        Self::new(None, logger)
    }

    /// 取出当前渠道和日志后立即释放锁，网络请求期间不持锁
    fn snapshot(&self) -> (Option<Arc<dyn ProviderSender>>, Arc<dyn LocalLogger>) {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        (state.sender.clone(), Arc::clone(&state.logger))
    }

    /// 是否处于调试模式
    pub fn is_debug(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .sender
            .is_none()
    }

    /// 当前渠道名称
    pub fn provider_name(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .sender
            .as_ref()
            .map(|s| s.name().to_string())
    }

    /// 切换到调试模式：丢弃渠道，换成更详细的本地日志
    ///
    /// 可重复调用。已经在发送中的消息会用原来的渠道完成。
    pub fn set_debug(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(sender) = state.sender.take() {
            info!(provider = sender.name(), "Notifier switched to debug mode");
        }
        state.logger = Arc::new(TracingLogger::development());
    }

    /// 替换本地日志
    pub fn set_logger(&self, logger: Arc<dyn LocalLogger>) {
        self.state.write().unwrap_or_else(PoisonError::into_inner).logger = logger;
    }

    /// 发送纯文本通知
    pub fn notify(&self, severity: Severity, content: &str) -> SendResult {
        let (sender, logger) = self.snapshot();
        let Some(sender) = sender else {
            logger.log(severity, content);
            return SendResult::Logged;
        };

        let result = sender.send_text(severity, content).map(|()| 1);
        Self::record(sender.as_ref(), logger.as_ref(), severity, content, result)
    }

    /// 发送 Markdown 长消息
    pub fn notify_long<S: AsRef<str>>(&self, severity: Severity, lines: &[S]) -> SendResult {
        let lines: Vec<String> = lines.iter().map(|l| l.as_ref().to_string()).collect();
        let (sender, logger) = self.snapshot();
        let Some(sender) = sender else {
            logger.log(severity, &lines.join(LINE_SEPARATOR));
            return SendResult::Logged;
        };

        let result = sender.send_long(severity, &lines);
        Self::record(sender.as_ref(), logger.as_ref(), severity, &lines.join(LINE_SEPARATOR), result)
    }

    /// 渠道结果写入本地日志：失败时先记录错误，原内容无论成败都会记录
    fn record(
        sender: &dyn ProviderSender,
        logger: &dyn LocalLogger,
        severity: Severity,
        content: &str,
        result: Result<usize, NotifyError>,
    ) -> SendResult {
        match result {
            Ok(batches) => {
                logger.log(severity, content);
                SendResult::Sent { batches }
            }
            Err(e) => {
                logger.log_failure(sender.name(), &e);
                logger.log(severity, content);
                SendResult::Failed(e)
            }
        }
    }

    pub fn info(&self, content: &str) -> SendResult {
        self.notify(Severity::Info, content)
    }

    pub fn warn(&self, content: &str) -> SendResult {
        self.notify(Severity::Warn, content)
    }

    pub fn error(&self, content: &str) -> SendResult {
        self.notify(Severity::Error, content)
    }

    pub fn info_long<S: AsRef<str>>(&self, lines: &[S]) -> SendResult {
        self.notify_long(Severity::Info, lines)
    }

    pub fn warn_long<S: AsRef<str>>(&self, lines: &[S]) -> SendResult {
        self.notify_long(Severity::Warn, lines)
    }

    pub fn error_long<S: AsRef<str>>(&self, lines: &[S]) -> SendResult {
        self.notify_long(Severity::Error, lines)
    }

    /// 格式化后发送，例如 `notifier.info_fmt(format_args!("{} done", job))`
    pub fn info_fmt(&self, args: fmt::Arguments<'_>) -> SendResult {
        self.info(&fmt::format(args))
    }

    pub fn warn_fmt(&self, args: fmt::Arguments<'_>) -> SendResult {
        self.warn(&fmt::format(args))
    }

    pub fn error_fmt(&self, args: fmt::Arguments<'_>) -> SendResult {
        self.error(&fmt::format(args))
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("provider", &self.provider_name())
            .field("debug", &self.is_debug())
            .finish()
    }
}
