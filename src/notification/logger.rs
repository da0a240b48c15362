//! 本地日志 - 所有通知都会在本地留一份记录

use super::error::NotifyError;
use super::severity::Severity;
use tracing::{debug, error, info, warn};

/// 本地日志 trait
pub trait LocalLogger: Send + Sync {
    /// 按严重级别记录一条通知
    fn log(&self, severity: Severity, message: &str);

    /// 记录渠道发送失败
    fn log_failure(&self, provider: &str, err: &NotifyError) {
        self.log(
            Severity::Error,
            &format!("{} notification failed: {}", provider, err),
        );
    }

    /// 记录配置问题（构造时最多一次）
    fn log_configuration(&self, err: &NotifyError) {
        self.log(Severity::Warn, &format!("notification falls back to local log: {}", err));
    }
}

/// 基于 tracing 的本地日志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TracingLogger {
    verbose: bool,
}

impl TracingLogger {
    /// 生产环境日志
    pub fn production() -> Self {
        Self { verbose: false }
    }

    /// 调试模式日志，额外输出每条消息的大小
    pub fn development() -> Self {
        Self { verbose: true }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

impl LocalLogger for TracingLogger {
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => info!(target: "noti", "{}", message),
            Severity::Warn => warn!(target: "noti", "{}", message),
            Severity::Error => error!(target: "noti", "{}", message),
        }

        if self.verbose {
            debug!(
                target: "noti",
                severity = %severity,
                bytes = message.len(),
                lines = message.lines().count(),
                "Notification recorded locally"
            );
        }
    }

    fn log_failure(&self, provider: &str, err: &NotifyError) {
        error!(
            target: "noti",
            provider = %provider,
            batch = ?err.failed_batch(),
            error = %err,
            "Notification send failed"
        );
    }

    fn log_configuration(&self, err: &NotifyError) {
        warn!(target: "noti", error = %err, "Notification provider not ready, using local log only");
    }
}
