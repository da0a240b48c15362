//! 进程级默认通知实例
//!
//! 库代码应当持有并传递 `&Notifier`；这里的函数只给程序入口等不方便传参的地方使用。
//! 启动时用 `init` 安装显式构建的实例，未安装时第一次使用会按 `Settings::load()` 构建。

use crate::config::Settings;
use crate::notification::{Notifier, NotifierBuilder, SendResult};
use std::fmt;
use std::sync::OnceLock;

/// 全局通知实例
static DEFAULT_NOTIFIER: OnceLock<Notifier> = OnceLock::new();

/// 安装全局实例，已经存在时原样返回传入的实例
pub fn init(notifier: Notifier) -> Result<(), Notifier> {
    DEFAULT_NOTIFIER.set(notifier)
}

/// 获取全局实例（懒加载）
pub fn notifier() -> &'static Notifier {
    DEFAULT_NOTIFIER.get_or_init(|| {
        let settings = Settings::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load notification settings, using defaults");
            Settings::default()
        });
        NotifierBuilder::from_settings(settings).build()
    })
}

/// 切换到调试模式
pub fn set_debug() {
    notifier().set_debug();
}

pub fn info(content: &str) -> SendResult {
    notifier().info(content)
}

pub fn warn(content: &str) -> SendResult {
    notifier().warn(content)
}

pub fn error(content: &str) -> SendResult {
    notifier().error(content)
}

pub fn info_long<S: AsRef<str>>(lines: &[S]) -> SendResult {
    notifier().info_long(lines)
}

pub fn warn_long<S: AsRef<str>>(lines: &[S]) -> SendResult {
    notifier().warn_long(lines)
}

pub fn error_long<S: AsRef<str>>(lines: &[S]) -> SendResult {
    notifier().error_long(lines)
}

pub fn info_fmt(args: fmt::Arguments<'_>) -> SendResult {
    notifier().info_fmt(args)
}

pub fn warn_fmt(args: fmt::Arguments<'_>) -> SendResult {
    notifier().warn_fmt(args)
}

pub fn error_fmt(args: fmt::Arguments<'_>) -> SendResult {
    notifier().error_fmt(args)
}
