//! 通知系统构建器 - 根据配置决定 Live 还是 Debug 模式

use super::channels::wework::WeworkSender;
use super::dispatcher::Notifier;
use super::error::NotifyError;
use super::logger::{LocalLogger, TracingLogger};
use super::sender::ProviderSender;
use crate::config::{ProviderKind, Settings};
use std::sync::Arc;
use tracing::info;

/// 通知系统构建器
pub struct NotifierBuilder {
    settings: Settings,
    logger: Option<Arc<dyn LocalLogger>>,
    sender: Option<Arc<dyn ProviderSender>>,
}

impl NotifierBuilder {
    pub fn new() -> Self {
        Self::from_settings(Settings::default())
    }

    pub fn from_settings(settings: Settings) -> Self {
        Self {
            settings,
            logger: None,
            sender: None,
        }
    }

    /// 设置本地日志（默认 `TracingLogger::production()`）
    pub fn logger(mut self, logger: Arc<dyn LocalLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// 使用自定义渠道，代替配置中选择的渠道
    pub fn sender(mut self, sender: Arc<dyn ProviderSender>) -> Self {
        self.sender = Some(sender);
        self
    }

    /// 设置调试模式
    pub fn debug(mut self, debug: bool) -> Self {
        self.settings.debug = debug;
        self
    }

    /// 构建 Notifier
    ///
    /// 渠道未就绪时进入调试模式，并通过日志发出一次配置警告。
    pub fn build(self) -> Notifier {
        if self.settings.debug {
            let logger = self
                .logger
                .unwrap_or_else(|| Arc::new(TracingLogger::development()));
            info!("Notifier started in debug mode");
            return Notifier::debug_only(logger);
        }

        let logger = self
            .logger
            .unwrap_or_else(|| Arc::new(TracingLogger::production()));

        let sender = match self.sender {
            Some(sender) => sender,
            None => match Self::provider(&self.settings) {
                Ok(sender) => sender,
                Err(e) => {
                    logger.log_failure(self.settings.provider.as_str(), &e);
                    return Notifier::debug_only(logger);
                }
            },
        };

        if !sender.ready() {
            logger.log_configuration(&NotifyError::ConfigurationInvalid {
                provider: sender.name().to_string(),
                missing: sender.missing_credentials(),
            });
            return Notifier::debug_only(logger);
        }

        info!(provider = sender.name(), "Notifier ready");
        Notifier::new(Some(sender), logger)
    }

    /// 按配置创建渠道
    fn provider(settings: &Settings) -> Result<Arc<dyn ProviderSender>, NotifyError> {
        match settings.provider {
            ProviderKind::Wework => WeworkSender::new(&settings.wework)
                .map(|s| Arc::new(s) as Arc<dyn ProviderSender>)
                .map_err(|e| NotifyError::transport(ProviderKind::Wework.as_str(), None, e)),
        }
    }
}

impl Default for NotifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}
