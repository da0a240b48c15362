//! 通知配置
//!
//! 读取顺序（后者覆盖前者）：
//! 1. 默认值
//! 2. 配置文件 `~/.config/noti/config.json`（JSON 格式）
//! 3. 环境变量 `APP_DEBUG`、`NOTI_PROVIDER`、`IM_INFO_KEY`、`IM_WARN_KEY`、`IM_ERROR_KEY`、
//!    `IM_BASE_URL`、`IM_TIMEOUT_SECS`
//!
//! 环境变量需要在进程启动前设置，值为空时不覆盖。

use crate::notification::channels::wework::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// 通知渠道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// 企业微信群机器人
    #[default]
    Wework,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Wework => "wework",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "wework" | "wecom" => Ok(ProviderKind::Wework),
            other => Err(anyhow!("unknown notification provider '{}'", other)),
        }
    }
}

/// 企业微信机器人配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeworkSettings {
    /// webhook 基础 URL，key 直接拼接在后面
    pub base_url: String,
    /// 一般通知机器人 key
    pub info_key: String,
    /// 重要通知机器人 key
    pub warn_key: String,
    /// 出错通知机器人 key
    pub error_key: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

impl Default for WeworkSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            info_key: String::new(),
            warn_key: String::new(),
            error_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// 通知配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 调试模式：只写本地日志
    pub debug: bool,
    /// 使用的渠道
    pub provider: ProviderKind,
    /// 企业微信配置
    pub wework: WeworkSettings,
}

impl Settings {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/noti/config.json"))
    }

    /// 从默认配置文件和环境变量加载
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path().as_deref())
    }

    /// 从指定配置文件和环境变量加载
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        Self::from_sources(path, |name| std::env::var(name).ok())
    }

    /// 按顺序合并默认值、配置文件和环境变量
    ///
    /// 配置文件不存在时跳过；存在但无法解析时报错。
    pub fn from_sources<F>(path: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match path {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                let settings: Settings = serde_json::from_str(&content)
                    .with_context(|| format!("Invalid config file {}", path.display()))?;
                debug!(path = %path.display(), "Loaded notification config file");
                settings
            }
            _ => Settings::default(),
        };

        settings.apply_env(env)?;
        Ok(settings)
    }

    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| env(name).filter(|v| !v.is_empty());

        // APP_DEBUG 只能打开调试模式，不会关掉配置文件里的 debug
        if var("APP_DEBUG").is_some_and(|v| parse_debug_flag(&v)) {
            self.debug = true;
        }
        if let Some(value) = var("NOTI_PROVIDER") {
            self.provider = value.parse()?;
        }
        if let Some(value) = var("IM_INFO_KEY") {
            self.wework.info_key = value;
        }
        if let Some(value) = var("IM_WARN_KEY") {
            self.wework.warn_key = value;
        }
        if let Some(value) = var("IM_ERROR_KEY") {
            self.wework.error_key = value;
        }
        if let Some(value) = var("IM_BASE_URL") {
            self.wework.base_url = value;
        }
        if let Some(value) = var("IM_TIMEOUT_SECS") {
            self.wework.timeout_secs = value
                .trim()
                .parse()
                .with_context(|| format!("IM_TIMEOUT_SECS must be a number of seconds, got '{}'", value))?;
        }
        Ok(())
    }
}

/// `true`、`TRUE`、`True`、`1` 视为开启
fn parse_debug_flag(value: &str) -> bool {
    matches!(value, "true" | "TRUE" | "True" | "1")
}
