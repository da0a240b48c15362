//! 通知错误类型

use thiserror::Error;

/// 发送层返回的底层错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 长消息切分错误（输入本身有问题，与网络无关）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    /// 单行长度达到上限，无论如何都放不进一个批次
    #[error("markdown line {index} is {len} bytes, must be less than {ceiling}")]
    LineTooLarge {
        index: usize,
        len: usize,
        ceiling: usize,
    },

    /// 需要的批次数超过上限
    #[error("markdown message needs more than {max} batches")]
    TooManyBatches { max: usize },
}

/// 通知错误
#[derive(Error, Debug)]
pub enum NotifyError {
    /// 长消息无法切分，发送前即失败
    #[error(transparent)]
    Chunk(#[from] ChunkError),

    /// 渠道发送失败
    #[error("{provider} send failed{}: {source}", batch_suffix(.batch))]
    Transport {
        provider: String,
        /// 长消息中失败的批次（从 0 开始）
        batch: Option<usize>,
        #[source]
        source: BoxError,
    },

    /// 渠道配置不完整
    #[error("{provider} is not configured{}", missing_suffix(.missing))]
    ConfigurationInvalid {
        provider: String,
        missing: Vec<&'static str>,
    },
}

fn batch_suffix(batch: &Option<usize>) -> String {
    match batch {
        Some(i) => format!(" at batch {}", i),
        None => String::new(),
    }
}

fn missing_suffix(missing: &[&'static str]) -> String {
    if missing.is_empty() {
        String::new()
    } else {
        format!(", missing {}", missing.join(", "))
    }
}

impl NotifyError {
    pub fn transport(provider: impl Into<String>, batch: Option<usize>, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            provider: provider.into(),
            batch,
            source: source.into(),
        }
    }

    /// 输入错误（切分失败），与发送失败区分
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Chunk(_))
    }

    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// 发送失败的批次
    pub fn failed_batch(&self) -> Option<usize> {
        match self {
            Self::Transport { batch, .. } => *batch,
            _ => None,
        }
    }
}
