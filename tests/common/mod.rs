//! 集成测试共用的 mock 渠道和日志

#![allow(dead_code)]

use noti::notification::BoxError;
use noti::{LocalLogger, MessageKind, ProviderSender, Severity};
use std::collections::HashSet;
use std::sync::Mutex;

/// 记录每次 post 的渠道，可以指定第几次调用失败（从 0 开始）
pub struct RecordingSender {
    pub posts: Mutex<Vec<(Severity, MessageKind, String)>>,
    fail_on: HashSet<usize>,
    ready: bool,
    missing: Vec<&'static str>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            fail_on: HashSet::new(),
            ready: true,
            missing: Vec::new(),
        }
    }

    pub fn failing_on(calls: &[usize]) -> Self {
        Self {
            fail_on: calls.iter().copied().collect(),
            ..Self::new()
        }
    }

    pub fn not_ready() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }

    /// 未就绪，并报告缺少的凭证
    pub fn missing(credentials: &[&'static str]) -> Self {
        Self {
            ready: false,
            missing: credentials.to_vec(),
            ..Self::new()
        }
    }

    pub fn post_count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }

    pub fn contents(&self) -> Vec<String> {
        self.posts.lock().unwrap().iter().map(|(_, _, c)| c.clone()).collect()
    }
}

impl ProviderSender for RecordingSender {
    fn name(&self) -> &str {
        "recording"
    }

    fn ready(&self) -> bool {
        self.ready
    }

    fn missing_credentials(&self) -> Vec<&'static str> {
        self.missing.clone()
    }

    fn post(&self, severity: Severity, kind: MessageKind, content: &str) -> Result<(), BoxError> {
        let mut posts = self.posts.lock().unwrap();
        let call = posts.len();
        posts.push((severity, kind, content.to_string()));
        if self.fail_on.contains(&call) {
            return Err(format!("call {} rejected", call).into());
        }
        Ok(())
    }
}

/// 记录所有日志的本地日志
#[derive(Default)]
pub struct RecordingLogger {
    pub records: Mutex<Vec<(Severity, String)>>,
}

impl RecordingLogger {
    pub fn records(&self) -> Vec<(Severity, String)> {
        self.records.lock().unwrap().clone()
    }

    pub fn count_at(&self, severity: Severity) -> usize {
        self.records.lock().unwrap().iter().filter(|(s, _)| *s == severity).count()
    }
}

impl LocalLogger for RecordingLogger {
    fn log(&self, severity: Severity, message: &str) {
        self.records.lock().unwrap().push((severity, message.to_string()));
    }
}

/// n 行、每行 3000 字节的长消息，每行单独成一批
pub fn batch_sized_lines(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{:04}{}", i, "x".repeat(2996))).collect()
}
