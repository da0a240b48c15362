//! 企业微信群机器人渠道
//!
//! 通过 webhook 发送消息：`POST {base_url}{key}`，三个严重级别各用一个机器人 key。

use crate::config::WeworkSettings;
use crate::notification::error::BoxError;
use crate::notification::sender::{MessageKind, ProviderSender};
use crate::notification::severity::Severity;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// 企业微信 webhook 基础 URL
pub const DEFAULT_BASE_URL: &str = "https://qyapi.weixin.qq.com/cgi-bin/webhook/send?key=";

/// 默认超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// 机器人消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotMsg {
    #[serde(rename = "msgtype")]
    pub msg_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<MsgContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<MsgContent>,
}

/// 消息内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsgContent {
    pub content: String,
}

impl RobotMsg {
    pub fn new(kind: MessageKind, content: &str) -> Self {
        let body = Some(MsgContent {
            content: content.to_string(),
        });
        match kind {
            MessageKind::Text => Self {
                msg_type: kind.as_str().to_string(),
                text: body,
                markdown: None,
            },
            MessageKind::Markdown => Self {
                msg_type: kind.as_str().to_string(),
                text: None,
                markdown: body,
            },
        }
    }
}

/// 接口响应
#[derive(Debug, Deserialize)]
struct RobotReply {
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

/// 企业微信接口错误
#[derive(Error, Debug)]
pub enum WeworkError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("robot api error {code}: {message}")]
    Api { code: i64, message: String },
}

/// 企业微信机器人
#[derive(Debug)]
pub struct WeworkSender {
    client: reqwest::blocking::Client,
    base_url: String,
    info_key: String,
    warn_key: String,
    error_key: String,
}

impl WeworkSender {
    /// 根据配置创建
    pub fn new(settings: &WeworkSettings) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| anyhow!("Cannot create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            info_key: settings.info_key.clone(),
            warn_key: settings.warn_key.clone(),
            error_key: settings.error_key.clone(),
        })
    }

    /// 严重级别对应的 key
    fn key(&self, severity: Severity) -> &str {
        match severity {
            Severity::Info => &self.info_key,
            Severity::Warn => &self.warn_key,
            Severity::Error => &self.error_key,
        }
    }

    fn request(&self, key: &str, msg: &RobotMsg) -> Result<(), WeworkError> {
        let url = format!("{}{}", self.base_url, key);

        // url 里带着 key，不能出现在错误信息中
        let response = self
            .client
            .post(&url)
            .json(msg)
            .send()
            .map_err(|e| e.without_url())?;

        let status = response.status();
        let body = match response.text() {
            Ok(body) => body,
            Err(e) => {
                debug!(status = status.as_u16(), error = %e.without_url(), "Failed to read robot reply body");
                String::new()
            }
        };

        if !status.is_success() {
            return Err(WeworkError::Status {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str::<RobotReply>(&body) {
            Ok(reply) if reply.errcode != 0 => Err(WeworkError::Api {
                code: reply.errcode,
                message: reply.errmsg,
            }),
            Ok(_) => Ok(()),
            Err(e) => {
                debug!(error = %e, "Unparsable robot reply, treating as delivered");
                Ok(())
            }
        }
    }
}

impl ProviderSender for WeworkSender {
    fn name(&self) -> &str {
        "wework"
    }

    fn ready(&self) -> bool {
        self.missing_credentials().is_empty()
    }

    fn missing_credentials(&self) -> Vec<&'static str> {
        [
            ("info_key", &self.info_key),
            ("warn_key", &self.warn_key),
            ("error_key", &self.error_key),
        ]
        .into_iter()
        .filter(|(_, key)| key.is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    fn post(&self, severity: Severity, kind: MessageKind, content: &str) -> Result<(), BoxError> {
        let msg = RobotMsg::new(kind, content);
        self.request(self.key(severity), &msg).map_err(|e| {
            warn!(severity = %severity, msgtype = kind.as_str(), error = %e, "Robot message failed");
            BoxError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn settings(base_url: String) -> WeworkSettings {
        WeworkSettings {
            base_url,
            info_key: "info-key".to_string(),
            warn_key: "warn-key".to_string(),
            error_key: "error-key".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_robot_msg_text_shape() {
        let value = serde_json::to_value(RobotMsg::new(MessageKind::Text, "hello")).unwrap();
        assert_eq!(value, json!({"msgtype": "text", "text": {"content": "hello"}}));
    }

    #[test]
    fn test_robot_msg_markdown_shape() {
        let value = serde_json::to_value(RobotMsg::new(MessageKind::Markdown, "# hi\n- a")).unwrap();
        assert_eq!(value, json!({"msgtype": "markdown", "markdown": {"content": "# hi\n- a"}}));
    }

    #[test]
    fn test_ready_requires_all_keys() {
        let mut s = settings(DEFAULT_BASE_URL.to_string());
        assert!(WeworkSender::new(&s).unwrap().ready());

        s.warn_key.clear();
        let sender = WeworkSender::new(&s).unwrap();
        assert!(!sender.ready());
        assert_eq!(sender.missing_credentials(), vec!["warn_key"]);
    }

    #[test]
    fn test_empty_success_body_counts_as_delivered() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/send")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("")
            .create();

        let sender = WeworkSender::new(&settings(format!("{}/send?key=", server.url()))).unwrap();
        sender.send_info("hello").unwrap();
    }

    #[test]
    fn test_post_uses_severity_key() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/send")
            .match_query(Matcher::UrlEncoded("key".into(), "warn-key".into()))
            .match_body(Matcher::Json(json!({"msgtype": "text", "text": {"content": "disk full"}})))
            .with_status(200)
            .with_body(r#"{"errcode":0,"errmsg":"ok"}"#)
            .expect(1)
            .create();

        let sender = WeworkSender::new(&settings(format!("{}/send?key=", server.url()))).unwrap();
        sender.send_warn("disk full").unwrap();
        mock.assert();
    }

    #[test]
    fn test_long_message_posts_markdown_batches() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/send")
            .match_query(Matcher::UrlEncoded("key".into(), "error-key".into()))
            .match_body(Matcher::PartialJson(json!({"msgtype": "markdown"})))
            .with_status(200)
            .with_body(r#"{"errcode":0,"errmsg":"ok"}"#)
            .expect(2)
            .create();

        let sender = WeworkSender::new(&settings(format!("{}/send?key=", server.url()))).unwrap();
        let lines = vec!["a".repeat(3999), "b".repeat(3999)];
        assert_eq!(sender.send_error_long(&lines).unwrap(), 2);
        mock.assert();
    }

    #[test]
    fn test_api_errcode_is_failure() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/send")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"errcode":93000,"errmsg":"invalid webhook url"}"#)
            .create();

        let sender = WeworkSender::new(&settings(format!("{}/send?key=", server.url()))).unwrap();
        let err = sender.send_info("hello").unwrap_err();
        assert!(err.is_transport_error());
        assert!(err.to_string().contains("93000"));
    }

    #[test]
    fn test_http_status_is_failure() {
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("POST", "/send")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("oops")
            .create();

        let sender = WeworkSender::new(&settings(format!("{}/send?key=", server.url()))).unwrap();
        let err = sender.send_info("hello").unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_unreachable_host_does_not_leak_key() {
        let sender = WeworkSender::new(&settings("http://127.0.0.1:1/send?key=".to_string())).unwrap();
        let err = sender.send_error("hello").unwrap_err();
        assert!(err.is_transport_error());
        assert!(!err.to_string().contains("error-key"));
    }
}
