//! # Config 模块
//!
//! 宿主配置管理，集中管理所有配置项。
//!
//! ## 配置优先级
//!
//! 1. 命令行参数（最高）
//! 2. 配置文件 (config.json)
//! 3. 默认值（最低）

use std::fs;
use std::path::Path;
use std::str::FromStr;

use calc_core::ReplyStyle;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// 单条指令的最大字符数
    #[serde(default = "default_max_input_len")]
    pub max_input_len: usize,

    /// 交互模式提示符
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// 回复配置
    #[serde(default)]
    pub reply: ReplyConfig,
}

/// 回复配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyConfig {
    /// 成功时的标题
    #[serde(default = "default_answer_title")]
    pub answer_title: String,

    /// 失败时的标题
    #[serde(default = "default_error_title")]
    pub error_title: String,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            answer_title: default_answer_title(),
            error_title: default_error_title(),
        }
    }
}

// 默认值函数
fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_input_len() -> usize {
    500
}

fn default_prompt() -> String {
    "calc> ".to_string()
}

fn default_answer_title() -> String {
    ReplyStyle::default().answer_title
}

fn default_error_title() -> String {
    ReplyStyle::default().error_title
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            max_input_len: default_max_input_len(),
            prompt: default_prompt(),
            reply: ReplyConfig::default(),
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并打印警告。
    /// 此时日志尚未初始化，所以直接写 stderr。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match Self::from_json(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("⚠️ 配置文件解析失败: {}，使用默认配置", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("⚠️ 配置文件读取失败: {}，使用默认配置", e);
                Self::default()
            }
        }
    }

    /// 从 JSON 文本解析配置
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level()?;

        if self.max_input_len == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_input_len 必须大于 0".to_string(),
            ));
        }

        Ok(())
    }

    /// 解析日志级别
    pub fn level(&self) -> Result<Level, ConfigError> {
        Level::from_str(&self.log_level).map_err(|_| {
            ConfigError::ValidationFailed(format!("无效的日志级别: '{}'", self.log_level))
        })
    }

    /// 回复标题
    pub fn reply_style(&self) -> ReplyStyle {
        ReplyStyle {
            answer_title: self.reply.answer_title.clone(),
            error_title: self.reply.error_title.clone(),
        }
    }
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 解析失败
    #[error("配置解析失败: {0}")]
    ParseFailed(String),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    ValidationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_input_len, 500);
        assert_eq!(config.reply_style(), ReplyStyle::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            AppConfig::from_json(r#"{ "log_level": "debug", "reply": { "answer_title": "Calc" } }"#)
                .unwrap();
        assert_eq!(config.level(), Ok(Level::DEBUG));
        assert_eq!(config.max_input_len, 500);
        assert_eq!(config.reply.answer_title, "Calc");
        assert_eq!(config.reply.error_title, ReplyStyle::default().error_title);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            AppConfig::from_json("{ not json"),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = AppConfig {
            log_level: "loud".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ValidationFailed(
                "无效的日志级别: 'loud'".to_string()
            ))
        );

        let config = AppConfig {
            max_input_len: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_gives_default() {
        let config = AppConfig::load("definitely/not/here/config.json");
        assert_eq!(config.prompt, "calc> ");
    }
}
