//! # Command 模块
//!
//! 计算器指令：把用户输入拆成表达式和变量赋值，求值并生成回复。
//!
//! ## 输入格式
//!
//! ```text
//! (a + b) / c, a = 1, b=2,c = 3
//! ```
//!
//! 第一个逗号前是表达式，其余每段是一个 `名字=值` 赋值（段内空格会被去掉）。

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{CalcResult, CommandError, EvalError};
use crate::eval::{Environment, evaluate_in};
use crate::number::Number;

/// 解析后的计算请求
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalcRequest {
    /// 表达式原文（不去除首尾空白，错误偏移量以它为准）
    pub expression: String,
    /// 变量绑定，同名赋值以最后一次为准
    pub bindings: BTreeMap<String, f64>,
}

impl CalcRequest {
    /// 解析指令文本
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let mut parts = input.split(',');
        let expression = parts.next().unwrap_or_default();
        if expression.trim().is_empty() {
            return Err(CommandError::EmptyExpression);
        }

        let mut bindings = BTreeMap::new();
        for part in parts {
            let (name, value) = parse_assignment(part)?;
            bindings.insert(name, value);
        }

        Ok(Self {
            expression: expression.to_string(),
            bindings,
        })
    }

    /// 对请求求值
    pub fn evaluate(&self) -> Result<Number, EvalError> {
        let env = Environment::with_bindings(
            self.bindings.iter().map(|(name, value)| (name, *value)),
        )?;
        evaluate_in(&self.expression, &env)
    }
}

/// 解析 `名字=值`
fn parse_assignment(part: &str) -> Result<(String, f64), CommandError> {
    let compact: String = part.chars().filter(|c| *c != ' ').collect();

    let mut sides = compact.split('=');
    let (Some(name), Some(value), None) = (sides.next(), sides.next(), sides.next()) else {
        return Err(CommandError::InvalidAssignment {
            assignment: part.trim().to_string(),
        });
    };
    if name.is_empty() {
        return Err(CommandError::InvalidAssignment {
            assignment: part.trim().to_string(),
        });
    }

    let parsed = value.parse::<f64>().map_err(|_| CommandError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    })?;

    Ok((name.to_string(), parsed))
}

/// 解析并求值，返回请求和结果
pub fn calc(input: &str) -> CalcResult<(CalcRequest, Number)> {
    let request = CalcRequest::parse(input)?;
    let value = request.evaluate()?;
    Ok((request, value))
}

/// 计算器回复
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CalcReply {
    /// 求值成功
    Answer { expression: String, value: Number },
    /// 指令或求值失败
    Failure { message: String },
}

impl CalcReply {
    /// 生成回复消息
    pub fn embed(&self, style: &ReplyStyle) -> Embed {
        match self {
            CalcReply::Answer { .. } => Embed {
                title: style.answer_title.clone(),
                description: Some(self.to_string()),
                footer: None,
            },
            CalcReply::Failure { message } => Embed {
                title: style.error_title.clone(),
                description: None,
                footer: Some(message.clone()),
            },
        }
    }
}

impl fmt::Display for CalcReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcReply::Answer { expression, value } => write!(f, "{} = {}", expression, value),
            CalcReply::Failure { message } => write!(f, "{}", message),
        }
    }
}

/// 执行计算器指令
///
/// 不会失败：错误被转成 [`CalcReply::Failure`]，由宿主负责展示。
pub fn run_calc(input: &str) -> CalcReply {
    match calc(input) {
        Ok((request, value)) => CalcReply::Answer {
            expression: request.expression,
            value,
        },
        Err(e) => CalcReply::Failure {
            message: e.to_string(),
        },
    }
}

/// 回复标题
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyStyle {
    pub answer_title: String,
    pub error_title: String,
}

impl Default for ReplyStyle {
    fn default() -> Self {
        Self {
            answer_title: "计算器 🤓".to_string(),
            error_title: "出错了，用法请查看帮助".to_string(),
        }
    }
}

/// 回复消息（标题、正文、脚注）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: Option<String>,
    pub footer: Option<String>,
}

impl fmt::Display for Embed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if let Some(description) = &self.description {
            write!(f, "\n{}", description)?;
        }
        if let Some(footer) = &self.footer {
            write!(f, "\n{}", footer)?;
        }
        Ok(())
    }
}
