//! # Calc Core
//!
//! 聊天机器人计算器指令的核心库。
//!
//! ## 架构概述
//!
//! `calc-core` 是纯逻辑核心，不做任何 IO，也不输出日志。
//! 宿主把用户输入交给它，拿回一个可以直接展示的回复：
//!
//! ```text
//! Host                          Core
//!   │                              │
//!   │──── "(a+b)/c, a=1, ..." ───►│ CalcRequest::parse
//!   │                              │ evaluate → normalize
//!   │◄─── CalcReply ──────────────│
//!   │                              │
//! ```
//!
//! ## 核心类型
//!
//! - [`Number`]：求值结果（整数或浮点数）
//! - [`EvalError`]：带偏移量的求值错误
//! - [`CalcRequest`]：表达式加变量赋值
//! - [`CalcReply`]：指令回复
//!
//! ## 使用示例
//!
//! ```ignore
//! use calc_core::{evaluate, run_calc};
//!
//! assert_eq!(evaluate("2^3!", &[])?.to_string(), "40320");
//!
//! let reply = run_calc("(a + b) / c, a = 1, b=2, c = 3");
//! println!("{}", reply.embed(&ReplyStyle::default()));
//! ```
//!
//! ## 模块结构
//!
//! - [`eval`]：扫描器、变量环境、语法求值器
//! - [`number`]：结果表示与规整
//! - [`command`]：指令解析与回复
//! - [`error`]：错误类型定义

pub mod command;
pub mod error;
pub mod eval;
pub mod number;

// 重导出核心类型
pub use command::{CalcReply, CalcRequest, Embed, ReplyStyle, calc, run_calc};
pub use error::{CalcError, CalcResult, CommandError, EvalError};
pub use eval::{Environment, evaluate, evaluate_in};
pub use number::{Number, normalize};
