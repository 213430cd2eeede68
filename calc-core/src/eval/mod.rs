//! # Eval 模块
//!
//! 算术表达式求值：扫描器 → 语法求值器 → 结果规整。
//!
//! ## 模块结构
//!
//! - `scanner`: 输入游标
//! - [`env`]: 变量环境
//! - `grammar`: 递归下降求值器
//!
//! 每次调用都创建自己的扫描器和环境，调用之间不共享任何状态。

pub mod env;
mod grammar;
mod scanner;


use crate::error::EvalError;
use crate::number::{Number, normalize};

pub use env::Environment;

use grammar::Evaluator;

/// 对表达式求值
///
/// # 参数
///
/// - `expression`: 算术表达式，允许首尾空白
/// - `bindings`: 额外的变量绑定，不能与 `pi`、`e` 重名
///
/// # 示例
///
/// ```ignore
/// let n = evaluate("(a+b)/c", &[("a", 1.0), ("b", 2.0), ("c", 3.0)])?;
/// assert_eq!(n.to_string(), "1");
/// ```
pub fn evaluate(expression: &str, bindings: &[(&str, f64)]) -> Result<Number, EvalError> {
    let env = Environment::with_bindings(bindings.iter().copied())?;
    evaluate_in(expression, &env)
}

/// 在给定环境中对表达式求值
pub fn evaluate_in(expression: &str, env: &Environment) -> Result<Number, EvalError> {
    let raw = Evaluator::new(expression, env).value()?;
    normalize(raw)
}
