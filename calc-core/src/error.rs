//! # Error 模块
//!
//! 定义 calc-core 中使用的错误类型。
//!
//! 偏移量均以字符计，指向原始表达式文本。

use thiserror::Error;

/// 表达式求值错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// 顶层表达式之后仍有未消费的内容，或在需要因子的位置遇到无法识别的符号
    #[error("位置 {offset}：意外字符 '{ch}'")]
    UnexpectedCharacter { ch: char, offset: usize },

    /// 还需要一个因子时输入已经结束
    #[error("位置 {offset}：表达式意外结束")]
    UnexpectedEnd { offset: usize },

    /// 数字字面量中出现第二个小数点（或只有一个小数点）
    #[error("位置 {offset}：数字格式错误，多余的小数点")]
    MalformedNumber { offset: usize },

    /// 左括号没有闭合
    #[error("位置 {offset}：缺少右括号 ')'")]
    NoClosingParenthesis { offset: usize },

    /// `/` 或 `%` 的除数为 0，偏移量指向运算符
    #[error("位置 {offset}：除数为 0")]
    DivisionByZero { offset: usize },

    /// 变量未定义（大小写敏感）
    #[error("未定义的变量 '{name}'")]
    UnrecognizedVariable { name: String },

    /// 阶乘作用于负数或非整数
    #[error("阶乘的操作数必须是非负整数，实际为 {value}")]
    InvalidFactorialOperand { value: f64 },

    /// 阶乘结果超出 f64 的表示范围
    #[error("{value}! 超出可表示的数值范围")]
    FactorialOverflow { value: f64 },

    /// 两个有限操作数的乘方结果溢出或不是实数，偏移量指向 `^`
    #[error("位置 {offset}：乘方结果超出实数范围")]
    PowerOutOfRange { offset: usize },

    /// 调用方绑定与内置常量同名
    #[error("不能重新定义 '{name}' 的值")]
    VariableRedefinition { name: String },

    /// 最终结果为无穷大或 NaN
    #[error("计算结果不是有限的实数")]
    NonFiniteResult,
}

impl EvalError {
    /// 错误对应的字符偏移量（如果有）
    pub fn offset(&self) -> Option<usize> {
        match self {
            EvalError::UnexpectedCharacter { offset, .. }
            | EvalError::UnexpectedEnd { offset }
            | EvalError::MalformedNumber { offset }
            | EvalError::NoClosingParenthesis { offset }
            | EvalError::DivisionByZero { offset }
            | EvalError::PowerOutOfRange { offset } => Some(*offset),
            EvalError::UnrecognizedVariable { .. }
            | EvalError::InvalidFactorialOperand { .. }
            | EvalError::FactorialOverflow { .. }
            | EvalError::VariableRedefinition { .. }
            | EvalError::NonFiniteResult => None,
        }
    }
}

/// 计算器指令解析错误
///
/// 指令格式：`表达式, 名字=值, 名字=值`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// 逗号前没有表达式
    #[error("表达式为空")]
    EmptyExpression,

    /// 变量赋值不是 `名字=值` 的形式
    #[error("无效的变量赋值 '{assignment}'，格式应为 名字=值")]
    InvalidAssignment { assignment: String },

    /// 赋值右侧不是数字
    #[error("变量 '{name}' 的值 '{value}' 不是有效数字")]
    InvalidValue { name: String, value: String },
}

/// calc-core 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    /// 指令错误
    #[error("指令错误: {0}")]
    Command(#[from] CommandError),

    /// 求值错误
    #[error("求值错误: {0}")]
    Eval(#[from] EvalError),
}

/// Result 类型别名
pub type CalcResult<T> = Result<T, CalcError>;
