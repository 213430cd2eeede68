//! # 语法求值器
//!
//! 递归下降，边解析边求值，不构造语法树。
//!
//! ```text
//! Expression     := Addition
//! Addition       := Multiplication ( ('+' | '-') Multiplication )*
//! Multiplication := Factor ( ( '*' | 'x' | '/' | '%' | '^' | '!' ) [Factor] )*
//! Factor         := '(' Expression ')' | '-' Factor | Number | Identifier
//! ```
//!
//! 乘法层不是普通的二元运算链：它维护一串待乘因子，`*`、`x`、`/` 追加因子，
//! `%`、`^`、`!` 原地改写最后一个因子。所以 `2^3!` 先得 8，再得 `8! = 40320`。

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive};

use super::env::Environment;
use super::scanner::Scanner;
use crate::error::EvalError;

/// 能放进 f64 的最大阶乘操作数（171! 溢出）
const MAX_FACTORIAL_OPERAND: f64 = 170.0;

/// 表达式求值器
pub(crate) struct Evaluator<'a> {
    scanner: Scanner<'a>,
    env: &'a Environment,
}

impl<'a> Evaluator<'a> {
    pub(crate) fn new(input: &'a str, env: &'a Environment) -> Self {
        Self {
            scanner: Scanner::new(input),
            env,
        }
    }

    /// 求整个输入的值，末尾不允许残留内容
    pub(crate) fn value(mut self) -> Result<f64, EvalError> {
        let value = self.expression()?;
        self.scanner.skip_whitespace();
        if self.scanner.has_next() {
            return Err(self.unexpected_here());
        }
        Ok(value)
    }

    fn expression(&mut self) -> Result<f64, EvalError> {
        self.addition()
    }

    /// 解析加减法（最低优先级）
    fn addition(&mut self) -> Result<f64, EvalError> {
        let mut total = self.multiplication()?;

        loop {
            self.scanner.skip_whitespace();
            match self.scanner.peek() {
                Some('+') => {
                    self.scanner.advance();
                    total += self.multiplication()?;
                }
                Some('-') => {
                    self.scanner.advance();
                    total -= self.multiplication()?;
                }
                _ => break,
            }
        }

        Ok(total)
    }

    /// 解析乘法层
    ///
    /// `last` 是待乘序列的最后一个因子，`done` 是它之前的因子。
    fn multiplication(&mut self) -> Result<f64, EvalError> {
        let mut done: Vec<f64> = Vec::new();
        let mut last = self.factor()?;

        loop {
            self.scanner.skip_whitespace();
            let op_pos = self.scanner.pos();
            match self.scanner.peek() {
                Some('*' | 'x') => {
                    self.scanner.advance();
                    done.push(last);
                    last = self.factor()?;
                }
                Some('/') => {
                    self.scanner.advance();
                    let denominator = self.factor()?;
                    if denominator == 0.0 {
                        return Err(EvalError::DivisionByZero { offset: op_pos });
                    }
                    done.push(last);
                    last = 1.0 / denominator;
                }
                Some('%') => {
                    self.scanner.advance();
                    let denominator = self.factor()?;
                    if denominator == 0.0 {
                        return Err(EvalError::DivisionByZero { offset: op_pos });
                    }
                    last = floored_mod(last, denominator);
                }
                Some('^') => {
                    self.scanner.advance();
                    let exponent = self.factor()?;
                    last = power(last, exponent, op_pos)?;
                }
                Some('!') => {
                    self.scanner.advance();
                    last = factorial(last)?;
                }
                _ => break,
            }
        }

        Ok(done.into_iter().product::<f64>() * last)
    }

    /// 解析因子：括号、取负、数字或变量
    fn factor(&mut self) -> Result<f64, EvalError> {
        self.scanner.skip_whitespace();
        match self.scanner.peek() {
            Some('(') => {
                self.scanner.advance();
                let value = self.expression()?;
                self.scanner.skip_whitespace();
                if self.scanner.peek() != Some(')') {
                    return Err(EvalError::NoClosingParenthesis {
                        offset: self.scanner.pos(),
                    });
                }
                self.scanner.advance();
                Ok(value)
            }
            Some('-') => {
                self.scanner.advance();
                Ok(-self.factor()?)
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(_) => self.variable(),
            None => Err(self.unexpected_here()),
        }
    }

    /// 解析数字字面量：数字和至多一个小数点
    fn number(&mut self) -> Result<f64, EvalError> {
        let start = self.scanner.pos();
        let mut decimal_found = false;

        while let Some(c) = self.scanner.peek() {
            if c == '.' {
                if decimal_found {
                    return Err(EvalError::MalformedNumber {
                        offset: self.scanner.pos(),
                    });
                }
                decimal_found = true;
            } else if !c.is_ascii_digit() {
                break;
            }
            self.scanner.advance();
        }

        let text = self.scanner.slice_from(start);
        if text.is_empty() {
            return Err(self.unexpected_here());
        }
        // 只有一个 "." 时解析失败
        text.parse::<f64>()
            .map_err(|_| EvalError::MalformedNumber { offset: start })
    }

    /// 解析变量名并查找其值
    fn variable(&mut self) -> Result<f64, EvalError> {
        let start = self.scanner.pos();

        while let Some(c) = self.scanner.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.scanner.advance();
            } else {
                break;
            }
        }

        let name = self.scanner.slice_from(start);
        if name.is_empty() {
            return Err(self.unexpected_here());
        }

        self.env
            .get(name)
            .ok_or_else(|| EvalError::UnrecognizedVariable {
                name: name.to_string(),
            })
    }

    /// 根据当前位置构造 "意外字符" 或 "意外结束" 错误
    fn unexpected_here(&self) -> EvalError {
        let offset = self.scanner.pos();
        match self.scanner.peek() {
            Some(ch) => EvalError::UnexpectedCharacter { ch, offset },
            None => EvalError::UnexpectedEnd { offset },
        }
    }
}

/// 向下取整的取模，结果符号与除数相同
fn floored_mod(value: f64, divisor: f64) -> f64 {
    let rem = value % divisor;
    if rem != 0.0 && (rem < 0.0) != (divisor < 0.0) {
        rem + divisor
    } else {
        rem
    }
}

/// 乘方；有限操作数得到无穷大或 NaN 时在 `^` 处报错
///
/// 否则后续的 `/`、`%`、`^0` 会把它重新变回有限值。
fn power(base: f64, exponent: f64, offset: usize) -> Result<f64, EvalError> {
    let value = base.powf(exponent);
    if !value.is_finite() && base.is_finite() && exponent.is_finite() {
        return Err(EvalError::PowerOutOfRange { offset });
    }
    Ok(value)
}

/// 阶乘，先用大整数精确计算再舍入到 f64
fn factorial(value: f64) -> Result<f64, EvalError> {
    if value < 0.0 || value.fract() != 0.0 {
        return Err(EvalError::InvalidFactorialOperand { value });
    }
    if value > MAX_FACTORIAL_OPERAND {
        return Err(EvalError::FactorialOverflow { value });
    }

    let n = value as u32;
    let exact = (2..=n).fold(BigUint::one(), |acc, k| acc * k);
    exact
        .to_f64()
        .filter(|v| v.is_finite())
        .ok_or(EvalError::FactorialOverflow { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floored_mod_follows_divisor_sign() {
        assert_eq!(floored_mod(7.0, 3.0), 1.0);
        assert_eq!(floored_mod(-7.0, 3.0), 2.0);
        assert_eq!(floored_mod(7.0, -3.0), -2.0);
        assert_eq!(floored_mod(-7.0, -3.0), -1.0);
        assert_eq!(floored_mod(6.0, -3.0), 0.0);
        assert_eq!(floored_mod(5.5, 2.0), 1.5);
    }

    #[test]
    fn test_power_out_of_range() {
        assert_eq!(power(2.0, 10.0, 1), Ok(1024.0));
        assert_eq!(power(0.0, 0.0, 1), Ok(1.0));
        assert_eq!(
            power(10.0, 400.0, 2),
            Err(EvalError::PowerOutOfRange { offset: 2 })
        );
        assert_eq!(
            power(0.0, -1.0, 1),
            Err(EvalError::PowerOutOfRange { offset: 1 })
        );
        assert_eq!(
            power(-8.0, 0.5, 4),
            Err(EvalError::PowerOutOfRange { offset: 4 })
        );
        // 已经不是有限值的操作数原样传递
        assert_eq!(power(f64::INFINITY, 2.0, 0), Ok(f64::INFINITY));
    }

    #[test]
    fn test_factorial_small_values() {
        assert_eq!(factorial(0.0), Ok(1.0));
        assert_eq!(factorial(1.0), Ok(1.0));
        assert_eq!(factorial(5.0), Ok(120.0));
        assert_eq!(factorial(8.0), Ok(40320.0));
    }

    #[test]
    fn test_factorial_rejects_bad_operands() {
        assert_eq!(
            factorial(-1.0),
            Err(EvalError::InvalidFactorialOperand { value: -1.0 })
        );
        assert_eq!(
            factorial(2.5),
            Err(EvalError::InvalidFactorialOperand { value: 2.5 })
        );
        assert!(matches!(
            factorial(f64::NAN),
            Err(EvalError::InvalidFactorialOperand { .. })
        ));
    }

    #[test]
    fn test_factorial_range_limit() {
        let max = factorial(170.0).unwrap();
        assert!(max.is_finite());
        assert!(max > 7.25e306);
        assert_eq!(
            factorial(171.0),
            Err(EvalError::FactorialOverflow { value: 171.0 })
        );
        assert_eq!(
            factorial(f64::INFINITY),
            Err(EvalError::InvalidFactorialOperand {
                value: f64::INFINITY
            })
        );
    }
}
