//! # 数值模块
//!
//! 求值结果的表示，以及把 f64 结果规整为整数的规则。
//!
//! ## 规整规则
//!
//! 1. 值本身是整数时返回整数
//! 2. 加上 `1e-10` 后截断结果改变：说明值略小于某个整数，返回 `trunc(value + 1e-10)`
//! 3. 减去 `1e-10` 后截断结果改变：说明值略大于某个整数，返回 `trunc(value)`
//! 4. 否则原样返回浮点数

use std::fmt;

use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};
use serde::{Serialize, Serializer};

use crate::error::EvalError;

/// 规整时允许的误差
pub const EPSILON: f64 = 1e-10;

/// 求值结果
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// 整数（任意精度）
    Integer(BigInt),
    /// 浮点数
    Float(f64),
}

impl Number {
    /// 是否是整数
    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// 转为 f64（大整数可能损失精度）
    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Integer(n) => n.to_f64().unwrap_or(f64::NAN),
            Number::Float(v) => *v,
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Integer(BigInt::from(n))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(n) => write!(f, "{}", n),
            // Debug 格式对极大/极小值使用科学计数法
            Number::Float(v) => write!(f, "{:?}", v),
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Number::Integer(n) => match n.to_i64() {
                Some(small) => serializer.serialize_i64(small),
                None => serializer.serialize_str(&n.to_string()),
            },
            Number::Float(v) => serializer.serialize_f64(*v),
        }
    }
}

/// 把求值得到的 f64 规整为 [`Number`]
///
/// 无穷大和 NaN 无法规整，返回 [`EvalError::NonFiniteResult`]。
pub fn normalize(value: f64) -> Result<Number, EvalError> {
    if !value.is_finite() {
        return Err(EvalError::NonFiniteResult);
    }

    let truncated = value.trunc();
    if value == truncated {
        return integer(truncated);
    }

    let above = (value + EPSILON).trunc();
    if above != truncated {
        return integer(above);
    }

    let below = (value - EPSILON).trunc();
    if below != truncated {
        return integer(truncated);
    }

    Ok(Number::Float(value))
}

fn integer(value: f64) -> Result<Number, EvalError> {
    BigInt::from_f64(value)
        .map(Number::Integer)
        .ok_or(EvalError::NonFiniteResult)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_integer() {
        assert_eq!(normalize(4.0), Ok(Number::from(4)));
        assert_eq!(normalize(-12.0), Ok(Number::from(-12)));
        assert_eq!(normalize(0.0), Ok(Number::from(0)));
    }

    #[test]
    fn test_almost_integer_from_below() {
        assert_eq!(normalize(2.9999999999996), Ok(Number::from(3)));
        assert_eq!(normalize(0.99999999999), Ok(Number::from(1)));
    }

    #[test]
    fn test_almost_integer_from_above() {
        assert_eq!(normalize(3.00000000000004), Ok(Number::from(3)));
    }

    #[test]
    fn test_negative_values_truncate_toward_zero() {
        // 截断向零，所以负数的两个分支与正数方向相反
        assert_eq!(normalize(-2.99999999999996), Ok(Number::from(-2)));
        assert_eq!(normalize(-3.00000000000004), Ok(Number::from(-2)));
    }

    #[test]
    fn test_plain_float_kept() {
        assert_eq!(normalize(0.5), Ok(Number::Float(0.5)));
        assert_eq!(
            normalize(std::f64::consts::PI),
            Ok(Number::Float(std::f64::consts::PI))
        );
    }

    #[test]
    fn test_large_integral_value() {
        let n = normalize(1e20).unwrap();
        assert_eq!(n.to_string(), "100000000000000000000");
        assert!(n.is_integer());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(normalize(f64::INFINITY), Err(EvalError::NonFiniteResult));
        assert_eq!(normalize(f64::NAN), Err(EvalError::NonFiniteResult));
    }

    #[test]
    fn test_display() {
        assert_eq!(Number::from(42).to_string(), "42");
        assert_eq!(Number::Float(0.1 + 0.2).to_string(), "0.30000000000000004");
        assert_eq!(Number::Float(1e-20).to_string(), "1e-20");
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serde_json::to_string(&Number::from(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&Number::Float(0.25)).unwrap(), "0.25");
        let big = normalize(1e20).unwrap();
        assert_eq!(
            serde_json::to_string(&big).unwrap(),
            "\"100000000000000000000\""
        );
    }
}
