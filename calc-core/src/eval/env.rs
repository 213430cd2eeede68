//! # 变量环境
//!
//! 一次求值可见的 名字 → 数值 映射，构造完成后只读。

use std::collections::HashMap;
use std::f64::consts;

use crate::error::EvalError;

/// 内置常量
pub const CONSTANTS: [(&str, f64); 2] = [("pi", consts::PI), ("e", consts::E)];

/// 变量环境
///
/// 名字大小写敏感，`PI` 和 `pi` 是不同的名字。
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    vars: HashMap<String, f64>,
}

impl Environment {
    /// 只包含内置常量的环境
    pub fn new() -> Self {
        Self {
            vars: CONSTANTS
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
        }
    }

    /// 在内置常量之上合并调用方的绑定
    ///
    /// 绑定的名字已存在于环境中时返回 [`EvalError::VariableRedefinition`]。
    pub fn with_bindings<I, K>(bindings: I) -> Result<Self, EvalError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut env = Self::new();
        for (name, value) in bindings {
            let name = name.as_ref();
            if env.vars.contains_key(name) {
                return Err(EvalError::VariableRedefinition {
                    name: name.to_string(),
                });
            }
            env.vars.insert(name.to_string(), value);
        }
        Ok(env)
    }

    /// 查找变量
    pub fn get(&self, name: &str) -> Option<f64> {
        self.vars.get(name).copied()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_seeded() {
        let env = Environment::new();
        assert_eq!(env.get("pi"), Some(std::f64::consts::PI));
        assert_eq!(env.get("e"), Some(std::f64::consts::E));
        assert_eq!(env.get("PI"), None);
    }

    #[test]
    fn test_bindings_merged() {
        let env = Environment::with_bindings([("a", 1.0), ("b_2", 2.5)]).unwrap();
        assert_eq!(env.get("a"), Some(1.0));
        assert_eq!(env.get("b_2"), Some(2.5));
        assert_eq!(env.get("pi"), Some(std::f64::consts::PI));
    }

    #[test]
    fn test_redefining_constant_fails() {
        let err = Environment::with_bindings([("x", 1.0), ("e", 2.0)]).unwrap_err();
        assert_eq!(
            err,
            EvalError::VariableRedefinition {
                name: "e".to_string()
            }
        );
    }

    #[test]
    fn test_uppercase_constant_name_is_not_a_redefinition() {
        let env = Environment::with_bindings([("PI", 3.0)]).unwrap();
        assert_eq!(env.get("PI"), Some(3.0));
        assert_eq!(env.get("pi"), Some(std::f64::consts::PI));
    }
}
