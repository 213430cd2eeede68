//! # 扫描器
//!
//! 持有不可变的输入文本和单调前进的读取位置。
//!
//! 位置以字节计。语法只会消费 ASCII 字符，遇到第一个非 ASCII 字符时求值必然失败，
//! 所以报告出去的位置同时也是字符偏移。

/// 空白字符集合
const WHITESPACE: [char; 4] = [' ', '\t', '\n', '\r'];

/// 输入扫描器
#[derive(Debug)]
pub(crate) struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// 当前位置
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// 查看当前字符，不消费
    pub(crate) fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// 前进一个字符
    pub(crate) fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    pub(crate) fn has_next(&self) -> bool {
        self.pos < self.input.len()
    }

    /// 跳过连续的空白
    pub(crate) fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !WHITESPACE.contains(&c) {
                break;
            }
            self.advance();
        }
    }

    /// 从 `start` 到当前位置的文本
    pub(crate) fn slice_from(&self, start: usize) -> &'a str {
        &self.input[start..self.pos]
    }
}
