//! # Host 模块
//!
//! 把计算器指令接到终端上：单次执行或逐行交互。

use std::io::{BufRead, Write};

use calc_core::{CalcReply, ReplyStyle, run_calc};
use tracing::{debug, info, warn};

use crate::config::AppConfig;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// 标题、正文、脚注
    Text,
    /// 一行 JSON
    Json,
}

/// 计算器宿主
pub struct CalcHost {
    style: ReplyStyle,
    max_input_len: usize,
    prompt: String,
    format: OutputFormat,
}

impl CalcHost {
    pub fn new(config: &AppConfig, format: OutputFormat) -> Self {
        Self {
            style: config.reply_style(),
            max_input_len: config.max_input_len,
            prompt: config.prompt.clone(),
            format,
        }
    }

    /// 处理一条指令
    pub fn handle(&self, input: &str) -> CalcReply {
        let len = input.chars().count();
        if len > self.max_input_len {
            warn!(len, max = self.max_input_len, "指令过长，已拒绝");
            return CalcReply::Failure {
                message: format!("指令过长（{} 个字符，上限 {}）", len, self.max_input_len),
            };
        }

        let reply = run_calc(input);
        match &reply {
            CalcReply::Answer { value, .. } => debug!(input, %value, "求值成功"),
            CalcReply::Failure { message } => info!(input, message, "求值失败"),
        }
        reply
    }

    /// 按输出格式渲染回复
    pub fn render(&self, reply: &CalcReply) -> anyhow::Result<String> {
        Ok(match self.format {
            OutputFormat::Text => reply.embed(&self.style).to_string(),
            OutputFormat::Json => serde_json::to_string(reply)?,
        })
    }

    /// 处理一条指令并写出回复，返回是否成功
    pub fn run_once(&self, input: &str, out: &mut impl Write) -> anyhow::Result<bool> {
        let reply = self.handle(input);
        writeln!(out, "{}", self.render(&reply)?)?;
        Ok(matches!(reply, CalcReply::Answer { .. }))
    }

    /// 逐行读取指令直到输入结束或 `exit`/`quit`
    ///
    /// 提示符写到 stderr，回复写到 `out`。返回处理的指令数。
    pub fn repl(&self, input: impl BufRead, out: &mut impl Write) -> anyhow::Result<usize> {
        info!("进入交互模式");
        let mut handled = 0;

        eprint!("{}", self.prompt);
        for line in input.lines() {
            let line = line?;
            match line.trim() {
                "" => {}
                "exit" | "quit" => break,
                _ => {
                    self.run_once(&line, out)?;
                    handled += 1;
                }
            }
            eprint!("{}", self.prompt);
        }

        info!(handled, "交互模式结束");
        Ok(handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn host(format: OutputFormat) -> CalcHost {
        CalcHost::new(&AppConfig::default(), format)
    }

    #[test]
    fn test_run_once_text() {
        let mut out = Vec::new();
        let ok = host(OutputFormat::Text)
            .run_once("(a+b)/c, a=1, b=2, c=3", &mut out)
            .unwrap();
        assert!(ok);
        let text = String::from_utf8(out).unwrap();
        insta::assert_snapshot!(text.trim_end(), @r"
        计算器 🤓
        (a+b)/c = 1
        ");
    }

    #[test]
    fn test_run_once_json_failure() {
        let mut out = Vec::new();
        let ok = host(OutputFormat::Json).run_once("10/0", &mut out).unwrap();
        assert!(!ok);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"status\":\"failure\",\"message\":\"求值错误: 位置 2：除数为 0\"}\n"
        );
    }

    #[test]
    fn test_input_too_long() {
        let config = AppConfig {
            max_input_len: 3,
            ..AppConfig::default()
        };
        let host = CalcHost::new(&config, OutputFormat::Text);
        assert_eq!(
            host.handle("1+2+3"),
            CalcReply::Failure {
                message: "指令过长（5 个字符，上限 3）".to_string()
            }
        );
        assert!(matches!(host.handle("1+2"), CalcReply::Answer { .. }));
    }

    #[test]
    fn test_repl_skips_blank_lines_and_stops_on_exit() {
        let input = Cursor::new("1+1\n\n2^3!\nexit\n3*3\n");
        let mut out = Vec::new();
        let handled = host(OutputFormat::Json).repl(input, &mut out).unwrap();
        assert_eq!(handled, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"{"status":"answer","expression":"1+1","value":2}"#,
                r#"{"status":"answer","expression":"2^3!","value":40320}"#,
            ]
        );
    }
}
