//! # calc - 计算器指令的命令行宿主
//!
//! 负责参数解析、配置加载、日志初始化，把指令交给 calc-core 求值。
//!
//! ## 用法
//!
//! ```text
//! calc "(a + b) / c, a = 1, b=2, c = 3"
//! calc --json "2^3!"
//! calc                       # 从标准输入逐行读取
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

mod config;
mod host;

use config::AppConfig;
use host::{CalcHost, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "calc", version, about = "计算器指令的命令行宿主")]
struct Cli {
    /// 指令文本，例如 "(a+b)/c, a=1, b=2, c=3"；省略时进入交互模式
    input: Option<String>,

    /// 配置文件路径
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// 以 JSON 输出回复
    #[arg(long)]
    json: bool,

    /// 覆盖配置中的日志级别
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(e) => {
            eprintln!("calc error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// 返回最后一条指令是否成功
fn real_main() -> anyhow::Result<bool> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config);
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    config.validate()?;

    tracing_subscriber::fmt()
        .with_max_level(config.level()?)
        .with_writer(io::stderr)
        .init();
    info!(config = %cli.config.display(), "配置已加载");

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let host = CalcHost::new(&config, format);
    let mut stdout = io::stdout().lock();

    match cli.input {
        Some(input) => host.run_once(&input, &mut stdout),
        None => {
            host.repl(io::stdin().lock(), &mut stdout)?;
            Ok(true)
        }
    }
}
