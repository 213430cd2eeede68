//! # xtask - 开发辅助工具
//!
//! 提供本地质量门禁与开发辅助命令。
//!
//! ## 命令
//!
//! - `check-all`: 运行 fmt、clippy、test
//! - `cov-core`: 运行 calc-core 覆盖率
//! - `calc-check`: 逐行求值 `.calc` 文件，报告失败的指令

use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use calc_core::{CalcReply, run_calc};
use walkdir::WalkDir;

/// 默认的指令样例目录
const DEFAULT_CASES_DIR: &str = "tests/cases";

fn run(step: &str, cmd: &mut Command) -> anyhow::Result<()> {
    eprintln!("\n==> {step}");
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{step} failed with {status}");
    }
    Ok(())
}

fn ensure_cargo_llvm_cov_available() -> anyhow::Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["llvm-cov", "--version"]);
    match cmd.status() {
        Ok(s) if s.success() => Ok(()),
        _ => anyhow::bail!(
            "cargo llvm-cov 不可用。\n\
请先安装：\n\
  - cargo install cargo-llvm-cov\n\
  - rustup component add llvm-tools-preview\n\
然后重试。"
        ),
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("xtask error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::from(0)
}

fn real_main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let sub = args.next().unwrap_or_else(|| "help".to_string());

    match sub.as_str() {
        "check-all" => {
            let mut fmt = Command::new("cargo");
            fmt.args(["fmt", "--all", "--", "--check"]);
            run("cargo fmt --all -- --check", &mut fmt)?;

            let mut clippy = Command::new("cargo");
            clippy.args(["clippy", "--workspace", "--all-targets"]);
            run("cargo clippy --workspace --all-targets", &mut clippy)?;

            let mut test = Command::new("cargo");
            test.args(["test", "--workspace"]);
            run("cargo test --workspace", &mut test)?;
        }
        "cov-core" => {
            ensure_cargo_llvm_cov_available()?;

            let mut cov = Command::new("cargo");
            cov.args(["llvm-cov", "-p", "calc-core", "--html"]);
            run("cargo llvm-cov -p calc-core --html", &mut cov)?;

            eprintln!("\nCoverage HTML: target/llvm-cov/html/index.html");
        }
        "calc-check" => {
            let path = args.next();
            calc_check(path.as_deref())?;
        }
        "help" | "-h" | "--help" => {
            print_help();
        }
        other => anyhow::bail!("unknown xtask subcommand: {other}"),
    }

    Ok(())
}

fn print_help() {
    eprintln!(
        r#"xtask - 开发辅助工具

USAGE:
  cargo xtask <command>

COMMANDS:
  check-all       运行 fmt、clippy、test 门禁检查
  cov-core        运行 calc-core 覆盖率报告
  calc-check      逐行求值指令样例文件

CALC-CHECK:
  cargo xtask calc-check [path]

  不带参数：检查 tests/cases/ 下所有 .calc 文件
  带路径参数：检查指定文件或目录

  文件格式：
    - 每行一条指令，例如 (a+b)/c, a=1, b=2, c=3
    - 空行和以 # 开头的行被忽略
    - 以 ! 开头的行表示预期失败的指令
"#
    );
}

//=============================================================================
// calc-check 命令实现
//=============================================================================

/// 样例检查结果
#[derive(Default)]
struct CalcCheckResult {
    /// 检查的文件数量
    files_checked: usize,
    /// 检查的指令数量
    cases_checked: usize,
    /// 与预期不符的指令
    mismatches: Vec<Mismatch>,
}

/// 与预期不符的指令
struct Mismatch {
    location: String,
    input: String,
    reply: String,
}

/// 执行样例检查
fn calc_check(path: Option<&str>) -> anyhow::Result<()> {
    let root = PathBuf::from(path.unwrap_or(DEFAULT_CASES_DIR));
    if !root.exists() {
        anyhow::bail!("路径不存在: {}", root.display());
    }

    let files = collect_case_files(&root)?;
    if files.is_empty() {
        eprintln!("未找到样例文件（.calc）");
        return Ok(());
    }

    eprintln!("==> 检查 {} 个样例文件...\n", files.len());

    let mut result = CalcCheckResult::default();
    for file in &files {
        let content = std::fs::read_to_string(file)?;
        check_cases(&file.display().to_string(), &content, &mut result);
    }

    print_check_result(&result);

    if !result.mismatches.is_empty() {
        anyhow::bail!("样例检查发现 {} 处不符", result.mismatches.len());
    }
    Ok(())
}

/// 收集目录下的所有样例文件
fn collect_case_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "calc") {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// 检查单个文件中的所有指令
fn check_cases(file_id: &str, content: &str, result: &mut CalcCheckResult) {
    result.files_checked += 1;

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (input, expect_failure) = match trimmed.strip_prefix('!') {
            Some(rest) => (rest.trim(), true),
            None => (trimmed, false),
        };

        result.cases_checked += 1;
        let reply = run_calc(input);
        let failed = matches!(reply, CalcReply::Failure { .. });
        if failed != expect_failure {
            result.mismatches.push(Mismatch {
                location: format!("{}:{}", file_id, index + 1),
                input: input.to_string(),
                reply: reply.to_string(),
            });
        }
    }
}

/// 输出检查结果
fn print_check_result(result: &CalcCheckResult) {
    eprintln!("─────────────────────────────────────────────────────");
    eprintln!(
        "检查完成: {} 个文件, {} 条指令",
        result.files_checked, result.cases_checked
    );
    eprintln!();

    for m in &result.mismatches {
        eprintln!("[ERROR] {}: {} -> {}", m.location, m.input, m.reply);
    }

    eprintln!();
    if result.mismatches.is_empty() {
        eprintln!("✅ 检查通过");
    } else {
        eprintln!("❌ {} 处与预期不符", result.mismatches.len());
    }
}
