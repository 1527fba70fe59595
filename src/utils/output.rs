//! # 美化输出工具
//!
//! 统一的终端输出样式。库本身从不打印，所有面向用户的消息都经由这里。
//!
//! ## 依赖关系
//! - 被 `main.rs` 与 `commands/` 使用
//! - 使用 `colored` crate

use colored::Colorize;

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息（输出到 stderr）
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印被跳过的数据块
pub fn print_skip(file: &str, block: &str, reason: &str) {
    println!(
        "{} {}{}{} {}",
        "[SKIP]".dimmed(),
        file,
        ":".dimmed(),
        block.bold(),
        format!("({})", reason).dimmed()
    );
}

pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印 CIF 数据块到输出文件的转换
pub fn print_conversion(from: &str, block: &str, to: &str) {
    println!(
        "{} {}{}{} {} {}",
        "[OK]".green().bold(),
        from.dimmed(),
        ":".dimmed(),
        block,
        "->".cyan(),
        to
    );
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}
