//! # cifatoms 命令行工具
//!
//! ## 子命令
//! - `convert` - 将 CIF 中的每个结构展开并写出为 XYZ / POSCAR / CELL / RES / CIF
//! - `inspect` - 列出 CIF 中各数据块的结构摘要
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑，调用 cifatoms 库)
//!   ├── batch/      (文件收集与并行执行)
//!   └── utils/      (终端输出与进度条)
//! ```

mod batch;
mod cli;
mod commands;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
