//! # inspect 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/inspect.rs`

use super::ReadArgs;

use clap::Args;
use std::path::PathBuf;

/// inspect 子命令参数
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// CIF file to inspect
    pub file: PathBuf,

    /// Also write the summary table to this CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    #[command(flatten)]
    pub read: ReadArgs,
}
