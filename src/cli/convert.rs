//! # convert 子命令 CLI 定义
//!
//! 批量将 CIF 文件展开并转换为 XYZ / POSCAR / CELL / RES / CIF。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/convert.rs`

use super::ReadArgs;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 支持的输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Extended XYZ (works for molecules too)
    Xyz,
    /// VASP POSCAR format
    Poscar,
    /// CASTEP .cell format
    Cell,
    /// AIRSS / SHELX .res format
    Res,
    /// P1 Crystallographic Information File
    Cif,
}

impl OutputFormat {
    /// 输出文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xyz => "xyz",
            OutputFormat::Poscar => "vasp",
            OutputFormat::Cell => "cell",
            OutputFormat::Res => "res",
            OutputFormat::Cif => "cif",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Xyz => write!(f, "xyz"),
            OutputFormat::Poscar => write!(f, "poscar"),
            OutputFormat::Cell => write!(f, "cell"),
            OutputFormat::Res => write!(f, "res"),
            OutputFormat::Cif => write!(f, "cif"),
        }
    }
}

/// convert 子命令参数
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input CIF file or directory containing CIF files
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory for converted files
    #[arg(short, long)]
    pub output: PathBuf,

    /// Target output format
    #[arg(short, long, value_enum)]
    pub target: OutputFormat,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Glob pattern(s) for input files, comma separated
    #[arg(short, long, default_value = "*.cif")]
    pub pattern: String,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    #[command(flatten)]
    pub read: ReadArgs,
}
