//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `convert`: 展开 CIF 并转换为其他结构格式
//! - `inspect`: 打印 CIF 中各结构的摘要
//!
//! 两个子命令共享 [`ReadArgs`]（对称展开容差、宽松模式等）。
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: convert, inspect

pub mod convert;
pub mod inspect;

use cifatoms::ReadOptions;
use clap::{Args, Parser, Subcommand};

/// cifatoms - CIF 到周期性原子结构
#[derive(Parser)]
#[command(name = "cifatoms")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Expand CIF asymmetric units into complete periodic structures", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Convert CIF files to XYZ, POSCAR, CELL, RES or P1 CIF (one file per data block)
    Convert(convert::ConvertArgs),

    /// Print a per-block structure summary of a CIF file
    Inspect(inspect::InspectArgs),
}

/// CIF 读取参数
#[derive(Args, Debug, Clone)]
pub struct ReadArgs {
    /// Distance tolerance in Å for merging symmetry-equivalent images
    #[arg(long, default_value_t = 1e-3, env = "CIFATOMS_SYMPREC")]
    pub symprec: f64,

    /// Keep unknown element symbols (atomic number -1) instead of failing
    #[arg(long, default_value_t = false, env = "CIFATOMS_TOLERANT")]
    pub tolerant: bool,

    /// Keep only the asymmetric unit (skip symmetry expansion)
    #[arg(long, default_value_t = false)]
    pub no_symmetry: bool,
}

impl ReadArgs {
    pub fn to_options(&self) -> ReadOptions {
        ReadOptions {
            tolerant: self.tolerant,
            symprec: self.symprec,
            expand_symmetry: !self.no_symmetry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convert_args() {
        let cli = Cli::try_parse_from([
            "cifatoms", "convert", "-i", "in", "-o", "out", "-t", "poscar", "--no-symmetry",
            "--symprec", "0.01",
        ])
        .unwrap();
        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.target, convert::OutputFormat::Poscar);
                assert_eq!(args.pattern, "*.cif");
                let options = args.read.to_options();
                assert!(!options.expand_symmetry);
                assert!((options.symprec - 0.01).abs() < 1e-12);
            }
            _ => panic!("expected convert"),
        }
    }

    #[test]
    fn test_parse_inspect_args() {
        let cli = Cli::try_parse_from(["cifatoms", "inspect", "a.cif", "--csv", "s.csv"]).unwrap();
        match cli.command {
            Commands::Inspect(args) => {
                assert_eq!(args.file.to_str(), Some("a.cif"));
                assert!(args.csv.is_some());
                assert!(args.read.to_options().expand_symmetry);
            }
            _ => panic!("expected inspect"),
        }
    }
}
