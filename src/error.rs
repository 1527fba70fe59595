//! # 统一错误处理模块
//!
//! 定义 cifatoms 的所有错误类型，使用 `thiserror` 派生。
//!
//! 结构构建阶段的"硬错误"（未知元素、数组长度不符、晶胞参数非法、
//! 非周期体系使用分数坐标、缺失坐标）会中止当前调用；
//! CIF 字段缺失等"软缺失"不会产生错误，而是被当作"无数据"处理。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// cifatoms 统一错误类型
#[derive(Error, Debug)]
pub enum CifAtomsError {
    // ─────────────────────────────────────────────────────────────
    // 结构构建错误
    // ─────────────────────────────────────────────────────────────
    #[error("Unknown chemical symbol: '{symbol}'")]
    UnknownSpecies { symbol: String },

    #[error("Array '{name}' has length {found}, expected {expected}")]
    ArrayLengthMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("Invalid cell specification: {0}")]
    InvalidCellSpec(String),

    #[error("Scaled positions require periodic boundary conditions along all three axes")]
    NonPeriodicScaledCoordinates,

    #[error("No usable coordinates for site '{label}' in block '{block}'")]
    MissingCoordinates { block: String, label: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("CIF syntax error at line {line}: {reason}")]
    CifSyntax { line: usize, reason: String },

    #[error("Invalid symmetry operator: '{0}'")]
    InvalidSymmetryOperator(String),

    #[error("Cannot interpret Hall symbol: '{0}'")]
    UnknownHallSymbol(String),

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, CifAtomsError>;
