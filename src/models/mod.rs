//! # 数据模型模块
//!
//! 定义晶胞描述、原子种类与周期性原子结构。
//!
//! ## 依赖关系
//! - 被 `reader.rs`, `writers/`, `commands/` 使用
//! - 子模块: atoms, cell, species

pub mod atoms;
pub mod cell;
pub mod species;

pub use atoms::{AtomArray, Atoms, AtomsBuilder};
pub use cell::{Cell, CellSpec};
pub use species::{AtomicSpecies, UNKNOWN_ATOMIC_NUMBER};
