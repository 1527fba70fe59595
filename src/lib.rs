//! # cifatoms - CIF 到周期性原子结构
//!
//! 读取 CIF 文件中的每个数据块，按对称操作展开不对称单元，
//! 得到完整晶胞内的原子结构模型。
//!
//! ```ignore
//! use cifatoms::{read_cif_str, ReadOptions};
//!
//! let report = read_cif_str(text, &ReadOptions::default())?;
//! for (name, atoms) in &report.structures {
//!     println!("{}: {} atoms, {}", name, atoms.len(), atoms.formula());
//! }
//! ```
//!
//! ## 依赖关系
//! ```text
//! reader.rs       (CIF -> Atoms 流程)
//!   ├── cif/       (词法分析、DOM、数据块提取)
//!   ├── symmetry/  (操作字符串、Hall 符号、对称展开)
//!   ├── models/    (CellSpec, Atoms)
//!   ├── elements.rs
//!   └── geometry/  (晶胞参数 <-> 晶胞矩阵)
//! writers/        (XYZ, POSCAR, CELL, RES, CIF 输出)
//! error.rs        (错误处理)
//! ```

pub mod cif;
pub mod elements;
pub mod error;
pub mod geometry;
pub mod models;
pub mod reader;
pub mod symmetry;
pub mod writers;

pub use error::{CifAtomsError, Result};
pub use models::{AtomArray, Atoms, AtomsBuilder, Cell, CellSpec};
pub use reader::{cif_to_structures, read_cif_file, read_cif_str, CifReader, ReadOptions, ReadReport};
