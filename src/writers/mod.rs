//! # 结构输出模块
//!
//! 将 `Atoms` 渲染为常见结构文件格式的文本。
//!
//! | 格式   | 函数               | 坐标     | 需要三维周期 |
//! |--------|--------------------|----------|--------------|
//! | XYZ    | `to_xyz_string`    | 笛卡尔   | 否           |
//! | POSCAR | `to_poscar_string` | 分数     | 是           |
//! | CELL   | `to_cell_string`   | 分数     | 是           |
//! | RES    | `to_res_string`    | 分数     | 是           |
//! | CIF    | `to_cif_string`    | 分数, P1 | 是           |
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 使用
//! - 使用 `models/`
//! - 子模块: xyz, poscar, cell, res, cif

pub mod cell;
pub mod cif;
pub mod poscar;
pub mod res;
pub mod xyz;

pub use cell::to_cell_string;
pub use cif::to_cif_string;
pub use poscar::to_poscar_string;
pub use res::to_res_string;
pub use xyz::to_xyz_string;

use crate::error::{CifAtomsError, Result};
use crate::geometry::{Mat3, Vec3};
use crate::models::{AtomArray, Atoms};

/// 周期格式需要的晶胞矩阵与分数坐标
fn periodic_data(atoms: &Atoms, format: &str) -> Result<(Mat3, Vec<Vec3>)> {
    let matrix = atoms.cell_matrix().ok_or_else(|| {
        CifAtomsError::InvalidArgument(format!(
            "{} output requires a structure periodic along all three axes",
            format
        ))
    })?;
    Ok((matrix, atoms.scaled_positions()?))
}

/// 逐原子占位率，缺省为 1.0
fn occupancies(atoms: &Atoms) -> Vec<f64> {
    match atoms.array("occupancy") {
        Some(AtomArray::Float(values)) => values,
        _ => vec![1.0; atoms.len()],
    }
}

/// 按首次出现顺序排列的元素符号
fn species_order(symbols: &[String]) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    for symbol in symbols {
        if !order.contains(symbol) {
            order.push(symbol.clone());
        }
    }
    order
}
