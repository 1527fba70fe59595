//! # 晶胞描述
//!
//! `CellSpec` 列出晶胞的几种输入形式，构建结构时一次性解析为
//! 规范形式 `Cell`（每个轴一个可选的行向量）和周期性标志 `pbc`。
//!
//! 不变量：`pbc[i] == cell[i].is_some()`。
//!
//! ## 依赖关系
//! - 被 `models/atoms.rs`, `reader.rs` 使用
//! - 使用 `geometry/`

use crate::error::{CifAtomsError, Result};
use crate::geometry::{self, Mat3, Vec3};

use serde::{Deserialize, Serialize};

/// 规范晶胞：`None` 行表示该方向非周期
pub type Cell = [Option<Vec3>; 3];

/// 晶胞输入形式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum CellSpec {
    /// 非周期体系
    #[default]
    None,
    /// 立方晶胞边长
    Cubic(f64),
    /// 各轴长度（正交），`None` 表示该方向非周期
    AxisLengths([Option<f64>; 3]),
    /// 三个晶格行向量
    Cartesian(Mat3),
    /// 长度 (a, b, c) 与夹角 (α, β, γ)，夹角单位为度
    LengthsAngles(Vec3, Vec3),
}

impl CellSpec {
    /// 从扁平数值列表推断晶胞形式
    ///
    /// - 0 个：非周期
    /// - 1 个：立方
    /// - 3 个：正交各轴长度
    /// - 6 个：a b c α β γ
    /// - 9 个：3×3 行向量
    pub fn from_values(values: &[f64]) -> Result<Self> {
        match values.len() {
            0 => Ok(CellSpec::None),
            1 => Ok(CellSpec::Cubic(values[0])),
            3 => Ok(CellSpec::AxisLengths([
                Some(values[0]),
                Some(values[1]),
                Some(values[2]),
            ])),
            6 => Ok(CellSpec::LengthsAngles(
                [values[0], values[1], values[2]],
                [values[3], values[4], values[5]],
            )),
            9 => Ok(CellSpec::Cartesian([
                [values[0], values[1], values[2]],
                [values[3], values[4], values[5]],
                [values[6], values[7], values[8]],
            ])),
            n => Err(CifAtomsError::InvalidCellSpec(format!(
                "expected 0, 1, 3, 6 or 9 values, got {}",
                n
            ))),
        }
    }

    /// 解析为 (规范晶胞, pbc)
    pub fn resolve(&self) -> Result<(Cell, [bool; 3])> {
        let cell: Cell = match self {
            CellSpec::None => [None, None, None],
            CellSpec::Cubic(a) => {
                ensure_finite(&[*a])?;
                [
                    Some([*a, 0.0, 0.0]),
                    Some([0.0, *a, 0.0]),
                    Some([0.0, 0.0, *a]),
                ]
            }
            CellSpec::AxisLengths(lengths) => {
                let mut cell: Cell = [None, None, None];
                for (i, length) in lengths.iter().enumerate() {
                    if let Some(l) = length {
                        ensure_finite(&[*l])?;
                        let mut row = [0.0; 3];
                        row[i] = *l;
                        cell[i] = Some(row);
                    }
                }
                cell
            }
            CellSpec::Cartesian(m) => {
                for row in m {
                    ensure_finite(row)?;
                }
                [Some(m[0]), Some(m[1]), Some(m[2])]
            }
            CellSpec::LengthsAngles(lengths, angles) => {
                ensure_finite(lengths)?;
                ensure_finite(angles)?;
                if let Some(bad) = angles.iter().find(|&&a| a <= 0.0 || a >= 180.0) {
                    return Err(CifAtomsError::InvalidCellSpec(format!(
                        "cell angle {} is outside (0, 180) degrees",
                        bad
                    )));
                }
                let m = geometry::to_cartesian(lengths, angles, false);
                [Some(m[0]), Some(m[1]), Some(m[2])]
            }
        };

        let pbc = [cell[0].is_some(), cell[1].is_some(), cell[2].is_some()];
        Ok((cell, pbc))
    }
}

fn ensure_finite(values: &[f64]) -> Result<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(v) => Err(CifAtomsError::InvalidCellSpec(format!(
            "non-finite value {}",
            v
        ))),
        None => Ok(()),
    }
}

/// 三个轴均周期时返回完整矩阵
pub fn full_matrix(cell: &Cell) -> Option<Mat3> {
    match cell {
        [Some(a), Some(b), Some(c)] => Some([*a, *b, *c]),
        _ => None,
    }
}
