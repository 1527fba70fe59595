//! # 对称性模块
//!
//! 对称操作的表示、解析与应用：
//! - `operator`: 解析 `-x+1/2, y, z` 形式的操作字符串
//! - `hall`: 由 Hall 符号生成完整的对称操作群
//! - `expand`: 将不对称单元展开为完整晶胞
//!
//! 所有操作作用于分数坐标：`p' = R·p + t`，结果约化到 `[0, 1)`。
//!
//! ## 依赖关系
//! - 被 `cif/extract.rs`, `reader.rs` 使用
//! - 使用 `geometry/`
//! - 子模块: operator, hall, expand

pub mod expand;
pub mod hall;
pub mod operator;

pub use expand::{expand, periodic_distance, ExpandedSites};
pub use hall::operators_from_hall_symbol;
pub use operator::parse_operator_string;

use crate::error::Result;
use crate::geometry::vector::{mat_mul, mat_vec, IDENTITY};
use crate::geometry::{Mat3, Vec3};

use serde::{Deserialize, Serialize};

/// 平移分量归一化时的吸附容差
const WRAP_EPS: f64 = 1e-8;

/// 空间群对称操作 (R | t)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymmetryOperation {
    pub rotation: Mat3,
    pub translation: Vec3,
}

impl SymmetryOperation {
    pub fn new(rotation: Mat3, translation: Vec3) -> Self {
        SymmetryOperation {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(IDENTITY, [0.0; 3])
    }

    pub fn is_identity(&self) -> bool {
        self.rotation == IDENTITY && self.translation.iter().all(|&t| wrap01(t) == 0.0)
    }

    /// 作用于分数坐标，结果约化到 [0, 1)
    pub fn apply(&self, p: &Vec3) -> Vec3 {
        let r = mat_vec(&self.rotation, p);
        [
            wrap01(r[0] + self.translation[0]),
            wrap01(r[1] + self.translation[1]),
            wrap01(r[2] + self.translation[2]),
        ]
    }

    /// 复合操作 `self ∘ other`：先作用 `other` 再作用 `self`，平移取模 1
    pub fn compose(&self, other: &SymmetryOperation) -> SymmetryOperation {
        let rotation = mat_mul(&self.rotation, &other.rotation);
        let rt = mat_vec(&self.rotation, &other.translation);
        let translation = [
            wrap_translation(rt[0] + self.translation[0]),
            wrap_translation(rt[1] + self.translation[1]),
            wrap_translation(rt[2] + self.translation[2]),
        ];
        SymmetryOperation::new(rotation, translation)
    }

    /// 在平移模 1 的意义下判断两个操作是否相同
    pub fn approx_eq(&self, other: &SymmetryOperation) -> bool {
        self.rotation == other.rotation
            && self.translation.iter().zip(&other.translation).all(|(a, b)| {
                let d = a - b;
                (d - d.round()).abs() < WRAP_EPS
            })
    }
}

/// 约化到 [0, 1)
///
/// `x - floor(x)` 在 x 为极小负数时可能得到 1.0，此时归零。
pub fn wrap01(x: f64) -> f64 {
    let w = x - x.floor();
    if w >= 1.0 {
        0.0
    } else {
        w
    }
}

/// 平移分量约化到 [0, 1)，并吸附接近整数的浮点误差
fn wrap_translation(x: f64) -> f64 {
    let w = wrap01(x);
    if w < WRAP_EPS || 1.0 - w < WRAP_EPS {
        0.0
    } else {
        w
    }
}

/// 对称操作查询接口
pub trait SymmetryTable: Sync {
    /// 解析单个操作字符串
    fn parse_operator_string(&self, text: &str) -> Result<SymmetryOperation>;

    /// 由 Hall 符号生成完整操作列表（首项为恒等操作）
    fn operators_from_hall_symbol(&self, symbol: &str) -> Result<Vec<SymmetryOperation>>;
}

/// 内置实现
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardSymmetry;

impl SymmetryTable for StandardSymmetry {
    fn parse_operator_string(&self, text: &str) -> Result<SymmetryOperation> {
        parse_operator_string(text)
    }

    fn operators_from_hall_symbol(&self, symbol: &str) -> Result<Vec<SymmetryOperation>> {
        operators_from_hall_symbol(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap01() {
        assert_eq!(wrap01(0.25), 0.25);
        assert!((wrap01(-0.25) - 0.75).abs() < 1e-12);
        assert!((wrap01(1.5) - 0.5).abs() < 1e-12);
        assert_eq!(wrap01(-1e-20), 0.0);
        assert_eq!(wrap01(1.0), 0.0);
    }

    #[test]
    fn test_apply_wraps_result() {
        let op = SymmetryOperation::new(
            [[-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]],
            [0.0, 0.5, 0.5],
        );
        let p = op.apply(&[0.1, 0.7, 0.2]);
        assert!((p[0] - 0.9).abs() < 1e-12);
        assert!((p[1] - 0.2).abs() < 1e-12);
        assert!((p[2] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_compose() {
        let screw = SymmetryOperation::new(
            [[-1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 1.0]],
            [0.0, 0.0, 0.5],
        );
        let twice = screw.compose(&screw);
        assert!(twice.approx_eq(&SymmetryOperation::identity()));
        assert!(twice.is_identity());
        assert!(!screw.is_identity());
    }
}
