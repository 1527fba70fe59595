//! # 对称展开
//!
//! 将不对称单元中的每个位点用全部对称操作作用一遍，
//! 按周期最小像距离去除重复像，得到完整晶胞中的原子。
//!
//! 每个位点独立处理：已接受列表以原位点开始，按操作顺序逐个尝试，
//! 与已接受位置的距离小于容差的像被丢弃，近似重复时保留最早出现者。
//!
//! ## 依赖关系
//! - 被 `reader.rs` 使用
//! - 使用 `geometry/vector.rs`

use super::SymmetryOperation;
use crate::error::{CifAtomsError, Result};
use crate::geometry::vector::{norm, vec_mat};
use crate::geometry::{Mat3, Vec3};

/// 展开后的位点
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandedSites {
    /// 分数坐标，约化到 [0, 1)
    pub positions: Vec<Vec3>,
    pub labels: Vec<String>,
    pub symbols: Vec<String>,
    /// 每个展开位点对应的原始位点序号，用于携带附加数组
    pub origins: Vec<usize>,
}

impl ExpandedSites {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// 两个分数坐标之间的周期最小像距离（Å）
pub fn periodic_distance(cell: &Mat3, a: &Vec3, b: &Vec3) -> f64 {
    let mut d = [0.0; 3];
    for i in 0..3 {
        let delta = a[i] - b[i];
        d[i] = delta - delta.round();
    }

    // 斜晶胞中 round 得到的像不一定最短，再检查相邻 26 个像
    let mut best = f64::INFINITY;
    for i in -1..=1 {
        for j in -1..=1 {
            for k in -1..=1 {
                let shifted = [d[0] + i as f64, d[1] + j as f64, d[2] + k as f64];
                best = best.min(norm(&vec_mat(&shifted, cell)));
            }
        }
    }
    best
}

/// 对称展开
///
/// `positions` 为分数坐标；`labels`、`symbols` 与之一一对应。
/// `tol` 为笛卡尔距离容差（Å）。
pub fn expand(
    cell: &Mat3,
    positions: &[Vec3],
    labels: &[String],
    symbols: &[String],
    operators: &[SymmetryOperation],
    tol: f64,
) -> Result<ExpandedSites> {
    check_len("labels", positions.len(), labels.len())?;
    check_len("symbols", positions.len(), symbols.len())?;

    let mut out = ExpandedSites::default();

    for (site, p0) in positions.iter().enumerate() {
        let mut accepted: Vec<Vec3> = vec![*p0];

        for op in operators {
            let p = op.apply(p0);
            let duplicate = accepted
                .iter()
                .any(|q| periodic_distance(cell, &p, q) < tol);
            if !duplicate {
                accepted.push(p);
            }
        }

        for p in accepted {
            out.positions.push(p);
            out.labels.push(labels[site].clone());
            out.symbols.push(symbols[site].clone());
            out.origins.push(site);
        }
    }

    Ok(out)
}

fn check_len(name: &str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(CifAtomsError::ArrayLengthMismatch {
            name: name.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}
