//! # 晶胞参数转换
//!
//! 晶胞矩阵 (a, b, c 三个行向量) 与晶胞参数 (a, b, c, α, β, γ) 之间的互相转换。
//!
//! `to_cartesian` 是重建而非严格逆变换：取向被规范化为
//! a 沿 `a_direction`，ab 平面法向沿 `ab_normal`。
//!
//! ## 依赖关系
//! - 被 `models/cell.rs`, `reader.rs`, `writers/` 使用
//! - 使用 `geometry/vector.rs`

use super::vector::{cross, dot, mat_mul, norm, scale, sub, unit, Mat3, Vec3};

use std::f64::consts::FRAC_PI_2;

/// 长度乘积低于该值视为退化轴，夹角取 90°
const DEGENERATE_LENGTH_PRODUCT: f64 = 1e-16;

/// 判断 `ab_normal` 是否与 x 轴平行
const PARALLEL_EPS: f64 = 1e-5;

/// sin 接近 ±1 时吸附为正交轴
const ORTHOGONAL_SNAP_EPS: f64 = 1e-14;

/// 晶胞矩阵 -> (长度, 夹角)
///
/// `angle[i]` 为另外两个轴之间的夹角：α = ∠(b, c), β = ∠(c, a), γ = ∠(a, b)。
pub fn to_lengths_angles(cell: &Mat3, angles_in_radians: bool) -> (Vec3, Vec3) {
    let lengths = [norm(&cell[0]), norm(&cell[1]), norm(&cell[2])];
    let mut angles = [0.0; 3];

    for i in 0..3 {
        let j = (i + 2) % 3;
        let k = (i + 1) % 3;
        let ll = lengths[j] * lengths[k];
        angles[i] = if ll > DEGENERATE_LENGTH_PRODUCT {
            (dot(&cell[j], &cell[k]) / ll).clamp(-1.0, 1.0).acos()
        } else {
            FRAC_PI_2
        };
    }

    if !angles_in_radians {
        for angle in &mut angles {
            *angle = angle.to_degrees();
        }
    }

    (lengths, angles)
}

/// 重建晶胞矩阵时的取向约束
#[derive(Debug, Clone, Copy)]
pub struct Orientation {
    /// ab 平面的法向
    pub ab_normal: Vec3,
    /// a 轴方向（会先投影到 ab 平面内）；`None` 时自动选择
    pub a_direction: Option<Vec3>,
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation {
            ab_normal: [0.0, 0.0, 1.0],
            a_direction: None,
        }
    }
}

/// (长度, 夹角) -> 晶胞矩阵，使用默认取向
pub fn to_cartesian(lengths: &Vec3, angles: &Vec3, angles_in_radians: bool) -> Mat3 {
    to_cartesian_oriented(lengths, angles, Orientation::default(), angles_in_radians)
}

/// (长度, 夹角) -> 晶胞矩阵
pub fn to_cartesian_oriented(
    lengths: &Vec3,
    angles: &Vec3,
    orientation: Orientation,
    angles_in_radians: bool,
) -> Mat3 {
    let a_direction = orientation.a_direction.unwrap_or_else(|| {
        if norm(&cross(&orientation.ab_normal, &[1.0, 0.0, 0.0])) < PARALLEL_EPS {
            [0.0, 0.0, 1.0]
        } else {
            [1.0, 0.0, 0.0]
        }
    });

    // 正交基
    let z = unit(&orientation.ab_normal);
    let x = unit(&sub(&a_direction, &scale(&z, dot(&a_direction, &z))));
    let y = cross(&z, &x);
    let basis = [x, y, z];

    let radians = if angles_in_radians {
        *angles
    } else {
        [
            angles[0].to_radians(),
            angles[1].to_radians(),
            angles[2].to_radians(),
        ]
    };

    let (cos_alpha, _) = snapped_cos_sin(radians[0]);
    let (cos_beta, _) = snapped_cos_sin(radians[1]);
    let (cos_gamma, sin_gamma) = snapped_cos_sin(radians[2]);

    let [a, b, c] = *lengths;

    let va = [a, 0.0, 0.0];
    let vb = [b * cos_gamma, b * sin_gamma, 0.0];
    let cx = cos_beta;
    let cy = (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
    // 非法夹角组合会让 cz² < 0，截断为 0 避免 NaN
    let cz = (1.0 - cx * cx - cy * cy).max(0.0).sqrt();
    let vc = [c * cx, c * cy, c * cz];

    mat_mul(&[va, vb, vc], &basis)
}

/// 返回 (cos, sin)，sin 在 1e-14 内接近 ±1 时吸附为 (0, ±1)
fn snapped_cos_sin(angle: f64) -> (f64, f64) {
    let sin = angle.sin();
    if (sin.abs() - 1.0).abs() < ORTHOGONAL_SNAP_EPS {
        (0.0, sin.signum())
    } else {
        (angle.cos(), sin)
    }
}
