//! # 几何计算模块
//!
//! 晶胞矩阵与晶胞参数之间的转换，以及小尺寸向量/矩阵运算。
//!
//! ## 依赖关系
//! - 被 `models/`, `symmetry/`, `reader.rs`, `writers/` 使用
//! - 子模块: vector, cellpar

pub mod cellpar;
pub mod vector;

pub use cellpar::{to_cartesian, to_cartesian_oriented, to_lengths_angles, Orientation};
pub use vector::{Mat3, Vec3};
