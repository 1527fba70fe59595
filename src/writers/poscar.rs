//! # VASP POSCAR 输出
//!
//! VASP 5 格式：元素行 + 数量行，分数坐标 (`Direct`)，原子按元素分组。
//!
//! ## 依赖关系
//! - 被 `writers/mod.rs` 使用

use super::{periodic_data, species_order};
use crate::error::Result;
use crate::models::Atoms;

/// 转换为 POSCAR 格式
pub fn to_poscar_string(atoms: &Atoms, name: &str) -> Result<String> {
    let (m, scaled) = periodic_data(atoms, "POSCAR")?;
    let symbols = atoms.symbols();
    let order = species_order(&symbols);

    let mut result = String::new();

    // 注释行与缩放因子
    result.push_str(&format!("{}\n", name));
    result.push_str("1.0\n");

    for row in &m {
        result.push_str(&format!(
            "  {:16.10}  {:16.10}  {:16.10}\n",
            row[0], row[1], row[2]
        ));
    }

    let counts: Vec<String> = order
        .iter()
        .map(|e| symbols.iter().filter(|s| *s == e).count().to_string())
        .collect();
    result.push_str(&format!("   {}\n", order.join("   ")));
    result.push_str(&format!("   {}\n", counts.join("   ")));

    result.push_str("Direct\n");
    for element in &order {
        for (symbol, p) in symbols.iter().zip(&scaled) {
            if symbol == element {
                result.push_str(&format!(
                    "  {:16.10}  {:16.10}  {:16.10}\n",
                    p[0], p[1], p[2]
                ));
            }
        }
    }

    Ok(result)
}
