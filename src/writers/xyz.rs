//! # 扩展 XYZ 输出
//!
//! ```text
//! 2
//! Lattice="5.64 0 0 0 5.64 0 0 0 5.64" Properties=species:S:1:pos:R:3 pbc="T T T" name=NaCl
//! Na   0.0000000000   0.0000000000   0.0000000000
//! Cl   2.8200000000   2.8200000000   2.8200000000
//! ```
//!
//! 只有三维周期结构才写出 `Lattice`。
//!
//! ## 依赖关系
//! - 被 `writers/mod.rs` 使用

use crate::error::Result;
use crate::models::Atoms;

/// 转换为扩展 XYZ 格式
pub fn to_xyz_string(atoms: &Atoms, name: &str) -> Result<String> {
    let mut result = String::new();
    result.push_str(&format!("{}\n", atoms.len()));

    let mut comment = Vec::new();
    if let Some(m) = atoms.cell_matrix() {
        let values: Vec<String> = m.iter().flatten().map(|v| format!("{:.10}", v)).collect();
        comment.push(format!("Lattice=\"{}\"", values.join(" ")));
    }
    comment.push("Properties=species:S:1:pos:R:3".to_string());
    let pbc: Vec<&str> = atoms
        .pbc()
        .iter()
        .map(|&p| if p { "T" } else { "F" })
        .collect();
    comment.push(format!("pbc=\"{}\"", pbc.join(" ")));
    if !name.is_empty() {
        comment.push(format!("name={}", name.replace(char::is_whitespace, "_")));
    }
    result.push_str(&comment.join(" "));
    result.push('\n');

    for (symbol, p) in atoms.symbols().iter().zip(atoms.positions()) {
        result.push_str(&format!(
            "{:<3} {:16.10} {:16.10} {:16.10}\n",
            symbol, p[0], p[1], p[2]
        ));
    }

    Ok(result)
}
