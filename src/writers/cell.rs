//! # CASTEP .cell 输出
//!
//! 写出 `LATTICE_CART` 与 `POSITIONS_FRAC` 两个块。
//!
//! ## 依赖关系
//! - 被 `writers/mod.rs` 使用

use super::periodic_data;
use crate::error::Result;
use crate::models::Atoms;

/// 转换为 .cell 格式
pub fn to_cell_string(atoms: &Atoms, name: &str) -> Result<String> {
    let (m, scaled) = periodic_data(atoms, "CELL")?;

    let mut result = String::new();
    if !name.is_empty() {
        result.push_str(&format!("# {}\n", name));
    }

    result.push_str("%BLOCK LATTICE_CART\nang\n");
    for row in &m {
        result.push_str(&format!(
            "{:16.10} {:16.10} {:16.10}\n",
            row[0], row[1], row[2]
        ));
    }
    result.push_str("%ENDBLOCK LATTICE_CART\n\n");

    result.push_str("%BLOCK POSITIONS_FRAC\n");
    for (symbol, p) in atoms.symbols().iter().zip(&scaled) {
        result.push_str(&format!(
            "{:4} {:16.10} {:16.10} {:16.10}\n",
            symbol, p[0], p[1], p[2]
        ));
    }
    result.push_str("%ENDBLOCK POSITIONS_FRAC\n");

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellSpec;

    #[test]
    fn test_cell_blocks() {
        let atoms = Atoms::builder(["Na", "Cl"])
            .positions(vec![vec![0.0, 0.0, 0.0], vec![0.5, 0.5, 0.5]])
            .cell(CellSpec::Cubic(5.0))
            .scaled(true)
            .build()
            .unwrap();
        let text = to_cell_string(&atoms, "NaCl").unwrap();

        assert!(text.starts_with("# NaCl\n%BLOCK LATTICE_CART\nang\n"));
        assert!(text.contains("%ENDBLOCK LATTICE_CART"));
        let cl = text
            .lines()
            .find(|l| l.starts_with("Cl"))
            .unwrap()
            .split_whitespace()
            .skip(1)
            .map(|v| v.parse::<f64>().unwrap())
            .collect::<Vec<_>>();
        assert!(cl.iter().all(|v| (v - 0.5).abs() < 1e-9));
    }
}
