//! # AIRSS .res (SHELX) 输出
//!
//! ```text
//! TITL name 0.0 volume 0.0 0.0 0 0 N (P1)
//! CELL 1.0 a b c alpha beta gamma
//! LATT -1
//! SFAC El1 El2 ...
//! El idx x y z occ
//! END
//! ```
//!
//! ## 依赖关系
//! - 被 `writers/mod.rs` 使用

use super::{occupancies, periodic_data, species_order};
use crate::error::Result;
use crate::geometry;
use crate::models::Atoms;

/// 转换为 .res 格式
pub fn to_res_string(atoms: &Atoms, name: &str) -> Result<String> {
    let (m, scaled) = periodic_data(atoms, "RES")?;
    let (lengths, angles) = geometry::to_lengths_angles(&m, false);
    let volume = atoms.volume().unwrap_or(0.0);
    let symbols = atoms.symbols();
    let elements = species_order(&symbols);
    let occupancy = occupancies(atoms);

    let title = if name.is_empty() { "structure" } else { name };
    let mut result = format!(
        "TITL {} 0.000000 {:.6} 0.0000000000 0.0000000000 0 0 {} (P1)\n",
        title.replace(char::is_whitespace, "_"),
        volume,
        atoms.len()
    );

    result.push_str(&format!(
        "CELL 1.0 {:.10} {:.10} {:.10} {:.6} {:.6} {:.6}\n",
        lengths[0], lengths[1], lengths[2], angles[0], angles[1], angles[2]
    ));
    result.push_str("LATT -1\n");
    result.push_str(&format!("SFAC {}\n", elements.join(" ")));

    for ((symbol, p), occ) in symbols.iter().zip(&scaled).zip(&occupancy) {
        let index = elements
            .iter()
            .position(|e| e == symbol)
            .map(|i| i + 1)
            .unwrap_or(1);
        result.push_str(&format!(
            "{} {} {:.10} {:.10} {:.10} {:.4}\n",
            symbol, index, p[0], p[1], p[2], occ
        ));
    }

    result.push_str("END\n");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AtomArray, CellSpec};

    #[test]
    fn test_res_layout() {
        let atoms = Atoms::builder(["Ti", "C"])
            .positions(vec![vec![0.0, 0.0, 0.0], vec![0.5, 0.5, 0.5]])
            .cell(CellSpec::Cubic(4.33))
            .scaled(true)
            .array("occupancy", AtomArray::Float(vec![1.0, 0.5]))
            .build()
            .unwrap();
        let text = to_res_string(&atoms, "TiC").unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("TITL TiC "));
        assert!(lines[0].ends_with(" 2 (P1)"));
        assert!(lines[1].starts_with("CELL 1.0 4.3300000000"));
        assert_eq!(lines[2], "LATT -1");
        assert_eq!(lines[3], "SFAC Ti C");
        assert!(lines[5].starts_with("C 2 0.5000000000"));
        assert!(lines[5].ends_with("0.5000"));
        assert_eq!(lines[6], "END");
    }
}
