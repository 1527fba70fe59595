//! # CIF 输出
//!
//! 以 P1 空间群写出全部原子的分数坐标，输出可以被本库重新读入。
//!
//! ## 依赖关系
//! - 被 `writers/mod.rs` 使用

use super::{occupancies, periodic_data};
use crate::error::Result;
use crate::geometry;
use crate::models::Atoms;

/// 转换为 CIF 格式 (P1)
pub fn to_cif_string(atoms: &Atoms, name: &str) -> Result<String> {
    let (m, scaled) = periodic_data(atoms, "CIF")?;
    let (lengths, angles) = geometry::to_lengths_angles(&m, false);
    let symbols = atoms.symbols();
    let labels = atoms.labels();
    let occupancy = occupancies(atoms);

    let block_name = if name.is_empty() { "structure" } else { name };

    let mut result = String::new();
    result.push_str(&format!(
        "data_{}\n",
        block_name.replace(char::is_whitespace, "_")
    ));
    result.push_str("_symmetry_space_group_name_H-M    'P 1'\n");
    result.push_str("_symmetry_Int_Tables_number       1\n\n");

    result.push_str(&format!("_cell_length_a    {:.6}\n", lengths[0]));
    result.push_str(&format!("_cell_length_b    {:.6}\n", lengths[1]));
    result.push_str(&format!("_cell_length_c    {:.6}\n", lengths[2]));
    result.push_str(&format!("_cell_angle_alpha {:.4}\n", angles[0]));
    result.push_str(&format!("_cell_angle_beta  {:.4}\n", angles[1]));
    result.push_str(&format!("_cell_angle_gamma {:.4}\n\n", angles[2]));

    result.push_str("loop_\n");
    result.push_str("_symmetry_equiv_pos_as_xyz\n");
    result.push_str("  'x, y, z'\n\n");

    result.push_str("loop_\n");
    result.push_str("_atom_site_label\n");
    result.push_str("_atom_site_type_symbol\n");
    result.push_str("_atom_site_fract_x\n");
    result.push_str("_atom_site_fract_y\n");
    result.push_str("_atom_site_fract_z\n");
    result.push_str("_atom_site_occupancy\n");

    for (i, (symbol, p)) in symbols.iter().zip(&scaled).enumerate() {
        let label = labels
            .as_ref()
            .and_then(|l| l.get(i))
            .filter(|l| !l.is_empty() && !l.contains(char::is_whitespace))
            .cloned()
            .unwrap_or_else(|| format!("{}{}", symbol, i + 1));
        result.push_str(&format!(
            "{} {} {:.10} {:.10} {:.10} {:.4}\n",
            label, symbol, p[0], p[1], p[2], occupancy[i]
        ));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CellSpec;
    use crate::reader::{read_cif_str, ReadOptions};

    #[test]
    fn test_cif_output_reads_back() {
        let atoms = Atoms::builder(["Fe", "Fe"])
            .positions(vec![vec![0.0, 0.0, 0.0], vec![0.5, 0.5, 0.5]])
            .cell(CellSpec::LengthsAngles([2.87, 2.87, 2.87], [90.0, 90.0, 90.0]))
            .scaled(true)
            .labels(["Fe1", "Fe2"])
            .build()
            .unwrap();
        let text = to_cif_string(&atoms, "bcc Fe").unwrap();
        assert!(text.starts_with("data_bcc_Fe\n"));

        let report = read_cif_str(&text, &ReadOptions::default()).unwrap();
        let back = &report.structures["bcc_Fe"];
        assert_eq!(back.len(), 2);
        assert_eq!(back.labels().unwrap(), vec!["Fe1", "Fe2"]);
        let (lengths, angles) = back.cell_lengths_angles().unwrap();
        assert!((lengths[0] - 2.87).abs() < 1e-6);
        assert!((angles[2] - 90.0).abs() < 1e-4);
        let scaled = back.scaled_positions().unwrap();
        assert!((scaled[1][2] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_generated_labels() {
        let atoms = Atoms::builder(["Si"])
            .positions3(&[[0.0; 3]])
            .cell(CellSpec::Cubic(5.43))
            .build()
            .unwrap();
        let text = to_cif_string(&atoms, "").unwrap();
        assert!(text.starts_with("data_structure\n"));
        assert!(text.contains("\nSi1 Si 0.0000000000"));
    }
}
