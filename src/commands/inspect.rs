//! # inspect 命令实现
//!
//! 读取单个 CIF 文件，按数据块打印结构摘要表，可选导出 CSV。
//!
//! ## 依赖关系
//! - 使用 `cli/inspect.rs` 定义的参数
//! - 使用 `utils/output.rs`, `utils/progress.rs`
//! - 使用 `tabled` 显示表格，`csv` 导出

use crate::cli::inspect::InspectArgs;
use crate::utils::{output, progress};

use cifatoms::{read_cif_file, Atoms, CifAtomsError, Result};

use std::path::Path;
use tabled::{Table, Tabled};

/// 摘要表的一行
#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "Block")]
    block: String,
    #[tabled(rename = "Atoms")]
    atoms: usize,
    #[tabled(rename = "Formula")]
    formula: String,
    #[tabled(rename = "a (Å)")]
    a: String,
    #[tabled(rename = "b (Å)")]
    b: String,
    #[tabled(rename = "c (Å)")]
    c: String,
    #[tabled(rename = "α (°)")]
    alpha: String,
    #[tabled(rename = "β (°)")]
    beta: String,
    #[tabled(rename = "γ (°)")]
    gamma: String,
    #[tabled(rename = "V (Å³)")]
    volume: String,
    #[tabled(rename = "PBC")]
    pbc: String,
}

impl SummaryRow {
    fn new(block: &str, atoms: &Atoms) -> Self {
        let fmt = |v: Option<f64>, prec: usize| match v {
            Some(v) => format!("{:.*}", prec, v),
            None => "-".to_string(),
        };
        let (lengths, angles) = match atoms.cell_lengths_angles() {
            Some((l, a)) => (Some(l), Some(a)),
            None => (None, None),
        };

        Self {
            block: block.to_string(),
            atoms: atoms.len(),
            formula: atoms.formula(),
            a: fmt(lengths.map(|l| l[0]), 4),
            b: fmt(lengths.map(|l| l[1]), 4),
            c: fmt(lengths.map(|l| l[2]), 4),
            alpha: fmt(angles.map(|a| a[0]), 3),
            beta: fmt(angles.map(|a| a[1]), 3),
            gamma: fmt(angles.map(|a| a[2]), 3),
            volume: fmt(atoms.volume(), 3),
            pbc: pbc_flags(atoms),
        }
    }
}

fn pbc_flags(atoms: &Atoms) -> String {
    atoms
        .pbc()
        .iter()
        .map(|&p| if p { "T" } else { "F" })
        .collect::<Vec<_>>()
        .join(" ")
}

/// 执行 inspect 命令
pub fn execute(args: InspectArgs) -> Result<()> {
    output::print_header(&format!("Inspecting {}", args.file.display()));

    let options = args.read.to_options();
    let spinner = progress::create_spinner("Reading CIF...");
    let report = read_cif_file(&args.file, &options);
    spinner.finish_and_clear();
    let report = report?;

    let file = args.file.display().to_string();
    for skipped in &report.skipped {
        output::print_skip(&file, &skipped.name, &skipped.reason);
    }

    if report.structures.is_empty() {
        output::print_warning("No structures found");
        return Ok(());
    }

    let rows: Vec<SummaryRow> = report
        .structures
        .iter()
        .map(|(block, atoms)| SummaryRow::new(block, atoms))
        .collect();

    println!("{}", Table::new(&rows));

    output::print_info(&format!(
        "{} structure(s), {} block(s) skipped",
        rows.len(),
        report.skipped.len()
    ));

    if let Some(csv_path) = &args.csv {
        save_summary_csv(&report.structures, csv_path)?;
        output::print_success(&format!("Summary saved to '{}'", csv_path.display()));
    }

    Ok(())
}

/// 保存摘要到 CSV（数值保留完整精度）
fn save_summary_csv<'a, I>(structures: I, output_path: &Path) -> Result<()>
where
    I: IntoIterator<Item = (&'a String, &'a Atoms)>,
{
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record([
        "block", "atoms", "formula", "a", "b", "c", "alpha", "beta", "gamma", "volume", "pbc",
    ])?;

    for (block, atoms) in structures {
        let mut record = vec![block.clone(), atoms.len().to_string(), atoms.formula()];
        match atoms.cell_lengths_angles() {
            Some((lengths, angles)) => record.extend(
                lengths
                    .iter()
                    .chain(angles.iter())
                    .map(|v| format!("{:.10}", v)),
            ),
            None => record.extend(std::iter::repeat(String::new()).take(6)),
        }
        record.push(
            atoms
                .volume()
                .map(|v| format!("{:.10}", v))
                .unwrap_or_default(),
        );
        record.push(pbc_flags(atoms));
        wtr.write_record(&record)?;
    }

    wtr.flush().map_err(|e| CifAtomsError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cifatoms::read_cif_str;

    const SAMPLE: &str = "data_cubic
_cell_length_a 4.0
_cell_length_b 4.0
_cell_length_c 4.0
loop_
_atom_site_label
_atom_site_fract_x
_atom_site_fract_y
_atom_site_fract_z
Cu1 0 0 0
data_molecule
loop_
_atom_site_label
_atom_site_Cartn_x
_atom_site_Cartn_y
_atom_site_Cartn_z
O1 0 0 0
H1 0.96 0 0
";

    #[test]
    fn test_summary_row_periodic_and_molecular() {
        let report = read_cif_str(SAMPLE, &Default::default()).unwrap();

        let cubic = SummaryRow::new("cubic", &report.structures["cubic"]);
        assert_eq!(cubic.atoms, 1);
        assert_eq!(cubic.a, "4.0000");
        assert_eq!(cubic.gamma, "90.000");
        assert_eq!(cubic.volume, "64.000");
        assert_eq!(cubic.pbc, "T T T");

        let molecule = SummaryRow::new("molecule", &report.structures["molecule"]);
        assert_eq!(molecule.formula, "HO");
        assert_eq!(molecule.a, "-");
        assert_eq!(molecule.volume, "-");
        assert_eq!(molecule.pbc, "F F F");
    }

    #[test]
    fn test_save_summary_csv() {
        let report = read_cif_str(SAMPLE, &Default::default()).unwrap();
        let path = std::env::temp_dir().join(format!("cifatoms-inspect-{}.csv", std::process::id()));

        save_summary_csv(&report.structures, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("block,atoms,formula"));
        assert!(lines[1].starts_with("cubic,1,Cu,4.0000000000"));
        assert!(lines[2].starts_with("molecule,2,HO,,"));
        assert!(lines[2].ends_with(",F F F"));

        std::fs::remove_file(&path).ok();
    }
}
