//! # 周期性原子结构模型
//!
//! `Atoms` 在构建时完成全部校验，之后不可变；所有查询都返回拷贝，
//! 外部修改不会影响内部数据，因此实例可以在线程间自由共享。
//!
//! 每个逐原子数组的长度都严格等于原子数 N。
//!
//! ## 依赖关系
//! - 被 `reader.rs`, `writers/`, `commands/` 使用
//! - 使用 `models/cell.rs`, `models/species.rs`, `elements.rs`, `geometry/`

use super::cell::{full_matrix, Cell, CellSpec};
use super::species::AtomicSpecies;
use crate::elements::{ElementTable, PeriodicTable};
use crate::error::{CifAtomsError, Result};
use crate::geometry::{self, vector, Mat3, Vec3};

use std::collections::BTreeMap;

/// 内置数组名称
const BUILTIN_ARRAYS: [&str; 4] = ["symbols", "numbers", "positions", "labels"];

/// 逐原子附加数组
#[derive(Debug, Clone, PartialEq)]
pub enum AtomArray {
    Float(Vec<f64>),
    Int(Vec<i64>),
    Text(Vec<String>),
    Vector(Vec<Vec3>),
}

impl AtomArray {
    pub fn len(&self) -> usize {
        match self {
            AtomArray::Float(v) => v.len(),
            AtomArray::Int(v) => v.len(),
            AtomArray::Text(v) => v.len(),
            AtomArray::Vector(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 原子结构
#[derive(Debug, Clone)]
pub struct Atoms {
    symbols: Vec<String>,
    numbers: Vec<i32>,
    /// 笛卡尔坐标 (Å)
    positions: Vec<Vec3>,
    labels: Option<Vec<String>>,
    cell: Cell,
    inv_cell: Option<Mat3>,
    pbc: [bool; 3],
    arrays: BTreeMap<String, AtomArray>,
}

/// `Atoms` 构建器
#[derive(Debug, Clone)]
pub struct AtomsBuilder {
    species: SpeciesInput,
    positions: Vec<Vec<f64>>,
    cell: CellSpec,
    scaled: bool,
    tolerant: bool,
    labels: Option<Vec<String>>,
    arrays: Vec<(String, AtomArray)>,
}

#[derive(Debug, Clone)]
enum SpeciesInput {
    Symbols(Vec<String>),
    Numbers(Vec<i32>),
}

impl AtomsBuilder {
    /// 按元素符号创建
    pub fn new<S: Into<String>>(symbols: impl IntoIterator<Item = S>) -> Self {
        Self::with_species(SpeciesInput::Symbols(
            symbols.into_iter().map(Into::into).collect(),
        ))
    }

    /// 按原子序数创建
    pub fn from_numbers(numbers: impl IntoIterator<Item = i32>) -> Self {
        Self::with_species(SpeciesInput::Numbers(numbers.into_iter().collect()))
    }

    fn with_species(species: SpeciesInput) -> Self {
        AtomsBuilder {
            species,
            positions: Vec::new(),
            cell: CellSpec::None,
            scaled: false,
            tolerant: false,
            labels: None,
            arrays: Vec::new(),
        }
    }

    /// 坐标行，每行必须恰好 3 个分量
    pub fn positions(mut self, rows: Vec<Vec<f64>>) -> Self {
        self.positions = rows;
        self
    }

    pub fn positions3(mut self, rows: &[Vec3]) -> Self {
        self.positions = rows.iter().map(|p| p.to_vec()).collect();
        self
    }

    pub fn cell(mut self, cell: CellSpec) -> Self {
        self.cell = cell;
        self
    }

    /// 坐标为分数坐标（需要三维周期）
    pub fn scaled(mut self, scaled: bool) -> Self {
        self.scaled = scaled;
        self
    }

    /// 未知元素记为原子序数 -1 而不是报错
    pub fn tolerant(mut self, tolerant: bool) -> Self {
        self.tolerant = tolerant;
        self
    }

    pub fn labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn array(mut self, name: impl Into<String>, values: AtomArray) -> Self {
        self.arrays.push((name.into(), values));
        self
    }

    /// 使用内置元素表构建
    pub fn build(self) -> Result<Atoms> {
        self.build_with(&PeriodicTable)
    }

    pub fn build_with(self, table: &dyn ElementTable) -> Result<Atoms> {
        let species = self.resolve_species(table)?;
        let n = species.len();

        if self.positions.len() != n {
            return Err(CifAtomsError::ArrayLengthMismatch {
                name: "positions".to_string(),
                expected: n,
                found: self.positions.len(),
            });
        }

        let mut positions: Vec<Vec3> = Vec::with_capacity(n);
        for row in &self.positions {
            match row.as_slice() {
                [x, y, z] => positions.push([*x, *y, *z]),
                _ => {
                    return Err(CifAtomsError::ArrayLengthMismatch {
                        name: "positions".to_string(),
                        expected: 3,
                        found: row.len(),
                    })
                }
            }
        }

        let (cell, pbc) = self.cell.resolve()?;
        let matrix = full_matrix(&cell);
        let inv_cell = matrix.as_ref().and_then(vector::inverse);
        if matrix.is_some() && inv_cell.is_none() {
            return Err(CifAtomsError::InvalidCellSpec(
                "cell vectors are linearly dependent".to_string(),
            ));
        }

        if self.scaled {
            let m = matrix.ok_or(CifAtomsError::NonPeriodicScaledCoordinates)?;
            for p in &mut positions {
                *p = vector::vec_mat(p, &m);
            }
        }

        if let Some(labels) = &self.labels {
            check_length("labels", n, labels.len())?;
        }

        let mut arrays = BTreeMap::new();
        for (name, values) in self.arrays {
            if BUILTIN_ARRAYS.contains(&name.as_str()) {
                return Err(CifAtomsError::InvalidArgument(format!(
                    "'{}' is a built-in array",
                    name
                )));
            }
            check_length(&name, n, values.len())?;
            arrays.insert(name, values);
        }

        let (symbols, numbers): (Vec<String>, Vec<i32>) =
            species.into_iter().map(|s| (s.symbol, s.number)).unzip();

        Ok(Atoms {
            symbols,
            numbers,
            positions,
            labels: self.labels,
            cell,
            inv_cell,
            pbc,
            arrays,
        })
    }

    fn resolve_species(&self, table: &dyn ElementTable) -> Result<Vec<AtomicSpecies>> {
        match &self.species {
            SpeciesInput::Symbols(symbols) => symbols
                .iter()
                .map(|s| match table.lookup_by_symbol(s) {
                    Some(species) => Ok(species),
                    None if self.tolerant => Ok(AtomicSpecies::unknown(s.as_str())),
                    None => Err(CifAtomsError::UnknownSpecies { symbol: s.clone() }),
                })
                .collect(),
            SpeciesInput::Numbers(numbers) => numbers
                .iter()
                .map(|&z| {
                    table
                        .lookup_by_number(z)
                        .ok_or_else(|| CifAtomsError::UnknownSpecies {
                            symbol: z.to_string(),
                        })
                })
                .collect(),
        }
    }
}

fn check_length(name: &str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(CifAtomsError::ArrayLengthMismatch {
            name: name.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

impl Atoms {
    pub fn builder<S: Into<String>>(symbols: impl IntoIterator<Item = S>) -> AtomsBuilder {
        AtomsBuilder::new(symbols)
    }

    /// 原子数
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> Vec<String> {
        self.symbols.clone()
    }

    /// 原子序数；宽松模式下未识别的元素为 -1
    pub fn numbers(&self) -> Vec<i32> {
        self.numbers.clone()
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.positions.clone()
    }

    pub fn labels(&self) -> Option<Vec<String>> {
        self.labels.clone()
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// 完整的 3×3 晶胞矩阵（仅三维周期）
    pub fn cell_matrix(&self) -> Option<Mat3> {
        full_matrix(&self.cell)
    }

    pub fn inv_cell(&self) -> Option<Mat3> {
        self.inv_cell
    }

    pub fn pbc(&self) -> [bool; 3] {
        self.pbc
    }

    pub fn is_periodic(&self) -> bool {
        self.pbc.iter().all(|&p| p)
    }

    /// 分数坐标：`p · inv_cell`
    pub fn scaled_positions(&self) -> Result<Vec<Vec3>> {
        let inv = self
            .inv_cell
            .as_ref()
            .ok_or(CifAtomsError::NonPeriodicScaledCoordinates)?;
        Ok(self
            .positions
            .iter()
            .map(|p| vector::vec_mat(p, inv))
            .collect())
    }

    /// 按名称取数组（包括内置数组）
    pub fn array(&self, name: &str) -> Option<AtomArray> {
        match name {
            "symbols" => Some(AtomArray::Text(self.symbols.clone())),
            "numbers" => Some(AtomArray::Int(
                self.numbers.iter().map(|&z| z as i64).collect(),
            )),
            "positions" => Some(AtomArray::Vector(self.positions.clone())),
            "labels" => self.labels.clone().map(AtomArray::Text),
            _ => self.arrays.get(name).cloned(),
        }
    }

    pub fn array_names(&self) -> Vec<String> {
        let mut names: Vec<String> = BUILTIN_ARRAYS[..3].iter().map(|s| s.to_string()).collect();
        if self.labels.is_some() {
            names.push("labels".to_string());
        }
        names.extend(self.arrays.keys().cloned());
        names
    }

    /// 返回附加了新数组的结构，自身保持不变
    ///
    /// `labels` 只接受文本数组；其余内置数组不可替换。
    pub fn with_array(&self, name: &str, values: AtomArray) -> Result<Atoms> {
        check_length(name, self.len(), values.len())?;

        let mut next = self.clone();
        match (name, values) {
            ("labels", AtomArray::Text(labels)) => next.labels = Some(labels),
            ("labels", _) => {
                return Err(CifAtomsError::InvalidArgument(
                    "'labels' must be a text array".to_string(),
                ))
            }
            (builtin, _) if BUILTIN_ARRAYS.contains(&builtin) => {
                return Err(CifAtomsError::InvalidArgument(format!(
                    "'{}' is a built-in array",
                    builtin
                )))
            }
            (_, values) => {
                next.arrays.insert(name.to_string(), values);
            }
        }
        Ok(next)
    }

    /// 化学式，元素按字母序
    pub fn formula(&self) -> String {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for symbol in &self.symbols {
            *counts.entry(symbol.as_str()).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(el, count)| {
                if count == 1 {
                    el.to_string()
                } else {
                    format!("{}{}", el, count)
                }
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// 晶胞体积 (Å³)
    pub fn volume(&self) -> Option<f64> {
        self.cell_matrix().map(|m| vector::determinant(&m).abs())
    }

    /// (a, b, c), (α, β, γ)，夹角单位为度
    pub fn cell_lengths_angles(&self) -> Option<(Vec3, Vec3)> {
        self.cell_matrix()
            .map(|m| geometry::to_lengths_angles(&m, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nacl() -> Atoms {
        Atoms::builder(["Na", "Cl"])
            .positions(vec![vec![0.0, 0.0, 0.0], vec![0.5, 0.5, 0.5]])
            .cell(CellSpec::Cubic(5.64))
            .scaled(true)
            .build()
            .unwrap()
    }

    #[test]
    fn test_array_lengths_match_atom_count() {
        let atoms = nacl();
        assert_eq!(atoms.len(), 2);
        assert_eq!(atoms.symbols().len(), 2);
        assert_eq!(atoms.numbers(), vec![11, 17]);
        assert_eq!(atoms.positions().len(), 2);
        assert!((atoms.positions()[1][0] - 2.82).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_species_strict() {
        let result = Atoms::builder(["Xx"])
            .positions(vec![vec![0.0, 0.0, 0.0]])
            .build();
        assert!(matches!(
            result,
            Err(CifAtomsError::UnknownSpecies { ref symbol }) if symbol == "Xx"
        ));
    }

    #[test]
    fn test_unknown_species_tolerant() {
        let atoms = Atoms::builder(["Xx", "O"])
            .positions(vec![vec![0.0, 0.0, 0.0], vec![1.0, 0.0, 0.0]])
            .tolerant(true)
            .build()
            .unwrap();
        assert_eq!(atoms.numbers(), vec![-1, 8]);
        assert_eq!(atoms.symbols(), vec!["Xx".to_string(), "O".to_string()]);
    }

    #[test]
    fn test_from_numbers() {
        let atoms = AtomsBuilder::from_numbers([26, 8])
            .positions(vec![vec![0.0; 3], vec![1.0; 3]])
            .build()
            .unwrap();
        assert_eq!(atoms.symbols(), vec!["Fe".to_string(), "O".to_string()]);
        assert!(AtomsBuilder::from_numbers([0])
            .positions(vec![vec![0.0; 3]])
            .build()
            .is_err());
    }

    #[test]
    fn test_position_count_mismatch() {
        let result = Atoms::builder(["H", "H"])
            .positions(vec![vec![0.0, 0.0, 0.0]])
            .build();
        assert!(matches!(
            result,
            Err(CifAtomsError::ArrayLengthMismatch { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn test_position_component_mismatch() {
        let result = Atoms::builder(["H"]).positions(vec![vec![0.0, 0.0]]).build();
        assert!(matches!(
            result,
            Err(CifAtomsError::ArrayLengthMismatch { expected: 3, found: 2, .. })
        ));
    }

    #[test]
    fn test_scaled_requires_full_pbc() {
        let result = Atoms::builder(["H"])
            .positions(vec![vec![0.0, 0.0, 0.0]])
            .cell(CellSpec::AxisLengths([Some(1.0), None, Some(1.0)]))
            .scaled(true)
            .build();
        assert!(matches!(
            result,
            Err(CifAtomsError::NonPeriodicScaledCoordinates)
        ));
    }

    #[test]
    fn test_scaled_positions_skewed_cell() {
        let atoms = Atoms::builder(["H"])
            .positions(vec![vec![0.5, 0.5, 1.0]])
            .cell(CellSpec::Cartesian([
                [1.0, 1.0, 0.0],
                [2.0, -2.0, 0.0],
                [0.0, 0.0, 2.0],
            ]))
            .build()
            .unwrap();
        let scaled = atoms.scaled_positions().unwrap();
        assert!((scaled[0][0] - 0.5).abs() < 1e-12);
        assert!(scaled[0][1].abs() < 1e-12);
        assert!((scaled[0][2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_scaled_construction_inverts() {
        let frac = [0.1, 0.7, 0.35];
        let atoms = Atoms::builder(["C"])
            .positions(vec![frac.to_vec()])
            .cell(CellSpec::LengthsAngles([4.0, 5.0, 6.0], [80.0, 100.0, 110.0]))
            .scaled(true)
            .build()
            .unwrap();
        let back = atoms.scaled_positions().unwrap()[0];
        for i in 0..3 {
            assert!((back[i] - frac[i]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_inverse_cell_only_when_fully_periodic() {
        let atoms = Atoms::builder(["H"])
            .positions(vec![vec![0.0; 3]])
            .cell(CellSpec::AxisLengths([Some(1.0), None, Some(1.0)]))
            .build()
            .unwrap();
        assert_eq!(atoms.pbc(), [true, false, true]);
        assert!(atoms.inv_cell().is_none());
        assert!(atoms.cell_matrix().is_none());
        assert!(matches!(
            atoms.scaled_positions(),
            Err(CifAtomsError::NonPeriodicScaledCoordinates)
        ));
        assert!(nacl().inv_cell().is_some());
    }

    #[test]
    fn test_singular_periodic_cell_rejected() {
        let result = Atoms::builder(["H"])
            .positions(vec![vec![0.0; 3]])
            .cell(CellSpec::Cartesian([
                [1.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [0.0, 0.0, 1.0],
            ]))
            .build();
        assert!(matches!(result, Err(CifAtomsError::InvalidCellSpec(_))));
    }

    #[test]
    fn test_accessors_return_copies() {
        let atoms = nacl();
        let mut symbols = atoms.symbols();
        symbols[0] = "K".to_string();
        let mut positions = atoms.positions();
        positions[0][0] = 99.0;
        assert_eq!(atoms.symbols()[0], "Na");
        assert_eq!(atoms.positions()[0][0], 0.0);
    }

    #[test]
    fn test_with_array_shape_checked() {
        let atoms = nacl();
        let err = atoms.with_array("charge", AtomArray::Float(vec![1.0]));
        assert!(matches!(err, Err(CifAtomsError::ArrayLengthMismatch { .. })));

        let charged = atoms
            .with_array("charge", AtomArray::Float(vec![1.0, -1.0]))
            .unwrap();
        assert_eq!(
            charged.array("charge"),
            Some(AtomArray::Float(vec![1.0, -1.0]))
        );
        assert!(atoms.array("charge").is_none());
        assert!(atoms
            .with_array("numbers", AtomArray::Int(vec![1, 1]))
            .is_err());
    }

    #[test]
    fn test_labels_array() {
        let atoms = nacl()
            .with_array("labels", AtomArray::Text(vec!["Na1".into(), "Cl1".into()]))
            .unwrap();
        assert_eq!(atoms.labels(), Some(vec!["Na1".to_string(), "Cl1".to_string()]));
        assert!(atoms.array_names().contains(&"labels".to_string()));
    }

    #[test]
    fn test_builder_rejects_bad_label_length() {
        let result = Atoms::builder(["H", "H"])
            .positions(vec![vec![0.0; 3], vec![1.0; 3]])
            .labels(["H1"])
            .build();
        assert!(matches!(
            result,
            Err(CifAtomsError::ArrayLengthMismatch { ref name, .. }) if name == "labels"
        ));
    }

    #[test]
    fn test_formula_and_volume() {
        let atoms = nacl();
        assert_eq!(atoms.formula(), "ClNa");
        assert!((atoms.volume().unwrap() - 5.64f64.powi(3)).abs() < 1e-9);
        let (lengths, angles) = atoms.cell_lengths_angles().unwrap();
        assert!((lengths[0] - 5.64).abs() < 1e-12);
        assert!((angles[2] - 90.0).abs() < 1e-9);
    }
}
