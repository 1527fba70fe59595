//! # CIF -> 原子结构
//!
//! 对文档中的每个数据块独立处理：
//! 1. 提取原子类型、原子位点与晶胞参数，有晶胞参数即为周期体系
//! 2. 每个位点优先使用笛卡尔坐标，否则由分数坐标经晶胞换算
//! 3. 周期体系且能得到对称操作时，在分数坐标下做对称展开
//! 4. 构建 `Atoms`，附加位点标签、占位率以及原子类型信息
//!
//! 没有可用数据的数据块被跳过并记录在 [`ReadReport::skipped`] 中；
//! 数据块之间互不依赖，使用 rayon 并行处理。
//!
//! ## 依赖关系
//! - 被 `commands/` 与库使用者调用
//! - 使用 `cif/`, `symmetry/`, `models/`, `elements.rs`

use crate::cif::extract::ATOM_SITE_LABEL;
use crate::cif::{self, AtomSite, AtomType, CifDataBlock, CifDocument};
use crate::elements::{element_symbol_from_label, ElementTable, PeriodicTable};
use crate::error::{CifAtomsError, Result};
use crate::geometry::vector::{inverse, vec_mat};
use crate::geometry::{Mat3, Vec3};
use crate::models::cell::full_matrix;
use crate::models::{AtomArray, Atoms, CellSpec};
use crate::symmetry::{self, StandardSymmetry, SymmetryTable};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// 读取选项
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadOptions {
    /// 未知元素记为原子序数 -1 而不是报错
    pub tolerant: bool,
    /// 对称展开时判定重复像的距离容差 (Å)
    pub symprec: f64,
    /// 是否做对称展开
    pub expand_symmetry: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            tolerant: false,
            symprec: 1e-3,
            expand_symmetry: true,
        }
    }
}

/// 被跳过的数据块
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedBlock {
    pub name: String,
    pub reason: String,
}

/// 读取结果
#[derive(Debug, Clone, Default)]
pub struct ReadReport {
    /// 数据块名 -> 结构
    pub structures: BTreeMap<String, Atoms>,
    /// 没有可用数据而被跳过的数据块，按源文件顺序
    pub skipped: Vec<SkippedBlock>,
}

enum BlockOutcome {
    Structure(Atoms),
    Skipped(String),
}

/// CIF 到结构的转换器
pub struct CifReader<'a> {
    elements: &'a dyn ElementTable,
    symmetry: &'a dyn SymmetryTable,
    options: ReadOptions,
}

impl CifReader<'static> {
    /// 使用内置元素表与对称操作实现
    pub fn new(options: ReadOptions) -> Self {
        CifReader {
            elements: &PeriodicTable,
            symmetry: &StandardSymmetry,
            options,
        }
    }
}

impl<'a> CifReader<'a> {
    pub fn with_tables(
        elements: &'a dyn ElementTable,
        symmetry: &'a dyn SymmetryTable,
        options: ReadOptions,
    ) -> Self {
        CifReader {
            elements,
            symmetry,
            options,
        }
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// 处理整个文档；任一数据块出现硬错误时返回该错误
    pub fn read_document(&self, document: &CifDocument) -> Result<ReadReport> {
        let outcomes: Vec<(&str, Result<BlockOutcome>)> = document
            .blocks
            .par_iter()
            .map(|(name, block)| (name.as_str(), self.read_block(name, block)))
            .collect();

        let mut report = ReadReport::default();
        for (name, outcome) in outcomes {
            match outcome? {
                BlockOutcome::Structure(atoms) => {
                    report.structures.insert(name.to_string(), atoms);
                }
                BlockOutcome::Skipped(reason) => report.skipped.push(SkippedBlock {
                    name: name.to_string(),
                    reason,
                }),
            }
        }
        Ok(report)
    }

    fn read_block(&self, name: &str, block: &CifDataBlock) -> Result<BlockOutcome> {
        if !block.contains(ATOM_SITE_LABEL) {
            return Ok(BlockOutcome::Skipped("no _atom_site_label".to_string()));
        }
        let sites = match cif::atom_sites(block) {
            Some(sites) if !sites.is_empty() => sites,
            _ => return Ok(BlockOutcome::Skipped("no atom sites".to_string())),
        };
        if !has_coordinate_columns(block) {
            return Ok(BlockOutcome::Skipped("no coordinate columns".to_string()));
        }

        let types = cif::atom_types(block).unwrap_or_default();
        // 无法构成晶胞的参数只影响本数据块
        let cell = match cif::cell_parameters(block) {
            Some((lengths, angles)) => match realize_cell(lengths, angles) {
                Ok(cell) => Some(cell),
                Err(e) => return Ok(BlockOutcome::Skipped(format!("unusable cell: {}", e))),
            },
            None => None,
        };

        let mut positions = Vec::with_capacity(sites.len());
        let mut labels = Vec::with_capacity(sites.len());
        let mut symbols = Vec::with_capacity(sites.len());
        for site in &sites {
            positions.push(site_position(name, site, cell.as_ref())?);
            labels.push(site.label.clone());
            let source = site.type_symbol.as_deref().unwrap_or(&site.label);
            symbols.push(element_symbol_from_label(self.elements, source));
        }
        let mut origins: Vec<usize> = (0..sites.len()).collect();

        if let (Some((matrix, inv)), true) = (cell, self.options.expand_symmetry) {
            if let Some(operators) = cif::symmetry_operators(block, self.symmetry) {
                let fractional: Vec<Vec3> = positions.iter().map(|p| vec_mat(p, &inv)).collect();
                let expanded = symmetry::expand(
                    &matrix,
                    &fractional,
                    &labels,
                    &symbols,
                    &operators,
                    self.options.symprec,
                )?;
                positions = expanded
                    .positions
                    .iter()
                    .map(|f| vec_mat(f, &matrix))
                    .collect();
                labels = expanded.labels;
                symbols = expanded.symbols;
                origins = expanded.origins;
            }
        }

        let cell_spec = match cell {
            Some((matrix, _)) => CellSpec::Cartesian(matrix),
            None => CellSpec::None,
        };

        let mut builder = Atoms::builder(symbols)
            .positions3(&positions)
            .cell(cell_spec)
            .tolerant(self.options.tolerant)
            .labels(labels);
        for (array_name, values) in site_arrays(&sites, &types, &origins) {
            builder = builder.array(array_name, values);
        }

        Ok(BlockOutcome::Structure(builder.build_with(self.elements)?))
    }
}

fn has_coordinate_columns(block: &CifDataBlock) -> bool {
    [
        "_atom_site_cartn_x",
        "_atom_site_cartn_y",
        "_atom_site_cartn_z",
        "_atom_site_fract_x",
        "_atom_site_fract_y",
        "_atom_site_fract_z",
    ]
    .iter()
    .any(|tag| block.contains(tag))
}

/// 晶胞参数 -> (晶胞矩阵, 逆矩阵)
fn realize_cell(lengths: Vec3, angles: Vec3) -> Result<(Mat3, Mat3)> {
    let (cell, _) = CellSpec::LengthsAngles(lengths, angles).resolve()?;
    let matrix = full_matrix(&cell)
        .ok_or_else(|| CifAtomsError::InvalidCellSpec("incomplete cell".to_string()))?;
    let inv = inverse(&matrix).ok_or_else(|| {
        CifAtomsError::InvalidCellSpec(format!(
            "singular cell for lengths {:?} and angles {:?}",
            lengths, angles
        ))
    })?;
    Ok((matrix, inv))
}

/// 位点的笛卡尔坐标：优先显式笛卡尔坐标，其次分数坐标
fn site_position(block: &str, site: &AtomSite, cell: Option<&(Mat3, Mat3)>) -> Result<Vec3> {
    match (site.cartesian, site.fractional, cell) {
        (Some(cartesian), _, _) => Ok(cartesian),
        (None, Some(fractional), Some((matrix, _))) => Ok(vec_mat(&fractional, matrix)),
        _ => Err(CifAtomsError::MissingCoordinates {
            block: block.to_string(),
            label: site.label.clone(),
        }),
    }
}

/// 附加数组：占位率（缺省 1.0），以及原子类型表中存在的成键半径与描述
fn site_arrays(
    sites: &[AtomSite],
    types: &HashMap<String, AtomType>,
    origins: &[usize],
) -> Vec<(&'static str, AtomArray)> {
    let mut arrays = vec![(
        "occupancy",
        AtomArray::Float(
            origins
                .iter()
                .map(|&i| sites[i].occupancy.unwrap_or(1.0))
                .collect(),
        ),
    )];

    if types.values().any(|t| t.bond_radius.is_some()) {
        let radii = origins
            .iter()
            .map(|&i| {
                type_of(&sites[i], types)
                    .and_then(|t| t.bond_radius)
                    .unwrap_or(f64::NAN)
            })
            .collect();
        arrays.push(("bond_radius", AtomArray::Float(radii)));
    }

    if types.values().any(|t| t.description.is_some()) {
        let descriptions = origins
            .iter()
            .map(|&i| {
                type_of(&sites[i], types)
                    .and_then(|t| t.description.clone())
                    .unwrap_or_default()
            })
            .collect();
        arrays.push(("type_description", AtomArray::Text(descriptions)));
    }

    arrays
}

fn type_of<'t>(site: &AtomSite, types: &'t HashMap<String, AtomType>) -> Option<&'t AtomType> {
    site.type_symbol.as_ref().and_then(|s| types.get(s))
}

// ─────────────────────────────────────────────────────────────
// 入口函数
// ─────────────────────────────────────────────────────────────

/// 将已解析的文档转换为 数据块名 -> 结构
pub fn cif_to_structures(
    document: &CifDocument,
    options: &ReadOptions,
) -> Result<BTreeMap<String, Atoms>> {
    Ok(CifReader::new(*options).read_document(document)?.structures)
}

/// 解析 CIF 文本并转换
pub fn read_cif_str(text: &str, options: &ReadOptions) -> Result<ReadReport> {
    let document = cif::parse(text)?;
    CifReader::new(*options).read_document(&document)
}

/// 读取 CIF 文件并转换
pub fn read_cif_file(path: &Path, options: &ReadOptions) -> Result<ReadReport> {
    if !path.exists() {
        return Err(CifAtomsError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let text = fs::read_to_string(path).map_err(|e| CifAtomsError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    read_cif_str(&text, options)
}
