//! # CIF 数据块提取
//!
//! 从无类型的 [`CifDataBlock`] 中提取原子类型、原子位点、晶胞参数与对称操作。
//!
//! 所有提取函数返回 `Option`：锚定标签缺失、晶胞长度为零等情况
//! 视为"无数据"，不产生错误。
//!
//! ## 依赖关系
//! - 被 `reader.rs` 使用
//! - 使用 `cif/dom.rs`, `symmetry/`

use super::dom::{CifDataBlock, LeafValue, TagValue};
use crate::geometry::Vec3;
use crate::symmetry::{SymmetryOperation, SymmetryTable};

use std::collections::HashMap;

// ─────────────────────────────────────────────────────────────
// 标签名
// ─────────────────────────────────────────────────────────────

pub const ATOM_SITE_LABEL: &str = "_atom_site_label";
const ATOM_SITE_TAGS: [&str; 9] = [
    ATOM_SITE_LABEL,
    "_atom_site_type_symbol",
    "_atom_site_cartn_x",
    "_atom_site_cartn_y",
    "_atom_site_cartn_z",
    "_atom_site_fract_x",
    "_atom_site_fract_y",
    "_atom_site_fract_z",
    "_atom_site_occupancy",
];

const ATOM_TYPE_TAGS: [&str; 3] = [
    "_atom_type_symbol",
    "_atom_type_description",
    "_atom_type_radius_bond",
];

const CELL_TAGS: [&str; 6] = [
    "_cell_length_a",
    "_cell_length_b",
    "_cell_length_c",
    "_cell_angle_alpha",
    "_cell_angle_beta",
    "_cell_angle_gamma",
];

const SYMOP_TAGS: [&str; 2] = [
    "_space_group_symop_operation_xyz",
    "_symmetry_equiv_pos_as_xyz",
];

const HALL_TAGS: [&str; 2] = [
    "_space_group_name_hall",
    "_symmetry_space_group_name_hall",
];

/// 缺失夹角时的默认值（度）
const DEFAULT_ANGLE: f64 = 90.0;

// ─────────────────────────────────────────────────────────────
// 数据结构
// ─────────────────────────────────────────────────────────────

/// `_atom_type` 表中的一行
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AtomType {
    pub description: Option<String>,
    pub bond_radius: Option<f64>,
}

/// `_atom_site` 表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct AtomSite {
    pub label: String,
    pub type_symbol: Option<String>,
    /// 三个分量都存在时才为 `Some`
    pub cartesian: Option<Vec3>,
    pub fractional: Option<Vec3>,
    pub occupancy: Option<f64>,
}

// ─────────────────────────────────────────────────────────────
// 提取函数
// ─────────────────────────────────────────────────────────────

/// 按标签组提取值列表
///
/// 第一个标签为锚点，缺失时返回 `None`。锚点为循环时，其他标签必须是
/// 行数相同的循环；锚点为单值时，单值和长度为 1 的循环都被接受。
/// 不满足条件的标签在结果中为 `None`，不影响其他标签。
pub fn extract_tags<'a>(
    block: &'a CifDataBlock,
    tags: &[&str],
) -> Option<Vec<Option<Vec<&'a LeafValue>>>> {
    let (first, rest) = tags.split_first()?;

    let anchor: Vec<&LeafValue> = match block.get(first)? {
        TagValue::Single(v) => vec![v],
        TagValue::Loop(values) => values.iter().collect(),
    };
    let rows = anchor.len();
    let anchor_is_loop = matches!(block.get(first), Some(TagValue::Loop(_)));

    let mut out = Vec::with_capacity(tags.len());
    out.push(Some(anchor));

    for tag in rest {
        let column = match block.get(tag) {
            Some(TagValue::Loop(values)) if values.len() == rows => {
                Some(values.iter().collect())
            }
            Some(TagValue::Single(v)) if !anchor_is_loop => Some(vec![v]),
            _ => None,
        };
        out.push(column);
    }

    Some(out)
}

/// 提取 `_atom_type` 表：元素符号 -> 描述与成键半径
pub fn atom_types(block: &CifDataBlock) -> Option<HashMap<String, AtomType>> {
    let columns = extract_tags(block, &ATOM_TYPE_TAGS)?;
    let symbols = columns[0].as_ref()?;

    let mut types = HashMap::new();
    for (row, symbol) in symbols.iter().enumerate() {
        let Some(symbol) = symbol.as_str() else {
            continue;
        };
        let entry = AtomType {
            description: column_str(&columns[1], row),
            bond_radius: column_f64(&columns[2], row),
        };
        types.insert(symbol.to_string(), entry);
    }
    Some(types)
}

/// 提取 `_atom_site` 表
pub fn atom_sites(block: &CifDataBlock) -> Option<Vec<AtomSite>> {
    let columns = extract_tags(block, &ATOM_SITE_TAGS)?;
    let labels = columns[0].as_ref()?;

    let sites = labels
        .iter()
        .enumerate()
        .map(|(row, label)| AtomSite {
            label: label.text().to_string(),
            type_symbol: column_str(&columns[1], row),
            cartesian: column_vec3(&columns[2..5], row),
            fractional: column_vec3(&columns[5..8], row),
            occupancy: column_f64(&columns[8], row),
        })
        .collect();
    Some(sites)
}

/// 提取晶胞参数 (a, b, c), (α, β, γ)，夹角单位为度
///
/// 任一长度缺失或等于零时返回 `None`；缺失的夹角取 90°。
pub fn cell_parameters(block: &CifDataBlock) -> Option<(Vec3, Vec3)> {
    let columns = extract_tags(block, &CELL_TAGS)?;

    let mut lengths = [0.0; 3];
    for (i, length) in lengths.iter_mut().enumerate() {
        *length = column_f64(&columns[i], 0)?;
        if *length == 0.0 {
            return None;
        }
    }

    let mut angles = [DEFAULT_ANGLE; 3];
    for (i, angle) in angles.iter_mut().enumerate() {
        if let Some(v) = column_f64(&columns[3 + i], 0) {
            *angle = v;
        }
    }

    Some((lengths, angles))
}

/// 提取对称操作
///
/// 优先使用显式操作列表：不足两项时返回 `None`，否则跳过首项（恒等操作）
/// 解析其余各项，任一项解析失败也返回 `None`。没有显式列表时
/// 由 Hall 符号生成完整操作列表。
pub fn symmetry_operators(
    block: &CifDataBlock,
    table: &dyn SymmetryTable,
) -> Option<Vec<SymmetryOperation>> {
    if let Some(values) = SYMOP_TAGS.iter().find_map(|tag| block.get(tag)) {
        let texts: Vec<&str> = match values {
            TagValue::Single(v) => vec![v.text()],
            TagValue::Loop(vs) => vs.iter().map(|v| v.text()).collect(),
        };
        if texts.len() < 2 {
            return None;
        }
        return texts[1..]
            .iter()
            .map(|t| table.parse_operator_string(t).ok())
            .collect();
    }

    let hall = HALL_TAGS
        .iter()
        .find_map(|tag| match block.get(tag) {
            Some(TagValue::Single(v)) => v.as_str(),
            _ => None,
        })?;
    table.operators_from_hall_symbol(hall).ok()
}

// ─────────────────────────────────────────────────────────────
// 辅助函数
// ─────────────────────────────────────────────────────────────

fn column_str(column: &Option<Vec<&LeafValue>>, row: usize) -> Option<String> {
    column
        .as_ref()
        .and_then(|c| c.get(row))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

fn column_f64(column: &Option<Vec<&LeafValue>>, row: usize) -> Option<f64> {
    column
        .as_ref()
        .and_then(|c| c.get(row))
        .and_then(|v| v.as_f64())
}

fn column_vec3(columns: &[Option<Vec<&LeafValue>>], row: usize) -> Option<Vec3> {
    Some([
        column_f64(&columns[0], row)?,
        column_f64(&columns[1], row)?,
        column_f64(&columns[2], row)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cif::parse;
    use crate::symmetry::StandardSymmetry;

    fn block(input: &str) -> CifDataBlock {
        parse(input).unwrap().blocks.remove(0).1
    }

    #[test]
    fn test_extract_tags_loop_anchor() {
        let b = block("data_t\nloop_\n_a\n_b\n1 2\n3 4\nloop_\n_c\n5\n_d 6\n");
        let cols = extract_tags(&b, &["_a", "_b", "_c", "_d", "_missing"]).unwrap();
        assert_eq!(cols.len(), 5);
        assert_eq!(cols[0].as_ref().unwrap().len(), 2);
        assert_eq!(cols[1].as_ref().unwrap()[1].as_f64(), Some(4.0));
        // 行数不符、单值、缺失的标签都为 None
        assert!(cols[2].is_none());
        assert!(cols[3].is_none());
        assert!(cols[4].is_none());
    }

    #[test]
    fn test_extract_tags_single_anchor() {
        let b = block("data_t\n_a 1\n_b 2\nloop_\n_c\n3\nloop_\n_d\n4 5\n");
        let cols = extract_tags(&b, &["_a", "_b", "_c", "_d"]).unwrap();
        assert_eq!(cols[1].as_ref().unwrap()[0].as_f64(), Some(2.0));
        assert_eq!(cols[2].as_ref().unwrap()[0].as_f64(), Some(3.0));
        assert!(cols[3].is_none());
    }

    #[test]
    fn test_missing_anchor_is_no_data() {
        let b = block("data_t\n_b 2\n");
        assert!(extract_tags(&b, &["_a", "_b"]).is_none());
        assert!(atom_sites(&b).is_none());
        assert!(atom_types(&b).is_none());
        assert!(cell_parameters(&b).is_none());
        assert!(symmetry_operators(&b, &StandardSymmetry).is_none());
    }

    #[test]
    fn test_atom_sites() {
        let b = block(
            "data_t\nloop_\n_atom_site_label\n_atom_site_type_symbol\n\
             _atom_site_fract_x\n_atom_site_fract_y\n_atom_site_fract_z\n\
             Na1 Na+ 0 0 0\nCl1 Cl- 0.5 0.5 ?\n",
        );
        let sites = atom_sites(&b).unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].label, "Na1");
        assert_eq!(sites[0].type_symbol.as_deref(), Some("Na+"));
        assert_eq!(sites[0].fractional, Some([0.0, 0.0, 0.0]));
        assert!(sites[0].cartesian.is_none());
        assert!(sites[1].fractional.is_none());
        assert!(sites[1].occupancy.is_none());
    }

    #[test]
    fn test_atom_types() {
        let b = block(
            "data_t\nloop_\n_atom_type_symbol\n_atom_type_description\n\
             _atom_type_radius_bond\nC 'carbon' 0.77\nO . ?\n",
        );
        let types = atom_types(&b).unwrap();
        assert_eq!(types["C"].description.as_deref(), Some("carbon"));
        assert_eq!(types["C"].bond_radius, Some(0.77));
        assert_eq!(types["O"], AtomType::default());
    }

    #[test]
    fn test_cell_parameters() {
        let b = block("data_t\n_cell_length_a 5.64\n_cell_length_b 5.64(1)\n_cell_length_c 5.64\n_cell_angle_gamma 120\n");
        let (lengths, angles) = cell_parameters(&b).unwrap();
        assert_eq!(lengths, [5.64, 5.64, 5.64]);
        assert_eq!(angles, [90.0, 90.0, 120.0]);
    }

    #[test]
    fn test_zero_or_missing_cell_length() {
        let zero = block("data_t\n_cell_length_a 5\n_cell_length_b 0\n_cell_length_c 5\n");
        assert!(cell_parameters(&zero).is_none());
        let missing = block("data_t\n_cell_length_a 5\n_cell_length_b 5\n");
        assert!(cell_parameters(&missing).is_none());
    }

    #[test]
    fn test_explicit_operators_skip_identity() {
        let b = block(
            "data_t\nloop_\n_space_group_symop.operation_xyz\n'x, y, z'\n'-x, -y, -z'\n'x+1/2, y, z'\n",
        );
        let ops = symmetry_operators(&b, &StandardSymmetry).unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[1].translation, [0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_single_operator_is_no_data() {
        let b = block("data_t\nloop_\n_symmetry_equiv_pos_as_xyz\n'x, y, z'\n_symmetry_space_group_name_Hall '-P 1'\n");
        assert!(symmetry_operators(&b, &StandardSymmetry).is_none());
    }

    #[test]
    fn test_malformed_operator_is_no_data() {
        let b = block("data_t\nloop_\n_symmetry_equiv_pos_as_xyz\n'x, y, z'\n'-x, -y'\n");
        assert!(symmetry_operators(&b, &StandardSymmetry).is_none());
    }

    #[test]
    fn test_hall_fallback() {
        let b = block("data_t\n_symmetry_space_group_name_Hall '-P 2ybc'\n");
        assert_eq!(symmetry_operators(&b, &StandardSymmetry).unwrap().len(), 4);
        let unknown = block("data_t\n_space_group_name_Hall 'Z 9'\n");
        assert!(symmetry_operators(&unknown, &StandardSymmetry).is_none());
    }
}
