//! # 元素周期表
//!
//! 元素符号与原子序数之间的查询，覆盖 H (1) 到 Og (118)。
//!
//! `ElementTable` 是结构模型依赖的查询接口，`PeriodicTable` 为内置实现；
//! 需要自定义元素（如赝原子）时可以替换为其他实现。
//!
//! ## 依赖关系
//! - 被 `models/atoms.rs`, `reader.rs` 使用
//! - 纯静态数据，无外部依赖

use crate::models::AtomicSpecies;

use std::collections::HashMap;
use std::sync::LazyLock;

/// 元素查询接口
pub trait ElementTable: Sync {
    fn lookup_by_symbol(&self, symbol: &str) -> Option<AtomicSpecies>;
    fn lookup_by_number(&self, number: i32) -> Option<AtomicSpecies>;
}

/// 按原子序数排列的元素符号
const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", //
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca", //
    "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", //
    "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", //
    "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", //
    "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", //
    "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", //
    "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", //
    "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", //
    "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", //
    "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", //
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

static SYMBOL_INDEX: LazyLock<HashMap<&'static str, i32>> = LazyLock::new(|| {
    SYMBOLS
        .iter()
        .enumerate()
        .map(|(i, &s)| (s, i as i32 + 1))
        .collect()
});

/// 内置元素表
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodicTable;

impl ElementTable for PeriodicTable {
    fn lookup_by_symbol(&self, symbol: &str) -> Option<AtomicSpecies> {
        SYMBOL_INDEX
            .get(symbol)
            .map(|&number| AtomicSpecies::new(symbol, number))
    }

    fn lookup_by_number(&self, number: i32) -> Option<AtomicSpecies> {
        if number < 1 {
            return None;
        }
        SYMBOLS
            .get(number as usize - 1)
            .map(|&s| AtomicSpecies::new(s, number))
    }
}

/// 从 CIF 原子类型符号或标签推断元素符号
///
/// 取开头的字母段并规范大小写，依次尝试两字母与单字母符号：
/// `Fe3+` -> `Fe`, `O2-` -> `O`, `CA1` -> `Ca`, `OW1` -> `O`。
/// 第二个字母为小写时源文本本身就是两字母符号，不再退回单字母：
/// `Bq` 保持为 `Bq`，由构建时的元素校验处理。
/// 无法匹配时返回规范化后的字母段（交给宽松模式处理）。
pub fn element_symbol_from_label(table: &dyn ElementTable, label: &str) -> String {
    let letters: String = label
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    if letters.is_empty() {
        return label.trim().to_string();
    }

    let mut chars = letters.chars();
    let first = chars.next().map(|c| c.to_ascii_uppercase()).unwrap_or('X');

    if let Some(second) = chars.next() {
        let two = format!("{}{}", first, second.to_ascii_lowercase());
        if table.lookup_by_symbol(&two).is_some() || second.is_ascii_lowercase() {
            return two;
        }
    }

    let one = first.to_string();
    if table.lookup_by_symbol(&one).is_some() {
        return one;
    }

    let mut canonical = one;
    canonical.push_str(&letters[1..].to_ascii_lowercase());
    canonical
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_symbol() {
        let fe = PeriodicTable.lookup_by_symbol("Fe").unwrap();
        assert_eq!(fe.number, 26);
        assert_eq!(fe.symbol, "Fe");
        assert!(PeriodicTable.lookup_by_symbol("fe").is_none());
        assert!(PeriodicTable.lookup_by_symbol("Xx").is_none());
    }

    #[test]
    fn test_lookup_by_number() {
        assert_eq!(PeriodicTable.lookup_by_number(1).unwrap().symbol, "H");
        assert_eq!(PeriodicTable.lookup_by_number(118).unwrap().symbol, "Og");
        assert!(PeriodicTable.lookup_by_number(0).is_none());
        assert!(PeriodicTable.lookup_by_number(119).is_none());
        assert!(PeriodicTable.lookup_by_number(-1).is_none());
    }

    #[test]
    fn test_symbol_from_label() {
        let table = PeriodicTable;
        assert_eq!(element_symbol_from_label(&table, "Fe3+"), "Fe");
        assert_eq!(element_symbol_from_label(&table, "O2-"), "O");
        assert_eq!(element_symbol_from_label(&table, "CA1"), "Ca");
        assert_eq!(element_symbol_from_label(&table, "OW1"), "O");
        assert_eq!(element_symbol_from_label(&table, "HA"), "H");
        assert_eq!(element_symbol_from_label(&table, "Cl12"), "Cl");
        assert_eq!(element_symbol_from_label(&table, "Qz"), "Qz");
    }

    #[test]
    fn test_lowercase_second_letter_is_kept() {
        let table = PeriodicTable;
        assert_eq!(element_symbol_from_label(&table, "Bq"), "Bq");
        assert_eq!(element_symbol_from_label(&table, "Bq1"), "Bq");
        assert_eq!(element_symbol_from_label(&table, "Ow"), "Ow");
        assert_eq!(element_symbol_from_label(&table, "Xy3+"), "Xy");
    }
}
