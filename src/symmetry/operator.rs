//! # 对称操作字符串解析
//!
//! 解析 `_space_group_symop_operation_xyz` 中的操作，例如 `-x+1/2, y, z+1/2`。
//! 每个分量是若干带符号项之和，项可以是 `x`/`y`/`z`（可带系数，如 `2x`、
//! `1/2*x`），也可以是常数（`1/2`、`0.25`、`1`）。
//!
//! ## 依赖关系
//! - 被 `symmetry/mod.rs` 使用
//! - 使用 `regex`

use super::SymmetryOperation;
use crate::error::{CifAtomsError, Result};
use crate::geometry::{Mat3, Vec3};

use regex::Regex;
use std::sync::LazyLock;

/// 单个无符号项：可选系数（整数 / 小数 / 分数）后跟可选坐标变量
static TERM: LazyLock<std::result::Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+(?:\.\d*)?|\.\d+)(?:/(\d+(?:\.\d*)?))?)?\*?([xyz])?$")
});

/// 解析对称操作字符串
pub fn parse_operator_string(text: &str) -> Result<SymmetryOperation> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    let components: Vec<&str> = cleaned.split(',').collect();
    if components.len() != 3 {
        return Err(invalid(text));
    }

    let mut rotation: Mat3 = [[0.0; 3]; 3];
    let mut translation: Vec3 = [0.0; 3];
    for (i, component) in components.iter().enumerate() {
        let (row, constant) = parse_component(component).ok_or_else(|| invalid(text))?;
        rotation[i] = row;
        translation[i] = constant;
    }

    Ok(SymmetryOperation::new(rotation, translation))
}

fn invalid(text: &str) -> CifAtomsError {
    CifAtomsError::InvalidSymmetryOperator(text.to_string())
}

/// 解析一个分量，返回 (旋转矩阵行, 平移常数)
fn parse_component(component: &str) -> Option<(Vec3, f64)> {
    let term_re = TERM.as_ref().ok()?;

    if component.is_empty() {
        return None;
    }

    let mut row = [0.0; 3];
    let mut constant = 0.0;

    for (sign, term) in split_terms(component)? {
        let caps = term_re.captures(term)?;
        let numerator = caps.get(1).map(|m| m.as_str().parse::<f64>()).transpose().ok()?;
        let denominator = caps.get(2).map(|m| m.as_str().parse::<f64>()).transpose().ok()?;
        let variable = caps.get(3).map(|m| m.as_str());

        if numerator.is_none() && variable.is_none() {
            return None;
        }

        let mut coefficient = numerator.unwrap_or(1.0);
        if let Some(d) = denominator {
            if d == 0.0 {
                return None;
            }
            coefficient /= d;
        }

        match variable {
            Some("x") => row[0] += sign * coefficient,
            Some("y") => row[1] += sign * coefficient,
            Some("z") => row[2] += sign * coefficient,
            _ => constant += sign * coefficient,
        }
    }

    Some((row, constant))
}

/// 按 `+`/`-` 拆分为 (符号, 项)；出现空项时返回 `None`
fn split_terms(component: &str) -> Option<Vec<(f64, &str)>> {
    let mut terms = Vec::new();
    let mut sign = 1.0;
    let mut start = 0;

    for (i, c) in component.char_indices() {
        if c == '+' || c == '-' {
            if i > start {
                terms.push((sign, &component[start..i]));
            } else if i != 0 {
                return None;
            }
            sign = if c == '-' { -1.0 } else { 1.0 };
            start = i + 1;
        }
    }

    if start >= component.len() {
        return None;
    }
    terms.push((sign, &component[start..]));
    Some(terms)
}
