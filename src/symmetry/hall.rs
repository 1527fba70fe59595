//! # Hall 符号解析
//!
//! 将 Hall 符号（如 `-P 2ac 2n`、`P 61 2 (0 0 -1)`）展开为完整的空间群操作列表。
//!
//! ## 语法
//! ```text
//! [-]L  [-]N[A][T]  [-]N[A][T] ...  [(vx vy vz)]
//! ```
//! - `-L`: 格子符号 P A B C I R S T F，前置 `-` 表示含反演中心
//! - `N`: 旋转阶数 1 2 3 4 6，前置 `-` 表示非真转动
//! - `A`: 旋转轴 x y z ' " *，省略时按位置取默认轴
//! - `T`: 平移符号 a b c n u v w d，或螺旋轴下标数字
//! - `(vx vy vz)`: 原点平移，单位为 1/12
//!
//! 生成元在平移模 1 意义下闭合为完整的群，首项为恒等操作。
//!
//! ## 依赖关系
//! - 被 `symmetry/mod.rs` 使用

use super::SymmetryOperation;
use crate::error::{CifAtomsError, Result};
use crate::geometry::vector::{mat_vec, IDENTITY};
use crate::geometry::{Mat3, Vec3};

/// 闭合时群阶的上限（F 格子 m-3m 为 192）
const MAX_GROUP_ORDER: usize = 192;

type IntMat = [[i8; 3]; 3];

// ─────────────────────────────────────────────────────────────
// 旋转矩阵表
// ─────────────────────────────────────────────────────────────

const ROT_X: [IntMat; 4] = [
    [[1, 0, 0], [0, -1, 0], [0, 0, -1]],
    [[1, 0, 0], [0, 0, -1], [0, 1, -1]],
    [[1, 0, 0], [0, 0, -1], [0, 1, 0]],
    [[1, 0, 0], [0, 1, -1], [0, 1, 0]],
];

const ROT_Y: [IntMat; 4] = [
    [[-1, 0, 0], [0, 1, 0], [0, 0, -1]],
    [[-1, 0, 1], [0, 1, 0], [-1, 0, 0]],
    [[0, 0, 1], [0, 1, 0], [-1, 0, 0]],
    [[0, 0, 1], [0, 1, 0], [-1, 0, 1]],
];

const ROT_Z: [IntMat; 4] = [
    [[-1, 0, 0], [0, -1, 0], [0, 0, 1]],
    [[0, -1, 0], [1, -1, 0], [0, 0, 1]],
    [[0, -1, 0], [1, 0, 0], [0, 0, 1]],
    [[1, -1, 0], [1, 0, 0], [0, 0, 1]],
];

/// 垂直于参考轴的二次轴：(参考轴, 单撇 ', 双撇 ")
const ROT_PRIME: [(Axis, IntMat, IntMat); 3] = [
    (
        Axis::X,
        [[-1, 0, 0], [0, 0, -1], [0, -1, 0]],
        [[-1, 0, 0], [0, 0, 1], [0, 1, 0]],
    ),
    (
        Axis::Y,
        [[0, 0, -1], [0, -1, 0], [-1, 0, 0]],
        [[0, 0, 1], [0, -1, 0], [1, 0, 0]],
    ),
    (
        Axis::Z,
        [[0, -1, 0], [-1, 0, 0], [0, 0, -1]],
        [[0, 1, 0], [1, 0, 0], [0, 0, -1]],
    ),
];

const ROT_STAR: IntMat = [[0, 0, 1], [1, 0, 0], [0, 1, 0]];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AxisSymbol {
    Principal(Axis),
    Prime,
    DoublePrime,
    Star,
}

/// 解析出的单个矩阵符号
#[derive(Debug)]
struct MatrixSymbol {
    improper: bool,
    order: u8,
    axis: Option<AxisSymbol>,
    /// 显式给出的主轴，作为撇号轴的参考
    reference: Option<Axis>,
    screw: Option<u8>,
    translation: Vec3,
}

fn to_mat3(m: &IntMat) -> Mat3 {
    let mut out = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            out[i][j] = m[i][j] as f64;
        }
    }
    out
}

fn order_index(order: u8) -> Option<usize> {
    match order {
        2 => Some(0),
        3 => Some(1),
        4 => Some(2),
        6 => Some(3),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────
// 解析
// ─────────────────────────────────────────────────────────────

/// 由 Hall 符号生成完整操作列表
pub fn operators_from_hall_symbol(symbol: &str) -> Result<Vec<SymmetryOperation>> {
    let unknown = || CifAtomsError::UnknownHallSymbol(symbol.to_string());

    let (body, shift) = split_origin_shift(symbol).ok_or_else(unknown)?;
    let mut tokens = body.split_whitespace();

    let lattice = tokens.next().ok_or_else(unknown)?;
    let (centric, lattice_letter) = match lattice.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, lattice),
    };
    let centering = lattice_translations(lattice_letter).ok_or_else(unknown)?;

    let mut symbols = Vec::new();
    for token in tokens {
        symbols.push(parse_matrix_symbol(token).ok_or_else(unknown)?);
    }
    if symbols.is_empty() || symbols.len() > 4 {
        return Err(unknown());
    }

    let mut generators = Vec::new();
    for t in centering {
        generators.push(SymmetryOperation::new(IDENTITY, t));
    }
    if centric {
        generators.push(SymmetryOperation::new(negate(&IDENTITY), [0.0; 3]));
    }

    let mut previous: Option<(u8, Axis)> = None;
    for (k, ms) in symbols.iter().enumerate() {
        let (op, principal) = matrix_operation(ms, k, previous).ok_or_else(unknown)?;
        generators.push(op);
        previous = Some((ms.order, principal));
    }

    if let Some(v) = shift {
        generators = generators.iter().map(|g| shift_origin(g, &v)).collect();
    }

    close_group(&generators).ok_or_else(unknown)
}

/// 分离末尾的原点平移 `(vx vy vz)`，返回 (符号主体, 平移向量)
fn split_origin_shift(symbol: &str) -> Option<(&str, Option<Vec3>)> {
    let Some(open) = symbol.find('(') else {
        return Some((symbol, None));
    };
    let close = symbol.rfind(')')?;
    if close < open || !symbol[close + 1..].trim().is_empty() {
        return None;
    }

    let values: Vec<f64> = symbol[open + 1..close]
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i32>().map(|v| v as f64 / 12.0))
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    if values.len() != 3 {
        return None;
    }

    Some((&symbol[..open], Some([values[0], values[1], values[2]])))
}

fn lattice_translations(letter: &str) -> Option<Vec<Vec3>> {
    const H: f64 = 0.5;
    const T1: f64 = 1.0 / 3.0;
    const T2: f64 = 2.0 / 3.0;

    let translations = match letter.to_ascii_uppercase().as_str() {
        "P" => vec![],
        "A" => vec![[0.0, H, H]],
        "B" => vec![[H, 0.0, H]],
        "C" => vec![[H, H, 0.0]],
        "I" => vec![[H, H, H]],
        "R" => vec![[T2, T1, T1], [T1, T2, T2]],
        "S" => vec![[T1, T1, T2], [T2, T2, T1]],
        "T" => vec![[T1, T2, T1], [T2, T1, T2]],
        "F" => vec![[0.0, H, H], [H, 0.0, H], [H, H, 0.0]],
        _ => return None,
    };
    Some(translations)
}

fn parse_matrix_symbol(token: &str) -> Option<MatrixSymbol> {
    let token = token.to_ascii_lowercase();
    let (improper, rest) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.as_str()),
    };

    let mut chars = rest.chars();
    let order = match chars.next()? {
        c @ ('1' | '2' | '3' | '4' | '6') => c as u8 - b'0',
        _ => return None,
    };

    let mut symbol = MatrixSymbol {
        improper,
        order,
        axis: None,
        reference: None,
        screw: None,
        translation: [0.0; 3],
    };

    for c in chars {
        match c {
            'x' | 'y' | 'z' => {
                let axis = match c {
                    'x' => Axis::X,
                    'y' => Axis::Y,
                    _ => Axis::Z,
                };
                symbol.reference = Some(axis);
                if symbol.axis.is_none() {
                    symbol.axis = Some(AxisSymbol::Principal(axis));
                }
            }
            '\'' => symbol.axis = Some(AxisSymbol::Prime),
            '"' => symbol.axis = Some(AxisSymbol::DoublePrime),
            '*' => symbol.axis = Some(AxisSymbol::Star),
            '1'..='5' if symbol.screw.is_none() => symbol.screw = Some(c as u8 - b'0'),
            'a' => add(&mut symbol.translation, [0.5, 0.0, 0.0]),
            'b' => add(&mut symbol.translation, [0.0, 0.5, 0.0]),
            'c' => add(&mut symbol.translation, [0.0, 0.0, 0.5]),
            'n' => add(&mut symbol.translation, [0.5, 0.5, 0.5]),
            'u' => add(&mut symbol.translation, [0.25, 0.0, 0.0]),
            'v' => add(&mut symbol.translation, [0.0, 0.25, 0.0]),
            'w' => add(&mut symbol.translation, [0.0, 0.0, 0.25]),
            'd' => add(&mut symbol.translation, [0.25, 0.25, 0.25]),
            _ => return None,
        }
    }

    Some(symbol)
}

fn add(t: &mut Vec3, d: Vec3) {
    for i in 0..3 {
        t[i] += d[i];
    }
}

/// 构造第 `k` 个矩阵符号对应的操作，同时返回后续撇号轴使用的参考主轴
fn matrix_operation(
    ms: &MatrixSymbol,
    k: usize,
    previous: Option<(u8, Axis)>,
) -> Option<(SymmetryOperation, Axis)> {
    let previous_axis = previous.map(|(_, a)| a).unwrap_or(Axis::Z);

    let axis = match ms.axis {
        Some(a) => a,
        None => default_axis(ms.order, k, previous)?,
    };

    let (rotation, principal) = if ms.order == 1 {
        (IDENTITY, previous_axis)
    } else {
        let idx = order_index(ms.order)?;
        match axis {
            AxisSymbol::Principal(a) => {
                let table = match a {
                    Axis::X => &ROT_X,
                    Axis::Y => &ROT_Y,
                    Axis::Z => &ROT_Z,
                };
                (to_mat3(&table[idx]), a)
            }
            AxisSymbol::Prime | AxisSymbol::DoublePrime => {
                if ms.order != 2 {
                    return None;
                }
                let reference = ms.reference.unwrap_or(previous_axis);
                let (_, single, double) = ROT_PRIME.iter().find(|(r, _, _)| *r == reference)?;
                let m = if axis == AxisSymbol::Prime { single } else { double };
                (to_mat3(m), reference)
            }
            AxisSymbol::Star => {
                if ms.order != 3 {
                    return None;
                }
                (to_mat3(&ROT_STAR), previous_axis)
            }
        }
    };

    let mut translation = ms.translation;
    if let Some(screw) = ms.screw {
        let AxisSymbol::Principal(a) = axis else {
            return None;
        };
        if screw >= ms.order {
            return None;
        }
        translation[a.index()] += screw as f64 / ms.order as f64;
    }

    let rotation = if ms.improper {
        negate(&rotation)
    } else {
        rotation
    };

    Some((SymmetryOperation::new(rotation, translation), principal))
}

fn default_axis(order: u8, k: usize, previous: Option<(u8, Axis)>) -> Option<AxisSymbol> {
    match (k, order) {
        (_, 1) | (0, _) => Some(AxisSymbol::Principal(Axis::Z)),
        (1, 2) => match previous.map(|(n, _)| n) {
            Some(2) | Some(4) => Some(AxisSymbol::Principal(Axis::X)),
            Some(3) | Some(6) => Some(AxisSymbol::Prime),
            _ => None,
        },
        (2, 3) => Some(AxisSymbol::Star),
        _ => None,
    }
}

fn negate(m: &Mat3) -> Mat3 {
    let mut out = *m;
    for row in out.iter_mut() {
        for v in row.iter_mut() {
            *v = -*v;
        }
    }
    out
}

/// 原点平移：t' = t + v - R·v
fn shift_origin(op: &SymmetryOperation, v: &Vec3) -> SymmetryOperation {
    let rv = mat_vec(&op.rotation, v);
    let t = [
        op.translation[0] + v[0] - rv[0],
        op.translation[1] + v[1] - rv[1],
        op.translation[2] + v[2] - rv[2],
    ];
    SymmetryOperation::new(op.rotation, t)
}

/// 由生成元闭合为群，恒等操作在首位；超过上限返回 `None`
fn close_group(generators: &[SymmetryOperation]) -> Option<Vec<SymmetryOperation>> {
    let identity = SymmetryOperation::identity();
    let mut group = vec![identity];

    let mut i = 0;
    while i < group.len() {
        let element = group[i];
        for g in generators {
            let product = g.compose(&element);
            if !group.iter().any(|e| e.approx_eq(&product)) {
                if group.len() >= MAX_GROUP_ORDER {
                    return None;
                }
                group.push(product);
            }
        }
        i += 1;
    }

    Some(group)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(ops: &[SymmetryOperation], rotation: Mat3, translation: Vec3) -> bool {
        let target = SymmetryOperation::new(rotation, translation);
        ops.iter().any(|op| op.approx_eq(&target))
    }

    #[test]
    fn test_triclinic() {
        let p1 = operators_from_hall_symbol("P 1").unwrap();
        assert_eq!(p1.len(), 1);
        assert!(p1[0].is_identity());

        let p1bar = operators_from_hall_symbol("-P 1").unwrap();
        assert_eq!(p1bar.len(), 2);
        assert!(p1bar[0].is_identity());
    }

    #[test]
    fn test_p21_c() {
        let ops = operators_from_hall_symbol("-P 2ybc").unwrap();
        assert_eq!(ops.len(), 4);
        assert!(contains(
            &ops,
            [[1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 1.0]],
            [0.0, 0.5, 0.5]
        ));
    }

    #[test]
    fn test_orthorhombic_default_axis() {
        let ops = operators_from_hall_symbol("-P 2ac 2n").unwrap();
        assert_eq!(ops.len(), 8);
        // 第二个 2 默认沿 x
        assert!(contains(
            &ops,
            [[1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, -1.0]],
            [0.5, 0.5, 0.5]
        ));
    }

    #[test]
    fn test_rhombohedral() {
        assert_eq!(operators_from_hall_symbol("R 3").unwrap().len(), 9);
        assert_eq!(operators_from_hall_symbol("-R 3 2\"").unwrap().len(), 36);
    }

    #[test]
    fn test_screw_with_origin_shift() {
        let ops = operators_from_hall_symbol("P 61 2 (0 0 -1)").unwrap();
        assert_eq!(ops.len(), 12);
        // (-y, -x, -z+5/6)
        assert!(contains(
            &ops,
            [[0.0, -1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, -1.0]],
            [0.0, 0.0, 5.0 / 6.0]
        ));
    }

    #[test]
    fn test_cubic_diamond() {
        let ops = operators_from_hall_symbol("-F 4vw 2vw 3").unwrap();
        assert_eq!(ops.len(), 192);
        assert!(ops[0].is_identity());
    }

    #[test]
    fn test_unknown_symbols() {
        for bad in ["", "Q 2", "P", "P 5", "P 2 (0 0)", "P 4 2 3 2 2", "P 3 4'"] {
            assert!(
                matches!(
                    operators_from_hall_symbol(bad),
                    Err(CifAtomsError::UnknownHallSymbol(_))
                ),
                "expected failure for {:?}",
                bad
            );
        }
    }
}
