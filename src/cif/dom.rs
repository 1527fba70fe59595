//! # CIF 文档对象模型
//!
//! 词法分析器输出的只读数据：文档 -> 数据块 -> 标签 -> 单值或循环值。
//!
//! 标签名不区分大小写，且 DDLm 风格的 `_atom_site.label` 与
//! `_atom_site_label` 视为同一标签，统一存为小写下划线形式。
//!
//! ## 依赖关系
//! - 被 `cif/parse.rs`, `cif/extract.rs`, `reader.rs` 使用
//! - 无外部模块依赖

use std::collections::HashMap;

/// 叶子值的类型化标量
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
    /// `.`
    Inapplicable,
    /// `?`
    Unknown,
}

/// 单个 CIF 值：原始文本 + 类型化标量
#[derive(Debug, Clone, PartialEq)]
pub struct LeafValue {
    text: String,
    value: Scalar,
}

impl LeafValue {
    /// 未加引号的值，按数值 / 占位符 / 文本分类
    pub fn unquoted(text: impl Into<String>) -> Self {
        let text = text.into();
        let value = classify(&text);
        LeafValue { text, value }
    }

    /// 引号或分号文本域中的值，始终是文本
    pub fn quoted(text: impl Into<String>) -> Self {
        let text = text.into();
        LeafValue {
            value: Scalar::Text(text.clone()),
            text,
        }
    }

    pub fn get_value(&self) -> &Scalar {
        &self.value
    }

    /// 源文本（不含引号）
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            Scalar::Int(v) => Some(v as f64),
            Scalar::Float(v) => Some(v),
            _ => None,
        }
    }

    /// 文本内容；`.` 与 `?` 返回 `None`
    pub fn as_str(&self) -> Option<&str> {
        match self.value {
            Scalar::Inapplicable | Scalar::Unknown => None,
            _ => Some(&self.text),
        }
    }
}

fn classify(text: &str) -> Scalar {
    match text {
        "." => return Scalar::Inapplicable,
        "?" => return Scalar::Unknown,
        _ => {}
    }

    // 去掉标准不确定度，如 1.234(5)
    let number = match text.find('(') {
        Some(idx) if text.ends_with(')') => &text[..idx],
        _ => text,
    };

    if let Ok(v) = number.parse::<i64>() {
        return Scalar::Int(v);
    }
    if number.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.')) {
        if let Ok(v) = number.parse::<f64>() {
            if v.is_finite() {
                return Scalar::Float(v);
            }
        }
    }
    Scalar::Text(text.to_string())
}

/// 标签的值
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Single(LeafValue),
    Loop(Vec<LeafValue>),
}

/// 规范化标签名：小写，`.` 替换为 `_`
pub fn normalize_tag(tag: &str) -> String {
    tag.to_ascii_lowercase().replace('.', "_")
}

/// 一个 `data_` 数据块
#[derive(Debug, Clone, Default)]
pub struct CifDataBlock {
    tags: HashMap<String, TagValue>,
}

impl CifDataBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入单值；重复标签以后出现的为准
    pub fn insert_single(&mut self, tag: &str, value: LeafValue) {
        self.tags.insert(normalize_tag(tag), TagValue::Single(value));
    }

    pub fn insert_loop(&mut self, tag: &str, values: Vec<LeafValue>) {
        self.tags.insert(normalize_tag(tag), TagValue::Loop(values));
    }

    pub fn get(&self, tag: &str) -> Option<&TagValue> {
        self.tags.get(&normalize_tag(tag))
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// CIF 文档：按源文件顺序排列的数据块
#[derive(Debug, Clone, Default)]
pub struct CifDocument {
    pub blocks: Vec<(String, CifDataBlock)>,
}

impl CifDocument {
    pub fn block(&self, name: &str) -> Option<&CifDataBlock> {
        self.blocks
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, b)| b)
    }

    pub fn block_names(&self) -> Vec<&str> {
        self.blocks.iter().map(|(n, _)| n.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_classification() {
        assert_eq!(LeafValue::unquoted("42").get_value(), &Scalar::Int(42));
        assert_eq!(LeafValue::unquoted("3.14").as_f64(), Some(3.14));
        assert_eq!(LeafValue::unquoted("50.123(4)").as_f64(), Some(50.123));
        assert_eq!(LeafValue::unquoted("-0.25").as_f64(), Some(-0.25));
        assert_eq!(LeafValue::unquoted(".").get_value(), &Scalar::Inapplicable);
        assert_eq!(LeafValue::unquoted("?").as_str(), None);
        assert_eq!(LeafValue::unquoted("inf").as_f64(), None);
        assert_eq!(
            LeafValue::unquoted("Fe1").get_value(),
            &Scalar::Text("Fe1".to_string())
        );
    }

    #[test]
    fn test_quoted_value_stays_text() {
        let v = LeafValue::quoted("1.5");
        assert_eq!(v.get_value(), &Scalar::Text("1.5".to_string()));
        assert_eq!(v.as_f64(), None);
        assert_eq!(v.text(), "1.5");
    }

    #[test]
    fn test_tag_normalization() {
        let mut block = CifDataBlock::new();
        block.insert_single("_Atom_Site.Label", LeafValue::unquoted("x"));
        assert!(block.contains("_atom_site_label"));
        assert!(block.contains("_ATOM_SITE.LABEL"));
        assert!(!block.contains("_atom_site_type_symbol"));
    }
}
