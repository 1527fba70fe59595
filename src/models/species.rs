//! # 原子种类

use serde::{Deserialize, Serialize};

/// 宽松模式下无法识别的元素使用的原子序数
pub const UNKNOWN_ATOMIC_NUMBER: i32 = -1;

/// 元素符号与原子序数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomicSpecies {
    pub symbol: String,
    pub number: i32,
}

impl AtomicSpecies {
    pub fn new(symbol: impl Into<String>, number: i32) -> Self {
        AtomicSpecies {
            symbol: symbol.into(),
            number,
        }
    }

    /// 宽松模式下的占位种类，保留原始符号
    pub fn unknown(symbol: impl Into<String>) -> Self {
        AtomicSpecies::new(symbol, UNKNOWN_ATOMIC_NUMBER)
    }

    pub fn is_known(&self) -> bool {
        self.number >= 1
    }
}
