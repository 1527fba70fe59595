//! # CIF 解析模块
//!
//! 两层结构：
//! - **DOM**: [`parse`] 将 CIF 文本解析为无类型的 [`CifDocument`]
//! - **提取**: 从 [`CifDataBlock`] 中提取原子位点、原子类型、晶胞参数与对称操作
//!
//! ```ignore
//! let doc = cifatoms::cif::parse(text)?;
//! for (name, block) in &doc.blocks {
//!     let sites = cifatoms::cif::atom_sites(block);
//! }
//! ```
//!
//! ## 依赖关系
//! - 被 `reader.rs` 使用
//! - 子模块: dom, parse, extract

pub mod dom;
pub mod extract;
pub mod parse;

pub use dom::{normalize_tag, CifDataBlock, CifDocument, LeafValue, Scalar, TagValue};
pub use extract::{
    atom_sites, atom_types, cell_parameters, extract_tags, symmetry_operators, AtomSite, AtomType,
};
pub use parse::parse;
