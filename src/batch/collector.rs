//! # 文件收集器
//!
//! 根据输入路径和模式收集待处理的 CIF 文件列表。
//!
//! ## 功能
//! - 支持单文件和目录输入
//! - glob 模式匹配（逗号分隔的多模式，文件名不区分大小写）
//! - 递归目录搜索
//!
//! ## 依赖关系
//! - 被 `commands/convert.rs` 调用
//! - 使用 `walkdir` 遍历目录, `glob` 匹配文件名

use cifatoms::{CifAtomsError, Result};

use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// 文件收集器
pub struct FileCollector {
    /// 输入路径
    input: PathBuf,
    /// 匹配模式列表
    patterns: Vec<String>,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    pub fn new(input: PathBuf) -> Self {
        Self {
            input,
            patterns: vec!["*".to_string()],
            recursive: false,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.patterns = pattern
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if self.patterns.is_empty() {
            self.patterns = vec!["*".to_string()];
        }
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有匹配的文件，按路径排序
    ///
    /// 单文件输入直接返回该文件，不做模式匹配。
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if self.input.is_file() {
            return Ok(vec![self.input.clone()]);
        }

        if !self.input.is_dir() {
            return Err(CifAtomsError::DirectoryNotFound {
                path: self.input.display().to_string(),
            });
        }

        let patterns = self.compile_patterns()?;
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| matches_any(&patterns, e.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        files.sort();
        Ok(files)
    }

    fn compile_patterns(&self) -> Result<Vec<Pattern>> {
        self.patterns
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    CifAtomsError::InvalidArgument(format!("Invalid pattern '{}': {}", p, e))
                })
            })
            .collect()
    }
}

/// 检查文件名是否匹配任一模式
fn matches_any(patterns: &[Pattern], path: &Path) -> bool {
    let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    patterns
        .iter()
        .any(|p| p.matches_with(filename, MATCH_OPTIONS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(patterns: &[&str]) -> Vec<Pattern> {
        patterns.iter().map(|p| Pattern::new(p).unwrap()).collect()
    }

    #[test]
    fn test_pattern_matching() {
        let patterns = compile(&["*.cif"]);
        assert!(matches_any(&patterns, Path::new("/data/NaCl.cif")));
        assert!(matches_any(&patterns, Path::new("quartz.CIF")));
        assert!(!matches_any(&patterns, Path::new("NaCl.res")));

        let multi = compile(&["*.cif", "*.mcif"]);
        assert!(matches_any(&multi, Path::new("magnet.mcif")));
    }

    #[test]
    fn test_with_pattern_splits() {
        let collector = FileCollector::new(PathBuf::from(".")).with_pattern(" *.cif , ,*.txt");
        assert_eq!(collector.patterns, vec!["*.cif", "*.txt"]);
        let empty = FileCollector::new(PathBuf::from(".")).with_pattern(",");
        assert_eq!(empty.patterns, vec!["*"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let collector = FileCollector::new(std::env::temp_dir()).with_pattern("[");
        assert!(matches!(
            collector.collect(),
            Err(CifAtomsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_missing_input() {
        let collector = FileCollector::new(PathBuf::from("/definitely/not/here"));
        assert!(matches!(
            collector.collect(),
            Err(CifAtomsError::DirectoryNotFound { .. })
        ));
    }
}
