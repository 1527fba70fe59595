//! # CIF 文本解析器
//!
//! 将 CIF 1.1 / STAR 文本解析为 [`CifDocument`]。
//!
//! ## 支持的语法
//! ```text
//! data_NAME                 # 数据块，名称不区分大小写
//! _tag value                # 单值：未加引号 / 'single' / "double"
//! _tag
//! ;multi-line text          # 分号文本域（分号必须位于行首）
//! ;
//! loop_                     # 循环：若干标签后跟按行排列的值
//! _col_a _col_b
//! 1 2
//! save_frame ... save_      # 保存帧（字典专用，跳过）
//! ```
//!
//! ## 依赖关系
//! - 被 `cif/mod.rs`, `reader.rs` 使用
//! - 使用 `cif/dom.rs`

use super::dom::{CifDataBlock, CifDocument, LeafValue};
use crate::error::{CifAtomsError, Result};

/// 解析 CIF 文本
pub fn parse(input: &str) -> Result<CifDocument> {
    Parser::new(input).parse_document()
}

#[derive(Debug)]
enum Token {
    DataBlock(String),
    Global,
    LoopStart,
    SaveStart,
    SaveEnd,
    Tag(String),
    Val(LeafValue),
    Eof,
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    at_line_start: bool,
    pending: Option<Token>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            at_line_start: true,
            pending: None,
        }
    }

    fn next(&mut self) -> Result<Token> {
        if let Some(t) = self.pending.take() {
            return Ok(t);
        }
        self.scan_token()
    }

    fn push_back(&mut self, token: Token) {
        self.pending = Some(token);
    }

    /// 字节偏移对应的行号（从 1 开始）
    fn line_of(&self, offset: usize) -> usize {
        self.bytes[..offset.min(self.bytes.len())]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1
    }

    fn syntax_error(&self, offset: usize, reason: &str) -> CifAtomsError {
        CifAtomsError::CifSyntax {
            line: self.line_of(offset),
            reason: reason.to_string(),
        }
    }

    // ─────────────────────────────────────────────────────────────
    // 词法分析
    // ─────────────────────────────────────────────────────────────

    fn skip_whitespace_and_comments(&mut self) {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'\n' => {
                    self.pos += 1;
                    self.at_line_start = true;
                }
                b'#' => {
                    while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();
        if self.pos >= self.bytes.len() {
            return Ok(Token::Eof);
        }

        let b = self.bytes[self.pos];

        // 分号文本域只在行首有效
        if b == b';' && self.at_line_start {
            return self.scan_text_field();
        }

        self.at_line_start = false;

        if b == b'\'' || b == b'"' {
            return self.scan_quoted(b);
        }

        let start = self.pos;
        while self.pos < self.bytes.len() && !self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        Ok(classify_unquoted(&self.input[start..self.pos]))
    }

    fn scan_quoted(&mut self, quote: u8) -> Result<Token> {
        let start = self.pos;
        self.pos += 1;
        loop {
            if self.pos >= self.bytes.len() || self.bytes[self.pos] == b'\n' {
                return Err(self.syntax_error(start, "unterminated quoted string"));
            }
            // 结束引号后必须是空白或文件结尾
            if self.bytes[self.pos] == quote
                && (self.pos + 1 >= self.bytes.len()
                    || self.bytes[self.pos + 1].is_ascii_whitespace())
            {
                let text = &self.input[start + 1..self.pos];
                self.pos += 1;
                return Ok(Token::Val(LeafValue::quoted(text)));
            }
            self.pos += 1;
        }
    }

    fn scan_text_field(&mut self) -> Result<Token> {
        let start = self.pos;
        self.pos += 1;
        let content_start = self.pos;

        loop {
            while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                self.pos += 1;
            }
            if self.pos >= self.bytes.len() {
                return Err(self.syntax_error(start, "unterminated semicolon text field"));
            }
            self.pos += 1;

            if self.pos < self.bytes.len() && self.bytes[self.pos] == b';' {
                let content_end = self.pos - 1;
                let text = self.input[content_start..content_end].trim_end_matches('\r');
                self.pos += 1;
                self.at_line_start = false;
                return Ok(Token::Val(LeafValue::quoted(text)));
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // 语法分析
    // ─────────────────────────────────────────────────────────────

    fn parse_document(&mut self) -> Result<CifDocument> {
        let mut document = CifDocument::default();
        loop {
            match self.next()? {
                Token::Eof => break,
                Token::DataBlock(name) => {
                    let block = self.parse_block()?;
                    document.blocks.push((name, block));
                }
                // 第一个数据块之前的内容忽略
                _ => {}
            }
        }
        Ok(document)
    }

    fn parse_block(&mut self) -> Result<CifDataBlock> {
        let mut block = CifDataBlock::new();

        loop {
            let token = self.next()?;
            match token {
                Token::Eof | Token::DataBlock(_) | Token::Global => {
                    self.push_back(token);
                    break;
                }
                Token::LoopStart => self.parse_loop(&mut block)?,
                Token::SaveStart => self.skip_save_frame()?,
                Token::Tag(tag) => match self.next()? {
                    Token::Val(v) => block.insert_single(&tag, v),
                    // 没有值的标签
                    other => self.push_back(other),
                },
                Token::SaveEnd | Token::Val(_) => {}
            }
        }

        Ok(block)
    }

    fn parse_loop(&mut self, block: &mut CifDataBlock) -> Result<()> {
        let mut tags = Vec::new();
        loop {
            match self.next()? {
                Token::Tag(t) => tags.push(t),
                other => {
                    self.push_back(other);
                    break;
                }
            }
        }

        let mut values = Vec::new();
        loop {
            match self.next()? {
                Token::Val(v) => values.push(v),
                other => {
                    self.push_back(other);
                    break;
                }
            }
        }

        if tags.is_empty() {
            return Ok(());
        }

        // 按列拆分，多余的不完整行丢弃
        let ncols = tags.len();
        let nrows = values.len() / ncols;
        let mut columns: Vec<Vec<LeafValue>> = vec![Vec::with_capacity(nrows); ncols];
        for (i, value) in values.into_iter().take(nrows * ncols).enumerate() {
            columns[i % ncols].push(value);
        }

        for (tag, column) in tags.iter().zip(columns) {
            block.insert_loop(tag, column);
        }
        Ok(())
    }

    fn skip_save_frame(&mut self) -> Result<()> {
        loop {
            match self.next()? {
                Token::SaveEnd => return Ok(()),
                token @ (Token::Eof | Token::DataBlock(_) | Token::Global) => {
                    self.push_back(token);
                    return Ok(());
                }
                _ => {}
            }
        }
    }
}

fn classify_unquoted(s: &str) -> Token {
    let lower = s.to_ascii_lowercase();
    if lower.starts_with("data_") {
        Token::DataBlock(s[5..].to_string())
    } else if lower == "loop_" {
        Token::LoopStart
    } else if lower == "global_" {
        Token::Global
    } else if lower.starts_with("save_") {
        if s.len() == 5 {
            Token::SaveEnd
        } else {
            Token::SaveStart
        }
    } else if s.starts_with('_') {
        Token::Tag(s.to_string())
    } else {
        Token::Val(LeafValue::unquoted(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cif::dom::{Scalar, TagValue};

    fn single<'a>(block: &'a CifDataBlock, tag: &str) -> &'a LeafValue {
        match block.get(tag) {
            Some(TagValue::Single(v)) => v,
            other => panic!("expected single value for {}, got {:?}", tag, other),
        }
    }

    fn looped<'a>(block: &'a CifDataBlock, tag: &str) -> &'a [LeafValue] {
        match block.get(tag) {
            Some(TagValue::Loop(v)) => v,
            other => panic!("expected loop for {}, got {:?}", tag, other),
        }
    }

    #[test]
    fn test_key_value_pairs() {
        let doc = parse("data_test\n_cell_length_a 5.64(2)\n_cell_length_b 6\n").unwrap();
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].0, "test");
        let block = &doc.blocks[0].1;
        assert_eq!(single(block, "_cell_length_a").as_f64(), Some(5.64));
        assert_eq!(single(block, "_cell_length_b").get_value(), &Scalar::Int(6));
    }

    #[test]
    fn test_loop_columns() {
        let doc = parse("data_t\nloop_\n_a\n_b\n1 x\n2 y\n").unwrap();
        let block = &doc.blocks[0].1;
        let a = looped(block, "_a");
        let b = looped(block, "_b");
        assert_eq!(a.len(), 2);
        assert_eq!(a[1].as_f64(), Some(2.0));
        assert_eq!(b[0].text(), "x");
    }

    #[test]
    fn test_incomplete_loop_row_dropped() {
        let doc = parse("data_t\nloop_\n_a\n_b\n1 2\n3\n").unwrap();
        assert_eq!(looped(&doc.blocks[0].1, "_a").len(), 1);
    }

    #[test]
    fn test_quoted_and_text_fields() {
        let input = "data_t\n_h 'P 21/c'\n_q \"it's fine\"\n_txt\n;line one\nline two\n;\n";
        let doc = parse(input).unwrap();
        let block = &doc.blocks[0].1;
        assert_eq!(single(block, "_h").text(), "P 21/c");
        assert_eq!(single(block, "_q").text(), "it's fine");
        assert_eq!(single(block, "_txt").text(), "line one\nline two");
    }

    #[test]
    fn test_symop_loop_with_quotes() {
        let input = "data_t\nloop_\n_symmetry_equiv_pos_as_xyz\n'x, y, z'\n'-x, y+1/2, -z+1/2'\n";
        let doc = parse(input).unwrap();
        let ops = looped(&doc.blocks[0].1, "_symmetry_equiv_pos_as_xyz");
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[1].text(), "-x, y+1/2, -z+1/2");
    }

    #[test]
    fn test_multiple_blocks_and_comments() {
        let input = "# header\ndata_first\n_a 1 # inline\ndata_SECOND\n_b 2\n";
        let doc = parse(input).unwrap();
        assert_eq!(doc.block_names(), vec!["first", "SECOND"]);
        assert!(doc.block("second").unwrap().contains("_b"));
    }

    #[test]
    fn test_save_frames_skipped() {
        let input = "data_dict\nsave_frame\n_inner 1\nsave_\n_outer 2\n";
        let doc = parse(input).unwrap();
        let block = &doc.blocks[0].1;
        assert!(!block.contains("_inner"));
        assert!(block.contains("_outer"));
    }

    #[test]
    fn test_unterminated_quote() {
        let err = parse("data_t\n_tag 'oops\n").unwrap_err();
        assert!(matches!(err, CifAtomsError::CifSyntax { line: 2, .. }));
    }

    #[test]
    fn test_unterminated_text_field() {
        let err = parse("data_t\n_tag\n;never closed\n").unwrap_err();
        assert!(matches!(err, CifAtomsError::CifSyntax { line: 3, .. }));
    }

    #[test]
    fn test_empty_document() {
        assert!(parse("").unwrap().blocks.is_empty());
    }
}
