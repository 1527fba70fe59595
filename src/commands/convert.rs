//! # convert 命令实现
//!
//! 批量读取 CIF 文件，对每个数据块做对称展开后写出为目标格式。
//!
//! ## 功能
//! - 单文件或目录输入，glob 过滤，可递归
//! - 每个结构一个输出文件：`<文件名>_<数据块名>.<扩展名>`
//! - 基于 rayon 的并行处理与进度条
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用 `batch/`, `utils/output.rs`
//! - 调用 `cifatoms::reader`, `cifatoms::writers`

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::convert::{ConvertArgs, OutputFormat};
use crate::utils::output;

use cifatoms::writers;
use cifatoms::{read_cif_file, Atoms, CifAtomsError, ReadOptions, Result};

use std::fs;
use std::path::Path;
use std::sync::Mutex;

/// 处理过程中产生、结束后统一打印的消息
enum Note {
    Converted { file: String, block: String, output: String },
    SkippedBlock { file: String, block: String, reason: String },
}

/// 执行 convert 命令
pub fn execute(args: ConvertArgs) -> Result<()> {
    output::print_header(&format!("Converting CIF to {} format", args.target));

    if !args.input.exists() {
        return Err(CifAtomsError::DirectoryNotFound {
            path: args.input.display().to_string(),
        });
    }
    validate_symprec(args.read.symprec)?;

    fs::create_dir_all(&args.output).map_err(|e| CifAtomsError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    let files = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)
        .recursive(args.recursive)
        .collect()?;

    if files.is_empty() {
        output::print_warning(&format!(
            "No files matched '{}' under {}",
            args.pattern,
            args.input.display()
        ));
        return Ok(());
    }

    output::print_info(&format!("Found {} file(s) to convert", files.len()));

    let options = args.read.to_options();
    let notes = Mutex::new(Vec::new());

    let result = BatchRunner::new(args.jobs).run(files, |path| {
        let mut file_notes = Vec::new();
        let outcome = convert_file(
            path,
            &args.output,
            args.target,
            args.overwrite,
            &options,
            &mut file_notes,
        );
        if let Ok(mut all) = notes.lock() {
            all.extend(file_notes);
        }
        match outcome {
            Ok(0) => ProcessResult::Skipped(path.display().to_string()),
            Ok(n) => ProcessResult::Success(n),
            Err(e) => ProcessResult::Failed(path.display().to_string(), e.to_string()),
        }
    });

    for note in notes.into_inner().unwrap_or_default() {
        match note {
            Note::Converted {
                file,
                block,
                output: out,
            } => output::print_conversion(&file, &block, &out),
            Note::SkippedBlock {
                file,
                block,
                reason,
            } => output::print_skip(&file, &block, &reason),
        }
    }

    for (path, err) in &result.failures {
        output::print_error(&format!("{}: {}", path, err));
    }

    output::print_separator();
    output::print_done(&format!(
        "Wrote {} structure(s) from {} of {} file(s) to '{}' ({} skipped, {} failed)",
        result.structures,
        result.success,
        result.total(),
        args.output.display(),
        result.skipped,
        result.failed
    ));

    Ok(())
}

fn validate_symprec(symprec: f64) -> Result<()> {
    if !(symprec.is_finite() && symprec > 0.0) {
        return Err(CifAtomsError::InvalidArgument(format!(
            "--symprec must be a positive distance, got {}",
            symprec
        )));
    }
    Ok(())
}

/// 转换单个 CIF 文件，返回写出的结构数
fn convert_file(
    input_path: &Path,
    output_dir: &Path,
    target: OutputFormat,
    overwrite: bool,
    options: &ReadOptions,
    notes: &mut Vec<Note>,
) -> Result<usize> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("structure");
    let file = input_path.display().to_string();

    let report = read_cif_file(input_path, options)?;

    for skipped in &report.skipped {
        notes.push(Note::SkippedBlock {
            file: file.clone(),
            block: skipped.name.clone(),
            reason: skipped.reason.clone(),
        });
    }

    let mut written = 0;
    for (block, atoms) in &report.structures {
        let output_path = output_dir.join(output_file_name(stem, block, target));

        if output_path.exists() && !overwrite {
            notes.push(Note::SkippedBlock {
                file: file.clone(),
                block: block.clone(),
                reason: format!("{} exists", output_path.display()),
            });
            continue;
        }

        let content = render(atoms, block, target)?;
        fs::write(&output_path, content).map_err(|e| CifAtomsError::FileWriteError {
            path: output_path.display().to_string(),
            source: e,
        })?;

        notes.push(Note::Converted {
            file: file.clone(),
            block: block.clone(),
            output: output_path.display().to_string(),
        });
        written += 1;
    }

    Ok(written)
}

/// `<stem>_<block>.<ext>`，数据块名中的路径分隔符与空白替换为 `_`
fn output_file_name(stem: &str, block: &str, target: OutputFormat) -> String {
    let block: String = block
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_whitespace() {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("{}_{}.{}", stem, block, target.extension())
}

fn render(atoms: &Atoms, name: &str, target: OutputFormat) -> Result<String> {
    match target {
        OutputFormat::Xyz => writers::to_xyz_string(atoms, name),
        OutputFormat::Poscar => writers::to_poscar_string(atoms, name),
        OutputFormat::Cell => writers::to_cell_string(atoms, name),
        OutputFormat::Res => writers::to_res_string(atoms, name),
        OutputFormat::Cif => writers::to_cif_string(atoms, name),
    }
}
