//! Copy-if-modified staging of header files.
//!
//! # Design
//! - Every decision is recomputed from the filesystem; nothing is cached between runs.
//! - Equality is exact byte equality. Differing lengths short-circuit, equal lengths
//!   are always compared in full.
//! - A missing source fails before the destination is touched.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use tracing::{debug, info};

use crate::error::{StageError, StageResult};
use crate::layout::{StageLayout, base_dir_from_module};
use crate::model::{CopyTask, StageAction, StageRecord, StageReport};

const COMPARE_CHUNK: usize = 8 * 1024;

/// Stage every task in order, copying only where the destination differs.
///
/// # Errors
///
/// Returns the first [`StageError`] encountered. Tasks processed before the
/// failure keep their effect.
pub fn stage(tasks: &[CopyTask]) -> StageResult<StageReport> {
    let mut report = StageReport::default();
    for task in tasks {
        let action = stage_task(task)?;
        report.records.push(StageRecord {
            task: task.clone(),
            action,
        });
    }
    Ok(report)
}

/// Compute the actions [`stage`] would take without writing anything.
///
/// # Errors
///
/// Returns [`StageError::FileNotFound`] for a missing source,
/// [`StageError::WriteError`] when the destination path cannot be resolved for
/// writing, and [`StageError::ReadError`] when an existing file cannot be compared.
pub fn plan(tasks: &[CopyTask]) -> StageResult<StageReport> {
    let mut report = StageReport::default();
    for task in tasks {
        let action = decide(task)?;
        debug!(
            source = %task.source.display(),
            destination = %task.destination.display(),
            action = action.as_str(),
            "planned header"
        );
        report.records.push(StageRecord {
            task: task.clone(),
            action,
        });
    }
    Ok(report)
}

/// Stage a single task.
///
/// # Errors
///
/// Returns [`StageError::FileNotFound`] when the source is missing,
/// [`StageError::WriteError`] when the destination cannot be written, and
/// [`StageError::ReadError`] when an existing file cannot be compared.
pub fn stage_task(task: &CopyTask) -> StageResult<StageAction> {
    let action = decide(task)?;
    if action == StageAction::Copy {
        fs::copy(&task.source, &task.destination)
            .map_err(|source| StageError::write(&task.destination, source))?;
    }
    info!(
        source = %task.source.display(),
        destination = %task.destination.display(),
        action = action.as_str(),
        "staged header"
    );
    Ok(action)
}

/// Compare two files byte-for-byte.
///
/// # Errors
///
/// Returns [`StageError::ReadError`] when either file cannot be opened or read.
pub fn files_identical(left: &Path, right: &Path) -> StageResult<bool> {
    let left_len = fs::metadata(left)
        .map_err(|source| StageError::read(left, source))?
        .len();
    let right_len = fs::metadata(right)
        .map_err(|source| StageError::read(right, source))?
        .len();
    if left_len != right_len {
        return Ok(false);
    }

    let mut left_file = File::open(left).map_err(|source| StageError::read(left, source))?;
    let mut right_file = File::open(right).map_err(|source| StageError::read(right, source))?;
    let mut left_buf = [0_u8; COMPARE_CHUNK];
    let mut right_buf = [0_u8; COMPARE_CHUNK];

    loop {
        let left_read =
            fill(&mut left_file, &mut left_buf).map_err(|source| StageError::read(left, source))?;
        let right_read = fill(&mut right_file, &mut right_buf)
            .map_err(|source| StageError::read(right, source))?;
        if left_buf[..left_read] != right_buf[..right_read] {
            return Ok(false);
        }
        if left_read == 0 {
            return Ok(true);
        }
    }
}

/// Stage the fixed curl layout for the module located at `module_path`.
///
/// The base directory is the parent of `module_path`. `global_path` and
/// `args` are part of the build orchestrator's calling convention and are
/// not used.
///
/// # Errors
///
/// Returns [`StageError::InvalidModulePath`] when the base directory cannot be
/// derived, and otherwise any error from [`stage`].
pub fn run(
    module_path: &Path,
    global_path: Option<&Path>,
    args: &[String],
) -> StageResult<StageReport> {
    debug!(
        module_path = %module_path.display(),
        global_path = ?global_path,
        args = ?args,
        "staging module headers"
    );
    let base_dir = base_dir_from_module(module_path)?;
    stage(&StageLayout::curl().tasks(&base_dir))
}

fn decide(task: &CopyTask) -> StageResult<StageAction> {
    match fs::metadata(&task.source) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            return Err(StageError::FileNotFound {
                path: task.source.clone(),
            });
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(StageError::FileNotFound {
                path: task.source.clone(),
            });
        }
        Err(err) => return Err(StageError::read(&task.source, err)),
    }

    match fs::metadata(&task.destination) {
        Ok(meta) if meta.is_file() => {
            if files_identical(&task.source, &task.destination)? {
                Ok(StageAction::NotModified)
            } else {
                Ok(StageAction::Copy)
            }
        }
        Ok(_) => Ok(StageAction::Copy),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(StageAction::Copy),
        // A file standing in for a parent directory or a denied lookup: unwritable.
        Err(err) => Err(StageError::write(&task.destination, err)),
    }
}

fn fill(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(read) => filled += read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
