//! Fixed mapping from module-local headers to their place in the upstream tree.

use std::path::{Path, PathBuf};

use crate::error::{StageError, StageResult};
use crate::model::CopyTask;

const UPSTREAM_DIR: &str = "upstream";
const CURL_ENTRIES: &[(&str, &[&str])] = &[
    ("curlbuild.h", &["include", "curl"]),
    ("setup.h", &["lib"]),
];

/// Headers to stage and the upstream subdirectory each one lands in.
#[derive(Debug, Clone, Copy)]
pub struct StageLayout {
    entries: &'static [(&'static str, &'static [&'static str])],
}

impl StageLayout {
    /// Layout of the vendored libcurl tree: `curlbuild.h` and `setup.h`.
    #[must_use]
    pub const fn curl() -> Self {
        Self {
            entries: CURL_ENTRIES,
        }
    }

    /// Expand the layout into concrete copy tasks rooted at `base_dir`.
    ///
    /// Sources are `{base_dir}/{file}`; destinations are
    /// `{base_dir}/upstream/{subpath}/{file}`.
    #[must_use]
    pub fn tasks(&self, base_dir: &Path) -> Vec<CopyTask> {
        self.entries
            .iter()
            .map(|(file, subpath)| {
                let mut destination = base_dir.join(UPSTREAM_DIR);
                for segment in *subpath {
                    destination.push(segment);
                }
                destination.push(file);
                CopyTask::new(base_dir.join(file), destination)
            })
            .collect()
    }
}

/// Resolve the base directory from a module's own file location.
///
/// A bare file name yields an empty path, so tasks resolve against the
/// working directory and print without a `./` prefix.
///
/// # Errors
///
/// Returns [`StageError::InvalidModulePath`] when the path has no parent.
pub fn base_dir_from_module(module_path: &Path) -> StageResult<PathBuf> {
    match module_path.parent() {
        Some(parent) => Ok(parent.to_path_buf()),
        None => Err(StageError::InvalidModulePath {
            path: module_path.to_path_buf(),
        }),
    }
}
