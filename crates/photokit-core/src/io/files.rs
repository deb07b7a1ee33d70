use std::path::{Path, PathBuf};

use crate::error::Result;

/// List files in `directory` matching a glob `pattern` (e.g. `"*.fits"`),
/// sorted by path.
pub fn list_fits_files(directory: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full = directory.join(pattern);
    let mut files = Vec::new();
    for entry in glob::glob(&full.to_string_lossy())? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Base name of a path as an owned string, empty when there is none.
pub fn file_name_string(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Output path for a reduced frame: `<dir>/reduced_<original name>`.
pub fn reduced_output_path(output_dir: &Path, input: &Path) -> PathBuf {
    output_dir.join(format!("reduced_{}", file_name_string(input)))
}
