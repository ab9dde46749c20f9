//! Expansion of command-line paths into disclosure files.

use std::path::{Path, PathBuf};

const EXTENSIONS: &[&str] = &["htm", "html"];

fn is_disclosure(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Expands directories into their `.htm`/`.html` files, sorted by path.
///
/// Any other path is kept as given, so a missing file is reported by the
/// driver rather than dropped here.
///
/// # Errors
///
/// Returns an error if a directory cannot be listed.
pub fn collect_documents(paths: &[PathBuf]) -> std::io::Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
                .map(|entry| entry.map(|e| e.path()))
                .collect::<std::io::Result<Vec<_>>>()?
                .into_iter()
                .filter(|p| is_disclosure(p))
                .collect();
            entries.sort();
            log::debug!("{}: {} disclosure file(s)", path.display(), entries.len());
            documents.extend(entries);
        } else {
            documents.push(path.clone());
        }
    }

    Ok(documents)
}
