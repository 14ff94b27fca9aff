//! Post-run folder statistics.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Total size of the regular files below every immediate subdirectory of
/// `root`, keyed by folder name. Folders named in `skip` are left out.
pub fn folder_sizes(root: &Path, skip: &[&str]) -> io::Result<BTreeMap<String, u64>> {
    let mut sizes = BTreeMap::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if skip.contains(&name.as_str()) {
            continue;
        }

        let size = WalkDir::new(entry.path())
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.metadata().ok())
            .map(|m| m.len())
            .sum();
        sizes.insert(name, size);
    }

    Ok(sizes)
}

/// Formats a byte count for humans: `512 bytes`, `1.50 KB`, `3.00 MB`, `1.25 GB`.
///
/// A unit is used only when the size is strictly larger than one of it, so
/// exactly 1024 bytes prints as `1024 bytes`.
pub fn format_size(bytes: u64) -> String {
    if bytes > GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes > MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes > KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
