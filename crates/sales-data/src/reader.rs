//! Discovery and concurrent loading of sales export files.

use std::path::{Path, PathBuf};

use sales_core::error::SalesError;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Extension picked up when a directory is given as input.
pub const EXPORT_EXTENSION: &str = "txt";

/// Outcome of reading one selected file.
#[derive(Debug)]
pub enum LoadedFile {
    Text { path: PathBuf, contents: String },
    Unreadable { path: PathBuf, error: SalesError },
}

impl LoadedFile {
    pub fn path(&self) -> &Path {
        match self {
            LoadedFile::Text { path, .. } | LoadedFile::Unreadable { path, .. } => path,
        }
    }

    pub fn contents(&self) -> Option<&str> {
        match self {
            LoadedFile::Text { contents, .. } => Some(contents),
            LoadedFile::Unreadable { .. } => None,
        }
    }
}

/// Expand the user's selection into the list of files to read.
///
/// Directories are walked recursively for `.txt` exports, sorted by path.
/// Anything else is passed through unchanged, so a missing file is reported
/// when it fails to read rather than silently dropped here.
pub fn collect_input_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = walkdir::WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.file_type().is_file()
                    && entry
                        .path()
                        .extension()
                        .map(|ext| ext == EXPORT_EXTENSION)
                        .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .collect();

        if found.is_empty() {
            warn!("No .{} exports found in {}", EXPORT_EXTENSION, path.display());
        }
        found.sort();
        files.extend(found);
    }

    files
}

/// Read every file concurrently and hand back the results in selection order.
///
/// Returns only after the last read has finished. Invalid UTF-8 is replaced
/// rather than rejected. A file that cannot be read is logged and returned as
/// [`LoadedFile::Unreadable`]; the others are unaffected.
pub async fn read_batch(paths: &[PathBuf]) -> Vec<LoadedFile> {
    let mut reads = JoinSet::new();
    for (index, path) in paths.iter().cloned().enumerate() {
        reads.spawn(async move {
            let result = tokio::fs::read(&path).await;
            (index, path, result)
        });
    }

    let mut slots: Vec<Option<LoadedFile>> = paths.iter().map(|_| None).collect();

    // Drain the set; results land in their selection slot whatever order
    // the reads finish in.
    while let Some(joined) = reads.join_next().await {
        let (index, path, result) = match joined {
            Ok(done) => done,
            Err(e) => {
                warn!("File read task failed: {}", e);
                continue;
            }
        };

        let loaded = match result {
            Ok(bytes) => {
                debug!(
                    "Read {} ({} bytes, {} still pending)",
                    path.display(),
                    bytes.len(),
                    reads.len()
                );
                LoadedFile::Text {
                    contents: String::from_utf8_lossy(&bytes).into_owned(),
                    path,
                }
            }
            Err(source) => {
                warn!("Failed to read file {}: {}", path.display(), source);
                LoadedFile::Unreadable {
                    error: SalesError::FileRead {
                        path: path.clone(),
                        source,
                    },
                    path,
                }
            }
        };
        slots[index] = Some(loaded);
    }

    slots.into_iter().flatten().collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
