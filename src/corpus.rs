use crate::error::{RagError, Result};
use std::fs::{self, DirBuilder};
use std::path::{Path, PathBuf};

pub const PLACEHOLDER_FILENAME: &str = "sample.txt";
pub const PLACEHOLDER_CONTENT: &str = "This is a sample document for the RAG system.";

const TEXT_EXTENSION: &str = "txt";

/// Creates a directory if it doesn't exist
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    DirBuilder::new().recursive(true).create(path)?;
    Ok(())
}

fn is_text_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == TEXT_EXTENSION)
}

/// Lists the `.txt` files directly inside `dir`, sorted by name.
pub fn list_text_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if is_text_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Lists the corpus files, creating the directory and a placeholder document
/// when there is nothing to index.
pub fn prepare_corpus(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();

    if !dir.exists() {
        tracing::warn!("Directory {} does not exist, creating it", dir.display());
        ensure_dir(dir)?;
    }

    let files = list_text_files(dir)?;
    if !files.is_empty() {
        return Ok(files);
    }

    let placeholder = dir.join(PLACEHOLDER_FILENAME);
    fs::write(&placeholder, PLACEHOLDER_CONTENT)?;
    tracing::info!(
        "No documents found, added placeholder at {}",
        placeholder.display()
    );
    Ok(vec![placeholder])
}

/// Reduces an uploaded filename to a safe basename.
///
/// Path components are discarded, anything outside ASCII alphanumerics,
/// `.`, `-` and `_` becomes `_`, and leading dots are stripped.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Copies a `.txt` document into the corpus directory and returns its new path.
///
/// The index is not touched; callers reload afterwards.
pub fn import_document(dir: impl AsRef<Path>, source: impl AsRef<Path>) -> Result<PathBuf> {
    let source = source.as_ref();
    let raw_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| RagError::invalid_document(format!("no file name: {}", source.display())))?;

    let name = sanitize_filename(raw_name)
        .ok_or_else(|| RagError::invalid_document(format!("unusable file name: {raw_name}")))?;
    if !name.ends_with(".txt") {
        return Err(RagError::invalid_document(format!(
            "only .txt files are allowed: {raw_name}"
        )));
    }
    if !source.is_file() {
        return Err(RagError::invalid_document(format!(
            "not a file: {}",
            source.display()
        )));
    }

    ensure_dir(&dir)?;
    let target = dir.as_ref().join(name);
    // copying a file onto itself truncates it
    if target.exists() && fs::canonicalize(source)? == fs::canonicalize(&target)? {
        tracing::info!("{} is already in the corpus", target.display());
        return Ok(target);
    }
    fs::copy(source, &target)?;
    tracing::info!("Imported {} as {}", source.display(), target.display());
    Ok(target)
}
