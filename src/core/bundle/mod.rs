use anyhow::Context;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Build an in-memory zip archive of every regular file under `root`.
///
/// Directory entries and symbolic links are excluded; each file is stored
/// under its path relative to `root` with `/` separators. Entry order is
/// whatever the directory walk yields and is not a contract. Read errors
/// propagate; there is no partial retry.
pub fn bundle_workflow(root: &Path) -> crate::Result<Vec<u8>> {
    let mut files = Vec::new();
    collect_regular_files(root, &mut files)?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &files {
        let entry_name = relative_entry_name(root, path)?;
        tracing::debug!("adding to bundle: {} -> {}", path.display(), entry_name);
        writer
            .start_file(entry_name, options)
            .with_context(|| format!("failed to start zip entry for {}", path.display()))?;
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read workflow file {}", path.display()))?;
        writer.write_all(&bytes)?;
    }

    let cursor = writer.finish().context("failed to finalize zip bundle")?;
    Ok(cursor.into_inner())
}

fn collect_regular_files(dir: &Path, files: &mut Vec<PathBuf>) -> crate::Result<()> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read workflow directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            continue;
        }
        let path = entry.path();
        if file_type.is_dir() {
            collect_regular_files(&path, files)?;
        } else if file_type.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

fn relative_entry_name(root: &Path, path: &Path) -> crate::Result<String> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("{} escapes workflow root", path.display()))?;
    let name = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    Ok(name)
}
