//! Artifact packaging
//!
//! Packs the normalized dataset directory into a single zip artifact named
//! by topic, canton and timestamp.

use crate::domain::{HarvestError, Result};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::ZipWriter;

/// Zips every file directly inside `source_dir` into `archive_path`.
pub fn zip_directory(source_dir: &Path, archive_path: &Path) -> Result<()> {
    let file = File::create(archive_path)
        .map_err(|e| HarvestError::Io(format!("Failed to create {}: {e}", archive_path.display())))?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let mut entries: Vec<_> = std::fs::read_dir(source_dir)
        .map_err(|e| HarvestError::Io(format!("Failed to read {}: {e}", source_dir.display())))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    let mut buffer = Vec::new();
    for path in entries {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| HarvestError::Io(format!("Invalid file name: {}", path.display())))?;

        writer.start_file(name, options)?;
        buffer.clear();
        File::open(&path)?.read_to_end(&mut buffer)?;
        writer.write_all(&buffer)?;
    }

    writer.finish()?;
    Ok(())
}
