use crate::error::{PrepError, Result};
use log::{debug, info};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Bundle files into a deflate-compressed zip, each under its bare file
/// name. Any single failure fails the whole bundle; there are no partial
/// retries.
pub fn zip_files(paths: &[PathBuf], zip_path: &Path) -> Result<usize> {
    info!("Creating archive: {}", zip_path.display());
    let file = File::create(zip_path)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = 0;
    for path in paths {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                PrepError::Io(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("path has no usable file name: {}", path.display()),
                ))
            })?;
        debug!("Adding {} as {}", path.display(), name);
        writer.start_file(name, options)?;
        let mut source = File::open(path)?;
        io::copy(&mut source, &mut writer)?;
        entries += 1;
    }
    writer.finish()?;
    info!("Archived {} files", entries);
    Ok(entries)
}

/// Extract every entry of a zip into a directory.
pub fn unzip_files(zip_path: &Path, target_dir: &Path) -> Result<()> {
    info!(
        "Extracting {} into {}",
        zip_path.display(),
        target_dir.display()
    );
    let mut archive = ZipArchive::new(File::open(zip_path)?)?;
    archive.extract(target_dir)?;
    Ok(())
}
