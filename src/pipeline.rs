use crate::convert::{self, MaskDepth, Outcome};
use crate::corine::CorineLevel;
use crate::error::{PrepError, Result};
use crate::names::{BandName, MaskName};
use crate::walker::{self, FileFilter, PatchEntry};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Tally of one batch run. `outputs` lists every target path, created now or
/// pre-existing, so a run can feed the archiver.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub created: usize,
    pub skipped: usize,
    pub failed: Vec<(PathBuf, PrepError)>,
    pub outputs: Vec<PathBuf>,
}

impl RunSummary {
    fn record(&mut self, target: PathBuf, outcome: Outcome) {
        match outcome {
            Outcome::Created => self.created += 1,
            Outcome::AlreadyExists => {
                debug!("Already existed: {}", target.display());
                self.skipped += 1;
            }
        }
        self.outputs.push(target);
    }

    fn fail(&mut self, subject: &Path, error: PrepError) {
        warn!("Skipping {}: {}", subject.display(), error);
        self.failed.push((subject.to_path_buf(), error));
    }
}

/// Convert every patch in the tile range into an RGB PNG next to its bands.
///
/// A patch that fails (unreadable band, missing band, degenerate band, ...)
/// is recorded and the batch continues.
pub fn convert_images(root: &Path, start: usize, end: Option<usize>) -> Result<RunSummary> {
    let tiles = walker::list_tiles(root, start, end, FileFilter::ImageBands)?;
    info!("Converting images in {} tiles", tiles.len());

    let mut summary = RunSummary::default();
    for tile in &tiles {
        for patch in &tile.patches {
            match convert_patch_image(patch) {
                Ok((target, outcome)) => summary.record(target, outcome),
                Err(e) => summary.fail(&patch.path, e),
            }
        }
    }
    Ok(summary)
}

fn convert_patch_image(patch: &PatchEntry) -> Result<(PathBuf, Outcome)> {
    let ordered = order_rgb(patch)?;
    let name = BandName::parse(file_name(&ordered[0])?)?;
    let target = patch.path.join(name.png_file_name());
    let outcome = convert::convert_image(&ordered, &target)?;
    Ok((target, outcome))
}

/// Order a patch's band files red, green, blue (B04, B03, B02), independent
/// of directory-listing order.
fn order_rgb(patch: &PatchEntry) -> Result<[PathBuf; 3]> {
    let mut red = None;
    let mut green = None;
    let mut blue = None;
    for path in &patch.files {
        let parsed = BandName::parse(file_name(path)?)?;
        match parsed.band.as_str() {
            "B04" => red = Some(path.clone()),
            "B03" => green = Some(path.clone()),
            "B02" => blue = Some(path.clone()),
            _ => {}
        }
    }
    match (red, green, blue) {
        (Some(r), Some(g), Some(b)) => Ok([r, g, b]),
        _ => Err(PrepError::IncompleteBandSet(
            patch.path.clone(),
            patch.files.len(),
        )),
    }
}

/// Convert every mask in the tile range into a single-band PNG next to it.
pub fn convert_masks(
    root: &Path,
    start: usize,
    end: Option<usize>,
    depth: MaskDepth,
) -> Result<RunSummary> {
    let tiles = walker::list_tiles(root, start, end, FileFilter::Masks)?;
    info!("Converting masks in {} tiles", tiles.len());

    let mut summary = RunSummary::default();
    for tile in &tiles {
        for patch in &tile.patches {
            if patch.files.is_empty() {
                summary.fail(&patch.path, PrepError::NoMaskFile(patch.path.clone()));
                continue;
            }
            for mask_path in &patch.files {
                match convert_patch_mask(&patch.path, mask_path, depth) {
                    Ok((target, outcome)) => summary.record(target, outcome),
                    Err(e) => summary.fail(mask_path, e),
                }
            }
        }
    }
    Ok(summary)
}

fn convert_patch_mask(
    patch_dir: &Path,
    mask_path: &Path,
    depth: MaskDepth,
) -> Result<(PathBuf, Outcome)> {
    let name = MaskName::parse(file_name(mask_path)?)?;
    let target = patch_dir.join(name.png_file_name());
    let outcome = convert::convert_mask(mask_path, &target, depth)?;
    Ok((target, outcome))
}

/// Remap every mask raster in a flat source directory into the target
/// directory under the same file name, codes replaced by bucket indices.
pub fn remap_masks(source_dir: &Path, target_dir: &Path, level: CorineLevel) -> Result<RunSummary> {
    fs::create_dir_all(target_dir)?;
    info!(
        "Remapping masks from {} into {}",
        source_dir.display(),
        target_dir.display()
    );

    let mut summary = RunSummary::default();
    for entry in fs::read_dir(source_dir)? {
        let path = entry?.path();
        let is_mask = path.is_file()
            && matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("png") | Some("tif")
            );
        if !is_mask {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = target_dir.join(file_name);
        match convert::convert_mask_remapped(&path, &target, level) {
            Ok(outcome) => summary.record(target, outcome),
            Err(e) => summary.fail(&path, e),
        }
    }
    Ok(summary)
}

fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PrepError::BandNameParse(path.display().to_string()))
}
