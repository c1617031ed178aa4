use crate::error::Result;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Selects which files of a patch directory a walk collects.
///
/// One walker with a suffix predicate replaces the three near-identical
/// traversals the dataset scripts usually grow (bands only, masks only,
/// both).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFilter {
    /// Reflectance bands B02, B03, B04.
    ImageBands,
    /// Reference-map masks.
    Masks,
    /// Bands and masks.
    All,
}

impl FileFilter {
    pub fn matches(&self, file_name: &str) -> bool {
        let is_band = file_name.ends_with("B02.tif")
            || file_name.ends_with("B03.tif")
            || file_name.ends_with("B04.tif");
        let is_mask = file_name.ends_with("map.tif");
        match self {
            FileFilter::ImageBands => is_band,
            FileFilter::Masks => is_mask,
            FileFilter::All => is_band || is_mask,
        }
    }
}

/// One patch directory and the files in it that passed the filter.
#[derive(Debug, Clone)]
pub struct PatchEntry {
    pub path: PathBuf,
    pub files: Vec<PathBuf>,
}

/// One tile directory and its patches.
#[derive(Debug, Clone)]
pub struct TileEntry {
    pub path: PathBuf,
    pub patches: Vec<PatchEntry>,
}

/// Walk the fixed `root/{tile}/{patch}/{files}` layout.
///
/// Tiles are returned in directory-listing order and sliced to the half-open
/// index range `[start, end)`; `end == None` means "through the last tile",
/// and an `end` past the listing length is clamped. Listing order is
/// whatever the filesystem reports; no stable ordering is guaranteed.
pub fn list_tiles(
    root: &Path,
    start: usize,
    end: Option<usize>,
    filter: FileFilter,
) -> Result<Vec<TileEntry>> {
    let mut tile_dirs: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.is_dir() {
            tile_dirs.push(path);
        }
    }
    debug!("Found {} tile directories under {}", tile_dirs.len(), root.display());

    let end = end.unwrap_or(tile_dirs.len()).min(tile_dirs.len());
    let start = start.min(end);

    let mut tiles = Vec::with_capacity(end - start);
    for tile_path in tile_dirs.drain(..).skip(start).take(end - start) {
        let mut patches = Vec::new();
        for entry in fs::read_dir(&tile_path)? {
            let patch_path = entry?.path();
            if !patch_path.is_dir() {
                continue;
            }
            let mut files = Vec::new();
            for entry in fs::read_dir(&patch_path)? {
                let file_path = entry?.path();
                let keep = file_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| filter.matches(n));
                if keep && file_path.is_file() {
                    files.push(file_path);
                }
            }
            patches.push(PatchEntry {
                path: patch_path,
                files,
            });
        }
        tiles.push(TileEntry {
            path: tile_path,
            patches,
        });
    }
    Ok(tiles)
}
