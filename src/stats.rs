use crate::corine::{self, l3_bucket, NUM_L3_BUCKETS};
use crate::error::{PrepError, Result};
use crate::raster;
use crate::walker::{self, FileFilter};
use log::{info, warn};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-class presence counters: slot `i` counts masks containing the class
/// whose level-3 bucket is `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCounts {
    counts: [u64; NUM_L3_BUCKETS],
}

impl ClassCounts {
    pub fn new() -> Self {
        Self {
            counts: [0; NUM_L3_BUCKETS],
        }
    }

    pub fn get(&self, bucket: u8) -> u64 {
        self.counts[usize::from(bucket) - 1]
    }

    /// Count one mask's distinct class codes: each code's bucket is
    /// incremented by exactly 1, however many pixels carry it. All codes are
    /// resolved before any counter moves, so an unknown code leaves the
    /// counts untouched.
    pub fn record_mask_codes(&mut self, codes: &[u16]) -> Result<()> {
        let buckets: Vec<u8> = codes
            .iter()
            .map(|&code| l3_bucket(code))
            .collect::<Result<_>>()?;
        for bucket in buckets {
            self.counts[usize::from(bucket) - 1] += 1;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.counts.iter().copied()
    }
}

impl Default for ClassCounts {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a statistics run over a tile range.
#[derive(Debug)]
pub struct StatsRun {
    pub counts: ClassCounts,
    pub masks_read: usize,
    pub failed: Vec<(PathBuf, PrepError)>,
}

/// Count, per Corine2018 level-3 class, how many masks in the tile range
/// contain that class at least once.
///
/// This is a presence count over mask files, not a pixel histogram: a class
/// covering one pixel of a mask counts the same as a class covering the
/// whole mask. A mask with an unknown code is reported as failed and the
/// run continues.
pub fn collect_statistics(mask_root: &Path, start: usize, end: Option<usize>) -> Result<StatsRun> {
    let tiles = walker::list_tiles(mask_root, start, end, FileFilter::Masks)?;
    info!("Collecting statistics over {} tiles", tiles.len());

    let mut run = StatsRun {
        counts: ClassCounts::new(),
        masks_read: 0,
        failed: Vec::new(),
    };
    for tile in &tiles {
        for patch in &tile.patches {
            for mask_path in &patch.files {
                match tally_mask(mask_path, &mut run.counts) {
                    Ok(()) => run.masks_read += 1,
                    Err(e) => {
                        warn!("Skipping mask {}: {}", mask_path.display(), e);
                        run.failed.push((mask_path.clone(), e));
                    }
                }
            }
        }
    }
    info!(
        "Statistics collected from {} masks ({} failed)",
        run.masks_read,
        run.failed.len()
    );
    Ok(run)
}

fn tally_mask(mask_path: &Path, counts: &mut ClassCounts) -> Result<()> {
    let (data, _) = raster::read_band(mask_path)?;
    let codes = corine::distinct_codes(&data);
    counts.record_mask_codes(&codes)
}

/// Persist counts as plain text: one count per line, line `i` (1-based) is
/// the count for bucket `i`.
pub fn save_statistics(counts: &ClassCounts, path: &Path) -> Result<()> {
    let mut out = String::new();
    for count in counts.iter() {
        writeln!(out, "{}", count).expect("writing to String cannot fail");
    }
    fs::write(path, out)?;
    Ok(())
}
