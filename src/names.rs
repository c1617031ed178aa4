use crate::error::{PrepError, Result};
use regex::Regex;
use std::sync::LazyLock;

// BigEarthNet v2 file names encode identity at fixed character offsets, e.g.
//   S2A_MSIL2A_20170617T113321_N9999_R080_T29UNB_53_45_B02.tif
//   S2A_MSIL2A_20170617T113321_N9999_R080_T29UNB_53_45_reference_map.tif
// The field widths are fixed (tile 11, patch 5, band 3, date 8), so anchored
// fixed-width patterns extract the same substrings as offset-based slicing
// while rejecting names of unexpected shape.
static BAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[0-9A-Z]{3}_MSIL2A_(?P<date>\d{8})T\d{6}_N\d{4}_(?P<tile>R\d{3}_T[0-9A-Z]{5})_(?P<patch>\d{2}_\d{2})_(?P<band>B\d{2})\.tif$",
    )
    .expect("band name pattern")
});

static MASK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[0-9A-Z]{3}_MSIL2A_(?P<date>\d{8})T\d{6}_N\d{4}_(?P<tile>R\d{3}_T[0-9A-Z]{5})_(?P<patch>\d{2}_\d{2})_reference_map\.tif$",
    )
    .expect("mask name pattern")
});

/// Identity of one spectral band file: tile, patch, band designator, date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandName {
    pub tile: String,
    pub patch: String,
    pub band: String,
    pub date: String,
}

impl BandName {
    pub fn parse(file_name: &str) -> Result<Self> {
        let caps = BAND_RE
            .captures(file_name)
            .ok_or_else(|| PrepError::BandNameParse(file_name.to_string()))?;
        Ok(Self {
            tile: caps["tile"].to_string(),
            patch: caps["patch"].to_string(),
            band: caps["band"].to_string(),
            date: caps["date"].to_string(),
        })
    }

    /// Target file name for the RGB PNG of this band's patch.
    pub fn png_file_name(&self) -> String {
        format!("{}_{}_{}.png", self.tile, self.patch, self.date)
    }
}

/// Identity of one reference-map file: tile, patch, date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskName {
    pub tile: String,
    pub patch: String,
    pub date: String,
}

impl MaskName {
    pub fn parse(file_name: &str) -> Result<Self> {
        let caps = MASK_RE
            .captures(file_name)
            .ok_or_else(|| PrepError::MaskNameParse(file_name.to_string()))?;
        Ok(Self {
            tile: caps["tile"].to_string(),
            patch: caps["patch"].to_string(),
            date: caps["date"].to_string(),
        })
    }

    /// Target file name for the mask PNG of this patch.
    pub fn png_file_name(&self) -> String {
        format!("{}_{}_{}_mask.png", self.tile, self.patch, self.date)
    }
}
