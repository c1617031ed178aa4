use crate::corine::{self, CorineLevel};
use crate::error::{PrepError, Result};
use crate::normalize::normalize_band;
use crate::raster;
use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use log::{debug, info};
use ndarray::Array2;
use std::path::{Path, PathBuf};

/// Result of a conversion: outputs are write-once, so an existing target is
/// a successful no-op, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    AlreadyExists,
}

/// Output bit depth for raw (non-remapped) mask PNGs.
///
/// Raw Corine codes go up to 999 and only fit losslessly in 16 bits;
/// `Eight` truncates each pixel to its low byte for consumers that expect
/// 8-bit masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskDepth {
    Eight,
    #[default]
    Sixteen,
}

/// Create an 8-bit RGB PNG from three single-band rasters.
///
/// The caller supplies the bands pre-ordered; for Sentinel-2 RGB that is
/// B04, B03, B02. Each band is rescaled to 8-bit from its own value range
/// and written as one plane in input order. All bands must share the first
/// band's dimensions.
pub fn convert_image(band_paths: &[PathBuf; 3], target: &Path) -> Result<Outcome> {
    if target.exists() {
        debug!("Target already exists, skipping: {}", target.display());
        return Ok(Outcome::AlreadyExists);
    }

    let (first, size) = raster::read_band(&band_paths[0])?;
    let mut planes: Vec<Array2<u8>> = Vec::with_capacity(3);
    planes.push(normalize_band(&first)?);
    for path in &band_paths[1..] {
        let (data, band_size) = raster::read_band(path)?;
        if band_size != size {
            return Err(PrepError::DimensionMismatch {
                path: path.clone(),
                expected_width: size.width,
                expected_height: size.height,
                found_width: band_size.width,
                found_height: band_size.height,
            });
        }
        planes.push(normalize_band(&data)?);
    }

    let mut img = RgbImage::new(size.width as u32, size.height as u32);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let (row, col) = (y as usize, x as usize);
        *pixel = Rgb([
            planes[0][[row, col]],
            planes[1][[row, col]],
            planes[2][[row, col]],
        ]);
    }
    img.save(target)?;
    info!("Created {}", target.display());
    Ok(Outcome::Created)
}

/// Create a single-band PNG from a mask raster, pixel values unchanged.
pub fn convert_mask(mask_path: &Path, target: &Path, depth: MaskDepth) -> Result<Outcome> {
    if target.exists() {
        debug!("Target already exists, skipping: {}", target.display());
        return Ok(Outcome::AlreadyExists);
    }

    let (data, size) = raster::read_band(mask_path)?;
    match depth {
        MaskDepth::Sixteen => {
            let mut img: ImageBuffer<Luma<u16>, Vec<u16>> =
                ImageBuffer::new(size.width as u32, size.height as u32);
            for (x, y, pixel) in img.enumerate_pixels_mut() {
                *pixel = Luma([data[[y as usize, x as usize]]]);
            }
            img.save(target)?;
        }
        MaskDepth::Eight => {
            let mut img = GrayImage::new(size.width as u32, size.height as u32);
            for (x, y, pixel) in img.enumerate_pixels_mut() {
                *pixel = Luma([data[[y as usize, x as usize]] as u8]);
            }
            img.save(target)?;
        }
    }
    info!("Created {}", target.display());
    Ok(Outcome::Created)
}

/// Create a single-band 8-bit PNG from a mask raster with every class code
/// replaced by its bucket index at the given level.
pub fn convert_mask_remapped(
    mask_path: &Path,
    target: &Path,
    level: CorineLevel,
) -> Result<Outcome> {
    if target.exists() {
        debug!("Target already exists, skipping: {}", target.display());
        return Ok(Outcome::AlreadyExists);
    }

    let (data, size) = raster::read_band(mask_path)?;
    let remapped = corine::remap_mask(&data, level)?;

    let mut img = GrayImage::new(size.width as u32, size.height as u32);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Luma([remapped[[y as usize, x as usize]]]);
    }
    img.save(target)?;
    info!("Created {}", target.display());
    Ok(Outcome::Created)
}
