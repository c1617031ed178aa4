use crate::error::{PrepError, Result};
use gdal::raster::RasterBand;
use gdal::Dataset;
use log::debug;
use ndarray::Array2;
use std::path::Path;

/// Pixel dimensions of a raster band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterSize {
    pub width: usize,
    pub height: usize,
}

/// Read band 1 of a raster into a row-major array of shape (height, width).
///
/// The GDAL dataset handle lives only for the duration of this call.
pub fn read_band(path: &Path) -> Result<(Array2<u16>, RasterSize)> {
    debug!("Opening raster: {}", path.display());
    let dataset = Dataset::open(path).map_err(|source| PrepError::RasterRead {
        path: path.to_path_buf(),
        source,
    })?;

    let rasterband: RasterBand = dataset.rasterband(1)?;
    let width = rasterband.x_size();
    let height = rasterband.y_size();
    if width == 0 || height == 0 {
        return Err(PrepError::InvalidDimensions(width, height));
    }

    let buffer = rasterband.read_as::<u16>((0, 0), (width, height), (width, height), None)?;
    let data_vec: Vec<u16> = buffer.into_iter().collect();
    let data = Array2::from_shape_vec((height, width), data_vec)?;

    Ok((data, RasterSize { width, height }))
}
