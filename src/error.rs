use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("PNG encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Cannot read raster {}: {}", .path.display(), .source)]
    RasterRead {
        path: PathBuf,
        #[source]
        source: gdal::errors::GdalError,
    },

    #[error("Raster has invalid dimensions: {0}x{1}")]
    InvalidDimensions(usize, usize),

    #[error(
        "Band {} is {}x{}, expected {}x{}",
        .path.display(),
        .found_width,
        .found_height,
        .expected_width,
        .expected_height
    )]
    DimensionMismatch {
        path: PathBuf,
        expected_width: usize,
        expected_height: usize,
        found_width: usize,
        found_height: usize,
    },

    #[error("Degenerate band: every pixel equals {0}, cannot rescale")]
    DegenerateBand(u16),

    #[error("Unknown Corine2018 class code: {0}")]
    UnknownClassCode(u16),

    #[error("Not a BigEarthNet band file name: {0}")]
    BandNameParse(String),

    #[error("Not a BigEarthNet mask file name: {0}")]
    MaskNameParse(String),

    #[error("Patch {} has {} band files, expected 3 (B04, B03, B02)", .0.display(), .1)]
    IncompleteBandSet(PathBuf, usize),

    #[error("No mask file in patch {}", .0.display())]
    NoMaskFile(PathBuf),

    #[error("{0} patches failed; see log for details")]
    RunFailed(usize),
}

pub type Result<T> = std::result::Result<T, PrepError>;
