use crate::error::{PrepError, Result};
use ndarray::Array2;

/// Rescale a band from its own value range to 8-bit.
///
/// `out = (v - min) * 255 / (max - min)`, truncating toward zero. Min and
/// max are taken from the band itself, not from a fixed sensor range, so
/// normalized values are not comparable across patches. A constant band has
/// no range to stretch and fails with `DegenerateBand`.
pub fn normalize_band(band: &Array2<u16>) -> Result<Array2<u8>> {
    let (Some(min), Some(max)) = (
        band.iter().copied().min(),
        band.iter().copied().max(),
    ) else {
        return Err(PrepError::InvalidDimensions(0, 0));
    };
    if min == max {
        return Err(PrepError::DegenerateBand(min));
    }
    let range = f64::from(max - min);
    Ok(band.mapv(|v| (f64::from(v - min) * 255.0 / range) as u8))
}
