use crate::error::{PrepError, Result};
use ndarray::{Array2, Zip};
use std::collections::HashSet;

/// The 44 Corine2018 level-3 land-cover codes in taxonomy order, plus the
/// sentinel 999 for unclassified pixels. A code's 1-based position in this
/// table is its level-3 bucket index.
pub static L3_CODES: [u16; 45] = [
    // 1xx artificial surfaces
    111, 112, 121, 122, 123, 124, 131, 132, 133, 141, 142,
    // 2xx agricultural areas
    211, 212, 213, 221, 222, 223, 231, 241, 242, 243, 244,
    // 3xx forest and semi-natural areas
    311, 312, 313, 321, 322, 323, 324, 331, 332, 333, 334, 335,
    // 4xx wetlands
    411, 412, 421, 422, 423,
    // 5xx water bodies
    511, 512, 521, 522, 523,
    // unclassified
    999,
];

pub const UNCLASSIFIED: u16 = 999;

/// Number of level-3 buckets (including unclassified).
pub const NUM_L3_BUCKETS: usize = L3_CODES.len();

/// Number of level-1 buckets: five macro-categories plus unclassified.
pub const NUM_L1_BUCKETS: usize = 6;

/// Remap granularity: fine-grained level 3 (45 buckets) or level-1
/// macro-categories (6 buckets).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorineLevel {
    L3,
    L1,
}

/// Level-3 bucket index in [1, 45] for a raw class code.
pub fn l3_bucket(code: u16) -> Result<u8> {
    L3_CODES
        .iter()
        .position(|&c| c == code)
        .map(|i| (i + 1) as u8)
        .ok_or(PrepError::UnknownClassCode(code))
}

/// Inverse of [`l3_bucket`]: the raw code for a bucket index in [1, 45].
pub fn l3_code(bucket: u8) -> Option<u16> {
    let bucket = usize::from(bucket);
    (1..=NUM_L3_BUCKETS)
        .contains(&bucket)
        .then(|| L3_CODES[bucket - 1])
}

/// Level-1 bucket index in [1, 6] for a raw class code: the Corine
/// macro-category (leading digit) for known codes, 6 for unclassified.
pub fn l1_bucket(code: u16) -> Result<u8> {
    // membership check so codes outside the taxonomy are rejected even when
    // their leading digit looks plausible
    l3_bucket(code)?;
    Ok(match code {
        UNCLASSIFIED => 6,
        _ => (code / 100) as u8,
    })
}

pub fn bucket(code: u16, level: CorineLevel) -> Result<u8> {
    match level {
        CorineLevel::L3 => l3_bucket(code),
        CorineLevel::L1 => l1_bucket(code),
    }
}

/// Distinct pixel values of a mask, sorted ascending.
pub fn distinct_codes(mask: &Array2<u16>) -> Vec<u16> {
    let mut codes: HashSet<u16> = HashSet::new();
    for &value in mask.iter() {
        codes.insert(value);
    }
    let mut code_vec: Vec<u16> = codes.into_iter().collect();
    code_vec.sort_unstable();
    code_vec
}

/// Replace every raw class code in a mask with its bucket index.
///
/// The distinct codes present are enumerated once and resolved once; each
/// then gets one bulk masked assignment over the array. A patch mask holds
/// few distinct codes relative to its pixel count, so this stays linear in
/// the pixel count with a tiny constant. Any unknown code fails the whole
/// mask before the output is touched.
pub fn remap_mask(mask: &Array2<u16>, level: CorineLevel) -> Result<Array2<u8>> {
    let codes = distinct_codes(mask);
    let mut table: Vec<(u16, u8)> = Vec::with_capacity(codes.len());
    for code in codes {
        table.push((code, bucket(code, level)?));
    }

    let mut out = Array2::<u8>::zeros(mask.raw_dim());
    for (code, index) in table {
        Zip::from(&mut out).and(mask).for_each(|o, &v| {
            if v == code {
                *o = index;
            }
        });
    }
    Ok(out)
}
