//! End-to-end tests over small GDAL-written GeoTIFF fixtures.

use bigearthnet_prep::convert::{self, MaskDepth, Outcome};
use bigearthnet_prep::corine::{l3_bucket, CorineLevel, NUM_L3_BUCKETS};
use bigearthnet_prep::error::PrepError;
use bigearthnet_prep::{pipeline, stats};
use gdal::raster::Buffer;
use gdal::DriverManager;
use ndarray::{arr2, Array2};
use std::fs;
use std::path::{Path, PathBuf};

const PATCH_A: &str = "S2A_MSIL2A_20170617T113321_N9999_R080_T29UNB_53_45";
const PATCH_B: &str = "S2A_MSIL2A_20170617T113321_N9999_R080_T29UNB_53_46";
const PATCH_C: &str = "S2A_MSIL2A_20170617T113321_N9999_R080_T29UNB_54_00";

fn write_tiff(path: &Path, data: &Array2<u16>) {
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let (height, width) = data.dim();
    let mut dataset = driver
        .create_with_band_type::<u16, _>(path, width, height, 1)
        .unwrap();
    let mut band = dataset.rasterband(1).unwrap();
    let mut buffer = Buffer::new((width, height), data.as_slice().unwrap().to_vec());
    band.write((0, 0), (width, height), &mut buffer).unwrap();
}

fn gradient(offset: u16) -> Array2<u16> {
    Array2::from_shape_fn((4, 4), |(r, c)| offset + (r * 4 + c) as u16 * 100)
}

/// Create `root/{tile}/{patch}/` with three band files, returning the paths
/// ordered B04, B03, B02.
fn band_fixture(root: &Path, tile: &str, patch: &str) -> [PathBuf; 3] {
    let patch_dir = root.join(tile).join(patch);
    fs::create_dir_all(&patch_dir).unwrap();
    let mut ordered = Vec::new();
    for (i, band) in ["B04", "B03", "B02"].iter().enumerate() {
        let path = patch_dir.join(format!("{}_{}.tif", patch, band));
        write_tiff(&path, &gradient(1000 + i as u16 * 37));
        ordered.push(path);
    }
    [ordered[0].clone(), ordered[1].clone(), ordered[2].clone()]
}

fn mask_fixture(root: &Path, tile: &str, patch: &str, data: &Array2<u16>) -> PathBuf {
    let patch_dir = root.join(tile).join(patch);
    fs::create_dir_all(&patch_dir).unwrap();
    let path = patch_dir.join(format!("{}_reference_map.tif", patch));
    write_tiff(&path, data);
    path
}

#[test]
fn convert_image_creates_png_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let bands = band_fixture(dir.path(), "tile", PATCH_A);
    let target = dir.path().join("patch.png");

    assert_eq!(
        convert::convert_image(&bands, &target).unwrap(),
        Outcome::Created
    );
    let png = image::open(&target).unwrap().to_rgb8();
    assert_eq!((png.width(), png.height()), (4, 4));
    // each plane was stretched to its own full range
    let reds: Vec<u8> = png.pixels().map(|p| p.0[0]).collect();
    assert_eq!(reds.iter().copied().min(), Some(0));
    assert_eq!(reds.iter().copied().max(), Some(255));

    // second call performs no I/O and leaves the file byte-identical
    let bytes_before = fs::read(&target).unwrap();
    assert_eq!(
        convert::convert_image(&bands, &target).unwrap(),
        Outcome::AlreadyExists
    );
    assert_eq!(fs::read(&target).unwrap(), bytes_before);
}

#[test]
fn convert_image_rejects_mismatched_band_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let mut bands = band_fixture(dir.path(), "tile", PATCH_A);
    let odd = dir.path().join("odd.tif");
    write_tiff(&odd, &Array2::from_shape_fn((3, 5), |(r, c)| (r + c) as u16));
    bands[1] = odd;

    let target = dir.path().join("patch.png");
    assert!(matches!(
        convert::convert_image(&bands, &target),
        Err(PrepError::DimensionMismatch { .. })
    ));
    assert!(!target.exists());
}

#[test]
fn convert_mask_sixteen_bit_preserves_codes() {
    let dir = tempfile::tempdir().unwrap();
    let mask = arr2(&[[111u16, 311], [999, 111]]);
    let source = mask_fixture(dir.path(), "tile", PATCH_A, &mask);
    let target = dir.path().join("mask.png");

    assert_eq!(
        convert::convert_mask(&source, &target, MaskDepth::Sixteen).unwrap(),
        Outcome::Created
    );
    let png = image::open(&target).unwrap().to_luma16();
    assert_eq!(png.get_pixel(0, 0).0[0], 111);
    assert_eq!(png.get_pixel(1, 0).0[0], 311);
    assert_eq!(png.get_pixel(0, 1).0[0], 999);

    assert_eq!(
        convert::convert_mask(&source, &target, MaskDepth::Sixteen).unwrap(),
        Outcome::AlreadyExists
    );
}

#[test]
fn convert_mask_remapped_writes_bucket_indices() {
    let dir = tempfile::tempdir().unwrap();
    let mask = arr2(&[[111u16, 311], [999, 111]]);
    let source = mask_fixture(dir.path(), "tile", PATCH_A, &mask);

    let l3_target = dir.path().join("mask_l3.png");
    convert::convert_mask_remapped(&source, &l3_target, CorineLevel::L3).unwrap();
    let png = image::open(&l3_target).unwrap().to_luma8();
    assert_eq!(png.get_pixel(0, 0).0[0], 1);
    assert_eq!(png.get_pixel(1, 0).0[0], 23);
    assert_eq!(png.get_pixel(0, 1).0[0], 45);
    assert_eq!(png.get_pixel(1, 1).0[0], 1);

    let l1_target = dir.path().join("mask_l1.png");
    convert::convert_mask_remapped(&source, &l1_target, CorineLevel::L1).unwrap();
    let png = image::open(&l1_target).unwrap().to_luma8();
    assert_eq!(png.get_pixel(0, 0).0[0], 1);
    assert_eq!(png.get_pixel(1, 0).0[0], 3);
    assert_eq!(png.get_pixel(0, 1).0[0], 6);
}

#[test]
fn image_pipeline_converts_and_then_skips() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("images");
    band_fixture(&root, "tileA", PATCH_A);
    band_fixture(&root, "tileA", PATCH_B);
    band_fixture(&root, "tileB", PATCH_C);

    let summary = pipeline::convert_images(&root, 0, None).unwrap();
    assert_eq!(summary.created, 3);
    assert_eq!(summary.skipped, 0);
    assert!(summary.failed.is_empty());
    assert_eq!(summary.outputs.len(), 3);
    for output in &summary.outputs {
        assert!(output.exists());
    }

    // rerun: everything already exists, outputs still reported
    let rerun = pipeline::convert_images(&root, 0, None).unwrap();
    assert_eq!(rerun.created, 0);
    assert_eq!(rerun.skipped, 3);
    assert_eq!(rerun.outputs.len(), 3);
}

#[test]
fn image_pipeline_continues_past_a_broken_patch() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("images");
    band_fixture(&root, "tileA", PATCH_A);
    // PATCH_B has only one band
    let broken_dir = root.join("tileA").join(PATCH_B);
    fs::create_dir_all(&broken_dir).unwrap();
    write_tiff(
        &broken_dir.join(format!("{}_B02.tif", PATCH_B)),
        &gradient(0),
    );

    let summary = pipeline::convert_images(&root, 0, None).unwrap();
    assert_eq!(summary.created, 1);
    assert_eq!(summary.failed.len(), 1);
    assert!(matches!(
        summary.failed[0].1,
        PrepError::IncompleteBandSet(_, 1)
    ));
}

#[test]
fn statistics_count_mask_presence_not_pixels() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("Reference_Maps");
    // tile A: one patch containing only 111
    mask_fixture(&root, "tileA", PATCH_A, &arr2(&[[111u16, 111], [111, 111]]));
    // tile B: one patch with {111, 211}, one with {211}
    mask_fixture(&root, "tileB", PATCH_B, &arr2(&[[111u16, 211], [211, 211]]));
    mask_fixture(&root, "tileB", PATCH_C, &arr2(&[[211u16, 211], [211, 211]]));

    let run = stats::collect_statistics(&root, 0, None).unwrap();
    assert_eq!(run.masks_read, 3);
    assert!(run.failed.is_empty());
    assert_eq!(run.counts.get(l3_bucket(111).unwrap()), 2);
    assert_eq!(run.counts.get(l3_bucket(211).unwrap()), 2);
    assert_eq!(run.counts.get(l3_bucket(999).unwrap()), 0);

    let stats_path = dir.path().join("statistics.txt");
    stats::save_statistics(&run.counts, &stats_path).unwrap();
    let text = fs::read_to_string(&stats_path).unwrap();
    assert_eq!(text.lines().count(), NUM_L3_BUCKETS);
    assert_eq!(text.lines().next(), Some("2")); // bucket 1 = code 111
}

#[test]
fn statistics_skip_masks_with_unknown_codes() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("Reference_Maps");
    mask_fixture(&root, "tileA", PATCH_A, &arr2(&[[111u16, 111]]));
    mask_fixture(&root, "tileA", PATCH_B, &arr2(&[[111u16, 998]]));

    let run = stats::collect_statistics(&root, 0, None).unwrap();
    assert_eq!(run.masks_read, 1);
    assert_eq!(run.failed.len(), 1);
    assert!(matches!(run.failed[0].1, PrepError::UnknownClassCode(998)));
    // the broken mask contributed nothing
    assert_eq!(run.counts.get(l3_bucket(111).unwrap()), 1);
}

#[test]
fn remap_pipeline_over_flat_directory_of_mask_pngs() {
    let dir = tempfile::tempdir().unwrap();

    // stage 1 output: raw 16-bit mask PNGs in a flat folder
    let source = dir.path().join("masks");
    fs::create_dir_all(&source).unwrap();
    let t1 = mask_fixture(dir.path(), "tiffs", PATCH_A, &arr2(&[[111u16, 311], [999, 111]]));
    let t2 = mask_fixture(dir.path(), "tiffs", PATCH_B, &arr2(&[[211u16, 211]]));
    convert::convert_mask(&t1, &source.join("m1.png"), MaskDepth::Sixteen).unwrap();
    convert::convert_mask(&t2, &source.join("m2.png"), MaskDepth::Sixteen).unwrap();
    fs::write(source.join("ignored.txt"), b"not a mask").unwrap();

    let target = dir.path().join("nc_masks");
    let summary = pipeline::remap_masks(&source, &target, CorineLevel::L3).unwrap();
    assert_eq!(summary.created, 2);
    assert!(summary.failed.is_empty());
    assert!(target.join("m1.png").exists());
    assert!(target.join("m2.png").exists());

    let png = image::open(target.join("m2.png")).unwrap().to_luma8();
    assert_eq!(png.get_pixel(0, 0).0[0], 12); // 211 is the 12th code

    // rerun is a no-op
    let rerun = pipeline::remap_masks(&source, &target, CorineLevel::L3).unwrap();
    assert_eq!(rerun.created, 0);
    assert_eq!(rerun.skipped, 2);
}
