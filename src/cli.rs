use crate::convert::MaskDepth;
use crate::corine::CorineLevel;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bigearthnet-prep")]
#[command(about = "Convert BigEarthNet v2 Sentinel-2 tiles to PNG patches and collect class statistics")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert B04/B03/B02 band triplets to 8-bit RGB PNG patches
    Images {
        /// Dataset root containing tile directories
        #[arg(short, long, value_name = "DIR")]
        root: PathBuf,

        /// Index of the first tile to process
        #[arg(long, value_name = "N", default_value_t = 0)]
        start: usize,

        /// Index one past the last tile to process (default: all tiles)
        #[arg(long, value_name = "N")]
        end: Option<usize>,

        /// Bundle the produced PNG files into this zip archive
        #[arg(long, value_name = "FILE")]
        zip: Option<PathBuf>,
    },

    /// Convert reference-map masks to single-band PNG, codes unchanged
    Masks {
        /// Dataset root containing tile directories
        #[arg(short, long, value_name = "DIR")]
        root: PathBuf,

        /// Index of the first tile to process
        #[arg(long, value_name = "N", default_value_t = 0)]
        start: usize,

        /// Index one past the last tile to process (default: all tiles)
        #[arg(long, value_name = "N")]
        end: Option<usize>,

        /// Output bit depth for mask pixels
        #[arg(long, value_enum, default_value_t = MaskDepthArg::Sixteen)]
        depth: MaskDepthArg,

        /// Bundle the produced PNG files into this zip archive
        #[arg(long, value_name = "FILE")]
        zip: Option<PathBuf>,
    },

    /// Remap mask rasters from Corine2018 codes to dense bucket indices
    Remap {
        /// Directory of source mask files (flat)
        #[arg(short, long, value_name = "DIR")]
        source: PathBuf,

        /// Directory for the remapped masks (created if missing)
        #[arg(short, long, value_name = "DIR")]
        target: PathBuf,

        /// Remap granularity
        #[arg(long, value_enum, default_value_t = LevelArg::L3)]
        level: LevelArg,

        /// Bundle the produced PNG files into this zip archive
        #[arg(long, value_name = "FILE")]
        zip: Option<PathBuf>,
    },

    /// Count how many patches contain each Corine2018 class
    Stats {
        /// Root of the reference-map tree
        #[arg(short, long, value_name = "DIR")]
        root: PathBuf,

        /// Index of the first tile to process
        #[arg(long, value_name = "N", default_value_t = 0)]
        start: usize,

        /// Index one past the last tile to process (default: all tiles)
        #[arg(long, value_name = "N")]
        end: Option<usize>,

        /// Statistics output file (one count per line, line i = bucket i)
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum MaskDepthArg {
    /// Truncate codes to the low byte
    #[value(name = "8")]
    Eight,
    /// Keep raw code values
    #[value(name = "16")]
    Sixteen,
}

impl From<MaskDepthArg> for MaskDepth {
    fn from(arg: MaskDepthArg) -> Self {
        match arg {
            MaskDepthArg::Eight => MaskDepth::Eight,
            MaskDepthArg::Sixteen => MaskDepth::Sixteen,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LevelArg {
    /// 45 fine-grained classes
    L3,
    /// 6 macro-categories
    L1,
}

impl From<LevelArg> for CorineLevel {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::L3 => CorineLevel::L3,
            LevelArg::L1 => CorineLevel::L1,
        }
    }
}
