//! Command-line arguments.

use clap::{Parser, ValueEnum};
use relief_export::ExportFormat;
use relief_model::HeightPolicy;
use std::path::PathBuf;

/// Turn a year of contributions into a printable STL relief.
#[derive(Debug, Clone, Parser)]
#[command(name = "contrib-relief", version)]
pub struct Args {
    /// Contribution dataset JSON
    #[arg(long)]
    pub dataset: PathBuf,

    /// Identity shown on the left label; also names the output files
    #[arg(short, long, value_parser = parse_identity)]
    pub user: String,

    /// Year shown on the right label
    #[arg(short, long)]
    pub year: i32,

    /// TrueType/OpenType font for the labels; labels are left out without it
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Pre-built base plate STL in layout coordinates (Z up)
    #[arg(long)]
    pub base: Option<PathBuf>,

    /// Height mapping: percentile or logarithmic
    #[arg(long, default_value_t = HeightPolicy::Percentile)]
    pub policy: HeightPolicy,

    /// STL encoding to write
    #[arg(long, value_enum, default_value_t = OutputMode::Both)]
    pub format: OutputMode,

    /// Directory the STL files are written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

/// Accepts identities that are safe as a file name component.
pub(crate) fn parse_identity(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("identity must not be blank".to_string());
    }
    if value == "." || value == ".." {
        return Err(format!("`{value}` is not a valid identity"));
    }
    if let Some(ch) = value
        .chars()
        .find(|&ch| matches!(ch, '/' | '\\' | ':') || ch.is_control())
    {
        return Err(format!("identity must not contain {ch:?}"));
    }
    Ok(value.to_string())
}

/// Which encodings to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Ascii,
    Binary,
    Both,
}

impl OutputMode {
    /// Encodings and file names for `stem`. When both are written the ASCII
    /// file gets an `.ascii.stl` suffix so the two do not collide.
    pub fn targets(self, stem: &str) -> Vec<(ExportFormat, String)> {
        match self {
            OutputMode::Ascii => vec![(ExportFormat::Ascii, format!("{stem}.stl"))],
            OutputMode::Binary => vec![(ExportFormat::Binary, format!("{stem}.stl"))],
            OutputMode::Both => vec![
                (ExportFormat::Binary, format!("{stem}.stl")),
                (ExportFormat::Ascii, format!("{stem}.ascii.stl")),
            ],
        }
    }
}
