//! # contrib-relief
//!
//! Glue between the filesystem and the relief pipeline: file-backed sources
//! feed a [`Session`], and the finished model is written out as STL.

pub mod args;
pub mod sources;

pub use args::{Args, OutputMode};
pub use sources::{FileAssets, FileDatasets};

use anyhow::Context;
use config::constants::ModelConfig;
use relief_export::export;
use relief_model::{LoadRequest, Session};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Builds the relief described by `args` and writes the requested STL
/// files, returning their paths.
pub async fn run(args: Args) -> anyhow::Result<Vec<PathBuf>> {
    args::parse_identity(&args.user).map_err(anyhow::Error::msg)?;
    let config = ModelConfig::default();
    let session = Session::new(
        Arc::new(FileDatasets::new(&args.dataset)),
        Arc::new(FileAssets::new(args.font.clone(), args.base.clone(), config)),
        config,
    )?;

    let request = LoadRequest::new(&args.user, args.year).with_policy(args.policy);
    let stem = request.file_stem();
    let loaded = session
        .run(request)
        .await
        .with_context(|| format!("building relief {stem}"))?;

    tokio::fs::create_dir_all(&args.out_dir)
        .await
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let mut written = Vec::new();
    for (format, file_name) in args.format.targets(&stem) {
        let buffer = export(loaded.model(), &stem, format);
        let path = args.out_dir.join(file_name);
        tokio::fs::write(&path, buffer.as_bytes())
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), %format, "saved");
        written.push(path);
    }
    Ok(written)
}
