//! File-backed dataset and asset sources.

use async_trait::async_trait;
use config::constants::ModelConfig;
use relief_export::{facets_to_mesh, read_stl};
use relief_mesh::SceneNode;
use relief_model::{
    procedural_base, AssetKind, AssetSource, ContributionDataset, DatasetSource, ModelError,
    TrueTypeFont, Typeface,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Reads the dataset JSON from one file, whatever identity is requested.
#[derive(Debug, Clone)]
pub struct FileDatasets {
    path: PathBuf,
}

impl FileDatasets {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileDatasets {
    async fn fetch(&self, identity: &str, year: i32) -> Result<ContributionDataset, ModelError> {
        debug!(path = %self.path.display(), identity, year, "reading dataset");
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| ModelError::network(format!("{}: {err}", self.path.display())))?;
        ContributionDataset::from_json(&json)
    }
}

/// Font and base plate from disk; the base falls back to the procedural
/// plate when no file is given.
#[derive(Debug, Clone)]
pub struct FileAssets {
    font: Option<PathBuf>,
    base: Option<PathBuf>,
    config: ModelConfig,
}

impl FileAssets {
    pub fn new(font: Option<PathBuf>, base: Option<PathBuf>, config: ModelConfig) -> Self {
        Self { font, base, config }
    }
}

#[async_trait]
impl AssetSource for FileAssets {
    async fn load_font(&self) -> Result<Arc<dyn Typeface>, ModelError> {
        let path = self
            .font
            .as_ref()
            .ok_or_else(|| ModelError::asset(AssetKind::Font, "no font given"))?;
        let data = tokio::fs::read(path)
            .await
            .map_err(|err| ModelError::asset(AssetKind::Font, format!("{}: {err}", path.display())))?;
        let font = TrueTypeFont::from_bytes(data)?;
        info!(path = %path.display(), "font loaded");
        Ok(Arc::new(font))
    }

    async fn load_base(&self) -> Result<SceneNode, ModelError> {
        let Some(path) = &self.base else {
            return procedural_base(&self.config);
        };
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            ModelError::asset(AssetKind::BaseModel, format!("{}: {err}", path.display()))
        })?;
        let facets = read_stl(&bytes).map_err(|err| {
            ModelError::asset(AssetKind::BaseModel, format!("{}: {err}", path.display()))
        })?;
        let mesh = facets_to_mesh(&facets);
        info!(path = %path.display(), triangles = mesh.triangle_count(), "base loaded");
        Ok(SceneNode::mesh("plate", mesh))
    }
}
