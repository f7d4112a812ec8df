//! Shared fixtures for the pipeline and session tests.

#![allow(dead_code)]

use async_trait::async_trait;
use config::constants::ModelConfig;
use glam::DVec2;
use relief_mesh::SceneNode;
use relief_model::{
    procedural_base, AssetKind, AssetSource, ContributionDataset, ContributionWeek, DatasetSource,
    ModelError, TextOutline, Typeface,
};
use std::sync::Arc;
use tokio::sync::Notify;

/// One rectangle per non-space character.
pub struct BlockFace;

impl Typeface for BlockFace {
    fn outline(&self, text: &str, size: f64) -> Result<TextOutline, ModelError> {
        let mut outline = TextOutline::default();
        for (index, ch) in text.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let x = index as f64 * 0.7 * size;
            outline.contours.push(vec![
                DVec2::new(x, 0.0),
                DVec2::new(x, 0.7 * size),
                DVec2::new(x + 0.6 * size, 0.7 * size),
                DVec2::new(x + 0.6 * size, 0.0),
            ]);
        }
        outline.advance = text.chars().count() as f64 * 0.7 * size;
        Ok(outline)
    }
}

/// A year of synthetic activity: 53 weeks, short first and last weeks.
pub fn sample_dataset() -> ContributionDataset {
    let mut weeks = vec![ContributionWeek::from_counts(&[0, 0, 1])];
    for w in 0..51 {
        let counts: Vec<i64> = (0..7).map(|d| (w * 7 + d) % 13).collect();
        weeks.push(ContributionWeek::from_counts(&counts));
    }
    weeks.push(ContributionWeek::from_counts(&[40, 2, 0, 0, 5]));
    ContributionDataset {
        weeks,
        min: 0,
        max: 40,
        p99: Some(12.0),
        ..Default::default()
    }
}

pub fn empty_dataset() -> ContributionDataset {
    ContributionDataset::default()
}

/// Returns the same dataset for every request.
pub struct FixedDatasets(pub ContributionDataset);

#[async_trait]
impl DatasetSource for FixedDatasets {
    async fn fetch(&self, _identity: &str, _year: i32) -> Result<ContributionDataset, ModelError> {
        Ok(self.0.clone())
    }
}

/// Always fails as if the service were unreachable.
pub struct OfflineDatasets;

#[async_trait]
impl DatasetSource for OfflineDatasets {
    async fn fetch(&self, _identity: &str, _year: i32) -> Result<ContributionDataset, ModelError> {
        Err(ModelError::network("HTTP 503"))
    }
}

/// Holds requests for `slow_identity` until `release` is notified.
pub struct GatedDatasets {
    pub slow_identity: String,
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
    pub dataset: ContributionDataset,
}

#[async_trait]
impl DatasetSource for GatedDatasets {
    async fn fetch(&self, identity: &str, _year: i32) -> Result<ContributionDataset, ModelError> {
        if identity == self.slow_identity {
            self.started.notify_one();
            self.release.notified().await;
        }
        Ok(self.dataset.clone())
    }
}

/// Procedural base and the block typeface, each optionally broken.
pub struct TestAssets {
    pub font_ok: bool,
    pub base_ok: bool,
}

impl TestAssets {
    pub fn healthy() -> Self {
        Self {
            font_ok: true,
            base_ok: true,
        }
    }
}

#[async_trait]
impl AssetSource for TestAssets {
    async fn load_font(&self) -> Result<Arc<dyn Typeface>, ModelError> {
        if self.font_ok {
            Ok(Arc::new(BlockFace))
        } else {
            Err(ModelError::asset(AssetKind::Font, "font.ttf not found"))
        }
    }

    async fn load_base(&self) -> Result<SceneNode, ModelError> {
        if self.base_ok {
            procedural_base(&ModelConfig::default())
        } else {
            Err(ModelError::asset(AssetKind::BaseModel, "base.stl not found"))
        }
    }
}
