//! # Session
//!
//! Drives one pipeline run per load request:
//!
//! ```text
//! fetch dataset ─▶ validate ─▶ load base ─▶ load font ─▶ normalize ─▶ layout ─▶ labels ─▶ assemble
//!      (await)                   (await)      (await)
//! ```
//!
//! Every run gets a fresh [`PipelineContext`]; nothing is shared between runs
//! except the session's generation counter. Starting a run supersedes any
//! run still in flight: after each await the older run notices and fails
//! with [`ModelError::Superseded`] instead of returning a stale model.

use crate::assembler::{assemble, CompositeModel};
use crate::dataset::ContributionDataset;
use crate::error::ModelError;
use crate::labels::{generate_labels, Typeface};
use crate::layout::{build_bars, layout_grid, GridCell};
use crate::normalizer::{HeightPolicy, Normalizer};
use async_trait::async_trait;
use config::constants::ModelConfig;
use relief_mesh::{SceneGroup, SceneNode};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Parameters of one load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Account whose activity is rendered
    pub identity: String,
    /// Calendar year
    pub year: i32,
    /// Height mapping policy
    pub policy: HeightPolicy,
}

impl LoadRequest {
    /// Creates a request with the default policy.
    pub fn new(identity: impl Into<String>, year: i32) -> Self {
        Self {
            identity: identity.into(),
            year,
            policy: HeightPolicy::default(),
        }
    }

    /// Selects the height policy.
    pub fn with_policy(mut self, policy: HeightPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// `<identity>-<year>`, the export file stem.
    pub fn file_stem(&self) -> String {
        format!("{}-{}", self.identity, self.year)
    }
}

/// Supplies contribution datasets.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetches the dataset for `identity` and `year`.
    ///
    /// Transport problems are reported as [`ModelError::NetworkFailure`].
    async fn fetch(&self, identity: &str, year: i32) -> Result<ContributionDataset, ModelError>;
}

/// Supplies the font and base plate assets.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Loads the label font.
    async fn load_font(&self) -> Result<Arc<dyn Typeface>, ModelError>;

    /// Loads the base plate as a traversable node.
    async fn load_base(&self) -> Result<SceneNode, ModelError>;
}

/// Everything one run needs, threaded through the synchronous stages.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    request: LoadRequest,
    config: ModelConfig,
    dataset: ContributionDataset,
}

impl PipelineContext {
    /// Attaches the request identity to `dataset` and validates it.
    pub fn new(
        request: LoadRequest,
        config: ModelConfig,
        dataset: ContributionDataset,
    ) -> Result<Self, ModelError> {
        let dataset = dataset.with_identity(request.identity.clone(), request.year);
        dataset.validate()?;
        info!(
            weeks = dataset.weeks.len(),
            days = dataset.day_count(),
            min = dataset.min,
            max = dataset.max,
            total = dataset.summed_total(),
            "dataset validated"
        );
        Ok(Self {
            request,
            config,
            dataset,
        })
    }

    pub fn request(&self) -> &LoadRequest {
        &self.request
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn dataset(&self) -> &ContributionDataset {
        &self.dataset
    }

    /// Height map for this run's dataset and policy.
    pub fn normalizer(&self) -> Result<Normalizer, ModelError> {
        Normalizer::new(self.request.policy, &self.dataset, &self.config)
    }

    /// Positioned bars for every day.
    pub fn layout(&self) -> Result<Vec<GridCell>, ModelError> {
        let cells = layout_grid(&self.dataset.weeks, &self.normalizer()?, &self.config)?;
        info!(cells = cells.len(), "layout produced");
        Ok(cells)
    }

    /// Identity and year labels.
    pub fn labels(&self, typeface: &dyn Typeface) -> Result<SceneGroup, ModelError> {
        generate_labels(
            typeface,
            &self.request.identity,
            &self.request.year.to_string(),
            &self.config,
        )
    }

    /// Runs the synchronous stages and assembles the model.
    ///
    /// Without a typeface, or when label generation fails, the model is
    /// built without labels.
    pub fn build(
        self,
        base: SceneNode,
        typeface: Option<&dyn Typeface>,
    ) -> Result<LoadedModel, ModelError> {
        let cells = self.layout()?;
        let bars = build_bars(&cells)?;

        let mut label_error = None;
        let labels = match typeface.map(|face| self.labels(face)) {
            Some(Ok(labels)) => Some(labels),
            Some(Err(err)) if !err.is_fatal() => {
                warn!(error = %err, "labels omitted");
                label_error = Some(err);
                None
            }
            Some(Err(err)) => return Err(err),
            None => None,
        };

        let model = assemble(base, bars, labels)?;
        Ok(LoadedModel {
            request: self.request,
            model,
            label_error,
        })
    }
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    request: LoadRequest,
    model: CompositeModel,
    label_error: Option<ModelError>,
}

impl LoadedModel {
    pub fn request(&self) -> &LoadRequest {
        &self.request
    }

    pub fn model(&self) -> &CompositeModel {
        &self.model
    }

    /// Why labels are missing, if they are.
    pub fn label_error(&self) -> Option<&ModelError> {
        self.label_error.as_ref()
    }

    /// `<identity>-<year>`, the export file stem.
    pub fn file_stem(&self) -> String {
        self.request.file_stem()
    }
}

/// Proof of which run is current.
#[derive(Debug)]
pub struct RunTicket<'a> {
    run: u64,
    generation: &'a AtomicU64,
}

impl RunTicket<'_> {
    /// This run's number.
    pub fn run(&self) -> u64 {
        self.run
    }

    /// Returns true while no newer run has started.
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::Acquire) == self.run
    }

    /// Fails with [`ModelError::Superseded`] once a newer run has started.
    pub fn check(&self) -> Result<(), ModelError> {
        let current = self.generation.load(Ordering::Acquire);
        if current == self.run {
            Ok(())
        } else {
            Err(ModelError::Superseded {
                run: self.run,
                current,
            })
        }
    }
}

/// Owns the collaborators and hands out runs.
pub struct Session {
    datasets: Arc<dyn DatasetSource>,
    assets: Arc<dyn AssetSource>,
    config: ModelConfig,
    generation: AtomicU64,
}

impl Session {
    /// Creates a session, validating the model dimensions.
    pub fn new(
        datasets: Arc<dyn DatasetSource>,
        assets: Arc<dyn AssetSource>,
        config: ModelConfig,
    ) -> Result<Self, ModelError> {
        Ok(Self {
            datasets,
            assets,
            config: config.validate()?,
            generation: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Starts a new run, superseding every earlier one.
    pub fn begin_run(&self) -> RunTicket<'_> {
        let run = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        RunTicket {
            run,
            generation: &self.generation,
        }
    }

    /// Fetches, builds and assembles the model for `request`.
    ///
    /// # Errors
    ///
    /// Dataset, network and base model failures end the run. A font failure
    /// only drops the labels. A newer run started meanwhile turns this one
    /// into [`ModelError::Superseded`].
    #[instrument(skip_all, fields(identity = %request.identity, year = request.year))]
    pub async fn run(&self, request: LoadRequest) -> Result<LoadedModel, ModelError> {
        let ticket = self.begin_run();

        let dataset = self.datasets.fetch(&request.identity, request.year).await?;
        ticket.check()?;
        let context = PipelineContext::new(request, self.config, dataset)?;

        let base = self.assets.load_base().await?;
        ticket.check()?;

        let (typeface, font_error) = match self.assets.load_font().await {
            Ok(face) => (Some(face), None),
            Err(err) if !err.is_fatal() => {
                warn!(error = %err, "font unavailable, labels omitted");
                (None, Some(err))
            }
            Err(err) => return Err(err),
        };
        ticket.check()?;

        let mut loaded = context.build(base, typeface.as_deref())?;
        if loaded.label_error.is_none() {
            loaded.label_error = font_error;
        }
        info!(run = ticket.run(), stem = %loaded.file_stem(), "run complete");
        Ok(loaded)
    }
}
