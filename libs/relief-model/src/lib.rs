//! # Relief Model
//!
//! Turns a year of contribution counts into an oriented, printable relief.
//!
//! ## Architecture
//!
//! ```text
//! ContributionDataset → Normalizer → layout_grid → build_bars ─┐
//!                                    generate_labels ──────────┼─▶ assemble → CompositeModel
//!                                    base plate ───────────────┘
//! ```
//!
//! [`Session`] drives the stages for one [`LoadRequest`], awaiting the
//! dataset and asset sources in between and dropping runs that a newer
//! request has overtaken.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::ModelConfig;
//! use relief_model::{
//!     assemble, build_bars, layout_grid, procedural_base, ContributionDataset,
//!     ContributionWeek, HeightPolicy, Normalizer,
//! };
//! use relief_mesh::TriangleSource;
//!
//! let config = ModelConfig::default();
//! let dataset = ContributionDataset {
//!     username: "octocat".into(),
//!     year: 2024,
//!     weeks: vec![ContributionWeek::from_counts(&[0, 3, 7])],
//!     min: 0,
//!     max: 7,
//!     ..Default::default()
//! };
//! dataset.validate().unwrap();
//!
//! let normalizer = Normalizer::new(HeightPolicy::Percentile, &dataset, &config).unwrap();
//! let cells = layout_grid(&dataset.weeks, &normalizer, &config).unwrap();
//! let bars = build_bars(&cells).unwrap();
//! let model = assemble(procedural_base(&config).unwrap(), bars, None).unwrap();
//! assert_eq!(model.triangle_count(), 12 * 4);
//! ```

pub mod assembler;
pub mod dataset;
pub mod error;
pub mod labels;
pub mod layout;
pub mod normalizer;
pub mod session;

pub use assembler::{assemble, procedural_base, CompositeModel};
pub use dataset::{ContributionDataset, ContributionDay, ContributionWeek};
pub use error::{AssetKind, ModelError};
pub use labels::{generate_labels, TextOutline, TrueTypeFont, Typeface};
pub use layout::{build_bars, layout_grid, GridCell};
pub use normalizer::{HeightPolicy, Normalizer};
pub use session::{
    AssetSource, DatasetSource, LoadRequest, LoadedModel, PipelineContext, RunTicket, Session,
};
