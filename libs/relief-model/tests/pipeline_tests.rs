//! End-to-end tests of the synchronous stages.

mod common;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use common::{empty_dataset, sample_dataset, BlockFace};
use config::constants::ModelConfig;
use relief_mesh::TriangleSource;
use relief_model::{procedural_base, HeightPolicy, LoadRequest, PipelineContext};

fn build(dataset: relief_model::ContributionDataset, policy: HeightPolicy) -> relief_model::LoadedModel {
    let config = ModelConfig::default();
    let request = LoadRequest::new("octocat", 2024).with_policy(policy);
    let context = PipelineContext::new(request, config, dataset).unwrap();
    context
        .build(procedural_base(&config).unwrap(), Some(&BlockFace))
        .unwrap()
}

#[test]
fn test_full_year_percentile() {
    let dataset = sample_dataset();
    let days = dataset.day_count();
    let loaded = build(dataset, HeightPolicy::Percentile);
    let model = loaded.model();

    assert_eq!(model.bar_count(), days);
    assert!(model.has_labels());
    assert!(loaded.label_error().is_none());
    assert_eq!(loaded.file_stem(), "octocat-2024");

    let bars = model.bars().unwrap().world_bounds().unwrap().center();
    assert_abs_diff_eq!(bars.x, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(bars.y, 0.0, epsilon = 1e-12);
}

#[test]
fn test_full_year_fits_on_base() {
    let config = ModelConfig::default();
    let loaded = build(sample_dataset(), HeightPolicy::Logarithmic);
    let model = loaded.model();

    let whole = model.world_bounds().unwrap();
    assert_relative_eq!(whole.size().x, config.base_length, epsilon = 1e-9);
    // Y is up after orientation; the tallest bar reaches the ceiling
    assert_relative_eq!(whole.max.y, config.base_top() + config.max_height, epsilon = 1e-9);
}

#[test]
fn test_empty_dataset_gives_base_and_labels() {
    let loaded = build(empty_dataset(), HeightPolicy::Percentile);
    let model = loaded.model();

    assert_eq!(model.bar_count(), 0);
    assert!(model.has_labels());
    let base_triangles = model.base().unwrap().triangle_count();
    let label_triangles = model.labels().unwrap().triangle_count();
    assert_eq!(model.triangle_count(), base_triangles + label_triangles);
    assert!(base_triangles > 0);
}

#[test]
fn test_missing_typeface_omits_labels() {
    let config = ModelConfig::default();
    let context =
        PipelineContext::new(LoadRequest::new("nat", 2020), config, sample_dataset()).unwrap();
    let loaded = context.build(procedural_base(&config).unwrap(), None).unwrap();
    assert!(!loaded.model().has_labels());
}
