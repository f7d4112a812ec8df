//! # Config Crate
//!
//! Centralized configuration constants for the contribution relief pipeline.
//! Every physical dimension of the printed model (base plate, day cells,
//! labels) and every numeric tolerance used by geometry and export code is
//! defined here so the crates downstream stay free of magic numbers.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{ModelConfig, CUBE_SIZE, MAX_HEIGHT};
//!
//! let config = ModelConfig::default();
//! assert_eq!(config.cell_size, CUBE_SIZE);
//! assert_eq!(config.max_height, MAX_HEIGHT);
//! assert!(config.cell_size < config.max_height);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Fixed, not user-exposed**: Run parameters live in the CLI, dimensions live here
//! - **Model units**: All lengths are in the model's native unit (meters at print scale)

pub mod constants;
