//! # Configuration Constants
//!
//! Centralized constants for the relief pipeline. Physical dimensions,
//! height-mapping fractions, label placement and export precision are all
//! defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Base Plate**: Plinth footprint and the angle of its labelled face
//! - **Grid**: Day cell footprint and maximum bar height
//! - **Labels**: Font size, extrusion depth and placement
//! - **Export**: STL layout and text precision

use thiserror::Error;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Smallest triangle area that still counts as a real facet.
///
/// Model coordinates are fractions of a meter, so the smallest legitimate
/// glyph facets are around 1e-8 square units. Anything below this threshold
/// is a sliver the exporter skips.
///
/// # Example
///
/// ```rust
/// use config::constants::DEGENERATE_AREA_EPSILON;
///
/// let sliver_area = 1e-20;
/// assert!(sliver_area < DEGENERATE_AREA_EPSILON);
/// ```
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-14;

/// Scaling factor for converting f64 coordinates to i64 weld keys.
///
/// Used when smoothing normals: positions that round to the same integer
/// key after scaling are treated as one shared vertex.
///
/// # Example
///
/// ```rust
/// use config::constants::WELD_SCALE;
///
/// fn weld_key(value: f64) -> i64 {
///     (value * WELD_SCALE).round() as i64
/// }
///
/// assert_eq!(weld_key(0.1), weld_key(0.1 + 1e-12));
/// ```
pub const WELD_SCALE: f64 = 1e9;

// =============================================================================
// BASE PLATE CONSTANTS
// =============================================================================

/// Length of the base plate along X (the timeline axis).
///
/// # Example
///
/// ```rust
/// use config::constants::{BASE_LENGTH, CUBE_SIZE};
///
/// // A full year of 53 weeks fits on the plate.
/// assert!(53.0 * CUBE_SIZE < BASE_LENGTH);
/// ```
pub const BASE_LENGTH: f64 = 0.834;

/// Depth of the base plate's top surface along Y.
///
/// # Example
///
/// ```rust
/// use config::constants::{BASE_WIDTH, CUBE_SIZE, DAYS_PER_WEEK};
///
/// assert!(DAYS_PER_WEEK as f64 * CUBE_SIZE < BASE_WIDTH);
/// ```
pub const BASE_WIDTH: f64 = 0.167;

/// Thickness of the base plate along Z.
///
/// The plate is centered on Z = 0, so its top surface sits at
/// `BASE_HEIGHT / 2`.
pub const BASE_HEIGHT: f64 = 0.05;

/// Dihedral angle in degrees between the base plate's top surface and its
/// front (labelled) face.
///
/// Values above 90 mean the front face leans outward toward the bottom.
///
/// # Example
///
/// ```rust
/// use config::constants::FACE_ANGLE_DEGREES;
///
/// let lean = FACE_ANGLE_DEGREES - 90.0;
/// assert!(lean > 0.0 && lean < 45.0);
/// ```
pub const FACE_ANGLE_DEGREES: f64 = 104.79;

// =============================================================================
// GRID CONSTANTS
// =============================================================================

/// Footprint edge length of one day cell; also the grid pitch.
///
/// The logarithmic height policy uses this as its floor so that every day is
/// at least a visible cube.
pub const CUBE_SIZE: f64 = 0.0143;

/// Maximum bar height above the base plate.
///
/// # Example
///
/// ```rust
/// use config::constants::{CUBE_SIZE, MAX_HEIGHT};
///
/// assert!(MAX_HEIGHT > CUBE_SIZE);
/// ```
pub const MAX_HEIGHT: f64 = 0.14;

/// Number of rows in the calendar grid.
pub const DAYS_PER_WEEK: usize = 7;

/// Fraction of the height range reserved for the minimum observed count
/// under the percentile policy.
pub const PERCENTILE_FLOOR_FRACTION: f64 = 0.1;

/// Fraction of the height range spanned by counts up to the 99th percentile.
pub const PERCENTILE_BODY_FRACTION: f64 = 0.8;

/// Fraction of the height range left for outliers above the 99th percentile.
///
/// # Example
///
/// ```rust
/// use config::constants::{
///     PERCENTILE_BODY_FRACTION, PERCENTILE_FLOOR_FRACTION, PERCENTILE_OUTLIER_FRACTION,
/// };
///
/// let total = PERCENTILE_FLOOR_FRACTION + PERCENTILE_BODY_FRACTION + PERCENTILE_OUTLIER_FRACTION;
/// assert!((total - 1.0).abs() < 1e-12);
/// ```
pub const PERCENTILE_OUTLIER_FRACTION: f64 = 0.1;

/// Percentile used to clamp outliers when the dataset does not ship one.
pub const OUTLIER_PERCENTILE: f64 = 99.0;

// =============================================================================
// LABEL CONSTANTS
// =============================================================================

/// Cap height of label text.
pub const LABEL_FONT_SIZE: f64 = 0.025;

/// Extrusion depth of label text.
pub const LABEL_DEPTH: f64 = 0.00658;

/// X offset of the identity (username) label from the shared anchor.
pub const NAME_LABEL_OFFSET_X: f64 = -0.295;

/// X offset of the year label from the shared anchor.
pub const YEAR_LABEL_OFFSET_X: f64 = 0.280;

/// Area threshold factor for the side-normal correction.
///
/// Side faces larger than `SIDE_NORMAL_AREA_FACTOR * LABEL_DEPTH * LABEL_FONT_SIZE`
/// are shaded flat.
///
/// # Example
///
/// ```rust
/// use config::constants::{LABEL_DEPTH, LABEL_FONT_SIZE, SIDE_NORMAL_AREA_FACTOR};
///
/// let threshold = SIDE_NORMAL_AREA_FACTOR * LABEL_DEPTH * LABEL_FONT_SIZE;
/// assert!(threshold > 0.0);
/// ```
pub const SIDE_NORMAL_AREA_FACTOR: f64 = 0.1;

/// Curve flattening tolerance for glyph outlines, as a fraction of the
/// font size.
pub const GLYPH_FLATTEN_TOLERANCE: f64 = 0.005;

/// Pen advance for characters the font has no glyph for, as a fraction of
/// the font size.
pub const MISSING_GLYPH_ADVANCE: f64 = 0.5;

// =============================================================================
// EXPORT CONSTANTS
// =============================================================================

/// Digits after the decimal point in ASCII STL numbers.
///
/// Numbers are written in exponent notation, so this yields seven
/// significant digits.
///
/// # Example
///
/// ```rust
/// use config::constants::STL_DECIMAL_PRECISION;
///
/// let text = format!("{:.*e}", STL_DECIMAL_PRECISION, 0.0143_f64);
/// assert_eq!(text, "1.430000e-2");
/// ```
pub const STL_DECIMAL_PRECISION: usize = 6;

/// Size of the free-form binary STL header.
pub const STL_HEADER_LEN: usize = 80;

/// Size of one binary STL triangle record.
///
/// 12 bytes normal, 36 bytes vertices, 2 bytes attribute count.
pub const STL_RECORD_LEN: usize = 50;

/// Prefix written into binary STL headers.
pub const STL_HEADER_TAG: &str = "contrib-relief";

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if two floating-point values are approximately equal.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(0.1 + 0.2, 0.3));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// =============================================================================
// MODEL CONFIG
// =============================================================================

/// Immutable snapshot of the physical model dimensions.
///
/// # Examples
/// ```
/// use config::constants::ModelConfig;
/// let config = ModelConfig::default();
/// assert!(config.base_height > 0.0);
/// assert!(config.face_lean_radians() > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelConfig {
    /// Base plate length along X.
    pub base_length: f64,
    /// Base plate top depth along Y.
    pub base_width: f64,
    /// Base plate thickness along Z.
    pub base_height: f64,
    /// Dihedral angle between top surface and front face, in degrees.
    pub face_angle_degrees: f64,
    /// Day cell footprint and grid pitch.
    pub cell_size: f64,
    /// Maximum bar height.
    pub max_height: f64,
    /// Label cap height.
    pub label_size: f64,
    /// Label extrusion depth.
    pub label_depth: f64,
}

impl ModelConfig {
    /// Checks a configuration, rejecting non-positive dimensions and a
    /// maximum bar height below the visible floor.
    ///
    /// # Examples
    /// ```
    /// use config::constants::{ConfigError, ModelConfig};
    /// let mut config = ModelConfig::default();
    /// config.cell_size = 0.0;
    /// assert_eq!(
    ///     config.validate().unwrap_err(),
    ///     ConfigError::NonPositiveDimension { name: "cell_size", value: 0.0 }
    /// );
    /// ```
    pub fn validate(self) -> Result<Self, ConfigError> {
        let dimensions = [
            ("base_length", self.base_length),
            ("base_width", self.base_width),
            ("base_height", self.base_height),
            ("cell_size", self.cell_size),
            ("max_height", self.max_height),
            ("label_size", self.label_size),
            ("label_depth", self.label_depth),
        ];
        for (name, value) in dimensions {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositiveDimension { name, value });
            }
        }
        if !(90.0..180.0).contains(&self.face_angle_degrees) {
            return Err(ConfigError::InvalidFaceAngle(self.face_angle_degrees));
        }
        if self.max_height < self.cell_size {
            return Err(ConfigError::HeightBelowFloor {
                max_height: self.max_height,
                floor: self.cell_size,
            });
        }
        Ok(self)
    }

    /// Top surface of the base plate; bars stand on this plane.
    #[inline]
    pub fn base_top(&self) -> f64 {
        self.base_height / 2.0
    }

    /// Lean of the front face away from vertical, in radians.
    #[inline]
    pub fn face_lean_radians(&self) -> f64 {
        (self.face_angle_degrees - 90.0).to_radians()
    }

    /// How far the bottom edge of the front face sticks out past the top edge.
    #[inline]
    pub fn face_overhang(&self) -> f64 {
        self.base_height * self.face_lean_radians().tan()
    }

    /// Faces above this area get flat shading after side-normal correction.
    #[inline]
    pub fn side_normal_area_threshold(&self) -> f64 {
        SIDE_NORMAL_AREA_FACTOR * self.label_depth * self.label_size
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_length: BASE_LENGTH,
            base_width: BASE_WIDTH,
            base_height: BASE_HEIGHT,
            face_angle_degrees: FACE_ANGLE_DEGREES,
            cell_size: CUBE_SIZE,
            max_height: MAX_HEIGHT,
            label_size: LABEL_FONT_SIZE,
            label_depth: LABEL_DEPTH,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// Raised when a length is zero, negative or not finite.
    #[error("{name} must be positive: {value}")]
    NonPositiveDimension { name: &'static str, value: f64 },
    /// Raised when the front face angle does not describe an outward lean.
    #[error("face angle must be in [90, 180) degrees: {0}")]
    InvalidFaceAngle(f64),
    /// Raised when the tallest bar would be shorter than the visible floor.
    #[error("max_height {max_height} is below the bar floor {floor}")]
    HeightBelowFloor { max_height: f64, floor: f64 },
}

