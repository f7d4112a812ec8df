//! Font seam for the label generator.
//!
//! A [`Typeface`] turns a string into flattened closed contours. Outer
//! contours run clockwise and holes counter-clockwise in y-up label space,
//! the TrueType convention; [`TextOutline::normalize_orientation`] enforces it
//! for sources that emit the opposite.

use crate::error::{AssetKind, ModelError};
use config::constants::{GLYPH_FLATTEN_TOLERANCE, MISSING_GLYPH_ADVANCE};
use glam::DVec2;
use lyon_tessellation::path::iterator::PathIterator;
use lyon_tessellation::path::{math, Path, PathEvent};
use ttf_parser::{Face, OutlineBuilder};

/// Flattened text outline in label-local units, baseline at `y = 0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextOutline {
    /// Closed contours; the last point connects back to the first
    pub contours: Vec<Vec<DVec2>>,
    /// Pen advance after the last character
    pub advance: f64,
}

impl TextOutline {
    /// Returns true if there is nothing to extrude.
    pub fn is_empty(&self) -> bool {
        self.contours.iter().all(|contour| contour.len() < 3)
    }

    /// Sum of the contours' signed areas (positive when counter-clockwise).
    pub fn signed_area(&self) -> f64 {
        self.contours.iter().map(|contour| contour_area(contour)).sum()
    }

    /// Reverses every contour when the outline is wound counter-clockwise
    /// overall, so outer contours end up clockwise.
    pub fn normalize_orientation(&mut self) {
        if self.signed_area() > 0.0 {
            for contour in &mut self.contours {
                contour.reverse();
            }
        }
    }
}

/// Shoelace signed area of a closed contour.
pub(crate) fn contour_area(contour: &[DVec2]) -> f64 {
    let n = contour.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| contour[i].perp_dot(contour[(i + 1) % n]))
        .sum();
    twice / 2.0
}

/// Text-to-outline capability of a loaded font.
pub trait Typeface: Send + Sync {
    /// Outlines `text` with em size `size`.
    fn outline(&self, text: &str, size: f64) -> Result<TextOutline, ModelError>;
}

/// A TrueType/OpenType font held in memory.
///
/// # Example
///
/// ```rust,no_run
/// use relief_model::labels::{TrueTypeFont, Typeface};
///
/// let data = std::fs::read("DejaVuSans.ttf").unwrap();
/// let font = TrueTypeFont::from_bytes(data).unwrap();
/// let outline = font.outline("2024", 0.025).unwrap();
/// assert!(!outline.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    data: Vec<u8>,
}

impl TrueTypeFont {
    /// Wraps raw font bytes, checking that they parse.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, ModelError> {
        Face::parse(&data, 0)
            .map_err(|err| ModelError::asset(AssetKind::Font, err.to_string()))?;
        Ok(Self { data })
    }

    fn face(&self) -> Result<Face<'_>, ModelError> {
        Face::parse(&self.data, 0).map_err(|err| ModelError::asset(AssetKind::Font, err.to_string()))
    }
}

impl Typeface for TrueTypeFont {
    fn outline(&self, text: &str, size: f64) -> Result<TextOutline, ModelError> {
        let face = self.face()?;
        let scale = size as f32 / f32::from(face.units_per_em().max(1));

        let mut builder = Path::builder();
        let mut pen = 0.0f32;
        for ch in text.chars() {
            let Some(glyph) = face.glyph_index(ch) else {
                pen += MISSING_GLYPH_ADVANCE as f32 * size as f32;
                continue;
            };
            let mut sink = PathSink {
                builder: &mut builder,
                scale,
                offset_x: pen,
                open: false,
            };
            face.outline_glyph(glyph, &mut sink);
            sink.finish();
            pen += f32::from(face.glyph_hor_advance(glyph).unwrap_or(0)) * scale;
        }
        let path = builder.build();

        let mut outline = TextOutline {
            contours: flatten(&path, GLYPH_FLATTEN_TOLERANCE * size),
            advance: f64::from(pen),
        };
        outline.normalize_orientation();
        Ok(outline)
    }
}

/// Collects flattened closed contours from a lyon path.
fn flatten(path: &Path, tolerance: f64) -> Vec<Vec<DVec2>> {
    let mut contours = Vec::new();
    let mut current: Vec<DVec2> = Vec::new();
    for event in path.iter().flattened(tolerance as f32) {
        match event {
            PathEvent::Begin { at } => {
                current.clear();
                current.push(DVec2::new(f64::from(at.x), f64::from(at.y)));
            }
            PathEvent::Line { to, .. } => {
                current.push(DVec2::new(f64::from(to.x), f64::from(to.y)));
            }
            PathEvent::End { .. } => {
                if current.len() > 1 && current.first() == current.last() {
                    current.pop();
                }
                if current.len() >= 3 {
                    contours.push(std::mem::take(&mut current));
                }
                current.clear();
            }
            // flattened paths only carry line segments
            PathEvent::Quadratic { .. } | PathEvent::Cubic { .. } => {}
        }
    }
    contours
}

/// Forwards glyph outline commands into a lyon path, in label units.
struct PathSink<'a> {
    builder: &'a mut lyon_tessellation::path::path::Builder,
    scale: f32,
    offset_x: f32,
    open: bool,
}

impl PathSink<'_> {
    fn point(&self, x: f32, y: f32) -> math::Point {
        math::point(self.offset_x + x * self.scale, y * self.scale)
    }

    fn finish(&mut self) {
        if self.open {
            self.builder.end(true);
            self.open = false;
        }
    }
}

impl OutlineBuilder for PathSink<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.finish();
        let at = self.point(x, y);
        self.builder.begin(at);
        self.open = true;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let to = self.point(x, y);
        self.builder.line_to(to);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let ctrl = self.point(x1, y1);
        let to = self.point(x, y);
        self.builder.quadratic_bezier_to(ctrl, to);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let ctrl1 = self.point(x1, y1);
        let ctrl2 = self.point(x2, y2);
        let to = self.point(x, y);
        self.builder.cubic_bezier_to(ctrl1, ctrl2, to);
    }

    fn close(&mut self) {
        self.finish();
    }
}
