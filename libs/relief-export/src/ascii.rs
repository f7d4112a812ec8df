//! ASCII STL.
//!
//! ```text
//! solid <name>
//!   facet normal nx ny nz
//!     outer loop
//!       vertex x y z
//!       vertex x y z
//!       vertex x y z
//!     endloop
//!   endfacet
//! endsolid <name>
//! ```
//!
//! Numbers are written in exponent notation with a fixed number of
//! fractional digits.

use crate::error::ExportError;
use crate::facet::{for_each_facet, ExportStats, Facet};
use config::constants::STL_DECIMAL_PRECISION;
use glam::DVec3;
use relief_mesh::TriangleSource;
use std::fmt::Write;

/// Encodes every triangle of `source` as an ASCII solid called `name`.
pub fn write_ascii(source: &dyn TriangleSource, name: &str) -> (String, ExportStats) {
    let mut out = String::with_capacity(source.triangle_count() * 256 + 64);
    // writing into a String cannot fail
    let _ = writeln!(out, "solid {name}");
    let stats = for_each_facet(source, |facet| {
        let _ = writeln!(out, "  facet normal {}", format_vector(facet.normal));
        out.push_str("    outer loop\n");
        for vertex in facet.vertices {
            let _ = writeln!(out, "      vertex {}", format_vector(vertex));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    });
    let _ = writeln!(out, "endsolid {name}");
    (out, stats)
}

fn format_vector(v: DVec3) -> String {
    let p = STL_DECIMAL_PRECISION;
    format!("{:.p$e} {:.p$e} {:.p$e}", v.x, v.y, v.z)
}

/// Decodes an ASCII solid.
pub fn read_ascii(text: &str) -> Result<Vec<Facet>, ExportError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    match lines.next() {
        Some((_, line)) if keyword(line) == "solid" => {}
        Some((number, _)) => return Err(ExportError::malformed(number, "expected 'solid'")),
        None => return Err(ExportError::malformed(1, "empty input")),
    }

    let mut facets = Vec::new();
    loop {
        let Some((number, line)) = lines.next() else {
            return Err(ExportError::malformed(0, "missing 'endsolid'"));
        };
        match keyword(line) {
            "endsolid" => return Ok(facets),
            "facet" => {
                let normal = parse_vector(number, line, &["facet", "normal"])?;
                expect(&mut lines, "outer loop")?;
                let mut vertices = [DVec3::ZERO; 3];
                for vertex in &mut vertices {
                    let (number, line) = next_line(&mut lines, "vertex")?;
                    *vertex = parse_vector(number, line, &["vertex"])?;
                }
                expect(&mut lines, "endloop")?;
                expect(&mut lines, "endfacet")?;
                facets.push(Facet { normal, vertices });
            }
            other => {
                return Err(ExportError::malformed(
                    number,
                    format!("unexpected '{other}'"),
                ))
            }
        }
    }
}

fn keyword(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

fn next_line<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    wanted: &str,
) -> Result<(usize, &'a str), ExportError> {
    lines
        .next()
        .ok_or_else(|| ExportError::malformed(0, format!("unexpected end, expected '{wanted}'")))
}

fn expect<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    wanted: &str,
) -> Result<(), ExportError> {
    let (number, line) = next_line(lines, wanted)?;
    if line.split_whitespace().eq(wanted.split_whitespace()) {
        Ok(())
    } else {
        Err(ExportError::malformed(number, format!("expected '{wanted}'")))
    }
}

fn parse_vector(number: usize, line: &str, prefix: &[&str]) -> Result<DVec3, ExportError> {
    let mut tokens = line.split_whitespace();
    for word in prefix {
        if tokens.next() != Some(*word) {
            return Err(ExportError::malformed(number, format!("expected '{word}'")));
        }
    }
    let mut values = [0.0; 3];
    for value in &mut values {
        let token = tokens
            .next()
            .ok_or_else(|| ExportError::malformed(number, "expected three numbers"))?;
        *value = token
            .parse()
            .map_err(|_| ExportError::malformed(number, format!("invalid number '{token}'")))?;
    }
    if tokens.next().is_some() {
        return Err(ExportError::malformed(number, "trailing tokens"));
    }
    Ok(DVec3::from_array(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use relief_mesh::primitives::create_cube;
    use relief_mesh::Mesh;

    #[test]
    fn test_empty_solid() {
        let (text, stats) = write_ascii(&Mesh::new(), "nat-2020");
        assert_eq!(text, "solid nat-2020\nendsolid nat-2020\n");
        assert_eq!(stats.triangles, 0);
        assert!(read_ascii(&text).unwrap().is_empty());
    }

    #[test]
    fn test_structure() {
        let cube = create_cube(DVec3::ONE, false).unwrap();
        let (text, stats) = write_ascii(&cube, "cube");

        assert_eq!(stats.triangles, 12);
        assert!(text.starts_with("solid cube\n"));
        assert!(text.ends_with("endsolid cube\n"));
        assert_eq!(text.matches("facet normal").count(), 12);
        assert_eq!(text.matches("vertex").count(), 36);
        assert_eq!(text.matches("endloop").count(), 12);
        assert!(text.contains("vertex 1.000000e0 0.000000e0 0.000000e0"));
    }

    #[test]
    fn test_reads_back_geometry() {
        let cube = create_cube(DVec3::new(0.0143, 0.0143, 0.0731), true).unwrap();
        let (text, _) = write_ascii(&cube, "bar");
        let facets = read_ascii(&text).unwrap();

        assert_eq!(facets.len(), 12);
        for (facet, tri) in facets.iter().zip(cube.iter_triangles()) {
            for (read, written) in facet.vertices.iter().zip(tri.vertices) {
                assert_relative_eq!(read.x, written.x, max_relative = 1e-6);
                assert_relative_eq!(read.y, written.y, max_relative = 1e-6);
                assert_relative_eq!(read.z, written.z, max_relative = 1e-6);
            }
            assert_relative_eq!(facet.normal.length(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_reads_foreign_formatting() {
        let text = "solid part\n\
                    facet normal 0 0 1\n\
                    outer loop\n\
                    vertex 0 0 0\n\
                    vertex 1.5 0 0\n\
                    vertex 0 2.5E+00 0\n\
                    endloop\n\
                    endfacet\n\
                    endsolid part";
        let facets = read_ascii(text).unwrap();
        assert_eq!(facets.len(), 1);
        assert_eq!(facets[0].vertices[2], DVec3::new(0.0, 2.5, 0.0));
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(matches!(
            read_ascii("facet normal 0 0 1"),
            Err(ExportError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            read_ascii("solid x\n  facet normal 0 0 1\n    outer loop\n      vertex 0 0\n"),
            Err(ExportError::Malformed { line: 4, .. })
        ));
        assert!(matches!(
            read_ascii("solid x\n"),
            Err(ExportError::Malformed { .. })
        ));
    }
}
