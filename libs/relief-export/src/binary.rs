//! Binary STL.
//!
//! 80-byte header, little-endian `u32` triangle count, then one 50-byte
//! record per triangle: normal and three vertices as `f32` triples followed
//! by a zero `u16` attribute count.

use crate::error::ExportError;
use crate::facet::{for_each_facet, ExportStats, Facet};
use config::constants::{STL_HEADER_LEN, STL_HEADER_TAG, STL_RECORD_LEN};
use glam::DVec3;
use relief_mesh::TriangleSource;

const COUNT_LEN: usize = 4;
pub(crate) const PREAMBLE_LEN: usize = STL_HEADER_LEN + COUNT_LEN;

/// Header text for a solid called `name`, zero-padded and cut to 80 bytes.
pub fn header(name: &str) -> [u8; STL_HEADER_LEN] {
    let mut header = [0u8; STL_HEADER_LEN];
    let text = format!("{STL_HEADER_TAG} {name}");
    let len = text.len().min(STL_HEADER_LEN);
    header[..len].copy_from_slice(&text.as_bytes()[..len]);
    header
}

/// Encodes every triangle of `source` as a binary solid called `name`.
pub fn write_binary(source: &dyn TriangleSource, name: &str) -> (Vec<u8>, ExportStats) {
    let mut out = Vec::with_capacity(PREAMBLE_LEN + source.triangle_count() * STL_RECORD_LEN);
    out.extend_from_slice(&header(name));
    // patched once degenerate triangles have been dropped
    out.extend_from_slice(&0u32.to_le_bytes());

    let stats = for_each_facet(source, |facet| {
        push_vector(&mut out, facet.normal);
        for vertex in facet.vertices {
            push_vector(&mut out, vertex);
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    });

    let count = u32::try_from(stats.triangles).unwrap_or(u32::MAX);
    out[STL_HEADER_LEN..PREAMBLE_LEN].copy_from_slice(&count.to_le_bytes());
    (out, stats)
}

fn push_vector(out: &mut Vec<u8>, v: DVec3) {
    for component in v.as_vec3().to_array() {
        out.extend_from_slice(&component.to_le_bytes());
    }
}

/// Returns true if `bytes` has exactly the size its declared count implies.
pub fn is_binary(bytes: &[u8]) -> bool {
    declared_count(bytes).is_some_and(|count| expected_len(count) == Some(bytes.len()))
}

fn declared_count(bytes: &[u8]) -> Option<u32> {
    let count = bytes.get(STL_HEADER_LEN..PREAMBLE_LEN)?;
    Some(u32::from_le_bytes([count[0], count[1], count[2], count[3]]))
}

fn expected_len(count: u32) -> Option<usize> {
    (count as usize)
        .checked_mul(STL_RECORD_LEN)?
        .checked_add(PREAMBLE_LEN)
}

/// Decodes a binary solid.
pub fn read_binary(bytes: &[u8]) -> Result<Vec<Facet>, ExportError> {
    let declared = declared_count(bytes).ok_or(ExportError::Truncated {
        expected: PREAMBLE_LEN,
        actual: bytes.len(),
    })?;
    let records = &bytes[PREAMBLE_LEN..];
    if expected_len(declared) != Some(bytes.len()) {
        if records.len() % STL_RECORD_LEN == 0 {
            return Err(ExportError::CountMismatch {
                declared,
                actual: records.len() / STL_RECORD_LEN,
            });
        }
        return Err(ExportError::Truncated {
            expected: expected_len(declared).unwrap_or(usize::MAX),
            actual: bytes.len(),
        });
    }

    Ok(records
        .chunks_exact(STL_RECORD_LEN)
        .map(|record| Facet {
            normal: read_vector(&record[0..12]),
            vertices: [
                read_vector(&record[12..24]),
                read_vector(&record[24..36]),
                read_vector(&record[36..48]),
            ],
        })
        .collect())
}

fn read_vector(bytes: &[u8]) -> DVec3 {
    let component = |i: usize| {
        let b = &bytes[i * 4..i * 4 + 4];
        f64::from(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    };
    DVec3::new(component(0), component(1), component(2))
}
