//! # Relief Export
//!
//! STL encoding of assembled relief models.
//!
//! Both encodings walk a [`TriangleSource`], so what gets written is the
//! world-space geometry with every group transform applied. Zero-area
//! triangles are dropped and counted in [`ExportStats`]; a source with no
//! triangles still produces a valid, empty solid.
//!
//! ## Usage
//!
//! ```rust
//! use glam::DVec3;
//! use relief_export::{export, read_stl, ExportFormat};
//! use relief_mesh::primitives::create_cube;
//!
//! let cube = create_cube(DVec3::ONE, true).unwrap();
//! let buffer = export(&cube, "octocat-2024", ExportFormat::Binary);
//! assert_eq!(buffer.file_name(), "octocat-2024.stl");
//! assert_eq!(read_stl(buffer.as_bytes()).unwrap().len(), 12);
//! ```

pub mod ascii;
pub mod binary;
pub mod error;
pub mod facet;

pub use error::ExportError;
pub use facet::{facets_to_mesh, ExportStats, Facet};

use relief_mesh::TriangleSource;
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// STL encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Ascii,
    Binary,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Ascii => f.write_str("ascii"),
            ExportFormat::Binary => f.write_str("binary"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ascii" | "text" => Ok(ExportFormat::Ascii),
            "binary" | "bin" => Ok(ExportFormat::Binary),
            other => Err(format!("unknown STL format: {other}")),
        }
    }
}

/// An encoded export, ready to hand to whatever saves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportBuffer {
    Ascii {
        file_name: String,
        text: String,
        stats: ExportStats,
    },
    Binary {
        file_name: String,
        bytes: Vec<u8>,
        stats: ExportStats,
    },
}

impl ExportBuffer {
    pub fn format(&self) -> ExportFormat {
        match self {
            ExportBuffer::Ascii { .. } => ExportFormat::Ascii,
            ExportBuffer::Binary { .. } => ExportFormat::Binary,
        }
    }

    /// `<stem>.stl`
    pub fn file_name(&self) -> &str {
        match self {
            ExportBuffer::Ascii { file_name, .. } | ExportBuffer::Binary { file_name, .. } => {
                file_name
            }
        }
    }

    /// Payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ExportBuffer::Ascii { text, .. } => text.as_bytes(),
            ExportBuffer::Binary { bytes, .. } => bytes,
        }
    }

    pub fn stats(&self) -> ExportStats {
        match self {
            ExportBuffer::Ascii { stats, .. } | ExportBuffer::Binary { stats, .. } => *stats,
        }
    }
}

/// Encodes `source` as `<stem>.stl` in the requested format.
pub fn export(source: &dyn TriangleSource, stem: &str, format: ExportFormat) -> ExportBuffer {
    let file_name = format!("{stem}.stl");
    let buffer = match format {
        ExportFormat::Ascii => {
            let (text, stats) = ascii::write_ascii(source, stem);
            ExportBuffer::Ascii {
                file_name,
                text,
                stats,
            }
        }
        ExportFormat::Binary => {
            let (bytes, stats) = binary::write_binary(source, stem);
            ExportBuffer::Binary {
                file_name,
                bytes,
                stats,
            }
        }
    };
    let stats = buffer.stats();
    info!(
        file = buffer.file_name(),
        format = %format,
        bytes = buffer.as_bytes().len(),
        triangles = stats.triangles,
        skipped = stats.skipped_degenerate,
        "export written"
    );
    buffer
}

/// Decodes STL data, telling the encodings apart by size and leading
/// keyword.
pub fn read_stl(bytes: &[u8]) -> Result<Vec<Facet>, ExportError> {
    if binary::is_binary(bytes) {
        return binary::read_binary(bytes);
    }
    let leading = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map_or(&[][..], |start| &bytes[start..]);
    if leading.starts_with(b"solid") {
        let text = std::str::from_utf8(bytes)
            .map_err(|err| ExportError::malformed(0, format!("invalid UTF-8: {err}")))?;
        return ascii::read_ascii(text);
    }
    if bytes.len() < binary::PREAMBLE_LEN {
        return Err(ExportError::UnknownFormat);
    }
    binary::read_binary(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use relief_mesh::primitives::create_cube;
    use relief_mesh::Mesh;

    #[test]
    fn test_format_parsing() {
        assert_eq!("ASCII".parse::<ExportFormat>(), Ok(ExportFormat::Ascii));
        assert_eq!("binary".parse::<ExportFormat>(), Ok(ExportFormat::Binary));
        assert!("obj".parse::<ExportFormat>().is_err());
        assert_eq!(ExportFormat::Ascii.to_string(), "ascii");
    }

    #[test]
    fn test_buffer_accessors() {
        let cube = create_cube(DVec3::ONE, true).unwrap();
        let buffer = export(&cube, "nat-2020", ExportFormat::Ascii);
        assert_eq!(buffer.format(), ExportFormat::Ascii);
        assert_eq!(buffer.file_name(), "nat-2020.stl");
        assert!(buffer.as_bytes().starts_with(b"solid nat-2020"));
        assert_eq!(buffer.stats().triangles, 12);
    }

    #[test]
    fn test_read_detects_both_formats() {
        let cube = create_cube(DVec3::ONE, true).unwrap();
        for format in [ExportFormat::Ascii, ExportFormat::Binary] {
            let buffer = export(&cube, "cube", format);
            assert_eq!(read_stl(buffer.as_bytes()).unwrap().len(), 12, "{format}");
        }
    }

    #[test]
    fn test_empty_exports_are_valid() {
        for format in [ExportFormat::Ascii, ExportFormat::Binary] {
            let buffer = export(&Mesh::new(), "empty", format);
            assert!(!buffer.as_bytes().is_empty());
            assert!(read_stl(buffer.as_bytes()).unwrap().is_empty());
        }
    }

    #[test]
    fn test_read_rejects_garbage() {
        assert_eq!(read_stl(b"hello"), Err(ExportError::UnknownFormat));
        assert!(read_stl(&[]).is_err());
    }
}
