//! A columnar PLY (Polygon File Format) reader and writer with memory-mapped
//! I/O.
//!
//! PLY files carry a textual header describing named elements and their
//! properties, followed by row data in either ASCII or binary little-endian
//! encoding. This crate binds strongly typed, caller-owned column storage
//! directly to named properties, so whole files move between disk and
//! columnar memory without per-property glue code: declare a spec per column
//! group, then drive one read or write call over every row.
//!
//! Reading discards everything that is not bound, and writing derives the
//! header schema from the specs. Files can be streamed through ordinary
//! buffered I/O or memory-mapped for zero-copy access.
//!
//! # Example
//!
//! ```rust
//! use ply_columns::{PlyFormat, PlyReader, PlyWriter, ScalarSpec};
//!
//! let triangle = vec![[0.0f32, 0.0, 0.0], [1.0, 2.0, 3.0], [-1.5, 2.25, 0.1]];
//!
//! let mut encoded = Vec::new();
//! let mut writer = PlyWriter::new(&mut encoded, PlyFormat::BinaryLittleEndian);
//! let positions = ScalarSpec::view("vertex", ["x", "y", "z"], &triangle);
//! writer.write_columns(&[&positions]).unwrap();
//!
//! let mut decoded: Vec<[f32; 3]> = Vec::new();
//! let mut reader = PlyReader::new(&encoded[..], PlyFormat::BinaryLittleEndian);
//! let mut positions = ScalarSpec::growable("vertex", ["x", "y", "z"], &mut decoded);
//! reader.read_columns(&mut [&mut positions]).unwrap();
//!
//! assert_eq!(decoded, triangle);
//! ```

mod column;
pub mod de;
mod error;
mod file;
pub mod geo;
mod header;
pub mod mesh;
mod scalar;
pub mod ser;
pub mod splat;
pub mod stream;

pub use column::{ColumnShape, ColumnSpec, ListSpec, ScalarSpec};
pub use de::PlyReader;
pub use error::PlyError;
pub use file::{detect_format, PlyFileReader, PlyFileWriter};
pub use header::{ElementDef, PlyFormat, PlyHeader, PropertyDef};
pub use scalar::{PlyNumber, PlyScalar, ScalarType};
pub use ser::PlyWriter;
pub use stream::DEFAULT_RESERVE;
