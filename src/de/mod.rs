//! Reading: header parsing, scalar decoding and the reader-side binder.

mod bind;
mod val_reader;

pub use val_reader::{AsciiValReader, BinValReader, ScalarReader, ValReader};

use std::io::BufRead;

use crate::column::ColumnSpec;
use crate::error::PlyError;
use crate::header::{ElementDef, PlyFormat, PlyHeader};
use crate::scalar::{PlyScalar, ScalarType};

/// Streaming PLY reader over any `BufRead` source.
///
/// The header is parsed once (lazily or via [`parse_header`]) and row data is
/// consumed either scalar-by-scalar or through a column bind call.
///
/// [`parse_header`]: PlyReader::parse_header
pub struct PlyReader<R: BufRead> {
    vals: ValReader<R>,
    format: PlyFormat,
    header: Option<PlyHeader>,
}

impl<R: BufRead> PlyReader<R> {
    pub fn new(reader: R, format: PlyFormat) -> Self {
        Self {
            vals: ValReader::new(reader, format),
            format,
            header: None,
        }
    }

    pub fn format(&self) -> PlyFormat {
        self.format
    }

    /// Parse the header if it has not been parsed yet. Idempotent: calling
    /// again after the first success is a no-op.
    pub fn parse_header(&mut self) -> Result<&PlyHeader, PlyError> {
        let header = match self.header.take() {
            Some(header) => header,
            None => {
                let header = PlyHeader::parse(self.vals.get_mut(), self.format)?;
                log::debug!(
                    "parsed header: {} elements, {} comments",
                    header.elements.len(),
                    header.comments.len()
                );
                header
            }
        };
        Ok(self.header.insert(header))
    }

    /// The parsed header, if [`parse_header`] has succeeded.
    ///
    /// [`parse_header`]: PlyReader::parse_header
    pub fn header(&self) -> Option<&PlyHeader> {
        self.header.as_ref()
    }

    /// Header comments, parsing the header first if needed.
    pub fn comments(&mut self) -> Result<&[String], PlyError> {
        Ok(&self.parse_header()?.comments)
    }

    /// Element definitions, parsing the header first if needed.
    pub fn elements(&mut self) -> Result<&[ElementDef], PlyError> {
        Ok(&self.parse_header()?.elements)
    }

    /// Read one row-data value of the given wire kind.
    pub fn read_scalar(&mut self, kind: ScalarType) -> Result<PlyScalar, PlyError> {
        self.vals.read_scalar(kind)
    }

    /// Bind the specs against the header and stream every row of every
    /// element. Unbound properties are read and discarded.
    ///
    /// Conflicting specs are rejected before anything is read. A failed call
    /// may have partially consumed the stream and must not be resumed.
    pub fn read_columns(&mut self, specs: &mut [&mut dyn ColumnSpec]) -> Result<(), PlyError> {
        {
            let views: Vec<&dyn ColumnSpec> = specs.iter().map(|s| &**s).collect();
            crate::column::check_conflicts(&views)?;
        }
        // clone the schema to avoid holding a borrow across the traversal
        let header = self.parse_header()?.clone();
        bind::drive_read(&mut self.vals, &header, specs)
    }
}
