//! Writing: header accumulation and emission, scalar encoding and the
//! writer-side binder.

mod bind;
mod val_writer;

pub use val_writer::{AsciiValWriter, BinValWriter, ScalarWriter, ValWriter};

use std::io::Write;

use crate::column::ColumnSpec;
use crate::error::PlyError;
use crate::header::{ElementDef, PlyFormat, PlyHeader};
use crate::scalar::{PlyScalar, ScalarType};

/// Streaming PLY writer over any `Write` sink.
///
/// Comments and elements accumulate until [`write_header`] freezes the
/// schema; after that only row data may be written.
///
/// [`write_header`]: PlyWriter::write_header
pub struct PlyWriter<W: Write> {
    vals: ValWriter<W>,
    format: PlyFormat,
    header: PlyHeader,
    header_written: bool,
}

impl<W: Write> PlyWriter<W> {
    pub fn new(writer: W, format: PlyFormat) -> Self {
        Self {
            vals: ValWriter::new(writer, format),
            format,
            header: PlyHeader::default(),
            header_written: false,
        }
    }

    pub fn format(&self) -> PlyFormat {
        self.format
    }

    /// The schema accumulated so far.
    pub fn header(&self) -> &PlyHeader {
        &self.header
    }

    pub fn add_comment(&mut self, comment: impl Into<String>) -> Result<(), PlyError> {
        if self.header_written {
            return Err(PlyError::HeaderAlreadyWritten);
        }
        self.header.comments.push(comment.into());
        Ok(())
    }

    /// Register an element. Element names must be unique.
    pub fn add_element(&mut self, element: ElementDef) -> Result<(), PlyError> {
        if self.header_written {
            return Err(PlyError::HeaderAlreadyWritten);
        }
        if self.header.has_element(&element.name) {
            return Err(PlyError::DuplicateElement(element.name));
        }
        self.header.elements.push(element);
        Ok(())
    }

    /// Emit the header and freeze the schema. Fails if already emitted.
    pub fn write_header(&mut self) -> Result<(), PlyError> {
        if self.header_written {
            return Err(PlyError::HeaderAlreadyWritten);
        }
        self.header.write_to(self.vals.get_mut(), self.format)?;
        self.header_written = true;
        Ok(())
    }

    pub fn write_scalar(&mut self, value: PlyScalar) -> Result<(), PlyError> {
        self.vals.write_scalar(value)
    }

    /// Cast `value` to the declared wire kind, then write it.
    pub fn write_scalar_as(&mut self, value: PlyScalar, kind: ScalarType) -> Result<(), PlyError> {
        self.vals.write_scalar_as(value, kind)
    }

    pub fn write_row_end(&mut self) -> Result<(), PlyError> {
        self.vals.write_row_end()
    }

    /// Derive elements from the specs, register them, emit the header and
    /// stream every row. The sink is flushed once at the end.
    pub fn write_columns(&mut self, specs: &[&dyn ColumnSpec]) -> Result<(), PlyError> {
        let elements = bind::derive_elements(specs)?;
        for element in &elements {
            self.add_element(element.clone())?;
        }
        self.write_header()?;
        bind::drive_write(&mut self.vals, &elements, specs)?;
        self.flush()
    }

    pub fn flush(&mut self) -> Result<(), PlyError> {
        self.vals.get_mut().flush()?;
        Ok(())
    }

    /// Mutable access to the underlying sink.
    pub fn get_mut(&mut self) -> &mut W {
        self.vals.get_mut()
    }
}
