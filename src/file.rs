//! File-level handles: format auto-detection plus reader/writer wrappers
//! over the mapped and buffered stream backends.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::column::ColumnSpec;
use crate::de::PlyReader;
use crate::error::PlyError;
use crate::geo::GeoMetadata;
use crate::header::{ElementDef, PlyFormat, PlyHeader};
use crate::scalar::{PlyScalar, ScalarType};
use crate::ser::PlyWriter;
use crate::stream::{Sink, Source};

/// Classify an existing file as ASCII or binary-little-endian by scanning
/// its first 1024 bytes for the format line. Finding neither or both is an
/// error.
pub fn detect_format(path: impl AsRef<Path>) -> Result<PlyFormat, PlyError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PlyError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut head = Vec::with_capacity(1024);
    file.take(1024).read_to_end(&mut head)?;
    let head = String::from_utf8_lossy(&head);

    let ascii = head.contains("format ascii");
    let binary = head.contains("format binary_little_endian");

    match (ascii, binary) {
        (true, false) => Ok(PlyFormat::Ascii),
        (false, true) => Ok(PlyFormat::BinaryLittleEndian),
        _ => Err(PlyError::UnsupportedFormat(format!(
            "could not identify the encoding of '{}'",
            path.display()
        ))),
    }
}

/// A reader over a PLY file, auto-detecting its encoding on open.
pub struct PlyFileReader {
    reader: PlyReader<Source>,
}

impl PlyFileReader {
    /// Open with a plain buffered stream.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PlyError> {
        let path = path.as_ref();
        let format = detect_format(path)?;
        log::debug!("opening {} as {format}", path.display());
        Ok(Self {
            reader: PlyReader::new(Source::buffered(path)?, format),
        })
    }

    /// Open with the whole file memory-mapped read-only.
    pub fn open_mapped(path: impl AsRef<Path>) -> Result<Self, PlyError> {
        let path = path.as_ref();
        let format = detect_format(path)?;
        log::debug!("opening {} as {format} (mapped)", path.display());
        Ok(Self {
            reader: PlyReader::new(Source::mapped(path)?, format),
        })
    }

    pub fn format(&self) -> PlyFormat {
        self.reader.format()
    }

    pub fn parse_header(&mut self) -> Result<&PlyHeader, PlyError> {
        self.reader.parse_header()
    }

    pub fn header(&self) -> Option<&PlyHeader> {
        self.reader.header()
    }

    pub fn comments(&mut self) -> Result<&[String], PlyError> {
        self.reader.comments()
    }

    pub fn elements(&mut self) -> Result<&[ElementDef], PlyError> {
        self.reader.elements()
    }

    pub fn read_scalar(&mut self, kind: ScalarType) -> Result<PlyScalar, PlyError> {
        self.reader.read_scalar(kind)
    }

    pub fn read_columns(&mut self, specs: &mut [&mut dyn ColumnSpec]) -> Result<(), PlyError> {
        self.reader.read_columns(specs)
    }

    /// Parse the header and extract its geo-referencing block, if any.
    pub fn geo_metadata(&mut self) -> Result<Option<GeoMetadata>, PlyError> {
        crate::geo::geo_metadata(self.reader.parse_header()?)
    }

    /// Parse the header and collect its texture path comments.
    pub fn texture_paths(&mut self) -> Result<Vec<String>, PlyError> {
        Ok(crate::geo::texture_paths(self.reader.parse_header()?))
    }
}

/// A writer over a PLY file, mapped or buffered.
pub struct PlyFileWriter {
    writer: PlyWriter<Sink>,
}

impl PlyFileWriter {
    /// Create with a plain buffered stream.
    pub fn create(path: impl AsRef<Path>, format: PlyFormat) -> Result<Self, PlyError> {
        Ok(Self {
            writer: PlyWriter::new(Sink::buffered(path)?, format),
        })
    }

    /// Create with a write mapping pre-sized to `reserve` bytes. The file is
    /// truncated to the bytes actually written on [`finish`] or drop.
    ///
    /// [`finish`]: PlyFileWriter::finish
    pub fn create_mapped(
        path: impl AsRef<Path>,
        format: PlyFormat,
        reserve: usize,
    ) -> Result<Self, PlyError> {
        Ok(Self {
            writer: PlyWriter::new(Sink::mapped(path, reserve)?, format),
        })
    }

    pub fn format(&self) -> PlyFormat {
        self.writer.format()
    }

    pub fn header(&self) -> &PlyHeader {
        self.writer.header()
    }

    pub fn add_comment(&mut self, comment: impl Into<String>) -> Result<(), PlyError> {
        self.writer.add_comment(comment)
    }

    pub fn add_element(&mut self, element: ElementDef) -> Result<(), PlyError> {
        self.writer.add_element(element)
    }

    pub fn write_header(&mut self) -> Result<(), PlyError> {
        self.writer.write_header()
    }

    pub fn write_scalar(&mut self, value: PlyScalar) -> Result<(), PlyError> {
        self.writer.write_scalar(value)
    }

    pub fn write_scalar_as(&mut self, value: PlyScalar, kind: ScalarType) -> Result<(), PlyError> {
        self.writer.write_scalar_as(value, kind)
    }

    pub fn write_row_end(&mut self) -> Result<(), PlyError> {
        self.writer.write_row_end()
    }

    pub fn write_columns(&mut self, specs: &[&dyn ColumnSpec]) -> Result<(), PlyError> {
        self.writer.write_columns(specs)
    }

    /// Attach a geo-referencing comment; the header must not be emitted yet.
    pub fn add_geo_metadata(&mut self, meta: &GeoMetadata) -> Result<(), PlyError> {
        crate::geo::attach_geo_metadata(&mut self.writer, meta)
    }

    /// Attach one texture path comment.
    pub fn add_texture_path(&mut self, path: &str) -> Result<(), PlyError> {
        crate::geo::attach_texture_path(&mut self.writer, path)
    }

    /// Flush and release the sink. For a mapped sink this unmaps the region
    /// and truncates the file to its actual length; dropping the writer
    /// without calling `finish` releases it the same way.
    pub fn finish(mut self) -> Result<(), PlyError> {
        self.writer.flush()?;
        self.writer.get_mut().finish()
    }
}
