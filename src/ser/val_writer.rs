use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::error::PlyError;
use crate::header::PlyFormat;
use crate::scalar::{PlyScalar, ScalarType};

/// One wire encoding of the eight scalar kinds.
pub trait ScalarWriter {
    fn write_i8(&mut self, val: i8) -> Result<(), PlyError>;
    fn write_u8(&mut self, val: u8) -> Result<(), PlyError>;
    fn write_i16(&mut self, val: i16) -> Result<(), PlyError>;
    fn write_u16(&mut self, val: u16) -> Result<(), PlyError>;
    fn write_i32(&mut self, val: i32) -> Result<(), PlyError>;
    fn write_u32(&mut self, val: u32) -> Result<(), PlyError>;
    fn write_f32(&mut self, val: f32) -> Result<(), PlyError>;
    fn write_f64(&mut self, val: f64) -> Result<(), PlyError>;

    /// Terminate the current row. A no-op in binary mode.
    fn write_row_end(&mut self) -> Result<(), PlyError>;

    /// Write a value in its own wire kind.
    fn write_scalar(&mut self, value: PlyScalar) -> Result<(), PlyError> {
        match value {
            PlyScalar::Char(v) => self.write_i8(v),
            PlyScalar::UChar(v) => self.write_u8(v),
            PlyScalar::Short(v) => self.write_i16(v),
            PlyScalar::UShort(v) => self.write_u16(v),
            PlyScalar::Int(v) => self.write_i32(v),
            PlyScalar::UInt(v) => self.write_u32(v),
            PlyScalar::Float(v) => self.write_f32(v),
            PlyScalar::Double(v) => self.write_f64(v),
        }
    }

    /// Cast a value to an explicitly declared wire kind and write it.
    fn write_scalar_as(&mut self, value: PlyScalar, kind: ScalarType) -> Result<(), PlyError> {
        self.write_scalar(value.cast_to(kind))
    }
}

/// Little-endian binary encoding.
pub struct BinValWriter<W: Write> {
    pub(crate) writer: W,
}

impl<W: Write> BinValWriter<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ScalarWriter for BinValWriter<W> {
    fn write_i8(&mut self, val: i8) -> Result<(), PlyError> {
        Ok(self.writer.write_i8(val)?)
    }

    fn write_u8(&mut self, val: u8) -> Result<(), PlyError> {
        Ok(self.writer.write_u8(val)?)
    }

    fn write_i16(&mut self, val: i16) -> Result<(), PlyError> {
        Ok(self.writer.write_i16::<LittleEndian>(val)?)
    }

    fn write_u16(&mut self, val: u16) -> Result<(), PlyError> {
        Ok(self.writer.write_u16::<LittleEndian>(val)?)
    }

    fn write_i32(&mut self, val: i32) -> Result<(), PlyError> {
        Ok(self.writer.write_i32::<LittleEndian>(val)?)
    }

    fn write_u32(&mut self, val: u32) -> Result<(), PlyError> {
        Ok(self.writer.write_u32::<LittleEndian>(val)?)
    }

    fn write_f32(&mut self, val: f32) -> Result<(), PlyError> {
        Ok(self.writer.write_f32::<LittleEndian>(val)?)
    }

    fn write_f64(&mut self, val: f64) -> Result<(), PlyError> {
        Ok(self.writer.write_f64::<LittleEndian>(val)?)
    }

    fn write_row_end(&mut self) -> Result<(), PlyError> {
        Ok(())
    }
}

/// Text encoding: shortest round-trip tokens, exactly one space between
/// tokens, one newline per row with no trailing space.
pub struct AsciiValWriter<W: Write> {
    pub(crate) writer: W,
    line_start: bool,
}

impl<W: Write> AsciiValWriter<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self {
            writer,
            line_start: true,
        }
    }

    fn sep(&mut self) -> Result<(), PlyError> {
        if self.line_start {
            self.line_start = false;
        } else {
            self.writer.write_all(b" ")?;
        }
        Ok(())
    }
}

impl<W: Write> ScalarWriter for AsciiValWriter<W> {
    fn write_i8(&mut self, val: i8) -> Result<(), PlyError> {
        self.sep()?;
        write!(self.writer, "{val}")?;
        Ok(())
    }

    fn write_u8(&mut self, val: u8) -> Result<(), PlyError> {
        self.sep()?;
        write!(self.writer, "{val}")?;
        Ok(())
    }

    fn write_i16(&mut self, val: i16) -> Result<(), PlyError> {
        self.sep()?;
        write!(self.writer, "{val}")?;
        Ok(())
    }

    fn write_u16(&mut self, val: u16) -> Result<(), PlyError> {
        self.sep()?;
        write!(self.writer, "{val}")?;
        Ok(())
    }

    fn write_i32(&mut self, val: i32) -> Result<(), PlyError> {
        self.sep()?;
        write!(self.writer, "{val}")?;
        Ok(())
    }

    fn write_u32(&mut self, val: u32) -> Result<(), PlyError> {
        self.sep()?;
        write!(self.writer, "{val}")?;
        Ok(())
    }

    fn write_f32(&mut self, val: f32) -> Result<(), PlyError> {
        self.sep()?;
        write!(self.writer, "{val}")?;
        Ok(())
    }

    fn write_f64(&mut self, val: f64) -> Result<(), PlyError> {
        self.sep()?;
        write!(self.writer, "{val}")?;
        Ok(())
    }

    fn write_row_end(&mut self) -> Result<(), PlyError> {
        self.writer.write_all(b"\n")?;
        self.line_start = true;
        Ok(())
    }
}

/// Runtime selection between the two encodings.
pub enum ValWriter<W: Write> {
    Binary(BinValWriter<W>),
    Ascii(AsciiValWriter<W>),
}

impl<W: Write> ValWriter<W> {
    pub fn new(writer: W, format: PlyFormat) -> Self {
        match format {
            PlyFormat::BinaryLittleEndian => ValWriter::Binary(BinValWriter::new(writer)),
            PlyFormat::Ascii => ValWriter::Ascii(AsciiValWriter::new(writer)),
        }
    }

    pub fn get_mut(&mut self) -> &mut W {
        match self {
            ValWriter::Binary(w) => &mut w.writer,
            ValWriter::Ascii(w) => &mut w.writer,
        }
    }
}

impl<W: Write> ScalarWriter for ValWriter<W> {
    fn write_i8(&mut self, val: i8) -> Result<(), PlyError> {
        match self {
            ValWriter::Binary(w) => w.write_i8(val),
            ValWriter::Ascii(w) => w.write_i8(val),
        }
    }

    fn write_u8(&mut self, val: u8) -> Result<(), PlyError> {
        match self {
            ValWriter::Binary(w) => w.write_u8(val),
            ValWriter::Ascii(w) => w.write_u8(val),
        }
    }

    fn write_i16(&mut self, val: i16) -> Result<(), PlyError> {
        match self {
            ValWriter::Binary(w) => w.write_i16(val),
            ValWriter::Ascii(w) => w.write_i16(val),
        }
    }

    fn write_u16(&mut self, val: u16) -> Result<(), PlyError> {
        match self {
            ValWriter::Binary(w) => w.write_u16(val),
            ValWriter::Ascii(w) => w.write_u16(val),
        }
    }

    fn write_i32(&mut self, val: i32) -> Result<(), PlyError> {
        match self {
            ValWriter::Binary(w) => w.write_i32(val),
            ValWriter::Ascii(w) => w.write_i32(val),
        }
    }

    fn write_u32(&mut self, val: u32) -> Result<(), PlyError> {
        match self {
            ValWriter::Binary(w) => w.write_u32(val),
            ValWriter::Ascii(w) => w.write_u32(val),
        }
    }

    fn write_f32(&mut self, val: f32) -> Result<(), PlyError> {
        match self {
            ValWriter::Binary(w) => w.write_f32(val),
            ValWriter::Ascii(w) => w.write_f32(val),
        }
    }

    fn write_f64(&mut self, val: f64) -> Result<(), PlyError> {
        match self {
            ValWriter::Binary(w) => w.write_f64(val),
            ValWriter::Ascii(w) => w.write_f64(val),
        }
    }

    fn write_row_end(&mut self) -> Result<(), PlyError> {
        match self {
            ValWriter::Binary(w) => w.write_row_end(),
            ValWriter::Ascii(w) => w.write_row_end(),
        }
    }
}
