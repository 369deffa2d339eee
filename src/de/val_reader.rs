use std::io::Read;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::PlyError;
use crate::header::PlyFormat;
use crate::scalar::{PlyScalar, ScalarType};

/// One wire decoding of the eight scalar kinds.
pub trait ScalarReader {
    fn read_i8(&mut self) -> Result<i8, PlyError>;
    fn read_u8(&mut self) -> Result<u8, PlyError>;
    fn read_i16(&mut self) -> Result<i16, PlyError>;
    fn read_u16(&mut self) -> Result<u16, PlyError>;
    fn read_i32(&mut self) -> Result<i32, PlyError>;
    fn read_u32(&mut self) -> Result<u32, PlyError>;
    fn read_f32(&mut self) -> Result<f32, PlyError>;
    fn read_f64(&mut self) -> Result<f64, PlyError>;

    /// Read one value of the requested wire kind.
    fn read_scalar(&mut self, kind: ScalarType) -> Result<PlyScalar, PlyError> {
        Ok(match kind {
            ScalarType::Char => PlyScalar::Char(self.read_i8()?),
            ScalarType::UChar => PlyScalar::UChar(self.read_u8()?),
            ScalarType::Short => PlyScalar::Short(self.read_i16()?),
            ScalarType::UShort => PlyScalar::UShort(self.read_u16()?),
            ScalarType::Int => PlyScalar::Int(self.read_i32()?),
            ScalarType::UInt => PlyScalar::UInt(self.read_u32()?),
            ScalarType::Float => PlyScalar::Float(self.read_f32()?),
            ScalarType::Double => PlyScalar::Double(self.read_f64()?),
        })
    }
}

/// Little-endian binary decoding: exactly `size_bytes` per scalar, no
/// delimiters.
pub struct BinValReader<R: Read> {
    pub(crate) reader: R,
}

impl<R: Read> BinValReader<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> ScalarReader for BinValReader<R> {
    fn read_i8(&mut self) -> Result<i8, PlyError> {
        Ok(self.reader.read_i8()?)
    }

    fn read_u8(&mut self) -> Result<u8, PlyError> {
        Ok(self.reader.read_u8()?)
    }

    fn read_i16(&mut self) -> Result<i16, PlyError> {
        Ok(self.reader.read_i16::<LittleEndian>()?)
    }

    fn read_u16(&mut self) -> Result<u16, PlyError> {
        Ok(self.reader.read_u16::<LittleEndian>()?)
    }

    fn read_i32(&mut self) -> Result<i32, PlyError> {
        Ok(self.reader.read_i32::<LittleEndian>()?)
    }

    fn read_u32(&mut self) -> Result<u32, PlyError> {
        Ok(self.reader.read_u32::<LittleEndian>()?)
    }

    fn read_f32(&mut self) -> Result<f32, PlyError> {
        Ok(self.reader.read_f32::<LittleEndian>()?)
    }

    fn read_f64(&mut self) -> Result<f64, PlyError> {
        Ok(self.reader.read_f64::<LittleEndian>()?)
    }
}

/// Whitespace-delimited text decoding.
pub struct AsciiValReader<R: Read> {
    pub(crate) reader: R,
}

impl<R: Read> AsciiValReader<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self { reader }
    }

    fn read_token(&mut self) -> Result<String, PlyError> {
        let mut token = String::new();

        loop {
            let mut byte = [0u8; 1];
            match self.reader.read_exact(&mut byte) {
                Ok(()) => {
                    let ch = byte[0] as char;
                    if ch.is_ascii_whitespace() {
                        if !token.is_empty() {
                            break;
                        }
                    } else {
                        token.push(ch);
                    }
                }
                // a final token may be terminated by end of stream
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof && !token.is_empty() => {
                    break
                }
                Err(e) => return Err(PlyError::Io(e)),
            }
        }

        Ok(token)
    }
}

impl<R: Read> ScalarReader for AsciiValReader<R> {
    fn read_i8(&mut self) -> Result<i8, PlyError> {
        Ok(self.read_token()?.parse::<i8>()?)
    }

    fn read_u8(&mut self) -> Result<u8, PlyError> {
        Ok(self.read_token()?.parse::<u8>()?)
    }

    fn read_i16(&mut self) -> Result<i16, PlyError> {
        Ok(self.read_token()?.parse::<i16>()?)
    }

    fn read_u16(&mut self) -> Result<u16, PlyError> {
        Ok(self.read_token()?.parse::<u16>()?)
    }

    fn read_i32(&mut self) -> Result<i32, PlyError> {
        Ok(self.read_token()?.parse::<i32>()?)
    }

    fn read_u32(&mut self) -> Result<u32, PlyError> {
        Ok(self.read_token()?.parse::<u32>()?)
    }

    fn read_f32(&mut self) -> Result<f32, PlyError> {
        Ok(self.read_token()?.parse::<f32>()?)
    }

    fn read_f64(&mut self) -> Result<f64, PlyError> {
        Ok(self.read_token()?.parse::<f64>()?)
    }
}

/// Runtime selection between the two decodings.
pub enum ValReader<R: Read> {
    Binary(BinValReader<R>),
    Ascii(AsciiValReader<R>),
}

impl<R: Read> ValReader<R> {
    pub fn new(reader: R, format: PlyFormat) -> Self {
        match format {
            PlyFormat::BinaryLittleEndian => ValReader::Binary(BinValReader::new(reader)),
            PlyFormat::Ascii => ValReader::Ascii(AsciiValReader::new(reader)),
        }
    }

    pub fn get_mut(&mut self) -> &mut R {
        match self {
            ValReader::Binary(r) => &mut r.reader,
            ValReader::Ascii(r) => &mut r.reader,
        }
    }
}

impl<R: Read> ScalarReader for ValReader<R> {
    fn read_i8(&mut self) -> Result<i8, PlyError> {
        match self {
            ValReader::Binary(r) => r.read_i8(),
            ValReader::Ascii(r) => r.read_i8(),
        }
    }

    fn read_u8(&mut self) -> Result<u8, PlyError> {
        match self {
            ValReader::Binary(r) => r.read_u8(),
            ValReader::Ascii(r) => r.read_u8(),
        }
    }

    fn read_i16(&mut self) -> Result<i16, PlyError> {
        match self {
            ValReader::Binary(r) => r.read_i16(),
            ValReader::Ascii(r) => r.read_i16(),
        }
    }

    fn read_u16(&mut self) -> Result<u16, PlyError> {
        match self {
            ValReader::Binary(r) => r.read_u16(),
            ValReader::Ascii(r) => r.read_u16(),
        }
    }

    fn read_i32(&mut self) -> Result<i32, PlyError> {
        match self {
            ValReader::Binary(r) => r.read_i32(),
            ValReader::Ascii(r) => r.read_i32(),
        }
    }

    fn read_u32(&mut self) -> Result<u32, PlyError> {
        match self {
            ValReader::Binary(r) => r.read_u32(),
            ValReader::Ascii(r) => r.read_u32(),
        }
    }

    fn read_f32(&mut self) -> Result<f32, PlyError> {
        match self {
            ValReader::Binary(r) => r.read_f32(),
            ValReader::Ascii(r) => r.read_f32(),
        }
    }

    fn read_f64(&mut self) -> Result<f64, PlyError> {
        match self {
            ValReader::Binary(r) => r.read_f64(),
            ValReader::Ascii(r) => r.read_f64(),
        }
    }
}
