use std::fmt;
use std::str::FromStr;

use crate::error::PlyError;

/// PLY scalar data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Float,
    Double,
}

impl ScalarType {
    /// Parse a scalar type token. Both the C-style names (`uchar`) and the
    /// sized aliases (`uint8`) are accepted.
    pub fn parse(s: &str) -> Result<Self, PlyError> {
        match s {
            "char" | "int8" => Ok(ScalarType::Char),
            "uchar" | "uint8" => Ok(ScalarType::UChar),
            "short" | "int16" => Ok(ScalarType::Short),
            "ushort" | "uint16" => Ok(ScalarType::UShort),
            "int" | "int32" => Ok(ScalarType::Int),
            "uint" | "uint32" => Ok(ScalarType::UInt),
            "float" | "float32" => Ok(ScalarType::Float),
            "double" | "float64" => Ok(ScalarType::Double),
            _ => Err(PlyError::UnsupportedFormat(format!(
                "Unknown scalar type: {s}"
            ))),
        }
    }

    /// Canonical header token for this type.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Char => "char",
            ScalarType::UChar => "uchar",
            ScalarType::Short => "short",
            ScalarType::UShort => "ushort",
            ScalarType::Int => "int",
            ScalarType::UInt => "uint",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
        }
    }

    /// Wire width of one value in the binary encoding.
    pub fn size_bytes(&self) -> usize {
        match self {
            ScalarType::Char | ScalarType::UChar => 1,
            ScalarType::Short | ScalarType::UShort => 2,
            ScalarType::Int | ScalarType::UInt | ScalarType::Float => 4,
            ScalarType::Double => 8,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScalarType {
    type Err = PlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A single PLY value, tagged with its wire kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlyScalar {
    Char(i8),
    UChar(u8),
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Float(f32),
    Double(f64),
}

impl PlyScalar {
    pub fn kind(&self) -> ScalarType {
        match self {
            PlyScalar::Char(_) => ScalarType::Char,
            PlyScalar::UChar(_) => ScalarType::UChar,
            PlyScalar::Short(_) => ScalarType::Short,
            PlyScalar::UShort(_) => ScalarType::UShort,
            PlyScalar::Int(_) => ScalarType::Int,
            PlyScalar::UInt(_) => ScalarType::UInt,
            PlyScalar::Float(_) => ScalarType::Float,
            PlyScalar::Double(_) => ScalarType::Double,
        }
    }

    /// Numeric cast to any of the eight native types. Narrowing follows
    /// ordinary `as` conversion rules and is not checked for overflow.
    pub fn cast<T: PlyNumber>(self) -> T {
        T::from_scalar(self)
    }

    /// Re-tag the value as another wire kind, casting the payload.
    pub fn cast_to(self, kind: ScalarType) -> PlyScalar {
        match kind {
            ScalarType::Char => PlyScalar::Char(self.cast()),
            ScalarType::UChar => PlyScalar::UChar(self.cast()),
            ScalarType::Short => PlyScalar::Short(self.cast()),
            ScalarType::UShort => PlyScalar::UShort(self.cast()),
            ScalarType::Int => PlyScalar::Int(self.cast()),
            ScalarType::UInt => PlyScalar::UInt(self.cast()),
            ScalarType::Float => PlyScalar::Float(self.cast()),
            ScalarType::Double => PlyScalar::Double(self.cast()),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// The eight native numeric types a PLY property can carry.
pub trait PlyNumber: sealed::Sealed + Copy + Default {
    const KIND: ScalarType;

    fn from_scalar(value: PlyScalar) -> Self;
    fn to_scalar(self) -> PlyScalar;
}

macro_rules! impl_ply_number {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl sealed::Sealed for $ty {}

        impl PlyNumber for $ty {
            const KIND: ScalarType = ScalarType::$variant;

            fn from_scalar(value: PlyScalar) -> Self {
                match value {
                    PlyScalar::Char(v) => v as $ty,
                    PlyScalar::UChar(v) => v as $ty,
                    PlyScalar::Short(v) => v as $ty,
                    PlyScalar::UShort(v) => v as $ty,
                    PlyScalar::Int(v) => v as $ty,
                    PlyScalar::UInt(v) => v as $ty,
                    PlyScalar::Float(v) => v as $ty,
                    PlyScalar::Double(v) => v as $ty,
                }
            }

            fn to_scalar(self) -> PlyScalar {
                PlyScalar::$variant(self)
            }
        }

        impl From<$ty> for PlyScalar {
            fn from(value: $ty) -> Self {
                PlyScalar::$variant(value)
            }
        }
    )*};
}

impl_ply_number! {
    i8 => Char,
    u8 => UChar,
    i16 => Short,
    u16 => UShort,
    i32 => Int,
    u32 => UInt,
    f32 => Float,
    f64 => Double,
}
