use std::fmt;
use std::io::{BufRead, Write};

use crate::error::PlyError;
use crate::scalar::ScalarType;

/// PLY file format. Big-endian files are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
}

impl PlyFormat {
    pub fn is_binary(&self) -> bool {
        matches!(self, PlyFormat::BinaryLittleEndian)
    }

    /// The complete `format` header line for this encoding.
    pub fn header_line(&self) -> String {
        format!("format {self} 1.0")
    }
}

impl fmt::Display for PlyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlyFormat::Ascii => write!(f, "ascii"),
            PlyFormat::BinaryLittleEndian => write!(f, "binary_little_endian"),
        }
    }
}

/// PLY property definition.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyDef {
    /// A scalar property with a single value per row.
    Scalar { name: String, data_type: ScalarType },
    /// A list property: a count prefix followed by that many values.
    List {
        name: String,
        count_type: ScalarType,
        data_type: ScalarType,
    },
}

impl PropertyDef {
    pub fn name(&self) -> &str {
        match self {
            PropertyDef::Scalar { name, .. } => name,
            PropertyDef::List { name, .. } => name,
        }
    }

    pub fn data_type(&self) -> ScalarType {
        match self {
            PropertyDef::Scalar { data_type, .. } => *data_type,
            PropertyDef::List { data_type, .. } => *data_type,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, PropertyDef::List { .. })
    }
}

/// PLY element definition (e.g. vertex, face).
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDef {
    pub name: String,
    pub count: usize,
    pub properties: Vec<PropertyDef>,
}

impl ElementDef {
    pub fn get_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name() == name)
    }
}

/// Parsed or accumulated header: comments plus element definitions, both in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlyHeader {
    pub comments: Vec<String>,
    pub elements: Vec<ElementDef>,
}

fn read_header_line<R: BufRead>(reader: &mut R, line: &mut String) -> Result<(), PlyError> {
    line.clear();
    if reader.read_line(line)? == 0 {
        return Err(PlyError::InvalidHeader(
            "unexpected end of stream before end_header".to_string(),
        ));
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(())
}

impl PlyHeader {
    /// Parse the textual header from a stream whose row data uses `format`.
    ///
    /// The byte after the header's terminating newline is the first row-data
    /// byte; nothing beyond `end_header` is consumed.
    pub fn parse<R: BufRead>(reader: &mut R, format: PlyFormat) -> Result<Self, PlyError> {
        let mut line = String::new();

        read_header_line(reader, &mut line)?;
        if !line.starts_with("ply") {
            return Err(PlyError::InvalidHeader(
                "missing 'ply' magic number".to_string(),
            ));
        }

        read_header_line(reader, &mut line)?;
        let expected = format.header_line();
        if !line.starts_with(&expected) {
            return Err(PlyError::UnsupportedFormat(format!(
                "expected '{expected}', found '{line}'"
            )));
        }

        let mut header = PlyHeader::default();

        loop {
            read_header_line(reader, &mut line)?;
            let line = line.trim_start();
            if line.starts_with("end_header") {
                break;
            }

            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("comment") => {
                    let rest = &line["comment".len()..];
                    let rest = rest.strip_prefix(' ').unwrap_or(rest);
                    header.comments.push(rest.to_string());
                }
                Some("element") => {
                    let name = tokens
                        .next()
                        .ok_or_else(|| PlyError::InvalidHeader("malformed element line".into()))?;
                    let count = tokens
                        .next()
                        .ok_or_else(|| PlyError::InvalidHeader("malformed element line".into()))?
                        .parse::<usize>()
                        .map_err(|_| {
                            PlyError::InvalidHeader(format!("invalid element count in '{line}'"))
                        })?;
                    header.elements.push(ElementDef {
                        name: name.to_string(),
                        count,
                        properties: Vec::new(),
                    });
                }
                Some("property") => {
                    let element = header.elements.last_mut().ok_or_else(|| {
                        PlyError::InvalidHeader("property declared before any element".to_string())
                    })?;
                    match tokens.next() {
                        Some("list") => {
                            let count_type = ScalarType::parse(tokens.next().ok_or_else(|| {
                                PlyError::InvalidHeader("malformed list property line".into())
                            })?)?;
                            let data_type = ScalarType::parse(tokens.next().ok_or_else(|| {
                                PlyError::InvalidHeader("malformed list property line".into())
                            })?)?;
                            let name = tokens.next().ok_or_else(|| {
                                PlyError::InvalidHeader("malformed list property line".into())
                            })?;
                            element.properties.push(PropertyDef::List {
                                name: name.to_string(),
                                count_type,
                                data_type,
                            });
                        }
                        Some(kind) => {
                            let data_type = ScalarType::parse(kind)?;
                            let name = tokens.next().ok_or_else(|| {
                                PlyError::InvalidHeader("malformed property line".into())
                            })?;
                            element.properties.push(PropertyDef::Scalar {
                                name: name.to_string(),
                                data_type,
                            });
                        }
                        None => {
                            return Err(PlyError::InvalidHeader("malformed property line".into()))
                        }
                    }
                }
                // unknown keywords (obj_info and friends) are skipped
                _ => {}
            }
        }

        Ok(header)
    }

    /// Serialize the header, `ply` magic through `end_header`.
    pub fn write_to<W: Write>(&self, writer: &mut W, format: PlyFormat) -> Result<(), PlyError> {
        writeln!(writer, "ply")?;
        writeln!(writer, "{}", format.header_line())?;

        for comment in &self.comments {
            writeln!(writer, "comment {comment}")?;
        }

        for element in &self.elements {
            writeln!(writer, "element {} {}", element.name, element.count)?;
            for property in &element.properties {
                match property {
                    PropertyDef::Scalar { name, data_type } => {
                        writeln!(writer, "property {data_type} {name}")?;
                    }
                    PropertyDef::List {
                        name,
                        count_type,
                        data_type,
                    } => {
                        writeln!(writer, "property list {count_type} {data_type} {name}")?;
                    }
                }
            }
        }

        writeln!(writer, "end_header")?;
        Ok(())
    }

    /// Get element definition by name.
    pub fn get_element(&self, name: &str) -> Option<&ElementDef> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// Check if this header defines an element with the given name.
    pub fn has_element(&self, name: &str) -> bool {
        self.elements.iter().any(|e| e.name == name)
    }
}
