//! Header grammar tests: magic and format lines, element/property/comment
//! dispatch, and on-disk format detection.

use std::io::Write as _;

use ply_columns::{detect_format, PlyError, PlyFormat, PlyHeader, PropertyDef, ScalarType};

fn parse_ascii(text: &str) -> Result<PlyHeader, PlyError> {
    PlyHeader::parse(&mut text.as_bytes(), PlyFormat::Ascii)
}

#[test]
fn test_parse_full_header() {
    let header_text = "ply\n\
format ascii 1.0\n\
comment created for a unit test\n\
comment  leading space preserved\n\
element vertex 8\n\
property float x\n\
property float y\n\
property float z\n\
element face 6\n\
property list uchar int vertex_index\n\
end_header\n";

    let header = parse_ascii(header_text).unwrap();

    assert_eq!(
        header.comments,
        vec![
            "created for a unit test".to_string(),
            " leading space preserved".to_string(),
        ]
    );
    assert_eq!(header.elements.len(), 2);

    let vertex = header.get_element("vertex").unwrap();
    assert_eq!(vertex.count, 8);
    assert_eq!(vertex.properties.len(), 3);
    assert_eq!(
        vertex.properties[0],
        PropertyDef::Scalar {
            name: "x".to_string(),
            data_type: ScalarType::Float,
        }
    );

    let face = header.get_element("face").unwrap();
    assert_eq!(face.count, 6);
    assert_eq!(
        face.properties[0],
        PropertyDef::List {
            name: "vertex_index".to_string(),
            count_type: ScalarType::UChar,
            data_type: ScalarType::Int,
        }
    );
}

#[test]
fn test_sized_aliases_accepted() {
    let header_text = "ply\n\
format ascii 1.0\n\
element vertex 1\n\
property float32 x\n\
property uint8 tag\n\
property list uint8 uint32 refs\n\
end_header\n";

    let header = parse_ascii(header_text).unwrap();
    let vertex = header.get_element("vertex").unwrap();
    assert_eq!(vertex.properties[0].data_type(), ScalarType::Float);
    assert_eq!(vertex.properties[1].data_type(), ScalarType::UChar);
    assert!(vertex.properties[2].is_list());
}

#[test]
fn test_missing_magic_number() {
    let err = parse_ascii("poly\nformat ascii 1.0\nend_header\n").unwrap_err();
    assert!(matches!(err, PlyError::InvalidHeader(_)));
}

#[test]
fn test_format_line_mismatch() {
    let text = "ply\nformat binary_little_endian 1.0\nend_header\n";
    let err = PlyHeader::parse(&mut text.as_bytes(), PlyFormat::Ascii).unwrap_err();
    assert!(matches!(err, PlyError::UnsupportedFormat(_)));
}

#[test]
fn test_big_endian_is_rejected() {
    let text = "ply\nformat binary_big_endian 1.0\nend_header\n";
    let err = PlyHeader::parse(&mut text.as_bytes(), PlyFormat::BinaryLittleEndian).unwrap_err();
    assert!(matches!(err, PlyError::UnsupportedFormat(_)));
}

#[test]
fn test_property_before_element() {
    let err = parse_ascii("ply\nformat ascii 1.0\nproperty float x\nend_header\n").unwrap_err();
    assert!(matches!(err, PlyError::InvalidHeader(_)));
}

#[test]
fn test_unknown_scalar_token() {
    let err = parse_ascii(
        "ply\nformat ascii 1.0\nelement vertex 1\nproperty quad x\nend_header\n",
    )
    .unwrap_err();
    assert!(matches!(err, PlyError::UnsupportedFormat(_)));
}

#[test]
fn test_invalid_element_count() {
    let err =
        parse_ascii("ply\nformat ascii 1.0\nelement vertex many\nend_header\n").unwrap_err();
    assert!(matches!(err, PlyError::InvalidHeader(_)));
}

#[test]
fn test_truncated_header() {
    let err = parse_ascii("ply\nformat ascii 1.0\nelement vertex 1\n").unwrap_err();
    assert!(matches!(err, PlyError::InvalidHeader(_)));
}

#[test]
fn test_duplicate_properties_retained_on_parse() {
    // the parser keeps duplicates as declared; only writers enforce names
    let header = parse_ascii(
        "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nproperty float x\nend_header\n",
    )
    .unwrap();
    assert_eq!(header.get_element("vertex").unwrap().properties.len(), 2);
}

#[test]
fn test_unknown_keywords_skipped() {
    let header = parse_ascii(
        "ply\nformat ascii 1.0\nobj_info anything goes\nelement vertex 0\nend_header\n",
    )
    .unwrap();
    assert!(header.comments.is_empty());
    assert_eq!(header.get_element("vertex").unwrap().count, 0);
}

#[test]
fn test_crlf_line_endings() {
    let text = "ply\r\nformat ascii 1.0\r\nelement vertex 1\r\nproperty float x\r\nend_header\r\n";
    let header = parse_ascii(text).unwrap();
    assert_eq!(header.get_element("vertex").unwrap().properties.len(), 1);
}

#[test]
fn test_detect_format_ascii() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "ply\nformat ascii 1.0\nend_header\n").unwrap();
    assert_eq!(detect_format(file.path()).unwrap(), PlyFormat::Ascii);
}

#[test]
fn test_detect_format_binary() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "ply\nformat binary_little_endian 1.0\nend_header\n").unwrap();
    assert_eq!(
        detect_format(file.path()).unwrap(),
        PlyFormat::BinaryLittleEndian
    );
}

#[test]
fn test_detect_format_neither() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not a ply file at all").unwrap();
    assert!(matches!(
        detect_format(file.path()),
        Err(PlyError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_detect_format_ambiguous() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "ply\nformat ascii 1.0\ncomment format binary_little_endian\nend_header\n"
    )
    .unwrap();
    assert!(matches!(
        detect_format(file.path()),
        Err(PlyError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_detect_format_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = detect_format(dir.path().join("absent.ply")).unwrap_err();
    assert!(matches!(err, PlyError::Open { .. }));
}
