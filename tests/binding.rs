//! Column binding contracts: conflict rejection, shape and size checks,
//! list truncation and writer-side schema derivation.

use ply_columns::{
    ColumnSpec, ElementDef, ListSpec, PlyError, PlyFormat, PlyReader, PlyWriter, PropertyDef,
    ScalarSpec, ScalarType,
};

fn encode(format: PlyFormat, specs: &[&dyn ColumnSpec]) -> Vec<u8> {
    let mut encoded = Vec::new();
    let mut writer = PlyWriter::new(&mut encoded, format);
    writer.write_columns(specs).expect("write failed");
    encoded
}

#[test]
fn test_missing_property_is_a_bind_error() {
    let positions = vec![[1.0f32, 2.0, 3.0]];
    let spec = ScalarSpec::view("vertex", ["x", "y", "z"], &positions);
    let encoded = encode(PlyFormat::BinaryLittleEndian, &[&spec]);

    let mut opacities: Vec<f32> = Vec::new();
    let mut reader = PlyReader::new(&encoded[..], PlyFormat::BinaryLittleEndian);
    let mut spec = ScalarSpec::growable_column("vertex", "opacity", &mut opacities);
    let err = reader.read_columns(&mut [&mut spec]).unwrap_err();

    assert!(matches!(
        err,
        PlyError::MissingProperty { element, property }
            if element == "vertex" && property == "opacity"
    ));
}

#[test]
fn test_conflicting_specs_rejected_before_any_read() {
    // the stream is not even a PLY file: the conflict must win over parsing
    let garbage = b"definitely not a header";

    let mut a_rows: Vec<[f32; 3]> = Vec::new();
    let mut b_rows: Vec<f32> = Vec::new();
    let mut a = ScalarSpec::growable("vertex", ["x", "y", "z"], &mut a_rows);
    let mut b = ScalarSpec::growable_column("vertex", "x", &mut b_rows);

    let mut reader = PlyReader::new(&garbage[..], PlyFormat::Ascii);
    let err = reader.read_columns(&mut [&mut a, &mut b]).unwrap_err();
    assert!(matches!(err, PlyError::ConflictingSpecs { .. }));
}

#[test]
fn test_conflicting_specs_rejected_on_write() {
    let rows = vec![[1.0f32, 2.0, 3.0]];
    let narrow = vec![9.0f32];
    let a = ScalarSpec::view("vertex", ["x", "y", "z"], &rows);
    let b = ScalarSpec::column("vertex", "y", &narrow);

    let mut sink = Vec::new();
    let mut writer = PlyWriter::new(&mut sink, PlyFormat::BinaryLittleEndian);
    let err = writer.write_columns(&[&a, &b]).unwrap_err();
    assert!(matches!(err, PlyError::ConflictingSpecs { .. }));
    // nothing was emitted, not even a header
    assert!(sink.is_empty());
}

#[test]
fn test_scalar_spec_on_list_property_is_a_shape_mismatch() {
    let faces = vec![[0u32, 1, 2]];
    let spec = ListSpec::fixed_view("face", "vertex_indices", ScalarType::UChar, &faces);
    let encoded = encode(PlyFormat::BinaryLittleEndian, &[&spec]);

    let mut flat: Vec<u32> = Vec::new();
    let mut reader = PlyReader::new(&encoded[..], PlyFormat::BinaryLittleEndian);
    let mut spec = ScalarSpec::growable_column("face", "vertex_indices", &mut flat);
    let err = reader.read_columns(&mut [&mut spec]).unwrap_err();
    assert!(matches!(err, PlyError::ShapeMismatch { .. }));
}

#[test]
fn test_list_spec_on_scalar_property_is_a_shape_mismatch() {
    let weights = vec![1.0f32, 2.0];
    let spec = ScalarSpec::column("vertex", "weight", &weights);
    let encoded = encode(PlyFormat::BinaryLittleEndian, &[&spec]);

    let mut rows: Vec<Vec<f32>> = Vec::new();
    let mut reader = PlyReader::new(&encoded[..], PlyFormat::BinaryLittleEndian);
    let mut spec = ListSpec::growable("vertex", "weight", ScalarType::UChar, &mut rows);
    let err = reader.read_columns(&mut [&mut spec]).unwrap_err();
    assert!(matches!(err, PlyError::ShapeMismatch { .. }));
}

#[test]
fn test_fixed_list_rows_truncate_without_error() {
    let wide = vec![vec![1u32, 2, 3, 4, 5], vec![6, 7, 8, 9, 10]];
    let spec = ListSpec::view("vertex", "visibility", ScalarType::UChar, &wide);

    for format in [PlyFormat::BinaryLittleEndian, PlyFormat::Ascii] {
        let encoded = encode(format, &[&spec]);

        // fixed-capacity rows keep the first three values per row
        let mut fixed: Vec<[u32; 3]> = Vec::new();
        let mut reader = PlyReader::new(&encoded[..], format);
        let mut narrow = ListSpec::fixed("vertex", "visibility", ScalarType::UChar, &mut fixed);
        reader.read_columns(&mut [&mut narrow]).unwrap();
        assert_eq!(fixed, vec![[1, 2, 3], [6, 7, 8]]);

        // growable rows keep everything
        let mut full: Vec<Vec<u32>> = Vec::new();
        let mut reader = PlyReader::new(&encoded[..], format);
        let mut grow = ListSpec::growable("vertex", "visibility", ScalarType::UChar, &mut full);
        reader.read_columns(&mut [&mut grow]).unwrap();
        assert_eq!(full, wide);
    }
}

#[test]
fn test_truncated_list_consumes_the_whole_row() {
    // a second bound property after the truncating list still reads the
    // right tokens, proving the discarded values were consumed
    let visibility = vec![vec![1u32, 2, 3, 4, 5]];
    let weights = vec![0.5f32];
    let v = ListSpec::view("vertex", "visibility", ScalarType::UChar, &visibility);
    let w = ScalarSpec::column("vertex", "weight", &weights);
    let encoded = encode(PlyFormat::BinaryLittleEndian, &[&v, &w]);

    let mut fixed: Vec<[u32; 2]> = Vec::new();
    let mut got_weights: Vec<f32> = Vec::new();
    let mut reader = PlyReader::new(&encoded[..], PlyFormat::BinaryLittleEndian);
    let mut v = ListSpec::fixed("vertex", "visibility", ScalarType::UChar, &mut fixed);
    let mut w = ScalarSpec::growable_column("vertex", "weight", &mut got_weights);
    reader.read_columns(&mut [&mut v, &mut w]).unwrap();

    assert_eq!(fixed, vec![[1, 2]]);
    assert_eq!(got_weights, vec![0.5]);
}

#[test]
fn test_view_mut_requires_exact_row_count() {
    let positions = vec![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]];
    let spec = ScalarSpec::view("vertex", ["x", "y", "z"], &positions);
    let encoded = encode(PlyFormat::BinaryLittleEndian, &[&spec]);

    // wrong length fails
    let mut short = [[0.0f32; 3]; 1];
    let mut reader = PlyReader::new(&encoded[..], PlyFormat::BinaryLittleEndian);
    let mut bad = ScalarSpec::view_mut("vertex", ["x", "y", "z"], &mut short);
    let err = reader.read_columns(&mut [&mut bad]).unwrap_err();
    assert!(matches!(
        err,
        PlyError::FixedSizeMismatch {
            expected: 2,
            found: 1,
            ..
        }
    ));

    // exact length fills in place
    let mut exact = [[0.0f32; 3]; 2];
    let mut reader = PlyReader::new(&encoded[..], PlyFormat::BinaryLittleEndian);
    let mut good = ScalarSpec::view_mut("vertex", ["x", "y", "z"], &mut exact);
    reader.read_columns(&mut [&mut good]).unwrap();
    assert_eq!(exact, [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
}

#[test]
fn test_read_only_storage_is_rejected_by_the_reader() {
    let positions = vec![[1.0f32, 2.0, 3.0]];
    let spec = ScalarSpec::view("vertex", ["x", "y", "z"], &positions);
    let encoded = encode(PlyFormat::BinaryLittleEndian, &[&spec]);

    let frozen = vec![[0.0f32, 0.0, 0.0]];
    let mut reader = PlyReader::new(&encoded[..], PlyFormat::BinaryLittleEndian);
    let mut view = ScalarSpec::view("vertex", ["x", "y", "z"], &frozen);
    let err = reader.read_columns(&mut [&mut view]).unwrap_err();
    assert!(matches!(err, PlyError::ReadOnlyColumn { .. }));
}

#[test]
fn test_writer_specs_must_agree_on_row_count() {
    let positions = vec![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]];
    let weights = vec![0.5f32];
    let p = ScalarSpec::view("vertex", ["x", "y", "z"], &positions);
    let w = ScalarSpec::column("vertex", "weight", &weights);

    let mut sink = Vec::new();
    let mut writer = PlyWriter::new(&mut sink, PlyFormat::BinaryLittleEndian);
    let err = writer.write_columns(&[&p, &w]).unwrap_err();
    assert!(matches!(
        err,
        PlyError::CountMismatch {
            expected: 2,
            found: 1,
            ..
        }
    ));
}

#[test]
fn test_duplicate_element_registration_rejected() {
    let mut writer = PlyWriter::new(Vec::new(), PlyFormat::Ascii);
    let element = ElementDef {
        name: "vertex".to_string(),
        count: 0,
        properties: vec![PropertyDef::Scalar {
            name: "x".to_string(),
            data_type: ScalarType::Float,
        }],
    };
    writer.add_element(element.clone()).unwrap();
    let err = writer.add_element(element).unwrap_err();
    assert!(matches!(err, PlyError::DuplicateElement(name) if name == "vertex"));
}

#[test]
fn test_schema_is_frozen_once_the_header_is_written() {
    let mut writer = PlyWriter::new(Vec::new(), PlyFormat::Ascii);
    writer.write_header().unwrap();

    assert!(matches!(
        writer.write_header(),
        Err(PlyError::HeaderAlreadyWritten)
    ));
    assert!(matches!(
        writer.add_comment("too late"),
        Err(PlyError::HeaderAlreadyWritten)
    ));
    assert!(matches!(
        writer.add_element(ElementDef {
            name: "vertex".to_string(),
            count: 0,
            properties: Vec::new(),
        }),
        Err(PlyError::HeaderAlreadyWritten)
    ));
}

#[test]
fn test_zero_count_elements_leave_storage_untouched() {
    let empty: Vec<[f32; 3]> = Vec::new();
    let spec = ScalarSpec::view("vertex", ["x", "y", "z"], &empty);
    let encoded = encode(PlyFormat::BinaryLittleEndian, &[&spec]);

    let mut decoded = vec![[9.0f32, 9.0, 9.0]];
    let mut reader = PlyReader::new(&encoded[..], PlyFormat::BinaryLittleEndian);
    let mut spec = ScalarSpec::growable("vertex", ["x", "y", "z"], &mut decoded);
    reader.read_columns(&mut [&mut spec]).unwrap();

    // the element declares zero rows, so the binder never visits the spec
    assert_eq!(decoded, vec![[9.0, 9.0, 9.0]]);
}

#[test]
fn test_growable_storage_is_resized_down_too() {
    let positions = vec![[1.0f32, 2.0, 3.0]];
    let spec = ScalarSpec::view("vertex", ["x", "y", "z"], &positions);
    let encoded = encode(PlyFormat::BinaryLittleEndian, &[&spec]);

    let mut decoded = vec![[0.0f32; 3]; 10];
    let mut reader = PlyReader::new(&encoded[..], PlyFormat::BinaryLittleEndian);
    let mut spec = ScalarSpec::growable("vertex", ["x", "y", "z"], &mut decoded);
    reader.read_columns(&mut [&mut spec]).unwrap();

    assert_eq!(decoded, vec![[1.0, 2.0, 3.0]]);
}

#[test]
fn test_malformed_ascii_token_is_a_parse_error() {
    let data = "ply\nformat ascii 1.0\nelement vertex 1\nproperty float x\nend_header\nnot-a-number\n";
    let mut decoded: Vec<f32> = Vec::new();
    let mut reader = PlyReader::new(data.as_bytes(), PlyFormat::Ascii);
    let mut spec = ScalarSpec::growable_column("vertex", "x", &mut decoded);
    let err = reader.read_columns(&mut [&mut spec]).unwrap_err();
    assert!(matches!(err, PlyError::ParseFloat(_)));
}

#[test]
fn test_truncated_binary_data_is_an_io_error() {
    // the declared row is missing its last value
    let positions = vec![[1.0f32, 2.0, 3.0]];
    let spec = ScalarSpec::view("vertex", ["x", "y", "z"], &positions);
    let mut encoded = encode(PlyFormat::BinaryLittleEndian, &[&spec]);
    let cut = encoded.len() - 4;
    encoded.truncate(cut);

    let mut decoded: Vec<[f32; 3]> = Vec::new();
    let mut reader = PlyReader::new(&encoded[..], PlyFormat::BinaryLittleEndian);
    let mut spec = ScalarSpec::growable("vertex", ["x", "y", "z"], &mut decoded);
    let err = reader.read_columns(&mut [&mut spec]).unwrap_err();
    assert!(matches!(err, PlyError::Io(_)));
}
