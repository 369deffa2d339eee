//! Typed convenience binder for triangle meshes: positions, normals, colors
//! and faces wired into column specs. No wire behavior of its own.

use std::path::Path;

use crate::column::{ColumnSpec, ListSpec, ScalarSpec};
use crate::error::PlyError;
use crate::file::{PlyFileReader, PlyFileWriter};
use crate::header::PlyFormat;
use crate::scalar::ScalarType;
use crate::stream::DEFAULT_RESERVE;

/// In-memory triangle mesh columns. Optional columns are empty when absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub colors: Vec<[u8; 3]>,
    pub faces: Vec<[u32; 3]>,
}

fn has_property(reader: &PlyFileReader, element: &str, property: &str) -> bool {
    reader
        .header()
        .and_then(|h| h.get_element(element))
        .is_some_and(|e| e.get_property(property).is_some())
}

/// Load a mesh through a read mapping, binding whichever of the optional
/// columns the file carries.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<MeshData, PlyError> {
    let mut reader = PlyFileReader::open_mapped(path)?;
    reader.parse_header()?;

    let with_normals = has_property(&reader, "vertex", "nx");
    let with_colors = has_property(&reader, "vertex", "red");
    let with_faces = reader.header().is_some_and(|h| h.has_element("face"));

    let mut mesh = MeshData::default();
    let mut vertices = ScalarSpec::growable("vertex", ["x", "y", "z"], &mut mesh.vertices);
    let mut normals = ScalarSpec::growable("vertex", ["nx", "ny", "nz"], &mut mesh.normals);
    let mut colors = ScalarSpec::growable("vertex", ["red", "green", "blue"], &mut mesh.colors);
    let mut faces = ListSpec::fixed("face", "vertex_indices", ScalarType::UChar, &mut mesh.faces);

    let mut specs: Vec<&mut dyn ColumnSpec> = vec![&mut vertices];
    if with_normals {
        specs.push(&mut normals);
    }
    if with_colors {
        specs.push(&mut colors);
    }
    if with_faces {
        specs.push(&mut faces);
    }

    reader.read_columns(&mut specs)?;
    drop(specs);
    Ok(mesh)
}

/// Save a mesh through a write mapping with the default reservation,
/// emitting only the populated columns.
pub fn save_mesh(
    path: impl AsRef<Path>,
    mesh: &MeshData,
    format: PlyFormat,
) -> Result<(), PlyError> {
    let mut writer = PlyFileWriter::create_mapped(path, format, DEFAULT_RESERVE)?;

    let vertices = ScalarSpec::view("vertex", ["x", "y", "z"], &mesh.vertices);
    let normals = ScalarSpec::view("vertex", ["nx", "ny", "nz"], &mesh.normals);
    let colors = ScalarSpec::view("vertex", ["red", "green", "blue"], &mesh.colors);
    let faces = ListSpec::fixed_view("face", "vertex_indices", ScalarType::UChar, &mesh.faces);

    let mut specs: Vec<&dyn ColumnSpec> = vec![&vertices];
    if !mesh.normals.is_empty() {
        specs.push(&normals);
    }
    if !mesh.colors.is_empty() {
        specs.push(&colors);
    }
    if !mesh.faces.is_empty() {
        specs.push(&faces);
    }

    writer.write_columns(&specs)?;
    writer.finish()
}
