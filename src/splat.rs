//! Typed convenience binder for Gaussian-splat attribute sets: position,
//! scale, rotation, opacity and spherical-harmonic coefficients under the
//! property names the splatting ecosystem settled on.

use std::path::Path;

use crate::column::{ColumnSpec, ScalarSpec};
use crate::error::PlyError;
use crate::file::{PlyFileReader, PlyFileWriter};
use crate::header::PlyFormat;

/// Direct-current spherical-harmonic coefficients per splat.
pub const SH_DC_DIM: usize = 3;
/// Higher-order spherical-harmonic coefficients per splat (degree 3).
pub const SH_REST_DIM: usize = 45;

const POSITION_NAMES: [&str; 3] = ["x", "y", "z"];
const SCALE_NAMES: [&str; 3] = ["scale_0", "scale_1", "scale_2"];
const ROTATION_NAMES: [&str; 4] = ["rot_0", "rot_1", "rot_2", "rot_3"];
const SH_DC_NAMES: [&str; SH_DC_DIM] = ["f_dc_0", "f_dc_1", "f_dc_2"];
const SH_REST_NAMES: [&str; SH_REST_DIM] = [
    "f_rest_0", "f_rest_1", "f_rest_2", "f_rest_3", "f_rest_4", "f_rest_5", "f_rest_6",
    "f_rest_7", "f_rest_8", "f_rest_9", "f_rest_10", "f_rest_11", "f_rest_12", "f_rest_13",
    "f_rest_14", "f_rest_15", "f_rest_16", "f_rest_17", "f_rest_18", "f_rest_19", "f_rest_20",
    "f_rest_21", "f_rest_22", "f_rest_23", "f_rest_24", "f_rest_25", "f_rest_26", "f_rest_27",
    "f_rest_28", "f_rest_29", "f_rest_30", "f_rest_31", "f_rest_32", "f_rest_33", "f_rest_34",
    "f_rest_35", "f_rest_36", "f_rest_37", "f_rest_38", "f_rest_39", "f_rest_40", "f_rest_41",
    "f_rest_42", "f_rest_43", "f_rest_44",
];

/// In-memory splat columns. Optional columns are empty when absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplatData {
    pub positions: Vec<[f32; 3]>,
    pub scales: Vec<[f32; 3]>,
    pub rotations: Vec<[f32; 4]>,
    pub opacities: Vec<f32>,
    pub sh_dc: Vec<[f32; SH_DC_DIM]>,
    pub sh_rest: Vec<[f32; SH_REST_DIM]>,
}

fn has_property(reader: &PlyFileReader, property: &str) -> bool {
    reader
        .header()
        .and_then(|h| h.get_element("vertex"))
        .is_some_and(|e| e.get_property(property).is_some())
}

/// Load splats through a read mapping; positions are required, every other
/// column binds only when the file carries it.
pub fn load_splats(path: impl AsRef<Path>) -> Result<SplatData, PlyError> {
    let mut reader = PlyFileReader::open_mapped(path)?;
    reader.parse_header()?;

    let with_scales = has_property(&reader, "scale_0");
    let with_rotations = has_property(&reader, "rot_0");
    let with_opacities = has_property(&reader, "opacity");
    let with_sh_dc = has_property(&reader, "f_dc_0");
    let with_sh_rest = has_property(&reader, "f_rest_0");

    let mut splats = SplatData::default();
    let mut positions = ScalarSpec::growable("vertex", POSITION_NAMES, &mut splats.positions);
    let mut scales = ScalarSpec::growable("vertex", SCALE_NAMES, &mut splats.scales);
    let mut rotations = ScalarSpec::growable("vertex", ROTATION_NAMES, &mut splats.rotations);
    let mut opacities = ScalarSpec::growable_column("vertex", "opacity", &mut splats.opacities);
    let mut sh_dc = ScalarSpec::growable("vertex", SH_DC_NAMES, &mut splats.sh_dc);
    let mut sh_rest = ScalarSpec::growable("vertex", SH_REST_NAMES, &mut splats.sh_rest);

    let mut specs: Vec<&mut dyn ColumnSpec> = vec![&mut positions];
    if with_scales {
        specs.push(&mut scales);
    }
    if with_rotations {
        specs.push(&mut rotations);
    }
    if with_opacities {
        specs.push(&mut opacities);
    }
    if with_sh_dc {
        specs.push(&mut sh_dc);
    }
    if with_sh_rest {
        specs.push(&mut sh_rest);
    }

    reader.read_columns(&mut specs)?;
    drop(specs);
    Ok(splats)
}

/// Save splats through a write mapping sized by `reserve`, emitting only the
/// populated columns.
pub fn save_splats(
    path: impl AsRef<Path>,
    splats: &SplatData,
    format: PlyFormat,
    reserve: usize,
) -> Result<(), PlyError> {
    let mut writer = PlyFileWriter::create_mapped(path, format, reserve)?;

    let positions = ScalarSpec::view("vertex", POSITION_NAMES, &splats.positions);
    let scales = ScalarSpec::view("vertex", SCALE_NAMES, &splats.scales);
    let rotations = ScalarSpec::view("vertex", ROTATION_NAMES, &splats.rotations);
    let opacities = ScalarSpec::column("vertex", "opacity", &splats.opacities);
    let sh_dc = ScalarSpec::view("vertex", SH_DC_NAMES, &splats.sh_dc);
    let sh_rest = ScalarSpec::view("vertex", SH_REST_NAMES, &splats.sh_rest);

    let mut specs: Vec<&dyn ColumnSpec> = vec![&positions];
    if !splats.scales.is_empty() {
        specs.push(&scales);
    }
    if !splats.rotations.is_empty() {
        specs.push(&rotations);
    }
    if !splats.opacities.is_empty() {
        specs.push(&opacities);
    }
    if !splats.sh_dc.is_empty() {
        specs.push(&sh_dc);
    }
    if !splats.sh_rest.is_empty() {
        specs.push(&sh_rest);
    }

    writer.write_columns(&specs)?;
    writer.finish()
}
