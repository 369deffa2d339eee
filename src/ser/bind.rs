//! Writer-side column binding: derive the element schema from the specs,
//! then stream every row.

use crate::column::{check_conflicts, ColumnShape, ColumnSpec};
use crate::error::PlyError;
use crate::header::{ElementDef, PropertyDef};
use crate::scalar::PlyScalar;
use crate::ser::val_writer::ScalarWriter;

fn spec_properties(spec: &dyn ColumnSpec) -> Vec<PropertyDef> {
    match spec.shape() {
        ColumnShape::Scalar { .. } => spec
            .property_names()
            .iter()
            .map(|name| PropertyDef::Scalar {
                name: name.clone(),
                data_type: spec.data_type(),
            })
            .collect(),
        ColumnShape::List { count_type } => vec![PropertyDef::List {
            name: spec.property_names()[0].clone(),
            count_type,
            data_type: spec.data_type(),
        }],
    }
}

/// One element per distinct element name, in first-occurrence order; specs
/// sharing an element contribute their properties in pass order and must
/// agree on the row count.
pub(crate) fn derive_elements(specs: &[&dyn ColumnSpec]) -> Result<Vec<ElementDef>, PlyError> {
    check_conflicts(specs)?;

    let mut elements: Vec<ElementDef> = Vec::new();
    for spec in specs {
        let count = spec.rows();
        let properties = spec_properties(*spec);
        match elements.iter_mut().find(|e| e.name == spec.element_name()) {
            Some(elem) => {
                if elem.count != count {
                    return Err(PlyError::CountMismatch {
                        element: elem.name.clone(),
                        expected: elem.count,
                        found: count,
                    });
                }
                elem.properties.extend(properties);
            }
            None => elements.push(ElementDef {
                name: spec.element_name().to_string(),
                count,
                properties,
            }),
        }
    }
    Ok(elements)
}

pub(crate) fn drive_write<S: ScalarWriter>(
    vals: &mut S,
    elements: &[ElementDef],
    specs: &[&dyn ColumnSpec],
) -> Result<(), PlyError> {
    for elem in elements {
        for row in 0..elem.count {
            for spec in specs.iter().filter(|s| s.element_name() == elem.name) {
                match spec.shape() {
                    ColumnShape::Scalar { width } => {
                        for col in 0..width {
                            vals.write_scalar(spec.get(row, col))?;
                        }
                    }
                    ColumnShape::List { count_type } => {
                        let n = spec.list_len(row);
                        vals.write_scalar(PlyScalar::UInt(n as u32).cast_to(count_type))?;
                        for k in 0..n {
                            vals.write_scalar(spec.get(row, k))?;
                        }
                    }
                }
            }
            vals.write_row_end()?;
        }
    }
    Ok(())
}
