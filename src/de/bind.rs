//! Reader-side column binding: resolve specs against a parsed header and
//! stream every row, filling bound storage and discarding the rest.

use crate::column::{ColumnShape, ColumnSpec};
use crate::de::val_reader::ScalarReader;
use crate::error::PlyError;
use crate::header::{PlyHeader, PropertyDef};
use crate::scalar::ScalarType;

/// What to do with one file property of the current element.
#[derive(Clone, Copy)]
enum ReadAction {
    SkipScalar(ScalarType),
    SkipList {
        count: ScalarType,
        value: ScalarType,
    },
    Scalar {
        spec: usize,
        col: usize,
        value: ScalarType,
    },
    List {
        spec: usize,
        count: ScalarType,
        value: ScalarType,
    },
}

pub(crate) fn drive_read<S: ScalarReader>(
    vals: &mut S,
    header: &PlyHeader,
    specs: &mut [&mut dyn ColumnSpec],
) -> Result<(), PlyError> {
    for elem in &header.elements {
        if elem.count == 0 {
            continue;
        }

        // every property defaults to read-and-discard
        let mut actions: Vec<ReadAction> = elem
            .properties
            .iter()
            .map(|p| match p {
                PropertyDef::Scalar { data_type, .. } => ReadAction::SkipScalar(*data_type),
                PropertyDef::List {
                    count_type,
                    data_type,
                    ..
                } => ReadAction::SkipList {
                    count: *count_type,
                    value: *data_type,
                },
            })
            .collect();

        for (si, spec) in specs.iter_mut().enumerate() {
            if spec.element_name() != elem.name {
                continue;
            }
            spec.bind_rows(elem.count)?;
            let is_list = matches!(spec.shape(), ColumnShape::List { .. });

            for (col, pname) in spec.property_names().iter().enumerate() {
                let pi = elem
                    .properties
                    .iter()
                    .position(|p| p.name() == pname)
                    .ok_or_else(|| PlyError::MissingProperty {
                        element: elem.name.clone(),
                        property: pname.clone(),
                    })?;

                actions[pi] = match &elem.properties[pi] {
                    PropertyDef::Scalar { data_type, .. } if !is_list => ReadAction::Scalar {
                        spec: si,
                        col,
                        value: *data_type,
                    },
                    PropertyDef::List {
                        count_type,
                        data_type,
                        ..
                    } if is_list => ReadAction::List {
                        spec: si,
                        count: *count_type,
                        value: *data_type,
                    },
                    _ => {
                        return Err(PlyError::ShapeMismatch {
                            element: elem.name.clone(),
                            property: pname.clone(),
                        })
                    }
                };
            }
        }

        // property actions run in schema-declared order; that order decides
        // byte/token consumption and must match the producing writer
        for row in 0..elem.count {
            for action in &actions {
                match *action {
                    ReadAction::SkipScalar(kind) => {
                        vals.read_scalar(kind)?;
                    }
                    ReadAction::SkipList { count, value } => {
                        let n = vals.read_scalar(count)?.cast::<u32>() as usize;
                        for _ in 0..n {
                            vals.read_scalar(value)?;
                        }
                    }
                    ReadAction::Scalar { spec, col, value } => {
                        let v = vals.read_scalar(value)?;
                        specs[spec].put(row, col, v);
                    }
                    ReadAction::List { spec, count, value } => {
                        let n = vals.read_scalar(count)?.cast::<u32>() as usize;
                        let cap = specs[spec].begin_list_row(row, n);
                        for k in 0..n {
                            let v = vals.read_scalar(value)?;
                            // values past a fixed row's capacity are discarded
                            if k < cap {
                                specs[spec].put(row, k, v);
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
