//! Column binding descriptors.
//!
//! A spec associates a caller-owned array of fixed-shape rows with one PLY
//! element name and an ordered list of property names. The reader binder
//! fills bound storage while discarding everything else in the file; the
//! writer binder derives the header schema from the specs and streams rows
//! out. Specs never own the backing storage — they borrow it for the
//! duration of one bind call.

use crate::error::PlyError;
use crate::scalar::{PlyNumber, PlyScalar, ScalarType};

/// Row shape of a bound column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnShape {
    /// `width` same-typed scalar properties per row.
    Scalar { width: usize },
    /// One list property per row, count serialized as `count_type`.
    List { count_type: ScalarType },
}

/// A binding between caller-owned row storage and named PLY properties.
///
/// Implemented by [`ScalarSpec`] and [`ListSpec`]; binders drive it through
/// dynamic dispatch, one concrete impl per row shape.
pub trait ColumnSpec {
    fn element_name(&self) -> &str;
    fn property_names(&self) -> &[String];
    fn data_type(&self) -> ScalarType;
    fn shape(&self) -> ColumnShape;

    /// Number of rows currently held by the backing storage.
    fn rows(&self) -> usize;

    /// Resize growable storage to `count` rows, or verify that fixed storage
    /// already holds exactly `count`.
    fn bind_rows(&mut self, count: usize) -> Result<(), PlyError>;

    /// Store one cell, casting to the column's native type.
    fn put(&mut self, row: usize, col: usize, value: PlyScalar);

    /// Load one cell as a tagged scalar.
    fn get(&self, row: usize, col: usize) -> PlyScalar;

    /// Prepare a list row for `len` incoming values and return how many of
    /// them the row can store. Only meaningful for list-shaped columns.
    fn begin_list_row(&mut self, _row: usize, _len: usize) -> usize {
        0
    }

    /// Serialized length of a list row. Only meaningful for list-shaped
    /// columns.
    fn list_len(&self, _row: usize) -> usize {
        0
    }
}

/// Reject overlapping bindings before any I/O: two specs conflict when they
/// target the same element name and share any property name.
pub(crate) fn check_conflicts(specs: &[&dyn ColumnSpec]) -> Result<(), PlyError> {
    for (i, a) in specs.iter().enumerate() {
        for b in &specs[i + 1..] {
            if a.element_name() != b.element_name() {
                continue;
            }
            for name in a.property_names() {
                if b.property_names().iter().any(|n| n == name) {
                    return Err(PlyError::ConflictingSpecs {
                        element: a.element_name().to_string(),
                        property: name.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

enum ScalarRows<'a, T, const W: usize> {
    Growable(&'a mut Vec<[T; W]>),
    View(&'a [[T; W]]),
    ViewMut(&'a mut [[T; W]]),
    GrowableFlat(&'a mut Vec<T>),
    ViewFlat(&'a [T]),
}

/// `W` named scalar properties of one numeric type per row.
///
/// The property-name array is checked against the row width at compile time:
/// `ScalarSpec::growable("vertex", ["x", "y", "z"], &mut Vec<[f32; 3]>)`.
pub struct ScalarSpec<'a, T: PlyNumber, const W: usize> {
    element: String,
    names: Vec<String>,
    rows: ScalarRows<'a, T, W>,
}

impl<'a, T: PlyNumber, const W: usize> ScalarSpec<'a, T, W> {
    /// Bind a growable container; the reader resizes it to the element's row
    /// count.
    pub fn growable(element: &str, names: [&str; W], rows: &'a mut Vec<[T; W]>) -> Self {
        Self::with_rows(element, names, ScalarRows::Growable(rows))
    }

    /// Bind a read-only view, for writing.
    pub fn view(element: &str, names: [&str; W], rows: &'a [[T; W]]) -> Self {
        Self::with_rows(element, names, ScalarRows::View(rows))
    }

    /// Bind a fixed-capacity mutable view; its length must equal the
    /// element's row count when reading.
    pub fn view_mut(element: &str, names: [&str; W], rows: &'a mut [[T; W]]) -> Self {
        Self::with_rows(element, names, ScalarRows::ViewMut(rows))
    }

    fn with_rows(element: &str, names: [&str; W], rows: ScalarRows<'a, T, W>) -> Self {
        Self {
            element: element.to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
            rows,
        }
    }
}

impl<'a, T: PlyNumber> ScalarSpec<'a, T, 1> {
    /// Bind a growable single-property column over a flat `Vec<T>`.
    pub fn growable_column(element: &str, name: &str, rows: &'a mut Vec<T>) -> Self {
        Self::with_rows(element, [name], ScalarRows::GrowableFlat(rows))
    }

    /// Bind a read-only single-property column, for writing.
    pub fn column(element: &str, name: &str, rows: &'a [T]) -> Self {
        Self::with_rows(element, [name], ScalarRows::ViewFlat(rows))
    }
}

impl<T: PlyNumber, const W: usize> ColumnSpec for ScalarSpec<'_, T, W> {
    fn element_name(&self) -> &str {
        &self.element
    }

    fn property_names(&self) -> &[String] {
        &self.names
    }

    fn data_type(&self) -> ScalarType {
        T::KIND
    }

    fn shape(&self) -> ColumnShape {
        ColumnShape::Scalar { width: W }
    }

    fn rows(&self) -> usize {
        match &self.rows {
            ScalarRows::Growable(r) => r.len(),
            ScalarRows::View(r) => r.len(),
            ScalarRows::ViewMut(r) => r.len(),
            ScalarRows::GrowableFlat(r) => r.len(),
            ScalarRows::ViewFlat(r) => r.len(),
        }
    }

    fn bind_rows(&mut self, count: usize) -> Result<(), PlyError> {
        match &mut self.rows {
            ScalarRows::Growable(r) => {
                r.resize(count, [T::default(); W]);
                Ok(())
            }
            ScalarRows::GrowableFlat(r) => {
                r.resize(count, T::default());
                Ok(())
            }
            ScalarRows::ViewMut(r) => {
                if r.len() == count {
                    Ok(())
                } else {
                    Err(PlyError::FixedSizeMismatch {
                        element: self.element.clone(),
                        expected: count,
                        found: r.len(),
                    })
                }
            }
            ScalarRows::View(_) | ScalarRows::ViewFlat(_) => Err(PlyError::ReadOnlyColumn {
                element: self.element.clone(),
            }),
        }
    }

    fn put(&mut self, row: usize, col: usize, value: PlyScalar) {
        let value = value.cast::<T>();
        match &mut self.rows {
            ScalarRows::Growable(r) => r[row][col] = value,
            ScalarRows::ViewMut(r) => r[row][col] = value,
            ScalarRows::GrowableFlat(r) => r[row] = value,
            // read-only storage is rejected in bind_rows before any store
            ScalarRows::View(_) | ScalarRows::ViewFlat(_) => {}
        }
    }

    fn get(&self, row: usize, col: usize) -> PlyScalar {
        match &self.rows {
            ScalarRows::Growable(r) => r[row][col].to_scalar(),
            ScalarRows::View(r) => r[row][col].to_scalar(),
            ScalarRows::ViewMut(r) => r[row][col].to_scalar(),
            ScalarRows::GrowableFlat(r) => r[row].to_scalar(),
            ScalarRows::ViewFlat(r) => r[row].to_scalar(),
        }
    }
}

enum ListRows<'a, T, const N: usize> {
    Growable(&'a mut Vec<Vec<T>>),
    View(&'a [Vec<T>]),
    Fixed(&'a mut Vec<[T; N]>),
    FixedView(&'a [[T; N]]),
}

/// One list-valued property per row.
///
/// Rows are either variable-length (`Vec<Vec<T>>`, resized to whatever each
/// file row carries) or fixed-capacity (`[T; N]` rows: excess file values
/// are read and discarded, and every row serializes exactly `N` values).
pub struct ListSpec<'a, T: PlyNumber, const N: usize = 0> {
    element: String,
    names: Vec<String>,
    count_type: ScalarType,
    rows: ListRows<'a, T, N>,
}

impl<'a, T: PlyNumber> ListSpec<'a, T, 0> {
    /// Bind growable variable-length rows.
    pub fn growable(
        element: &str,
        name: &str,
        count_type: ScalarType,
        rows: &'a mut Vec<Vec<T>>,
    ) -> Self {
        Self::with_rows(element, name, count_type, ListRows::Growable(rows))
    }

    /// Bind read-only variable-length rows, for writing.
    pub fn view(element: &str, name: &str, count_type: ScalarType, rows: &'a [Vec<T>]) -> Self {
        Self::with_rows(element, name, count_type, ListRows::View(rows))
    }
}

impl<'a, T: PlyNumber, const N: usize> ListSpec<'a, T, N> {
    /// Bind a growable container of fixed-capacity rows.
    pub fn fixed(
        element: &str,
        name: &str,
        count_type: ScalarType,
        rows: &'a mut Vec<[T; N]>,
    ) -> Self {
        Self::with_rows(element, name, count_type, ListRows::Fixed(rows))
    }

    /// Bind read-only fixed-capacity rows, for writing.
    pub fn fixed_view(
        element: &str,
        name: &str,
        count_type: ScalarType,
        rows: &'a [[T; N]],
    ) -> Self {
        Self::with_rows(element, name, count_type, ListRows::FixedView(rows))
    }

    fn with_rows(
        element: &str,
        name: &str,
        count_type: ScalarType,
        rows: ListRows<'a, T, N>,
    ) -> Self {
        Self {
            element: element.to_string(),
            names: vec![name.to_string()],
            count_type,
            rows,
        }
    }
}

impl<T: PlyNumber, const N: usize> ColumnSpec for ListSpec<'_, T, N> {
    fn element_name(&self) -> &str {
        &self.element
    }

    fn property_names(&self) -> &[String] {
        &self.names
    }

    fn data_type(&self) -> ScalarType {
        T::KIND
    }

    fn shape(&self) -> ColumnShape {
        ColumnShape::List {
            count_type: self.count_type,
        }
    }

    fn rows(&self) -> usize {
        match &self.rows {
            ListRows::Growable(r) => r.len(),
            ListRows::View(r) => r.len(),
            ListRows::Fixed(r) => r.len(),
            ListRows::FixedView(r) => r.len(),
        }
    }

    fn bind_rows(&mut self, count: usize) -> Result<(), PlyError> {
        match &mut self.rows {
            ListRows::Growable(r) => {
                r.resize(count, Vec::new());
                Ok(())
            }
            ListRows::Fixed(r) => {
                r.resize(count, [T::default(); N]);
                Ok(())
            }
            ListRows::View(_) | ListRows::FixedView(_) => Err(PlyError::ReadOnlyColumn {
                element: self.element.clone(),
            }),
        }
    }

    fn put(&mut self, row: usize, col: usize, value: PlyScalar) {
        let value = value.cast::<T>();
        match &mut self.rows {
            ListRows::Growable(r) => r[row][col] = value,
            ListRows::Fixed(r) => r[row][col] = value,
            ListRows::View(_) | ListRows::FixedView(_) => {}
        }
    }

    fn get(&self, row: usize, col: usize) -> PlyScalar {
        match &self.rows {
            ListRows::Growable(r) => r[row][col].to_scalar(),
            ListRows::View(r) => r[row][col].to_scalar(),
            ListRows::Fixed(r) => r[row][col].to_scalar(),
            ListRows::FixedView(r) => r[row][col].to_scalar(),
        }
    }

    fn begin_list_row(&mut self, row: usize, len: usize) -> usize {
        match &mut self.rows {
            ListRows::Growable(r) => {
                r[row] = vec![T::default(); len];
                len
            }
            ListRows::Fixed(_) => N,
            ListRows::View(_) | ListRows::FixedView(_) => 0,
        }
    }

    fn list_len(&self, row: usize) -> usize {
        match &self.rows {
            ListRows::Growable(r) => r[row].len(),
            ListRows::View(r) => r[row].len(),
            ListRows::Fixed(_) | ListRows::FixedView(_) => N,
        }
    }
}
