//! Native-Constructor Selection
//!
//! Each shape contract gets exactly one construction strategy, chosen when
//! the converter pair is registered and cached inside it. Fixed strategies
//! take their extents from the contract and ignore the observed sizes;
//! dynamic strategies read exactly the extents they need. The match is
//! exhaustive over the five contract variants.

use matriz_dense::{DenseMatrix, Scalar, ShapeClass};

/// Construction strategy taking the observed (rows, cols).
pub(crate) type Constructor<T> = Box<dyn Fn(usize, usize) -> DenseMatrix<T> + Send + Sync>;

/// Select the construction strategy for a shape contract.
pub(crate) fn constructor_for<T: Scalar>(shape: &ShapeClass) -> Constructor<T> {
    match *shape {
        ShapeClass::Fixed { rows, cols } => Box::new(move |_, _| DenseMatrix::zeros(rows, cols)),
        ShapeClass::FixedRows { rows } => Box::new(move |_, cols| DenseMatrix::zeros(rows, cols)),
        ShapeClass::FixedCols { cols } => Box::new(move |rows, _| DenseMatrix::zeros(rows, cols)),
        ShapeClass::Dynamic => Box::new(DenseMatrix::zeros),
        ShapeClass::Vector { len: Some(len) } => Box::new(move |_, _| DenseMatrix::zeros(len, 1)),
        ShapeClass::Vector { len: None } => Box::new(|len, _| DenseMatrix::zeros(len, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fixed_ignores_observed_extents() {
        let ctor = constructor_for::<f64>(&ShapeClass::Fixed { rows: 3, cols: 4 });
        assert_eq!(ctor(99, 99).shape(), (3, 4));
    }

    #[test]
    fn test_partial_contracts_read_the_free_extent() {
        let ctor = constructor_for::<f64>(&ShapeClass::FixedRows { rows: 2 });
        assert_eq!(ctor(99, 7).shape(), (2, 7));

        let ctor = constructor_for::<f64>(&ShapeClass::FixedCols { cols: 6 });
        assert_eq!(ctor(5, 99).shape(), (5, 6));
    }

    #[test]
    fn test_dynamic_reads_both_extents() {
        let ctor = constructor_for::<i32>(&ShapeClass::Dynamic);
        assert_eq!(ctor(3, 5).shape(), (3, 5));
    }

    #[test]
    fn test_vectors_build_columns() {
        let ctor = constructor_for::<f32>(&ShapeClass::Vector { len: Some(4) });
        assert_eq!(ctor(99, 99).shape(), (4, 1));

        let ctor = constructor_for::<f32>(&ShapeClass::Vector { len: None });
        assert_eq!(ctor(9, 1).shape(), (9, 1));
    }
}
