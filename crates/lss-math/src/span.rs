//! Linear spans of vectors over GF(q).

use crate::gf::Field;
use crate::linalg::is_zero;
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// The linear span of a set of vectors of dimension `dim`.
///
/// The span is stored as a basis in reduced row echelon form, so membership
/// is decided by a single reduction pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'a> {
    field: &'a Field,
    basis: Array2<u32>,
    pivots: Vec<usize>,
}

impl<'a> Span<'a> {
    /// The span of `vectors`, each of dimension `dim`.
    pub fn new<'b, I>(field: &'a Field, dim: usize, vectors: I) -> Self
    where
        I: IntoIterator<Item = ArrayView1<'b, u32>>,
    {
        let mut generators = Array2::zeros((0, dim));
        for v in vectors {
            debug_assert_eq!(v.len(), dim);
            // The shapes agree, so pushing a row cannot fail.
            let _ = generators.push_row(v);
        }
        let (rref, pivots) = field.reduced_row_echelon(generators.view());
        let basis = rref.select(Axis(0), &(0..pivots.len()).collect::<Vec<_>>());
        Self {
            field,
            basis,
            pivots,
        }
    }

    /// The zero subspace of dimension `dim`.
    pub fn zero(field: &'a Field, dim: usize) -> Self {
        Self {
            field,
            basis: Array2::zeros((0, dim)),
            pivots: vec![],
        }
    }

    /// Dimension of the ambient space.
    pub fn ambient_dimension(&self) -> usize {
        self.basis.ncols()
    }

    /// Dimension of the span.
    pub fn dimension(&self) -> usize {
        self.pivots.len()
    }

    /// The basis in reduced row echelon form, one vector per row.
    pub fn basis(&self) -> &Array2<u32> {
        &self.basis
    }

    /// Returns whether `v` belongs to the span.
    pub fn contains(&self, v: ArrayView1<u32>) -> bool {
        debug_assert_eq!(v.len(), self.ambient_dimension());
        let mut residue = v.to_owned();
        for (row, p) in self.basis.rows().into_iter().zip(&self.pivots) {
            let c = residue[*p];
            if c != 0 {
                residue = self
                    .field
                    .sub_vec(residue.view(), self.field.scale_vec(c, row).view());
            }
        }
        is_zero(residue.view())
    }

    /// Iterates over all the members of the span, zero first.
    pub fn iter(&self) -> impl Iterator<Item = Array1<u32>> + '_ {
        self.field.tuples(self.dimension()).map(move |coefficients| {
            coefficients.iter().zip(self.basis.rows()).fold(
                Array1::zeros(self.ambient_dimension()),
                |acc, (c, row)| {
                    self.field
                        .add_vec(acc.view(), self.field.scale_vec(*c, row).view())
                },
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Span;
    use crate::gf::Field;
    use ndarray::array;
    use std::error::Error;

    #[test]
    fn zero_span() -> Result<(), Box<dyn Error>> {
        let field = Field::new(3)?;
        let span = Span::zero(&field, 3);
        assert_eq!(span.dimension(), 0);
        assert!(span.contains(array![0, 0, 0].view()));
        assert!(!span.contains(array![0, 1, 0].view()));
        assert_eq!(span.iter().count(), 1);
        Ok(())
    }

    #[test]
    fn membership() -> Result<(), Box<dyn Error>> {
        let field = Field::new(3)?;
        let a = array![1, 1, 0, 0];
        let b = array![0, 1, 2, 0];
        let c = field.add_vec(a.view(), field.scale_vec(2, b.view()).view());
        let span = Span::new(&field, 4, [a.view(), b.view(), c.view()]);

        assert_eq!(span.dimension(), 2);
        assert!(span.contains(c.view()));
        assert!(span.contains(field.scale_vec(2, a.view()).view()));
        assert!(!span.contains(array![0, 0, 0, 1].view()));
        assert!(!span.contains(array![1, 0, 0, 0].view()));

        let members = span.iter().collect::<Vec<_>>();
        assert_eq!(members.len(), 9);
        assert!(members.iter().all(|m| span.contains(m.view())));
        assert!(members.contains(&a));
        Ok(())
    }

    #[test]
    fn extension_field() -> Result<(), Box<dyn Error>> {
        let field = Field::new(4)?;
        let a = array![1, 2, 3];
        let span = Span::new(&field, 3, [a.view()]);
        for c in field.elements() {
            assert!(span.contains(field.scale_vec(c, a.view()).view()));
        }
        assert!(!span.contains(array![1, 1, 1].view()));
        Ok(())
    }
}
