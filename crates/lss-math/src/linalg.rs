//! Vector and matrix operations over GF(q).
//!
//! Vectors are `Array1<u32>` and matrices `Array2<u32>` whose entries are
//! elements of a [`Field`]; all the operations are methods on the field.

use crate::{gf::Field, Error, Result};
use itertools::Itertools;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};

/// Returns whether every coordinate of `v` is zero.
pub fn is_zero(v: ArrayView1<u32>) -> bool {
    v.iter().all(|x| *x == 0)
}

/// Creates the `j`-th unit vector of dimension `dim` (1-based).
///
/// Returns an error when `j` is zero or larger than `dim`.
pub fn unit_vector(j: usize, dim: usize) -> Result<Array1<u32>> {
    if j == 0 || j > dim {
        return Err(Error::InvalidUnitIndex { index: j, dim });
    }
    let mut e = Array1::zeros(dim);
    e[j - 1] = 1;
    Ok(e)
}

impl Field {
    /// Inner product of two vectors of the same length.
    pub fn dot(&self, a: ArrayView1<u32>, b: ArrayView1<u32>) -> u32 {
        debug_assert_eq!(a.len(), b.len());
        Zip::from(&a)
            .and(&b)
            .fold(0, |acc, x, y| self.add(acc, self.mul(*x, *y)))
    }

    /// Coordinate-wise sum of two vectors.
    pub fn add_vec(&self, a: ArrayView1<u32>, b: ArrayView1<u32>) -> Array1<u32> {
        Zip::from(&a).and(&b).map_collect(|x, y| self.add(*x, *y))
    }

    /// Coordinate-wise difference of two vectors.
    pub fn sub_vec(&self, a: ArrayView1<u32>, b: ArrayView1<u32>) -> Array1<u32> {
        Zip::from(&a).and(&b).map_collect(|x, y| self.sub(*x, *y))
    }

    /// Multiplies every coordinate of `a` by the scalar `c`.
    pub fn scale_vec(&self, c: u32, a: ArrayView1<u32>) -> Array1<u32> {
        a.mapv(|x| self.mul(c, x))
    }

    /// Row vector times matrix, `v · m`.
    pub fn vec_mat(&self, v: ArrayView1<u32>, m: ArrayView2<u32>) -> Array1<u32> {
        debug_assert_eq!(v.len(), m.nrows());
        m.columns().into_iter().map(|c| self.dot(v, c)).collect()
    }

    /// Matrix times column vector, `m · v`.
    pub fn mat_vec(&self, m: ArrayView2<u32>, v: ArrayView1<u32>) -> Array1<u32> {
        debug_assert_eq!(v.len(), m.ncols());
        m.rows().into_iter().map(|r| self.dot(r, v)).collect()
    }

    /// Matrix product `a · b`.
    pub fn mat_mul(&self, a: ArrayView2<u32>, b: ArrayView2<u32>) -> Array2<u32> {
        debug_assert_eq!(a.ncols(), b.nrows());
        Array2::from_shape_fn((a.nrows(), b.ncols()), |(i, j)| {
            self.dot(a.row(i), b.column(j))
        })
    }

    /// Outer product `a ⊗ b`, the matrix with entries `a_i · b_j`.
    pub fn outer(&self, a: ArrayView1<u32>, b: ArrayView1<u32>) -> Array2<u32> {
        Array2::from_shape_fn((a.len(), b.len()), |(i, j)| self.mul(a[i], b[j]))
    }

    /// Entry-wise sum of two matrices.
    pub fn add_mat(&self, a: ArrayView2<u32>, b: ArrayView2<u32>) -> Array2<u32> {
        Zip::from(&a).and(&b).map_collect(|x, y| self.add(*x, *y))
    }

    /// Entry-wise difference of two matrices.
    pub fn sub_mat(&self, a: ArrayView2<u32>, b: ArrayView2<u32>) -> Array2<u32> {
        Zip::from(&a).and(&b).map_collect(|x, y| self.sub(*x, *y))
    }

    /// Reduced row echelon form of `m`, together with its pivot columns.
    ///
    /// Zero rows are kept at the bottom, so the output has the shape of `m`.
    pub fn reduced_row_echelon(&self, m: ArrayView2<u32>) -> (Array2<u32>, Vec<usize>) {
        let mut a = m.to_owned();
        let (rows, cols) = a.dim();
        let mut pivots = Vec::with_capacity(rows.min(cols));

        for c in 0..cols {
            let r = pivots.len();
            if r == rows {
                break;
            }
            let Some(p) = (r..rows).find(|i| a[[*i, c]] != 0) else {
                continue;
            };
            if p != r {
                for j in 0..cols {
                    a.swap([p, j], [r, j]);
                }
            }

            let inv = self.inv_nonzero(a[[r, c]]);
            a.row_mut(r).mapv_inplace(|x| self.mul(inv, x));
            let pivot_row = a.row(r).to_owned();

            for i in (0..rows).filter(|i| *i != r) {
                let factor = a[[i, c]];
                if factor != 0 {
                    let mut row = a.row_mut(i);
                    Zip::from(&mut row)
                        .and(&pivot_row)
                        .for_each(|x, y| *x = self.sub(*x, self.mul(factor, *y)));
                }
            }
            pivots.push(c);
        }

        (a, pivots)
    }

    /// Rank of `m`.
    pub fn rank(&self, m: ArrayView2<u32>) -> usize {
        self.reduced_row_echelon(m).1.len()
    }

    /// Basis of the right kernel `{x : m · x = 0}`, one basis vector per row,
    /// in reduced row echelon form.
    pub fn right_kernel(&self, m: ArrayView2<u32>) -> Array2<u32> {
        let cols = m.ncols();
        let (rref, pivots) = self.reduced_row_echelon(m);
        let free = (0..cols).filter(|c| !pivots.contains(c)).collect_vec();

        let mut basis = Array2::zeros((free.len(), cols));
        for (row, f) in free.iter().enumerate() {
            basis[[row, *f]] = 1;
            for (i, p) in pivots.iter().enumerate() {
                basis[[row, *p]] = self.neg(rref[[i, *f]]);
            }
        }

        self.reduced_row_echelon(basis.view()).0
    }
}

#[cfg(test)]
mod tests {
    use super::{is_zero, unit_vector};
    use crate::{gf::Field, Error};
    use ndarray::{array, Array2};
    use std::error::Error as StdError;

    #[test]
    fn unit_vectors() -> Result<(), Box<dyn StdError>> {
        assert_eq!(unit_vector(1, 3)?, array![1, 0, 0]);
        assert_eq!(unit_vector(3, 3)?, array![0, 0, 1]);
        assert_eq!(
            unit_vector(0, 3).err(),
            Some(Error::InvalidUnitIndex { index: 0, dim: 3 })
        );
        assert_eq!(
            unit_vector(4, 3).err(),
            Some(Error::InvalidUnitIndex { index: 4, dim: 3 })
        );
        Ok(())
    }

    #[test]
    fn vector_operations() -> Result<(), Box<dyn StdError>> {
        let field = Field::new(5)?;
        let a = array![1, 2, 3];
        let b = array![4, 4, 4];
        assert_eq!(field.add_vec(a.view(), b.view()), array![0, 1, 2]);
        assert_eq!(field.sub_vec(a.view(), b.view()), array![2, 3, 4]);
        assert_eq!(field.scale_vec(2, a.view()), array![2, 4, 1]);
        assert_eq!(field.dot(a.view(), b.view()), 4);
        assert!(is_zero(field.sub_vec(a.view(), a.view()).view()));
        assert!(!is_zero(a.view()));
        Ok(())
    }

    #[test]
    fn matrix_operations() -> Result<(), Box<dyn StdError>> {
        let field = Field::new(3)?;
        let m = array![[1, 2], [0, 1], [2, 2]];
        assert_eq!(field.vec_mat(array![1, 1, 1].view(), m.view()), array![0, 2]);
        assert_eq!(field.mat_vec(m.view(), array![1, 1].view()), array![0, 1, 1]);
        assert_eq!(
            field.outer(array![1, 2].view(), array![1, 0, 2].view()),
            array![[1, 0, 2], [2, 0, 1]]
        );
        assert_eq!(
            field.sub_mat(m.view(), m.view()),
            Array2::<u32>::zeros((3, 2))
        );
        assert_eq!(
            field.mat_mul(m.view(), array![[1, 0], [0, 1]].view()),
            m
        );
        Ok(())
    }

    #[test]
    fn rref_and_rank() -> Result<(), Box<dyn StdError>> {
        let field = Field::new(2)?;
        let m = array![[0, 1, 1], [1, 1, 0], [1, 0, 1]];
        let (rref, pivots) = field.reduced_row_echelon(m.view());
        assert_eq!(rref, array![[1, 0, 1], [0, 1, 1], [0, 0, 0]]);
        assert_eq!(pivots, vec![0, 1]);
        assert_eq!(field.rank(m.view()), 2);
        Ok(())
    }

    #[test]
    fn right_kernel() -> Result<(), Box<dyn StdError>> {
        let field = Field::new(2)?;
        let g = array![[1, 1, 1, 0], [1, 0, 1, 1]];
        let h = field.right_kernel(g.view());
        assert_eq!(h, array![[1, 0, 1, 0], [0, 1, 1, 1]]);

        for order in [3, 4, 7] {
            let field = Field::new(order)?;
            let g = array![[1, 2, 0, 1, 1], [0, 1, 1, 0, 2], [1, 2, 1, 1, 0]];
            let h = field.right_kernel(g.view());
            assert_eq!(field.rank(g.view()) + h.nrows(), g.ncols());
            assert!(field
                .mat_mul(g.view(), h.t())
                .iter()
                .all(|x| *x == 0));
        }
        Ok(())
    }
}
