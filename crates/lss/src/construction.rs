//! Assembly of the matrices of a scheme from the candidate vectors of a leaf.

use crate::block_vector::BlockVector;
use crate::parameters::SchemeParameters;
use crate::{Error, Result};
use lss_math::linalg::unit_vector;
use ndarray::{s, Array2, ArrayView2};

/// The matrices of a linear secret-sharing scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Construction {
    generator: Array2<u32>,
    parity_check: Array2<u32>,
    matrix: Array2<u32>,
}

impl Construction {
    /// Assembles the generator matrix `G`, whose `m`-th row is
    /// `(e_{j_m} ‖ c_m)`, its parity-check matrix `H` (the right kernel of
    /// `G` in reduced row echelon form) and the construction matrix `M`, which
    /// is `H` without its first `k` columns.
    pub fn assemble(parameters: &SchemeParameters, candidates: &[BlockVector]) -> Result<Self> {
        if candidates.len() != parameters.height() {
            return Err(Error::UnspecifiedInput(format!(
                "Expected {} candidate vectors, found {}",
                parameters.height(),
                candidates.len()
            )));
        }

        let k = parameters.secret_size();
        let width = k + parameters.total_share_size();
        let mut generator = Array2::zeros((candidates.len(), width));
        for (m, ((_, j), c)) in parameters.epsilon().iter().zip(candidates).enumerate() {
            if c.len() != parameters.total_share_size() {
                return Err(Error::TooManyValues(c.len(), parameters.total_share_size()));
            }
            generator
                .slice_mut(s![m, ..k])
                .assign(&unit_vector(*j, k)?);
            generator.slice_mut(s![m, k..]).assign(&c.values());
        }

        let parity_check = parameters.field().right_kernel(generator.view());
        let matrix = parity_check.slice(s![.., k..]).to_owned();
        Ok(Self {
            generator,
            parity_check,
            matrix,
        })
    }

    /// The generator matrix `G`.
    pub fn generator(&self) -> ArrayView2<u32> {
        self.generator.view()
    }

    /// The parity-check matrix `H`.
    pub fn parity_check(&self) -> ArrayView2<u32> {
        self.parity_check.view()
    }

    /// The construction matrix `M`.
    pub fn matrix(&self) -> ArrayView2<u32> {
        self.matrix.view()
    }
}

#[cfg(test)]
mod tests {
    use super::Construction;
    use crate::access_structure::AccessStructure;
    use crate::block_vector::BlockVector;
    use crate::parameters::SchemeParametersBuilder;
    use ndarray::array;
    use std::error::Error;

    #[test]
    fn assemble() -> Result<(), Box<dyn Error>> {
        let params = SchemeParametersBuilder::new()
            .set_access_structure(AccessStructure::from_letters(3, &["ab", "bc"])?)
            .set_share_sizes(&[1])
            .set_field_order(2)
            .build()?;
        let candidates = [
            BlockVector::new(params.field(), array![1, 1, 0], params.share_sizes())?,
            BlockVector::new(params.field(), array![0, 1, 1], params.share_sizes())?,
        ];

        let construction = Construction::assemble(&params, &candidates)?;
        assert_eq!(construction.generator(), array![[1, 1, 1, 0], [1, 0, 1, 1]]);
        assert_eq!(
            construction.parity_check(),
            array![[1, 0, 1, 0], [0, 1, 1, 1]]
        );
        assert_eq!(construction.matrix(), array![[0, 1, 0], [1, 1, 1]]);

        assert!(Construction::assemble(&params, &candidates[..1]).is_err());
        Ok(())
    }

    #[test]
    fn secret_columns() -> Result<(), Box<dyn Error>> {
        // k = 2 on two participants: the level (i, j) puts e_j in front.
        let params = SchemeParametersBuilder::new()
            .set_access_structure(AccessStructure::from_letters(2, &["ab"])?)
            .set_share_sizes(&[1])
            .set_field_order(3)
            .set_secret_size(2)
            .build()?;
        let candidates = [
            BlockVector::new(params.field(), array![1, 0], params.share_sizes())?,
            BlockVector::new(params.field(), array![0, 1], params.share_sizes())?,
        ];
        let construction = Construction::assemble(&params, &candidates)?;
        assert_eq!(construction.generator(), array![[1, 0, 1, 0], [0, 1, 0, 1]]);
        assert_eq!(construction.parity_check(), array![[1, 0, 2, 0], [0, 1, 0, 2]]);
        assert_eq!(construction.matrix(), array![[2, 0], [0, 2]]);
        Ok(())
    }
}
