//! Independent check of a construction matrix against its access structure.

use crate::access_structure::{AccessStructure, ParticipantSet};
use crate::block_vector::block_coordinates;
use crate::parameters::SchemeParameters;
use crate::{Error, Result};
use itertools::Itertools;
use lss_math::gf::Field;
use lss_math::linalg::{is_zero, unit_vector};
use lss_math::span::Span;
use ndarray::{s, Array1, Array2, ArrayView2, Axis};
use rayon::prelude::*;
use std::sync::Arc;

/// A property of the access structure that a construction matrix violates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// A minimal qualified set cannot recover a coordinate of the secret.
    #[error("the qualified set {set} cannot recover secret coordinate {unit}")]
    Reconstruction {
        /// The qualified set.
        set: ParticipantSet,
        /// The 1-based secret coordinate.
        unit: usize,
    },

    /// A maximal forbidden set learns a non-zero combination of the secret.
    #[error("the forbidden set {set} learns the secret combination {combination:?}")]
    Leakage {
        /// The forbidden set.
        set: ParticipantSet,
        /// The coefficients of the combination on the secret coordinates.
        combination: Vec<u32>,
    },
}

/// Checks construction matrices for a fixed set of parameters.
#[derive(Debug)]
pub struct Validator {
    field: Arc<Field>,
    access_structure: AccessStructure,
    share_sizes: Arc<[usize]>,
    secret_size: usize,
}

impl Validator {
    /// Creates a validator for the given parameters.
    pub fn new(parameters: &SchemeParameters) -> Self {
        Self {
            field: parameters.field().clone(),
            access_structure: parameters.access_structure().clone(),
            share_sizes: parameters.share_sizes().clone(),
            secret_size: parameters.secret_size(),
        }
    }

    /// Validates the construction matrix `m`, whose columns are grouped by
    /// participant, and returns the first violation found.
    pub fn validate(&self, m: ArrayView2<u32>) -> Result<Option<Violation>> {
        match self.check_reconstruction(m)? {
            Some(violation) => Ok(Some(violation)),
            None => self.check_privacy(m),
        }
    }

    /// Every minimal qualified set must span each unit vector `e_1..e_k`
    /// with its columns.
    pub fn check_reconstruction(&self, m: ArrayView2<u32>) -> Result<Option<Violation>> {
        self.check_shape(m)?;
        let units = (1..=self.secret_size)
            .map(|j| unit_vector(j, m.nrows()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(self
            .access_structure
            .gamma_min()
            .par_iter()
            .find_map_first(|x| self.reconstruction(m, *x, &units)))
    }

    /// No combination of the columns of a maximal forbidden set may vanish
    /// outside the first `k` rows without vanishing entirely.
    pub fn check_privacy(&self, m: ArrayView2<u32>) -> Result<Option<Violation>> {
        self.check_shape(m)?;
        Ok(self
            .access_structure
            .delta_max()
            .par_iter()
            .find_map_first(|x| self.leakage(m, *x)))
    }

    fn check_shape(&self, m: ArrayView2<u32>) -> Result<()> {
        let total: usize = self.share_sizes.iter().sum();
        if m.ncols() < total {
            return Err(Error::TooFewValues(m.ncols(), total));
        }
        if m.ncols() > total {
            return Err(Error::TooManyValues(m.ncols(), total));
        }
        // The secret coordinates are the first k rows.
        unit_vector(self.secret_size, m.nrows())?;
        Ok(())
    }

    fn columns(&self, m: ArrayView2<u32>, x: ParticipantSet) -> Array2<u32> {
        m.select(Axis(1), &block_coordinates(&self.share_sizes, x))
    }

    fn reconstruction(
        &self,
        m: ArrayView2<u32>,
        x: ParticipantSet,
        units: &[Array1<u32>],
    ) -> Option<Violation> {
        let columns = self.columns(m, x);
        let span = Span::new(&self.field, m.nrows(), columns.columns());
        units
            .iter()
            .find_position(|e| !span.contains(e.view()))
            .map(|(j, _)| Violation::Reconstruction { set: x, unit: j + 1 })
    }

    fn leakage(&self, m: ArrayView2<u32>, x: ParticipantSet) -> Option<Violation> {
        let k = self.secret_size;
        let columns = self.columns(m, x);
        let kernel = self.field.right_kernel(columns.slice(s![k.., ..]));
        kernel.rows().into_iter().find_map(|coefficients| {
            let v = self.field.mat_vec(columns.view(), coefficients);
            (!is_zero(v.view())).then(|| Violation::Leakage {
                set: x,
                combination: v.slice(s![..k]).to_vec(),
            })
        })
    }
}
