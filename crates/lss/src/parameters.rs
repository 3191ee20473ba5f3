//! Parameters of a construction search.

use crate::access_structure::AccessStructure;
use crate::labels::epsilon;
use crate::{Error, Result};
use itertools::Itertools;
use lss_math::gf::Field;
use std::fmt::Debug;
use std::sync::Arc;

/// Parameters of a linear secret-sharing scheme to search for.
#[derive(PartialEq, Eq)]
pub struct SchemeParameters {
    /// The access structure to realize.
    access_structure: AccessStructure,

    /// Share size `π_i` of each participant.
    share_sizes: Arc<[usize]>,

    /// The field of the scheme.
    field: Arc<Field>,

    /// Dimension `k` of the secret.
    secret_size: usize,

    /// Level order of the search tree.
    epsilon: Box<[(usize, usize)]>,
}

impl Debug for SchemeParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemeParameters")
            .field("access_structure", &self.access_structure)
            .field("share_sizes", &self.share_sizes)
            .field("order", &self.field.order())
            .field("secret_size", &self.secret_size)
            .finish()
    }
}

impl SchemeParameters {
    /// The access structure to realize.
    pub const fn access_structure(&self) -> &AccessStructure {
        &self.access_structure
    }

    /// The share size of each participant.
    pub fn share_sizes(&self) -> &Arc<[usize]> {
        &self.share_sizes
    }

    /// The field of the scheme.
    pub fn field(&self) -> &Arc<Field> {
        &self.field
    }

    /// The dimension `k` of the secret.
    pub const fn secret_size(&self) -> usize {
        self.secret_size
    }

    /// The pairs `(i, j)` labelling the levels of the search tree.
    pub fn epsilon(&self) -> &[(usize, usize)] {
        &self.epsilon
    }

    /// Height `r·k` of the search tree.
    pub fn height(&self) -> usize {
        self.epsilon.len()
    }

    /// Total share size `Σπ_i`.
    pub fn total_share_size(&self) -> usize {
        self.share_sizes.iter().sum()
    }

    /// Share size of the participants in the minimal qualified set with the
    /// given 1-based index.
    pub fn share_size_of_minimal_set(&self, i: usize) -> usize {
        self.access_structure.gamma_min()[i - 1]
            .iter()
            .map(|id| self.share_sizes[id - 1])
            .sum()
    }
}

/// Builder for parameters of a construction search.
#[derive(Debug)]
pub struct SchemeParametersBuilder {
    access_structure: Option<AccessStructure>,
    share_sizes: Vec<usize>,
    order: u64,
    secret_size: usize,
}

impl SchemeParametersBuilder {
    /// Creates a new instance of the builder
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            access_structure: None,
            share_sizes: Default::default(),
            order: Default::default(),
            secret_size: 1,
        }
    }

    /// Sets the access structure to realize.
    pub fn set_access_structure(&mut self, access_structure: AccessStructure) -> &mut Self {
        self.access_structure = Some(access_structure);
        self
    }

    /// Sets the share sizes. A single share size applies to every
    /// participant.
    pub fn set_share_sizes(&mut self, share_sizes: &[usize]) -> &mut Self {
        self.share_sizes = share_sizes.to_owned();
        self
    }

    /// Sets the order of the finite field. Building fails if the order is not
    /// a prime power.
    pub fn set_field_order(&mut self, order: u64) -> &mut Self {
        self.order = order;
        self
    }

    /// Sets the dimension of the secret (default 1).
    pub fn set_secret_size(&mut self, secret_size: usize) -> &mut Self {
        self.secret_size = secret_size;
        self
    }

    /// Build a new `SchemeParameters` inside an `Arc`.
    pub fn build_arc(&self) -> Result<Arc<SchemeParameters>> {
        self.build().map(Arc::new)
    }

    /// Build a new `SchemeParameters`.
    pub fn build(&self) -> Result<SchemeParameters> {
        let access_structure = self
            .access_structure
            .clone()
            .ok_or_else(|| Error::missing_parameter("access structure"))?;
        let n = access_structure.n();

        let share_sizes = match self.share_sizes.len() {
            0 => return Err(Error::TooFewValues(0, 1)),
            1 => vec![self.share_sizes[0]; n],
            len if len == n => self.share_sizes.clone(),
            len => return Err(Error::share_sizes_mismatch(len, n)),
        };
        if let Some((i, _)) = share_sizes.iter().find_position(|s| **s == 0) {
            return Err(Error::zero_share_size(i + 1));
        }

        if self.secret_size == 0 {
            return Err(Error::UnspecifiedInput(
                "The secret size must be at least 1".to_string(),
            ));
        }

        let field = Arc::new(Field::new(self.order)?);
        let epsilon = epsilon(access_structure.gamma_min().len(), self.secret_size);

        Ok(SchemeParameters {
            access_structure,
            share_sizes: share_sizes.into(),
            field,
            secret_size: self.secret_size,
            epsilon: epsilon.into_boxed_slice(),
        })
    }
}
