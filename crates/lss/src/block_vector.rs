//! Vectors over GF(q) partitioned into per-participant blocks.

use crate::access_structure::ParticipantSet;
use crate::{Error, Result};
use itertools::Itertools;
use lss_math::gf::Field;
use lss_math::linalg::is_zero;
use ndarray::{Array1, ArrayView1};
use std::fmt::{Debug, Display};
use std::sync::Arc;

/// Returns the coordinates, in increasing order, of the blocks of the
/// participants in `x` for the given share sizes.
pub fn block_coordinates(partition: &[usize], x: ParticipantSet) -> Vec<usize> {
    let mut start = 0;
    let mut coordinates = vec![];
    for (id, size) in partition.iter().enumerate() {
        if x.contains(id + 1) {
            coordinates.extend(start..start + size);
        }
        start += size;
    }
    coordinates
}

/// A vector `c = (c^1, ..., c^n)` over GF(q) where block `c^i` has the share
/// size `π_i` of participant `i`.
#[derive(Clone, PartialEq, Eq)]
pub struct BlockVector {
    field: Arc<Field>,
    values: Array1<u32>,
    partition: Arc<[usize]>,
}

impl BlockVector {
    /// Creates a block vector, checking that the values fill the partition
    /// and are elements of the field.
    pub fn new(field: &Arc<Field>, values: Array1<u32>, partition: &Arc<[usize]>) -> Result<Self> {
        let len = partition.iter().sum::<usize>();
        if values.len() < len {
            return Err(Error::TooFewValues(values.len(), len));
        }
        if values.len() > len {
            return Err(Error::TooManyValues(values.len(), len));
        }
        if let Some(v) = values.iter().find(|v| !field.contains(**v)) {
            return Err(lss_math::Error::InvalidElement(*v, field.order()).into());
        }
        Ok(Self::from_parts(field, values, partition))
    }

    pub(crate) fn from_parts(
        field: &Arc<Field>,
        values: Array1<u32>,
        partition: &Arc<[usize]>,
    ) -> Self {
        debug_assert_eq!(values.len(), partition.iter().sum::<usize>());
        Self {
            field: field.clone(),
            values,
            partition: partition.clone(),
        }
    }

    /// The all-zero vector.
    pub fn zero(field: &Arc<Field>, partition: &Arc<[usize]>) -> Self {
        let len: usize = partition.iter().sum();
        Self::from_parts(field, Array1::zeros(len), partition)
    }

    /// The field of the coordinates.
    pub fn field(&self) -> &Arc<Field> {
        &self.field
    }

    /// The underlying values.
    pub fn values(&self) -> ArrayView1<u32> {
        self.values.view()
    }

    /// The block sizes.
    pub fn partition(&self) -> &[usize] {
        &self.partition
    }

    /// Total number of coordinates.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether the vector has no coordinates.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns whether every coordinate is zero.
    pub fn is_zero(&self) -> bool {
        is_zero(self.values.view())
    }

    /// Iterates over the blocks `c^1, ..., c^n`.
    pub fn blocks(&self) -> impl Iterator<Item = ArrayView1<u32>> + '_ {
        self.partition.iter().scan(0, move |start, size| {
            let block = self.values.slice(ndarray::s![*start..*start + size]);
            *start += size;
            Some(block)
        })
    }

    /// The p-support: participants whose block is not all zero.
    pub fn p_support(&self) -> ParticipantSet {
        self.blocks()
            .enumerate()
            .filter(|(_, block)| !is_zero(*block))
            .fold(ParticipantSet::empty(), |acc, (i, _)| {
                ParticipantSet::from_mask(acc.mask() | 1 << i)
            })
    }

    /// The projection `c_X = (c^{i_1}, ..., c^{i_m})` onto the participants
    /// `X = {i_1 < ... < i_m}`.
    ///
    /// Returns an error if `X` is empty or contains an unknown participant.
    pub fn project(&self, x: ParticipantSet) -> Result<Self> {
        if x.is_empty() {
            return Err(Error::EmptyProjection);
        }
        let n = self.partition.len();
        if let Some(id) = x.iter().find(|id| *id > n) {
            return Err(Error::InvalidParticipant(id, n));
        }
        let partition = x.iter().map(|id| self.partition[id - 1]).collect::<Arc<[usize]>>();
        Ok(Self::from_parts(
            &self.field,
            self.gather(&block_coordinates(&self.partition, x)),
            &partition,
        ))
    }

    /// The values at the given coordinates, in order.
    pub fn gather(&self, coordinates: &[usize]) -> Array1<u32> {
        coordinates.iter().map(|c| self.values[*c]).collect()
    }

    /// Multiplies the vector by a scalar.
    pub fn scale(&self, c: u32) -> Self {
        Self::from_parts(
            &self.field,
            self.field.scale_vec(c, self.values.view()),
            &self.partition,
        )
    }

    /// Adds two vectors with the same partition.
    pub fn add(&self, other: &Self) -> Self {
        debug_assert_eq!(self.partition, other.partition);
        Self::from_parts(
            &self.field,
            self.field.add_vec(self.values.view(), other.values.view()),
            &self.partition,
        )
    }
}

impl Debug for BlockVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockVector")
            .field("order", &self.field.order())
            .field("values", &self.values.as_slice())
            .field("partition", &self.partition)
            .finish()
    }
}

impl Display for BlockVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({})",
            self.blocks().map(|b| b.iter().join(", ")).join(" | ")
        )
    }
}
