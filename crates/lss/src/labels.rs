//! Edge labels of the search tree.

use crate::access_structure::ParticipantSet;
use crate::block_vector::{block_coordinates, BlockVector};
use lss_math::gf::Field;
use lss_math::span::Span;
use lss_math::tuples::Tuples;
use ndarray::Array1;
use std::sync::Arc;

/// The pairs `(i, j)` with `1 <= i <= r` and `1 <= j <= k`, `j`-major; the
/// `m`-th pair indexes level `m` of the search tree.
///
/// # Example
///
/// ```
/// # use lss::labels::epsilon;
/// assert_eq!(
///     epsilon(3, 2),
///     vec![(1, 1), (2, 1), (3, 1), (1, 2), (2, 2), (3, 2)]
/// );
/// assert!(epsilon(0, 2).is_empty());
/// ```
pub fn epsilon(r: usize, k: usize) -> Vec<(usize, usize)> {
    (1..=k)
        .flat_map(|j| (1..=r).map(move |i| (i, j)))
        .collect()
}

/// Lazy iterator over the candidate labels of a node, see [`generate_label`].
#[derive(Debug)]
pub struct LabelGenerator<'a> {
    field: Arc<Field>,
    partition: Arc<[usize]>,
    coordinates: Vec<usize>,
    tuples: Tuples,
    span: &'a Span<'a>,
}

impl Iterator for LabelGenerator<'_> {
    type Item = BlockVector;

    fn next(&mut self) -> Option<Self::Item> {
        for tuple in self.tuples.by_ref() {
            if tuple.iter().all(|t| *t == 0) {
                continue;
            }
            let mut values = Array1::zeros(self.partition.iter().sum::<usize>());
            for (c, t) in self.coordinates.iter().zip(&tuple) {
                values[*c] = *t;
            }
            if !self.span.contains(values.view()) {
                return Some(BlockVector::from_parts(
                    &self.field,
                    values,
                    &self.partition,
                ));
            }
        }
        None
    }
}

/// Enumerates the edge labels towards a node labelled by the participant set
/// `x`: the non-zero vectors `c` with `sup_p(c) ⊆ x` that are not in `span`.
///
/// The vectors are enumerated in lexicographic order of their coordinates in
/// the blocks of `x`, last coordinate fastest.
pub fn generate_label<'a>(
    participants: ParticipantSet,
    share_sizes: &Arc<[usize]>,
    x: ParticipantSet,
    field: &Arc<Field>,
    span: &'a Span<'a>,
) -> LabelGenerator<'a> {
    debug_assert!(x.is_subset(participants));
    debug_assert_eq!(participants.len(), share_sizes.len());
    let coordinates = block_coordinates(share_sizes, x);
    LabelGenerator {
        field: field.clone(),
        partition: share_sizes.clone(),
        tuples: field.tuples(coordinates.len()),
        coordinates,
        span,
    }
}
