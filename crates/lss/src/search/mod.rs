//! The leveled backtracking search for candidate vectors.
//!
//! Level `m` of the search tree corresponds to the pair `(i, j) = ε_m`: the
//! edges leaving a node at level `m` are labelled by vectors supported on the
//! minimal qualified set `X_i` that should give the `j`-th secret coordinate.
//! A leaf at depth `r·k` carries one candidate vector per level, from which
//! the generator matrix of a scheme is assembled.

mod admissibility;
mod state;

pub use state::{BranchState, EdgeLabel};

use crate::access_structure::ParticipantSet;
use crate::block_vector::{block_coordinates, BlockVector};
use crate::labels::generate_label;
use crate::parameters::SchemeParameters;
use itertools::Itertools;
use lss_math::span::Span;
use ndarray::Array1;
use ndarray::Array2;
use rand::Rng;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// State shared by all the engines of a run: the termination flag and the
/// counter of visited (or pruned) leaves.
#[derive(Debug, Default)]
pub struct SearchControl {
    terminated: AtomicBool,
    leaves: AtomicU64,
}

impl SearchControl {
    /// Creates a fresh control block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks every engine to stop at its next branch point.
    pub fn terminate(&self) {
        self.terminated.store(true, Ordering::SeqCst);
    }

    /// Returns whether the run has been terminated.
    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    /// Adds to the leaf counter, saturating.
    pub fn add_leaves(&self, leaves: u128) {
        let leaves = u64::try_from(leaves).unwrap_or(u64::MAX);
        let _ = self
            .leaves
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
                Some(v.saturating_add(leaves))
            });
    }

    /// Number of leaves accounted for so far.
    pub fn leaves(&self) -> u64 {
        self.leaves.load(Ordering::Relaxed)
    }
}

/// The search algorithm for a fixed set of parameters.
#[derive(Debug)]
pub struct SearchAlgorithm {
    parameters: Arc<SchemeParameters>,

    /// Block coordinates of `P \ D_i` for every maximal forbidden set `D_i`.
    forbidden_complements: Vec<Vec<usize>>,

    /// Block coordinates of `P \ X_i` for every minimal qualified set `X_i`.
    qualified_complements: Vec<Vec<usize>>,
}

impl SearchAlgorithm {
    /// Creates the search algorithm for the given parameters.
    pub fn new(parameters: &Arc<SchemeParameters>) -> Self {
        let ac = parameters.access_structure();
        let complements = |sets: &[ParticipantSet]| {
            sets.iter()
                .map(|x| block_coordinates(parameters.share_sizes(), x.complement(ac.n())))
                .collect_vec()
        };
        Self {
            forbidden_complements: complements(ac.delta_max()),
            qualified_complements: complements(ac.gamma_min()),
            parameters: parameters.clone(),
        }
    }

    /// The parameters of the search.
    pub fn parameters(&self) -> &Arc<SchemeParameters> {
        &self.parameters
    }

    /// Height of the search tree.
    pub fn height(&self) -> usize {
        self.parameters.height()
    }

    /// Level at which the parallel engine hands subtrees off.
    pub fn split_level(&self) -> usize {
        self.height() / 2 + 1
    }

    /// The state at the root: `A_i = 0` and `B_i = I`.
    pub fn initial_state(&self) -> BranchState {
        let k = self.parameters.secret_size();
        BranchState {
            level: 1,
            s_m: Default::default(),
            s_n: Default::default(),
            a: self
                .forbidden_complements
                .iter()
                .map(|c| Array2::zeros((c.len(), k)))
                .collect(),
            b: self
                .forbidden_complements
                .iter()
                .map(|c| Array2::eye(c.len()))
                .collect(),
            ca: vec![],
        }
    }

    /// Runs the search below `state` until a leaf is reached, the subtree is
    /// exhausted, or the run is terminated.
    ///
    /// Returns the candidate vectors of the first leaf found.
    pub fn sequential_search<R: Rng + ?Sized>(
        &self,
        state: BranchState,
        skip: f64,
        rng: &mut R,
        control: &SearchControl,
    ) -> Option<Vec<BlockVector>> {
        if state.level > self.height() {
            control.add_leaves(1);
            return Some(state.ca);
        }
        if control.is_terminated() {
            return None;
        }

        if let Some(child) = self.d_plus(&state, &EdgeLabel::Span, rng) {
            if let Some(found) = self.sequential_search(child, skip, rng, control) {
                return Some(found);
            }
        }

        for label in self.candidate_labels(&state, skip, rng) {
            if control.is_terminated() {
                return None;
            }
            match self.d_plus(&state, &EdgeLabel::Vector(label), rng) {
                Some(child) => {
                    if let Some(found) = self.sequential_search(child, skip, rng, control) {
                        return Some(found);
                    }
                }
                None => control.add_leaves(self.leaves_below(state.level)),
            }
        }
        None
    }

    /// Explores the tree like [`Self::sequential_search`] down to the split
    /// level, and hands every branch reaching it to `dispatch`.
    pub fn parallel_search<R, F>(
        &self,
        state: BranchState,
        skip: f64,
        rng: &mut R,
        control: &SearchControl,
        dispatch: &mut F,
    ) where
        R: Rng + ?Sized,
        F: FnMut(BranchState),
    {
        if state.level == self.split_level() {
            dispatch(state);
            return;
        }
        if control.is_terminated() {
            return;
        }

        if let Some(child) = self.d_plus(&state, &EdgeLabel::Span, rng) {
            self.parallel_search(child, skip, rng, control, dispatch);
        }

        for label in self.candidate_labels(&state, skip, rng) {
            if control.is_terminated() {
                return;
            }
            match self.d_plus(&state, &EdgeLabel::Vector(label), rng) {
                Some(child) => self.parallel_search(child, skip, rng, control, dispatch),
                None => control.add_leaves(self.leaves_below(state.level)),
            }
        }
    }

    /// The concrete labels to try at the node of `state`: the labels on the
    /// node's minimal set outside the span of the path, of which a random
    /// `floor((1 - skip)·count)` are kept in enumeration order.
    fn candidate_labels<R: Rng + ?Sized>(
        &self,
        state: &BranchState,
        skip: f64,
        rng: &mut R,
    ) -> Vec<BlockVector> {
        let (i, _) = self.parameters.epsilon()[state.level - 1];
        let ac = self.parameters.access_structure();
        let field = self.parameters.field();
        let span = Span::new(
            field,
            self.parameters.total_share_size(),
            state.labels().map(|l| l.values()),
        );

        let labels = generate_label(
            ac.participants(),
            self.parameters.share_sizes(),
            ac.gamma_min()[i - 1],
            field,
            &span,
        )
        .collect_vec();

        let keep = (((1.0 - skip) * labels.len() as f64).floor() as usize).min(labels.len());
        if keep == labels.len() {
            return labels;
        }
        let mut kept = vec![false; labels.len()];
        for index in rand::seq::index::sample(rng, labels.len(), keep) {
            kept[index] = true;
        }
        labels
            .into_iter()
            .zip(kept)
            .filter_map(|(label, keep)| keep.then_some(label))
            .collect()
    }

    /// Estimated number of leaves below a child of a node at `level`,
    /// `(q^{Σπ(X_i)})^{height - level}`, saturating.
    fn leaves_below(&self, level: usize) -> u128 {
        let (i, _) = self.parameters.epsilon()[level - 1];
        let q = self.parameters.field().order() as u128;
        let exponent = self.parameters.share_size_of_minimal_set(i) as u128
            * (self.height() - level) as u128;
        u32::try_from(exponent)
            .ok()
            .and_then(|e| q.checked_pow(e))
            .unwrap_or(u128::MAX)
    }

    /// The unit vector `e_j` of the secret space.
    fn secret_unit(&self, j: usize) -> Array1<u32> {
        let mut e = Array1::zeros(self.parameters.secret_size());
        e[j - 1] = 1;
        e
    }
}
