use crate::block_vector::BlockVector;
use ndarray::Array2;
use std::collections::{BTreeMap, BTreeSet};

/// The label of an edge of the search tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeLabel {
    /// The linear span of the labels on the path, restricted to the node;
    /// admissibility is decided by the closure rule.
    Span,

    /// A single concrete vector.
    Vector(BlockVector),
}

/// The state of a branch of the search tree at a node.
///
/// Every child owns its own copy; siblings never share matrices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchState {
    /// Level of the node, `1..=height`, or `height + 1` at a leaf.
    pub(crate) level: usize,

    /// Concrete labels on the path, keyed by the `(i, j)` pair of their level.
    pub(crate) s_m: BTreeMap<(usize, usize), BlockVector>,

    /// Levels on the path whose label is a concrete vector.
    pub(crate) s_n: BTreeSet<usize>,

    /// The matrices `A_i`, one per maximal forbidden set.
    pub(crate) a: Vec<Array2<u32>>,

    /// The matrices `B_i`, one per maximal forbidden set.
    pub(crate) b: Vec<Array2<u32>>,

    /// Committed candidate vectors, one per level above the node.
    pub(crate) ca: Vec<BlockVector>,
}

impl BranchState {
    /// Level of the node.
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Candidate vectors committed on the path.
    pub fn candidates(&self) -> &[BlockVector] {
        &self.ca
    }

    /// Levels on the path labelled by a concrete vector.
    pub fn singleton_levels(&self) -> &BTreeSet<usize> {
        &self.s_n
    }

    /// Concrete labels on the path.
    pub fn labels(&self) -> impl Iterator<Item = &BlockVector> {
        self.s_m.values()
    }

    /// Bytes identifying the branch: its level, concrete levels and
    /// committed vectors.
    pub fn descriptor(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(16 + 8 * self.s_n.len() + 4 * self.ca.iter().map(|c| c.len()).sum::<usize>());
        bytes.extend_from_slice(&(self.level as u64).to_le_bytes());
        bytes.extend_from_slice(&(self.s_n.len() as u64).to_le_bytes());
        for m in &self.s_n {
            bytes.extend_from_slice(&(*m as u64).to_le_bytes());
        }
        for c in &self.ca {
            for v in c.values() {
                bytes.extend_from_slice(&v.to_le_bytes());
            }
        }
        bytes
    }
}
