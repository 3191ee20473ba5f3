//! The `d⁺` admissibility test of an edge label.
//!
//! For every maximal forbidden set `D_i` the branch keeps a pair of matrices:
//! `A_i` maps the restriction to `P \ D_i` of every committed vector onto its
//! secret coordinates, and the rows of `B_i` span the annihilator of the
//! restrictions committed so far. A concrete label is admissible iff, for
//! every `D_i`, it either extends the annihilator with a new pivot or agrees
//! with the secret map already fixed by `A_i`.

use super::{BranchState, EdgeLabel, SearchAlgorithm};
use crate::block_vector::BlockVector;
use lss_math::linalg::is_zero;
use lss_util::gcd;
use ndarray::{Array1, Array2};
use rand::Rng;

/// A pseudo-random permutation `t ↦ (a·t + c) mod count` of `0..count`.
struct AffinePermutation {
    count: u128,
    a: u128,
    c: u128,
}

impl AffinePermutation {
    /// `count` must fit in a `u64`.
    fn new<R: Rng + ?Sized>(count: u128, rng: &mut R) -> Self {
        debug_assert!(count >= 1 && count <= u64::MAX as u128);
        if count == 1 {
            return Self { count, a: 1, c: 0 };
        }
        let c = rng.gen_range(0..count as u64) as u128;
        let a = loop {
            let a = rng.gen_range(1..count as u64) as u128;
            if gcd(a, count) == 1 {
                break a;
            }
        };
        Self { count, a, c }
    }

    fn at(&self, t: u128) -> u128 {
        (self.a * t + self.c) % self.count
    }
}

impl SearchAlgorithm {
    /// Tests whether `label` is admissible below the node of `state` and, if
    /// so, returns the state of the child.
    pub(crate) fn d_plus<R: Rng + ?Sized>(
        &self,
        state: &BranchState,
        label: &EdgeLabel,
        rng: &mut R,
    ) -> Option<BranchState> {
        match label {
            EdgeLabel::Vector(c) if !c.is_zero() => self.extend_with_vector(state, c),
            EdgeLabel::Vector(_) => None,
            EdgeLabel::Span => self.extend_by_closure(state, rng),
        }
    }

    /// Rank-one update of the `(A_i, B_i)` pairs for a concrete label.
    fn extend_with_vector(&self, state: &BranchState, label: &BlockVector) -> Option<BranchState> {
        let field = self.parameters.field();
        let (i, j) = self.parameters.epsilon()[state.level - 1];
        let e_j = self.secret_unit(j);

        let mut a = state.a.clone();
        let mut b = state.b.clone();
        for (idx, coordinates) in self.forbidden_complements.iter().enumerate() {
            let c = label.gather(coordinates);
            let f = field.sub_vec(e_j.view(), field.vec_mat(c.view(), state.a[idx].view()).view());
            let cb = field.vec_mat(c.view(), state.b[idx].view());

            match cb.iter().position(|x| *x != 0) {
                Some(pivot) => {
                    let inv = field.inv(cb[pivot]).ok()?;
                    let t = state.b[idx].column(pivot).to_owned();
                    let correction = field.outer(t.view(), field.scale_vec(inv, cb.view()).view());
                    b[idx] = field.sub_mat(state.b[idx].view(), correction.view());
                    if !is_zero(f.view()) {
                        let correction = field.outer(t.view(), field.scale_vec(inv, f.view()).view());
                        a[idx] = field.add_mat(state.a[idx].view(), correction.view());
                    }
                }
                None if !is_zero(f.view()) => return None,
                None => {}
            }
        }

        let mut s_m = state.s_m.clone();
        s_m.insert((i, j), label.clone());
        let mut s_n = state.s_n.clone();
        s_n.insert(state.level);
        let mut ca = state.ca.clone();
        ca.push(label.clone());

        Some(BranchState {
            level: state.level + 1,
            s_m,
            s_n,
            a,
            b,
            ca,
        })
    }

    /// Closure rule: the committed vectors already determine a vector for the
    /// level when some combination `Σ b_m (e_{j_m} ‖ c_m restricted to P \ X_i)`
    /// equals `(e_j ‖ 0)`. The matrices are left untouched.
    fn extend_by_closure<R: Rng + ?Sized>(
        &self,
        state: &BranchState,
        rng: &mut R,
    ) -> Option<BranchState> {
        // The concrete levels must be an unbroken prefix {1, ..., max}.
        let max = *state.s_n.last()?;
        if state.ca.is_empty() || state.s_n.len() != max {
            return None;
        }

        let field = self.parameters.field();
        let epsilon = self.parameters.epsilon();
        let k = self.parameters.secret_size();
        let (i, j) = epsilon[state.level - 1];
        let coordinates = &self.qualified_complements[i - 1];
        let width = k + coordinates.len();

        let mut target = Array1::zeros(width);
        target[j - 1] = 1;
        let rows = Array2::from_shape_fn((max, width), |(m, col)| {
            if col < k {
                u32::from(epsilon[m].1 == col + 1)
            } else {
                state.ca[m].values()[coordinates[col - k]]
            }
        });

        let count = field.tuple_count(max).filter(|c| *c <= u64::MAX as u128)?;
        let order = AffinePermutation::new(count, rng);
        for t in 0..count {
            let scalars = Array1::from(field.tuple_at(order.at(t), max));
            if field.vec_mat(scalars.view(), rows.view()) != target {
                continue;
            }

            let combination = state.ca[..max]
                .iter()
                .zip(&scalars)
                .map(|(c, s)| c.scale(*s))
                .fold(BlockVector::zero(field, self.parameters.share_sizes()), |acc, c| acc.add(&c));
            let mut ca = state.ca.clone();
            ca.push(combination);

            return Some(BranchState {
                level: state.level + 1,
                s_m: state.s_m.clone(),
                s_n: state.s_n.clone(),
                a: state.a.clone(),
                b: state.b.clone(),
                ca,
            });
        }
        None
    }
}
