//! Access structures on a set of participants.
//!
//! An access structure `(Gamma, Delta)` on the participants `P = {1, ..., n}`
//! specifies the subsets that are qualified to reconstruct the secret and the
//! subsets that are forbidden to learn anything about it. Only complete
//! structures are supported, i.e. `Gamma ∪ Delta = 2^P`, so the structure is
//! determined by its minimal qualified sets.

use crate::{Error, Result};
use itertools::Itertools;
use std::fmt::{Debug, Display};

/// A subset of the participants `{1, ..., n}`, stored as a bit mask where
/// participant `i` is bit `i - 1`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ParticipantSet(u32);

impl ParticipantSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// The set of all the participants `{1, ..., n}`.
    pub const fn all(n: usize) -> Self {
        Self(((1u64 << n) - 1) as u32)
    }

    /// Creates a set from its bit mask.
    pub const fn from_mask(mask: u32) -> Self {
        Self(mask)
    }

    /// Creates a set from participant ids, each in `1..=n`.
    pub fn from_ids<I: IntoIterator<Item = usize>>(ids: I, n: usize) -> Result<Self> {
        ids.into_iter().try_fold(Self::empty(), |acc, id| {
            if id == 0 || id > n.min(32) {
                Err(Error::InvalidParticipant(id, n))
            } else {
                Ok(Self(acc.0 | 1 << (id - 1)))
            }
        })
    }

    /// Creates a set from lowercase participant letters, `a` being
    /// participant 1.
    pub fn from_letters(letters: &str, n: usize) -> Result<Self> {
        letters.chars().try_fold(Self::empty(), |acc, c| {
            let id = match c {
                'a'..='z' => c as usize - 'a' as usize + 1,
                _ => return Err(Error::invalid_participant_letter(c, n)),
            };
            if id > n {
                return Err(Error::invalid_participant_letter(c, n));
            }
            Ok(Self(acc.0 | 1 << (id - 1)))
        })
    }

    /// The bit mask of the set.
    pub const fn mask(self) -> u32 {
        self.0
    }

    /// Returns whether participant `id` belongs to the set.
    pub const fn contains(self, id: usize) -> bool {
        id >= 1 && id <= 32 && self.0 & (1 << (id - 1)) != 0
    }

    /// Number of participants in the set.
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns whether the set is empty.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns whether `self ⊆ other`.
    pub const fn is_subset(self, other: Self) -> bool {
        self.0 & !other.0 == 0
    }

    /// The complement of the set in `{1, ..., n}`.
    pub const fn complement(self, n: usize) -> Self {
        Self(Self::all(n).0 & !self.0)
    }

    /// Iterates over the participants of the set in increasing order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (1..=32usize).filter(move |id| self.contains(*id))
    }

    /// The participants of the set as lowercase letters, e.g. `"ac"`.
    pub fn letters(self) -> String {
        self.iter()
            .map(|id| (b'a' + (id - 1) as u8) as char)
            .collect()
    }
}

impl Debug for ParticipantSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Display for ParticipantSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.iter().join(", "))
    }
}

/// A complete monotone access structure.
///
/// The minimal qualified sets are numbered `1..=r` in input order; this order
/// defines the levels of the search tree.
#[derive(Clone, Debug)]
pub struct AccessStructure {
    n: usize,
    gamma_min: Vec<ParticipantSet>,
    delta_max: Vec<ParticipantSet>,
}

impl AccessStructure {
    /// Largest supported number of participants; the power set is enumerated.
    pub const MAX_PARTICIPANTS: usize = 20;

    /// Creates the access structure on `n` participants generated by the
    /// given qualified sets.
    ///
    /// Sets that are supersets or duplicates of another set are dropped, the
    /// remaining ones keep their order. Returns an error if `n` is out of
    /// range, if no set is given, or if a set is empty or contains a
    /// participant outside of `1..=n`.
    pub fn new<I>(n: usize, sets: I) -> Result<Self>
    where
        I: IntoIterator<Item = ParticipantSet>,
    {
        if n == 0 || n > Self::MAX_PARTICIPANTS {
            return Err(Error::invalid_participant_count(
                n,
                Self::MAX_PARTICIPANTS,
            ));
        }
        let sets = sets.into_iter().collect_vec();
        if sets.is_empty() {
            return Err(Error::TooFewValues(0, 1));
        }
        for (i, set) in sets.iter().enumerate() {
            if set.is_empty() {
                return Err(Error::empty_minimal_set(i + 1));
            }
            if !set.is_subset(ParticipantSet::all(n)) {
                let id = (n + 1..=32).find(|id| set.contains(*id)).unwrap_or(n + 1);
                return Err(Error::InvalidParticipant(id, n));
            }
        }

        let gamma_min = sets
            .iter()
            .enumerate()
            .filter(|(i, s)| {
                !sets
                    .iter()
                    .enumerate()
                    .any(|(j, t)| t.is_subset(**s) && (t != *s || j < *i))
            })
            .map(|(_, s)| *s)
            .collect_vec();

        Ok(Self::from_minimal(n, gamma_min))
    }

    /// Creates the access structure from minimal sets given as strings of
    /// lowercase letters, e.g. `["ab", "bc"]`.
    pub fn from_letters<S: AsRef<str>>(n: usize, sets: &[S]) -> Result<Self> {
        let sets = sets
            .iter()
            .map(|s| ParticipantSet::from_letters(s.as_ref(), n))
            .collect::<Result<Vec<_>>>()?;
        Self::new(n, sets)
    }

    /// `gamma_min` must already be an antichain of non-empty sets.
    fn from_minimal(n: usize, gamma_min: Vec<ParticipantSet>) -> Self {
        let is_qualified = |x: ParticipantSet| gamma_min.iter().any(|g| g.is_subset(x));

        // Peel off the forbidden sets of largest cardinality, together with
        // everything they contain, until the pool is empty.
        let mut pool = (0..1u32 << n)
            .map(ParticipantSet)
            .filter(|x| !is_qualified(*x))
            .collect_vec();
        let mut delta_max = vec![];
        while let Some(largest) = pool.iter().map(|x| x.len()).max() {
            let layer = pool
                .iter()
                .filter(|x| x.len() == largest)
                .copied()
                .collect_vec();
            pool.retain(|x| !layer.iter().any(|d| x.is_subset(*d)));
            delta_max.extend(layer);
        }

        Self {
            n,
            gamma_min,
            delta_max,
        }
    }

    /// Number of participants.
    pub const fn n(&self) -> usize {
        self.n
    }

    /// The set of all the participants.
    pub const fn participants(&self) -> ParticipantSet {
        ParticipantSet::all(self.n)
    }

    /// The minimal qualified sets; set `i` has id `i + 1`.
    pub fn gamma_min(&self) -> &[ParticipantSet] {
        &self.gamma_min
    }

    /// The maximal forbidden sets; set `i` has id `i + 1`.
    ///
    /// The order among sets of equal cardinality is unspecified.
    pub fn delta_max(&self) -> &[ParticipantSet] {
        &self.delta_max
    }

    /// Returns whether `set` is qualified.
    pub fn is_qualified(&self, set: ParticipantSet) -> bool {
        self.gamma_min.iter().any(|g| g.is_subset(set))
    }

    /// Iterates over all the qualified sets.
    pub fn gamma(&self) -> impl Iterator<Item = ParticipantSet> + '_ {
        self.power_set().filter(|x| self.is_qualified(*x))
    }

    /// Iterates over all the forbidden sets.
    pub fn delta(&self) -> impl Iterator<Item = ParticipantSet> + '_ {
        self.power_set().filter(|x| !self.is_qualified(*x))
    }

    /// Returns the dual access structure, whose qualified sets are the sets
    /// with a forbidden complement.
    pub fn dual(&self) -> Self {
        let gamma_min = self
            .power_set()
            .filter(|x| self.delta_max.contains(&x.complement(self.n)))
            .collect_vec();
        Self::from_minimal(self.n, gamma_min)
    }

    fn power_set(&self) -> impl Iterator<Item = ParticipantSet> {
        (0..1u32 << self.n).map(ParticipantSet)
    }
}

impl PartialEq for AccessStructure {
    fn eq(&self, other: &Self) -> bool {
        let sorted = |sets: &[ParticipantSet]| sets.iter().copied().sorted().collect_vec();
        self.n == other.n
            && sorted(&self.gamma_min) == sorted(&other.gamma_min)
            && sorted(&self.delta_max) == sorted(&other.delta_max)
    }
}

impl Eq for AccessStructure {}

impl Display for AccessStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A complete access structure on {} participants with minimal qualified sets {}",
            self.n,
            self.gamma_min.iter().map(|g| g.letters()).join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{AccessStructure, ParticipantSet};
    use crate::Error;
    use itertools::Itertools;
    use proptest::prelude::*;
    use std::error::Error as StdError;

    fn sets(n: usize, ids: &[&[usize]]) -> Vec<ParticipantSet> {
        ids.iter()
            .map(|s| ParticipantSet::from_ids(s.iter().copied(), n).unwrap())
            .collect()
    }

    fn sorted(sets: &[ParticipantSet]) -> Vec<ParticipantSet> {
        sets.iter().copied().sorted().collect()
    }

    #[test]
    fn participant_sets() -> Result<(), Box<dyn StdError>> {
        let x = ParticipantSet::from_ids([1, 3], 4)?;
        assert_eq!(x, ParticipantSet::from_letters("ca", 4)?);
        assert_eq!(x.iter().collect_vec(), vec![1, 3]);
        assert_eq!(x.len(), 2);
        assert_eq!(x.letters(), "ac");
        assert_eq!(x.to_string(), "{1, 3}");
        assert_eq!(x.complement(4), ParticipantSet::from_ids([2, 4], 4)?);
        assert!(x.is_subset(ParticipantSet::all(4)));
        assert!(ParticipantSet::empty().is_subset(x));
        assert!(matches!(
            ParticipantSet::from_ids([0], 4),
            Err(Error::InvalidParticipant(0, 4))
        ));
        assert!(matches!(
            ParticipantSet::from_ids([5], 4),
            Err(Error::InvalidParticipant(5, 4))
        ));
        assert!(ParticipantSet::from_letters("e", 4).is_err());
        assert!(ParticipantSet::from_letters("A", 4).is_err());
        Ok(())
    }

    #[test]
    fn delta_max_example() -> Result<(), Box<dyn StdError>> {
        let ac = AccessStructure::new(4, sets(4, &[&[1, 2], &[3, 4], &[2, 3]]))?;
        assert_eq!(ac.gamma_min(), sets(4, &[&[1, 2], &[3, 4], &[2, 3]]));
        assert_eq!(
            sorted(ac.delta_max()),
            sorted(&sets(4, &[&[1, 3], &[1, 4], &[2, 4]]))
        );
        Ok(())
    }

    #[test]
    fn dual_example() -> Result<(), Box<dyn StdError>> {
        let ac = AccessStructure::from_letters(4, &["ab", "cd", "bc"])?;
        let dual = ac.dual();
        assert_eq!(
            sorted(dual.gamma_min()),
            sorted(&sets(4, &[&[1, 3], &[2, 3], &[2, 4]]))
        );
        assert_eq!(dual.dual(), ac);
        assert_ne!(dual, ac);
        Ok(())
    }

    #[test]
    fn self_dual() -> Result<(), Box<dyn StdError>> {
        let ac = AccessStructure::from_letters(5, &["ab", "ac", "ad", "ae", "bcde"])?;
        assert_eq!(ac.dual(), ac);
        Ok(())
    }

    #[test]
    fn threshold() -> Result<(), Box<dyn StdError>> {
        let ac = AccessStructure::from_letters(3, &["ab", "bc"])?;
        assert_eq!(
            sorted(ac.delta_max()),
            sorted(&sets(3, &[&[1, 3], &[2]]))
        );
        assert_eq!(ac.gamma().count(), 3);
        assert_eq!(ac.delta().count(), 5);
        Ok(())
    }

    #[test]
    fn non_minimal_sets_are_dropped() -> Result<(), Box<dyn StdError>> {
        let ac = AccessStructure::from_letters(4, &["abc", "ab", "cd", "ab", "bcd"])?;
        assert_eq!(ac.gamma_min(), sets(4, &[&[1, 2], &[3, 4]]));
        Ok(())
    }

    #[test]
    fn invalid_inputs() {
        assert!(matches!(
            AccessStructure::from_letters::<&str>(3, &[]),
            Err(Error::TooFewValues(0, 1))
        ));
        assert!(matches!(
            AccessStructure::new(0, [ParticipantSet::from_mask(1)]),
            Err(Error::TooFewValues(0, 1))
        ));
        assert!(matches!(
            AccessStructure::from_letters(21, &["a"]),
            Err(Error::TooManyValues(21, 20))
        ));
        assert!(matches!(
            AccessStructure::from_letters(3, &["ab", ""]),
            Err(Error::UnspecifiedInput(_))
        ));
        assert!(matches!(
            AccessStructure::new(3, [ParticipantSet::from_mask(0b1001)]),
            Err(Error::InvalidParticipant(4, 3))
        ));
    }

    fn access_structures() -> impl Strategy<Value = AccessStructure> {
        (1usize..=6).prop_flat_map(|n| {
            prop::collection::vec(1u32..(1 << n), 1..5).prop_map(move |masks| {
                AccessStructure::new(n, masks.into_iter().map(ParticipantSet::from_mask)).unwrap()
            })
        })
    }

    proptest! {
        #[test]
        fn partition_of_the_power_set(ac in access_structures()) {
            let gamma = ac.gamma().collect_vec();
            let delta = ac.delta().collect_vec();
            prop_assert_eq!(gamma.len() + delta.len(), 1 << ac.n());
            prop_assert!(gamma.iter().all(|g| !delta.contains(g)));

            // Gamma is upward closed and Delta is downward closed.
            for x in &gamma {
                for y in ac.participants().iter().map(|i| ParticipantSet::from_mask(x.mask() | 1 << (i - 1))) {
                    prop_assert!(ac.is_qualified(y));
                }
            }
            for x in &delta {
                for i in x.iter() {
                    prop_assert!(!ac.is_qualified(ParticipantSet::from_mask(x.mask() & !(1 << (i - 1)))));
                }
            }
        }

        #[test]
        fn extremal_sets(ac in access_structures()) {
            let gamma = ac.gamma().collect_vec();
            let delta = ac.delta().collect_vec();
            let minimal = gamma
                .iter()
                .filter(|g| !gamma.iter().any(|h| h != *g && h.is_subset(**g)))
                .copied()
                .sorted()
                .collect_vec();
            let maximal = delta
                .iter()
                .filter(|d| !delta.iter().any(|e| e != *d && d.is_subset(*e)))
                .copied()
                .sorted()
                .collect_vec();
            prop_assert_eq!(sorted(ac.gamma_min()), minimal);
            prop_assert_eq!(sorted(ac.delta_max()), maximal);
        }

        #[test]
        fn dual_is_involutive(ac in access_structures()) {
            prop_assert_eq!(ac.dual().dual(), ac);
        }
    }
}
