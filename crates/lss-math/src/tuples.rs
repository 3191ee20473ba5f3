//! Enumeration of the tuples of field elements of a given length.
//!
//! Tuples are enumerated in lexicographic order, last coordinate fastest, and
//! can also be addressed directly by their index in that order.

use crate::gf::Field;

/// Iterator over `GF(q)^len` in lexicographic order.
///
/// A length of zero yields exactly one (empty) tuple.
#[derive(Debug, Clone)]
pub struct Tuples {
    order: u32,
    current: Option<Vec<u32>>,
}

impl Iterator for Tuples {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Self::Item> {
        let out = self.current.take()?;
        let mut next = out.clone();
        for digit in next.iter_mut().rev() {
            *digit += 1;
            if *digit < self.order {
                self.current = Some(next);
                return Some(out);
            }
            *digit = 0;
        }
        // Every digit wrapped around: `out` was the last tuple.
        Some(out)
    }
}

impl Field {
    /// Iterates over all the tuples of length `len`.
    pub fn tuples(&self, len: usize) -> Tuples {
        Tuples {
            order: self.order(),
            current: Some(vec![0; len]),
        }
    }

    /// Number of tuples of length `len`, if it fits in a `u128`.
    pub fn tuple_count(&self, len: usize) -> Option<u128> {
        (self.order() as u128).checked_pow(u32::try_from(len).ok()?)
    }

    /// Returns the tuple at position `index` of the enumeration order of
    /// [`Field::tuples`]; the first coordinate is the most significant digit.
    pub fn tuple_at(&self, mut index: u128, len: usize) -> Vec<u32> {
        let q = self.order() as u128;
        let mut out = vec![0u32; len];
        for digit in out.iter_mut().rev() {
            *digit = (index % q) as u32;
            index /= q;
        }
        debug_assert_eq!(index, 0, "tuple index out of range");
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::gf::Field;
    use std::error::Error;

    #[test]
    fn enumeration_order() -> Result<(), Box<dyn Error>> {
        let field = Field::new(3)?;
        let all = field.tuples(2).collect::<Vec<_>>();
        assert_eq!(all.len(), 9);
        assert_eq!(all[0], vec![0, 0]);
        assert_eq!(all[1], vec![0, 1]);
        assert_eq!(all[3], vec![1, 0]);
        assert_eq!(all[8], vec![2, 2]);
        Ok(())
    }

    #[test]
    fn empty_tuple() -> Result<(), Box<dyn Error>> {
        let field = Field::new(2)?;
        assert_eq!(field.tuples(0).collect::<Vec<_>>(), vec![Vec::<u32>::new()]);
        assert_eq!(field.tuple_count(0), Some(1));
        Ok(())
    }

    #[test]
    fn indexing_matches_iteration() -> Result<(), Box<dyn Error>> {
        for order in [2, 4, 5] {
            let field = Field::new(order)?;
            let count = field.tuple_count(3).unwrap();
            assert_eq!(field.tuples(3).count() as u128, count);
            for (i, t) in field.tuples(3).enumerate() {
                assert_eq!(field.tuple_at(i as u128, 3), t);
            }
        }
        Ok(())
    }

    #[test]
    fn count_overflow() -> Result<(), Box<dyn Error>> {
        let field = Field::new(1 << 16)?;
        assert_eq!(field.tuple_count(7), Some(1u128 << 112));
        assert_eq!(field.tuple_count(8), None);
        Ok(())
    }
}
