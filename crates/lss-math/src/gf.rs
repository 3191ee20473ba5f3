//! Arithmetic in the finite field GF(q) for a prime power q = p^m.
//!
//! Elements are the integers `0..q`. The base-p digits of an element, lowest
//! first, are the coefficients of a polynomial over GF(p) reduced modulo a
//! primitive polynomial of degree m, so that for a prime q the arithmetic is
//! plain arithmetic modulo q. Multiplication and inversion go through
//! exponent/logarithm tables of the generator `x`.

use crate::{Error, Result};
use lss_util::prime_power;
use std::fmt::Debug;
use std::ops::Range;

/// Largest supported field order.
pub const MAX_ORDER: u64 = 1 << 16;

/// The finite field GF(q).
#[derive(Clone, PartialEq, Eq)]
pub struct Field {
    order: u32,
    characteristic: u32,
    degree: u32,

    /// Low coefficients of the monic defining polynomial, lowest degree first.
    modulus: Box<[u32]>,

    /// `exp[i]` is `x^i` for `i` in `0..q-1`.
    exp: Box<[u32]>,

    /// `log[exp[i]] == i`; `log[0]` is unused.
    log: Box<[u32]>,
}

impl Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("order", &self.order)
            .field("modulus", &self.modulus)
            // .field("exp", &self.exp)
            // .field("log", &self.log)
            .finish()
    }
}

impl Field {
    /// Creates the field of the given order.
    ///
    /// Returns an error if the order is not a prime power, or if it is larger
    /// than [`MAX_ORDER`].
    pub fn new(order: u64) -> Result<Self> {
        let (p, m) = prime_power(order).ok_or(Error::NotPrimePower(order))?;
        if order > MAX_ORDER {
            return Err(Error::UnsupportedOrder(order, MAX_ORDER));
        }
        let (q, p) = (order as u32, p as u32);

        // The first candidate whose powers of x exhaust the non-zero elements
        // is primitive, hence irreducible.
        for candidate in 1..q {
            let modulus = to_digits(candidate, p, m);
            if modulus[0] == 0 {
                continue;
            }
            if let Some(exp) = powers_of_x(&modulus, p, q) {
                let mut log = vec![0u32; q as usize];
                for (i, e) in exp.iter().enumerate() {
                    log[*e as usize] = i as u32;
                }
                return Ok(Self {
                    order: q,
                    characteristic: p,
                    degree: m,
                    modulus: modulus.into_boxed_slice(),
                    exp: exp.into_boxed_slice(),
                    log: log.into_boxed_slice(),
                });
            }
        }

        Err(Error::Default(format!(
            "No primitive polynomial of degree {m} over GF({p})"
        )))
    }

    /// Returns the order q of the field.
    pub const fn order(&self) -> u32 {
        self.order
    }

    /// Returns the characteristic p of the field.
    pub const fn characteristic(&self) -> u32 {
        self.characteristic
    }

    /// Returns the extension degree m, with q = p^m.
    pub const fn degree(&self) -> u32 {
        self.degree
    }

    /// Returns the low coefficients of the defining polynomial.
    pub fn modulus(&self) -> &[u32] {
        &self.modulus
    }

    /// Iterates over all the elements of the field, zero first.
    pub fn elements(&self) -> Range<u32> {
        0..self.order
    }

    /// Returns whether `a` is an element of the field.
    pub const fn contains(&self, a: u32) -> bool {
        a < self.order
    }

    /// Converts an integer into a field element, checking the range.
    pub fn element(&self, value: u64) -> Result<u32> {
        if value < self.order as u64 {
            Ok(value as u32)
        } else {
            Err(Error::InvalidElement(
                value.min(u32::MAX as u64) as u32,
                self.order,
            ))
        }
    }

    /// Adds two elements.
    pub fn add(&self, a: u32, b: u32) -> u32 {
        debug_assert!(self.contains(a) && self.contains(b));
        if self.characteristic == 2 {
            a ^ b
        } else if self.degree == 1 {
            ((a as u64 + b as u64) % self.order as u64) as u32
        } else {
            self.digitwise(a, b, |x, y| (x + y) % self.characteristic)
        }
    }

    /// Returns the additive inverse of an element.
    pub fn neg(&self, a: u32) -> u32 {
        debug_assert!(self.contains(a));
        if self.characteristic == 2 {
            a
        } else if self.degree == 1 {
            (self.order - a) % self.order
        } else {
            self.digitwise(a, 0, |x, _| (self.characteristic - x) % self.characteristic)
        }
    }

    /// Subtracts `b` from `a`.
    pub fn sub(&self, a: u32, b: u32) -> u32 {
        self.add(a, self.neg(b))
    }

    /// Multiplies two elements.
    pub fn mul(&self, a: u32, b: u32) -> u32 {
        debug_assert!(self.contains(a) && self.contains(b));
        if a == 0 || b == 0 {
            return 0;
        }
        let e = (self.log[a as usize] as usize + self.log[b as usize] as usize)
            % (self.order as usize - 1);
        self.exp[e]
    }

    /// Returns the multiplicative inverse of an element.
    ///
    /// Returns an error if `a` is zero.
    pub fn inv(&self, a: u32) -> Result<u32> {
        if a == 0 {
            Err(Error::DivisionByZero)
        } else {
            Ok(self.inv_nonzero(a))
        }
    }

    /// Inverse of an element known to be non-zero.
    pub(crate) fn inv_nonzero(&self, a: u32) -> u32 {
        debug_assert!(a != 0 && self.contains(a));
        let n = self.order as usize - 1;
        self.exp[(n - self.log[a as usize] as usize) % n]
    }

    /// Raises an element to a power; `0^0` is one.
    pub fn pow(&self, a: u32, e: u64) -> u32 {
        if e == 0 {
            1
        } else if a == 0 {
            0
        } else {
            let n = self.order as u64 - 1;
            self.exp[((self.log[a as usize] as u64 * (e % n)) % n) as usize]
        }
    }

    fn digitwise<F: Fn(u32, u32) -> u32>(&self, mut a: u32, mut b: u32, op: F) -> u32 {
        let p = self.characteristic;
        let mut place = 1u32;
        let mut out = 0u32;
        for _ in 0..self.degree {
            out += op(a % p, b % p) * place;
            a /= p;
            b /= p;
            place *= p;
        }
        out
    }
}

fn to_digits(mut value: u32, p: u32, m: u32) -> Vec<u32> {
    (0..m)
        .map(|_| {
            let d = value % p;
            value /= p;
            d
        })
        .collect()
}

fn from_digits(digits: &[u32], p: u32) -> u32 {
    digits.iter().rev().fold(0, |acc, d| acc * p + d)
}

/// Lists x^0, ..., x^(q-2) modulo the monic polynomial with low coefficients
/// `modulus`, or returns `None` if x does not generate the multiplicative group.
fn powers_of_x(modulus: &[u32], p: u32, q: u32) -> Option<Vec<u32>> {
    let m = modulus.len();
    let mut seen = vec![false; q as usize];
    let mut exp = Vec::with_capacity(q as usize - 1);
    let mut current = vec![0u32; m];
    current[0] = 1;

    for _ in 0..q - 1 {
        let value = from_digits(&current, p);
        if value == 0 || seen[value as usize] {
            return None;
        }
        seen[value as usize] = true;
        exp.push(value);

        // x^m = -(c_0 + c_1 x + ... + c_{m-1} x^{m-1})
        let carry = current[m - 1] as u64;
        current.rotate_right(1);
        current[0] = 0;
        for (c, f) in current.iter_mut().zip(modulus) {
            let reduction = (carry * *f as u64 % p as u64) as u32;
            *c = (*c + p - reduction) % p;
        }
    }

    (from_digits(&current, p) == 1).then_some(exp)
}

#[cfg(test)]
mod tests {
    use super::{Field, MAX_ORDER};
    use crate::Error;
    use proptest::prelude::*;
    use std::error::Error as StdError;

    const ORDERS: &[u64] = &[2, 3, 4, 5, 7, 8, 9, 16, 25, 27, 49, 256];

    #[test]
    fn constructor() {
        for order in ORDERS {
            let field = Field::new(*order).unwrap();
            assert_eq!(field.order() as u64, *order);
            assert_eq!(
                (field.characteristic() as u64).pow(field.degree()),
                *order
            );
        }

        assert_eq!(Field::new(0).err(), Some(Error::NotPrimePower(0)));
        assert_eq!(Field::new(1).err(), Some(Error::NotPrimePower(1)));
        assert_eq!(Field::new(6).err(), Some(Error::NotPrimePower(6)));
        assert_eq!(Field::new(12).err(), Some(Error::NotPrimePower(12)));
        assert_eq!(
            Field::new(1 << 17).err(),
            Some(Error::UnsupportedOrder(1 << 17, MAX_ORDER))
        );
    }

    #[test]
    fn prime_field_is_modular_arithmetic() -> Result<(), Box<dyn StdError>> {
        let field = Field::new(7)?;
        for a in field.elements() {
            for b in field.elements() {
                assert_eq!(field.add(a, b), (a + b) % 7);
                assert_eq!(field.sub(a, b), (a + 7 - b) % 7);
                assert_eq!(field.mul(a, b), (a * b) % 7);
            }
        }
        Ok(())
    }

    #[test]
    fn gf4() -> Result<(), Box<dyn StdError>> {
        // GF(4) = GF(2)[x] / (x^2 + x + 1), elements 0, 1, x = 2, x + 1 = 3.
        let field = Field::new(4)?;
        assert_eq!(field.modulus(), &[1, 1]);
        assert_eq!(field.add(2, 3), 1);
        assert_eq!(field.mul(2, 2), 3);
        assert_eq!(field.mul(2, 3), 1);
        assert_eq!(field.mul(3, 3), 2);
        assert_eq!(field.inv(2)?, 3);
        assert_eq!(field.pow(2, 3), 1);
        Ok(())
    }

    #[test]
    fn inverse_of_zero() -> Result<(), Box<dyn StdError>> {
        let field = Field::new(9)?;
        assert_eq!(field.inv(0).err(), Some(Error::DivisionByZero));
        Ok(())
    }

    #[test]
    fn element_range() -> Result<(), Box<dyn StdError>> {
        let field = Field::new(5)?;
        assert_eq!(field.element(4)?, 4);
        assert_eq!(field.element(5).err(), Some(Error::InvalidElement(5, 5)));
        Ok(())
    }

    proptest! {
        #[test]
        fn field_axioms(order in prop::sample::select(ORDERS.to_vec()), a: u32, b: u32, c: u32) {
            let field = Field::new(order).unwrap();
            let (a, b, c) = (a % field.order(), b % field.order(), c % field.order());

            prop_assert_eq!(field.add(a, b), field.add(b, a));
            prop_assert_eq!(field.mul(a, b), field.mul(b, a));
            prop_assert_eq!(field.add(field.add(a, b), c), field.add(a, field.add(b, c)));
            prop_assert_eq!(field.mul(field.mul(a, b), c), field.mul(a, field.mul(b, c)));
            prop_assert_eq!(
                field.mul(a, field.add(b, c)),
                field.add(field.mul(a, b), field.mul(a, c))
            );
            prop_assert_eq!(field.add(a, field.neg(a)), 0);
            prop_assert_eq!(field.sub(field.add(a, b), b), a);
            if a != 0 {
                prop_assert_eq!(field.mul(a, field.inv(a).unwrap()), 1);
                prop_assert_eq!(field.pow(a, field.order() as u64 - 1), 1);
            }
        }
    }
}
