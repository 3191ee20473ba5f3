use thiserror::Error;

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum encapsulating all the possible errors from this library.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Indicates that the order of the field is not a prime power.
    #[error("Order of the finite field is not a prime power: {0}")]
    NotPrimePower(u64),

    /// Indicates that the order of the field exceeds the supported range.
    #[error("Unsupported field order {0}: the order must be at most {1}")]
    UnsupportedOrder(u64, u64),

    /// Indicates an invalid unit vector index.
    #[error("Invalid unit vector index {index} for dimension {dim}")]
    InvalidUnitIndex {
        /// The requested (1-based) index.
        index: usize,
        /// The dimension of the vector.
        dim: usize,
    },

    /// Indicates an inversion of zero.
    #[error("Zero has no multiplicative inverse")]
    DivisionByZero,

    /// Indicates a value that is not an element of the field.
    #[error("Value {0} is not an element of GF({1})")]
    InvalidElement(u32, u32),

    /// Indicates a default error
    #[error("{0}")]
    Default(String),
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn error_strings() {
        assert_eq!(
            Error::NotPrimePower(6).to_string(),
            "Order of the finite field is not a prime power: 6"
        );
        assert_eq!(
            Error::InvalidUnitIndex { index: 0, dim: 3 }.to_string(),
            "Invalid unit vector index 0 for dimension 3"
        );
        assert_eq!(
            Error::InvalidElement(5, 4).to_string(),
            "Value 5 is not an element of GF(4)"
        );
        assert_eq!(Error::Default("test".to_string()).to_string(), "test");
    }
}
