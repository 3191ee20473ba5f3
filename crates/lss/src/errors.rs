use thiserror::Error;

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum encapsulating all the possible errors from this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Indicates that an error in the underlying finite-field arithmetic was
    /// encountered.
    #[error("{0}")]
    MathError(#[from] lss_math::Error),

    /// Indicates a participant outside of `1..=n`.
    #[error("Invalid participant {0}: participants are numbered from 1 to {1}")]
    InvalidParticipant(usize, usize),

    /// Indicates a projection onto the empty set of participants.
    #[error("Cannot create a projection on an empty set of participants")]
    EmptyProjection,

    /// Indicates that too few values were provided.
    #[error("Too few values provided: {0} is below limit {1}")]
    TooFewValues(usize, usize),

    /// Indicates that too many values were provided.
    #[error("Too many values provided: {0} exceeds limit {1}")]
    TooManyValues(usize, usize),

    /// Indicates that an input is invalid.
    #[error("{0}")]
    UnspecifiedInput(String),

    /// Indicates an input/output error while writing a report.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Indicates a default error
    #[error("{0}")]
    DefaultError(String),
}

/// Helper functions to create input errors.
impl Error {
    /// Create an error for a participant count outside of the supported range.
    pub fn invalid_participant_count(n: usize, maximum: usize) -> Self {
        if n == 0 {
            Self::TooFewValues(n, 1)
        } else {
            Self::TooManyValues(n, maximum)
        }
    }

    /// Create an error for a participant letter that is not in `a..`.
    pub fn invalid_participant_letter(letter: char, n: usize) -> Self {
        Self::UnspecifiedInput(format!(
            "Invalid participant '{}': expected a letter between 'a' and '{}'",
            letter,
            (b'a' + n.saturating_sub(1).min(25) as u8) as char
        ))
    }

    /// Create an error for an empty minimal qualified set.
    pub fn empty_minimal_set(index: usize) -> Self {
        Self::UnspecifiedInput(format!("Minimal qualified set {} is empty", index))
    }

    /// Create an error for a share-size list that does not match the
    /// participants.
    pub fn share_sizes_mismatch(provided: usize, participants: usize) -> Self {
        Self::UnspecifiedInput(format!(
            "Expected 1 or {} share sizes, found {}",
            participants, provided
        ))
    }

    /// Create an error for a share size of zero.
    pub fn zero_share_size(participant: usize) -> Self {
        Self::UnspecifiedInput(format!(
            "Share size of participant {} must be at least 1",
            participant
        ))
    }

    /// Create an error for a skip fraction outside of `[0, 1)`.
    pub fn invalid_skip(skip: f64) -> Self {
        Self::UnspecifiedInput(format!("Skip fraction {} must be in [0, 1)", skip))
    }

    /// Create an error for a missing builder parameter.
    pub fn missing_parameter(name: &str) -> Self {
        Self::UnspecifiedInput(format!("Missing parameter: {}", name))
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn error_strings() {
        assert_eq!(
            Error::InvalidParticipant(5, 4).to_string(),
            "Invalid participant 5: participants are numbered from 1 to 4"
        );
        assert_eq!(
            Error::EmptyProjection.to_string(),
            "Cannot create a projection on an empty set of participants"
        );
        assert_eq!(
            Error::MathError(lss_math::Error::NotPrimePower(6)).to_string(),
            "Order of the finite field is not a prime power: 6"
        );
        assert_eq!(
            Error::DefaultError("test".to_string()).to_string(),
            "test"
        );
    }

    #[test]
    fn error_helpers() {
        assert_eq!(
            Error::invalid_participant_count(0, 20).to_string(),
            "Too few values provided: 0 is below limit 1"
        );
        assert_eq!(
            Error::invalid_participant_count(21, 20).to_string(),
            "Too many values provided: 21 exceeds limit 20"
        );
        assert_eq!(
            Error::invalid_participant_letter('e', 4).to_string(),
            "Invalid participant 'e': expected a letter between 'a' and 'd'"
        );
        assert_eq!(
            Error::share_sizes_mismatch(2, 3).to_string(),
            "Expected 1 or 3 share sizes, found 2"
        );
        assert_eq!(
            Error::invalid_skip(1.5).to_string(),
            "Skip fraction 1.5 must be in [0, 1)"
        );
    }
}
