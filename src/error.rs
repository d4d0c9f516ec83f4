use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned while configuring or running a dominant color processor.
///
/// Finding no dominant colors at all is not an error; processors return an empty list in that case.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A configuration parameter is outside its valid range.
    #[error("invalid configuration: {parameter} = {value}")]
    InvalidConfiguration { parameter: &'static str, value: String },

    /// A cluster with no pixel mass reached the representative picker. This always indicates a clustering bug.
    #[error("cannot pick a representative color for a cluster with zero total weight")]
    EmptyCluster,

    /// Two inputs that must be parallel have different lengths, such as samples and their foreground mask.
    #[error("input length mismatch: expected {expected}, got {actual}")]
    InputLengthMismatch { expected: usize, actual: usize },
}

impl Error {
    pub(crate) fn invalid(parameter: &'static str, value: impl ToString) -> Self {
        Self::InvalidConfiguration {
            parameter,
            value: value.to_string(),
        }
    }
}
