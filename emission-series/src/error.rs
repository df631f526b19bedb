use thiserror::Error;

/// The statistics payload broke its contract, a record can't be charted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataContractError {
    #[error("record {index} is missing required field `{field}`: {record}")]
    MissingField {
        index: usize,
        field: &'static str,
        record: String,
    },
    #[error("record {index} has an invalid `{field}` ({reason}): {record}")]
    InvalidField {
        index: usize,
        field: &'static str,
        reason: &'static str,
        record: String,
    },
}

impl DataContractError {
    /// Index of the offending record in the raw series
    pub fn index(&self) -> usize {
        match self {
            Self::MissingField { index, .. } | Self::InvalidField { index, .. } => *index,
        }
    }
}
