use std::fmt;

/// A single forecast row that could not be turned into a sample
#[derive(Debug)]
pub enum RowParseError {
    Timestamp(String),
    KpIndex(String),
}

impl fmt::Display for RowParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RowParseError::Timestamp(e) => write!(f, "RowParseError::Timestamp: {}", e),
            RowParseError::KpIndex(e) => write!(f, "RowParseError::KpIndex: {}", e),
        }
    }
}
