use std::fmt;
use std::fmt::Formatter;

#[derive(Debug)]
pub enum DBError {
    StoreUnavailable(String),
    Query(String),
}

impl fmt::Display for DBError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DBError::StoreUnavailable(e) => write!(f, "DBError::StoreUnavailable: {}", e),
            DBError::Query(e) => write!(f, "DBError::Query: {}", e),
        }
    }
}
impl From<rusqlite::Error> for DBError {
    fn from(err: rusqlite::Error) -> Self { DBError::Query(err.to_string()) }
}
