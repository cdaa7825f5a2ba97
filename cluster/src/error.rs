use std::num::ParseIntError;

use thiserror::Error;

/// Errors that abort a cluster file read or write.
///
/// Malformed feature entries are not errors; they are reported through the
/// [`Logger`](crate::Logger) and dropped.
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("cluster: io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cluster: line {line}: invalid cluster id {value:?}: {source}")]
    InvalidClusterId {
        line: usize,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("cluster: line {line}: missing {field} field")]
    MissingField { line: usize, field: &'static str },

    #[error("cluster: {field} identifier not found in index")]
    UnknownId { field: &'static str },
}

/// Result type for cluster file operations.
pub type Result<T> = std::result::Result<T, ClusterError>;
