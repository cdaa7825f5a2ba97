//! Line-level building blocks of the cluster file format.
//!
//! ```text
//! name \t clusterId \t label \t node1  node2 [\t feat:prob:cov  feat:prob:cov]
//! ```

use crate::error::{ClusterError, Result};

/// Separates the top-level fields of a line.
pub const FIELD_SEPARATOR: char = '\t';

/// Separates items inside the node and feature fields.
pub const LIST_SEPARATOR: &str = "  ";

/// Separates the parts of a feature entry.
pub const FEATURE_SEPARATOR: char = ':';

/// Splits a line into its tab-delimited fields.
pub(crate) fn fields(line: &str) -> Vec<&str> {
    line.split(FIELD_SEPARATOR).collect()
}

/// Yields the non-empty items of a double-space separated list.
pub(crate) fn list_items(field: &str) -> impl Iterator<Item = &str> {
    field.split(LIST_SEPARATOR).filter(|item| !item.is_empty())
}

/// Returns field `i`, or a fatal [`ClusterError::MissingField`].
pub(crate) fn required<'a>(
    fields: &[&'a str],
    i: usize,
    field: &'static str,
    line: usize,
) -> Result<&'a str> {
    fields
        .get(i)
        .copied()
        .ok_or(ClusterError::MissingField { line, field })
}

pub(crate) fn parse_cluster_id(value: &str, line: usize) -> Result<i32> {
    value
        .parse()
        .map_err(|source| ClusterError::InvalidClusterId {
            line,
            value: value.to_string(),
            source,
        })
}

/// Resource label of a mapping column: the first list entry up to its first `:`.
pub(crate) fn resource_label(field: &str) -> &str {
    let first = list_items(field).next().unwrap_or("");
    first.split(FEATURE_SEPARATOR).next().unwrap_or("")
}
