//! Projections of token collections through an [`Index`].

use std::collections::{HashMap, HashSet};

use crate::Index;

/// Maps a sequence of tokens to identifiers, preserving order.
pub fn map_seq<I, S>(tokens: impl IntoIterator<Item = S>, index: &mut I) -> Vec<I::Id>
where
    I: Index + ?Sized,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|t| index.get_index(t.as_ref()))
        .collect()
}

/// Maps tokens to a set of identifiers. Duplicates collapse.
pub fn map_set<I, S>(tokens: impl IntoIterator<Item = S>, index: &mut I) -> HashSet<I::Id>
where
    I: Index + ?Sized,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|t| index.get_index(t.as_ref()))
        .collect()
}

/// Maps only the keys of a token-keyed map, keeping the values.
///
/// Keys that collapse to the same identifier keep the last value.
pub fn map_keys<I, S, V>(entries: impl IntoIterator<Item = (S, V)>, index: &mut I) -> HashMap<I::Id, V>
where
    I: Index + ?Sized,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .map(|(k, v)| (index.get_index(k.as_ref()), v))
        .collect()
}

/// Renders identifiers back to tokens, preserving order.
///
/// Returns `None` if any identifier is unknown to the index.
pub fn resolve_all<'a, I>(ids: impl IntoIterator<Item = &'a I::Id>, index: &'a I) -> Option<Vec<&'a str>>
where
    I: Index + ?Sized,
    I::Id: 'a,
{
    ids.into_iter().map(|id| index.token(id)).collect()
}
