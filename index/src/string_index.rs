use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Index;

/// Compact identifier handed out by [`StringIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(u32);

impl TokenId {
    /// Returns the raw numeric value.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Interning [`Index`] that assigns dense [`TokenId`]s in first-encounter order.
///
/// Serializes as the list of tokens in id order, so a persisted index reloads
/// with the same identifiers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct StringIndex {
    ids: HashMap<String, TokenId>,
    tokens: Vec<String>,
}

impl StringIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a token without assigning a new identifier.
    pub fn get(&self, token: &str) -> Option<TokenId> {
        self.ids.get(token).copied()
    }

    /// Returns the number of distinct tokens seen so far.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if no token has been indexed.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterates `(id, token)` pairs in id order.
    pub fn tokens(&self) -> impl Iterator<Item = (TokenId, &str)> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (TokenId(i as u32), t.as_str()))
    }
}

impl Index for StringIndex {
    type Id = TokenId;

    /// # Panics
    /// Panics once more than `u32::MAX` distinct tokens have been indexed.
    fn get_index(&mut self, token: &str) -> TokenId {
        if let Some(&id) = self.ids.get(token) {
            return id;
        }
        assert!(
            self.tokens.len() < u32::MAX as usize,
            "wsi-index: identifier space exhausted"
        );
        let id = TokenId(self.tokens.len() as u32);
        self.tokens.push(token.to_string());
        self.ids.insert(token.to_string(), id);
        id
    }

    fn token<'a>(&'a self, id: &'a TokenId) -> Option<&'a str> {
        self.tokens.get(id.0 as usize).map(String::as_str)
    }
}

impl From<Vec<String>> for StringIndex {
    fn from(tokens: Vec<String>) -> Self {
        let mut ids = HashMap::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            // A duplicate keeps its first id; later slots still render.
            ids.entry(token.clone()).or_insert(TokenId(i as u32));
        }
        Self { ids, tokens }
    }
}

impl From<StringIndex> for Vec<String> {
    fn from(index: StringIndex) -> Self {
        index.tokens
    }
}
