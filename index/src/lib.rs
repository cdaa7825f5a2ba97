//! Token identifier indexes.
//!
//! Cluster files name every node, feature and cluster subject by a raw string.
//! An [`Index`] turns those strings into identifiers of a caller-chosen type:
//!
//! - [`IdentityIndex`]: the identifier is the string itself (handy for debugging)
//! - [`StringIndex`]: compact [`TokenId`]s assigned in first-encounter order
//!
//! # Example
//!
//! ```rust
//! use wsi_index::{Index, StringIndex};
//!
//! let mut index = StringIndex::new();
//! let bank = index.get_index("bank");
//! let river = index.get_index("river");
//!
//! assert_eq!(index.get_index("bank"), bank);
//! assert_ne!(bank, river);
//! assert_eq!(index.token(&river), Some("river"));
//! ```
//!
//! Indexes only grow. A long-running process should scope an index to a batch
//! of files and drop it afterwards.

mod identity;
mod project;
mod string_index;

use std::hash::Hash;

pub use identity::IdentityIndex;
pub use project::{map_keys, map_seq, map_set, resolve_all};
pub use string_index::{StringIndex, TokenId};

/// Bidirectional mapping between raw tokens and identifiers.
pub trait Index {
    /// Identifier type handed out for each distinct token.
    type Id: Clone + Eq + Hash;

    /// Returns the identifier for `token`, creating one on first encounter.
    ///
    /// The same token always yields the same identifier for the lifetime of
    /// the index.
    fn get_index(&mut self, token: &str) -> Self::Id;

    /// Returns the token an identifier stands for, or `None` if this index
    /// never handed it out.
    fn token<'a>(&'a self, id: &'a Self::Id) -> Option<&'a str>;
}
