use crate::Index;

/// Pass-through [`Index`]: every token is its own identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityIndex;

impl IdentityIndex {
    pub fn new() -> Self {
        Self
    }
}

impl Index for IdentityIndex {
    type Id = String;

    fn get_index(&mut self, token: &str) -> String {
        token.to_string()
    }

    fn token<'a>(&'a self, id: &'a String) -> Option<&'a str> {
        Some(id.as_str())
    }
}
