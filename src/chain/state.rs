//! State representation

use std::fmt;

/// A state in the chain.
///
/// Transparent wrapper around caller data; two states are the same node
/// exactly when their payloads are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct State<T> {
    pub data: T,
}

impl<T> State<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T> From<T> for State<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: fmt::Display> fmt::Display for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.data.fmt(f)
    }
}
