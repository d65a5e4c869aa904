//! Chain module - Build, sample and inspect transition graphs

use crate::Result;
use rand::Rng;
use std::hash::Hash;

pub mod analyzer;
pub mod graph;
pub mod state;
pub mod walk;

// Re-export key types
pub use analyzer::{ChainPattern, ChainReport, analyze};
pub use graph::{GraphStats, TransitionGraph};
pub use state::State;
pub use walk::Walk;

/// Pick a random starting state from a graph that may be absent.
///
/// An absent graph is reported the same way as an empty one.
pub fn random_state<T, R>(graph: Option<&TransitionGraph<T, R>>) -> Result<State<T>>
where
    T: Eq + Hash + Clone,
    R: Rng,
{
    match graph {
        Some(graph) => graph.random_state(),
        None => Err(crate::Error::EmptyGraph),
    }
}

/// Step the chain once on a graph that may be absent.
pub fn transition<T, R>(graph: Option<&TransitionGraph<T, R>>, current: &State<T>) -> Result<State<T>>
where
    T: Eq + Hash + Clone + std::fmt::Debug,
    R: Rng,
{
    match graph {
        Some(graph) => graph.transition(current),
        None => Err(crate::Error::NilGraph),
    }
}
