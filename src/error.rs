//! This module defines all error types used throughout the crate.

use std::fmt::Debug;
use thiserror::Error;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    /// The graph has no states to start from (or no graph was supplied)
    #[error("Transition graph is empty")]
    EmptyGraph,

    /// A step was requested without a graph
    #[error("Transition graph is nil")]
    NilGraph,

    /// The state was never the source of a recorded transition
    #[error("Unknown state: {0}")]
    UnknownState(String),

    /// The state is known but has no outgoing transitions
    #[error("No transitions for state: {0}")]
    NoTransitions(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an unknown-state error for the given state
    pub fn unknown_state(state: &impl Debug) -> Self {
        Self::UnknownState(format!("{:?}", state))
    }

    /// Create a no-transitions error for the given state
    pub fn no_transitions(state: &impl Debug) -> Self {
        Self::NoTransitions(format!("{:?}", state))
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Check if error means the graph had nothing to sample from
    pub fn is_empty_graph(&self) -> bool {
        matches!(self, Error::EmptyGraph | Error::NilGraph)
    }

    /// Check if error means a walk cannot continue from the current state.
    ///
    /// Both `UnknownState` and `NoTransitions` qualify: callers that do not
    /// care why a walk stopped can branch on this alone.
    pub fn is_dead_end(&self) -> bool {
        matches!(self, Error::UnknownState(_) | Error::NoTransitions(_))
    }
}
