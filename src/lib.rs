//! Markov Walk
//!
//! A small first-order Markov chain over arbitrary hashable states.
//!
//! This library provides functionality for:
//! - Recording weighted transitions between caller-defined states
//! - Sampling a random starting state and stepping the chain
//! - Running bounded random walks
//! - Inspecting the structure of a chain
//!
//! All operations are safe to call concurrently on a shared graph.
//!
//! ```
//! use markov_walk::{State, TransitionGraph};
//!
//! let graph = TransitionGraph::with_seed(7);
//! graph.add_sequence(["the", "cat", "sat"].map(State::new));
//!
//! let next = graph.transition(&State::new("the")).unwrap();
//! assert_eq!(next, State::new("cat"));
//! ```

pub mod chain;
pub mod config;
pub mod error;

pub use chain::{State, TransitionGraph, random_state, transition};
pub use config::Config;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging with the given log level
///
/// `RUST_LOG` takes precedence over `level` when set. Fails if a global
/// subscriber is already installed.
pub fn init_logging(level: &str) -> Result<()> {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| Error::config(format!("Failed to initialize logging: {}", e)))
}
