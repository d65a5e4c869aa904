//! Chain structure analyzer
//!
//! Summarizes the shape of a transition graph: whether walks run along a
//! single path, branch, or can revisit states, and how many states end a walk.

use super::TransitionGraph;
use petgraph::Direction;
use rand::Rng;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainPattern {
    /// No transitions recorded
    Empty,

    /// A -> B -> C -> D
    Linear,

    /// A -> B
    ///   -> C
    Branching,

    /// A -> B -> A
    Cyclic,
}

impl ChainPattern {
    pub fn display_name(&self) -> &'static str {
        match self {
            ChainPattern::Empty => "Empty",
            ChainPattern::Linear => "Linear",
            ChainPattern::Branching => "Branching",
            ChainPattern::Cyclic => "Cyclic",
        }
    }
}

/// Analysis report containing pattern and metrics
#[derive(Debug, Clone)]
pub struct ChainReport {
    pub pattern: ChainPattern,
    /// Mean number of distinct successors per source state, counting
    /// sources whose edge sequence is empty
    pub branching_factor: f64,
    /// States a walk cannot leave
    pub dead_ends: usize,
    /// States with a transition to themselves
    pub self_loops: usize,
    pub has_cycles: bool,
}

/// Analyze the structure of a transition graph
pub fn analyze<T, R>(chain: &TransitionGraph<T, R>) -> ChainReport
where
    T: Eq + Hash + Clone,
    R: Rng,
{
    let (graph, sources) = chain.snapshot();

    if sources == 0 {
        return ChainReport {
            pattern: ChainPattern::Empty,
            branching_factor: 0.0,
            dead_ends: 0,
            self_loops: 0,
            has_cycles: false,
        };
    }

    // Self loops count as cycles
    let has_cycles = petgraph::algo::is_cyclic_directed(&graph);

    // The snapshot holds one edge per distinct pair, so out-degree is the
    // number of distinct successors
    let out_degrees: Vec<usize> = graph
        .node_indices()
        .map(|idx| graph.edges_directed(idx, Direction::Outgoing).count())
        .collect();

    let branching_factor = out_degrees.iter().sum::<usize>() as f64 / sources as f64;
    let dead_ends = out_degrees.iter().filter(|&&degree| degree == 0).count();
    let self_loops = graph
        .node_indices()
        .filter(|&idx| graph.find_edge(idx, idx).is_some())
        .count();

    let pattern = if has_cycles {
        ChainPattern::Cyclic
    } else if out_degrees.iter().all(|&degree| degree <= 1) {
        ChainPattern::Linear
    } else {
        ChainPattern::Branching
    };

    ChainReport {
        pattern,
        branching_factor,
        dead_ends,
        self_loops,
        has_cycles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::State;

    #[test]
    fn test_empty_chain() {
        let chain = TransitionGraph::<&str>::new();
        let report = analyze(&chain);
        assert_eq!(report.pattern, ChainPattern::Empty);
        assert_eq!(report.dead_ends, 0);
        assert!(!report.has_cycles);
    }

    #[test]
    fn test_linear_chain() {
        let chain = TransitionGraph::new();
        chain.add_sequence(["a", "b", "c", "d"].map(State::new));
        // Repeating an edge does not add a branch
        chain.add_transition(State::new("a"), State::new("b"));

        let report = analyze(&chain);
        assert_eq!(report.pattern, ChainPattern::Linear);
        assert_eq!(report.branching_factor, 1.0);
        assert_eq!(report.dead_ends, 1);
        assert_eq!(report.self_loops, 0);
    }

    #[test]
    fn test_branching_chain() {
        let chain = TransitionGraph::new();
        chain.add_transition(State::new("a"), State::new("b"));
        chain.add_transition(State::new("a"), State::new("c"));

        let report = analyze(&chain);
        assert_eq!(report.pattern, ChainPattern::Branching);
        assert_eq!(report.branching_factor, 2.0);
        assert_eq!(report.dead_ends, 2);
        assert_eq!(report.pattern.display_name(), "Branching");
    }

    #[test]
    fn test_cyclic_chain() {
        let chain = TransitionGraph::new();
        chain.add_sequence(["a", "b", "a"].map(State::new));

        let report = analyze(&chain);
        assert_eq!(report.pattern, ChainPattern::Cyclic);
        assert!(report.has_cycles);
        assert_eq!(report.dead_ends, 0);
    }

    #[test]
    fn test_self_loop() {
        let chain = TransitionGraph::new();
        chain.add_transition(State::new(1), State::new(1));
        chain.add_transition(State::new(1), State::new(2));

        let report = analyze(&chain);
        assert_eq!(report.pattern, ChainPattern::Cyclic);
        assert_eq!(report.self_loops, 1);
        assert_eq!(report.dead_ends, 1);
    }

    #[test]
    fn test_empty_source_counts_towards_branching_factor() {
        let chain = TransitionGraph::new();
        chain.add_transition(State::new("a"), State::new("b"));
        chain.add_transition(State::new("a"), State::new("c"));
        chain.transitions.write().insert(State::new("d"), Vec::new());

        let report = analyze(&chain);
        assert_eq!(report.pattern, ChainPattern::Branching);
        assert_eq!(report.branching_factor, 1.0);
        assert_eq!(report.dead_ends, 3);
    }
}
