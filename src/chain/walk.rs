//! Random walks over a transition graph

use crate::Result;
use crate::chain::{State, TransitionGraph};
use rand::Rng;
use std::fmt::Debug;
use std::hash::Hash;
use std::iter::FusedIterator;

/// Iterator over the states visited by a random walk.
///
/// Yields the starting state first, then one state per transition, feeding
/// each result back in as the next `current` state. The walk ends after
/// `max_steps` transitions or right after the first error, so a walk that
/// reaches a dead end yields that error as its last item.
///
/// Each step takes the graph's locks independently; transitions recorded by
/// other threads while the walk is running are picked up by later steps.
pub struct Walk<'a, T, R> {
    graph: &'a TransitionGraph<T, R>,
    current: Option<State<T>>,
    started: bool,
    remaining: usize,
    done: bool,
}

impl<'a, T, R> Walk<'a, T, R>
where
    T: Eq + Hash + Clone + Debug,
    R: Rng,
{
    pub(crate) fn new(
        graph: &'a TransitionGraph<T, R>,
        start: Option<State<T>>,
        max_steps: usize,
    ) -> Self {
        Self {
            graph,
            current: start,
            started: false,
            remaining: max_steps,
            done: false,
        }
    }

    /// The state the walk is currently at, if it has started
    pub fn current(&self) -> Option<&State<T>> {
        if self.started {
            self.current.as_ref()
        } else {
            None
        }
    }

    fn emit(&mut self, result: Result<State<T>>) -> Result<State<T>> {
        match result {
            Ok(state) => {
                self.current = Some(state.clone());
                Ok(state)
            }
            Err(e) => {
                self.done = true;
                Err(e)
            }
        }
    }
}

impl<T, R> Iterator for Walk<'_, T, R>
where
    T: Eq + Hash + Clone + Debug,
    R: Rng,
{
    type Item = Result<State<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if !self.started {
            self.started = true;
            let start = match self.current.take() {
                Some(state) => Ok(state),
                None => self.graph.random_state(),
            };
            return Some(self.emit(start));
        }

        if self.remaining == 0 {
            self.done = true;
            return None;
        }
        self.remaining -= 1;

        let current = self.current.as_ref()?;
        let next = self.graph.transition(current);
        Some(self.emit(next))
    }
}

impl<T, R> FusedIterator for Walk<'_, T, R>
where
    T: Eq + Hash + Clone + Debug,
    R: Rng,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::config::WalkConfig;

    fn s(data: &'static str) -> State<&'static str> {
        State::new(data)
    }

    #[test]
    fn test_walk_stops_at_destination_only_state() {
        let graph = TransitionGraph::with_seed(1);
        graph.add_sequence(["a", "b", "c"].map(State::new));

        let mut walk = graph.walk(Some(s("a")), 10);
        assert_eq!(walk.next().unwrap().unwrap(), s("a"));
        assert_eq!(walk.next().unwrap().unwrap(), s("b"));
        assert_eq!(walk.next().unwrap().unwrap(), s("c"));
        assert!(matches!(walk.next(), Some(Err(Error::UnknownState(_)))));
        assert!(walk.next().is_none());
        assert!(walk.next().is_none());
    }

    #[test]
    fn test_walk_stops_at_state_without_transitions() {
        let graph = TransitionGraph::with_seed(1);
        graph.add_transition(s("a"), s("b"));
        graph.transitions.write().insert(s("b"), Vec::new());

        let items: Vec<_> = graph.walk(Some(s("a")), 10).collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap(), &s("a"));
        assert_eq!(items[1].as_ref().unwrap(), &s("b"));
        assert!(matches!(items[2], Err(Error::NoTransitions(_))));
        assert!(items[2].as_ref().unwrap_err().is_dead_end());
    }

    #[test]
    fn test_walk_respects_max_steps() {
        let graph = TransitionGraph::with_seed(1);
        graph.add_transition(s("a"), s("a"));

        let visited: Vec<_> = graph
            .walk(Some(s("a")), 5)
            .collect::<crate::Result<Vec<_>>>()
            .unwrap();
        assert_eq!(visited.len(), 6);
        assert!(visited.iter().all(|state| *state == s("a")));
    }

    #[test]
    fn test_walk_zero_steps_yields_start_only() {
        let graph = TransitionGraph::with_seed(1);
        graph.add_transition(s("a"), s("b"));

        let visited: Vec<_> = graph.walk(Some(s("a")), 0).collect();
        assert_eq!(visited.len(), 1);
        assert_eq!(visited[0].as_ref().unwrap(), &s("a"));
    }

    #[test]
    fn test_walk_random_start() {
        let graph = TransitionGraph::with_seed(4);
        graph.add_transition(s("only"), s("only"));

        let mut walk = graph.walk(None, 3);
        assert!(walk.current().is_none());
        assert_eq!(walk.next().unwrap().unwrap(), s("only"));
        assert_eq!(walk.current(), Some(&s("only")));
    }

    #[test]
    fn test_walk_on_empty_graph() {
        let graph = TransitionGraph::<&str>::with_seed(0);
        let items: Vec<_> = graph.walk(None, 10).collect();
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(Error::EmptyGraph)));
    }

    #[test]
    fn test_walk_same_seed_same_path() {
        let build = || {
            let graph = TransitionGraph::with_seed(21);
            graph.add_sequence(["a", "b", "a", "c", "a", "b", "b", "c", "c", "a"].map(State::new));
            graph
        };
        let left_graph = build();
        let right_graph = build();

        let left: Vec<_> = left_graph.walk(Some(s("a")), 30).collect::<Vec<_>>();
        let right: Vec<_> = right_graph.walk(Some(s("a")), 30).collect::<Vec<_>>();
        assert_eq!(left.len(), right.len());
        for (l, r) in left.iter().zip(&right) {
            assert_eq!(l.as_ref().unwrap(), r.as_ref().unwrap());
        }
    }

    #[test]
    fn test_walk_from_config() {
        let graph = TransitionGraph::with_seed(2);
        graph.add_transition(s("a"), s("a"));

        let config = WalkConfig { max_steps: 2 };
        assert_eq!(graph.walk_from_config(Some(s("a")), &config).count(), 3);
    }
}
