use crate::chain::{State, Walk};
use crate::config::{Config, WalkConfig};
use crate::{Error, Result};
use parking_lot::{Mutex, RwLock};
use petgraph::stable_graph::{NodeIndex, StableGraph};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// A first-order Markov chain stored as a transition table.
///
/// Each source state maps to the sequence of every destination recorded for
/// it, in insertion order. A destination recorded `n` times is `n` times as
/// likely to be drawn by [`TransitionGraph::transition`]; there is no separate
/// weight field.
///
/// All methods take `&self`: the table sits behind a reader/writer lock, so a
/// graph can be shared between threads (for example through an `Arc`) and
/// filled and sampled at the same time.
pub struct TransitionGraph<T, R = StdRng> {
    /// Outgoing edges per source state.
    ///
    /// Only `add_transition` and `add_sequence` write here, and only by
    /// appending.
    pub(super) transitions: RwLock<HashMap<State<T>, Vec<State<T>>>>,

    /// Generator shared by all sampling calls, seeded once at construction.
    ///
    /// Always locked after `transitions`, never the other way round.
    rng: Mutex<R>,
}

impl<T> TransitionGraph<T, StdRng>
where
    T: Eq + Hash + Clone,
{
    /// Creates an empty graph whose generator is seeded from OS entropy.
    pub fn new() -> Self {
        tracing::debug!("Seeding transition graph generator from OS entropy");
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates an empty graph with a deterministic generator.
    pub fn with_seed(seed: u64) -> Self {
        tracing::debug!(seed, "Seeding transition graph generator");
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Creates an empty graph seeded according to `config`.
    ///
    /// The seed comes from [`Config::seed`], so `MARKOV_WALK_SEED` takes
    /// precedence over `[chain] seed`. Fails if that variable is not a `u64`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(match config.seed()? {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        })
    }
}

impl<T> Default for TransitionGraph<T, StdRng>
where
    T: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> TransitionGraph<T, R>
where
    T: Eq + Hash + Clone,
    R: Rng,
{
    /// Creates an empty graph that samples with the given generator.
    pub fn with_rng(rng: R) -> Self {
        Self {
            transitions: RwLock::new(HashMap::new()),
            rng: Mutex::new(rng),
        }
    }

    /// Records one occurrence of the transition `from -> to`.
    ///
    /// Adding the same pair again appends another occurrence, raising the
    /// relative probability of `to` when stepping from `from`.
    pub fn add_transition(&self, from: State<T>, to: State<T>) {
        self.transitions.write().entry(from).or_default().push(to);
    }

    /// Records every consecutive pair of an observed sequence.
    ///
    /// Equivalent to calling [`add_transition`](Self::add_transition) for each
    /// pair in order, but the whole sequence lands under one write lock.
    /// Sequences shorter than two states record nothing.
    pub fn add_sequence<I>(&self, states: I)
    where
        I: IntoIterator<Item = State<T>>,
    {
        let mut states = states.into_iter();
        let Some(mut prev) = states.next() else {
            return;
        };

        let mut transitions = self.transitions.write();
        for next in states {
            transitions.entry(prev).or_default().push(next.clone());
            prev = next;
        }
    }

    /// Returns a state chosen uniformly among all source states.
    ///
    /// Every state that has been the `from` side of a transition is equally
    /// likely, however many edges it has.
    pub fn random_state(&self) -> Result<State<T>> {
        let transitions = self.transitions.read();
        let mut rng = self.rng.lock();
        pick_key(&*transitions, &mut *rng)
    }

    /// Same as [`random_state`](Self::random_state), drawing from `rng`
    /// instead of the graph's own generator.
    pub fn random_state_with<G: Rng>(&self, rng: &mut G) -> Result<State<T>> {
        pick_key(&*self.transitions.read(), rng)
    }

    /// Steps the chain once from `current`.
    ///
    /// The successor is drawn uniformly over recorded edge occurrences.
    pub fn transition(&self, current: &State<T>) -> Result<State<T>>
    where
        T: Debug,
    {
        let transitions = self.transitions.read();
        let successors = successors_of(&*transitions, current)?;
        let mut rng = self.rng.lock();
        Ok(successors[rng.gen_range(0..successors.len())].clone())
    }

    /// Same as [`transition`](Self::transition), drawing from `rng` instead of
    /// the graph's own generator.
    pub fn transition_with<G: Rng>(&self, current: &State<T>, rng: &mut G) -> Result<State<T>>
    where
        T: Debug,
    {
        let transitions = self.transitions.read();
        let successors = successors_of(&*transitions, current)?;
        Ok(successors[rng.gen_range(0..successors.len())].clone())
    }

    /// Starts a random walk of at most `max_steps` transitions.
    ///
    /// The walk begins at `start`, or at a [`random_state`](Self::random_state)
    /// when none is given.
    pub fn walk(&self, start: Option<State<T>>, max_steps: usize) -> Walk<'_, T, R>
    where
        T: Debug,
    {
        Walk::new(self, start, max_steps)
    }

    /// Starts a random walk bounded by the configured step limit.
    pub fn walk_from_config(&self, start: Option<State<T>>, config: &WalkConfig) -> Walk<'_, T, R>
    where
        T: Debug,
    {
        self.walk(start, config.max_steps)
    }

    /// Number of distinct source states
    pub fn len(&self) -> usize {
        self.transitions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.read().is_empty()
    }

    /// Total number of recorded edge occurrences
    pub fn edge_count(&self) -> usize {
        self.transitions.read().values().map(Vec::len).sum()
    }

    /// Whether `state` has been the source of a transition
    pub fn contains_state(&self, state: &State<T>) -> bool {
        self.transitions.read().contains_key(state)
    }

    /// Get all source states
    pub fn states(&self) -> Vec<State<T>> {
        self.transitions.read().keys().cloned().collect()
    }

    /// Get the outgoing edges of a state, in insertion order
    pub fn successors(&self, state: &State<T>) -> Option<Vec<State<T>>> {
        self.transitions.read().get(state).cloned()
    }

    /// Get the occurrence count of each destination reachable from `state`.
    ///
    /// Counts are derived from the edge sequence on every call.
    pub fn weights(&self, state: &State<T>) -> Option<HashMap<State<T>, usize>> {
        self.transitions.read().get(state).map(|successors| count(successors))
    }

    /// Get graph statistics
    pub fn stats(&self) -> GraphStats {
        let transitions = self.transitions.read();

        let mut distinct_transitions = 0;
        let mut all_states: HashSet<&State<T>> = HashSet::new();
        for (from, successors) in transitions.iter() {
            all_states.insert(from);
            all_states.extend(successors.iter());
            distinct_transitions += successors.iter().collect::<HashSet<_>>().len();
        }

        let dead_ends = all_states
            .into_iter()
            .filter(|state| transitions.get(*state).is_none_or(Vec::is_empty))
            .count();

        GraphStats {
            total_states: transitions.len(),
            total_transitions: transitions.values().map(Vec::len).sum(),
            distinct_transitions,
            dead_ends,
        }
    }

    /// Build a weighted snapshot of the chain.
    ///
    /// Every state appears once as a node, including states that were only
    /// ever a destination. Each distinct `from -> to` pair becomes one edge
    /// weighted by its number of occurrences.
    pub fn to_petgraph(&self) -> StableGraph<State<T>, usize> {
        self.snapshot().0
    }

    /// Weighted snapshot plus the number of source states, taken under one
    /// read lock so both describe the same table.
    pub(super) fn snapshot(&self) -> (StableGraph<State<T>, usize>, usize) {
        let transitions = self.transitions.read();
        let mut graph = StableGraph::new();
        let mut index: HashMap<&State<T>, NodeIndex> = HashMap::new();

        for (from, successors) in transitions.iter() {
            let from_idx = node_for(&mut graph, &mut index, from);

            let mut weights: HashMap<&State<T>, usize> = HashMap::new();
            for to in successors {
                *weights.entry(to).or_insert(0) += 1;
            }
            for (to, weight) in weights {
                let to_idx = node_for(&mut graph, &mut index, to);
                graph.add_edge(from_idx, to_idx, weight);
            }
        }

        (graph, transitions.len())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStats {
    /// States with at least one recorded transition
    pub total_states: usize,
    /// Edge occurrences, duplicates included
    pub total_transitions: usize,
    /// Distinct `from -> to` pairs
    pub distinct_transitions: usize,
    /// States (sources or destinations) a walk cannot leave
    pub dead_ends: usize,
}

fn pick_key<T, V, G>(transitions: &HashMap<State<T>, V>, rng: &mut G) -> Result<State<T>>
where
    T: Clone,
    G: Rng,
{
    if transitions.is_empty() {
        return Err(Error::EmptyGraph);
    }
    let idx = rng.gen_range(0..transitions.len());
    transitions.keys().nth(idx).cloned().ok_or(Error::EmptyGraph)
}

fn successors_of<'a, T>(
    transitions: &'a HashMap<State<T>, Vec<State<T>>>,
    current: &State<T>,
) -> Result<&'a [State<T>]>
where
    T: Eq + Hash + Debug,
{
    match transitions.get(current) {
        None => Err(Error::unknown_state(&current.data)),
        Some(successors) if successors.is_empty() => Err(Error::no_transitions(&current.data)),
        Some(successors) => Ok(successors.as_slice()),
    }
}

fn node_for<'a, T: Clone>(
    graph: &mut StableGraph<State<T>, usize>,
    index: &mut HashMap<&'a State<T>, NodeIndex>,
    state: &'a State<T>,
) -> NodeIndex
where
    T: Eq + Hash,
{
    *index
        .entry(state)
        .or_insert_with(|| graph.add_node(state.clone()))
}

fn count<T>(successors: &[State<T>]) -> HashMap<State<T>, usize>
where
    T: Eq + Hash + Clone,
{
    let mut counts = HashMap::new();
    for state in successors {
        *counts.entry(state.clone()).or_insert(0) += 1;
    }
    counts
}
