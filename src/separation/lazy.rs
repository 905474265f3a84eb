use fxhash::FxHashSet;
use log::debug;
use rand::Rng;
use rand_pcg::Pcg64Mcg;

use super::*;
use crate::graph::*;

/// Constraint-injection interface of the host modeling layer. Submitting
/// `subtour` means enforcing that at least two selected edges leave its node
/// set, for the remainder of the search.
pub trait CutSink {
    type Error: std::fmt::Display;

    fn add_subtour_cut(&mut self, subtour: &[Node]) -> Result<(), Self::Error>;
}

/// Subtour-elimination inequality over the node set of one proper-subset
/// cycle: the number of selected edges with exactly one endpoint in the set
/// must be at least 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtourCut {
    nodes: Vec<Node>,
    in_set: Vec<bool>,
}

impl SubtourCut {
    fn from_cycle(cycle: &Cycle, number_of_nodes: NumNodes) -> Self {
        let mut in_set = vec![false; number_of_nodes as usize];
        for u in cycle.iter() {
            in_set[u as usize] = true;
        }

        Self {
            nodes: cycle.nodes().to_vec(),
            in_set,
        }
    }

    pub fn number_of_nodes(&self) -> NumNodes {
        self.in_set.len() as NumNodes
    }

    /// Nodes of the eliminated subtour, in cycle order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> NumNodes {
        self.nodes.len() as NumNodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, u: Node) -> bool {
        self.in_set[u as usize]
    }

    /// All normalized edges with exactly one endpoint inside the subtour, i.e.
    /// the support of the inequality's left-hand side.
    pub fn boundary_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.nodes.iter().flat_map(move |&u| {
            (0..self.number_of_nodes())
                .filter(move |&v| !self.in_set[v as usize])
                .map(move |v| Edge(u, v).normalized())
        })
    }

    /// Number of selected boundary edges under `selection`
    pub fn selected_boundary_edges<S: EdgeSelection + ?Sized>(&self, selection: &S) -> NumEdges {
        self.boundary_edges()
            .filter(|&Edge(u, v)| selection.is_selected(u, v))
            .count() as NumEdges
    }

    /// *true* exactly if `selection` picks fewer than two boundary edges and
    /// therefore violates the inequality
    pub fn is_violated_by<S: EdgeSelection + ?Sized>(&self, selection: &S) -> bool {
        debug_assert_eq!(selection.number_of_nodes(), self.number_of_nodes());
        self.selected_boundary_edges(selection) < 2
    }
}

/// Result of one incumbent-callback round
#[derive(Debug, Clone, PartialEq)]
pub enum Separation {
    /// The incumbent is a single Hamiltonian cycle (or the instance is
    /// empty); no cut is needed.
    Tour,
    /// A violated subtour-elimination cut was produced
    Violated(SubtourCut),
    /// The selected subtour's node set was cut in an earlier round and the
    /// resubmission was suppressed (only with the cut cache enabled)
    AlreadyCut(SubtourCut),
}

enum CycleChooser<R> {
    Shortest,
    Longest,
    Random(R),
}

/// Per-solve separation state: decomposes each incumbent into cycles, picks
/// one according to the configured policy and turns it into a lazy cut.
/// Stateless across callback invocations except for statistics and the
/// optional already-cut cache.
pub struct SubtourSeparator<R: Rng = Pcg64Mcg> {
    chooser: CycleChooser<R>,
    cache_cuts: bool,
    cut_sets: FxHashSet<Vec<Node>>,
    num_callbacks: usize,
    num_cuts: usize,
}

impl SubtourSeparator {
    /// Separator for a deterministic policy. [`SelectionPolicy::Random`] is
    /// refused here so that a missing random source surfaces before the solve
    /// begins; use [`SubtourSeparator::with_rng`] for it.
    pub fn new(policy: SelectionPolicy) -> Result<Self, SeparationError> {
        match policy {
            SelectionPolicy::Shortest => Ok(Self::from_chooser(CycleChooser::Shortest)),
            SelectionPolicy::Longest => Ok(Self::from_chooser(CycleChooser::Longest)),
            SelectionPolicy::Random => Err(SeparationError::MissingRandomSource),
        }
    }
}

impl<R: Rng> SubtourSeparator<R> {
    pub fn with_rng(policy: SelectionPolicy, rng: R) -> Self {
        Self::from_chooser(match policy {
            SelectionPolicy::Shortest => CycleChooser::Shortest,
            SelectionPolicy::Longest => CycleChooser::Longest,
            SelectionPolicy::Random => CycleChooser::Random(rng),
        })
    }

    fn from_chooser(chooser: CycleChooser<R>) -> Self {
        Self {
            chooser,
            cache_cuts: false,
            cut_sets: FxHashSet::default(),
            num_callbacks: 0,
            num_cuts: 0,
        }
    }

    /// Suppresses resubmission of node sets that were already cut. Purely an
    /// optimization for hosts that keep earlier lazy cuts active.
    pub fn with_cut_cache(mut self) -> Self {
        self.cache_cuts = true;
        self
    }

    pub fn policy(&self) -> SelectionPolicy {
        match self.chooser {
            CycleChooser::Shortest => SelectionPolicy::Shortest,
            CycleChooser::Longest => SelectionPolicy::Longest,
            CycleChooser::Random(_) => SelectionPolicy::Random,
        }
    }

    /// Number of incumbents seen so far
    pub fn num_callbacks(&self) -> usize {
        self.num_callbacks
    }

    /// Number of violated cuts produced so far
    pub fn num_cuts(&self) -> usize {
        self.num_cuts
    }

    /// One separation round: decompose the incumbent, pick a cycle, decide.
    /// Does not talk to the host; see [`SubtourSeparator::separate_into`] for
    /// the full callback protocol.
    pub fn separate<S: EdgeSelection + ?Sized>(
        &mut self,
        incumbent: &S,
    ) -> Result<Separation, SeparationError> {
        self.num_callbacks += 1;

        let cover = decompose_cycles(incumbent)?;

        let cycle = match &mut self.chooser {
            CycleChooser::Shortest => cover.shortest(),
            CycleChooser::Longest => cover.longest(),
            CycleChooser::Random(rng) => cover.choose(rng),
        };

        let Some(cycle) = cycle else {
            return Ok(Separation::Tour); // nothing to cut on the empty instance
        };

        if cycle.len() == cover.number_of_nodes() {
            debug!(
                "incumbent {} is a full tour over {} nodes",
                self.num_callbacks,
                cover.number_of_nodes()
            );
            return Ok(Separation::Tour);
        }

        let cut = SubtourCut::from_cycle(cycle, cover.number_of_nodes());

        if self.cache_cuts {
            let mut key = cut.nodes().to_vec();
            key.sort_unstable();
            if !self.cut_sets.insert(key) {
                debug!("suppressing duplicate cut over {} nodes", cut.len());
                return Ok(Separation::AlreadyCut(cut));
            }
        }

        debug!(
            "incumbent {} decomposes into {} cycles, cutting one of {} nodes",
            self.num_callbacks,
            cover.number_of_cycles(),
            cut.len()
        );

        self.num_cuts += 1;
        Ok(Separation::Violated(cut))
    }

    /// Full per-incumbent protocol: separate and, if a violated cut came out,
    /// inject it into the host via `sink`. Sink failures pass through
    /// unchanged as [`CallbackError::Sink`].
    pub fn separate_into<S: EdgeSelection + ?Sized, C: CutSink>(
        &mut self,
        incumbent: &S,
        sink: &mut C,
    ) -> Result<Separation, CallbackError<C::Error>> {
        let separation = self.separate(incumbent)?;

        if let Separation::Violated(cut) = &separation {
            sink.add_subtour_cut(cut.nodes()).map_err(CallbackError::Sink)?;
        }

        Ok(separation)
    }
}
