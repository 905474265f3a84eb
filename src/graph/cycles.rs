use rand::Rng;
use smallvec::SmallVec;
use thiserror::Error;

use super::*;
use crate::errors::InvariantCheck;

/// A node whose selected-edge degree is not 2; the incumbent cannot be a
/// disjoint union of simple cycles and the walk is refused up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("node {node} has {degree} selected incident edges, expected exactly 2")]
pub struct MalformedIncumbentError {
    pub node: Node,
    pub degree: NumNodes,
}

/// Simple cycle given as the ordered sequence of its distinct nodes; the
/// closing edge back to the first node is implicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    nodes: Vec<Node>,
}

impl Cycle {
    fn new(nodes: Vec<Node>) -> Self {
        debug_assert!(!nodes.is_empty());
        Self { nodes }
    }

    /// Number of nodes (= number of edges) on the cycle
    pub fn len(&self) -> NumNodes {
        self.nodes.len() as NumNodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = Node> + '_ {
        self.nodes.iter().copied()
    }

    /// Edges of the closed walk, including the one wrapping back to the seed.
    /// A degenerate cycle of fewer than three nodes has no closing edge.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let closing =
            (self.nodes.len() >= 3).then(|| Edge(self.nodes[self.nodes.len() - 1], self.nodes[0]));

        self.nodes
            .windows(2)
            .map(|w| Edge(w[0], w[1]))
            .chain(closing)
    }
}

/// All cycles of one incumbent. Cycles are node-disjoint and jointly cover
/// `0..n`; their order is the order in which seeds were discovered while
/// scanning the nodes upwards from 0. The cover only lives for one callback
/// invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleCover {
    cycles: Vec<Cycle>,
    number_of_nodes: NumNodes,
}

impl CycleCover {
    pub fn number_of_nodes(&self) -> NumNodes {
        self.number_of_nodes
    }

    pub fn number_of_cycles(&self) -> usize {
        self.cycles.len()
    }

    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cycle> + '_ {
        self.cycles.iter()
    }

    /// *true* exactly if the incumbent is a single Hamiltonian cycle
    pub fn is_single_tour(&self) -> bool {
        self.cycles.len() == 1 && self.cycles[0].len() == self.number_of_nodes
    }

    /// Cycle with the fewest nodes; ties go to the earliest discovered one
    pub fn shortest(&self) -> Option<&Cycle> {
        self.cycles
            .iter()
            .reduce(|best, c| if c.len() < best.len() { c } else { best })
    }

    /// Cycle with the most nodes; ties go to the earliest discovered one
    pub fn longest(&self) -> Option<&Cycle> {
        self.cycles
            .iter()
            .reduce(|best, c| if c.len() > best.len() { c } else { best })
    }

    /// Uniformly random cycle using the caller's random source
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Cycle> {
        if self.cycles.is_empty() {
            None
        } else {
            self.cycles.get(rng.gen_range(0..self.cycles.len()))
        }
    }

    /// Additionally to [`InvariantCheck`], verifies that every cycle read as a
    /// closed walk only uses selected edges.
    pub fn check_against<S: EdgeSelection + ?Sized>(
        &self,
        selection: &S,
    ) -> Result<(), CoverInvariantError> {
        self.is_correct()?;

        for cycle in &self.cycles {
            if let Some(edge) = cycle.edges().find(|&Edge(u, v)| !selection.is_selected(u, v)) {
                return Err(CoverInvariantError::UnselectedEdge(edge));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CoverInvariantError {
    #[error("node {0} appears in no cycle")]
    MissingNode(Node),
    #[error("node {0} appears in multiple cycles")]
    DuplicateNode(Node),
    #[error("cycle edge {0:?} is not selected in the incumbent")]
    UnselectedEdge(Edge),
}

impl InvariantCheck<CoverInvariantError> for CycleCover {
    fn is_correct(&self) -> Result<(), CoverInvariantError> {
        let mut seen = vec![false; self.number_of_nodes as usize];

        for node in self.cycles.iter().flat_map(|c| c.iter()) {
            if std::mem::replace(&mut seen[node as usize], true) {
                return Err(CoverInvariantError::DuplicateNode(node));
            }
        }

        match seen.iter().position(|&s| !s) {
            Some(node) => Err(CoverInvariantError::MissingNode(node as Node)),
            None => Ok(()),
        }
    }
}

/// Partitions the nodes of `selection` into the disjoint simple cycles implied
/// by its selected edges. Every node must have exactly two selected incident
/// edges; the degree is checked before the walk starts and a violation aborts
/// with [`MalformedIncumbentError`]. The single-node instance is the one
/// degenerate exception and yields the edgeless cycle `[0]`.
pub fn decompose_cycles<S: EdgeSelection + ?Sized>(
    selection: &S,
) -> Result<CycleCover, MalformedIncumbentError> {
    let n = selection.number_of_nodes();

    if n <= 1 {
        return Ok(CycleCover {
            cycles: (n == 1).then(|| Cycle::new(vec![0])).into_iter().collect(),
            number_of_nodes: n,
        });
    }

    // two neighbor slots per node; a third entry only ever signals a
    // degree violation below
    let mut slots: Vec<SmallVec<[Node; 2]>> = vec![SmallVec::new(); n as usize];
    for u in 0..n {
        for v in (u + 1)..n {
            if selection.is_selected(u, v) {
                slots[u as usize].push(v);
                slots[v as usize].push(u);
            }
        }
    }

    if let Some(node) = (0..n).find(|&u| slots[u as usize].len() != 2) {
        return Err(MalformedIncumbentError {
            node,
            degree: slots[node as usize].len() as NumNodes,
        });
    }

    let mut visited = vec![false; n as usize];
    let mut cycles = Vec::new();
    let mut covered: NumNodes = 0;
    let mut seed: Node = 0;

    while covered < n {
        while visited[seed as usize] {
            seed += 1;
        }

        let mut nodes = Vec::new();
        let mut current = seed;
        loop {
            visited[current as usize] = true;
            nodes.push(current);

            // in a degree-2 graph the walk has at most one way forward; none
            // left means the cycle closed back into the seed
            match slots[current as usize]
                .iter()
                .copied()
                .find(|&v| !visited[v as usize])
            {
                Some(next) => current = next,
                None => break,
            }
        }

        covered += nodes.len() as NumNodes;
        cycles.push(Cycle::new(nodes));
    }

    Ok(CycleCover {
        cycles,
        number_of_nodes: n,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::random_cycle_cover;
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn sorted_node_sets(cover: &CycleCover) -> Vec<Vec<Node>> {
        cover
            .iter()
            .map(|c| c.iter().sorted_unstable().collect_vec())
            .sorted_unstable()
            .collect_vec()
    }

    #[test]
    fn square_is_a_single_tour() {
        let sel = EdgeListSelection::new(4, [(0, 1), (1, 2), (2, 3), (3, 0)]);
        let cover = decompose_cycles(&sel).unwrap();

        assert_eq!(cover.number_of_cycles(), 1);
        assert_eq!(cover.cycles()[0].len(), 4);
        assert!(cover.is_single_tour());
        cover.check_against(&sel).unwrap();
    }

    #[test]
    fn two_triangles() {
        let sel = EdgeListSelection::new(6, [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]);
        let cover = decompose_cycles(&sel).unwrap();

        assert_eq!(cover.number_of_cycles(), 2);
        assert!(!cover.is_single_tour());
        assert_eq!(
            sorted_node_sets(&cover),
            vec![vec![0, 1, 2], vec![3, 4, 5]]
        );

        // seeds are scanned upwards, so the triangle containing node 0 is
        // discovered first
        assert!(cover.cycles()[0].nodes().contains(&0));
        cover.check_against(&sel).unwrap();
    }

    #[test]
    fn single_node_yields_degenerate_cycle() {
        let sel = EdgeListSelection::new(1, Vec::<Edge>::new());
        let cover = decompose_cycles(&sel).unwrap();

        assert_eq!(cover.number_of_cycles(), 1);
        assert_eq!(cover.cycles()[0].nodes(), &[0]);
        assert!(cover.is_single_tour());
    }

    #[test]
    fn empty_instance_yields_empty_cover() {
        let sel = EdgeListSelection::new(0, Vec::<Edge>::new());
        let cover = decompose_cycles(&sel).unwrap();

        assert_eq!(cover.number_of_cycles(), 0);
        assert_eq!(cover.number_of_nodes(), 0);
        assert!(!cover.is_single_tour());
    }

    #[test]
    fn degree_violations_are_refused() {
        // node 3 has degree 1, node 0 has degree 3
        let sel = EdgeListSelection::new(4, [(0, 1), (1, 2), (2, 0), (0, 3)]);
        let err = decompose_cycles(&sel).unwrap_err();
        assert_eq!(err.node, 0);
        assert_eq!(err.degree, 3);

        let sel = EdgeListSelection::new(3, [(0, 1)]);
        let err = decompose_cycles(&sel).unwrap_err();
        assert_eq!(err.node, 0);
        assert_eq!(err.degree, 1);

        // no selected edges at all
        let sel = EdgeListSelection::new(2, Vec::<Edge>::new());
        assert!(decompose_cycles(&sel).is_err());
    }

    #[test]
    fn random_covers_are_partitioned_exactly() {
        let mut rng = Pcg64Mcg::seed_from_u64(0x5eed);

        for _ in 0..300 {
            let n = rng.gen_range(3..60);
            let (sel, sets) = random_cycle_cover(&mut rng, n);

            let cover = decompose_cycles(&sel).unwrap();

            cover.is_correct().unwrap();
            cover.check_against(&sel).unwrap();

            assert_eq!(
                cover.iter().map(|c| c.len()).sum::<NumNodes>(),
                n,
                "cycle lengths must sum to n"
            );

            // same cycles as planted, compared as node sets since walk
            // direction and seed choice are free
            let expected = sets
                .iter()
                .map(|s| s.iter().copied().sorted_unstable().collect_vec())
                .sorted_unstable()
                .collect_vec();
            assert_eq!(sorted_node_sets(&cover), expected);
        }
    }

    #[test]
    fn decomposition_is_deterministic() {
        let mut rng = Pcg64Mcg::seed_from_u64(0xdecaf);
        let (sel, _) = random_cycle_cover(&mut rng, 40);

        let a = decompose_cycles(&sel).unwrap();
        let b = decompose_cycles(&sel).unwrap();
        assert_eq!(a, b);
    }
}
