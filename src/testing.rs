use rand::{Rng, seq::SliceRandom};

use crate::graph::*;

/// Plants a random partition of `0..n` into cycles of at least three nodes
/// each and returns the implied edge selection together with the planted node
/// sets.
pub fn random_cycle_cover(rng: &mut impl Rng, n: NumNodes) -> (EdgeListSelection, Vec<Vec<Node>>) {
    assert!(n >= 3);

    let mut nodes: Vec<Node> = (0..n).collect();
    nodes.shuffle(rng);

    let mut sets: Vec<Vec<Node>> = Vec::new();
    let mut rest = nodes.as_slice();
    while !rest.is_empty() {
        // keep the remainder large enough to host another cycle
        let take = if rest.len() < 6 || rng.gen_bool(0.3) {
            rest.len()
        } else {
            rng.gen_range(3..=rest.len() - 3)
        };

        sets.push(rest[..take].to_vec());
        rest = &rest[take..];
    }

    let mut edges = Vec::new();
    for set in &sets {
        for w in set.windows(2) {
            edges.push((w[0], w[1]));
        }
        edges.push((set[set.len() - 1], set[0]));
    }

    (EdgeListSelection::new(n, edges), sets)
}
