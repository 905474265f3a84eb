pub mod cycles;
pub mod edge;
pub mod selection;

pub type Node = u32;
pub type NumNodes = Node;
pub type NumEdges = u64;

pub use cycles::*;
pub use edge::*;
pub use selection::*;

/// Index of the unordered pair `{u, v}` in a row-major upper-triangular
/// enumeration of all `n * (n-1) / 2` node pairs, i.e. the order
/// `{0,1}, {0,2}, ..., {0,n-1}, {1,2}, ...`.
///
/// ** Panics in debug builds if `u == v` or either endpoint is out of range **
pub fn edge_index(n: NumNodes, u: Node, v: Node) -> usize {
    debug_assert!(u != v);
    debug_assert!(u < n && v < n);

    let (a, b) = (u.min(v) as usize, u.max(v) as usize);
    a * (2 * n as usize - a - 1) / 2 + (b - a - 1)
}

/// Number of unordered node pairs over `n` nodes
pub fn number_of_edge_slots(n: NumNodes) -> usize {
    n as usize * (n as usize - 1) / 2
}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn edge_index_enumerates_triangle() {
        for n in 2..10 {
            let indices = (0..n)
                .tuple_combinations()
                .map(|(u, v)| edge_index(n, u, v))
                .collect_vec();

            assert_eq!(indices, (0..number_of_edge_slots(n)).collect_vec());

            // symmetric in the endpoints
            for (u, v) in (0..n).tuple_combinations() {
                assert_eq!(edge_index(n, u, v), edge_index(n, v, u));
            }
        }
    }
}
