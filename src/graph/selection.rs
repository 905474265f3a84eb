use fxhash::FxHashSet;

use super::*;

/// Read-only view of one incumbent assignment over the edge variables of a
/// symmetric tour model. The relation is symmetric and irreflexive; an
/// implementation is only ever queried for one callback invocation and must
/// not change underneath it.
pub trait EdgeSelection {
    /// Returns the number of nodes of the instance
    fn number_of_nodes(&self) -> NumNodes;

    /// Returns *true* exactly if the edge `{u, v}` is selected in the incumbent.
    /// Must agree for `(u, v)` and `(v, u)`; `is_selected(u, u)` is *false*.
    fn is_selected(&self, u: Node, v: Node) -> bool;

    /// Return the number of nodes as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns true if the instance has no nodes
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Selection backed by an explicit edge list; intended for tests and small
/// hand-built incumbents.
#[derive(Debug, Clone, Default)]
pub struct EdgeListSelection {
    number_of_nodes: NumNodes,
    selected: FxHashSet<Edge>,
}

impl EdgeListSelection {
    pub fn new(
        number_of_nodes: NumNodes,
        edges: impl IntoIterator<Item = impl Into<Edge>>,
    ) -> Self {
        let selected: FxHashSet<Edge> = edges
            .into_iter()
            .map(|e| e.into())
            .inspect(|e| {
                debug_assert!(!e.is_loop());
                debug_assert!(e.0 < number_of_nodes && e.1 < number_of_nodes);
            })
            .map(|e| e.normalized())
            .collect();

        Self {
            number_of_nodes,
            selected,
        }
    }

    pub fn number_of_selected_edges(&self) -> NumEdges {
        self.selected.len() as NumEdges
    }
}

impl EdgeSelection for EdgeListSelection {
    fn number_of_nodes(&self) -> NumNodes {
        self.number_of_nodes
    }

    fn is_selected(&self, u: Node, v: Node) -> bool {
        u != v && self.selected.contains(&Edge(u, v).normalized())
    }
}

/// Selection over the fractional values a MIP solver reports for the
/// upper-triangular edge columns (see [`edge_index`]), thresholded at 0.5.
#[derive(Debug, Clone)]
pub struct DenseSelection {
    number_of_nodes: NumNodes,
    values: Vec<f64>,
}

impl DenseSelection {
    /// Takes one value per unordered node pair in [`edge_index`] order.
    ///
    /// ** Panics if `values` does not have `n * (n-1) / 2` entries **
    pub fn from_triangular(number_of_nodes: NumNodes, values: Vec<f64>) -> Self {
        assert_eq!(values.len(), number_of_edge_slots(number_of_nodes));
        Self {
            number_of_nodes,
            values,
        }
    }

    pub fn value(&self, u: Node, v: Node) -> f64 {
        if u == v {
            return 0.0;
        }
        self.values[edge_index(self.number_of_nodes, u, v)]
    }
}

impl EdgeSelection for DenseSelection {
    fn number_of_nodes(&self) -> NumNodes {
        self.number_of_nodes
    }

    fn is_selected(&self, u: Node, v: Node) -> bool {
        u != v && self.value(u, v) > 0.5
    }
}
