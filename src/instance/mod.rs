use rand::Rng;

use crate::graph::{Node, NumNodes};

/// Symmetric TSP instance as a dense distance matrix
#[derive(Debug, Clone, PartialEq)]
pub struct TspInstance {
    number_of_nodes: NumNodes,
    dist: Vec<f64>,
}

impl TspInstance {
    /// Euclidean instance over the given city coordinates
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let n = points.len();
        let mut dist = vec![0.0; n * n];

        for (i, &(xi, yi)) in points.iter().enumerate() {
            for (j, &(xj, yj)) in points.iter().enumerate() {
                dist[i * n + j] = f64::hypot(xi - xj, yi - yj);
            }
        }

        Self {
            number_of_nodes: n as NumNodes,
            dist,
        }
    }

    /// Instance from a row-major `n * n` distance matrix.
    ///
    /// ** Panics if the matrix size does not match; symmetry and a zero
    /// diagonal are only checked in debug builds **
    pub fn from_distances(number_of_nodes: NumNodes, dist: Vec<f64>) -> Self {
        let n = number_of_nodes as usize;
        assert_eq!(dist.len(), n * n);

        debug_assert!((0..n).all(|i| dist[i * n + i] == 0.0));
        debug_assert!((0..n).all(|i| (0..n).all(|j| dist[i * n + j] == dist[j * n + i])));

        Self {
            number_of_nodes,
            dist,
        }
    }

    /// Uniformly random cities on a square of the given extent, in the spirit
    /// of the usual random benchmark instances. The random source is the
    /// caller's.
    pub fn random_euclidean<R: Rng>(rng: &mut R, n: NumNodes, extent: f64) -> Self {
        debug_assert!(extent > 0.0);
        let points: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.gen_range(0.0..extent), rng.gen_range(0.0..extent)))
            .collect();

        Self::from_points(&points)
    }

    pub fn number_of_nodes(&self) -> NumNodes {
        self.number_of_nodes
    }

    /// Return the number of nodes as usize
    pub fn len(&self) -> usize {
        self.number_of_nodes as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn distance(&self, u: Node, v: Node) -> f64 {
        self.dist[u as usize * self.len() + v as usize]
    }

    /// Cost of the closed walk visiting `order` and returning to its start
    pub fn tour_cost(&self, order: &[Node]) -> f64 {
        if order.len() < 2 {
            return 0.0;
        }

        let closing = self.distance(order[order.len() - 1], order[0]);
        order
            .windows(2)
            .map(|w| self.distance(w[0], w[1]))
            .sum::<f64>()
            + closing
    }
}
