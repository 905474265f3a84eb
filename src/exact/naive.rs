use itertools::Itertools;

use super::Tour;
use crate::{graph::Node, instance::TspInstance};

/// Optimal tour by exhausting all `(n-1)! / 2` distinct directed tours with
/// node 0 fixed as the start. Only sensible as a cross-check oracle for small
/// instances.
pub fn naive_solver(instance: &TspInstance) -> Tour {
    let n = instance.number_of_nodes();

    if n < 3 {
        let order: Vec<Node> = (0..n).collect();
        let cost = instance.tour_cost(&order);
        return Tour::new(order, cost);
    }

    let mut best_order: Vec<Node> = (0..n).collect();
    let mut best_cost = instance.tour_cost(&best_order);

    for perm in (1..n).permutations(n as usize - 1) {
        // each tour appears once per direction; keep one of the two
        if perm[0] > perm[perm.len() - 1] {
            continue;
        }

        let mut order = Vec::with_capacity(n as usize);
        order.push(0);
        order.extend_from_slice(&perm);

        let cost = instance.tour_cost(&order);
        if cost < best_cost {
            best_cost = cost;
            best_order = order;
        }
    }

    Tour::new(best_order, best_cost)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unit_square() {
        // the optimal tour walks the square's perimeter, never a diagonal
        let instance =
            TspInstance::from_points(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]);
        let tour = naive_solver(&instance);

        assert_eq!(tour.number_of_nodes(), 4);
        assert!((tour.cost() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn trivial_instances() {
        let instance = TspInstance::from_points(&[]);
        assert_eq!(naive_solver(&instance).order(), &[] as &[Node]);

        let instance = TspInstance::from_points(&[(3.0, 4.0)]);
        assert_eq!(naive_solver(&instance).order(), &[0]);

        let instance = TspInstance::from_points(&[(0.0, 0.0), (2.0, 0.0)]);
        let tour = naive_solver(&instance);
        assert_eq!(tour.order(), &[0, 1]);
        assert_eq!(tour.cost(), 4.0);
    }
}
