use std::{convert::Infallible, time::Duration};

use highs::{HighsModelStatus, Model, RowProblem};
use itertools::Itertools;
use log::{debug, info, warn};
use rand::Rng;
use thiserror::Error;

use super::Tour;
use crate::{
    graph::*,
    instance::TspInstance,
    separation::{CallbackError, CutSink, Separation, SeparationError, SubtourSeparator},
};

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("solver terminated with status {0:?}")]
    Unsolved(HighsModelStatus),

    #[error(transparent)]
    Separation(#[from] SeparationError),
}

/// Rows the lazy protocol has injected so far. The `highs` crate has no
/// in-search callback, so the pool is replayed into every re-solve and each
/// round of the outer loop acts as one incumbent-callback invocation.
#[derive(Default)]
struct CutPool {
    sets: Vec<Vec<Node>>,
}

impl CutSink for CutPool {
    type Error = Infallible;

    fn add_subtour_cut(&mut self, subtour: &[Node]) -> Result<(), Infallible> {
        self.sets.push(subtour.to_vec());
        Ok(())
    }
}

/// Exact TSP solver: degree-2 edge model solved with HiGHS, subtours
/// eliminated lazily through `separator` until the incumbent is a single
/// Hamiltonian cycle.
pub fn highs_tsp_solver<R: Rng>(
    instance: &TspInstance,
    separator: &mut SubtourSeparator<R>,
    timeout: Option<Duration>,
) -> Result<Tour, SolveError> {
    let n = instance.number_of_nodes();

    // the degree-2 model only becomes feasible with three nodes
    if n < 3 {
        let order: Vec<Node> = (0..n).collect();
        let cost = instance.tour_cost(&order);
        return Ok(Tour::new(order, cost));
    }

    let mut pool = CutPool::default();

    loop {
        let values = solve_with_cuts(instance, &pool, timeout)?;
        let incumbent = DenseSelection::from_triangular(n, values);

        let separation = separator
            .separate_into(&incumbent, &mut pool)
            .map_err(|e| match e {
                CallbackError::Separation(e) => SolveError::from(e),
                CallbackError::Sink(never) => match never {},
            })?;

        match separation {
            Separation::Tour => {
                let cover = decompose_cycles(&incumbent).map_err(SeparationError::from)?;
                debug_assert!(cover.is_single_tour());

                let order = cover.cycles()[0].nodes().to_vec();
                let cost = instance.tour_cost(&order);
                info!(
                    "optimal tour of cost {cost:.3} after {} cuts in {} rounds",
                    separator.num_cuts(),
                    separator.num_callbacks()
                );
                return Ok(Tour::new(order, cost));
            }
            Separation::Violated(cut) => {
                debug!(
                    "round {}: eliminating subtour over {} nodes",
                    separator.num_callbacks(),
                    cut.len()
                );
            }
            Separation::AlreadyCut(cut) => {
                // cache hit from an earlier solve with the same separator; the
                // pool is fresh per solve, so the row still has to exist here
                warn!("re-adding cached cut over {} nodes", cut.len());
                pool.sets.push(cut.nodes().to_vec());
            }
        }
    }
}

fn solve_with_cuts(
    instance: &TspInstance,
    pool: &CutPool,
    timeout: Option<Duration>,
) -> Result<Vec<f64>, SolveError> {
    let n = instance.number_of_nodes();
    let mut pb = RowProblem::default();

    // one binary column per unordered node pair, in edge_index order
    let vars = (0..n)
        .tuple_combinations()
        .map(|(u, v)| pb.add_integer_column(instance.distance(u, v), 0..1))
        .collect_vec();

    for u in 0..n {
        let incident = (0..n)
            .filter(|&v| v != u)
            .map(|v| (vars[edge_index(n, u, v)], 1.0));
        pb.add_row(2..=2, incident);
    }

    for set in &pool.sets {
        let mut in_set = vec![false; n as usize];
        for &u in set {
            in_set[u as usize] = true;
        }

        let mut boundary = Vec::new();
        for &u in set {
            for v in (0..n).filter(|&v| !in_set[v as usize]) {
                boundary.push((vars[edge_index(n, u, v)], 1.0));
            }
        }
        pb.add_row(2.., boundary);
    }

    let mut model = Model::new(pb);
    model.make_quiet();
    if let Some(tme) = timeout {
        model.set_option("time_limit", tme.as_secs_f64());
    }
    model.set_option("parallel", "off");
    model.set_option("threads", 1);
    // default mip_rel_gap of 1e-4 may return suboptimal tours
    model.set_option("mip_rel_gap", 0.0);
    model.set_option("mip_abs_gap", 0.0);
    model.set_sense(highs::Sense::Minimise);

    let solved = model.solve();
    if solved.status() != HighsModelStatus::Optimal {
        return Err(SolveError::Unsolved(solved.status()));
    }

    Ok(solved.get_solution().columns().to_vec())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{exact::naive_solver, separation::SelectionPolicy};
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    const EPS: f64 = 1e-6;

    fn assert_valid_tour(tour: &Tour, instance: &TspInstance) {
        let mut order = tour.order().to_vec();
        order.sort_unstable();
        assert_eq!(order, (0..instance.number_of_nodes()).collect_vec());
        assert!((instance.tour_cost(tour.order()) - tour.cost()).abs() < EPS);
    }

    #[test]
    fn cross_with_naive() {
        let mut rng = Pcg64Mcg::seed_from_u64(0x1234567);

        for n in 5..=8 {
            for _ in 0..2 {
                let instance = TspInstance::random_euclidean(&mut rng, n, 1000.0);
                let optimum = naive_solver(&instance);

                for policy in [
                    SelectionPolicy::Shortest,
                    SelectionPolicy::Longest,
                    SelectionPolicy::Random,
                ] {
                    let mut separator =
                        SubtourSeparator::with_rng(policy, Pcg64Mcg::seed_from_u64(999));
                    let tour = highs_tsp_solver(&instance, &mut separator, None).unwrap();

                    assert_valid_tour(&tour, &instance);
                    assert!(
                        (tour.cost() - optimum.cost()).abs() < EPS,
                        "policy {policy}: got {} expected {}",
                        tour.cost(),
                        optimum.cost()
                    );
                }
            }
        }
    }

    #[test]
    fn clustered_instance_forces_cuts() {
        // two tight clusters far apart: without elimination the optimum is
        // one triangle per cluster, so at least one lazy cut must fire
        let instance = TspInstance::from_points(&[
            (0.0, 0.0),
            (0.0, 1.0),
            (1.0, 0.0),
            (100.0, 100.0),
            (100.0, 101.0),
            (101.0, 100.0),
        ]);

        let mut separator = SubtourSeparator::new(SelectionPolicy::Shortest).unwrap();
        let tour = highs_tsp_solver(&instance, &mut separator, None).unwrap();

        assert_valid_tour(&tour, &instance);
        assert!(separator.num_cuts() >= 1);

        let optimum = naive_solver(&instance);
        assert!((tour.cost() - optimum.cost()).abs() < EPS);
    }

    #[test]
    fn trivial_instances_skip_the_solver() {
        for n in 0..3 {
            let mut rng = Pcg64Mcg::seed_from_u64(7);
            let instance = TspInstance::random_euclidean(&mut rng, n, 10.0);

            let mut separator = SubtourSeparator::new(SelectionPolicy::Shortest).unwrap();
            let tour = highs_tsp_solver(&instance, &mut separator, None).unwrap();

            assert_eq!(tour.order(), (0..n).collect_vec());
            assert_eq!(separator.num_callbacks(), 0);
        }
    }

    #[test]
    fn reused_separator_with_cache_still_terminates() {
        let instance = TspInstance::from_points(&[
            (0.0, 0.0),
            (0.0, 1.0),
            (1.0, 0.0),
            (50.0, 50.0),
            (50.0, 51.0),
            (51.0, 50.0),
        ]);

        let mut separator = SubtourSeparator::new(SelectionPolicy::Shortest)
            .unwrap()
            .with_cut_cache();

        let first = highs_tsp_solver(&instance, &mut separator, None).unwrap();
        let second = highs_tsp_solver(&instance, &mut separator, None).unwrap();

        assert!((first.cost() - second.cost()).abs() < EPS);
    }
}
