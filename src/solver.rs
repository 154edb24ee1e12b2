use crate::bounds::CapacityBounds;
use crate::config::{ShortestPath, SolverConfig};
use crate::cost::Cost;
use crate::error::SolveError;
use crate::matrix::{AssignmentMatrix, Matrix};
use crate::network::{ArcId, FlowNetwork, NodeId};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};
use std::time::Instant;
use tracing::{debug, info, trace};

/// Solver for the capacitated assignment problem:
/// every shop (row) goes to exactly one office (column), every office gets
/// between `bounds.min` and `bounds.max` shops, and the total cost is minimal.
pub trait AssignmentSolver<C: Cost> {
    fn solve(
        &self,
        costs: &Matrix<C>,
        bounds: CapacityBounds,
    ) -> Result<AssignmentMatrix, SolveError>;
}

/// Solves with the default [`FlowSolver`].
pub fn solve<C: Cost>(
    costs: &Matrix<C>,
    bounds: CapacityBounds,
) -> Result<AssignmentMatrix, SolveError> {
    FlowSolver::default().solve(costs, bounds)
}

/// Exact solver based on successive shortest augmenting paths.
///
/// The network is `source -> shop -> office -> sink`. Lower bounds on the
/// office arcs are moved onto a super sink: every office owes `min` units to
/// it directly, and the plain sink forwards the remaining `shops - offices * min`
/// units. A flow of value `shops` into the super sink therefore meets every
/// lower bound. Capacities are integral, so the optimal flow is 0/1 on every
/// shop to office arc.
#[derive(Debug, Clone, Default)]
pub struct FlowSolver {
    config: SolverConfig,
}

impl<C: Cost> AssignmentSolver<C> for FlowSolver {
    fn solve(
        &self,
        costs: &Matrix<C>,
        bounds: CapacityBounds,
    ) -> Result<AssignmentMatrix, SolveError> {
        validate_input(costs, bounds)?;
        let layout = Layout::new(costs.rows(), costs.cols());
        info!(
            "solving {} shops x {} offices, [{}, {}] shops per office, {:?}",
            layout.shops, layout.offices, bounds.min, bounds.max, self.config.shortest_path
        );

        let (mut network, assignment_arcs) = build_network(costs, bounds, &layout);
        self.augment(&mut network, &layout)?;
        let assignment = extract_assignment(&network, &assignment_arcs, &layout, bounds)?;

        info!("optimal assignment found");
        Ok(assignment)
    }
}

impl FlowSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn augment<C: Cost>(
        &self,
        network: &mut FlowNetwork<C>,
        layout: &Layout,
    ) -> Result<(), SolveError> {
        let required = layout.shops;
        let deadline = self.config.time_limit.map(|limit| Instant::now() + limit);
        let mut potentials = vec![C::zero(); network.num_nodes()];

        for shipped in 0..required {
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(SolveError::Cancelled { shipped, required });
                }
            }

            let search = match self.config.shortest_path {
                ShortestPath::Dijkstra => {
                    dijkstra(network, &mut potentials, layout.source(), layout.super_sink())?
                }
                ShortestPath::Spfa => spfa(network, layout.source(), layout.super_sink())?,
            };
            let parents = match search {
                PathSearch::Found(parents) => parents,
                PathSearch::Unreachable => {
                    return Err(SolveError::NoFeasibleFlow {
                        shipped,
                        required,
                        reason: "no augmenting path to the sink",
                    })
                }
                PathSearch::NegativeCycle => {
                    return Err(SolveError::NoFeasibleFlow {
                        shipped,
                        required,
                        reason: "negative cycle in the residual network",
                    })
                }
            };

            // every path starts with a unit source arc, so the bottleneck is 1
            let mut node = layout.super_sink();
            while node != layout.source() {
                let arc = parents[node].ok_or(SolveError::NoFeasibleFlow {
                    shipped,
                    required,
                    reason: "broken augmenting path",
                })?;
                network.push(arc, 1);
                node = network.tail(arc);
            }
            trace!("augmentation {} done", shipped + 1);
            if (shipped + 1) % 1000 == 0 {
                debug!("shipped {} of {} units", shipped + 1, required);
            }
        }
        Ok(())
    }
}

/// Node numbering of the network.
struct Layout {
    shops: usize,
    offices: usize,
}

impl Layout {
    fn new(shops: usize, offices: usize) -> Self {
        Self { shops, offices }
    }

    #[inline]
    fn shop(&self, i: usize) -> NodeId {
        i
    }

    #[inline]
    fn office(&self, j: usize) -> NodeId {
        self.shops + j
    }

    #[inline]
    fn source(&self) -> NodeId {
        self.shops + self.offices
    }

    #[inline]
    fn sink(&self) -> NodeId {
        self.source() + 1
    }

    #[inline]
    fn super_sink(&self) -> NodeId {
        self.source() + 2
    }

    #[inline]
    fn num_nodes(&self) -> usize {
        self.shops + self.offices + 3
    }
}

/// Matrix constructors reject empty shapes, so only bounds and cell values
/// are checked here. Range problems surface from the checked path arithmetic.
fn validate_input<C: Cost>(costs: &Matrix<C>, bounds: CapacityBounds) -> Result<(), SolveError> {
    bounds.check(costs.rows(), costs.cols())?;

    for (i, row) in costs.iter_rows().enumerate() {
        if let Some(j) = row.iter().position(|cost| !cost.is_valid_cost()) {
            return Err(SolveError::InvalidCost { row: i, col: j });
        }
    }
    Ok(())
}

/// Returns the network and the shop to office arcs in row-major order.
fn build_network<C: Cost>(
    costs: &Matrix<C>,
    bounds: CapacityBounds,
    layout: &Layout,
) -> (FlowNetwork<C>, Vec<ArcId>) {
    let num_arcs = layout.shops * (layout.offices + 1) + 2 * layout.offices + 1;
    let mut network = FlowNetwork::new(layout.num_nodes(), num_arcs);

    for i in 0..layout.shops {
        network.add_arc(layout.source(), layout.shop(i), 1, C::zero());
    }

    let mut assignment_arcs = Vec::with_capacity(layout.shops * layout.offices);
    for (i, row) in costs.iter_rows().enumerate() {
        for (j, &cost) in row.iter().enumerate() {
            assignment_arcs.push(network.add_arc(layout.shop(i), layout.office(j), 1, cost));
        }
    }

    for j in 0..layout.offices {
        network.add_arc(layout.office(j), layout.super_sink(), bounds.min, C::zero());
        network.add_arc(
            layout.office(j),
            layout.sink(),
            bounds.max - bounds.min,
            C::zero(),
        );
    }
    // checked by CapacityBounds::check
    let optional_flow = layout.shops - layout.offices * bounds.min;
    network.add_arc(layout.sink(), layout.super_sink(), optional_flow, C::zero());

    debug!(
        "network has {} nodes and {} arcs",
        network.num_nodes(),
        network.num_arcs()
    );
    (network, assignment_arcs)
}

fn extract_assignment<C: Cost>(
    network: &FlowNetwork<C>,
    assignment_arcs: &[ArcId],
    layout: &Layout,
    bounds: CapacityBounds,
) -> Result<AssignmentMatrix, SolveError> {
    let required = layout.shops;
    let mut row_to_col = Vec::with_capacity(layout.shops);
    for row_arcs in assignment_arcs.chunks_exact(layout.offices) {
        let mut chosen = row_arcs
            .iter()
            .enumerate()
            .filter(|&(_, &arc)| network.flow(arc) == network.initial_capacity(arc))
            .map(|(j, _)| j);
        match (chosen.next(), chosen.next()) {
            (Some(j), None) => row_to_col.push(j),
            _ => {
                return Err(SolveError::NoFeasibleFlow {
                    shipped: required,
                    required,
                    reason: "shop is not assigned to exactly one office",
                })
            }
        }
    }

    let assignment = AssignmentMatrix::from_row_to_col(layout.offices, row_to_col);
    if !assignment.satisfies(&bounds) {
        return Err(SolveError::NoFeasibleFlow {
            shipped: required,
            required,
            reason: "office capacity bounds violated",
        });
    }
    Ok(assignment)
}

enum PathSearch {
    /// arc used to reach every node, `None` for the source and unreached nodes
    Found(Vec<Option<ArcId>>),
    Unreachable,
    NegativeCycle,
}

#[derive(Debug, Clone, Copy)]
struct Label<C> {
    distance: C,
    node: NodeId,
}

impl<C: Cost> PartialEq for Label<C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<C: Cost> Eq for Label<C> {}

impl<C: Cost> Ord for Label<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // costs are validated to be finite, so partial_cmp always succeeds
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl<C: Cost> PartialOrd for Label<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

const OVERFLOW: SolveError = SolveError::NumericOverflow {
    context: "computing path distances",
};

/// `cost + tail - head`, or `None` when the result itself is out of range.
///
/// Adding first can overflow while the final value fits (a large cost with a
/// large tail potential), so the other order is tried before giving up.
fn reduced_cost<C: Cost>(cost: C, tail: C, head: C) -> Option<C> {
    cost.checked_add_cost(tail)
        .and_then(|c| c.checked_sub_cost(head))
        .or_else(|| cost.checked_sub_cost(head).and_then(|c| c.checked_add_cost(tail)))
}

/// Dijkstra on reduced costs `cost + p[tail] - p[head]`.
///
/// Reduced costs of residual arcs stay non-negative as long as the potentials
/// are advanced by the found distances after every search.
fn dijkstra<C: Cost>(
    network: &FlowNetwork<C>,
    potentials: &mut [C],
    source: NodeId,
    target: NodeId,
) -> Result<PathSearch, SolveError> {
    let num_nodes = network.num_nodes();
    let mut distances: Vec<Option<C>> = vec![None; num_nodes];
    let mut parents = vec![None; num_nodes];
    let mut settled = vec![false; num_nodes];
    let mut heap = BinaryHeap::new();

    distances[source] = Some(C::zero());
    heap.push(Reverse(Label {
        distance: C::zero(),
        node: source,
    }));

    while let Some(Reverse(Label { distance, node })) = heap.pop() {
        if settled[node] {
            continue;
        }
        settled[node] = true;

        for &arc in network.arcs_from(node) {
            if network.residual(arc) == 0 {
                continue;
            }
            let next = network.head(arc);
            if settled[next] {
                continue;
            }
            let mut reduced =
                reduced_cost(network.cost(arc), potentials[node], potentials[next])
                    .ok_or(OVERFLOW)?;
            debug_assert!(!C::EXACT || reduced >= C::zero());
            // float rounding may leave tiny negative reduced costs
            if reduced < C::zero() {
                reduced = C::zero();
            }
            let candidate = distance.checked_add_cost(reduced).ok_or(OVERFLOW)?;
            if distances[next].map_or(true, |current| candidate < current) {
                distances[next] = Some(candidate);
                parents[next] = Some(arc);
                heap.push(Reverse(Label {
                    distance: candidate,
                    node: next,
                }));
            }
        }
    }

    if distances[target].is_none() {
        return Ok(PathSearch::Unreachable);
    }
    for (potential, distance) in potentials.iter_mut().zip(distances.iter()) {
        if let Some(distance) = distance {
            *potential = potential.checked_add_cost(*distance).ok_or(OVERFLOW)?;
        }
    }
    Ok(PathSearch::Found(parents))
}

/// Queue based Bellman-Ford on raw residual costs.
fn spfa<C: Cost>(
    network: &FlowNetwork<C>,
    source: NodeId,
    target: NodeId,
) -> Result<PathSearch, SolveError> {
    let num_nodes = network.num_nodes();
    let mut distances: Vec<Option<C>> = vec![None; num_nodes];
    let mut parents = vec![None; num_nodes];
    let mut queued = vec![false; num_nodes];
    let mut enqueue_counts = vec![0_usize; num_nodes];
    let mut queue = VecDeque::with_capacity(num_nodes);

    distances[source] = Some(C::zero());
    queue.push_back(source);
    queued[source] = true;

    while let Some(node) = queue.pop_front() {
        queued[node] = false;
        let distance = match distances[node] {
            Some(distance) => distance,
            None => continue,
        };

        for &arc in network.arcs_from(node) {
            if network.residual(arc) == 0 {
                continue;
            }
            let next = network.head(arc);
            let candidate = distance
                .checked_add_cost(network.cost(arc))
                .ok_or(OVERFLOW)?;
            if distances[next].map_or(true, |current| candidate < current) {
                distances[next] = Some(candidate);
                parents[next] = Some(arc);
                if !queued[next] {
                    enqueue_counts[next] += 1;
                    // a node can improve at most num_nodes - 1 times without a negative cycle
                    if enqueue_counts[next] > num_nodes {
                        return Ok(PathSearch::NegativeCycle);
                    }
                    queued[next] = true;
                    queue.push_back(next);
                }
            }
        }
    }

    if distances[target].is_none() {
        return Ok(PathSearch::Unreachable);
    }
    Ok(PathSearch::Found(parents))
}
