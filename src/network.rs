use crate::cost::Cost;

pub type NodeId = usize;
pub type ArcId = usize;

#[derive(Debug, Clone)]
struct Arc<C> {
    to: NodeId,
    capacity: usize,
    cost: C,
}

/// Residual flow network.
///
/// Arcs are stored in pairs: `arc` is a forward arc and `arc ^ 1` its reverse.
/// The reverse arc starts with zero capacity and the negated cost.
#[derive(Debug, Clone)]
pub struct FlowNetwork<C: Cost> {
    arcs: Vec<Arc<C>>,
    // arcs leaving each node, in insertion order
    adjacency: Vec<Vec<ArcId>>,
    // capacity of forward arcs when they were added, indexed by arc / 2
    initial_capacity: Vec<usize>,
}

impl<C: Cost> FlowNetwork<C> {
    pub fn new(num_nodes: usize, arcs_capacity: usize) -> Self {
        Self {
            arcs: Vec::with_capacity(2 * arcs_capacity),
            adjacency: vec![Vec::new(); num_nodes],
            initial_capacity: Vec::with_capacity(arcs_capacity),
        }
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.adjacency.len()
    }

    #[inline]
    pub fn num_arcs(&self) -> usize {
        self.initial_capacity.len()
    }

    pub fn add_arc(&mut self, from: NodeId, to: NodeId, capacity: usize, cost: C) -> ArcId {
        let id = self.arcs.len();
        self.arcs.push(Arc { to, capacity, cost });
        self.arcs.push(Arc {
            to: from,
            capacity: 0,
            cost: -cost,
        });
        self.adjacency[from].push(id);
        self.adjacency[to].push(id ^ 1);
        self.initial_capacity.push(capacity);
        id
    }

    #[inline]
    pub fn arcs_from(&self, node: NodeId) -> &[ArcId] {
        &self.adjacency[node]
    }

    #[inline]
    pub fn head(&self, arc: ArcId) -> NodeId {
        self.arcs[arc].to
    }

    #[inline]
    pub fn tail(&self, arc: ArcId) -> NodeId {
        self.arcs[arc ^ 1].to
    }

    #[inline]
    pub fn cost(&self, arc: ArcId) -> C {
        self.arcs[arc].cost
    }

    #[inline]
    pub fn residual(&self, arc: ArcId) -> usize {
        self.arcs[arc].capacity
    }

    /// Flow on a forward arc.
    #[inline]
    pub fn flow(&self, arc: ArcId) -> usize {
        debug_assert!(arc & 1 == 0, "flow is defined on forward arcs");
        self.arcs[arc ^ 1].capacity
    }

    /// Capacity before any flow was pushed. A forward arc is saturated when
    /// its flow equals this.
    #[inline]
    pub fn initial_capacity(&self, arc: ArcId) -> usize {
        self.initial_capacity[arc / 2]
    }

    /// Moves `amount` units along `arc` in the residual graph.
    #[inline]
    pub fn push(&mut self, arc: ArcId, amount: usize) {
        debug_assert!(self.arcs[arc].capacity >= amount);
        self.arcs[arc].capacity -= amount;
        self.arcs[arc ^ 1].capacity += amount;
    }
}

#[cfg(test)]
mod tests {
    use super::FlowNetwork;

    #[test]
    fn test_arc_pairs() {
        let mut network = FlowNetwork::<i64>::new(3, 2);
        let a = network.add_arc(0, 1, 2, 7);
        let b = network.add_arc(1, 2, 1, 3);
        assert_eq!((a, b), (0, 2));
        assert_eq!(network.num_arcs(), 2);
        assert_eq!(network.arcs_from(1), &[a ^ 1, b]);
        assert_eq!(network.cost(a ^ 1), -7);
        assert_eq!((network.tail(b), network.head(b)), (1, 2));

        network.push(a, 2);
        assert_eq!(network.residual(a), 0);
        assert_eq!(network.residual(a ^ 1), 2);
        assert_eq!(network.flow(a), 2);

        network.push(a ^ 1, 1);
        assert_eq!(network.flow(a), 1);
        assert_eq!(network.initial_capacity(a), 2);
    }
}
