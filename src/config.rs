use std::time::Duration;

/// Shortest path routine used to find augmenting paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ShortestPath {
    /// Dijkstra on reduced costs, keeping node potentials between augmentations.
    #[default]
    Dijkstra,
    /// Queue based Bellman-Ford on raw residual costs.
    Spfa,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverConfig {
    pub shortest_path: ShortestPath,
    /// Solving fails with `Cancelled` once this much time has passed.
    pub time_limit: Option<Duration>,
}

impl SolverConfig {
    pub fn new(shortest_path: ShortestPath, time_limit: Option<Duration>) -> Self {
        Self {
            shortest_path,
            time_limit,
        }
    }

    pub fn with_shortest_path(mut self, shortest_path: ShortestPath) -> Self {
        self.shortest_path = shortest_path;
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }
}
