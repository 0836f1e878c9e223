use crate::config::DStarLiteConfig;
use crate::error::Error;
use crate::grid::SolidGrid;
use crate::heuristic::Heuristic;
use crate::metadata::SearchMetadata;
use crate::neighbours::{self, edge_cost};
use best::BestMap;
use grid_2d::{Coord, Grid, Size};
use num_traits::{Float, FloatConst};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::{debug, trace, warn};

/// Priority of a node. Ordered lexicographically: `k1` estimates the total
/// cost of a path through the node, `k2` breaks ties.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Key<Cost> {
    pub(crate) k1: Cost,
    pub(crate) k2: Cost,
}

impl<Cost: Float> Key<Cost> {
    fn infinite() -> Self {
        Self {
            k1: Cost::infinity(),
            k2: Cost::infinity(),
        }
    }

    /// `k1` values within a relative tolerance of each other compare equal
    /// and fall through to `k2`. Costs summed one step at a time and
    /// heuristics computed in one multiplication differ in the last bits.
    pub(crate) fn compare(&self, other: &Self) -> Ordering {
        match compare_with_tolerance(self.k1, other.k1) {
            Ordering::Equal => self.k2.partial_cmp(&other.k2).unwrap_or(Ordering::Equal),
            ordering => ordering,
        }
    }

    pub(crate) fn precedes(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Less
    }
}

fn compare_with_tolerance<Cost: Float>(a: Cost, b: Cost) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    if a.is_finite() && b.is_finite() {
        let scale = Cost::one().max(a.abs()).max(b.abs());
        if (a - b).abs() <= Cost::epsilon().sqrt() * scale {
            return Ordering::Equal;
        }
    }
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OpenState {
    Closed,
    Open,
    /// The node's entry is still in the heap but must be skipped.
    Stale,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DStarLiteNode<Cost> {
    pub(crate) seen: u64,
    pub(crate) g: Cost,
    pub(crate) rhs: Cost,
    pub(crate) key: Key<Cost>,
    pub(crate) open: OpenState,
    pub(crate) stamp: u64,
}

impl<Cost: Float> DStarLiteNode<Cost> {
    fn new() -> Self {
        Self {
            seen: 0,
            g: Cost::infinity(),
            rhs: Cost::infinity(),
            key: Key::infinite(),
            open: OpenState::Closed,
            stamp: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct OpenEntry<Cost: PartialOrd<Cost>> {
    pub(crate) coord: Coord,
    pub(crate) key: Key<Cost>,
    pub(crate) stamp: u64,
}

impl<Cost: Float> PartialEq for OpenEntry<Cost> {
    fn eq(&self, other: &Self) -> bool {
        self.key.compare(&other.key) == Ordering::Equal
    }
}

impl<Cost: Float> PartialOrd for OpenEntry<Cost> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Cost: Float> Eq for OpenEntry<Cost> {}

impl<Cost: Float> Ord for OpenEntry<Cost> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key.compare(&self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Query {
    start: Coord,
    goal: Coord,
}

/// Incremental planner over a grid. Node state lives here rather than on the
/// grid, so one grid can be searched by several contexts at once.
///
/// A query is fixed by its start and goal. After cells of the grid change,
/// `replan` repairs the previous search instead of starting over. Moving the
/// start requires a new `find_path`.
#[derive(Debug, Clone)]
pub struct DStarLiteContext<Cost: PartialOrd<Cost>, H> {
    config: DStarLiteConfig<Cost, H>,
    seq: u64,
    stamp: u64,
    num_nodes_updated: usize,
    query: Option<Query>,
    open_list: BinaryHeap<OpenEntry<Cost>>,
    node_grid: Grid<DStarLiteNode<Cost>>,
}

impl<Cost, H> DStarLiteContext<Cost, H>
where
    Cost: Float + FloatConst,
    H: Heuristic<Cost>,
{
    pub fn new(size: Size, config: DStarLiteConfig<Cost, H>) -> Self {
        Self {
            config,
            seq: 0,
            stamp: 0,
            num_nodes_updated: 0,
            query: None,
            open_list: BinaryHeap::new(),
            node_grid: Grid::new_fn(size, |_| DStarLiteNode::new()),
        }
    }

    pub fn size(&self) -> Size {
        self.node_grid.size()
    }

    pub fn config(&self) -> &DStarLiteConfig<Cost, H> {
        &self.config
    }

    pub fn start(&self) -> Option<Coord> {
        self.query.map(|query| query.start)
    }

    pub fn goal(&self) -> Option<Coord> {
        self.query.map(|query| query.goal)
    }

    /// `None` if the cell is outside the context or was not reached by the
    /// current query.
    pub fn g(&self, coord: Coord) -> Option<Cost> {
        self.state(coord).map(|node| node.g)
    }

    pub fn rhs(&self, coord: Coord) -> Option<Cost> {
        self.state(coord).map(|node| node.rhs)
    }

    /// Whether `g` equals `rhs` for the cell. Cells the current query has not
    /// reached count as consistent. `None` if the cell is outside the context.
    pub fn is_consistent(&self, coord: Coord) -> Option<bool> {
        self.node_grid
            .get(coord)
            .map(|node| node.seen != self.seq || node.g == node.rhs)
    }

    pub fn find_path<G>(
        &mut self,
        grid: &G,
        start: Coord,
        goal: Coord,
        path: &mut Vec<Coord>,
    ) -> Result<SearchMetadata<Cost>, Error>
    where
        G: SolidGrid,
    {
        let query = Query { start, goal };
        self.check_query(grid, query)?;

        debug!(?start, ?goal, "starting search");

        self.seq += 1;
        self.num_nodes_updated = 0;
        self.open_list.clear();
        self.query = Some(query);

        self.touch(start)?;
        let goal_node = self.touch(goal)?;
        goal_node.rhs = Cost::zero();
        self.open_node(query, goal)?;

        self.resolve(grid, query, path)
    }

    /// Repairs the current query after the walkability of `changed` cells
    /// was modified in `grid`.
    pub fn replan<G, I>(
        &mut self,
        grid: &G,
        changed: I,
        path: &mut Vec<Coord>,
    ) -> Result<SearchMetadata<Cost>, Error>
    where
        G: SolidGrid,
        I: IntoIterator<Item = Coord>,
    {
        let query = self.query.ok_or(Error::NoQuery)?;
        self.check_query(grid, query)?;
        self.num_nodes_updated = 0;

        for coord in changed {
            if self.node_grid.get(coord).is_none() {
                return Err(Error::VisitOutsideContext);
            }

            debug!(?coord, "cell changed");

            // Corner-cutting rules make diagonal edges between the cell's
            // neighbours depend on it too, so the whole 3x3 block is updated.
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let affected = coord + Coord::new(dx, dy);
                    if self.node_grid.get(affected).is_some() {
                        self.update_state(grid, query, affected)?;
                    }
                }
            }
        }

        self.resolve(grid, query, path)
    }

    fn check_query<G>(&self, grid: &G, query: Query) -> Result<(), Error>
    where
        G: SolidGrid,
    {
        if !self.config.is_weight_valid() {
            return Err(Error::InvalidWeight);
        }
        if grid.is_solid(query.start).is_none() {
            return Err(Error::StartOutsideGrid);
        }
        if grid.is_solid(query.goal).is_none() {
            return Err(Error::GoalOutsideGrid);
        }
        if self.node_grid.get(query.start).is_none() || self.node_grid.get(query.goal).is_none() {
            return Err(Error::VisitOutsideContext);
        }
        Ok(())
    }

    fn resolve<G>(
        &mut self,
        grid: &G,
        query: Query,
        path: &mut Vec<Coord>,
    ) -> Result<SearchMetadata<Cost>, Error>
    where
        G: SolidGrid,
    {
        path.clear();

        if query.start == query.goal {
            path.push(query.start);
            return Ok(SearchMetadata {
                num_nodes_visited: 0,
                num_nodes_updated: self.num_nodes_updated,
                cost: Cost::zero(),
                length: 1,
            });
        }

        let num_nodes_visited = self.compute_shortest_path(grid, query)?;

        if self.is_consistent(query.start) != Some(true) {
            warn!(num_nodes_visited, "open list exhausted before start was resolved");
            return Err(Error::InternalInconsistency);
        }

        if self.g_value(query.start).is_infinite() {
            debug!(num_nodes_visited, "no path");
            return Err(Error::NoPath);
        }

        let cost = self.extract_path(grid, query, path)?;

        debug!(
            num_nodes_visited,
            num_nodes_updated = self.num_nodes_updated,
            length = path.len(),
            "search complete"
        );

        Ok(SearchMetadata {
            num_nodes_visited,
            num_nodes_updated: self.num_nodes_updated,
            cost,
            length: path.len(),
        })
    }

    fn state(&self, coord: Coord) -> Option<&DStarLiteNode<Cost>> {
        self.node_grid
            .get(coord)
            .filter(|node| node.seen == self.seq)
    }

    fn g_value(&self, coord: Coord) -> Cost {
        self.state(coord).map_or(Cost::infinity(), |node| node.g)
    }

    /// Nodes not yet seen by the current query are reset on first access.
    fn touch(&mut self, coord: Coord) -> Result<&mut DStarLiteNode<Cost>, Error> {
        let seq = self.seq;
        let node = self
            .node_grid
            .get_mut(coord)
            .ok_or(Error::VisitOutsideContext)?;
        if node.seen != seq {
            *node = DStarLiteNode::new();
            node.seen = seq;
        }
        Ok(node)
    }

    /// Only over-consistent nodes get the weighted heuristic. Under-consistent
    /// keys must stay lower bounds for raised `g` values to reach the start.
    fn compute_key(&mut self, query: Query, coord: Coord) -> Result<Key<Cost>, Error> {
        let dx = (coord.x - query.start.x).unsigned_abs();
        let dy = (coord.y - query.start.y).unsigned_abs();
        let heuristic = self.config.heuristic.estimate(dx, dy);
        let weight = self.config.weight;

        let node = self.touch(coord)?;
        node.key = if node.g > node.rhs {
            Key {
                k1: node.rhs + weight * heuristic,
                k2: node.rhs,
            }
        } else {
            Key {
                k1: node.g + heuristic,
                k2: node.g,
            }
        };
        Ok(node.key)
    }

    /// The only way entries enter the open list. A node that is already open
    /// gets a fresh entry and its previous one stops matching its stamp.
    fn open_node(&mut self, query: Query, coord: Coord) -> Result<(), Error> {
        let key = self.compute_key(query, coord)?;
        self.stamp += 1;
        let stamp = self.stamp;

        let node = self.touch(coord)?;
        node.open = OpenState::Open;
        node.stamp = stamp;

        self.open_list.push(OpenEntry { coord, key, stamp });
        Ok(())
    }

    fn update_state<G>(&mut self, grid: &G, query: Query, coord: Coord) -> Result<(), Error>
    where
        G: SolidGrid,
    {
        self.touch(coord)?;
        self.num_nodes_updated += 1;

        if coord != query.goal {
            let mut rhs = Cost::infinity();
            let neighbours = neighbours::neighbours(
                grid,
                coord,
                self.config.allow_diagonal,
                self.config.dont_cross_corners,
            );
            for neighbour in neighbours.iter() {
                rhs = rhs.min(self.g_value(neighbour) + edge_cost(grid, coord, neighbour));
            }
            self.touch(coord)?.rhs = rhs;
        }

        let inconsistent = {
            let node = self.touch(coord)?;
            if node.open == OpenState::Open {
                node.open = OpenState::Stale;
            }
            node.g != node.rhs
        };

        if inconsistent {
            self.open_node(query, coord)?;
        }

        Ok(())
    }

    /// Drops entries from the top of the open list until the top entry is the
    /// live entry of an open node.
    fn prune_open_list(&mut self) {
        let seq = self.seq;
        while let Some(&OpenEntry { coord, stamp, .. }) = self.open_list.peek() {
            if let Some(node) = self.node_grid.get_mut(coord) {
                if node.seen == seq && node.stamp == stamp {
                    match node.open {
                        OpenState::Open => return,
                        OpenState::Stale => node.open = OpenState::Closed,
                        OpenState::Closed => (),
                    }
                }
            }
            self.open_list.pop();
        }
    }

    fn compute_shortest_path<G>(&mut self, grid: &G, query: Query) -> Result<usize, Error>
    where
        G: SolidGrid,
    {
        let mut num_nodes_visited = 0;

        loop {
            let start_key = self.compute_key(query, query.start)?;
            self.prune_open_list();

            let top_precedes_start = self
                .open_list
                .peek()
                .map_or(false, |entry| entry.key.precedes(&start_key));

            if !top_precedes_start && self.is_consistent(query.start) == Some(true) {
                break;
            }

            let entry = match self.open_list.pop() {
                Some(entry) => entry,
                None => break,
            };

            num_nodes_visited += 1;
            self.touch(entry.coord)?.open = OpenState::Closed;

            let key = self.compute_key(query, entry.coord)?;
            if entry.key.precedes(&key) {
                self.open_node(query, entry.coord)?;
                continue;
            }

            {
                let node = self.touch(entry.coord)?;
                let over_consistent = node.g > node.rhs;
                trace!(coord = ?entry.coord, over_consistent, "expanding");
                if over_consistent {
                    node.g = node.rhs;
                } else {
                    node.g = Cost::infinity();
                }
            }

            // Settles an over-consistent node, or requeues an under-consistent
            // one with its new g.
            self.update_state(grid, query, entry.coord)?;

            let neighbours = neighbours::neighbours(
                grid,
                entry.coord,
                self.config.allow_diagonal,
                self.config.dont_cross_corners,
            );
            for neighbour in neighbours.iter() {
                self.update_state(grid, query, neighbour)?;
            }
        }

        Ok(num_nodes_visited)
    }

    /// Follows the cheapest step from the start until the goal. Returns the
    /// cost of the path written to `path`.
    fn extract_path<G>(&self, grid: &G, query: Query, path: &mut Vec<Coord>) -> Result<Cost, Error>
    where
        G: SolidGrid,
    {
        let size = self.node_grid.size();
        let max_length = size.width() as usize * size.height() as usize;

        let mut current = query.start;
        let mut cost = Cost::zero();

        while current != query.goal {
            if path.len() >= max_length {
                warn!(length = path.len(), "path extraction did not reach the goal");
                path.clear();
                return Err(Error::InternalInconsistency);
            }

            path.push(current);

            let mut best_map = BestMap::new();
            let neighbours = neighbours::neighbours(
                grid,
                current,
                self.config.allow_diagonal,
                self.config.dont_cross_corners,
            );
            for neighbour in neighbours.iter() {
                let step: Cost = edge_cost(grid, current, neighbour);
                let total = step + self.g_value(neighbour);
                if total.is_finite() {
                    best_map.insert_lt(total, (neighbour, step));
                }
            }

            match best_map.into_value() {
                Some((next, step)) => {
                    cost = cost + step;
                    current = next;
                }
                None => {
                    warn!(coord = ?current, "path extraction stalled");
                    path.clear();
                    return Err(Error::InternalInconsistency);
                }
            }
        }

        path.push(query.goal);
        Ok(cost)
    }
}
