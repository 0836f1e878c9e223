/// Work done by a single `find_path` or `replan` call, along with the
/// resulting path's cost and number of cells.
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchMetadata<Cost> {
    /// Nodes popped from the open list and expanded.
    pub num_nodes_visited: usize,
    /// Nodes whose lookahead value was recomputed.
    pub num_nodes_updated: usize,
    pub cost: Cost,
    pub length: usize,
}
