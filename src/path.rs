use crate::grid::SolidGrid;
use crate::neighbours::{self, CARDINAL_DIRECTIONS, ORDINAL_DIRECTIONS};
use direction::Direction;
use grid_2d::Coord;
use num_traits::{Float, FloatConst};
use std::slice;

/// Walks a path of coordinates, yielding the direction of each step.
/// Stops early at the first pair of cells that are not adjacent.
pub struct PathDirections<'a> {
    current_coord: Option<Coord>,
    coords: slice::Iter<'a, Coord>,
}

impl<'a> PathDirections<'a> {
    pub fn new(path: &'a [Coord]) -> Self {
        let mut coords = path.iter();
        Self {
            current_coord: coords.next().cloned(),
            coords,
        }
    }
}

impl<'a> Iterator for PathDirections<'a> {
    type Item = Direction;
    fn next(&mut self) -> Option<Self::Item> {
        let current_coord = self.current_coord?;
        let &next_coord = self.coords.next()?;
        let direction = direction_between(current_coord, next_coord);
        self.current_coord = direction.map(|_| next_coord);
        direction
    }
}

pub fn direction_between(from: Coord, to: Coord) -> Option<Direction> {
    let delta = to - from;
    CARDINAL_DIRECTIONS
        .iter()
        .chain(ORDINAL_DIRECTIONS.iter())
        .cloned()
        .find(|direction| direction.coord() == delta)
}

/// Sum of the step costs along `path`. Infinite if any step enters or leaves
/// a solid cell.
pub fn path_cost<G, Cost>(grid: &G, path: &[Coord]) -> Cost
where
    G: SolidGrid,
    Cost: Float + FloatConst,
{
    path.windows(2).fold(Cost::zero(), |total, step| {
        total + neighbours::edge_cost(grid, step[0], step[1])
    })
}
