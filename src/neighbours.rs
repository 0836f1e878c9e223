use crate::grid::SolidGrid;
use direction::Direction;
use grid_2d::Coord;
use num_traits::{Float, FloatConst};
use std::slice;

pub(crate) const CARDINAL_DIRECTIONS: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

pub(crate) const ORDINAL_DIRECTIONS: [Direction; 4] = [
    Direction::NorthEast,
    Direction::SouthEast,
    Direction::SouthWest,
    Direction::NorthWest,
];

const MAX_NEIGHBOURS: usize = 8;

/// The walkable cells adjacent to a cell, cardinal neighbours first.
#[derive(Debug, Clone, Copy)]
pub struct Neighbours {
    coords: [Coord; MAX_NEIGHBOURS],
    len: usize,
}

impl Neighbours {
    fn new() -> Self {
        Self {
            coords: [Coord::new(0, 0); MAX_NEIGHBOURS],
            len: 0,
        }
    }

    fn push(&mut self, coord: Coord) {
        self.coords[self.len] = coord;
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.iter().any(|c| c == coord)
    }

    pub fn iter(&self) -> NeighboursIter {
        NeighboursIter {
            coords: self.coords[..self.len].iter(),
        }
    }
}

pub struct NeighboursIter<'a> {
    coords: slice::Iter<'a, Coord>,
}

impl<'a> Iterator for NeighboursIter<'a> {
    type Item = Coord;
    fn next(&mut self) -> Option<Self::Item> {
        self.coords.next().cloned()
    }
}

impl<'a> IntoIterator for &'a Neighbours {
    type Item = Coord;
    type IntoIter = NeighboursIter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Diagonal steps are never taken between two solid cells. With
/// `dont_cross_corners` a diagonal step additionally requires both cells
/// sharing the crossed corner to be walkable.
pub fn neighbours<G>(
    grid: &G,
    coord: Coord,
    allow_diagonal: bool,
    dont_cross_corners: bool,
) -> Neighbours
where
    G: SolidGrid,
{
    let mut neighbours = Neighbours::new();

    for direction in CARDINAL_DIRECTIONS.iter() {
        let neighbour_coord = coord + direction.coord();
        if !grid.is_solid_or_outside(neighbour_coord) {
            neighbours.push(neighbour_coord);
        }
    }

    if !allow_diagonal {
        return neighbours;
    }

    for direction in ORDINAL_DIRECTIONS.iter() {
        let offset = direction.coord();
        let neighbour_coord = coord + offset;
        if grid.is_solid_or_outside(neighbour_coord) {
            continue;
        }

        let horizontal_open = !grid.is_solid_or_outside(coord + Coord::new(offset.x, 0));
        let vertical_open = !grid.is_solid_or_outside(coord + Coord::new(0, offset.y));

        let passable = if dont_cross_corners {
            horizontal_open && vertical_open
        } else {
            horizontal_open || vertical_open
        };

        if passable {
            neighbours.push(neighbour_coord);
        }
    }

    neighbours
}

/// Cost of a single step between adjacent cells. Infinite if either end is
/// solid or outside the grid.
pub fn edge_cost<G, Cost>(grid: &G, a: Coord, b: Coord) -> Cost
where
    G: SolidGrid,
    Cost: Float + FloatConst,
{
    if grid.is_solid_or_outside(a) || grid.is_solid_or_outside(b) {
        return Cost::infinity();
    }

    if a.x == b.x || a.y == b.y {
        Cost::one()
    } else {
        Cost::SQRT_2()
    }
}
