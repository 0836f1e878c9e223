use crate::grid::SolidGrid;
use crate::neighbours::{edge_cost, neighbours};
use grid_2d::{Coord, Grid, Size};
use std::cmp::Ordering;
use std::collections::BinaryHeap;


pub(crate) const EPSILON: f64 = 1e-9;

pub(crate) struct TestGrid {
    solid: Grid<bool>,
}

impl TestGrid {
    pub(crate) fn open(size: Size) -> Self {
        Self {
            solid: Grid::new_clone(size, false),
        }
    }

    pub(crate) fn size(&self) -> Size {
        self.solid.size()
    }

    pub(crate) fn set_solid(&mut self, coord: Coord, solid: bool) {
        *self.solid.get_mut(coord).unwrap() = solid;
    }
}

impl SolidGrid for TestGrid {
    fn is_solid(&self, coord: Coord) -> Option<bool> {
        self.solid.get(coord).cloned()
    }
}

pub(crate) fn grid_from_strings(strings: &[&str]) -> (TestGrid, Coord, Coord) {
    let width = strings[0].len() as u32;
    let height = strings.len() as u32;
    let mut grid = TestGrid::open(Size::new(width, height));
    let mut start = None;
    let mut goal = None;
    for (i, line) in strings.iter().enumerate() {
        for (j, ch) in line.chars().enumerate() {
            let coord = Coord::new(j as i32, i as i32);
            match ch {
                '.' => (),
                '#' => grid.set_solid(coord, true),
                's' => start = Some(coord),
                'g' => goal = Some(coord),
                'B' => {
                    goal = Some(coord);
                    start = Some(coord);
                }
                'G' => {
                    goal = Some(coord);
                    grid.set_solid(coord, true);
                }
                'S' => {
                    start = Some(coord);
                    grid.set_solid(coord, true);
                }
                _ => panic!("unexpected character {:?}", ch),
            }
        }
    }

    (grid, start.unwrap(), goal.unwrap())
}

pub(crate) fn assert_cost_eq(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected cost {}, got {}",
        expected,
        actual
    );
}

/// Every consecutive pair of cells is a legal step and no cell is solid.
pub(crate) fn assert_path_legal(
    grid: &TestGrid,
    path: &[Coord],
    allow_diagonal: bool,
    dont_cross_corners: bool,
) {
    for &coord in path {
        assert_eq!(grid.is_solid(coord), Some(false), "path enters {:?}", coord);
    }
    for step in path.windows(2) {
        assert!(
            neighbours(grid, step[0], allow_diagonal, dont_cross_corners).contains(step[1]),
            "illegal step from {:?} to {:?}",
            step[0],
            step[1]
        );
    }
}

struct ReferenceEntry {
    coord: Coord,
    cost: f64,
}

impl PartialEq for ReferenceEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Eq for ReferenceEntry {}

impl PartialOrd for ReferenceEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ReferenceEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

/// Plain Dijkstra over the same adjacency rules, used as ground truth.
pub(crate) fn reference_cost(
    grid: &TestGrid,
    start: Coord,
    goal: Coord,
    allow_diagonal: bool,
    dont_cross_corners: bool,
) -> Option<f64> {
    let mut costs = Grid::new_clone(grid.size(), ::std::f64::INFINITY);
    let mut queue = BinaryHeap::new();
    *costs.get_mut(start).unwrap() = 0.0;
    queue.push(ReferenceEntry {
        coord: start,
        cost: 0.0,
    });

    while let Some(ReferenceEntry { coord, cost }) = queue.pop() {
        if coord == goal {
            return Some(cost);
        }
        if cost > *costs.get(coord).unwrap() {
            continue;
        }
        for neighbour in neighbours(grid, coord, allow_diagonal, dont_cross_corners).iter() {
            let step: f64 = edge_cost(grid, coord, neighbour);
            let next_cost = cost + step;
            let best = costs.get_mut(neighbour).unwrap();
            if next_cost < *best {
                *best = next_cost;
                queue.push(ReferenceEntry {
                    coord: neighbour,
                    cost: next_cost,
                });
            }
        }
    }

    None
}
