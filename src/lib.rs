mod config;
mod d_star_lite;
mod error;
mod grid;
mod heuristic;
mod metadata;
mod neighbours;
mod path;

pub use config::*;
pub use d_star_lite::*;
pub use error::*;
pub use grid::*;
pub use heuristic::*;
pub use metadata::*;
pub use neighbours::{edge_cost, neighbours, Neighbours, NeighboursIter};
pub use path::*;

pub use direction::Direction;
pub use grid_2d::{Coord, Size};

#[cfg(test)]
mod tests;
