use num_traits::{Float, FloatConst, NumCast};

/// Estimate of the remaining cost between two cells separated by `dx`
/// columns and `dy` rows. Must not overestimate the true cost for returned
/// paths to be optimal.
pub trait Heuristic<Cost> {
    fn estimate(&self, dx: u32, dy: u32) -> Cost;
}

impl<Cost, F> Heuristic<Cost> for F
where
    F: Fn(u32, u32) -> Cost,
{
    fn estimate(&self, dx: u32, dy: u32) -> Cost {
        self(dx, dy)
    }
}

#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceHeuristic {
    /// Admissible only when diagonal moves are disabled.
    Manhattan,
    Euclidean,
    Octile,
    Chebyshev,
}

pub(crate) fn cast<Cost: Float>(n: u32) -> Cost {
    <Cost as NumCast>::from(n).unwrap_or_else(Cost::infinity)
}

impl<Cost> Heuristic<Cost> for DistanceHeuristic
where
    Cost: Float + FloatConst,
{
    fn estimate(&self, dx: u32, dy: u32) -> Cost {
        let dx: Cost = cast(dx);
        let dy: Cost = cast(dy);
        match *self {
            DistanceHeuristic::Manhattan => dx + dy,
            DistanceHeuristic::Euclidean => (dx * dx + dy * dy).sqrt(),
            DistanceHeuristic::Octile => {
                let (cardinal, ordinal) = if dx > dy {
                    (dx - dy, dy)
                } else {
                    (dy - dx, dx)
                };
                cardinal + ordinal * Cost::SQRT_2()
            }
            DistanceHeuristic::Chebyshev => dx.max(dy),
        }
    }
}
